//! Well-known setting keys, seeded defaults and value validation.
//!
//! Keys and defaults must match the seed rows in the db crate's
//! `settings` migration.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::schedule::{canonical_slot_time, parse_slot_time, DailySchedule};

pub const KEY_OWNER_EMAIL: &str = "owner_email";
pub const KEY_OWNER_NAME: &str = "owner_name";
pub const KEY_BUSINESS_NAME: &str = "business_name";
pub const KEY_BUSINESS_PHONE: &str = "business_phone";
pub const KEY_BUSINESS_ADDRESS: &str = "business_address";
pub const KEY_EMAIL_NOTIFICATIONS: &str = "email_notifications";
pub const KEY_WORKING_HOURS_START: &str = "working_hours_start";
pub const KEY_WORKING_HOURS_END: &str = "working_hours_end";
pub const KEY_LUNCH_BREAK_START: &str = "lunch_break_start";
pub const KEY_LUNCH_BREAK_END: &str = "lunch_break_end";

/// Keys whose values are `HH:MM` times feeding [`DailySchedule`].
pub const SCHEDULE_KEYS: [&str; 4] = [
    KEY_WORKING_HOURS_START,
    KEY_WORKING_HOURS_END,
    KEY_LUNCH_BREAK_START,
    KEY_LUNCH_BREAK_END,
];

/// Keys read when composing a booking notification.
pub const NOTIFICATION_KEYS: [&str; 4] = [
    KEY_OWNER_EMAIL,
    KEY_OWNER_NAME,
    KEY_BUSINESS_NAME,
    KEY_EMAIL_NOTIFICATIONS,
];

/// Default business name when the setting is absent.
pub const DEFAULT_BUSINESS_NAME: &str = "BarberShop Elite";

/// Settings seeded on first migration.
pub const DEFAULT_SETTINGS: [(&str, &str); 10] = [
    (KEY_OWNER_EMAIL, "owner@example.com"),
    (KEY_OWNER_NAME, "Owner"),
    (KEY_BUSINESS_NAME, DEFAULT_BUSINESS_NAME),
    (KEY_BUSINESS_PHONE, "(71) 99999-9999"),
    (KEY_BUSINESS_ADDRESS, "Rua da Barbearia, 123 - Salvador, BA"),
    (KEY_EMAIL_NOTIFICATIONS, "true"),
    (KEY_WORKING_HOURS_START, "09:00"),
    (KEY_WORKING_HOURS_END, "18:00"),
    (KEY_LUNCH_BREAK_START, "12:00"),
    (KEY_LUNCH_BREAK_END, "14:00"),
];

/// Maximum length of a setting key.
pub const MAX_KEY_LEN: usize = 64;

/// Validate a single key/value pair before it is written.
pub fn validate_setting(key: &str, value: &str) -> Result<(), CoreError> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(CoreError::Validation(format!(
            "Setting key must be 1-{MAX_KEY_LEN} characters long"
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "Setting key '{key}' may only contain lowercase letters, digits and '_'"
        )));
    }

    if SCHEDULE_KEYS.contains(&key) {
        parse_slot_time(value)
            .map_err(|_| CoreError::Validation(format!("{key} must be a time in HH:MM format")))?;
    }

    if key == KEY_EMAIL_NOTIFICATIONS && value != "true" && value != "false" {
        return Err(CoreError::Validation(format!(
            "{KEY_EMAIL_NOTIFICATIONS} must be 'true' or 'false'"
        )));
    }

    Ok(())
}

/// Validate a batch of updates against the current settings and return the
/// values to store.
///
/// Each pair is checked on its own and schedule times are rewritten as
/// zero-padded `HH:MM`. The merged schedule must still describe a usable day.
pub fn validate_update(
    current: &BTreeMap<String, String>,
    updates: BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, CoreError> {
    let mut normalized = BTreeMap::new();
    for (key, value) in updates {
        validate_setting(&key, &value)?;
        let value = if SCHEDULE_KEYS.contains(&key.as_str()) {
            canonical_slot_time(&value)?
        } else {
            value
        };
        normalized.insert(key, value);
    }

    if normalized.keys().any(|k| SCHEDULE_KEYS.contains(&k.as_str())) {
        let mut merged = current.clone();
        merged.extend(normalized.iter().map(|(k, v)| (k.clone(), v.clone())));
        DailySchedule::from_settings(&merged).validate()?;
    }

    Ok(normalized)
}

/// Whether booking notifications are switched on.
pub fn notifications_enabled(settings: &BTreeMap<String, String>) -> bool {
    settings
        .get(KEY_EMAIL_NOTIFICATIONS)
        .is_some_and(|v| v == "true")
}

/// Render a JSON value as stored setting text.
///
/// Strings are stored verbatim; every other value keeps its JSON encoding.
pub fn setting_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
