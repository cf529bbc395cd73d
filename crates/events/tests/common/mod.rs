#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

/// In-process stand-in for the form-to-email service.
///
/// Records every body it receives and answers with the scripted statuses
/// in order, then `200 OK` once the script runs out.
#[derive(Clone, Default)]
pub struct Hook {
    received: Arc<Mutex<Vec<Value>>>,
    script: Arc<Mutex<VecDeque<StatusCode>>>,
}

impl Hook {
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn receive(State(hook): State<Hook>, Json(body): Json<Value>) -> StatusCode {
    hook.received.lock().unwrap().push(body);
    hook.script.lock().unwrap().pop_front().unwrap_or(StatusCode::OK)
}

/// Serve a [`Hook`] on an ephemeral local port and return its URL.
pub async fn spawn_hook(script: &[u16]) -> (String, Hook) {
    let hook = Hook {
        received: Arc::default(),
        script: Arc::new(Mutex::new(
            script
                .iter()
                .map(|code| StatusCode::from_u16(*code).unwrap())
                .collect(),
        )),
    };

    let app = Router::new()
        .route("/hook", post(receive))
        .with_state(hook.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/hook"), hook)
}
