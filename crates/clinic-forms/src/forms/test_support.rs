use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use super::mail::{DispatchError, EmailDispatcher, OutboundEmail};

/// Records every message instead of sending it.
#[derive(Default, Clone)]
pub(crate) struct MemoryMailbox {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl EmailDispatcher for MemoryMailbox {
    fn dispatch(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("mailbox mutex poisoned")
            .push(email.clone());
        Ok(())
    }
}

impl MemoryMailbox {
    pub(crate) fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailbox mutex poisoned").clone()
    }
}

/// A relay that is always down.
pub(crate) struct FailingMailbox;

impl EmailDispatcher for FailingMailbox {
    fn dispatch(&self, _email: &OutboundEmail) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("relay offline".to_string()))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
