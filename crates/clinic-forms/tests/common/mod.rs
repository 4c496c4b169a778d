#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use clinic_forms::forms::mail::{DispatchError, EmailDispatcher, OutboundEmail};

pub fn shipped_template_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../public/forms"))
}

#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("dispatcher mutex").clone()
    }
}

impl EmailDispatcher for RecordingDispatcher {
    fn dispatch(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        self.sent.lock().expect("dispatcher mutex").push(email.clone());
        Ok(())
    }
}

pub struct OfflineDispatcher;

impl EmailDispatcher for OfflineDispatcher {
    fn dispatch(&self, _email: &OutboundEmail) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("connection refused".to_string()))
    }
}
