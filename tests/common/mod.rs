#![allow(dead_code)]

use fluent_writer::{Record, Transport, TransportError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Transport that keeps every posted event in memory.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    posted: Mutex<Vec<(String, Record)>>,
    fail_posts: AtomicBool,
    attempts: AtomicUsize,
    close_error: Mutex<Option<String>>,
    closes: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let transport = Self::default();
        transport.fail_posts.store(true, Ordering::SeqCst);
        transport
    }

    pub fn with_close_error(message: &str) -> Self {
        let transport = Self::default();
        *transport.close_error.lock() = Some(message.to_string());
        transport
    }

    pub fn posted(&self) -> Vec<(String, Record)> {
        self.posted.lock().clone()
    }

    /// Every call to `post`, failed or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Transport for RecordingTransport {
    fn post(&self, tag: &str, record: &Record) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(TransportError::Other("simulated post failure".to_string()));
        }
        self.posted.lock().push((tag.to_string(), record.clone()));
        Ok(())
    }

    fn close(&self) -> Result<(), TransportError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        match self.close_error.lock().as_ref() {
            Some(message) => Err(TransportError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

pub fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
