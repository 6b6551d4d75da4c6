use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct TransportStats {
    posted: AtomicU64,
    failed: AtomicU64,
    bytes_written: AtomicU64,
    connects: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportStatsSnapshot {
    pub posted: u64,
    pub failed: u64,
    pub bytes_written: u64,
    pub connects: u64,
}

impl TransportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_post(&self, success: bool, bytes: usize) {
        if success {
            self.posted.fetch_add(1, Ordering::Relaxed);
            self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_connect(&self) {
        self.connects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TransportStatsSnapshot {
        TransportStatsSnapshot {
            posted: self.posted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            connects: self.connects.load(Ordering::Relaxed),
        }
    }
}
