use std::sync::atomic::{AtomicU64, Ordering};

/// Sink for traffic counters. Called with the size of the status line, the header block and the
/// body of every request as they are read, and once per request that was fully parsed.
pub trait Statistics {
    fn add_bytes_received(&self, bytes: u64);
    fn add_request(&self);
}

/// Statistics sink that discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoStatistics;

impl Statistics for NoStatistics {
    fn add_bytes_received(&self, _bytes: u64) {}

    fn add_request(&self) {}
}

/// In-memory counters, safe to share between connection threads.
#[derive(Debug, Default)]
pub struct Counters {
    bytes_received: AtomicU64,
    requests: AtomicU64,
}

impl Counters {
    pub fn new() -> Counters {
        Counters::default()
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

impl Statistics for Counters {
    fn add_bytes_received(&self, bytes: u64) {
        self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
    }

    fn add_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}
