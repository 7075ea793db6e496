use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide count of file server requests
#[derive(Debug, Default)]
pub struct HitCounter {
    hits: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn load(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}
