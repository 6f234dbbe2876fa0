use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Performance metrics for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub logins: Arc<AtomicUsize>,
    pub users_created: Arc<AtomicUsize>,
    pub photos_uploaded: Arc<AtomicUsize>,
    pub photos_deleted: Arc<AtomicUsize>,
    pub likes_set: Arc<AtomicUsize>,
    pub comments_set: Arc<AtomicUsize>,
    pub media_bytes_written: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            logins: Arc::new(AtomicUsize::new(0)),
            users_created: Arc::new(AtomicUsize::new(0)),
            photos_uploaded: Arc::new(AtomicUsize::new(0)),
            photos_deleted: Arc::new(AtomicUsize::new(0)),
            likes_set: Arc::new(AtomicUsize::new(0)),
            comments_set: Arc::new(AtomicUsize::new(0)),
            media_bytes_written: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_logins(&self) {
        self.logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_users_created(&self) {
        self.users_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_photos_uploaded(&self) {
        self.photos_uploaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_photos_deleted(&self) {
        self.photos_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_likes_set(&self) {
        self.likes_set.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_comments_set(&self) {
        self.comments_set.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_media_bytes(&self, bytes: u64) {
        self.media_bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logins: self.logins.load(Ordering::Relaxed),
            users_created: self.users_created.load(Ordering::Relaxed),
            photos_uploaded: self.photos_uploaded.load(Ordering::Relaxed),
            photos_deleted: self.photos_deleted.load(Ordering::Relaxed),
            likes_set: self.likes_set.load(Ordering::Relaxed),
            comments_set: self.comments_set.load(Ordering::Relaxed),
            media_bytes_written: self.media_bytes_written.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub logins: usize,
    pub users_created: usize,
    pub photos_uploaded: usize,
    pub photos_deleted: usize,
    pub likes_set: usize,
    pub comments_set: usize,
    pub media_bytes_written: u64,
    pub uptime_seconds: u64,
}
