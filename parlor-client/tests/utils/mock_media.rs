use async_trait::async_trait;
use parlor_client::{MediaGateway, MediaSource, MediaTrack, TrackKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock device acquisition: one audio and one video track, or nothing at all
/// when the test simulates a machine without capture devices.
#[derive(Clone)]
pub struct MockMediaGateway {
    available: Arc<AtomicBool>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl MockMediaGateway {
    pub fn new() -> Self {
        Self {
            available: Arc::new(AtomicBool::new(true)),
            acquired: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn without_device() -> Self {
        let gateway = Self::new();
        gateway.available.store(false, Ordering::SeqCst);
        gateway
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl Default for MockMediaGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaGateway for MockMediaGateway {
    async fn acquire(&self) -> Option<MediaSource> {
        if !self.available.load(Ordering::SeqCst) {
            return None;
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Some(MediaSource {
            tracks: vec![
                MediaTrack {
                    id: "mock-audio".to_string(),
                    kind: TrackKind::Audio,
                },
                MediaTrack {
                    id: "mock-video".to_string(),
                    kind: TrackKind::Video,
                },
            ],
        })
    }

    async fn release(&self, _source: MediaSource) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
