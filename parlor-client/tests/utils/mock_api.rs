use anyhow::Result;
use async_trait::async_trait;
use parlor_client::{RemoteHolder, RoomApi};
use parlor_core::{ParticipantId, RoomId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock REST collaborator for remote-holder lookup and stream provisioning.
#[derive(Clone)]
pub struct MockRoomApi {
    holder: ParticipantId,
    provisioned: Arc<AtomicUsize>,
    fail_provision: Arc<AtomicBool>,
}

impl MockRoomApi {
    pub fn new(holder: impl Into<ParticipantId>) -> Self {
        Self {
            holder: holder.into(),
            provisioned: Arc::new(AtomicUsize::new(0)),
            fail_provision: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn provisioned(&self) -> usize {
        self.provisioned.load(Ordering::SeqCst)
    }

    pub fn refuse_provisioning(&self) {
        self.fail_provision.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RoomApi for MockRoomApi {
    async fn remote_holder(&self, _room: &RoomId) -> Result<RemoteHolder> {
        Ok(RemoteHolder {
            user_id: self.holder.clone(),
            name: "Mock Holder".to_string(),
            username: "mock-holder".to_string(),
            status: "online".to_string(),
        })
    }

    async fn provision_stream(&self, _room: &RoomId) -> Result<()> {
        if self.fail_provision.load(Ordering::SeqCst) {
            anyhow::bail!("provisioning refused");
        }
        self.provisioned.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
