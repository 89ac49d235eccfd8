use anyhow::{Context, Result};
use async_trait::async_trait;
use parlor_core::{ParticipantId, RoomId};
use serde::Deserialize;

/// The participant whose machine sources the virtual-browser stream.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteHolder {
    pub user_id: ParticipantId,
    pub name: String,
    pub username: String,
    pub status: String,
}

/// The two REST calls the signaling core depends on. Everything else the
/// server offers (rosters, history, friends) belongs to the UI layer.
#[async_trait]
pub trait RoomApi: Send + Sync {
    /// Who holds the remote for `room`'s stream.
    async fn remote_holder(&self, room: &RoomId) -> Result<RemoteHolder>;

    /// Ask the server to start a virtual browser for `room`. The resulting
    /// offer arrives later over the signaling channel, not in this response.
    async fn provision_stream(&self, room: &RoomId) -> Result<()>;
}

pub struct HttpRoomApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRoomApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RoomApi for HttpRoomApi {
    async fn remote_holder(&self, room: &RoomId) -> Result<RemoteHolder> {
        let url = format!("{}/remote?cid={}", self.base_url, room);
        let holder = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {url} failed"))?
            .json::<RemoteHolder>()
            .await
            .context("Malformed remote-holder response")?;
        Ok(holder)
    }

    async fn provision_stream(&self, room: &RoomId) -> Result<()> {
        let url = format!("{}/stream?cid={}", self.base_url, room);
        self.http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {url} failed"))?;
        Ok(())
    }
}
