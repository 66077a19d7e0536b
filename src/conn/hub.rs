use super::{
    client::Client,
    room::Room,
    state::{HubState, HubStatus},
};
use crate::core::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process wide registry of clients and rooms.
///
/// Every mutation takes the write lock, lookups take the read lock.
pub struct Hub {
    inner: RwLock<HubState>,
}

impl Hub {
    pub fn new(room_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HubState::new(room_capacity)),
        }
    }

    pub async fn status(&self) -> HubStatus {
        let inner = self.inner.read().await;
        inner.status()
    }

    pub async fn connect(&self, client: &Client) -> Result<(), Error> {
        let mut inner = self.inner.write().await;
        inner.register_client(client)
    }

    pub async fn disconnect(&self, client: &Client) -> Result<bool, Error> {
        let mut inner = self.inner.write().await;
        inner.unregister_client(client).await
    }

    pub async fn find_client_by_name(&self, name: &str) -> Option<Client> {
        let inner = self.inner.read().await;
        inner.find_client_by_name(name)
    }

    pub async fn find_room(&self, name: &str) -> Option<Room> {
        let inner = self.inner.read().await;
        inner.find_room(name)
    }

    pub async fn create_room(&self, name: &str) -> Room {
        let mut inner = self.inner.write().await;
        inner.create_room(name)
    }

    pub async fn join_room(&self, client: &Client, name: &str) -> Result<bool, Error> {
        let mut inner = self.inner.write().await;
        inner.join_room(client, name).await
    }

    pub async fn leave_room(&self, client: &Client, name: &str) -> Result<bool, Error> {
        let mut inner = self.inner.write().await;
        inner.leave_room(client, name).await
    }

    pub async fn client_rooms(&self, client_id: Uuid) -> Option<Vec<String>> {
        let inner = self.inner.read().await;
        inner.client_rooms(client_id)
    }
}

// ========================// tests //======================== //
