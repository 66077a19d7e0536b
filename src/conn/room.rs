use super::Client;
use crate::core::Error;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

enum RoomAction {
    /// Send an encoded message to all clients in this room
    Broadcast(String),
    /// A client joined the room
    Join(Client),
    /// A client left the room
    Left(Uuid),
    /// Snapshot of the current members
    Members(oneshot::Sender<Vec<Client>>),
}

/// Handle to a named room.
///
/// All actions go through one channel, so they are applied in the order
/// they were sent.
#[derive(Clone)]
pub struct Room {
    name: Arc<str>,
    tx: mpsc::Sender<RoomAction>,
}

impl Room {
    /// Spawn the task owning the member set and return its handle
    pub fn spawn(name: &str, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let name: Arc<str> = Arc::from(name);

        let room_name = name.clone();
        tokio::spawn(async move {
            let mut chat_room = ChatRoom::new(rx);
            chat_room.serve().await;
            tracing::debug!("room {} stopped", room_name);
        });

        Self { name, tx }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn register(&self, client: Client) -> Result<(), Error> {
        self.tx.send(RoomAction::Join(client)).await?;
        Ok(())
    }

    pub async fn unregister(&self, client_id: Uuid) -> Result<(), Error> {
        self.tx.send(RoomAction::Left(client_id)).await?;
        Ok(())
    }

    pub async fn broadcast(&self, msg: String) -> Result<(), Error> {
        self.tx.send(RoomAction::Broadcast(msg)).await?;
        Ok(())
    }

    pub async fn members(&self) -> Result<Vec<Client>, Error> {
        let (tx, rx) = oneshot::channel();
        self.tx.send(RoomAction::Members(tx)).await?;
        rx.await.map_err(|_| Error::SendMessage)
    }
}

struct ChatRoom {
    rx: mpsc::Receiver<RoomAction>,
    members: HashMap<Uuid, Client>,
}

impl ChatRoom {
    fn new(rx: mpsc::Receiver<RoomAction>) -> Self {
        Self {
            rx,
            members: HashMap::default(),
        }
    }

    async fn serve(&mut self) {
        while let Some(action) = self.rx.recv().await {
            match action {
                RoomAction::Broadcast(msg) => {
                    // a member whose queue is closed or full is skipped
                    for client in self.members.values() {
                        client.send(msg.clone());
                    }
                }
                RoomAction::Join(client) => {
                    self.members.insert(client.id(), client);
                }
                RoomAction::Left(id) => {
                    self.members.remove(&id);
                }
                RoomAction::Members(reply) => {
                    let _ = reply.send(self.members.values().cloned().collect());
                }
            }
        }
    }
}
