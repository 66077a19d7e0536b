//! Message envelope exchanged over the websocket

use crate::conn::{Client, Hub};
use crate::core::Error;
use serde::{Deserialize, Serialize};

// ============================== // ClientEvent // ============================== //

/// Events from client to server.
///
/// A `sender` field on the wire is ignored, the receiving client is the sender.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Broadcast `message` to the room named by `target`
    SendMessage {
        target: String,
        #[serde(default)]
        message: String,
    },

    /// Join the room named by `message`
    JoinRoom { message: String },

    /// Leave the room named by `message`
    LeaveRoom { message: String },

    /// Deliver `message` to the client named by `target`
    SendPrivateMessage {
        target: String,
        #[serde(default)]
        message: String,
    },
}

impl ClientEvent {
    /// Route the event on behalf of `client`.
    ///
    /// Unknown rooms and clients are not an error, the message is dropped.
    pub async fn process(self, hub: &Hub, client: &Client) -> Result<(), Error> {
        match self {
            ClientEvent::SendMessage { target, message } => {
                let Some(room) = hub.find_room(&target).await else {
                    tracing::debug!("room {} not found, drop message from {}", target, client.name());
                    return Ok(());
                };
                let msg = ServerEvent::new(Action::SendMessage, target, message, client).to_text()?;
                room.broadcast(msg).await
            }
            ClientEvent::JoinRoom { message: room } => {
                if room.is_empty() {
                    return Ok(());
                }
                hub.join_room(client, &room).await?;
                Ok(())
            }
            ClientEvent::LeaveRoom { message: room } => {
                hub.leave_room(client, &room).await?;
                Ok(())
            }
            ClientEvent::SendPrivateMessage { target, message } => {
                let Some(peer) = hub.find_client_by_name(&target).await else {
                    tracing::debug!("client {} not found, drop message from {}", target, client.name());
                    return Ok(());
                };
                let msg =
                    ServerEvent::new(Action::SendPrivateMessage, target, message, client).to_text()?;
                peer.send(msg);
                Ok(())
            }
        }
    }
}

// ============================== // ServerEvent // ============================== //

/// Actions carried by messages from server to client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    SendMessage,
    SendPrivateMessage,
}

/// Events from server to client
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerEvent {
    pub action: Action,
    pub message: String,
    pub target: String,
    pub sender: String,
}

impl ServerEvent {
    pub fn new(action: Action, target: String, message: String, sender: &Client) -> Self {
        Self {
            action,
            message,
            target,
            sender: sender.name().to_owned(),
        }
    }

    pub fn to_text(&self) -> Result<String, Error> {
        let msg = serde_json::to_string(self)?;
        Ok(msg)
    }
}

// ============================== // tests // ============================== //
