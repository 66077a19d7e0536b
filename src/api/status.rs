//! Handlers for hub status

use super::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(hub_status))
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HubStatusResponse {
    pub num_clients: usize,
    pub num_rooms: usize,
}

async fn hub_status(State(state): State<Arc<AppState>>) -> Json<HubStatusResponse> {
    let status = state.hub.status().await;
    Json(HubStatusResponse {
        num_clients: status.num_clients,
        num_rooms: status.num_rooms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{conn::Client, Config};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn counts_clients_and_rooms() {
        let state = AppState::new(Config::default());
        let (tx, _rx) = mpsc::channel(1);
        let alice = Client::new("alice", tx);
        state.hub.connect(&alice).await.expect("failed to connect");
        state.hub.join_room(&alice, "general").await.expect("failed to join");

        let Json(rsp) = hub_status(State(state.clone())).await;
        assert_eq!(
            rsp,
            HubStatusResponse {
                num_clients: 1,
                num_rooms: 1
            }
        );

        let value = serde_json::to_value(&rsp).expect("failed to encode");
        assert_eq!(value["numClients"], 1);
        assert_eq!(value["numRooms"], 1);
    }
}
