//! Handlers for websocket

use super::{
    event::ClientEvent,
    extractor::{OriginGuard, ValidPath},
    AppState,
};
use crate::conn::Client;
use crate::core::{constant::FRAME_DELIMITER, Error};
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::{response::IntoResponse, routing::get, Router};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use std::{fmt::Display, sync::Arc};
use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use validator::Validate;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ws/:name", get(ws_handler))
}

#[derive(Deserialize, Validate)]
pub struct ConnectParams {
    #[validate(length(min = 1, max = 50, message = "Must be between 1 and 50 characters"))]
    pub name: String,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    _: OriginGuard,
    ValidPath(params): ValidPath<ConnectParams>,
) -> Result<impl IntoResponse, Error> {
    // checked again on registration, this only saves the upgrade
    if state.hub.find_client_by_name(&params.name).await.is_some() {
        return Err(Error::NameTaken(params.name));
    }

    // larger frames fail in the transport before they are buffered
    let limit = state.config.max_message_size;
    Ok(ws
        .max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| websocket(socket, state, params.name)))
}

async fn websocket(socket: WebSocket, state: Arc<AppState>, name: String) {
    // by splitting, we can send and receive at the same time
    let (sender, receiver) = socket.split();
    serve_client(sender, receiver, state, name).await;
}

/// Register a client for the connection and run both pumps until it is torn down.
pub async fn serve_client<S, R>(mut sender: S, receiver: R, state: Arc<AppState>, name: String)
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display + Send,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(state.config.client_channel_capacity);
    let client = Client::new(&name, tx);

    if let Err(e) = state.hub.connect(&client).await {
        tracing::debug!("refuse client {}: {}", name, e);
        let frame = CloseFrame {
            code: close_code::POLICY,
            reason: e.to_string().into(),
        };
        let _ = write(&mut sender, Message::Close(Some(frame)), state.config.write_wait).await;
        return;
    }
    tracing::debug!("socket connect {}:{}", client.name(), client.id());

    let write_task = tokio::spawn(write_pump(sender, rx, client.clone(), state.clone()));
    let read_task = tokio::spawn(read_pump(receiver, client.clone(), state));

    let (write_result, read_result) = tokio::join!(write_task, read_task);
    if let Err(e) = write_result.and(read_result) {
        tracing::error!("pump of {} failed: {}", client.name(), e);
    }
    tracing::debug!("socket closed {}:{}", client.name(), client.id());
}

/// Decode and route everything the peer sends.
///
/// Ends on a transport error, a close frame, a missed deadline or teardown,
/// then tears the client down.
pub async fn read_pump<R>(mut receiver: R, client: Client, state: Arc<AppState>)
where
    R: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let config = &state.config;

    loop {
        // the deadline restarts with every frame, pongs included
        let next = tokio::select! {
            _ = client.closed() => break,
            next = time::timeout(config.pong_wait, receiver.next()) => next,
        };

        let msg = match next {
            Ok(Some(Ok(msg))) => msg,
            Ok(Some(Err(e))) => {
                tracing::debug!("read error from {}: {}", client.name(), e);
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!("{} missed the read deadline", client.name());
                break;
            }
        };

        let data = match msg {
            Message::Text(text) => text.into_bytes(),
            Message::Binary(data) => data,
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => break,
        };

        if data.len() > config.max_message_size {
            tracing::warn!(
                "drop message of {} bytes from {}, limit is {}",
                data.len(),
                client.name(),
                config.max_message_size
            );
            continue;
        }

        match serde_json::from_slice::<ClientEvent>(&data) {
            Ok(event) => {
                if let Err(e) = event.process(&state.hub, &client).await {
                    tracing::error!("failed to process message from {}: {}", client.name(), e);
                    break;
                }
            }
            Err(e) => tracing::warn!("malformed message from {}: {}", client.name(), e),
        }
    }

    client.disconnect(&state.hub).await;
}

/// Single consumer of the client's outbound queue.
///
/// Writes queued messages, pings the peer on every period and sends a close
/// frame once the client is torn down.
pub async fn write_pump<S>(
    mut sender: S,
    mut rx: mpsc::Receiver<String>,
    client: Client,
    state: Arc<AppState>,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let config = &state.config;
    let mut ticker = time::interval_at(Instant::now() + config.ping_period, config.ping_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = client.closed() => {
                rx.close();
                let _ = write(&mut sender, Message::Close(None), config.write_wait).await;
                break;
            }
            Some(msg) = rx.recv() => {
                let batch = coalesce(msg, &mut rx);
                if let Err(e) = write(&mut sender, Message::Text(batch), config.write_wait).await {
                    tracing::debug!("write to {} failed: {}", client.name(), e);
                    break;
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = write(&mut sender, Message::Ping(Vec::new()), config.write_wait).await {
                    tracing::debug!("ping to {} failed: {}", client.name(), e);
                    break;
                }
            }
        }
    }

    client.disconnect(&state.hub).await;
}

/// Append every message already queued to `first`
fn coalesce(first: String, rx: &mut mpsc::Receiver<String>) -> String {
    let mut batch = first;
    while let Ok(msg) = rx.try_recv() {
        batch.push(FRAME_DELIMITER);
        batch.push_str(&msg);
    }
    batch
}

async fn write<S>(sender: &mut S, msg: Message, wait: Duration) -> Result<(), Error>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match time::timeout(wait, sender.send(msg)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(Error::Transport(e.to_string())),
        Err(_) => Err(Error::WriteTimeout),
    }
}

// ========================// tests //======================== //
