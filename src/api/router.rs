//! Defines the router of the server.

use super::{status, websocket, AppState};
use crate::Config;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create router of the application.
///
/// - `config`: The global configure of the application.
pub fn make_app(config: Config) -> Router {
    let state = AppState::new(config);

    Router::new()
        .merge(websocket::router())
        .nest("/api", status::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ========================// tests //======================== //

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt, StreamExt};
    use std::net::SocketAddr;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::time::{timeout, Duration};
    use tokio_tungstenite::{
        connect_async,
        tungstenite::{client::IntoClientRequest, Error as WsError, Message},
        MaybeTlsStream, WebSocketStream,
    };

    type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn serve() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local address");
        let app = make_app(Config::default());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server failed");
        });
        addr
    }

    async fn dial(addr: SocketAddr, name: &str, origin: &str) -> Result<Socket, WsError> {
        let mut request = format!("ws://{}/ws/{}", addr, name)
            .into_client_request()
            .expect("invalid request");
        request
            .headers_mut()
            .insert("origin", origin.parse().expect("invalid origin"));
        connect_async(request).await.map(|(socket, _)| socket)
    }

    async fn next_text(socket: &mut Socket) -> serde_json::Value {
        loop {
            let msg = timeout(Duration::from_secs(5), socket.next())
                .await
                .expect("no message in time")
                .expect("socket closed")
                .expect("read failed");
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).expect("invalid json");
            }
        }
    }

    fn status_of(err: WsError) -> u16 {
        match err {
            WsError::Http(rsp) => rsp.status().as_u16(),
            other => panic!("unexpected error {}", other),
        }
    }

    #[tokio::test]
    async fn private_message_over_websocket() {
        let addr = serve().await;
        let origin = "http://localhost:3000";
        let mut alice = dial(addr, "alice", origin).await.expect("alice failed");
        let mut bob = dial(addr, "bob", origin).await.expect("bob failed");

        // bob may still be registering, retry until the message lands
        let text = r#"{"action":"send-private-message","target":"bob","message":"hey"}"#;
        let value = loop {
            alice
                .send(Message::Text(text.to_owned()))
                .await
                .expect("send failed");
            if let Ok(value) = timeout(Duration::from_millis(200), next_text(&mut bob)).await {
                break value;
            }
        };

        assert_eq!(value["action"], "send-private-message");
        assert_eq!(value["sender"], "alice");
        assert_eq!(value["message"], "hey");
    }

    #[tokio::test]
    async fn oversized_frame_ends_session() {
        let addr = serve().await;
        let origin = "http://localhost:3000";
        let mut alice = dial(addr, "alice", origin).await.expect("alice failed");

        let room = "x".repeat(64 * 1024);
        let text = format!(r#"{{"action":"join-room","message":"{}"}}"#, room);
        // the server may drop the connection while the frame is in flight
        let _ = alice.send(Message::Text(text)).await;

        let ended = timeout(Duration::from_secs(5), async {
            loop {
                match alice.next().await {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        })
        .await;
        assert!(ended.is_ok(), "session survived an oversized frame");

        // the name is released once the session is torn down
        let again = timeout(Duration::from_secs(5), async {
            loop {
                match dial(addr, "alice", origin).await {
                    Ok(socket) => break socket,
                    Err(_) => tokio::task::yield_now().await,
                }
            }
        })
        .await;
        assert!(again.is_ok(), "name was never released");
    }

    #[tokio::test]
    async fn upgrade_is_guarded() {
        let addr = serve().await;

        let err = dial(addr, "mallory", "http://evil.example")
            .await
            .expect_err("foreign origin accepted");
        assert_eq!(status_of(err), 403);

        let name = "x".repeat(51);
        let err = dial(addr, &name, "http://localhost:3000")
            .await
            .expect_err("long name accepted");
        assert_eq!(status_of(err), 400);

        let _alice = dial(addr, "alice", "http://localhost:3000")
            .await
            .expect("alice failed");
        let err = loop {
            match dial(addr, "alice", "http://localhost:3000").await {
                Err(err) => break err,
                // the first alice may not be registered yet
                Ok(_) => tokio::task::yield_now().await,
            }
        };
        assert_eq!(status_of(err), 409);
    }
}
