//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a real `tokio-tungstenite` client
//! to verify that frames actually flow over the network — including
//! while a reader task is parked in `recv`, which is the steady state
//! of a connected but idle game client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    use molerush_transport::{
        Connection, Transport, WebSocketConnection, WebSocketTransport,
    };

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds an ephemeral port, connects one client, and returns both
    /// ends of the pair.
    async fn connected_pair() -> (WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr");

        let accept =
            tokio::spawn(
                async move { transport.accept().await.expect("accept") },
            );
        let (client, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .expect("client should connect");
        let server = accept.await.expect("accept task");

        (server, client)
    }

    #[tokio::test]
    async fn test_accept_and_bidirectional_send_receive() {
        let (server, mut client) = connected_pair().await;
        assert!(server.id().into_inner() > 0);

        // Server sends; the client sees a text frame (the protocol is
        // JSON, read as a string in the browser).
        server
            .send(br#"{"type":"room_created","code":"ABCD"}"#)
            .await
            .expect("send");
        let msg = client.next().await.expect("frame").expect("no error");
        match msg {
            Message::Text(text) => {
                assert_eq!(
                    text.as_str(),
                    r#"{"type":"room_created","code":"ABCD"}"#
                );
            }
            other => panic!("expected a text frame, got {other:?}"),
        }

        // Client sends; the server receives the raw payload.
        client
            .send(Message::text(r#"{"type":"create_room"}"#))
            .await
            .expect("client send");
        let received = server
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"type":"create_room"}"#);

        server.close().await.expect("close");
    }

    #[tokio::test]
    async fn test_send_flushes_while_a_reader_is_parked_in_recv() {
        let (server, mut client) = connected_pair().await;
        let server = Arc::new(server);

        // A handler task blocks in recv for the life of the connection;
        // the client sends nothing. Writes must still go through.
        let reader = {
            let server = Arc::clone(&server);
            tokio::spawn(async move { server.recv().await })
        };
        // Let the reader task actually reach its recv await.
        tokio::task::yield_now().await;

        server
            .send(br#"{"type":"timer_sync","timeLeft":59}"#)
            .await
            .expect("send");

        let msg =
            tokio::time::timeout(Duration::from_secs(5), client.next())
                .await
                .expect("send must not wait for inbound client traffic")
                .expect("frame")
                .expect("no error");
        assert_eq!(
            msg.into_text().expect("text frame").as_str(),
            r#"{"type":"timer_sync","timeLeft":59}"#
        );

        reader.abort();
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (server, mut client) = connected_pair().await;

        client.close(None).await.expect("client close");

        let result = server.recv().await.expect("recv should not error");
        assert!(result.is_none(), "clean close should yield None");
    }

    #[tokio::test]
    async fn test_recv_skips_ping_frames() {
        let (server, mut client) = connected_pair().await;

        client
            .send(Message::Ping(b"keepalive".to_vec().into()))
            .await
            .expect("ping");
        client
            .send(Message::text(r#"{"type":"start_bot"}"#))
            .await
            .expect("send");

        // The ping is transport noise; recv yields the next payload.
        let received = server
            .recv()
            .await
            .expect("recv")
            .expect("payload");
        assert_eq!(received, br#"{"type":"start_bot"}"#);
    }
}
