//! Integration tests for channel joins, chat, keepalive and LIST.

mod common;

use common::{ServerPeer, TestClient, TestServer};
use slirc_client::{ChatMessage, ClientError, Connection, Event, Identity, RequestError, RequestKind};
use std::sync::Arc;
use std::time::Duration;

/// Connect, log in and wait for the welcome to be processed.
async fn logged_in(client: &mut TestClient, server: &TestServer) -> (Arc<Connection>, ServerPeer) {
    let (conn, login) = client
        .registry
        .connect_and_login(&server.address(), Identity::short("tester"))
        .await
        .expect("Failed to connect");
    let mut peer = server.accept().await.expect("Failed to accept");
    peer.expect_login().await.expect("No login lines");
    peer.send_line(":irc.test 001 tester :Welcome")
        .await
        .unwrap();
    assert_eq!(login.await, Ok(()));
    client
        .recv_until(|e| matches!(e, Event::Login(_)))
        .await
        .unwrap();
    (conn, peer)
}

#[tokio::test]
async fn test_join_resolves_with_channel() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::new();
    let (conn, mut peer) = logged_in(&mut client, &server).await;

    let reply = conn.join("#rust").unwrap();
    assert_eq!(peer.recv_line().await.unwrap(), "JOIN #rust");
    assert!(conn.is_pending(RequestKind::Join));

    peer.send_line(":tester!tester@localhost JOIN :#rust")
        .await
        .unwrap();

    assert_eq!(reply.await, Ok("#rust".to_string()));
    assert_eq!(
        client.next_event().await.unwrap(),
        Event::Join(Ok("#rust".into()))
    );
    assert!(!conn.is_pending(RequestKind::Join));
}

#[tokio::test]
async fn test_second_join_conflicts() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::new();
    let (conn, mut peer) = logged_in(&mut client, &server).await;

    let first = conn.join("#one").unwrap();
    let second = conn.join("#two");
    assert!(matches!(
        second,
        Err(ClientError::Request(RequestError::Conflict(RequestKind::Join)))
    ));

    assert_eq!(peer.recv_line().await.unwrap(), "JOIN #one");
    peer.send_line(":irc.test 471 tester #one :Cannot join channel (+l)")
        .await
        .unwrap();
    assert_eq!(first.await, Err(RequestError::ChannelFull));

    // Only the first JOIN ever reached the wire.
    assert!(
        peer.recv_line_timeout(Duration::from_millis(100))
            .await
            .is_err()
    );

    // The slot is free again.
    let third = conn.join("#three").unwrap();
    assert_eq!(peer.recv_line().await.unwrap(), "JOIN #three");
    peer.send_line(":irc.test 479 tester #three :Illegal channel name")
        .await
        .unwrap();
    assert_eq!(third.await, Err(RequestError::IllegalChannelName));
}

#[tokio::test]
async fn test_disconnect_fails_pending_join_once() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::new();
    let (conn, mut peer) = logged_in(&mut client, &server).await;

    let reply = conn.join("#rust").unwrap();
    peer.recv_line().await.unwrap();

    conn.disconnect();
    conn.disconnect();

    assert_eq!(reply.await, Err(RequestError::ConnectionClosed));
    let events = client
        .recv_until(|e| matches!(e, Event::Disconnected { .. }))
        .await
        .unwrap();
    assert_eq!(
        events,
        vec![
            Event::Join(Err(RequestError::ConnectionClosed)),
            Event::Disconnected {
                reason: "Disconnected by client".into()
            },
        ]
    );
    client
        .expect_quiet(Duration::from_millis(100))
        .await
        .expect("Second disconnect emitted events");

    // Nothing can be issued on a closed connection.
    assert!(matches!(conn.join("#rust"), Err(ClientError::NotConnected)));
}

#[tokio::test]
async fn test_ping_answered() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::new();
    let (_conn, mut peer) = logged_in(&mut client, &server).await;

    peer.send_line("PING :irc.test-12345").await.unwrap();
    assert_eq!(peer.recv_line().await.unwrap(), "PONG :irc.test-12345");
}

#[tokio::test]
async fn test_privmsg_becomes_chat() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::new();
    let (conn, mut peer) = logged_in(&mut client, &server).await;

    peer.send_line(":alice!alice@example.org PRIVMSG #rust :hello, world")
        .await
        .unwrap();
    peer.send_line(":bob!bob@example.org PRIVMSG tester :psst")
        .await
        .unwrap();

    let channel = ChatMessage::new("alice", "#rust", "hello, world");
    let private = ChatMessage::new("bob", "tester", "psst");
    assert_eq!(client.next_event().await.unwrap(), Event::Chat(channel));
    assert_eq!(client.next_event().await.unwrap(), Event::Chat(private.clone()));
    assert_eq!(private.conversation(), "bob");

    conn.privmsg("#rust", "hi alice").unwrap();
    assert_eq!(peer.recv_line().await.unwrap(), "PRIVMSG #rust :hi alice");
}

#[tokio::test]
async fn test_list_reply_collected() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::new();
    let (conn, mut peer) = logged_in(&mut client, &server).await;

    conn.query(slirc_proto::ServerQuery::List).unwrap();
    assert_eq!(peer.recv_line().await.unwrap().trim_end(), "LIST");

    peer.send_line(":irc.test 321 tester Channel :Users  Name").await.unwrap();
    peer.send_line(":irc.test 322 tester #rust 42 :Rust talk").await.unwrap();
    peer.send_line(":irc.test 322 tester #tokio 7 :async").await.unwrap();
    peer.send_line(":irc.test 323 tester :End of /LIST").await.unwrap();

    let events = client
        .recv_until(|e| matches!(e, Event::List(_)))
        .await
        .unwrap();
    assert_eq!(
        events.last(),
        Some(&Event::List(vec![
            ":irc.test 322 tester #rust 42 :Rust talk".into(),
            ":irc.test 322 tester #tokio 7 :async".into(),
        ]))
    );
}

#[tokio::test]
async fn test_lines_split_across_reads() {
    let server = TestServer::spawn().await.unwrap();
    let mut client = TestClient::with_read_buffer_size(3);
    let (conn, login) = client
        .registry
        .connect_and_login(&server.address(), Identity::short("tester"))
        .await
        .unwrap();
    let mut peer = server.accept().await.unwrap();
    peer.expect_login().await.unwrap();

    // Two lines in one write, the second cut mid-line, the rest later.
    peer.send_bytes(b":irc.test 001 tester :Hi\r\n:tester!t@h JO")
        .await
        .unwrap();
    assert_eq!(login.await, Ok(()));

    let reply = conn.join("#split").unwrap();
    assert_eq!(peer.recv_line().await.unwrap(), "JOIN #split");
    peer.send_bytes(b"IN #split\r\n").await.unwrap();
    assert_eq!(reply.await, Ok("#split".to_string()));
}
