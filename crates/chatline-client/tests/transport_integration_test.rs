//! Transport round trips against a live relay server.

use std::time::Duration;

use chatline_client::{
    ConnectedClient, TransportConfig, TransportError, connect, connect_with_config,
};
use chatline_proto::{ChatMessage, OutboundFrame};
use chatline_server::{Server, ServerRuntimeConfig};

async fn start_server() -> (String, tokio::task::JoinHandle<()>) {
    let config = ServerRuntimeConfig {
        bind_address: "127.0.0.1:0".to_string(),
        ..ServerRuntimeConfig::default()
    };
    let server = Server::bind(config).await.unwrap();
    let url = format!("ws://{}/ws", server.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let _ = server.run().await;
    });
    (url, handle)
}

async fn recv(client: &mut ConnectedClient) -> Option<String> {
    tokio::time::timeout(Duration::from_secs(5), client.recv()).await.expect("timed out")
}

#[tokio::test]
async fn register_then_chat_round_trip() {
    let (url, server) = start_server().await;

    let mut client = connect(&url).await.unwrap();
    client.send(OutboundFrame::Register { name: Some("alice".into()) }.encode()).await.unwrap();
    client.send(OutboundFrame::Chat { text: "hi: there".into() }.encode()).await.unwrap();

    let raw = recv(&mut client).await.unwrap();
    assert_eq!(ChatMessage::parse(&raw), ChatMessage::new("alice", "hi: there"));

    client.stop();
    server.abort();
}

#[tokio::test]
async fn frames_arrive_in_send_order() {
    let (url, server) = start_server().await;

    let mut client = connect(&url).await.unwrap();
    client.send(":/bob".to_string()).await.unwrap();
    for i in 0..5 {
        client.send(format!("line {i}")).await.unwrap();
    }

    for i in 0..5 {
        assert_eq!(recv(&mut client).await.unwrap(), format!("bob: line {i}"));
    }

    client.stop();
    server.abort();
}

#[tokio::test]
async fn from_server_ends_when_connection_closes() {
    let (url, server) = start_server().await;

    let mut client = connect(&url).await.unwrap();
    client.send(":/carol".to_string()).await.unwrap();
    client.send("ping".to_string()).await.unwrap();
    assert_eq!(recv(&mut client).await.unwrap(), "carol: ping");

    // Dropping the outbound sender closes the socket and ends the bridge,
    // which in turn ends the inbound channel.
    server.abort();
    let ConnectedClient { to_server, mut from_server, .. } = client;
    drop(to_server);

    let end = tokio::time::timeout(Duration::from_secs(5), from_server.recv()).await.unwrap();
    assert!(end.is_none());
}

#[tokio::test]
async fn refused_connection_is_an_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = connect_with_config(&format!("ws://{addr}/ws"), TransportConfig::development()).await;
    assert!(matches!(result, Err(TransportError::Connection(_))));
}

#[tokio::test]
async fn silent_server_times_out() {
    // Accepts TCP but never answers the upgrade.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hold = tokio::spawn(async move {
        let _socket = listener.accept().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let config =
        TransportConfig { connect_timeout: Duration::from_millis(200), ..TransportConfig::default() };
    let result = connect_with_config(&format!("ws://{addr}/ws"), config).await;
    assert!(matches!(result, Err(TransportError::Timeout(_))));

    hold.abort();
}
