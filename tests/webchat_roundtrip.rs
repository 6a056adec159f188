// Integration test: web chat server over real sockets

use crate::EchoProvider;
use dashchat_lib::{Frame, Role, ServerConfig, Theme, WebChat, WebChatHandle};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start(theme: Theme) -> (SocketAddr, WebChatHandle, JoinHandle<()>) {
    let config = ServerConfig {
        bind_address: "127.0.0.1".into(),
        port: 0,
        page_title: "Test Chat".into(),
        theme,
    };
    let chat = WebChat::bind(config, Arc::new(EchoProvider)).await.unwrap();
    let addr = chat.local_addr().unwrap();
    let handle = chat.handle().unwrap();
    let task = tokio::spawn(async move {
        chat.serve().await.unwrap();
    });
    (addr, handle, task)
}

async fn next_frame(ws: &mut Client) -> Frame {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("frame within 5s")
            .expect("socket open")
            .expect("valid frame");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn send_text(ws: &mut Client, text: &str) {
    let frame = json!({ "type": "message", "text": text }).to_string();
    ws.send(Message::Text(frame)).await.unwrap();
}

#[tokio::test]
async fn serves_page_avatars_and_health() {
    let (addr, handle, task) = start(Theme::Dark).await;
    let base = format!("http://{}", addr);

    let page = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(page.status(), 200);
    let body = page.text().await.unwrap();
    assert!(body.contains("<title>Test Chat</title>"));
    assert!(body.contains(r#"<body class="dark-mode">"#));

    let avatar = reqwest::get(format!("{}/avatar/bot.svg", base)).await.unwrap();
    assert_eq!(avatar.headers()["content-type"], "image/svg+xml");
    assert!(avatar.text().await.unwrap().starts_with("<svg"));

    let health: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["ok"], true);
    assert_eq!(health["provider"], "echo");

    let client = reqwest::Client::new();
    let post = client.post(format!("{}/", base)).send().await.unwrap();
    assert_eq!(post.status(), 404);

    handle.stop();
    tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    assert!(!handle.status().running);
}

#[tokio::test]
async fn message_gets_echo_typing_then_reply() {
    let (addr, handle, _task) = start(Theme::Light).await;
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    match next_frame(&mut ws).await {
        Frame::System { text } => assert!(text.starts_with("Connected to Test Chat.")),
        other => panic!("expected welcome, got {other:?}"),
    }

    send_text(&mut ws, "**hello** world").await;

    match next_frame(&mut ws).await {
        Frame::Message { role: Role::User, html } => {
            assert!(html.starts_with(r#"<div class="message user">"#));
            assert!(html.contains("**hello** world"));
        }
        other => panic!("expected user echo, got {other:?}"),
    }
    assert_eq!(next_frame(&mut ws).await, Frame::Typing);
    match next_frame(&mut ws).await {
        Frame::Message { role: Role::Bot, html } => {
            assert!(html.contains(
                r#"<p><span class="subtitle">You said</span>: <span class="bold-text">hello</span> world</p>"#
            ));
        }
        other => panic!("expected bot reply, got {other:?}"),
    }

    assert_eq!(handle.status().message_count, 1);
    assert!(handle.status().running);
    handle.stop();
}

#[tokio::test]
async fn provider_failure_is_plain_error_frame() {
    let (addr, handle, _task) = start(Theme::Light).await;
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    let _welcome = next_frame(&mut ws).await;

    send_text(&mut ws, "please fail").await;
    let _echo = next_frame(&mut ws).await;
    assert_eq!(next_frame(&mut ws).await, Frame::Typing);
    assert_eq!(
        next_frame(&mut ws).await,
        Frame::Error { text: "API error: Throttling - Requests rate limit exceeded".into() }
    );
    handle.stop();
}

#[tokio::test]
async fn blank_messages_are_ignored() {
    let (addr, handle, _task) = start(Theme::Light).await;
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    let _welcome = next_frame(&mut ws).await;

    send_text(&mut ws, "   \n ").await;
    ws.send(Message::Text("raw text".into())).await.unwrap();

    // The blank message produced nothing, so the next frame is the echo of
    // the raw one.
    match next_frame(&mut ws).await {
        Frame::Message { role: Role::User, html } => assert!(html.contains("raw text")),
        other => panic!("expected user echo, got {other:?}"),
    }
    assert_eq!(next_frame(&mut ws).await, Frame::Typing);
    assert!(matches!(next_frame(&mut ws).await, Frame::Message { role: Role::Bot, .. }));
    assert_eq!(handle.status().message_count, 1);
    handle.stop();
}
