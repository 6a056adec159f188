// dashchat Engine: Web Chat Bridge
//
// A small HTTP + WebSocket server that puts the chat page in front of a
// ChatProvider. Every message is answered with pre-rendered bubbles, so the
// page never formats anything itself.
//
// Architecture:
//   - Binds a TCP listener (default 127.0.0.1:3939, port 0 picks a free one)
//   - GET /                → self-contained HTML chat page
//   - GET /avatar/*.svg    → avatar images referenced by the bubbles
//   - GET /health          → JSON status
//   - GET /ws              → WebSocket relay (one reply in flight per socket)
//
// No accounts and no sessions: anyone who can reach the port can chat.

mod html;
mod server;

pub use html::{avatar_svg, build_chat_html};

use crate::atoms::constants::LOG_PREVIEW_CHARS;
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::traits::ChatProvider;
use crate::engine::config::ServerConfig;
use crate::engine::truncate_utf8;
use dashchat_core::{render_message, Role};
use futures::stream::StreamExt;
use futures::SinkExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message as WsMessage;

// ── Frames ─────────────────────────────────────────────────────────────

/// One JSON message from the server to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frame {
    System { text: String },
    Message { role: Role, html: String },
    Typing,
    /// Plain text; the page inserts it with textContent.
    Error { text: String },
}

impl Frame {
    fn bubble(role: Role, text: &str) -> Self {
        Frame::Message { role, html: render_message(role, text) }
    }

    fn to_ws(&self) -> EngineResult<WsMessage> {
        Ok(WsMessage::Text(serde_json::to_string(self)?))
    }
}

#[derive(Deserialize)]
struct Incoming {
    #[serde(default)]
    text: String,
}

/// Message text from a client frame. Anything that is not a JSON object is
/// taken literally.
fn incoming_text(raw: &str) -> String {
    match serde_json::from_str::<Incoming>(raw) {
        Ok(incoming) => incoming.text,
        Err(_) => raw.to_string(),
    }
}

/// Ask the provider and turn the outcome into the frame that closes the turn.
pub(crate) async fn answer(provider: &dyn ChatProvider, user_text: &str) -> Frame {
    match provider.generate(user_text).await {
        Ok(reply) => Frame::bubble(Role::Bot, &reply),
        Err(e) => {
            warn!("[webchat] {} failed: {}", provider.name(), e);
            Frame::Error { text: e.user_message() }
        }
    }
}

// ── Shared state ───────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct BridgeState {
    running: AtomicBool,
    stop: AtomicBool,
    message_count: AtomicU64,
}

pub(crate) struct Shared {
    pub(crate) config: ServerConfig,
    pub(crate) provider: Arc<dyn ChatProvider>,
    pub(crate) state: Arc<BridgeState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatStatus {
    pub running: bool,
    pub address: String,
    pub title: String,
    pub provider: String,
    pub message_count: u64,
}

// ── Public API ─────────────────────────────────────────────────────────

pub struct WebChat {
    listener: TcpListener,
    shared: Arc<Shared>,
}

impl WebChat {
    pub async fn bind(config: ServerConfig, provider: Arc<dyn ChatProvider>) -> EngineResult<Self> {
        let addr = format!("{}:{}", config.bind_address, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| EngineError::channel("webchat", format!("bind {}: {}", addr, e)))?;
        if config.bind_address != "127.0.0.1" && config.bind_address != "localhost" {
            warn!("[webchat] Binding to {}: the chat is reachable from the network", config.bind_address);
        }
        Ok(WebChat {
            listener,
            shared: Arc::new(Shared {
                config,
                provider,
                state: Arc::new(BridgeState::default()),
            }),
        })
    }

    pub fn local_addr(&self) -> EngineResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server and reading its status from elsewhere.
    pub fn handle(&self) -> EngineResult<WebChatHandle> {
        Ok(WebChatHandle {
            address: self.local_addr()?,
            title: self.shared.config.page_title.clone(),
            provider: self.shared.provider.name().to_string(),
            state: self.shared.state.clone(),
        })
    }

    /// Run the accept loop until the stop flag is raised.
    pub async fn serve(self) -> EngineResult<()> {
        let addr = self.local_addr()?;
        info!("[webchat] Listening on http://{}", addr);
        let result = server::run_server(self.listener, self.shared.clone()).await;
        info!("[webchat] Server stopped");
        result
    }
}

#[derive(Clone)]
pub struct WebChatHandle {
    address: SocketAddr,
    title: String,
    provider: String,
    state: Arc<BridgeState>,
}

impl WebChatHandle {
    /// The accept loop notices within a second. Open sockets finish their
    /// current reply and close when the process exits.
    pub fn stop(&self) {
        self.state.stop.store(true, Ordering::Relaxed);
        info!("[webchat] Stop signal sent");
    }

    pub fn status(&self) -> ChatStatus {
        ChatStatus {
            running: self.state.running.load(Ordering::Relaxed),
            address: self.address.to_string(),
            title: self.title.clone(),
            provider: self.provider.clone(),
            message_count: self.state.message_count.load(Ordering::Relaxed),
        }
    }
}

// ── WebSocket Chat Handler ─────────────────────────────────────────────

async fn handle_websocket<S: AsyncRead + AsyncWrite + Unpin>(
    stream: S,
    peer: SocketAddr,
    shared: Arc<Shared>,
) -> EngineResult<()> {
    let ws_stream = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|e| EngineError::channel("webchat", e.to_string()))?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let conn_id = uuid::Uuid::new_v4().simple().to_string();
    let conn_id = &conn_id[..8];
    info!("[webchat] {} connected from {}", conn_id, peer);

    let welcome = Frame::System {
        text: format!(
            "Connected to {}. Send a message to start chatting!",
            shared.config.page_title
        ),
    };
    let _ = ws_sender.send(welcome.to_ws()?).await;

    while let Some(msg) = ws_receiver.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("[webchat] {} socket error: {}", conn_id, e);
                break;
            }
        };

        match msg {
            WsMessage::Text(raw) => {
                let user_text = incoming_text(&raw);
                if user_text.trim().is_empty() {
                    continue;
                }

                shared.state.message_count.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "[webchat] {} says: {}",
                    conn_id,
                    truncate_utf8(&user_text, LOG_PREVIEW_CHARS)
                );

                ws_sender.send(Frame::bubble(Role::User, &user_text).to_ws()?).await
                    .map_err(|e| EngineError::channel("webchat", e.to_string()))?;
                let _ = ws_sender.send(Frame::Typing.to_ws()?).await;

                let reply = answer(shared.provider.as_ref(), &user_text).await;
                if ws_sender.send(reply.to_ws()?).await.is_err() {
                    break;
                }
            }
            WsMessage::Close(_) => {
                info!("[webchat] {} disconnected", conn_id);
                break;
            }
            WsMessage::Ping(data) => {
                let _ = ws_sender.send(WsMessage::Pong(data)).await;
            }
            _ => {}
        }
    }

    Ok(())
}
