// dashchat Engine: Web Chat Server Core
//
// TCP listener, HTTP routing and stream utilities.

use super::html::{avatar_svg, build_chat_html};
use super::{handle_websocket, Shared};
use crate::atoms::error::{EngineError, EngineResult};
use dashchat_core::Role;
use log::{debug, info, warn};
use serde_json::json;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpListener;

// ── Prefixed Stream (replays buffered bytes then delegates) ────────────

pub(crate) struct PrefixedStream<S> {
    prefix: Vec<u8>,
    pos: usize,
    inner: S,
}

impl<S> PrefixedStream<S> {
    pub fn new(prefix: Vec<u8>, inner: S) -> Self {
        Self { prefix, pos: 0, inner }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for PrefixedStream<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        if this.pos < this.prefix.len() {
            let remaining = &this.prefix[this.pos..];
            let n = remaining.len().min(buf.remaining());
            buf.put_slice(&remaining[..n]);
            this.pos += n;
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for PrefixedStream<S> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }
    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }
    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

pub(crate) trait ChatStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> ChatStream for T {}

// ── Routing ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    WebSocket,
    Avatar(Role),
    Health,
    Page,
    NotFound,
}

fn route(request: &str) -> Route {
    let first_line = request.lines().next().unwrap_or("");
    let mut parts = first_line.split_whitespace();
    let (Some(method), Some(target)) = (parts.next(), parts.next()) else {
        return Route::NotFound;
    };
    if method != "GET" {
        return Route::NotFound;
    }
    let path = target.split('?').next().unwrap_or(target);
    let is_upgrade = request
        .lines()
        .skip(1)
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .any(|(name, value)| {
            name.trim().eq_ignore_ascii_case("upgrade") && value.trim().eq_ignore_ascii_case("websocket")
        });

    match path {
        "/ws" if is_upgrade => Route::WebSocket,
        "/avatar/user.svg" => Route::Avatar(Role::User),
        "/avatar/bot.svg" => Route::Avatar(Role::Bot),
        "/health" => Route::Health,
        p if p.starts_with('/') => Route::Page,
        _ => Route::NotFound,
    }
}

// ── Server Core ────────────────────────────────────────────────────────

pub(crate) async fn run_server(listener: TcpListener, shared: Arc<Shared>) -> EngineResult<()> {
    let state = shared.state.clone();
    state.running.store(true, Ordering::Relaxed);

    loop {
        if state.stop.load(Ordering::Relaxed) {
            break;
        }

        // Accept with timeout so we can check the stop flag
        let accept = tokio::time::timeout(Duration::from_secs(1), listener.accept()).await;

        match accept {
            Ok(Ok((tcp_stream, peer))) => {
                let shared = shared.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(tcp_stream, peer, shared).await {
                        warn!("[webchat] Connection error from {}: {}", peer, e);
                    }
                });
            }
            Ok(Err(e)) => {
                warn!("[webchat] Accept error: {}", e);
            }
            Err(_) => {}
        }
    }

    state.running.store(false, Ordering::Relaxed);
    Ok(())
}

// ── Connection Handler ─────────────────────────────────────────────────

pub(crate) async fn handle_connection<S: ChatStream>(
    mut stream: S,
    peer: SocketAddr,
    shared: Arc<Shared>,
) -> EngineResult<()> {
    // Read the HTTP request (consumed; PrefixedStream replays it for WS)
    let mut buf = vec![0u8; 8192];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Ok(());
    }
    buf.truncate(n);

    let request_str = String::from_utf8_lossy(&buf).into_owned();
    let route = route(&request_str);
    debug!("[webchat] {} {:?}", peer, route);

    match route {
        Route::WebSocket => {
            // Replay the buffered bytes so tungstenite can read the HTTP upgrade
            let prefixed = PrefixedStream::new(buf, stream);
            handle_websocket(prefixed, peer, shared).await
        }
        Route::Avatar(role) => {
            write_response(&mut stream, "200 OK", "image/svg+xml", avatar_svg(role).as_bytes()).await
        }
        Route::Health => {
            let body = json!({
                "ok": true,
                "provider": shared.provider.name(),
                "messages": shared.state.message_count.load(Ordering::Relaxed),
            })
            .to_string();
            write_response(&mut stream, "200 OK", "application/json", body.as_bytes()).await
        }
        Route::Page => {
            let html = build_chat_html(&shared.config.page_title, shared.config.theme);
            write_response(&mut stream, "200 OK", "text/html; charset=utf-8", html.as_bytes()).await
        }
        Route::NotFound => {
            info!("[webchat] 404 for {}", request_str.lines().next().unwrap_or(""));
            write_response(&mut stream, "404 Not Found", "text/plain; charset=utf-8", b"Not Found").await
        }
    }
}

async fn write_response<S: ChatStream>(
    stream: &mut S,
    status: &str,
    content_type: &str,
    body: &[u8],
) -> EngineResult<()> {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    stream
        .write_all(head.as_bytes())
        .await
        .map_err(|e| EngineError::channel("webchat", format!("write {}: {}", status, e)))?;
    stream
        .write_all(body)
        .await
        .map_err(|e| EngineError::channel("webchat", format!("write body: {}", e)))?;
    stream.flush().await?;
    Ok(())
}
