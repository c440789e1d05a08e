//! Chat websocket: handshake and the message pump.
//!
//! DESIGN
//! ======
//! One socket per run. The pump is a `select!` over two sources:
//! - inbound text frames → parse → apply to the window → render
//! - submitted input lines → one outbound envelope each
//!
//! There is no reconnect, retry, or acknowledgement. A close frame, a
//! transport error, or the end of input ends the session. Failed sends are
//! dropped.

use std::io::Write;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use time::OffsetDateTime;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::envelope::OutboundMessage;
use crate::error::ChatError;
use crate::render::Renderer;
use crate::window::ChatWindow;

pub type ChatSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Counters for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Text frames received.
    pub received: usize,
    /// Envelopes handed to the socket without error.
    pub sent: usize,
    /// Inbound frames that did not parse or were not text.
    pub dropped: usize,
}

/// Websocket URL for the chat endpoint under `base_url`.
///
/// # Errors
///
/// Returns [`ChatError::InvalidBaseUrl`] unless the base URL is `http://` or
/// `https://`.
pub fn chat_url(base_url: &str, path: &str) -> Result<String, ChatError> {
    let base_url = base_url.trim_end_matches('/');
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{rest}{path}"));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{rest}{path}"));
    }

    Err(ChatError::InvalidBaseUrl(base_url.to_owned()))
}

/// Open the chat socket, carrying the session cookie if there is one.
///
/// # Errors
///
/// Returns [`ChatError::WsConnect`] when the handshake fails and
/// [`ChatError::InvalidHeader`] for a cookie that is not a valid header.
pub async fn connect(url: &str, cookie: Option<&str>) -> Result<ChatSocket, ChatError> {
    let mut request = url.into_client_request()?;
    if let Some(cookie) = cookie {
        request
            .headers_mut()
            .insert(COOKIE, HeaderValue::from_str(cookie)?);
    }

    let (socket, response) = connect_async(request).await?;
    info!(%url, status = response.status().as_u16(), "chat: connected");
    Ok(socket)
}

/// Pump messages until the socket closes or the input ends.
///
/// # Errors
///
/// Only rendering and serialization failures are returned; socket trouble
/// ends the session normally.
pub async fn run_session<S, W>(
    socket: S,
    input: &mut mpsc::Receiver<String>,
    window: &mut ChatWindow,
    renderer: &mut Renderer<W>,
) -> Result<SessionSummary, ChatError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Sink<Message, Error = tungstenite::Error> + Unpin,
    W: Write,
{
    let (mut sink, mut stream) = socket.split();
    let mut summary = SessionSummary::default();

    loop {
        tokio::select! {
            frame = stream.next() => {
                let Some(frame) = frame else {
                    info!("chat: socket ended");
                    renderer.notice("connection closed")?;
                    break;
                };
                match frame {
                    Ok(Message::Text(text)) => {
                        summary.received += 1;
                        match window.apply_text(text.as_str(), OffsetDateTime::now_utc()) {
                            Some(update) => renderer.render(&update)?,
                            None => summary.dropped += 1,
                        }
                    }
                    Ok(Message::Binary(bytes)) => {
                        debug!(len = bytes.len(), "chat: dropped binary frame");
                        summary.dropped += 1;
                    }
                    Ok(Message::Close(close)) => {
                        info!(?close, "chat: server closed socket");
                        renderer.notice("connection closed")?;
                        break;
                    }
                    Ok(_) => {}
                    Err(error) => {
                        warn!(%error, "chat: socket error");
                        renderer.notice("connection lost")?;
                        break;
                    }
                }
            }
            line = input.recv() => {
                let Some(line) = line else {
                    debug!("chat: input closed");
                    let _ = sink.close().await;
                    break;
                };
                let payload = OutboundMessage::new(line).to_json()?;
                match sink.send(Message::Text(payload.into())).await {
                    Ok(()) => summary.sent += 1,
                    Err(error) => debug!(%error, "chat: dropped outbound message"),
                }
            }
        }
    }

    info!(
        received = summary.received,
        sent = summary.sent,
        dropped = summary.dropped,
        "chat: session ended"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
