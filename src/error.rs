//! Client error type.
//!
//! ERROR HANDLING
//! ==============
//! Only failures that stop the client reach this type: a bad base URL, a
//! failed HTTP exchange, a refused websocket handshake, or a closed terminal.
//! Malformed inbound envelopes and failed sends are dropped at the call site
//! and never become a `ChatError`.

/// Errors that end a chat client run.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The base URL is not an `http://` or `https://` URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// An HTTP request to the sign-in endpoint failed to complete.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The session cookie could not be carried onto the websocket handshake.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] tokio_tungstenite::tungstenite::http::header::InvalidHeaderValue),
    /// The websocket handshake failed.
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    /// Reading input or writing the chat window failed.
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
    /// An outbound envelope could not be serialized.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The nickname prompt was closed before a sign-in succeeded.
    #[error("login aborted before a nickname was accepted")]
    LoginAborted,
    /// The session probe answered with a status the client has no path for.
    #[error("session probe returned unhandled status {0}")]
    Unhandled(u16),
}

impl From<tokio_tungstenite::tungstenite::Error> for ChatError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WsConnect(Box::new(error))
    }
}
