//! Sign-in handshake that runs before the chat socket is opened.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server keeps the session in a cookie. `GET /signin` answers success
//! when the cookie is valid and `400` when it is not; `POST /signin` with a
//! `nick` form field creates the session. The cookie jar used here is later
//! read back so the websocket handshake carries the same session.
//!
//! FLOW
//! ====
//! 1. Probe. Success → done, no prompt.
//! 2. `400` → ask for a nickname. Every answer is one `POST /signin`.
//! 3. Accepted → done. Rejected or failed → ask again.
//! 4. Prompt closed → `LoginAborted`. Any other probe status → `Unhandled`.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::cookie::{CookieStore, Jar};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::ChatError;

/// Result of the session probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The session cookie is valid.
    Authenticated,
    /// The server wants a nickname first.
    LoginRequired,
    /// Any other status; the client has no path for it.
    Unhandled(u16),
}

/// How the client got its session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    AlreadySignedIn,
    SignedIn { nick: String },
}

/// HTTP side of the handshake.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Check whether the current session is valid.
    async fn probe(&self) -> Result<ProbeOutcome, ChatError>;

    /// Submit a nickname. `Ok(false)` means the server refused it.
    async fn sign_in(&self, nick: &str) -> Result<bool, ChatError>;
}

/// Source of nicknames while the login prompt is open.
#[async_trait]
pub trait NickPrompt: Send {
    /// Show the prompt and wait for an answer. `None` means the input closed.
    async fn ask(&mut self) -> Result<Option<String>, ChatError>;

    /// Tell the user the last answer was not accepted.
    fn rejected(&mut self, _nick: &str) {}
}

/// Map the probe's HTTP status onto the handshake.
#[must_use]
pub fn probe_outcome(status: StatusCode) -> ProbeOutcome {
    if status.is_success() {
        ProbeOutcome::Authenticated
    } else if status == StatusCode::BAD_REQUEST {
        ProbeOutcome::LoginRequired
    } else {
        ProbeOutcome::Unhandled(status.as_u16())
    }
}

/// Run the handshake until a session exists.
///
/// # Errors
///
/// Returns [`ChatError::LoginAborted`] when the prompt closes,
/// [`ChatError::Unhandled`] for an unexpected probe status, and transport
/// errors from the probe itself.
pub async fn establish<A, P>(api: &A, prompt: &mut P) -> Result<LoginOutcome, ChatError>
where
    A: SessionApi + ?Sized,
    P: NickPrompt + ?Sized,
{
    match api.probe().await? {
        ProbeOutcome::Authenticated => {
            info!("session: existing session accepted");
            return Ok(LoginOutcome::AlreadySignedIn);
        }
        ProbeOutcome::LoginRequired => {
            debug!("session: login required");
        }
        ProbeOutcome::Unhandled(status) => return Err(ChatError::Unhandled(status)),
    }

    loop {
        let Some(nick) = prompt.ask().await? else {
            return Err(ChatError::LoginAborted);
        };

        match api.sign_in(&nick).await {
            Ok(true) => {
                info!(%nick, "session: signed in");
                return Ok(LoginOutcome::SignedIn { nick });
            }
            Ok(false) => {
                debug!(%nick, "session: sign-in refused");
                prompt.rejected(&nick);
            }
            Err(error) => {
                warn!(%nick, %error, "session: sign-in request failed");
                prompt.rejected(&nick);
            }
        }
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// `reqwest` client holding the session cookie jar.
pub struct HttpSession {
    client: reqwest::Client,
    jar: Arc<Jar>,
    signin_url: reqwest::Url,
}

impl HttpSession {
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidBaseUrl`] for an unparseable URL and
    /// [`ChatError::Http`] if the client cannot be built.
    pub fn new(signin_url: &str) -> Result<Self, ChatError> {
        let signin_url = reqwest::Url::parse(signin_url)
            .map_err(|_| ChatError::InvalidBaseUrl(signin_url.to_owned()))?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;
        Ok(Self {
            client,
            jar,
            signin_url,
        })
    }

    /// `Cookie` header value the jar holds for `url`, if any.
    ///
    /// Pass the `http(s)://` form of the chat endpoint; `HttpOnly` session
    /// cookies never match a `ws://` URL.
    #[must_use]
    pub fn cookie_header(&self, url: &str) -> Option<String> {
        let url = reqwest::Url::parse(url).ok()?;
        let value = self.jar.cookies(&url)?;
        value.to_str().ok().map(ToOwned::to_owned)
    }
}

#[async_trait]
impl SessionApi for HttpSession {
    async fn probe(&self) -> Result<ProbeOutcome, ChatError> {
        let response = self.client.get(self.signin_url.clone()).send().await?;
        let outcome = probe_outcome(response.status());
        debug!(status = response.status().as_u16(), ?outcome, "session: probe");
        Ok(outcome)
    }

    async fn sign_in(&self, nick: &str) -> Result<bool, ChatError> {
        let response = self
            .client
            .post(self.signin_url.clone())
            .form(&[("nick", nick)])
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}

// =============================================================================
// PROMPT
// =============================================================================

/// Nickname prompt fed by submitted input lines.
///
/// A preset nickname is answered once without showing the prompt.
pub struct LinePrompt<'a, W> {
    lines: &'a mut mpsc::Receiver<String>,
    out: &'a mut W,
    preset: Option<String>,
}

impl<'a, W: Write + Send> LinePrompt<'a, W> {
    pub fn new(lines: &'a mut mpsc::Receiver<String>, out: &'a mut W, preset: Option<String>) -> Self {
        Self { lines, out, preset }
    }
}

#[async_trait]
impl<'a, W: Write + Send> NickPrompt for LinePrompt<'a, W> {
    async fn ask(&mut self) -> Result<Option<String>, ChatError> {
        if let Some(nick) = self.preset.take() {
            return Ok(Some(nick));
        }
        write!(self.out, "nickname: ")?;
        self.out.flush()?;
        Ok(self.lines.recv().await.map(|line| line.trim().to_owned()))
    }

    fn rejected(&mut self, nick: &str) {
        // Best effort; the prompt is shown again either way.
        let _ = writeln!(self.out, "-- nickname {nick:?} was not accepted");
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
