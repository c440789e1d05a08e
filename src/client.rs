//! One client run: sign in, connect, pump.
//!
//! LIFECYCLE
//! =========
//! 1. Probe `/signin`; prompt for a nickname on `400` and sign in
//! 2. Open exactly one websocket to the chat path with the session cookie
//! 3. Render inbound envelopes and send submitted lines until either side ends

use std::io::{self, BufRead, Write};

use time::UtcOffset;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::connection::{self, SessionSummary};
use crate::error::ChatError;
use crate::render::Renderer;
use crate::session::{self, HttpSession, LinePrompt};
use crate::window::ChatWindow;

const INPUT_QUEUE: usize = 64;

/// Run the client against `config.base_url`.
///
/// `input` yields submitted lines (nickname answers first, chat lines after);
/// `out` receives the prompt and the chat window.
///
/// # Errors
///
/// Returns login, handshake, and terminal failures. A closed socket is a
/// normal end and yields the session summary.
pub async fn run<W>(
    config: &ClientConfig,
    offset: UtcOffset,
    mut input: mpsc::Receiver<String>,
    mut out: W,
) -> Result<SessionSummary, ChatError>
where
    W: Write + Send,
{
    let http = HttpSession::new(&config.signin_url())?;
    let outcome = {
        let mut prompt = LinePrompt::new(&mut input, &mut out, config.nick.clone());
        session::establish(&http, &mut prompt).await?
    };
    info!(?outcome, "chat: session ready");

    let url = connection::chat_url(&config.base_url, &config.chat_path)?;
    let cookie = http.cookie_header(&format!("{}{}", config.base_url, config.chat_path));
    let socket = connection::connect(&url, cookie.as_deref()).await?;

    let mut window = ChatWindow::new(config.max_lines, config.time_style, offset);
    let mut renderer = Renderer::new(&mut out, config.max_line_chars);
    connection::run_session(socket, &mut input, &mut window, &mut renderer).await
}

/// Forward stdin lines into a channel from a dedicated thread.
///
/// The channel closes on end of input or a read error.
#[must_use]
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(INPUT_QUEUE);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "input: stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}
