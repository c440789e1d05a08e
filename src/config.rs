//! Client configuration.
//!
//! `main.rs` fills this from command-line flags, each of which can also be set
//! through a `CHATCOM_*` environment variable.

use crate::window::TimeStyle;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8888";
pub const DEFAULT_SIGNIN_PATH: &str = "/signin";
pub const DEFAULT_CHAT_PATH: &str = "/chatcom";
pub const DEFAULT_MAX_LINES: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// HTTP base URL of the chat server, without a trailing slash.
    pub base_url: String,
    pub signin_path: String,
    pub chat_path: String,
    /// Log line cap; `None` keeps every line.
    pub max_lines: Option<usize>,
    /// Per-line character limit; `None` disables truncation.
    pub max_line_chars: Option<usize>,
    pub time_style: TimeStyle,
    /// Nickname submitted automatically if the server asks for a login.
    pub nick: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            signin_path: DEFAULT_SIGNIN_PATH.to_owned(),
            chat_path: DEFAULT_CHAT_PATH.to_owned(),
            max_lines: Some(DEFAULT_MAX_LINES),
            max_line_chars: None,
            time_style: TimeStyle::Padded,
            nick: None,
        }
    }
}

impl ClientConfig {
    /// Normalize raw flag values: trailing slashes dropped, paths rooted,
    /// zero limits meaning "no limit", blank nicknames ignored.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            signin_path: rooted(&self.signin_path),
            chat_path: rooted(&self.chat_path),
            max_lines: self.max_lines.filter(|&n| n > 0),
            max_line_chars: self.max_line_chars.filter(|&n| n > 0),
            time_style: self.time_style,
            nick: self
                .nick
                .map(|nick| nick.trim().to_owned())
                .filter(|nick| !nick.is_empty()),
        }
    }

    #[must_use]
    pub fn signin_url(&self) -> String {
        format!("{}{}", self.base_url, self.signin_path)
    }
}

fn rooted(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
