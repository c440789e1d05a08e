//! Chat window model: the scrolling log and the participant list.
//!
//! DESIGN
//! ======
//! The window is the only client-side state. Inbound envelopes mutate it in
//! one of two ways: append a formatted line to the log, or replace the
//! participant list wholesale. Nothing else is kept between envelopes.
//!
//! The log optionally holds a fixed number of lines. When full, the oldest
//! line is removed before the new one is appended, so the length never
//! exceeds the cap.

use std::collections::VecDeque;

use time::{OffsetDateTime, UtcOffset};

use crate::envelope::{Envelope, Package, parse_envelope};

/// How the `H:M:S` prefix of each log line is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeStyle {
    /// `09:05:03`
    #[default]
    Padded,
    /// `9:5:3`
    Bare,
}

/// A change to the window that the renderer should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowUpdate {
    /// A new line was appended to the log.
    Line(String),
    /// The participant list was replaced.
    Participants(Vec<String>),
}

// =============================================================================
// LOG
// =============================================================================

/// Ordered log of rendered lines with an optional length cap.
#[derive(Clone, Debug, Default)]
pub struct ChatLog {
    lines: VecDeque<String>,
    cap: Option<usize>,
}

impl ChatLog {
    /// Create a log. `None` keeps every line; `Some(0)` is treated as `None`.
    #[must_use]
    pub fn new(cap: Option<usize>) -> Self {
        let cap = cap.filter(|&cap| cap > 0);
        Self {
            lines: VecDeque::with_capacity(cap.unwrap_or(0)),
            cap,
        }
    }

    /// Append a line, evicting the oldest first when the log is full.
    pub fn push(&mut self, line: String) -> Option<String> {
        let evicted = match self.cap {
            Some(cap) if self.lines.len() >= cap => self.lines.pop_front(),
            _ => None,
        };
        self.lines.push_back(line);
        evicted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

// =============================================================================
// WINDOW
// =============================================================================

/// The chat log plus the current participant snapshot.
#[derive(Clone, Debug)]
pub struct ChatWindow {
    log: ChatLog,
    participants: Vec<String>,
    time_style: TimeStyle,
    offset: UtcOffset,
}

impl ChatWindow {
    #[must_use]
    pub fn new(cap: Option<usize>, time_style: TimeStyle, offset: UtcOffset) -> Self {
        Self {
            log: ChatLog::new(cap),
            participants: Vec::new(),
            time_style,
            offset,
        }
    }

    #[must_use]
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    #[must_use]
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Parse a raw websocket frame and apply it.
    ///
    /// Frames that do not parse leave the window untouched and yield `None`.
    pub fn apply_text(&mut self, text: &str, received_at: OffsetDateTime) -> Option<WindowUpdate> {
        let envelope = parse_envelope(text)?;
        Some(self.apply(&envelope, received_at))
    }

    /// Apply one envelope. `received_at` stands in for a missing or unreadable
    /// server timestamp.
    pub fn apply(&mut self, envelope: &Envelope, received_at: OffsetDateTime) -> WindowUpdate {
        let at = envelope
            .time
            .as_ref()
            .and_then(crate::envelope::Timestamp::to_datetime)
            .unwrap_or(received_at);

        let text = match &envelope.package {
            Package::ParticipantUpdate(names) => {
                self.participants.clone_from(names);
                return WindowUpdate::Participants(self.participants.clone());
            }
            Package::ParticipantJoined(name) => format!("{name} joined the room."),
            Package::ParticipantLeft(name) => format!("{name} left the room."),
            Package::Message(line) => format!("[{}] {}", line.nick, line.msg),
        };

        let line = format!("[{}] {text}", self.format_time(at));
        self.log.push(line.clone());
        WindowUpdate::Line(line)
    }

    fn format_time(&self, at: OffsetDateTime) -> String {
        format_clock(at.to_offset(self.offset), self.time_style)
    }
}

/// Format the wall-clock part of `at` as `H:M:S`.
#[must_use]
pub fn format_clock(at: OffsetDateTime, style: TimeStyle) -> String {
    let (hours, minutes, seconds) = (at.hour(), at.minute(), at.second());
    match style {
        TimeStyle::Padded => format!("{hours:02}:{minutes:02}:{seconds:02}"),
        TimeStyle::Bare => format!("{hours}:{minutes}:{seconds}"),
    }
}

#[cfg(test)]
#[path = "window_test.rs"]
mod tests;
