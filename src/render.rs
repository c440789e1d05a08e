//! Terminal rendering of window updates.

use std::io::Write;

use crate::error::ChatError;
use crate::window::WindowUpdate;

const ELLIPSIS: &str = "...";

/// Writes window updates to a line-oriented sink.
pub struct Renderer<W> {
    out: W,
    max_line_chars: Option<usize>,
}

impl<W: Write> Renderer<W> {
    /// `max_line_chars` cuts long lines and marks them with `...`.
    pub fn new(out: W, max_line_chars: Option<usize>) -> Self {
        Self {
            out,
            max_line_chars: max_line_chars.filter(|&n| n > 0),
        }
    }

    /// Render one update and flush.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Io`] when the sink rejects the write.
    pub fn render(&mut self, update: &WindowUpdate) -> Result<(), ChatError> {
        match update {
            WindowUpdate::Line(line) => {
                writeln!(self.out, "{}", truncate(line, self.max_line_chars))?;
            }
            WindowUpdate::Participants(names) => {
                writeln!(self.out, "{}", participants_line(names))?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Write a client-side notice that is not part of the chat log.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Io`] when the sink rejects the write.
    pub fn notice(&mut self, text: &str) -> Result<(), ChatError> {
        writeln!(self.out, "-- {text}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Status line for a participant snapshot.
#[must_use]
pub fn participants_line(names: &[String]) -> String {
    format!("-- participants ({}): {}", names.len(), names.join(", "))
}

/// Cut `line` to `max` characters including the ellipsis.
#[must_use]
pub fn truncate(line: &str, max: Option<usize>) -> std::borrow::Cow<'_, str> {
    let Some(max) = max else {
        return line.into();
    };
    if line.chars().count() <= max {
        return line.into();
    }
    if max <= ELLIPSIS.len() {
        return line.chars().take(max).collect::<String>().into();
    }
    let keep = max - ELLIPSIS.len();
    let mut cut: String = line.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut.into()
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
