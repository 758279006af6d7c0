//! Clipboard writes through the OSC 52 terminal escape.
//!
//! Works over SSH and inside tmux (with `set-clipboard on`) without a
//! platform clipboard library. Terminals that don't support OSC 52 ignore
//! the sequence.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::{self, Write};

/// The OSC 52 sequence that puts `text` on the system clipboard.
pub fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Terminal stream that receives the clipboard sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    Stderr,
}

/// Pick the stream for the sequence. A redirected stdout never gets it.
pub fn sink(stdout_is_terminal: bool, stderr_is_terminal: bool) -> Option<Sink> {
    if stdout_is_terminal {
        Some(Sink::Stdout)
    } else if stderr_is_terminal {
        Some(Sink::Stderr)
    } else {
        None
    }
}

/// Write the OSC 52 sequence for `text` to `out` and flush.
pub fn copy_to(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(osc52(text).as_bytes())?;
    out.flush()
}
