//! Console collaborator receiving lifecycle notices.

use std::sync::{Arc, Mutex, PoisonError};

/// Line-oriented sink for messages addressed to the host operator.
pub trait Console: Send {
    fn write_line(&mut self, line: &str);
}

/// Writes lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Keeps lines in memory. Clones share the same buffer.
///
/// # Example
///
/// ```
/// use exthost_core::{BufferConsole, ExtensionHost};
///
/// let console = BufferConsole::new();
/// let host = ExtensionHost::with_console(console.clone());
/// # drop(host);
/// assert!(console.lines().is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Console for BufferConsole {
    fn write_line(&mut self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
