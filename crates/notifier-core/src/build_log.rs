//! Build log the notifier writes to.

use std::sync::Mutex;

/// Line-oriented build log.
pub trait BuildLog: Send + Sync {
    /// Append a line to the build log.
    fn println(&self, line: &str);
}

/// Writes build log lines to standard output, where CI runners capture them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutBuildLog;

impl BuildLog for StdoutBuildLog {
    fn println(&self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps build log lines in memory.
#[derive(Debug, Default)]
pub struct MemoryBuildLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryBuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl BuildLog for MemoryBuildLog {
    fn println(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

impl<T: BuildLog + ?Sized> BuildLog for std::sync::Arc<T> {
    fn println(&self, line: &str) {
        (**self).println(line)
    }
}
