//! Row-granularity progress reporting.

use std::io::Write;

/// Receives compositing progress.
///
/// Closures taking the percentage implement this directly.
pub trait ProgressObserver {
    /// Called before each logical row with its completion percentage.
    fn row_progress(&mut self, percent: u32);

    /// Called once after the last row.
    fn finished(&mut self) {}
}

impl<F: FnMut(u32)> ProgressObserver for F {
    fn row_progress(&mut self, percent: u32) {
        self(percent)
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn row_progress(&mut self, _percent: u32) {}
}

/// Single overwritten `NN%` line, terminated by a newline when done.
///
/// Write errors are ignored: progress is informational only.
pub struct ConsoleProgress<W: Write> {
    out: W,
    last: Option<u32>,
}

impl ConsoleProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressObserver for ConsoleProgress<W> {
    fn row_progress(&mut self, percent: u32) {
        // Tall maps repeat the same percentage for many rows.
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        let _ = write!(self.out, "\r{percent}%");
        let _ = self.out.flush();
    }

    fn finished(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_overwrites_single_line() {
        let mut progress = ConsoleProgress::new(Vec::new());
        for percent in [0, 0, 50, 100] {
            progress.row_progress(percent);
        }
        progress.finished();

        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert_eq!(text, "\r0%\r50%\r100%\n");
    }

    #[test]
    fn test_closure_observer_sees_every_call() {
        let mut seen = Vec::new();
        {
            let mut observer = |p: u32| seen.push(p);
            observer.row_progress(0);
            observer.row_progress(0);
            observer.finished();
        }
        assert_eq!(seen, vec![0, 0]);
    }
}
