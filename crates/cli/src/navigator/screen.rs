//! Terminal repaint helpers for the navigator
//!
//! The screen writes breadcrumbs, the pending-operation line and the
//! operation log between menu prompts. It never holds more than one pending
//! indicator: starting a new one clears the previous one first.

use std::io::{self, Write};

use console::Style;

use super::oplog::{LogKind, OperationLog};
use crate::output::{Spinner, paint};

/// Erase the current line and return to column 0
const CLEAR_LINE: &str = "\x1b[2K\x1b[G";

/// Move up one line, then erase it
const CLEAR_LINE_ABOVE: &str = "\x1b[1A\x1b[2K\x1b[G";

enum Pending {
    Idle,
    Static,
    Animated(Spinner),
}

/// Navigator output sink
pub struct Screen<W: Write> {
    out: W,
    colors: bool,
    animate: bool,
    pending: Pending,
}

impl<W: Write> Screen<W> {
    /// Screen writing plain pending lines
    pub fn new(out: W, colors: bool) -> Self {
        Self {
            out,
            colors,
            animate: false,
            pending: Pending::Idle,
        }
    }

    /// Draw pending operations with an animated spinner
    pub fn with_spinner(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Show `message...` as the pending line
    pub fn show_progress(&mut self, message: &str) -> io::Result<()> {
        self.clear_progress()?;

        if self.animate {
            self.out.flush()?;
            self.pending = Pending::Animated(Spinner::start(message));
        } else {
            let line = format!("⏳ {message}...");
            write!(self.out, "{}", paint(line, Style::new().yellow(), self.colors))?;
            self.out.flush()?;
            self.pending = Pending::Static;
        }
        Ok(())
    }

    /// Erase the pending line in place; a no-op when nothing is pending
    pub fn clear_progress(&mut self) -> io::Result<()> {
        match std::mem::replace(&mut self.pending, Pending::Idle) {
            Pending::Idle => {}
            Pending::Static => {
                write!(self.out, "{CLEAR_LINE}")?;
                self.out.flush()?;
            }
            Pending::Animated(spinner) => spinner.finish_and_clear(),
        }
        Ok(())
    }

    /// Replace the summary line a prompt left behind
    pub fn overwrite_last_menu_line(&mut self, text: &str) -> io::Result<()> {
        self.clear_progress()?;
        writeln!(self.out, "{CLEAR_LINE_ABOVE}{text}")?;
        self.out.flush()
    }

    /// Print every entry with its marker and empty the log
    pub fn flush_operation_log(&mut self, log: &mut OperationLog) -> io::Result<()> {
        self.clear_progress()?;

        for entry in log.drain() {
            let (marker, style) = match entry.kind {
                LogKind::Success => ("✓", Style::new().green()),
                LogKind::Error => ("✗", Style::new().red()),
                LogKind::Info => ("·", Style::new().dim()),
            };
            let line = format!(" {marker} {}", entry.message);
            writeln!(self.out, "{}", paint(line, style, self.colors))?;
        }
        self.out.flush()
    }

    /// Print an error that ends the session
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.clear_progress()?;
        let line = format!("✗ {message}");
        writeln!(self.out, "{}", paint(line, Style::new().red(), self.colors))?;
        self.out.flush()
    }

    /// Print a warning, e.g. a rejected input
    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.clear_progress()?;
        let line = format!("⚠ {message}");
        writeln!(self.out, "{}", paint(line, Style::new().yellow(), self.colors))?;
        self.out.flush()
    }

    /// Underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(screen: &Screen<Vec<u8>>) -> String {
        String::from_utf8(screen.writer().clone()).unwrap()
    }

    #[test]
    fn test_progress_is_cleared_in_place() {
        let mut screen = Screen::new(Vec::new(), false);
        screen.show_progress("Listing /").unwrap();
        assert!(!matches!(screen.pending, Pending::Idle));
        screen.clear_progress().unwrap();
        assert!(matches!(screen.pending, Pending::Idle));

        assert_eq!(text(&screen), "⏳ Listing /...\x1b[2K\x1b[G");
    }

    #[test]
    fn test_second_progress_clears_first() {
        let mut screen = Screen::new(Vec::new(), false);
        screen.show_progress("Downloading a").unwrap();
        screen.show_progress("Downloading b").unwrap();

        assert_eq!(
            text(&screen),
            "⏳ Downloading a...\x1b[2K\x1b[G⏳ Downloading b..."
        );
    }

    #[test]
    fn test_clear_without_progress_writes_nothing() {
        let mut screen = Screen::new(Vec::new(), false);
        screen.clear_progress().unwrap();
        assert!(text(&screen).is_empty());
    }

    #[test]
    fn test_overwrite_last_menu_line() {
        let mut screen = Screen::new(Vec::new(), false);
        screen.overwrite_last_menu_line("<- back").unwrap();
        assert_eq!(text(&screen), "\x1b[1A\x1b[2K\x1b[G<- back\n");
    }

    #[test]
    fn test_flush_operation_log_marks_each_kind() {
        let mut log = OperationLog::new();
        log.success("Deleted file \"b.txt\"");
        log.error("Download failed: c.txt - timed out");
        log.info("Nothing to do");

        let mut screen = Screen::new(Vec::new(), false);
        screen.flush_operation_log(&mut log).unwrap();

        assert!(log.is_empty());
        assert_eq!(
            text(&screen),
            concat!(
                " ✓ Deleted file \"b.txt\"\n",
                " ✗ Download failed: c.txt - timed out\n",
                " · Nothing to do\n",
            )
        );
    }

    #[test]
    fn test_flush_clears_pending_line_first() {
        let mut log = OperationLog::new();
        log.success("done");

        let mut screen = Screen::new(Vec::new(), false);
        screen.show_progress("Working").unwrap();
        screen.flush_operation_log(&mut log).unwrap();

        assert!(matches!(screen.pending, Pending::Idle));
        assert_eq!(text(&screen), "⏳ Working...\x1b[2K\x1b[G ✓ done\n");
    }

    #[test]
    fn test_colored_log_uses_escape_codes() {
        let mut log = OperationLog::new();
        log.error("boom");

        let mut screen = Screen::new(Vec::new(), true);
        screen.flush_operation_log(&mut log).unwrap();
        let out = text(&screen);
        assert!(out.contains("\x1b[31m"));
        assert!(out.contains("boom"));
    }
}
