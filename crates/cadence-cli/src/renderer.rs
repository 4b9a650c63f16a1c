//! Terminal rendering of the markdown produced by the core display layer.
//!
//! Rich mode styles inline markdown with termimad and colours headings and
//! status lines; plain mode prints the markdown as is.

use std::io::Write;

use anyhow::{Context, Result};
use termimad::{crossterm::style::Color, MadSkin};

const HEADER_COLOR: &str = "\x1b[34m";
const NOTICE_COLOR: &str = "\x1b[33m";
const FAILURE_COLOR: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to stdout
    pub fn render(&self, markdown: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if !self.rich_enabled {
            write!(out, "{markdown}").context("Failed to write output")?;
            return out.flush().context("Failed to flush output");
        }

        for line in markdown.lines() {
            let written = if line.starts_with('#') {
                writeln!(out, "{HEADER_COLOR}{line}{RESET}")
            } else if line.starts_with("Note:") {
                writeln!(out, "{NOTICE_COLOR}{line}{RESET}")
            } else {
                writeln!(out, "{}", self.skin.inline(line))
            };
            written.context("Failed to write output")?;
        }
        out.flush().context("Failed to flush output")
    }

    /// Render an error report to stderr
    pub fn render_error(&self, message: &str) {
        if self.rich_enabled {
            eprintln!("{FAILURE_COLOR}{message}{RESET}");
        } else {
            eprintln!("{message}");
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        renderer.render("# 1. Plan\n\n- Status: in_progress\n").unwrap();
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }
}
