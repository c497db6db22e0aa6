//! Terminal output

use console::{style, Term};

/// Writes status lines to stderr and results to stdout.
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a success line
    pub fn success(&self, message: &str) {
        self.status("✓", message, Tone::Green);
    }

    /// Print a warning line
    pub fn warning(&self, message: &str) {
        self.status("⚠", message, Tone::Yellow);
    }

    /// Print an informational line
    pub fn info(&self, message: &str) {
        self.status("ℹ", message, Tone::Blue);
    }

    /// Print a bold header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let line = if self.use_color {
            style(title).bold().to_string()
        } else {
            title.to_string()
        };
        let _ = self.term.write_line(&line);
    }

    fn status(&self, symbol: &str, message: &str, tone: Tone) {
        if self.quiet {
            return;
        }
        let symbol = if self.use_color {
            match tone {
                Tone::Green => style(symbol).green().to_string(),
                Tone::Yellow => style(symbol).yellow().to_string(),
                Tone::Blue => style(symbol).blue().to_string(),
            }
        } else {
            symbol.to_string()
        };
        let _ = self.term.write_line(&format!("{symbol} {message}"));
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Green,
    Yellow,
    Blue,
}

/// Left-align `rows` into columns separated by two spaces.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    for row in std::iter::once(&header_cells).chain(rows) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_is_silent() {
        let reporter = Reporter::new(false, true);
        reporter.success("done");
        reporter.warning("careful");
        reporter.info("fyi");
        reporter.header("Title");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["BUTTON".to_string(), "ButtonDemo".to_string()],
            vec!["FILE_CHOOSER".to_string(), "FileChooserDemo".to_string()],
        ];
        let table = render_table(&["NAME", "WINDOW"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "NAME          WINDOW");
        assert_eq!(lines[1], "BUTTON        ButtonDemo");
        assert_eq!(lines[2], "FILE_CHOOSER  FileChooserDemo");
    }

    #[test]
    fn test_render_table_empty_rows() {
        assert_eq!(render_table(&["A", "B"], &[]), "A  B\n");
    }
}
