use std::path::Path;

use crate::foundation::error::{SlideError, SlideResult};

/// Token that turns a line into a directive (`: verb args...`).
pub const DIRECTIVE_MARKER: &str = ":";
/// First tokens that mark a comment line.
pub const COMMENT_MARKERS: [&str; 2] = ["//", "#"];
/// Synthetic verb carrying a bare line of text.
pub const PRINTLINE_VERB: &str = "printline";

/// One parsed line: `tokens[0]` is always the verb.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Command {
    tokens: Vec<String>,
    /// 1-based source line, for diagnostics.
    line: usize,
}

impl Command {
    pub fn new(tokens: Vec<String>, line: usize) -> SlideResult<Self> {
        if tokens.is_empty() {
            return Err(SlideError::command(format!("line {line}: empty command")));
        }
        Ok(Self { tokens, line })
    }

    pub fn verb(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Require exactly `N` arguments.
    pub fn expect_args<const N: usize>(&self) -> SlideResult<&[String; N]> {
        let args = self.args();
        args.try_into().map_err(|_| {
            SlideError::command(format!(
                "line {}: '{}' takes {N} argument(s), got {}",
                self.line,
                self.verb(),
                args.len()
            ))
        })
    }
}

/// Read and parse a show description from disk.
///
/// Any I/O failure aborts the load; no partial command list is returned.
pub fn load_show(path: &Path) -> SlideResult<Vec<Command>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SlideError::load(format!("read show '{}': {e}", path.display())))?;
    Ok(parse_show(&text))
}

/// Parse show description text into a flat, ordered command list.
pub fn parse_show(text: &str) -> Vec<Command> {
    let mut out = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };

        if COMMENT_MARKERS.contains(&first) {
            continue;
        }

        let tokens: Vec<String> = if first == DIRECTIVE_MARKER {
            tokens.map(str::to_owned).collect()
        } else {
            // keep the whole line so embedded spacing survives
            vec![PRINTLINE_VERB.to_owned(), line.to_owned()]
        };

        match Command::new(tokens, line_no) {
            Ok(cmd) => out.push(cmd),
            Err(err) => tracing::warn!("{err}; skipped"),
        }
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/show/loader.rs"]
mod tests;
