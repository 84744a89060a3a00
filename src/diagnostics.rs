//! Diagnostic sink threaded through the lexer, parser, and post-processor.
//!
//! Lexical and syntactic problems trigger entry-level recovery, semantic
//! problems never abort parsing, and internal problems indicate a bug in
//! this crate rather than bad input.

use std::fmt;

/// Severity of a single diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Severity {
    Notice,
    Warning,
    SyntaxError,
    InternalError,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::SyntaxError => "syntax error",
            Severity::InternalError => "internal error",
        };
        f.write_str(s)
    }
}

/// A single diagnostic: severity, source filename, line, and message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Warning {
    pub severity: Severity,
    pub filename: String,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.filename, self.line, self.severity, self.message
        )
    }
}

/// Anything that can receive diagnostics. A boxed closure satisfies this,
/// a plain `FnMut(Warning)` closure satisfies it too.
pub trait WarningSink {
    fn report(&mut self, warning: Warning);

    fn warning_count(&self) -> usize {
        0
    }
}

impl<F: FnMut(Warning)> WarningSink for F {
    fn report(&mut self, warning: Warning) {
        self(warning)
    }
}

/// A sink that only counts and stores — the default for embedders who just
/// want "did this batch have problems".
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub warnings: Vec<Warning>,
}

impl WarningSink for CollectingSink {
    fn report(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w.severity, Severity::SyntaxError | Severity::InternalError))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_counts() {
        let mut sink = CollectingSink::new();
        sink.report(Warning {
            severity: Severity::Warning,
            filename: "in.bib".into(),
            line: 3,
            message: "undefined macro `foo`".into(),
        });
        assert_eq!(sink.warning_count(), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn syntax_error_counts_as_error() {
        let mut sink = CollectingSink::new();
        sink.report(Warning {
            severity: Severity::SyntaxError,
            filename: "in.bib".into(),
            line: 1,
            message: "missing delimiter".into(),
        });
        assert!(sink.has_errors());
    }
}
