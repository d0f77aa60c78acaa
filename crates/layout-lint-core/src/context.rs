//! Context types for rule execution.

use crate::rule::Report;
use crate::source::SourceCode;
use std::path::{Path, PathBuf};

/// Context provided to rule listeners while a file is walked.
///
/// Gives access to the parsed source and collects the reports of one rule.
#[derive(Debug)]
pub struct RuleContext<'a> {
    /// The file being checked.
    pub source: &'a SourceCode,
    reports: Vec<Report>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for one rule on one file.
    #[must_use]
    pub fn new(source: &'a SourceCode) -> Self {
        Self {
            source,
            reports: Vec::new(),
        }
    }

    /// Records a problem.
    pub fn report(&mut self, report: Report) {
        self.reports.push(report);
    }

    /// Returns the reports recorded so far.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Consumes the context, returning its reports.
    #[must_use]
    pub fn into_reports(self) -> Vec<Report> {
        self.reports
    }
}

/// Metadata about the file being linted.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        Self {
            path,
            relative_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Position, SourceLocation};

    #[test]
    fn test_relative_path() {
        let ctx = FileContext::new(Path::new("/project/src/app.ts"), Path::new("/project"));
        assert_eq!(ctx.relative_path, PathBuf::from("src/app.ts"));

        let outside = FileContext::new(Path::new("/elsewhere/a.js"), Path::new("/project"));
        assert_eq!(outside.relative_path, PathBuf::from("/elsewhere/a.js"));
    }

    #[test]
    fn test_collects_reports() {
        let source = SourceCode::parse("x;").unwrap();
        let mut cx = RuleContext::new(&source);
        let loc = SourceLocation::point(Position::new(1, 0));
        cx.report(Report::new("first", loc));
        cx.report(Report::new("second", loc));
        assert_eq!(cx.reports().len(), 2);
        let ids: Vec<_> = cx.into_reports().iter().map(|r| r.message_id).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
