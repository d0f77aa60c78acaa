//! Core analyzer for orchestrating lint execution over a directory tree.

use crate::config::{default_excludes, default_extensions, Config};
use crate::context::FileContext;
use crate::linter::Linter;
use crate::rule::{Rule, RuleBox};
use crate::source::ParseError;
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A source file could not be read or written back.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file is not valid JavaScript or TypeScript.
    #[error("Parse error in {path}: {source}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Position of the first syntax error.
        source: ParseError,
    },

    /// An exclude pattern is not a valid glob.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory traversal failed.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
    fix: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Sets whether fixes are written back to the files (default: false).
    #[must_use]
    pub fn fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let config = self.config.unwrap_or_default();

        let configured = if config.analyzer.exclude.is_empty() {
            default_excludes()
        } else {
            config.analyzer.exclude.clone()
        };
        let excludes = self
            .exclude_patterns
            .iter()
            .chain(&configured)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let extensions = if config.analyzer.extensions.is_empty() {
            default_extensions()
        } else {
            config.analyzer.extensions.clone()
        };

        Ok(Analyzer {
            root,
            excludes,
            extensions,
            respect_gitignore: config.analyzer.respect_gitignore,
            linter: Linter::new(self.rules).with_config(config),
            fail_on_parse_error: self.fail_on_parse_error,
            fix: self.fix,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    excludes: Vec<glob::Pattern>,
    extensions: Vec<String>,
    respect_gitignore: bool,
    linter: Linter,
    fail_on_parse_error: bool,
    fix: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.linter.rules().len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read or
    /// written, or a file fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            match self.analyze_file(file_path) {
                Ok((violations, fixed)) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                    if fixed {
                        result.files_fixed += 1;
                    }
                }
                Err(AnalyzerError::Parse { path, source }) => {
                    warn!("Failed to parse {}: {}", path.display(), source);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, source });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.violations.sort_by(|a, b| {
            let (a, b) = (&a.location, &b.location);
            (&a.file, a.line, a.column).cmp(&(&b.file, b.line, b.column))
        });

        info!(
            "Analysis complete: {} violations in {} files ({} fixed)",
            result.violations.len(),
            result.files_checked,
            result.files_fixed
        );

        Ok(result)
    }

    /// Analyzes a single file, writing fixes back when enabled.
    fn analyze_file(&self, path: &Path) -> Result<(Vec<Violation>, bool), AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let base = if self.root.is_file() {
            self.root.parent().unwrap_or(&self.root)
        } else {
            &self.root
        };
        let ctx = FileContext::new(path, base);
        let parse_error = |source| AnalyzerError::Parse {
            path: path.to_path_buf(),
            source,
        };

        if !self.fix {
            let violations = self
                .linter
                .lint_text(&ctx.relative_path, &content)
                .map_err(parse_error)?;
            return Ok((violations, false));
        }

        let fixed = self
            .linter
            .fix_text(&ctx.relative_path, &content)
            .map_err(parse_error)?;
        let changed = fixed.changed();
        if changed {
            debug!("Writing {} fix pass(es) to {}", fixed.passes, path.display());
            std::fs::write(path, &fixed.output)?;
        }
        Ok((fixed.violations, changed))
    }

    /// Discovers all source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let walker = ignore::WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|ft| ft.is_file()) || !self.has_extension(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }
        files.sort();

        Ok(files)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::Fix;
    use crate::rule::{Report, RuleCategory, RuleListener, RuleMeta, Selector};
    use crate::source::{Node, NodeKind, SourceCode};
    use crate::RuleContext;

    static META: RuleMeta = RuleMeta {
        category: RuleCategory::Layout,
        description: "Removes a space before call arguments",
        fixable: None,
        options: &[],
        messages: &[("space", "Space before arguments.")],
    };

    struct SpaceRule;

    struct SpaceListener<'a> {
        source: &'a SourceCode,
    }

    impl<'a> RuleListener<'a> for SpaceListener<'a> {
        fn selectors(&self) -> Vec<Selector> {
            vec![Selector::enter(NodeKind::CallExpression)]
        }

        fn visit(&mut self, _: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
            let callee = self.source.child_by_field(node, "function");
            let args = self.source.child_by_field(node, "arguments");
            if let (Some(callee), Some(args)) = (callee, args) {
                if callee.range.end < args.range.start {
                    cx.report(
                        Report::new("space", node.loc)
                            .with_fix(Fix::remove(callee.range.end..args.range.start)),
                    );
                }
            }
        }
    }

    impl Rule for SpaceRule {
        fn name(&self) -> &'static str {
            "space-rule"
        }
        fn code(&self) -> &'static str {
            "LL901"
        }
        fn meta(&self) -> &'static RuleMeta {
            &META
        }
        fn create<'a>(&self, source: &'a SourceCode) -> Box<dyn RuleListener<'a> + 'a> {
            Box::new(SpaceListener { source })
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/node_modules/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/project")
            .exclude("**/node_modules/**")
            .exclude("**/dist/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/project/node_modules/x/index.js")));
        assert!(analyzer.should_exclude(Path::new("/project/dist/app.js")));
        assert!(!analyzer.should_exclude(Path::new("/project/src/app.ts")));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_discovers_by_extension_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.ts", "f ();\n");
        write(dir.path(), "src/b.js", "g();\n");
        write(dir.path(), "README.md", "f ();\n");
        write(dir.path(), "node_modules/dep/index.js", "f ();\n");

        let result = Analyzer::builder()
            .root(dir.path())
            .rule(SpaceRule)
            .build()
            .unwrap()
            .analyze()
            .unwrap();

        assert_eq!(result.files_checked, 2);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.file, PathBuf::from("src/a.ts"));
    }

    #[test]
    fn test_skips_unparsable_files_unless_configured() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.js", "f(;\n");

        let result = Analyzer::builder()
            .root(dir.path())
            .rule(SpaceRule)
            .build()
            .unwrap()
            .analyze()
            .unwrap();
        assert_eq!(result.files_checked, 0);

        let err = Analyzer::builder()
            .root(dir.path())
            .rule(SpaceRule)
            .fail_on_parse_error(true)
            .build()
            .unwrap()
            .analyze()
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Parse { .. }));
    }

    #[test]
    fn test_fix_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "app.js", "f (g ());\n");

        let result = Analyzer::builder()
            .root(dir.path())
            .rule(SpaceRule)
            .fix(true)
            .build()
            .unwrap()
            .analyze()
            .unwrap();

        assert_eq!(result.files_fixed, 1);
        assert!(result.violations.is_empty());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "f(g());\n");
    }
}
