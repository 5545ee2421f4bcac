//! Public diff entry points and their configuration builder.

use super::change::SourceMap;
use super::engine::DiffEngine;
use super::result::DiffResult;
use super::rules::{BreakingRules, DiffMode};
use crate::error::{OasDiffError, Result};
use crate::parsers::{parse_document_with, ParseOptions, ParseResult};
use std::path::{Path, PathBuf};

/// Compare two documents by file path with default settings.
///
/// Parses both files, then delegates to [`diff_parsed`].
pub fn diff(source_path: impl AsRef<Path>, target_path: impl AsRef<Path>) -> Result<DiffResult> {
    DiffOptions::new()
        .with_source_file_path(source_path.as_ref())
        .with_target_file_path(target_path.as_ref())
        .run()
}

/// Compare two pre-parsed documents with default settings.
pub fn diff_parsed(source: &ParseResult, target: &ParseResult) -> Result<DiffResult> {
    DiffEngine::new().diff(source, target)
}

enum DocInput {
    Path(PathBuf),
    Parsed(Box<ParseResult>),
}

/// Composable configuration for a diff call.
///
/// Exactly one source and one target input must be supplied; giving a
/// side twice (or a path and a parsed envelope together) is a
/// validation error at [`DiffOptions::run`].
///
/// # Example
///
/// ```no_run
/// use oas_tools::diff::{BreakingRules, DiffMode, DiffOptions};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let result = DiffOptions::new()
///         .with_source_file_path("old/openapi.yaml")
///         .with_target_file_path("new/openapi.yaml")
///         .with_mode(DiffMode::Breaking)
///         .with_breaking_rules(BreakingRules::strict())
///         .run()?;
///
///     if result.has_breaking_changes {
///         for change in &result.changes {
///             eprintln!("{}", change.to_warning_string());
///         }
///     }
///     Ok(())
/// }
/// ```
#[must_use]
pub struct DiffOptions {
    mode: DiffMode,
    include_info: bool,
    user_agent: Option<String>,
    rules: BreakingRules,
    source: Option<DocInput>,
    target: Option<DocInput>,
    source_overspecified: bool,
    target_overspecified: bool,
    source_map: Option<SourceMap>,
    target_map: Option<SourceMap>,
}

impl DiffOptions {
    /// Start an empty option set.
    pub fn new() -> Self {
        Self {
            mode: DiffMode::Breaking,
            include_info: true,
            user_agent: None,
            rules: BreakingRules::new(),
            source: None,
            target: None,
            source_overspecified: false,
            target_overspecified: false,
            source_map: None,
            target_map: None,
        }
    }

    /// Read the source document from a file.
    pub fn with_source_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.set_source(DocInput::Path(path.into()));
        self
    }

    /// Read the target document from a file.
    pub fn with_target_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.set_target(DocInput::Path(path.into()));
        self
    }

    /// Use an already-parsed source envelope.
    pub fn with_source_parsed(mut self, result: ParseResult) -> Self {
        self.set_source(DocInput::Parsed(Box::new(result)));
        self
    }

    /// Use an already-parsed target envelope.
    pub fn with_target_parsed(mut self, result: ParseResult) -> Self {
        self.set_target(DocInput::Parsed(Box::new(result)));
        self
    }

    /// Set the operational mode.
    pub fn with_mode(mut self, mode: DiffMode) -> Self {
        self.mode = mode;
        self
    }

    /// Keep or strip info-severity changes.
    pub fn with_include_info(mut self, include: bool) -> Self {
        self.include_info = include;
        self
    }

    /// User agent forwarded to the parser layer.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Attach a source-side location map.
    pub fn with_source_map(mut self, map: SourceMap) -> Self {
        self.source_map = Some(map);
        self
    }

    /// Attach a target-side location map.
    pub fn with_target_map(mut self, map: SourceMap) -> Self {
        self.target_map = Some(map);
        self
    }

    /// Set the severity override table.
    pub fn with_breaking_rules(mut self, rules: BreakingRules) -> Self {
        self.rules = rules;
        self
    }

    fn set_source(&mut self, input: DocInput) {
        if self.source.is_some() {
            self.source_overspecified = true;
        } else {
            self.source = Some(input);
        }
    }

    fn set_target(&mut self, input: DocInput) {
        if self.target.is_some() {
            self.target_overspecified = true;
        } else {
            self.target = Some(input);
        }
    }

    /// Validate the option set and run the diff.
    pub fn run(self) -> Result<DiffResult> {
        if self.source_overspecified {
            return Err(OasDiffError::validation(
                "must specify exactly one source (path or parsed, not both)",
            ));
        }
        if self.target_overspecified {
            return Err(OasDiffError::validation(
                "must specify exactly one target (path or parsed, not both)",
            ));
        }
        let source = self
            .source
            .ok_or_else(|| OasDiffError::validation("must specify exactly one source"))?;
        let target = self
            .target
            .ok_or_else(|| OasDiffError::validation("must specify exactly one target"))?;

        let parse_options = ParseOptions {
            user_agent: self.user_agent.clone(),
            ..ParseOptions::default()
        };
        let source = resolve_input(source, &parse_options)?;
        let target = resolve_input(target, &parse_options)?;

        let mut engine = DiffEngine::new()
            .with_mode(self.mode)
            .with_include_info(self.include_info)
            .with_breaking_rules(self.rules);
        if let Some(map) = self.source_map {
            engine = engine.with_source_map(map);
        }
        if let Some(map) = self.target_map {
            engine = engine.with_target_map(map);
        }
        engine.diff(&source, &target)
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_input(input: DocInput, options: &ParseOptions) -> Result<ParseResult> {
    match input {
        DocInput::Path(path) => parse_document_with(&path, options),
        DocInput::Parsed(result) => Ok(*result),
    }
}
