//! Syntax highlighting with tree-sitter
//!
//! # Design
//! - **Whole-document passes**: a document is re-tokenized in one go after its
//!   debounce window elapses; the result replaces the previous styled lines.
//! - **Detect once**: the grammar is resolved from filename + content on the
//!   first pass and cached by the caller. Detection failure means plain text.
//! - **Theme independence**: spans store a [`HighlightCategory`], not a color,
//!   so switching themes never requires re-tokenizing.
//!
//! The grammar detector and tokenizer are traits so that tests (or a future
//! TextMate backend) can swap them out.

use crate::view::theme::Theme;
use parking_lot::Mutex;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter as TSHighlighter};

/// Documents larger than this are shown as plain text
pub const MAX_HIGHLIGHT_BYTES: usize = 4 * 1024 * 1024;

/// Highlight names handed to `HighlightConfiguration::configure` for default languages.
const DEFAULT_HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "function",
    "keyword",
    "number",
    "operator",
    "property",
    "string",
    "type",
    "variable",
];

/// TypeScript has more categories; they are folded onto the default set.
const TYPESCRIPT_HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "embedded",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "number",
    "operator",
    "property",
    "punctuation.bracket",
    "punctuation.delimiter",
    "punctuation.special",
    "string",
    "string.special",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

/// Highlight category names used for default languages.
/// Index 0 = attribute, 1 = comment, 2 = constant, 3 = function, 4 = keyword,
/// 5 = number, 6 = operator, 7 = property, 8 = string, 9 = type, 10 = variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightCategory {
    Attribute,
    Comment,
    Constant,
    Function,
    Keyword,
    Number,
    Operator,
    Property,
    String,
    Type,
    Variable,
}

impl HighlightCategory {
    /// Map a default language highlight index to a category
    fn from_default_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Attribute),
            1 => Some(Self::Comment),
            2 => Some(Self::Constant),
            3 => Some(Self::Function),
            4 => Some(Self::Keyword),
            5 => Some(Self::Number),
            6 => Some(Self::Operator),
            7 => Some(Self::Property),
            8 => Some(Self::String),
            9 => Some(Self::Type),
            10 => Some(Self::Variable),
            _ => None,
        }
    }

    /// Map a TypeScript highlight index to a category.
    fn from_typescript_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Attribute),
            1 => Some(Self::Comment),
            2 | 3 => Some(Self::Constant),
            4 => Some(Self::Type),      // constructor
            5 => Some(Self::String),    // embedded (template substitutions)
            6..=8 => Some(Self::Function),
            9 => Some(Self::Keyword),
            10 => Some(Self::Number),
            11 => Some(Self::Operator),
            12 => Some(Self::Property),
            13 | 14 => Some(Self::Operator), // punctuation
            15 => Some(Self::Constant), // punctuation.special (template ${})
            16 | 17 => Some(Self::String),
            18 | 19 => Some(Self::Type),
            20 => Some(Self::Variable),
            21 => Some(Self::Constant), // this, super, arguments
            22 => Some(Self::Variable),
            _ => None,
        }
    }

    /// Get the color for this category from the theme
    pub fn color(&self, theme: &Theme) -> Color {
        match self {
            Self::Attribute => theme.syntax_constant,
            Self::Comment => theme.syntax_comment,
            Self::Constant => theme.syntax_constant,
            Self::Function => theme.syntax_function,
            Self::Keyword => theme.syntax_keyword,
            Self::Number => theme.syntax_constant,
            Self::Operator => theme.syntax_operator,
            Self::Property => theme.syntax_variable, // Properties are like variables
            Self::String => theme.syntax_string,
            Self::Type => theme.syntax_type,
            Self::Variable => theme.syntax_variable,
        }
    }
}

/// Grammar used to tokenize a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    C,
    Cpp,
    Go,
    Json,
    Java,
    Ruby,
    Bash,
    Lua,
    /// No-op grammar: every line is a single unstyled span
    PlainText,
}

impl Language {
    /// Detect language from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "rs" => Some(Self::Rust),
            "py" | "pyw" => Some(Self::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            "c" | "h" => Some(Self::C),
            "cpp" | "hpp" | "cc" | "hh" | "cxx" | "hxx" => Some(Self::Cpp),
            "go" => Some(Self::Go),
            "json" => Some(Self::Json),
            "java" => Some(Self::Java),
            "rb" => Some(Self::Ruby),
            "sh" | "bash" => Some(Self::Bash),
            "lua" => Some(Self::Lua),
            "txt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Detect language from a `#!` interpreter line at the top of the content
    pub fn from_shebang(content: &str) -> Option<Self> {
        let first = content.lines().next()?.strip_prefix("#!")?;
        let mut words = first.split_whitespace();
        let mut interpreter = words.next()?.rsplit('/').next()?;
        if interpreter == "env" {
            interpreter = words.find(|w| !w.starts_with('-'))?;
        }
        let interpreter = interpreter.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
        match interpreter {
            "python" => Some(Self::Python),
            "sh" | "bash" | "zsh" | "dash" => Some(Self::Bash),
            "node" | "nodejs" => Some(Self::JavaScript),
            "ruby" => Some(Self::Ruby),
            "lua" | "luajit" => Some(Self::Lua),
            _ => None,
        }
    }

    /// Human readable name (shown in the status line)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rust => "Rust",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Go => "Go",
            Self::Json => "JSON",
            Self::Java => "Java",
            Self::Ruby => "Ruby",
            Self::Bash => "Bash",
            Self::Lua => "Lua",
            Self::PlainText => "Plain Text",
        }
    }

    /// Get tree-sitter highlight configuration for this language.
    /// Plain text has none.
    fn highlight_config(&self) -> Result<Option<HighlightConfiguration>, HighlightError> {
        let config = match self {
            Self::PlainText => return Ok(None),
            Self::Rust => configured(
                *self,
                tree_sitter_rust::LANGUAGE.into(),
                "rust",
                tree_sitter_rust::HIGHLIGHTS_QUERY,
                "",
            )?,
            Self::Python => configured(
                *self,
                tree_sitter_python::LANGUAGE.into(),
                "python",
                tree_sitter_python::HIGHLIGHTS_QUERY,
                "",
            )?,
            Self::JavaScript => configured(
                *self,
                tree_sitter_javascript::LANGUAGE.into(),
                "javascript",
                tree_sitter_javascript::HIGHLIGHT_QUERY,
                "",
            )?,
            Self::TypeScript => {
                // TypeScript-specific highlights first (higher priority), then the JS base
                let combined_highlights = format!(
                    "{}\n{}",
                    tree_sitter_typescript::HIGHLIGHTS_QUERY,
                    tree_sitter_javascript::HIGHLIGHT_QUERY
                );
                configured(
                    *self,
                    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
                    "typescript",
                    &combined_highlights,
                    tree_sitter_typescript::LOCALS_QUERY,
                )?
            }
            Self::C => configured(
                *self,
                tree_sitter_c::LANGUAGE.into(),
                "c",
                tree_sitter_c::HIGHLIGHT_QUERY,
                "",
            )?,
            Self::Cpp => configured(
                *self,
                tree_sitter_cpp::LANGUAGE.into(),
                "cpp",
                tree_sitter_cpp::HIGHLIGHT_QUERY,
                "",
            )?,
            Self::Go => configured(
                *self,
                tree_sitter_go::LANGUAGE.into(),
                "go",
                tree_sitter_go::HIGHLIGHTS_QUERY,
                "",
            )?,
            Self::Json => configured(
                *self,
                tree_sitter_json::LANGUAGE.into(),
                "json",
                tree_sitter_json::HIGHLIGHTS_QUERY,
                "",
            )?,
            Self::Java => configured(
                *self,
                tree_sitter_java::LANGUAGE.into(),
                "java",
                tree_sitter_java::HIGHLIGHTS_QUERY,
                "",
            )?,
            Self::Ruby => configured(
                *self,
                tree_sitter_ruby::LANGUAGE.into(),
                "ruby",
                tree_sitter_ruby::HIGHLIGHTS_QUERY,
                "",
            )?,
            Self::Bash => configured(
                *self,
                tree_sitter_bash::LANGUAGE.into(),
                "bash",
                tree_sitter_bash::HIGHLIGHT_QUERY, // singular, not plural
                "",
            )?,
            Self::Lua => configured(
                *self,
                tree_sitter_lua::LANGUAGE.into(),
                "lua",
                tree_sitter_lua::HIGHLIGHTS_QUERY,
                "",
            )?,
        };
        Ok(Some(config))
    }

    /// Map tree-sitter highlight index to a highlight category
    fn highlight_category(&self, index: usize) -> Option<HighlightCategory> {
        match self {
            Self::TypeScript => HighlightCategory::from_typescript_index(index),
            _ => HighlightCategory::from_default_index(index),
        }
    }
}

fn configured(
    language: Language,
    ts_language: tree_sitter::Language,
    name: &str,
    highlights_query: &str,
    locals_query: &str,
) -> Result<HighlightConfiguration, HighlightError> {
    let mut config =
        HighlightConfiguration::new(ts_language, name, highlights_query, "", locals_query)
            .map_err(|e| HighlightError::Config {
                language,
                message: e.to_string(),
            })?;
    match language {
        Language::TypeScript => config.configure(TYPESCRIPT_HIGHLIGHT_NAMES),
        _ => config.configure(DEFAULT_HIGHLIGHT_NAMES),
    }
    Ok(config)
}

/// Errors from grammar detection or tokenization.
///
/// None of these are surfaced to the user; callers fall back to plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// No grammar matched the filename or content
    GrammarNotFound(PathBuf),
    /// The tree-sitter query for a grammar failed to compile
    Config { language: Language, message: String },
    /// The tokenizer gave up part way through
    Tokenize(String),
    /// The text is larger than [`MAX_HIGHLIGHT_BYTES`]
    TooLarge(usize),
}

impl std::fmt::Display for HighlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GrammarNotFound(path) => {
                write!(f, "no grammar found for {}", path.display())
            }
            Self::Config { language, message } => write!(
                f,
                "failed to create {} highlight config: {}",
                language.name(),
                message
            ),
            Self::Tokenize(message) => write!(f, "tokenization failed: {message}"),
            Self::TooLarge(len) => write!(
                f,
                "text too large to highlight ({len} bytes, limit {MAX_HIGHLIGHT_BYTES})"
            ),
        }
    }
}

impl std::error::Error for HighlightError {}

/// A run of source text produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRun {
    pub category: Option<HighlightCategory>,
    pub text: String,
}

/// A run of text within one line, tagged with its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub category: Option<HighlightCategory>,
}

/// One display line made of styled spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// A line with no styling at all
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![StyledSpan {
                text,
                category: None,
            }],
        }
    }

    /// Append text, merging with the previous span when the category matches
    pub fn push(&mut self, text: &str, category: Option<HighlightCategory>) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.category == category {
                last.text.push_str(text);
                return;
            }
        }
        self.spans.push(StyledSpan {
            text: text.to_string(),
            category,
        });
    }

    /// The line's text without styling
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Whether the line's text equals `raw` (used to detect stale highlight results)
    pub fn matches(&self, raw: &str) -> bool {
        let mut rest = raw;
        for span in &self.spans {
            match rest.strip_prefix(span.text.as_str()) {
                Some(r) => rest = r,
                None => return false,
            }
        }
        rest.is_empty()
    }

    /// Whether any span carries a highlight category
    pub fn is_highlighted(&self) -> bool {
        self.spans.iter().any(|s| s.category.is_some())
    }
}

/// Split a flat token stream into lines. A run containing newlines is split
/// so its first piece ends the current line and each later piece starts a new one.
pub fn runs_to_lines(runs: &[TokenRun]) -> Vec<StyledLine> {
    let mut lines = vec![StyledLine::default()];
    for run in runs {
        let mut pieces = run.text.split('\n');
        if let Some(first) = pieces.next() {
            if let Some(current) = lines.last_mut() {
                current.push(first, run.category);
            }
        }
        for piece in pieces {
            let mut line = StyledLine::default();
            line.push(piece, run.category);
            lines.push(line);
        }
    }
    lines
}

/// Resolves which grammar applies to a file
pub trait GrammarDetector: Send + Sync {
    fn detect(&self, filename: &Path, sample: &str) -> Result<Language, HighlightError>;
}

/// Turns text into category-tagged runs for a given grammar
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str, language: Language) -> Result<Vec<TokenRun>, HighlightError>;
}

/// Detects by file extension first, then by shebang line
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionDetector;

impl GrammarDetector for ExtensionDetector {
    fn detect(&self, filename: &Path, sample: &str) -> Result<Language, HighlightError> {
        Language::from_path(filename)
            .or_else(|| Language::from_shebang(sample))
            .ok_or_else(|| HighlightError::GrammarNotFound(filename.to_path_buf()))
    }
}

/// Tokenizer backed by tree-sitter-highlight.
///
/// Highlight configurations are expensive to build, so one is cached per language.
#[derive(Default)]
pub struct TreeSitterTokenizer {
    configs: Mutex<HashMap<Language, Arc<HighlightConfiguration>>>,
}

impl TreeSitterTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn config_for(
        &self,
        language: Language,
    ) -> Result<Option<Arc<HighlightConfiguration>>, HighlightError> {
        let mut configs = self.configs.lock();
        if let Some(config) = configs.get(&language) {
            return Ok(Some(config.clone()));
        }
        let Some(config) = language.highlight_config()? else {
            return Ok(None);
        };
        let config = Arc::new(config);
        configs.insert(language, config.clone());
        Ok(Some(config))
    }
}

impl Tokenizer for TreeSitterTokenizer {
    fn tokenize(&self, text: &str, language: Language) -> Result<Vec<TokenRun>, HighlightError> {
        if text.len() > MAX_HIGHLIGHT_BYTES {
            return Err(HighlightError::TooLarge(text.len()));
        }
        let Some(config) = self.config_for(language)? else {
            return Ok(vec![TokenRun {
                category: None,
                text: text.to_string(),
            }]);
        };

        let source = text.as_bytes();
        let mut ts_highlighter = TSHighlighter::new();
        let events = ts_highlighter
            .highlight(&config, source, None, |_| None)
            .map_err(|e| HighlightError::Tokenize(e.to_string()))?;

        let mut runs = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut cursor = 0;
        for event in events {
            match event.map_err(|e| HighlightError::Tokenize(e.to_string()))? {
                HighlightEvent::Source { start, end } => {
                    if start > cursor {
                        runs.push(TokenRun {
                            category: None,
                            text: String::from_utf8_lossy(&source[cursor..start]).into_owned(),
                        });
                    }
                    let category = stack
                        .last()
                        .and_then(|&idx| language.highlight_category(idx));
                    runs.push(TokenRun {
                        category,
                        text: String::from_utf8_lossy(&source[start..end]).into_owned(),
                    });
                    cursor = end;
                }
                HighlightEvent::HighlightStart(s) => stack.push(s.0),
                HighlightEvent::HighlightEnd => {
                    stack.pop();
                }
            }
        }
        if cursor < source.len() {
            runs.push(TokenRun {
                category: None,
                text: String::from_utf8_lossy(&source[cursor..]).into_owned(),
            });
        }
        Ok(runs)
    }
}

/// Grammar detection plus tokenization into styled lines
#[derive(Clone)]
pub struct LexicalHighlighter {
    detector: Arc<dyn GrammarDetector>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for LexicalHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalHighlighter").finish_non_exhaustive()
    }
}

impl Default for LexicalHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalHighlighter {
    /// Extension/shebang detection with the tree-sitter tokenizer
    pub fn new() -> Self {
        Self::with_collaborators(
            Arc::new(ExtensionDetector),
            Arc::new(TreeSitterTokenizer::new()),
        )
    }

    pub fn with_collaborators(
        detector: Arc<dyn GrammarDetector>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            detector,
            tokenizer,
        }
    }

    /// Detect the grammar for a file, falling back to plain text
    pub fn detect_grammar(&self, filename: &Path, sample: &str) -> Language {
        match self.detector.detect(filename, sample) {
            Ok(language) => language,
            Err(err) => {
                tracing::debug!("{}, using plain text", err);
                Language::PlainText
            }
        }
    }

    /// Tokenize `text` into one styled line per `\n`-separated line.
    /// Tokenizer failures degrade to unstyled lines.
    pub fn highlight(&self, text: &str, language: Language) -> Vec<StyledLine> {
        match self.tokenizer.tokenize(text, language) {
            Ok(runs) => runs_to_lines(&runs),
            Err(e) => {
                tracing::warn!("Highlight error for {}: {}", language.name(), e);
                text.split('\n').map(StyledLine::plain).collect()
            }
        }
    }
}
