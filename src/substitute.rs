use crate::error::{Result, ScaffoldError};
use crate::resolver::ResolvedToken;
use regex::{NoExpand, Regex};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How token names are located in paths and contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact substring match on the token name
    #[default]
    Literal,
    /// Token names are compiled as regular expressions
    Pattern,
}

#[derive(Debug)]
enum Matcher {
    Literal(String),
    Pattern(Regex),
}

#[derive(Debug)]
struct CompiledToken {
    name: String,
    matcher: Matcher,
    value: String,
    scope: Option<Vec<PathBuf>>,
}

impl CompiledToken {
    fn applies_to(&self, path_context: &Path) -> bool {
        self.scope.as_ref().is_none_or(|prefixes| {
            prefixes
                .iter()
                .any(|prefix| path_context.starts_with(prefix))
        })
    }

    fn replace(&self, text: String) -> String {
        match &self.matcher {
            Matcher::Literal(name) => {
                if text.contains(name.as_str()) {
                    text.replace(name.as_str(), &self.value)
                } else {
                    text
                }
            }
            Matcher::Pattern(pattern) => pattern
                .replace_all(&text, NoExpand(&self.value))
                .into_owned(),
        }
    }
}

/// Applies resolved tokens to paths and file contents.
///
/// Built once per generation run; holds no mutable state, so a single
/// instance can be shared across threads processing different files.
#[derive(Debug)]
pub struct Substitutor {
    tokens: Vec<CompiledToken>,
    mode: MatchMode,
}

impl Substitutor {
    /// Compiles tokens in the given (replacement) order.
    ///
    /// Tokens with an empty name are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ScaffoldError::InvalidPattern` in pattern mode if a token name
    /// is not a valid regular expression.
    pub fn new(resolved: &[ResolvedToken], mode: MatchMode) -> Result<Self> {
        let mut tokens = Vec::with_capacity(resolved.len());

        for token in resolved.iter().filter(|t| !t.name.is_empty()) {
            let matcher = match mode {
                MatchMode::Literal => Matcher::Literal(token.name.clone()),
                MatchMode::Pattern => {
                    let pattern =
                        Regex::new(&token.name).map_err(|source| ScaffoldError::InvalidPattern {
                            name: token.name.clone(),
                            source,
                        })?;
                    Matcher::Pattern(pattern)
                }
            };

            tokens.push(CompiledToken {
                name: token.name.clone(),
                matcher,
                value: token.value.clone(),
                scope: token
                    .scope
                    .as_ref()
                    .map(|prefixes| prefixes.iter().map(|p| normalize_prefix(p)).collect()),
            });
        }

        Ok(Self { tokens, mode })
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Substitutes every applicable token in `text`.
    ///
    /// `path_context` is the entry's path relative to the template root and
    /// only decides which scoped tokens apply.
    #[must_use]
    pub fn apply(&self, text: &str, path_context: &Path) -> String {
        self.tokens
            .iter()
            .filter(|token| token.applies_to(path_context))
            .fold(text.to_string(), |acc, token| {
                tracing::trace!(token = %token.name, path = %path_context.display(), "substituting");
                token.replace(acc)
            })
    }

    /// Substitutes tokens in a relative template path
    #[must_use]
    pub fn apply_path(&self, relative: &Path) -> PathBuf {
        PathBuf::from(self.apply(&relative.to_string_lossy(), relative))
    }
}

// Scope prefixes are written relative to the template root; "./dir", "/dir"
// and "dir/" all mean "dir". "." and "" cover the whole tree.
fn normalize_prefix(prefix: &str) -> PathBuf {
    let trimmed = prefix
        .trim_start_matches("./")
        .trim_start_matches('/')
        .trim_start_matches('\\');
    if trimmed == "." {
        PathBuf::new()
    } else {
        PathBuf::from(trimmed)
    }
}
