use crate::error::{Result, ScaffoldError};
use crate::substitute::MatchMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the token definition file at the template root
pub const CONFIG_FILE_NAME: &str = "scaffold.toml";

/// One `[[token]]` record from `scaffold.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenDef {
    pub name: String,
    /// Literal value
    #[serde(default)]
    pub value: String,
    /// Name of the token to inherit a value from
    #[serde(default)]
    pub token: Option<String>,
    /// Overlay key used instead of `name` for user-supplied values
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Path prefixes the token is restricted to
    #[serde(default)]
    pub localize: Option<Vec<String>>,
    #[serde(default)]
    pub priority: i64,
}

/// Contents of `scaffold.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How token names are matched in paths and contents
    #[serde(default, rename = "match")]
    pub match_mode: MatchMode,
    #[serde(default, rename = "token")]
    pub tokens: Vec<TokenDef>,
}

impl Config {
    /// Parses token definitions from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ScaffoldError::ConfigParse` if the text is not a valid definition file.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| ScaffoldError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads the definition file from a template root
    ///
    /// # Errors
    ///
    /// - `ScaffoldError::ConfigNotFound` if the root has no `scaffold.toml`.
    /// - `ScaffoldError::Io` if the file can't be read.
    /// - `ScaffoldError::ConfigParse` if the file is malformed.
    pub fn load(template_root: &Path) -> Result<Self> {
        let path = template_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Err(ScaffoldError::ConfigNotFound { path });
        }

        let content = fs::read_to_string(&path)?;
        let config = Self::parse(&content, &path)?;
        tracing::debug!(
            path = %path.display(),
            tokens = config.tokens.len(),
            mode = ?config.match_mode,
            "loaded token definitions"
        );
        Ok(config)
    }
}
