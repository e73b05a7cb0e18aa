use crate::config::TokenDef;
use crate::error::{Result, ScaffoldError};
use std::collections::HashMap;

/// A named placeholder definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    /// Text identifying occurrences of this token in paths and contents
    pub name: String,
    /// Name of another token whose resolved value this token inherits
    pub reference: Option<String>,
    /// Value given directly in the definition
    pub literal_value: String,
    /// Alternate overlay key; the token's own name is used when unset
    pub overlay_key: Option<String>,
    /// Transform names applied left to right after resolution
    pub transforms: Vec<String>,
    /// Path prefixes, relative to the template root, this token is limited to
    pub scope: Option<Vec<String>>,
    /// Higher priorities are substituted first
    pub priority: i64,
}

impl Token {
    /// Creates an unscoped token with a literal value and priority 0
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literal_value: value.into(),
            ..Self::default()
        }
    }

    /// Creates a token inheriting the value of `reference`
    pub fn referencing(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_transforms<I, S>(mut self, transforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transforms = transforms.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_scope<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_overlay_key(mut self, key: impl Into<String>) -> Self {
        self.overlay_key = Some(key.into());
        self
    }

    /// Key used to look this token up in the value overlay
    #[must_use]
    pub fn overlay_key(&self) -> &str {
        self.overlay_key.as_deref().unwrap_or(&self.name)
    }
}

impl From<TokenDef> for Token {
    fn from(def: TokenDef) -> Self {
        Self {
            name: def.name,
            reference: def.token.filter(|r| !r.is_empty()),
            literal_value: def.value,
            overlay_key: def.key.filter(|k| !k.is_empty()),
            transforms: def.modifiers,
            // an empty `localize` list means the token is global
            scope: def.localize.filter(|prefixes| !prefixes.is_empty()),
            priority: def.priority,
        }
    }
}

/// Token definitions in declaration order plus the user value overlay
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: Vec<Token>,
    index: HashMap<String, usize>,
    overlay: HashMap<String, String>,
}

impl TokenStore {
    /// Builds a store from tokens in declaration order
    ///
    /// # Errors
    ///
    /// Returns `ScaffoldError::DuplicateToken` if two tokens share a name.
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tokens.len());
        for (position, token) in tokens.iter().enumerate() {
            if index.insert(token.name.clone(), position).is_some() {
                return Err(ScaffoldError::DuplicateToken {
                    name: token.name.clone(),
                });
            }
        }

        Ok(Self {
            tokens,
            index,
            overlay: HashMap::new(),
        })
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&Token> {
        self.position(name).map(|position| &self.tokens[position])
    }

    /// Declaration index of the token called `name`
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Records a user-supplied value for a token name or overlay key
    pub fn set_overlay_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overlay.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn overlay_value(&self, key: &str) -> Option<&str> {
        self.overlay.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let store = TokenStore::new(vec![
            Token::literal("{{name}}", "test"),
            Token::referencing("{{name_upper}}", "{{name}}"),
        ])
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup_by_name("{{name}}").unwrap().literal_value, "test");
        assert_eq!(store.position("{{name_upper}}"), Some(1));
        assert!(store.lookup_by_name("{{missing}}").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = TokenStore::new(vec![
            Token::literal("{{name}}", "a"),
            Token::literal("{{name}}", "b"),
        ]);
        assert!(matches!(
            result,
            Err(ScaffoldError::DuplicateToken { name }) if name == "{{name}}"
        ));
    }

    #[test]
    fn test_overlay_values() {
        let mut store = TokenStore::new(vec![Token::literal("{{name}}", "")]).unwrap();
        assert!(store.overlay_value("{{name}}").is_none());

        store.set_overlay_value("{{name}}", "myapp");
        assert_eq!(store.overlay_value("{{name}}"), Some("myapp"));

        store.set_overlay_value("{{name}}", "other");
        assert_eq!(store.overlay_value("{{name}}"), Some("other"));
    }

    #[test]
    fn test_overlay_key_defaults_to_name() {
        let token = Token::literal("{{name}}", "");
        assert_eq!(token.overlay_key(), "{{name}}");

        let token = token.with_overlay_key("project");
        assert_eq!(token.overlay_key(), "project");
    }

    #[test]
    fn test_from_definition() {
        let def = TokenDef {
            name: "{{local}}".to_string(),
            value: "v".to_string(),
            token: Some(String::new()),
            key: None,
            modifiers: vec!["upper".to_string()],
            localize: Some(vec!["dir1".to_string()]),
            priority: 3,
        };
        let token = Token::from(def);
        assert_eq!(token.reference, None);
        assert_eq!(token.scope, Some(vec!["dir1".to_string()]));
        assert_eq!(token.transforms, vec!["upper".to_string()]);
        assert_eq!(token.priority, 3);

        let def = TokenDef {
            name: "{{global}}".to_string(),
            localize: Some(Vec::new()),
            ..TokenDef::default()
        };
        assert_eq!(Token::from(def).scope, None);
    }
}
