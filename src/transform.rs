//! Named text transforms applied to resolved token values.
//!
//! Transforms are plain `&str -> String` functions looked up by name. Several
//! functions may share a name; they run in registration order whenever that
//! name appears in a token's `modifiers` list.

use std::collections::HashMap;
use std::fmt;

/// A registered transform function
pub type TransformFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Names of the transforms preloaded by [`TransformRegistry::with_builtins`]
pub const BUILTIN_TRANSFORMS: [&str; 9] = [
    "lower", "upper", "slug", "title", "snake", "camel", "pascal", "plural", "singular",
];

/// Maps transform names to the ordered list of functions bound to them
#[derive(Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Vec<TransformFn>>,
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.transforms.keys().collect();
        names.sort();
        f.debug_struct("TransformRegistry")
            .field("names", &names)
            .finish()
    }
}

impl TransformRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in case and inflection transforms
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("lower", lower);
        registry.register("upper", upper);
        registry.register("slug", slug);
        registry.register("title", title);
        registry.register("snake", snake);
        registry.register("camel", camel);
        registry.register("pascal", pascal);
        registry.register("plural", plural);
        registry.register("singular", singular);
        registry
    }

    /// Appends `transform` to the functions bound to `name`
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transforms
            .entry(name.into())
            .or_default()
            .push(Box::new(transform));
    }

    /// Returns true if at least one function is bound to `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Runs `value` through every function bound to `name`, in order.
    ///
    /// Unknown names leave the value unchanged.
    #[must_use]
    pub fn apply(&self, name: &str, value: &str) -> String {
        let Some(functions) = self.transforms.get(name) else {
            tracing::warn!(transform = name, "unknown transform, value left unchanged");
            return value.to_string();
        };

        functions
            .iter()
            .fold(value.to_string(), |acc, transform| transform(&acc))
    }

    /// Applies each named transform in sequence
    #[must_use]
    pub fn apply_all<S: AsRef<str>>(&self, names: &[S], value: &str) -> String {
        names
            .iter()
            .fold(value.to_string(), |acc, name| self.apply(name.as_ref(), &acc))
    }
}

pub fn lower(subject: &str) -> String {
    subject.to_ascii_lowercase()
}

pub fn upper(subject: &str) -> String {
    subject.to_ascii_uppercase()
}

/// Lowercase words joined by `-`. `"SomeCrazy String!"` becomes `"some-crazy-string"`.
pub fn slug(subject: &str) -> String {
    separated(subject, b'-')
}

/// Lowercase words joined by `_`. `"Snake-Case"` becomes `"snake_case"`.
pub fn snake(subject: &str) -> String {
    separated(subject, b'_')
}

/// `"pascal-case"` becomes `"PascalCase"`
pub fn pascal(subject: &str) -> String {
    joined(subject, false)
}

/// `"Camel_case"` becomes `"camelCase"`
pub fn camel(subject: &str) -> String {
    joined(subject, true)
}

/// Capitalized words separated by single spaces. `"ATitleTest"` becomes `"A Title Test"`.
pub fn title(subject: &str) -> String {
    let mut out = String::with_capacity(subject.len() + 4);
    let mut boundary = false;

    for b in subject.bytes() {
        if !b.is_ascii_alphanumeric() {
            boundary = true;
            continue;
        }

        if !out.is_empty() && (boundary || b.is_ascii_uppercase()) && !out.ends_with(' ') {
            out.push(' ');
        }

        let word_start = out.is_empty() || out.ends_with(' ');
        out.push(if word_start {
            b.to_ascii_uppercase() as char
        } else {
            b as char
        });
        boundary = false;
    }

    out
}

pub fn plural(subject: &str) -> String {
    pluralizer::pluralize(subject, 2, false)
}

pub fn singular(subject: &str) -> String {
    pluralizer::pluralize(subject, 1, false)
}

// Upper-case letters and non-alphanumeric runs start a new word; words are
// lowercased and joined with `sep`.
fn separated(subject: &str, sep: u8) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(subject.len() + 4);

    for b in subject.bytes() {
        if b.is_ascii_digit() || b.is_ascii_lowercase() {
            out.push(b);
        } else if b.is_ascii_uppercase() {
            if out.last().is_some_and(|&last| last != sep) {
                out.push(sep);
            }
            out.push(b.to_ascii_lowercase());
        } else if out.last().is_some_and(|&last| last != sep) {
            out.push(sep);
        }
    }

    if out.last() == Some(&sep) {
        out.pop();
    }

    // only ASCII bytes are ever pushed
    String::from_utf8(out).unwrap_or_default()
}

// Drops separators and capitalizes the letter following each one.
fn joined(subject: &str, lower_first: bool) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut capitalize = true;

    for b in subject.bytes() {
        if !b.is_ascii_alphanumeric() {
            capitalize = true;
            continue;
        }

        let c = if out.is_empty() && lower_first {
            b.to_ascii_lowercase()
        } else if capitalize {
            b.to_ascii_uppercase()
        } else {
            b
        };
        out.push(c as char);
        capitalize = false;
    }

    out
}
