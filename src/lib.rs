//! # scaffold
//!
//! A library and CLI tool for generating project trees from template
//! directories. Templates contain placeholder tokens, declared in a
//! `scaffold.toml` at the template root, which are replaced in both file paths
//! and file contents.
//!
//! ## Features
//!
//! - Tokens with literal values, user-supplied values or references to other tokens
//! - Named transforms (`slug`, `snake`, `pascal`, `plural`, ...) applied in sequence
//! - Custom transforms registered alongside the built-ins
//! - Tokens localized to sub-directories of the template
//! - Priority ordering for overlapping token names
//! - Literal or regular-expression token matching
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use scaffold::Scaffold;
//!
//! let mut scaffold = Scaffold::init("templates/service")?;
//! scaffold.register_token_value("{{name}}", "billing");
//! scaffold.register_transform("reverse", |s: &str| s.chars().rev().collect());
//! scaffold.on_make(|path| println!("created {}", path.display()));
//! scaffold.make("services/billing")?;
//! # Ok::<(), scaffold::ScaffoldError>(())
//! ```
//!
//! ### Token definitions
//!
//! ```toml
//! [[token]]
//! name = "{{name}}"
//! priority = 1
//!
//! [[token]]
//! name = "{{name_upper}}"
//! token = "{{name}}"
//! modifiers = ["upper"]
//! priority = 2
//!
//! [[token]]
//! name = "{{handler}}"
//! value = "default_handler"
//! localize = ["src/handlers"]
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Generate a tree, supplying a token value
//! scaffold templates/service out/billing --set '{{name}}=billing'
//!
//! # Show the resolved tokens
//! scaffold templates/service --list=detailed --set '{{name}}=billing'
//! ```

pub mod config;
pub mod error;
pub mod resolver;
pub mod scaffold;
pub mod substitute;
pub mod token;
pub mod transform;

// Re-export main types and functions for convenience
pub use config::{CONFIG_FILE_NAME, Config, TokenDef};
pub use error::{Result, ScaffoldError};
pub use resolver::{ResolvedToken, resolve_all, resolve_one};
pub use scaffold::{OnMake, PlannedEntry, Scaffold};
pub use substitute::{MatchMode, Substitutor};
pub use token::{Token, TokenStore};
pub use transform::{TransformFn, TransformRegistry};
