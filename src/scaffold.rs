use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{Result, ScaffoldError};
use crate::resolver::{ResolvedToken, resolve_all};
use crate::substitute::{MatchMode, Substitutor};
use crate::token::{Token, TokenStore};
use crate::transform::TransformRegistry;
use globset::GlobSet;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Callback invoked with the destination path of every generated file
pub type OnMake = Box<dyn Fn(&Path) + Send + Sync>;

/// One entry of the output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Template path relative to the template root
    pub source: PathBuf,
    /// Substituted path relative to the destination
    pub destination: PathBuf,
    pub is_dir: bool,
}

/// A template directory together with its token definitions, transforms and
/// user-supplied values
pub struct Scaffold {
    root: PathBuf,
    store: TokenStore,
    transforms: TransformRegistry,
    match_mode: MatchMode,
    exclude: Option<GlobSet>,
    on_make: Option<OnMake>,
}

impl fmt::Debug for Scaffold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scaffold")
            .field("root", &self.root)
            .field("store", &self.store)
            .field("transforms", &self.transforms)
            .field("match_mode", &self.match_mode)
            .field("exclude", &self.exclude.is_some())
            .field("on_make", &self.on_make.is_some())
            .finish()
    }
}

impl Scaffold {
    /// Loads `scaffold.toml` from `template_root` and registers the built-in transforms
    ///
    /// # Errors
    ///
    /// - `ScaffoldError::TemplateRootNotFound` if `template_root` is not a directory.
    /// - Errors from [`Config::load`] and `ScaffoldError::DuplicateToken` for bad definitions.
    pub fn init(template_root: impl AsRef<Path>) -> Result<Self> {
        let root = template_root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ScaffoldError::TemplateRootNotFound { path: root });
        }

        let config = Config::load(&root)?;
        let match_mode = config.match_mode;
        let tokens = config.tokens.into_iter().map(Token::from).collect();
        let mut scaffold = Self::from_tokens(root, tokens)?;
        scaffold.match_mode = match_mode;
        Ok(scaffold)
    }

    /// Builds a scaffold from tokens already in memory
    ///
    /// # Errors
    ///
    /// Returns `ScaffoldError::DuplicateToken` if two tokens share a name.
    pub fn from_tokens(template_root: impl Into<PathBuf>, tokens: Vec<Token>) -> Result<Self> {
        Ok(Self {
            root: template_root.into(),
            store: TokenStore::new(tokens)?,
            transforms: TransformRegistry::with_builtins(),
            match_mode: MatchMode::default(),
            exclude: None,
            on_make: None,
        })
    }

    #[must_use]
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Skips template entries whose relative path matches `exclude`
    #[must_use]
    pub fn with_exclude(mut self, exclude: GlobSet) -> Self {
        self.exclude = Some(exclude);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Token definitions in declaration order
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        self.store.tokens()
    }

    /// Adds a transform under `name`, after any already registered there
    pub fn register_transform<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transforms.register(name, transform);
    }

    /// Supplies a value for a token name (or its overlay key)
    pub fn register_token_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.store.set_overlay_value(key, value);
    }

    /// Sets the callback run after each generated file is written
    pub fn on_make<F>(&mut self, callback: F)
    where
        F: Fn(&Path) + Send + Sync + 'static,
    {
        self.on_make = Some(Box::new(callback));
    }

    /// Resolves every token, in replacement order
    #[must_use]
    pub fn resolve(&self) -> Vec<ResolvedToken> {
        resolve_all(&self.store, &self.transforms)
    }

    /// Builds the substitution engine for one generation run
    ///
    /// # Errors
    ///
    /// Returns `ScaffoldError::InvalidPattern` in pattern mode for invalid token names.
    pub fn substitutor(&self) -> Result<Substitutor> {
        Substitutor::new(&self.resolve(), self.match_mode)
    }

    /// Lists the entries `make` would create, without touching the filesystem
    ///
    /// # Errors
    ///
    /// - Errors from resolution or from walking the template tree.
    /// - `ScaffoldError::PathTraversal` / `ScaffoldError::EmptyOutputPath` for
    ///   entries whose substituted path is unusable.
    pub fn plan(&self) -> Result<Vec<PlannedEntry>> {
        let substitutor = self.substitutor()?;
        let mut planned = Vec::new();
        self.walk(|relative, is_dir| {
            let Some(destination) = output_path(&substitutor, relative, is_dir)? else {
                return Ok(());
            };
            planned.push(PlannedEntry {
                source: relative.to_path_buf(),
                destination,
                is_dir,
            });
            Ok(())
        })?;
        Ok(planned)
    }

    /// Generates the output tree under `destination`.
    ///
    /// Existing files are overwritten. Files written before a failure stay
    /// on disk. Returns the paths of every generated file.
    ///
    /// # Errors
    ///
    /// - `ScaffoldError::TemplateRootNotFound` if the template root disappeared.
    /// - `ScaffoldError::InvalidPattern` in pattern mode for invalid token names.
    /// - `ScaffoldError::PathTraversal` if a substituted path would leave `destination`.
    /// - `ScaffoldError::EmptyOutputPath` if a file's substituted path is empty.
    /// - `ScaffoldError::Io` / `ScaffoldError::WalkDir` on filesystem failures.
    pub fn make(&self, destination: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let destination = destination.as_ref();
        if !self.root.is_dir() {
            return Err(ScaffoldError::TemplateRootNotFound {
                path: self.root.clone(),
            });
        }

        let substitutor = self.substitutor()?;
        fs::create_dir_all(destination)?;

        let mut generated = Vec::new();
        self.walk(|relative, is_dir| {
            let Some(output) = output_path(&substitutor, relative, is_dir)? else {
                return Ok(());
            };
            let target = destination.join(output);
            if !target.starts_with(destination) {
                return Err(ScaffoldError::PathTraversal { path: target });
            }

            if is_dir {
                tracing::debug!(path = %target.display(), "creating directory");
                fs::create_dir_all(&target)?;
                return Ok(());
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            let bytes = fs::read(self.root.join(relative))?;
            match String::from_utf8(bytes) {
                Ok(text) => fs::write(&target, substitutor.apply(&text, relative))?,
                Err(raw) => {
                    tracing::debug!(path = %relative.display(), "copying non-UTF-8 file verbatim");
                    fs::write(&target, raw.into_bytes())?;
                }
            }

            tracing::info!(path = %target.display(), "generated");
            if let Some(callback) = &self.on_make {
                callback(&target);
            }
            generated.push(target);
            Ok(())
        })?;

        Ok(generated)
    }

    // Visits every template entry except the root and definition files,
    // parents before children, siblings sorted by name.
    fn walk<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Path, bool) -> Result<()>,
    {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.path()));

        for entry in walker {
            let entry = entry?;
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            visit(relative, entry.file_type().is_dir())?;
        }

        Ok(())
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };

        if relative.as_os_str().is_empty() {
            return false;
        }

        if relative.file_name() == Some(OsStr::new(CONFIG_FILE_NAME)) {
            return true;
        }

        self.exclude
            .as_ref()
            .is_some_and(|exclude| exclude.is_match(relative))
    }
}

/// Substitutes tokens in a template-relative path and keeps only its plain
/// components, so the result always stays under the destination.
///
/// Root and prefix components and empty segments (left behind by empty token
/// values) are dropped. A directory whose path becomes empty is merged into
/// its parent and yields `None`.
fn output_path(
    substitutor: &Substitutor,
    relative: &Path,
    is_dir: bool,
) -> Result<Option<PathBuf>> {
    let substituted = substitutor.apply_path(relative);
    let mut output = PathBuf::new();

    for component in substituted.components() {
        match component {
            Component::Normal(part) => output.push(part),
            Component::ParentDir => {
                return Err(ScaffoldError::PathTraversal { path: substituted });
            }
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
        }
    }

    if output.as_os_str().is_empty() {
        if is_dir {
            tracing::debug!(
                path = %relative.display(),
                "directory name substituted away, merging into parent"
            );
            return Ok(None);
        }
        return Err(ScaffoldError::EmptyOutputPath {
            source_path: relative.to_path_buf(),
        });
    }

    Ok(Some(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use globset::{Glob, GlobSetBuilder};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn template(definitions: &str, files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("template");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), definitions).unwrap();
        for (path, content) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp_dir
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_make_resolves_references_and_priorities() {
        let temp_dir = template(
            r#"
            [[token]]
            name = "{{name}}"
            value = "test"
            priority = 1

            [[token]]
            name = "{{name_upper}}"
            token = "{{name}}"
            modifiers = ["upper"]
            priority = 2
            "#,
            &[("test.go", "package {{name}}\nfunc {{name_upper}}Func(){}")],
        );

        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let out = temp_dir.path().join("output");
        let generated = scaffold.make(&out).unwrap();

        assert_eq!(generated, vec![out.join("test.go")]);
        assert_eq!(read(out.join("test.go")), "package test\nfunc TESTFunc(){}");
        assert!(!out.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_make_with_chains() {
        let temp_dir = template(
            r#"
            [[token]]
            name = "{{name}}"
            value = "test"
            priority = 1

            [[token]]
            name = "{{name_upper}}"
            token = "{{name}}"
            modifiers = ["upper"]
            priority = 2

            [[token]]
            name = "{{name_lower}}"
            token = "{{name_upper}}"
            modifiers = ["lower"]
            priority = 3

            [[token]]
            name = "{{dependent}}"
            token = "{{name_upper}}"
            priority = 4

            [[token]]
            name = "{{chain1}}"
            token = "{{chain2}}"
            priority = 5

            [[token]]
            name = "{{chain2}}"
            token = "{{chain3}}"
            priority = 6

            [[token]]
            name = "{{chain3}}"
            value = "final"
            priority = 7
            "#,
            &[(
                "test.go",
                "package {{name}}\n\nfunc {{name_upper}}Func() {\n    return \"{{dependent}}\"\n}\n\nvar {{name_lower}}Var = \"{{chain1}}\"\n",
            )],
        );

        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();

        assert_eq!(
            read(out.join("test.go")),
            "package test\n\nfunc TESTFunc() {\n    return \"TEST\"\n}\n\nvar testVar = \"final\"\n"
        );
    }

    #[test]
    fn test_make_with_localized_tokens() {
        let temp_dir = template(
            r#"
            [[token]]
            name = "{{name}}"
            value = "test"
            priority = 1

            [[token]]
            name = "{{local1}}"
            value = "localVal1"
            priority = 2
            localize = ["dir1"]

            [[token]]
            name = "{{local2}}"
            value = "localVal2"
            priority = 2
            localize = ["dir2"]
            "#,
            &[
                ("dir1/test.txt", "{{name}} {{local1}} {{local2}}"),
                ("dir2/test.txt", "{{name}} {{local2}} {{local1}}"),
            ],
        );

        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();

        assert_eq!(read(out.join("dir1/test.txt")), "test localVal1 {{local2}}");
        assert_eq!(read(out.join("dir2/test.txt")), "test localVal2 {{local1}}");
    }

    #[test]
    fn test_make_with_registered_values() {
        let temp_dir = template(
            r#"
            [[token]]
            name = "{{name}}"
            priority = 1

            [[token]]
            name = "{{name_upper}}"
            token = "{{name}}"
            modifiers = ["upper"]
            priority = 2

            [[token]]
            name = "{{custom}}"
            priority = 4
            "#,
            &[(
                "test.go",
                "package {{name}}\nfunc {{name_upper}}Func() { return \"{{custom}}\" }\n",
            )],
        );

        let mut scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        scaffold.register_token_value("{{name}}", "myapp");
        scaffold.register_token_value("{{custom}}", "custom_value");

        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();

        assert_eq!(
            read(out.join("test.go")),
            "package myapp\nfunc MYAPPFunc() { return \"custom_value\" }\n"
        );
    }

    #[test]
    fn test_make_with_custom_transform_and_callback() {
        let temp_dir = template(
            r#"
            [[token]]
            name = "{{name}}"
            priority = 1

            [[token]]
            name = "{{name_reversed}}"
            token = "{{name}}"
            modifiers = ["reverse"]
            priority = 2
            "#,
            &[("test.go", "package {{name}}\nfunc {{name_reversed}}Func() {}\n")],
        );

        let mut scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        scaffold.register_transform("reverse", |s: &str| s.chars().rev().collect());
        scaffold.register_token_value("{{name}}", "myapp");

        let made = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&made);
        scaffold.on_make(move |path| sink.lock().unwrap().push(path.to_path_buf()));

        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();

        assert_eq!(
            read(out.join("test.go")),
            "package myapp\nfunc ppaymFunc() {}\n"
        );
        assert_eq!(*made.lock().unwrap(), vec![out.join("test.go")]);
    }

    #[test]
    fn test_make_substitutes_paths() {
        let temp_dir = template(
            r#"
            [[token]]
            name = "__name__"
            value = "Billing Service"
            modifiers = ["slug"]

            [[token]]
            name = "__type__"
            token = "__name__"
            modifiers = ["pascal"]
            "#,
            &[
                ("__name__/src/__type__.rs", "pub struct __type__;"),
                ("__name__/README.md", "# __name__"),
            ],
        );

        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let out = temp_dir.path().join("output");
        let generated = scaffold.make(&out).unwrap();

        assert_eq!(
            read(out.join("billing-service/src/BillingService.rs")),
            "pub struct BillingService;"
        );
        assert_eq!(read(out.join("billing-service/README.md")), "# billing-service");
        assert_eq!(generated.len(), 2);
    }

    #[test]
    fn test_make_copies_binary_files() {
        let temp_dir = template("[[token]]\nname = \"x\"\nvalue = \"y\"\n", &[]);
        let root = temp_dir.path().join("template");
        let binary = [0xffu8, 0xfe, b'x', 0x00];
        fs::write(root.join("blob.bin"), binary).unwrap();

        let scaffold = Scaffold::init(&root).unwrap();
        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();

        assert_eq!(fs::read(out.join("blob.bin")).unwrap(), binary);
    }

    #[test]
    fn test_make_creates_empty_directories() {
        let temp_dir = template("", &[]);
        let root = temp_dir.path().join("template");
        fs::create_dir_all(root.join("empty/nested")).unwrap();

        let scaffold = Scaffold::init(&root).unwrap();
        let out = temp_dir.path().join("output");
        let generated = scaffold.make(&out).unwrap();

        assert!(generated.is_empty());
        assert!(out.join("empty/nested").is_dir());
    }

    #[test]
    fn test_make_overwrites_existing_files() {
        let temp_dir = template("[[token]]\nname = \"N\"\nvalue = \"new\"\n", &[("f.txt", "N")]);
        let out = temp_dir.path().join("output");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("f.txt"), "old").unwrap();

        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        scaffold.make(&out).unwrap();
        assert_eq!(read(out.join("f.txt")), "new");
    }

    #[test]
    fn test_exclude_globs() {
        let temp_dir = template(
            "",
            &[("keep.txt", "k"), ("skip.log", "s"), ("target/out.txt", "t")],
        );
        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new("*.log").unwrap());
        builder.add(Glob::new("target").unwrap());

        let scaffold = Scaffold::init(temp_dir.path().join("template"))
            .unwrap()
            .with_exclude(builder.build().unwrap());
        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();

        assert!(out.join("keep.txt").exists());
        assert!(!out.join("skip.log").exists());
        assert!(!out.join("target").exists());
    }

    #[test]
    fn test_plan_does_not_write() {
        let temp_dir = template(
            "[[token]]\nname = \"{{name}}\"\nvalue = \"app\"\n",
            &[("{{name}}/main.txt", "{{name}}")],
        );
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let planned = scaffold.plan().unwrap();

        assert_eq!(
            planned,
            vec![
                PlannedEntry {
                    source: PathBuf::from("{{name}}"),
                    destination: PathBuf::from("app"),
                    is_dir: true,
                },
                PlannedEntry {
                    source: PathBuf::from("{{name}}/main.txt"),
                    destination: PathBuf::from("app/main.txt"),
                    is_dir: false,
                },
            ]
        );
        assert!(!temp_dir.path().join("output").exists());
    }

    #[test]
    fn test_pattern_mode_from_config() {
        let temp_dir = template(
            "match = \"pattern\"\n[[token]]\nname = \"VERSION_[0-9]+\"\nvalue = \"v2\"\n",
            &[("f.txt", "VERSION_1 VERSION_22 VERSION_x")],
        );
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        assert_eq!(scaffold.match_mode(), MatchMode::Pattern);

        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();
        assert_eq!(read(out.join("f.txt")), "v2 v2 VERSION_x");
    }

    #[test]
    fn test_invalid_pattern_aborts_before_writing() {
        let temp_dir = template("[[token]]\nname = \"(bad\"\n", &[("f.txt", "x")]);
        let scaffold = Scaffold::init(temp_dir.path().join("template"))
            .unwrap()
            .with_match_mode(MatchMode::Pattern);

        let out = temp_dir.path().join("output");
        let result = scaffold.make(&out);
        assert!(matches!(result, Err(ScaffoldError::InvalidPattern { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn test_init_errors() {
        let temp_dir = TempDir::new().unwrap();
        let result = Scaffold::init(temp_dir.path().join("missing"));
        assert!(matches!(result, Err(ScaffoldError::TemplateRootNotFound { .. })));

        let result = Scaffold::init(temp_dir.path());
        assert!(matches!(result, Err(ScaffoldError::ConfigNotFound { .. })));

        let temp_dir = template(
            "[[token]]\nname = \"{{a}}\"\n[[token]]\nname = \"{{a}}\"\n",
            &[],
        );
        let result = Scaffold::init(temp_dir.path().join("template"));
        assert!(matches!(result, Err(ScaffoldError::DuplicateToken { .. })));
    }

    #[test]
    fn test_from_tokens() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("hello.txt"), "hello {{who}}").unwrap();

        let scaffold = Scaffold::from_tokens(
            temp_dir.path(),
            vec![Token::literal("{{who}}", "World").with_transforms(["lower"])],
        )
        .unwrap();
        assert_eq!(scaffold.tokens().len(), 1);

        let out = TempDir::new().unwrap();
        scaffold.make(out.path()).unwrap();
        assert_eq!(read(out.path().join("hello.txt")), "hello world");
    }

    #[test]
    fn test_empty_leading_segment_stays_in_destination() {
        let temp_dir = template(
            "[[token]]\nname = \"{{prefix}}\"\n",
            &[("{{prefix}}/f.txt", "body{{prefix}}")],
        );
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();

        let planned = scaffold.plan().unwrap();
        assert_eq!(
            planned,
            vec![PlannedEntry {
                source: PathBuf::from("{{prefix}}/f.txt"),
                destination: PathBuf::from("f.txt"),
                is_dir: false,
            }]
        );

        let out = temp_dir.path().join("output");
        let generated = scaffold.make(&out).unwrap();
        assert_eq!(generated, vec![out.join("f.txt")]);
        assert_eq!(read(out.join("f.txt")), "body");
    }

    #[test]
    fn test_empty_inner_segment_collapses() {
        let temp_dir = template(
            "[[token]]\nname = \"{{mid}}\"\n",
            &[("a/{{mid}}/b.txt", "x")],
        );
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let out = temp_dir.path().join("output");
        let generated = scaffold.make(&out).unwrap();

        assert_eq!(generated, vec![out.join("a/b.txt")]);
        assert!(generated.iter().all(|path| path.starts_with(&out)));
    }

    #[test]
    fn test_absolute_value_stays_in_destination() {
        let temp_dir = template("[[token]]\nname = \"{{target}}\"\n", &[("{{target}}.txt", "x")]);
        let elsewhere = temp_dir.path().join("elsewhere");
        let mut scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        scaffold.register_token_value("{{target}}", elsewhere.to_string_lossy());

        let out = temp_dir.path().join("output");
        let generated = scaffold.make(&out).unwrap();

        assert_eq!(generated.len(), 1);
        assert!(generated[0].starts_with(&out));
        assert!(generated[0].to_string_lossy().ends_with("elsewhere.txt"));
        assert!(!temp_dir.path().join("elsewhere.txt").exists());

        let planned = scaffold.plan().unwrap();
        assert!(planned.iter().all(|entry| entry.destination.is_relative()));
    }

    #[test]
    fn test_slash_value_creates_subdirectories() {
        let temp_dir = template(
            "[[token]]\nname = \"{{pkg}}\"\nvalue = \"com/example\"\n",
            &[("src/{{pkg}}/App.java", "package {{pkg}};")],
        );
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let out = temp_dir.path().join("output");
        scaffold.make(&out).unwrap();

        assert_eq!(
            read(out.join("src/com/example/App.java")),
            "package com/example;"
        );
    }

    #[test]
    fn test_parent_dir_value_rejected() {
        let temp_dir = template(
            "[[token]]\nname = \"{{name}}\"\nvalue = \"../escape\"\n",
            &[("{{name}}.txt", "x")],
        );
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();

        assert!(matches!(
            scaffold.plan(),
            Err(ScaffoldError::PathTraversal { .. })
        ));

        let out = temp_dir.path().join("output");
        let result = scaffold.make(&out);
        assert!(matches!(result, Err(ScaffoldError::PathTraversal { .. })));
        assert!(!temp_dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_file_name_substituted_away_is_an_error() {
        let temp_dir = template("[[token]]\nname = \"{{name}}\"\n", &[("{{name}}", "x")]);
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();

        let result = scaffold.make(temp_dir.path().join("output"));
        assert!(matches!(
            result,
            Err(ScaffoldError::EmptyOutputPath { source_path }) if source_path == Path::new("{{name}}")
        ));
    }

    #[test]
    fn test_empty_directory_name_merges_into_parent() {
        let temp_dir = template("[[token]]\nname = \"{{dir}}\"\n", &[]);
        fs::create_dir_all(temp_dir.path().join("template/{{dir}}")).unwrap();
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();

        assert!(scaffold.plan().unwrap().is_empty());
        let out = temp_dir.path().join("output");
        assert!(scaffold.make(&out).unwrap().is_empty());
        assert!(out.is_dir());
    }

    #[test]
    fn test_nested_definition_files_are_skipped() {
        let temp_dir = template(
            "[[token]]\nname = \"N\"\nvalue = \"v\"\n",
            &[("sub/scaffold.toml", "name = \"N\""), ("sub/keep.txt", "N")],
        );
        let scaffold = Scaffold::init(temp_dir.path().join("template")).unwrap();
        let out = temp_dir.path().join("output");
        let generated = scaffold.make(&out).unwrap();

        assert_eq!(generated, vec![out.join("sub/keep.txt")]);
        assert!(!out.join("sub").join(CONFIG_FILE_NAME).exists());
    }
}
