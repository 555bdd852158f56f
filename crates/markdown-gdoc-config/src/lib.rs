//! Configuration primitives and loader for markdown-gdoc.
//!
//! Settings resolve through the precedence stack
//! override flag → working directory → git root → built-in defaults,
//! one `.markdown-gdoc.toml` per layer. Parsed values are validated into
//! typed structures so the CLI never touches raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use markdown_gdoc_core::{HeaderSpec, TextUnit};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".markdown-gdoc.toml";

const DEFAULT_TITLE: &str = "Untitled document";
const DEFAULT_JSON_KEY: &str = "gptOutput";
const DEFAULT_IMAGE_SIZE_PT: f64 = 100.0;
const DEFAULT_CAPTION_SIZE_PT: f64 = 16.0;

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub document: DocumentSettings,
    pub input: InputSettings,
    pub compiler: CompilerSettings,
    pub header: HeaderSettings,
    pub sources: ConfigSources,
}

/// Target document metadata handed to the document-creation collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSettings {
    pub title: String,
    pub folder_id: Option<String>,
}

/// How source content is pulled out of input files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSettings {
    /// Key holding the Markdown when the input is a JSON object.
    pub json_key: String,
    pub skip_first_block: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerSettings {
    pub text_unit: TextUnit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderSettings {
    pub enabled: bool,
    pub image_uri: Option<String>,
    pub image_width_pt: f64,
    pub image_height_pt: f64,
    pub caption: String,
    pub font_size_pt: f64,
}

impl HeaderSettings {
    /// Header recipe input, or `None` when the header is disabled.
    pub fn spec(&self) -> Option<HeaderSpec> {
        if !self.enabled {
            return None;
        }
        let image_uri = self.image_uri.clone()?;
        Some(HeaderSpec {
            image_uri,
            image_width_pt: self.image_width_pt,
            image_height_pt: self.image_height_pt,
            caption_text: self.caption.clone(),
            font_size_pt: self.font_size_pt,
        })
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn default() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(ConfigSource::default()));
        let mut source_layers = vec![ConfigSource::default()];

        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        for layer in &source_layers {
            log::debug!("config layer: {}", layer.describe());
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            document: resolved.document,
            input: resolved.input,
            compiler: resolved.compiler,
            header: resolved.header,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Built-in defaults only, without consulting the filesystem.
    pub fn builtin(working_dir: impl Into<PathBuf>) -> Self {
        Config {
            document: DocumentSettings {
                title: DEFAULT_TITLE.to_owned(),
                folder_id: None,
            },
            input: InputSettings {
                json_key: DEFAULT_JSON_KEY.to_owned(),
                skip_first_block: false,
            },
            compiler: CompilerSettings {
                text_unit: TextUnit::default(),
            },
            header: HeaderSettings {
                enabled: false,
                image_uri: None,
                image_width_pt: DEFAULT_IMAGE_SIZE_PT,
                image_height_pt: DEFAULT_IMAGE_SIZE_PT,
                caption: String::new(),
                font_size_pt: DEFAULT_CAPTION_SIZE_PT,
            },
            sources: ConfigSources {
                working_directory: working_dir.into(),
                layers: vec![ConfigSource::default()],
            },
        }
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let at = |value| Some(Located::new(value, source.clone()));
    PartialConfig {
        title: at(Value::Text(DEFAULT_TITLE.to_owned())),
        folder_id: None,
        json_key: at(Value::Text(DEFAULT_JSON_KEY.to_owned())),
        skip_first_block: at(Value::Flag(false)),
        text_unit: at(Value::Text(TextUnit::default().to_string())),
        header_enabled: at(Value::Flag(false)),
        image_uri: None,
        image_width_pt: at(Value::Number(DEFAULT_IMAGE_SIZE_PT)),
        image_height_pt: at(Value::Number(DEFAULT_IMAGE_SIZE_PT)),
        caption: at(Value::Text(String::new())),
        font_size_pt: at(Value::Number(DEFAULT_CAPTION_SIZE_PT)),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug)]
enum Value {
    Text(String),
    Flag(bool),
    Number(f64),
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

/// One layer's worth of settings; later layers replace individual keys.
#[derive(Clone, Debug, Default)]
struct PartialConfig {
    title: Option<Located<Value>>,
    folder_id: Option<Located<Value>>,
    json_key: Option<Located<Value>>,
    skip_first_block: Option<Located<Value>>,
    text_unit: Option<Located<Value>>,
    header_enabled: Option<Located<Value>>,
    image_uri: Option<Located<Value>>,
    image_width_pt: Option<Located<Value>>,
    image_height_pt: Option<Located<Value>>,
    caption: Option<Located<Value>>,
    font_size_pt: Option<Located<Value>>,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        fn take(slot: &mut Option<Located<Value>>, other: Option<Located<Value>>) {
            if other.is_some() {
                *slot = other;
            }
        }

        take(&mut self.title, other.title);
        take(&mut self.folder_id, other.folder_id);
        take(&mut self.json_key, other.json_key);
        take(&mut self.skip_first_block, other.skip_first_block);
        take(&mut self.text_unit, other.text_unit);
        take(&mut self.header_enabled, other.header_enabled);
        take(&mut self.image_uri, other.image_uri);
        take(&mut self.image_width_pt, other.image_width_pt);
        take(&mut self.image_height_pt, other.image_height_pt);
        take(&mut self.caption, other.caption);
        take(&mut self.font_size_pt, other.font_size_pt);
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let title = text(self.title, DEFAULT_TITLE);
        if title.value.trim().is_empty() {
            errors.push(ConfigValidationError::new(
                Some(title.source.clone()),
                "document.title must not be empty".to_owned(),
            ));
        }

        let json_key = text(self.json_key, DEFAULT_JSON_KEY);
        if json_key.value.is_empty() {
            errors.push(ConfigValidationError::new(
                Some(json_key.source.clone()),
                "input.json_key must not be empty".to_owned(),
            ));
        }

        let text_unit_loc = text(self.text_unit, TextUnit::default().as_str());
        let text_unit = match text_unit_loc.value.parse::<TextUnit>() {
            Ok(unit) => unit,
            Err(message) => {
                errors.push(
                    ConfigValidationError::new(Some(text_unit_loc.source.clone()), message)
                        .with_context("compiler.text_unit"),
                );
                TextUnit::default()
            }
        };

        let header_enabled = flag(self.header_enabled, false);
        let image_uri = self.image_uri.map(|loc| text(Some(loc), ""));
        let image_width_pt = number(self.image_width_pt, DEFAULT_IMAGE_SIZE_PT);
        let image_height_pt = number(self.image_height_pt, DEFAULT_IMAGE_SIZE_PT);
        let font_size_pt = number(self.font_size_pt, DEFAULT_CAPTION_SIZE_PT);

        if header_enabled.value {
            match &image_uri {
                Some(uri) if !uri.value.trim().is_empty() => {}
                Some(uri) => errors.push(ConfigValidationError::new(
                    Some(uri.source.clone()),
                    "header.image_uri must not be empty when the header is enabled".to_owned(),
                )),
                None => errors.push(ConfigValidationError::new(
                    Some(header_enabled.source.clone()),
                    "header.image_uri is required when the header is enabled".to_owned(),
                )),
            }
            for (name, located) in [
                ("header.image_width_pt", &image_width_pt),
                ("header.image_height_pt", &image_height_pt),
                ("header.font_size_pt", &font_size_pt),
            ] {
                if !(located.value.is_finite() && located.value > 0.0) {
                    errors.push(ConfigValidationError::new(
                        Some(located.source.clone()),
                        format!("{name} must be a positive number (received {})", located.value),
                    ));
                }
            }
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            document: DocumentSettings {
                title: title.value,
                folder_id: self
                    .folder_id
                    .map(|loc| text(Some(loc), "").value)
                    .filter(|id| !id.is_empty()),
            },
            input: InputSettings {
                json_key: json_key.value,
                skip_first_block: flag(self.skip_first_block, false).value,
            },
            compiler: CompilerSettings { text_unit },
            header: HeaderSettings {
                enabled: header_enabled.value,
                image_uri: image_uri.map(|loc| loc.value),
                image_width_pt: image_width_pt.value,
                image_height_pt: image_height_pt.value,
                caption: text(self.caption, "").value,
                font_size_pt: font_size_pt.value,
            },
        })
    }
}

fn text(located: Option<Located<Value>>, fallback: &str) -> Located<String> {
    match located {
        Some(Located {
            value: Value::Text(value),
            source,
        }) => Located::new(value, source),
        Some(Located { source, .. }) => Located::new(fallback.to_owned(), source),
        None => Located::new(fallback.to_owned(), ConfigSource::default()),
    }
}

fn flag(located: Option<Located<Value>>, fallback: bool) -> Located<bool> {
    match located {
        Some(Located {
            value: Value::Flag(value),
            source,
        }) => Located::new(value, source),
        Some(Located { source, .. }) => Located::new(fallback, source),
        None => Located::new(fallback, ConfigSource::default()),
    }
}

fn number(located: Option<Located<Value>>, fallback: f64) -> Located<f64> {
    match located {
        Some(Located {
            value: Value::Number(value),
            source,
        }) => Located::new(value, source),
        Some(Located { source, .. }) => Located::new(fallback, source),
        None => Located::new(fallback, ConfigSource::default()),
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    document: DocumentSettings,
    input: InputSettings,
    compiler: CompilerSettings,
    header: HeaderSettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    document: Option<RawDocument>,
    #[serde(default)]
    input: Option<RawInput>,
    #[serde(default)]
    compiler: Option<RawCompiler>,
    #[serde(default)]
    header: Option<RawHeader>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let at = |value: Option<Value>| value.map(|value| Located::new(value, source.clone()));
        let document = self.document.unwrap_or_default();
        let input = self.input.unwrap_or_default();
        let compiler = self.compiler.unwrap_or_default();
        let header = self.header.unwrap_or_default();

        PartialConfig {
            title: at(document.title.map(Value::Text)),
            folder_id: at(document.folder_id.map(Value::Text)),
            json_key: at(input.json_key.map(Value::Text)),
            skip_first_block: at(input.skip_first_block.map(Value::Flag)),
            text_unit: at(compiler.text_unit.map(Value::Text)),
            header_enabled: at(header.enabled.map(Value::Flag)),
            image_uri: at(header.image_uri.map(Value::Text)),
            image_width_pt: at(header.image_width_pt.map(Value::Number)),
            image_height_pt: at(header.image_height_pt.map(Value::Number)),
            caption: at(header.caption.map(Value::Text)),
            font_size_pt: at(header.font_size_pt.map(Value::Number)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    folder_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawInput {
    #[serde(default)]
    json_key: Option<String>,
    #[serde(default)]
    skip_first_block: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCompiler {
    #[serde(default)]
    text_unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHeader {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    image_uri: Option<String>,
    #[serde(default)]
    image_width_pt: Option<f64>,
    #[serde(default)]
    image_height_pt: Option<f64>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    font_size_pt: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_layers_replace_individual_keys() {
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(ConfigSource::default()));

        let local = ConfigSource::for_file(ConfigSourceKind::Local, PathBuf::from("/w/.markdown-gdoc.toml"));
        let raw: RawConfig = toml::from_str("[document]\ntitle = \"Brief\"\n").unwrap();
        merged.merge(raw.into_partial(local));

        let resolved = merged.finalize().unwrap();
        assert_eq!(resolved.document.title, "Brief");
        assert_eq!(resolved.input.json_key, "gptOutput");
    }

    #[test]
    fn validation_error_names_its_layer() {
        let local = ConfigSource::for_file(ConfigSourceKind::Local, PathBuf::from("/w/.markdown-gdoc.toml"));
        let err = ConfigValidationError::new(Some(local), "bad".into()).with_context("compiler.text_unit");
        assert_eq!(
            err.to_string(),
            "compiler.text_unit: bad (local config at /w/.markdown-gdoc.toml)"
        );
    }

    #[test]
    fn disabled_header_has_no_spec() {
        let config = Config::builtin("/tmp");
        assert!(config.header.spec().is_none());
    }
}
