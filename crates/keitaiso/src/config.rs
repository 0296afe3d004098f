// crates/keitaiso/src/config.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use vibrato_rkyv::dictionary::PresetDictionaryKind;

use crate::analyzer::DEFAULT_BASE_FORM_FIELD;
use crate::errors::ConfigError;
use crate::filter::{TokenFilter, default_parts_of_speech};

/// Top-level configuration for keitaiso.
#[derive(Debug, Clone, Deserialize)]
pub struct KeitaisoConfig {
  /// [dictionary] section
  pub dictionary: DictionaryConfig,
  /// [filter] section
  #[serde(default)]
  pub filter: FilterConfig,
  /// [logging] section
  #[serde(default)]
  pub logging: LoggingConfig,
}

/// [dictionary] section configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryConfig {
  /// Where the system dictionary comes from
  pub source: DictionarySource,
  /// Dictionary cache directory (preset dictionaries only).
  ///
  /// If omitted, `DictionaryManager` falls back to the OS cache directory.
  #[serde(default)]
  pub cache_dir: Option<PathBuf>,
  /// User dictionary CSV files, applied in order on top of the system dictionary
  #[serde(default)]
  pub user_dictionaries: Vec<PathBuf>,
  /// Feature sub-field holding the base form (6 for IPADIC)
  #[serde(default = "default_base_form_field")]
  pub base_form_field: usize,
  /// MeCab compatible space handling
  #[serde(default)]
  pub ignore_space: bool,
}

fn default_base_form_field() -> usize {
  DEFAULT_BASE_FORM_FIELD
}

/// System dictionary source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DictionarySource {
  /// Preset dictionary, downloaded on first use
  Preset {
    /// Preset dictionary type
    preset: DictionaryPreset,
  },
  /// Compiled dictionary file
  Compiled {
    /// Path to the compiled dictionary
    path: PathBuf,
  },
  /// MeCab-format source directory (`lex.csv`, `matrix.def`, `char.def`, `unk.def`)
  Mecab {
    /// Source directory
    dir: PathBuf,
  },
}

/// Preset dictionary type.
///
/// `PresetDictionaryKind` from vibrato-rkyv does not implement `serde::Deserialize`,
/// and the orphan rule forbids adding it here, so this enum is the configuration-side
/// twin converted with `.into()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictionaryPreset {
  /// IpaDic: The smallest
  Ipadic,
  /// Unidic for written language
  UnidicCwj,
  /// Unidic for spoken language
  UnidicCsj,
}

/// [filter] section configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterConfig {
  /// Parts of speech kept by `tokenize`
  #[serde(default = "default_parts_of_speech")]
  pub allowed_parts_of_speech: Vec<String>,
  /// Base forms always dropped
  #[serde(default)]
  pub stop_words: Vec<String>,
  /// Base forms kept exclusively (empty = no restriction)
  #[serde(default)]
  pub allowed_words: Vec<String>,
}

impl Default for FilterConfig {
  fn default() -> Self {
    Self {
      allowed_parts_of_speech: default_parts_of_speech(),
      stop_words: Vec::new(),
      allowed_words: Vec::new(),
    }
  }
}

impl FilterConfig {
  /// Builds the token filter described by this section
  pub fn token_filter(&self) -> TokenFilter {
    TokenFilter::new(
      self.allowed_parts_of_speech.iter().cloned(),
      self.stop_words.iter().cloned(),
      self.allowed_words.iter().cloned(),
    )
  }
}

/// [logging] section configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
  /// Log level: "trace" | "debug" | "info" | "warn" | "error"
  #[serde(default)]
  pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  /// trace
  Trace,

  /// debug
  Debug,

  /// info
  #[default]
  Info,

  /// warn
  Warn,

  ///error
  Error,
}

impl LogLevel {
  /// Directive string understood by `EnvFilter`
  pub fn as_str(&self) -> &'static str {
    match self {
      LogLevel::Trace => "trace",
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
    }
  }
}

// ===== Accessor Methods =====

impl DictionaryConfig {
  /// Configuration for a preset dictionary with every other option at its default
  pub fn preset(preset: DictionaryPreset) -> Self {
    Self::with_source(DictionarySource::Preset { preset })
  }

  /// Configuration for a MeCab-format source directory
  pub fn mecab(dir: impl Into<PathBuf>) -> Self {
    Self::with_source(DictionarySource::Mecab { dir: dir.into() })
  }

  /// Configuration for a compiled dictionary file
  pub fn compiled(path: impl Into<PathBuf>) -> Self {
    Self::with_source(DictionarySource::Compiled { path: path.into() })
  }

  fn with_source(source: DictionarySource) -> Self {
    Self {
      source,
      cache_dir: None,
      user_dictionaries: Vec::new(),
      base_form_field: DEFAULT_BASE_FORM_FIELD,
      ignore_space: false,
    }
  }

  /// Returns the preset dictionary type to pass to DictionaryManager, `None` for local sources.
  pub fn dictionary_preset(&self) -> Option<PresetDictionaryKind> {
    match &self.source {
      DictionarySource::Preset { preset } => Some((*preset).into()),
      _ => None,
    }
  }

  /// Returns the configured dictionary cache directory.
  pub fn dictionary_cache_dir(&self) -> Option<&Path> {
    self.cache_dir.as_deref()
  }
}

impl KeitaisoConfig {
  /// Returns the log level.
  pub fn log_level(&self) -> LogLevel {
    self.logging.level
  }

  /// Validates the configuration.
  ///
  /// # Validation Items
  /// - `dictionary.base_form_field` >= 1
  /// - every `dictionary.user_dictionaries` entry is an existing file
  /// - `dictionary.cache_dir` exists or can be created
  ///
  /// # Errors
  /// Returns the corresponding `ConfigError` if validation fails.
  pub fn validate(&self) -> Result<(), ConfigError> {
    // field 0 is the part of speech
    if self.dictionary.base_form_field == 0 {
      return Err(ConfigError::InvalidBaseFormField {
        actual: self.dictionary.base_form_field,
      });
    }

    if let Some(path) = self.dictionary.user_dictionaries.iter().find(|p| !p.is_file()) {
      return Err(ConfigError::UserDictionaryNotFound { path: path.clone() });
    }

    // dictionary.cache_dir exists or can be created
    if let Some(cache_dir) = &self.dictionary.cache_dir {
      if cache_dir.exists() {
        if !cache_dir.is_dir() {
          return Err(ConfigError::InvalidDictionaryCacheDir {
            path: cache_dir.clone(),
          });
        }
      } else if let Err(e) = std::fs::create_dir_all(cache_dir) {
        return Err(ConfigError::DictionaryCacheDirCreationFailed {
          path: cache_dir.clone(),
          source: Arc::new(e),
        });
      }
    }

    Ok(())
  }
}

// ===== Convert configuration types to vibrato-rkyv types =====

impl From<DictionaryPreset> for PresetDictionaryKind {
  fn from(preset: DictionaryPreset) -> Self {
    match preset {
      DictionaryPreset::Ipadic => PresetDictionaryKind::Ipadic,
      DictionaryPreset::UnidicCwj => PresetDictionaryKind::UnidicCwj,
      DictionaryPreset::UnidicCsj => PresetDictionaryKind::UnidicCsj,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test Module
// ─────────────────────────────────────────────────────────────────────────────
