//! Dictionary Management Module
//!
//! Manages loading of vibrato-rkyv dictionary data and downloading of preset dictionaries.
//! Automatically downloads on the first run, and loads from the cache directory from the second time onwards.
//! Preset dictionaries include IPADIC, UniDic, etc.
//! It is also possible to load a compiled local dictionary, or to compile MeCab-format
//! sources in memory. User dictionaries can be attached to any of them.

use crate::analyzer::{Analyzer, VibratoAnalyzer};
use crate::config::{DictionaryConfig, DictionarySource};
use crate::errors::error_definition::{DictionaryError, TokenizerError};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::info;
use vibrato_rkyv::dictionary::{DictionaryInner, LoadMode, PresetDictionaryKind};
use vibrato_rkyv::{Dictionary, SystemDictionaryBuilder};

/// Lexicon file of a MeCab-format source directory
pub const LEX_CSV: &str = "lex.csv";
/// Connection cost matrix of a MeCab-format source directory
pub const MATRIX_DEF: &str = "matrix.def";
/// Character definition of a MeCab-format source directory
pub const CHAR_DEF: &str = "char.def";
/// Unknown word definition of a MeCab-format source directory
pub const UNK_DEF: &str = "unk.def";

/// Where the system dictionary comes from
#[derive(Debug, Clone)]
enum Source {
  /// Preset dictionary downloaded into the cache directory
  Preset(PresetDictionaryKind),
  /// Compiled dictionary file
  Compiled(PathBuf),
  /// Directory with `lex.csv`, `matrix.def`, `char.def`, `unk.def`
  MecabSources(PathBuf),
}

/// Dictionary manager structure for vibrato-rkyv
pub struct DictionaryManager {
  /// Dictionary cache directory
  cache_dir: PathBuf,

  /// System dictionary source
  source: Source,

  /// User dictionary CSV files, concatenated in order into one user lexicon
  user_dictionaries: Vec<PathBuf>,

  /// Cache of the loaded dictionary (Initialized only once at the first load)
  /// DictionaryError implements Clone so it can hold Result
  dictionary: OnceLock<Result<Arc<Dictionary>, DictionaryError>>,
}

impl DictionaryManager {
  /// Returns the path of the cache directory
  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  /// Returns the preset kind, `None` for local dictionaries
  pub fn preset_kind(&self) -> Option<PresetDictionaryKind> {
    match self.source {
      Source::Preset(kind) => Some(kind),
      _ => None,
    }
  }

  /// Returns the configured user dictionary files
  pub fn user_dictionaries(&self) -> &[PathBuf] {
    &self.user_dictionaries
  }

  /// Constructor for DictionaryManager using a preset dictionary
  pub fn with_preset(preset_kind: PresetDictionaryKind) -> Result<Self, DictionaryError> {
    let cache_dir = default_cache_dir()?;
    Ok(Self::with_preset_in(preset_kind, cache_dir))
  }

  /// Constructor for DictionaryManager using a preset dictionary and an explicit cache directory
  pub fn with_preset_in(preset_kind: PresetDictionaryKind, cache_dir: impl Into<PathBuf>) -> Self {
    Self {
      cache_dir: cache_dir.into(),
      source: Source::Preset(preset_kind),
      user_dictionaries: Vec::new(),
      dictionary: OnceLock::new(),
    }
  }

  /// Constructor for DictionaryManager using a compiled local dictionary file
  pub fn from_local_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
      let s = path.display().to_string();
      return Err(DictionaryError::DictionaryNotFound(s));
    }

    // Use the parent directory of the dictionary file as the cache directory
    let cache_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    Ok(Self {
      cache_dir,
      source: Source::Compiled(path),
      user_dictionaries: Vec::new(),
      dictionary: OnceLock::new(),
    })
  }

  /// Constructor for DictionaryManager using a MeCab-format source directory
  ///
  /// The directory must contain `lex.csv`, `matrix.def`, `char.def` and `unk.def`.
  pub fn from_mecab_sources<P: AsRef<Path>>(dir: P) -> Result<Self, DictionaryError> {
    let dir = dir.as_ref().to_path_buf();

    for name in [LEX_CSV, MATRIX_DEF, CHAR_DEF, UNK_DEF] {
      let file = dir.join(name);
      if !file.is_file() {
        return Err(DictionaryError::DictionaryNotFound(file.display().to_string()));
      }
    }

    Ok(Self {
      cache_dir: dir.clone(),
      source: Source::MecabSources(dir),
      user_dictionaries: Vec::new(),
      dictionary: OnceLock::new(),
    })
  }

  /// Adds user dictionary CSV files (MeCab lexicon format)
  ///
  /// They are attached to every analyzer built by [`Self::analyzer`],
  /// whatever the system dictionary source is.
  ///
  /// # Errors
  /// `DictionaryError::DictionaryNotFound` if a file does not exist
  pub fn with_user_dictionaries<I, P>(mut self, paths: I) -> Result<Self, DictionaryError>
  where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
  {
    let paths: Vec<PathBuf> = paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect();

    if let Some(path) = paths.iter().find(|p| !p.is_file()) {
      return Err(DictionaryError::DictionaryNotFound(path.display().to_string()));
    }

    self.user_dictionaries.extend(paths);
    Ok(self)
  }

  /// Constructor for DictionaryManager from the `[dictionary]` configuration section
  pub fn from_config(config: &DictionaryConfig) -> Result<Self, DictionaryError> {
    let manager = match &config.source {
      DictionarySource::Preset { preset } => match config.dictionary_cache_dir() {
        Some(cache_dir) => Self::with_preset_in((*preset).into(), cache_dir),
        None => Self::with_preset((*preset).into())?,
      },
      DictionarySource::Compiled { path } => Self::from_local_path(path)?,
      DictionarySource::Mecab { dir } => Self::from_mecab_sources(dir)?,
    };

    manager.with_user_dictionaries(&config.user_dictionaries)
  }

  /// Load dictionary
  /// Returns `Arc<Dictionary>` as we want a shared dictionary
  /// - Loads (or compiles, for MeCab-format sources) the dictionary on the first call
  /// - Returns a clone of `Arc<Dictionary>` from the second call onwards
  /// - If an error occurs on the first call, caches the error and keeps returning it
  ///
  /// User dictionaries are not part of the system dictionary; see [`Self::analyzer`].
  pub fn load(&self) -> Result<Arc<Dictionary>, DictionaryError> {
    self.dictionary.get_or_init(|| self.load_inner().map(Arc::new)).clone()
  }

  /// Builds an analyzer over the managed dictionary with the user dictionaries attached
  pub fn analyzer(&self) -> Result<VibratoAnalyzer, DictionaryError> {
    let analyzer = VibratoAnalyzer::from_shared_dictionary(self.load()?);

    if self.user_dictionaries.is_empty() {
      return Ok(analyzer);
    }

    let lexicon = read_user_lexicon(&self.user_dictionaries)?;
    if lexicon.is_empty() {
      return Ok(analyzer);
    }
    let analyzer = analyzer.with_user_lexicon(&lexicon).map_err(|e| match e {
      TokenizerError::Dictionary(e) => e,
      other => DictionaryError::UserLexicon(Arc::new(other)),
    })?;

    info!(user_dictionaries = self.user_dictionaries.len(), "Attached user dictionaries");
    Ok(analyzer)
  }

  /// Internal implementation of dictionary loading
  fn load_inner(&self) -> Result<Dictionary, DictionaryError> {
    match &self.source {
      Source::Compiled(path) => Self::load_from_local_path(path),
      Source::Preset(preset_kind) => self.load_from_preset(*preset_kind),
      Source::MecabSources(dir) => Self::compile_mecab_sources(dir).map(Dictionary::from_inner),
    }
  }

  /// Loads a dictionary from a compiled local dictionary file
  fn load_from_local_path(path: &Path) -> Result<Dictionary, DictionaryError> {
    let dict = Dictionary::from_path(path, LoadMode::TrustCache)
      .map_err(|e| DictionaryError::VibratoLoad(Arc::new(e)))?;
    info!(path = %path.display(), "Loaded compiled dictionary");
    Ok(dict)
  }

  /// Load processing when preset dictionary is set
  /// Downloads and loads the dictionary file on the first run
  /// Loads from the cache directory from the second time onwards
  fn load_from_preset(
    &self,
    preset_kind: PresetDictionaryKind,
  ) -> Result<Dictionary, DictionaryError> {
    std::fs::create_dir_all(&self.cache_dir)
      .map_err(|e| DictionaryError::CacheDirCreationFailed(Arc::new(e)))?;

    // Create a subdirectory based on the dictionary name
    let dict_dir = self.cache_dir.join(preset_kind.name());

    let dict = Dictionary::from_preset_with_download(preset_kind, &dict_dir)
      .map_err(|e| DictionaryError::PresetDictDownloadFailed(Arc::new(e)))?;
    info!(preset = preset_kind.name(), dir = %dict_dir.display(), "Loaded preset dictionary");
    Ok(dict)
  }

  /// Compiles MeCab-format sources in memory
  fn compile_mecab_sources(dir: &Path) -> Result<DictionaryInner, DictionaryError> {
    let dict = SystemDictionaryBuilder::from_readers(
      open_source(&dir.join(LEX_CSV))?,
      open_source(&dir.join(MATRIX_DEF))?,
      open_source(&dir.join(CHAR_DEF))?,
      open_source(&dir.join(UNK_DEF))?,
    )
    .map_err(|e| DictionaryError::VibratoLoad(Arc::new(e)))?;

    info!(dir = %dir.display(), "Compiled MeCab source dictionary");
    Ok(dict)
  }
}

/// Concatenates the user dictionary files in order
pub(crate) fn read_user_lexicon(paths: &[PathBuf]) -> Result<String, DictionaryError> {
  let mut lexicon = String::new();
  for path in paths {
    let content = std::fs::read_to_string(path).map_err(|e| DictionaryError::ReadFailed {
      path: path.clone(),
      source: Arc::new(e),
    })?;
    let content = content.trim_end_matches(['\r', '\n']);
    if content.is_empty() {
      continue;
    }
    lexicon.push_str(content);
    lexicon.push('\n');
  }
  Ok(lexicon)
}

fn open_source(path: &Path) -> Result<File, DictionaryError> {
  File::open(path).map_err(|e| DictionaryError::ReadFailed {
    path: path.to_path_buf(),
    source: Arc::new(e),
  })
}

/// Returns the default cache directory path according to the OS
///
/// | OS      | Example Path                                  |
/// |---------|-----------------------------------------------|
/// | Linux   | `~/.cache/keitaiso/dict`                      |
/// | macOS   | `~/Library/Caches/keitaiso/dict`              |
/// | Windows | `C:\Users\{user}\AppData\Local\keitaiso\dict` |
pub fn default_cache_dir() -> Result<PathBuf, DictionaryError> {
  let base = dirs::cache_dir().ok_or(DictionaryError::CacheDirNotFound)?;

  Ok(base.join("keitaiso").join("dict"))
}

/// Manual `Debug` implementation for `DictionaryManager`
///
/// Since `vibrato_rkyv::Dictionary` does not implement the `Debug` trait,
/// `#[derive(Debug)]` cannot be used. Displays only meta information instead.
impl fmt::Debug for DictionaryManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DictionaryManager")
      .field("cache_dir", &self.cache_dir)
      .field("source", &self.source)
      .field("user_dictionaries", &self.user_dictionaries)
      .field("dictionary_initialized", &self.dictionary.get().is_some())
      .finish()
  }
}
