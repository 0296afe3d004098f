//! analyzer module
//!
//! The morphological analyzer is an external collaborator. Everything the
//! pipeline needs from it is captured by the [`Analyzer`] trait: text in,
//! ordered `(surface, feature)` records out.

pub mod mecab_format;
pub mod vibrato_analyzer;

use crate::errors::TokenizerError;

/// Re-exports
pub use mecab_format::{LineAnalyzer, parse_mecab_output, render_mecab_output};
pub use vibrato_analyzer::VibratoAnalyzer;

/// Feature field holding the part of speech
pub const PART_OF_SPEECH_FIELD: usize = 0;

/// Feature field holding the base form in the IPADIC layout
/// (`品詞,品詞細分類1,品詞細分類2,品詞細分類3,活用型,活用形,原形,読み,発音`)
pub const DEFAULT_BASE_FORM_FIELD: usize = 6;

/// One morpheme as reported by the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
  /// Surface form as it appears in the text
  pub surface: String,

  /// Comma separated detailed tag (e.g. `名詞,一般,*,*,*,*,桃,モモ,モモ`)
  pub feature: String,
}

impl RawRecord {
  /// Constructor for RawRecord
  pub fn new(surface: impl Into<String>, feature: impl Into<String>) -> Self {
    Self {
      surface: surface.into(),
      feature: feature.into(),
    }
  }

  /// Returns the feature sub-field at `field`
  ///
  /// # Errors
  /// `TokenizerError::MalformedFeature` if the feature has fewer sub-fields.
  pub fn feature_field(&self, field: usize) -> Result<&str, TokenizerError> {
    self.feature.split(',').nth(field).ok_or_else(|| TokenizerError::MalformedFeature {
      feature: self.feature.clone(),
      field,
    })
  }

  /// Returns the part of speech (first feature sub-field)
  pub fn part_of_speech(&self) -> Result<&str, TokenizerError> {
    self.feature_field(PART_OF_SPEECH_FIELD)
  }
}

/// Morphological analyzer seam
///
/// Implementations must return records in text order, one per morpheme,
/// without terminator records.
pub trait Analyzer {
  /// Analyzes `text` in one pass
  fn analyze(&self, text: &str) -> Result<Vec<RawRecord>, TokenizerError>;

  /// Attaches a user lexicon (MeCab lexicon CSV), replacing any previous one
  ///
  /// # Errors
  /// `TokenizerError::UserLexiconUnsupported` unless the analyzer can take one
  fn with_user_lexicon(self, _lexicon: &str) -> Result<Self, TokenizerError>
  where
    Self: Sized,
  {
    Err(TokenizerError::UserLexiconUnsupported)
  }
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
  fn analyze(&self, text: &str) -> Result<Vec<RawRecord>, TokenizerError> {
    (**self).analyze(text)
  }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
  fn analyze(&self, text: &str) -> Result<Vec<RawRecord>, TokenizerError> {
    (**self).analyze(text)
  }
}
