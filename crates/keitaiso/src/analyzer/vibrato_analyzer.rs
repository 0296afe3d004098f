//! Analyzer backed by vibrato-rkyv

use std::fmt;
use std::sync::Arc;
use tracing::debug;
use vibrato_rkyv::Dictionary;
use vibrato_rkyv::Tokenizer as VibratoImpl;
use vibrato_rkyv::dictionary::DictionaryInner;

use super::{Analyzer, RawRecord};
use crate::errors::{DictionaryError, TokenizerError};

/// Japanese analyzer using the Vibrato-rkyv Viterbi tokenizer
///
/// - Only holds the tokenizer (dictionary reference + settings)
/// - `Clone + Send + Sync`; a worker is created per call
#[derive(Clone)]
pub struct VibratoAnalyzer {
  inner: VibratoImpl,
}

impl VibratoAnalyzer {
  /// Constructs an analyzer from an already loaded Dictionary
  pub fn from_dictionary(dict: Dictionary) -> Self {
    Self {
      inner: VibratoImpl::new(dict),
    }
  }

  /// Constructs an analyzer from a shared dictionary (`Arc<Dictionary>`).
  ///
  /// Use this when the dictionary is shared via `Arc`, such as `DictionaryManager::load()`.
  ///
  /// # Examples
  /// ```rust,no_run
  /// # use keitaiso::dictionary::DictionaryManager;
  /// # use keitaiso::analyzer::VibratoAnalyzer;
  /// # use vibrato_rkyv::dictionary::PresetDictionaryKind;
  /// let manager = DictionaryManager::with_preset(PresetDictionaryKind::Ipadic).unwrap();
  /// let dict = manager.load().unwrap();
  /// let analyzer = VibratoAnalyzer::from_shared_dictionary(dict);
  /// ```
  pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
    Self {
      inner: VibratoImpl::from_shared_dictionary(dict),
    }
  }

  /// Constructs an analyzer from a dictionary compiled in memory
  /// (MeCab sources, optionally with a user lexicon)
  pub fn from_inner(dict: DictionaryInner) -> Self {
    Self {
      inner: VibratoImpl::from_inner(dict),
    }
  }

  /// Constructs an analyzer from a prepared vibrato tokenizer
  pub fn from_tokenizer(tokenizer: VibratoImpl) -> Self {
    Self { inner: tokenizer }
  }

  /// MeCab compatible space handling: spaces are not emitted as tokens
  ///
  /// # Errors
  /// `TokenizerError::Setup` if the dictionary defines no `SPACE` category
  pub fn ignore_space(self, yes: bool) -> Result<Self, TokenizerError> {
    let inner = self.inner.ignore_space(yes).map_err(|e| TokenizerError::Setup(Arc::new(e)))?;
    Ok(Self { inner })
  }
}

impl Analyzer for VibratoAnalyzer {
  fn analyze(&self, text: &str) -> Result<Vec<RawRecord>, TokenizerError> {
    // worker holds lattice for analysis and calculation area.
    // Created each time
    let mut worker = self.inner.new_worker();

    worker.reset_sentence(text);
    worker.tokenize();

    debug!(input_text = %text, "Start morphological analysis");

    let mut records = Vec::with_capacity(worker.num_tokens());
    for token in worker.token_iter() {
      let surface = token.surface();
      let feature = token.feature();

      debug!(
        surface = %surface,
        ?feature,
        start = token.range_byte().start,
        end = token.range_byte().end,
        "Token"
      );

      records.push(RawRecord::new(surface, feature));
    }

    debug!(
      input_text = %text,
      total_tokens = records.len(),
      "Morphological analysis completed"
    );

    Ok(records)
  }

  fn with_user_lexicon(self, lexicon: &str) -> Result<Self, TokenizerError> {
    let inner = self
      .inner
      .with_user_lexicon(lexicon.as_bytes())
      .map_err(|e| DictionaryError::UserLexicon(Arc::new(e)))?;
    Ok(Self { inner })
  }
}

/// Manual `Debug` implementation
///
/// `vibrato_rkyv::Tokenizer` does not implement `Debug`.
impl fmt::Debug for VibratoAnalyzer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("VibratoAnalyzer").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use vibrato_rkyv::SystemDictionaryBuilder;

  // Minimal MeCab-format dictionary (IPADIC layout)
  const LEX_CSV: &str = "京都,1,1,5,名詞,固有名詞,地域,一般,*,*,京都,キョウト,キョート
東京都,1,1,9,名詞,固有名詞,地域,一般,*,*,東京都,トウキョウト,トーキョート";
  const MATRIX_DEF: &str = "2 2\n0 0 0\n0 1 0\n1 0 0\n1 1 0";
  const CHAR_DEF: &str = "DEFAULT 0 1 0";
  const UNK_DEF: &str = "DEFAULT,1,1,100,名詞,一般,*,*,*,*,*";

  fn analyzer() -> VibratoAnalyzer {
    let dict = SystemDictionaryBuilder::from_readers(
      LEX_CSV.as_bytes(),
      MATRIX_DEF.as_bytes(),
      CHAR_DEF.as_bytes(),
      UNK_DEF.as_bytes(),
    )
    .unwrap();
    VibratoAnalyzer::from_inner(dict)
  }

  #[test]
  fn analyze_returns_records_in_text_order() {
    let records = analyzer().analyze("京都東京都").unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].surface, "京都");
    assert_eq!(records[0].feature, "名詞,固有名詞,地域,一般,*,*,京都,キョウト,キョート");
    assert_eq!(records[1].surface, "東京都");
    assert_eq!(records[1].feature_field(6).unwrap(), "東京都");
  }

  #[test]
  fn analyze_empty_text() {
    assert!(analyzer().analyze("").unwrap().is_empty());
  }

  #[test]
  fn user_lexicon_adds_words() {
    let analyzer = analyzer()
      .with_user_lexicon("大阪,1,1,5,名詞,固有名詞,地域,一般,*,*,大阪,オオサカ,オーサカ\n")
      .unwrap();

    let records = analyzer.analyze("京都大阪").unwrap();
    let surfaces: Vec<&str> = records.iter().map(|r| r.surface.as_str()).collect();
    assert_eq!(surfaces, vec!["京都", "大阪"]);
    assert_eq!(records[1].feature_field(6).unwrap(), "大阪");
  }

  #[test]
  fn user_lexicon_with_unknown_connection_id_is_rejected() {
    let err = analyzer().with_user_lexicon("大阪,9,9,5,名詞,固有名詞,地域,一般,*,*,大阪\n").unwrap_err();
    assert!(
      matches!(err, TokenizerError::Dictionary(DictionaryError::UserLexicon(_))),
      "{:?}",
      err
    );
  }

  #[test]
  fn analyzer_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<VibratoAnalyzer>();
  }
}
