// crates/keitaiso/src/service.rs

//! Keitaiso: keitaiso クレートの統合ファサード。
//!
//! - 形態素解析 (Analyzer) の呼び出しと `(index, 品詞, 原形)` への整形
//! - 品詞・ストップワード・使用単語によるフィルタ (TokenFilter)
//! - Bag of words / わかち書きへの変換
//!
//! 外部からは、この構造体だけを意識すればよい。

use std::path::PathBuf;

use tracing::debug;

use crate::analyzer::{Analyzer, DEFAULT_BASE_FORM_FIELD, VibratoAnalyzer};
use crate::config::{DictionaryConfig, FilterConfig, KeitaisoConfig};
use crate::dictionary::DictionaryManager;
use crate::dictionary::dictionary_manager::read_user_lexicon;
use crate::errors::{KeitaisoResult, TokenizerError};
use crate::filter::{TokenFilter, default_parts_of_speech};
use crate::models::{FrequencyMap, TextInput, Token, frequency_map};

/// 形態素解析 + フィルタのパイプライン。
///
/// 設定は構築時に固定され、以後変更されない。
/// `Keitaiso<VibratoAnalyzer>` は `Send + Sync` で、呼び出しごとに vibrato の worker を作る。
///
/// # Examples
/// ```rust,no_run
/// use keitaiso::Keitaiso;
/// use keitaiso::config::{DictionaryConfig, DictionaryPreset};
///
/// let keitaiso = Keitaiso::builder()
///   .allowed_parts_of_speech(["名詞", "動詞"])
///   .stop_words(["*", "の"])
///   .build_with_dictionary(DictionaryConfig::preset(DictionaryPreset::Ipadic))
///   .unwrap();
///
/// let wakachi = keitaiso.to_space_joined_string("すももも桃も桃の内です").unwrap();
/// assert_eq!(wakachi, "すもも 桃 桃 内");
/// ```
#[derive(Debug, Clone)]
pub struct Keitaiso<A = VibratoAnalyzer> {
  /// 形態素解析器
  analyzer: A,

  /// フィルタ設定
  filter: TokenFilter,

  /// 原形が入っている素性フィールド
  base_form_field: usize,
}

impl Keitaiso<VibratoAnalyzer> {
  /// ビルダーを返す（品詞は既定の5品詞、その他は空）
  pub fn builder() -> KeitaisoBuilder {
    KeitaisoBuilder::default()
  }

  /// 設定から初期化（設定検証 + 辞書ロード + フィルタ構築）
  ///
  /// # エラー
  /// - 設定が不正
  /// - 辞書ロード失敗
  /// - 辞書に SPACE カテゴリがないのに `ignore_space` が指定された
  pub fn from_config(config: &KeitaisoConfig) -> KeitaisoResult<Self> {
    // ConfigError は #[from] で KeitaisoError に自動変換
    config.validate()?;

    let analyzer = build_vibrato_analyzer(&config.dictionary)?;

    Ok(
      Self::new(analyzer, config.filter.token_filter())
        .with_base_form_field(config.dictionary.base_form_field),
    )
  }
}

impl<A: Analyzer> Keitaiso<A> {
  /// 解析器とフィルタから直接構築する
  pub fn new(analyzer: A, filter: TokenFilter) -> Self {
    Self {
      analyzer,
      filter,
      base_form_field: DEFAULT_BASE_FORM_FIELD,
    }
  }

  /// 原形を取り出す素性フィールドを変更する（IPADIC は 6）
  #[must_use]
  pub fn with_base_form_field(mut self, field: usize) -> Self {
    self.base_form_field = field;
    self
  }

  /// 解析器
  pub fn analyzer(&self) -> &A {
    &self.analyzer
  }

  /// フィルタ設定
  pub fn token_filter(&self) -> &TokenFilter {
    &self.filter
  }

  /// 原形を取り出す素性フィールド
  pub fn base_form_field(&self) -> usize {
    self.base_form_field
  }

  /// フィルタをかけずに形態素解析した結果を返す。
  ///
  /// - `index` は 0 始まりの連番
  /// - テキストでない入力（[`TextInput::Missing`]）は例外にせず、
  ///   センチネル `[{1, "*", "*"}]` を返す
  ///
  /// # エラー
  /// 解析結果の素性に原形フィールドが存在しない場合
  #[doc(alias = "basic_tokenize")]
  pub fn raw_analyze<'a>(&self, text: impl Into<TextInput<'a>>) -> KeitaisoResult<Vec<Token>> {
    let text = match text.into() {
      TextInput::Text(text) => text,
      TextInput::Missing => {
        debug!("Missing input, returning sentinel token");
        return Ok(vec![Token::sentinel()]);
      }
    };

    let records = self.analyzer.analyze(text)?;

    let tokens = records
      .iter()
      .enumerate()
      .map(|(index, record)| -> Result<Token, TokenizerError> {
        Ok(Token::new(
          index,
          record.part_of_speech()?,
          record.feature_field(self.base_form_field)?,
        ))
      })
      .collect::<Result<Vec<_>, TokenizerError>>()?;

    Ok(tokens)
  }

  /// 品詞 → ストップワード → 使用単語 の順でフィルタする
  pub fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
    self.filter.filter(tokens)
  }

  /// text を形態素分解し、フィルタした結果を返す
  pub fn tokenize<'a>(&self, text: impl Into<TextInput<'a>>) -> KeitaisoResult<Vec<Token>> {
    let raw = self.raw_analyze(text)?;
    let total_tokens = raw.len();
    let tokens = self.filter(raw);

    debug!(total_tokens, kept_tokens = tokens.len(), "Filtered tokens");
    Ok(tokens)
  }

  /// text を形態素分解した結果を Bag of words（原形 → 出現回数）で集計する
  pub fn to_frequency_map<'a>(
    &self,
    text: impl Into<TextInput<'a>>,
  ) -> KeitaisoResult<FrequencyMap> {
    Ok(frequency_map(&self.tokenize(text)?))
  }

  /// text を形態素分解した結果を わかち書き（原形を半角スペースで連結）で返す
  pub fn to_space_joined_string<'a>(
    &self,
    text: impl Into<TextInput<'a>>,
  ) -> KeitaisoResult<String> {
    let base_forms: Vec<String> =
      self.tokenize(text)?.into_iter().map(|token| token.base_form).collect();
    Ok(base_forms.join(" "))
  }
}

/// Builds the vibrato analyzer described by the `[dictionary]` section
fn build_vibrato_analyzer(config: &DictionaryConfig) -> KeitaisoResult<VibratoAnalyzer> {
  let manager = DictionaryManager::from_config(config)?;
  let analyzer = manager.analyzer()?;

  if config.ignore_space {
    return Ok(analyzer.ignore_space(true)?);
  }
  Ok(analyzer)
}

/// [`Keitaiso`] のビルダー
///
/// 4つの設定値はすべて省略可能:
/// - `allowed_parts_of_speech`: 既定は `["名詞", "動詞", "形容詞", "副詞", "記号"]`
/// - `stop_words`: 既定は空
/// - `allowed_words`: 既定は空（制限なし）
/// - `user_dictionaries`: 既定は空
#[derive(Debug, Clone)]
pub struct KeitaisoBuilder {
  allowed_parts_of_speech: Vec<String>,
  stop_words: Vec<String>,
  allowed_words: Vec<String>,
  user_dictionaries: Vec<PathBuf>,
  base_form_field: usize,
}

impl Default for KeitaisoBuilder {
  fn default() -> Self {
    Self {
      allowed_parts_of_speech: default_parts_of_speech(),
      stop_words: Vec::new(),
      allowed_words: Vec::new(),
      user_dictionaries: Vec::new(),
      base_form_field: DEFAULT_BASE_FORM_FIELD,
    }
  }
}

impl KeitaisoBuilder {
  /// 出力する品詞を指定する
  #[must_use]
  pub fn allowed_parts_of_speech<I, S>(mut self, parts_of_speech: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.allowed_parts_of_speech = parts_of_speech.into_iter().map(Into::into).collect();
    self
  }

  /// 出力しない単語（原形）を指定する
  #[must_use]
  pub fn stop_words<I, S>(mut self, stop_words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.stop_words = stop_words.into_iter().map(Into::into).collect();
    self
  }

  /// 出力する単語（原形）の集合を指定する。空なら全ての単語を出力する
  #[must_use]
  pub fn allowed_words<I, S>(mut self, allowed_words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.allowed_words = allowed_words.into_iter().map(Into::into).collect();
    self
  }

  /// 形態素解析に用いるユーザー辞書を指定する（指定順に連結される）
  #[must_use]
  pub fn user_dictionaries<I, P>(mut self, paths: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
  {
    self.user_dictionaries = paths.into_iter().map(Into::into).collect();
    self
  }

  /// 原形を取り出す素性フィールドを指定する
  #[must_use]
  pub fn base_form_field(mut self, field: usize) -> Self {
    self.base_form_field = field;
    self
  }

  fn token_filter(&self) -> TokenFilter {
    TokenFilter::new(
      self.allowed_parts_of_speech.iter().cloned(),
      self.stop_words.iter().cloned(),
      self.allowed_words.iter().cloned(),
    )
  }

  /// 構築済みの解析器でパイプラインを作る
  ///
  /// ユーザー辞書が指定されていれば、解析器に追加してから使う。
  ///
  /// # エラー
  /// - ユーザー辞書ファイルの読み込み失敗
  /// - 解析器がユーザー辞書に対応していない (`TokenizerError::UserLexiconUnsupported`)
  pub fn build<A: Analyzer>(self, analyzer: A) -> KeitaisoResult<Keitaiso<A>> {
    let lexicon = read_user_lexicon(&self.user_dictionaries)?;
    let analyzer = if lexicon.is_empty() {
      analyzer
    } else {
      debug!(user_dictionaries = self.user_dictionaries.len(), "Attaching user dictionaries");
      analyzer.with_user_lexicon(&lexicon)?
    };

    Ok(Keitaiso::new(analyzer, self.token_filter()).with_base_form_field(self.base_form_field))
  }

  /// 辞書設定から vibrato 解析器を初期化してパイプラインを作る
  ///
  /// ビルダーのユーザー辞書は `dictionary.user_dictionaries` の後ろに追加される。
  pub fn build_with_dictionary(
    self,
    mut dictionary: DictionaryConfig,
  ) -> KeitaisoResult<Keitaiso<VibratoAnalyzer>> {
    dictionary.user_dictionaries.extend(self.user_dictionaries.iter().cloned());
    dictionary.base_form_field = self.base_form_field;

    let config = KeitaisoConfig {
      dictionary,
      filter: FilterConfig {
        allowed_parts_of_speech: self.allowed_parts_of_speech,
        stop_words: self.stop_words,
        allowed_words: self.allowed_words,
      },
      logging: Default::default(),
    };

    Keitaiso::from_config(&config)
  }
}
