//! エラー定義

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// 設定（KeitaisoConfig）関連のエラー
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ConfigError {
  /// dictionary.base_form_field が品詞フィールド (0) と衝突している
  #[error("dictionary.base_form_field は 1 以上である必要があります: actual={actual}")]
  InvalidBaseFormField {
    /// 実際に指定された値
    actual: usize,
  },

  /// dictionary.user_dictionaries に存在しないファイルが含まれている
  #[error("ユーザー辞書ファイルが見つかりません: path={path:?}")]
  UserDictionaryNotFound {
    /// 見つからなかったパス
    path: PathBuf,
  },

  /// dictionary.cache_dir が「存在するディレクトリ」でない（ファイルである等）
  #[error("dictionary.cache_dir がディレクトリではありません: path={path:?}")]
  InvalidDictionaryCacheDir {
    /// 不正なパス
    path: PathBuf,
  },

  /// dictionary.cache_dir の作成に失敗
  #[error("dictionary.cache_dir の作成に失敗しました: path={path:?}, error={source}")]
  DictionaryCacheDirCreationFailed {
    /// 作成しようとしたパス
    path: PathBuf,
    /// 元となった IO エラー
    #[source]
    source: Arc<io::Error>,
  },
}

/// 辞書関連のエラー
/// Vibrato では ipadic, unidic 等のプリセット辞書、コンパイル済み辞書、
/// MeCab 形式のソース辞書を使用可能
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum DictionaryError {
  /// キャッシュディレクトリーが見つからない
  #[error("辞書キャッシュディレクトリーが見つかりません")]
  CacheDirNotFound,

  /// キャッシュディレクトリーの作成失敗
  #[error("辞書キャッシュディレクトリーの作成に失敗しました: {0}")]
  CacheDirCreationFailed(Arc<io::Error>),

  /// 指定された辞書が見つからない
  #[error("指定された辞書が見つかりません: {0}")]
  DictionaryNotFound(String),

  /// 辞書ソースまたはユーザー辞書ファイルの読み込み失敗
  #[error("辞書ファイルの読み込みに失敗しました: path={path:?}, error={source}")]
  ReadFailed {
    /// 読み込もうとしたパス
    path: PathBuf,
    /// 元となった IO エラー
    #[source]
    source: Arc<io::Error>,
  },

  /// ユーザー辞書の内容が不正（CSV 形式・連接 ID など）
  #[error("ユーザー辞書の読み込みに失敗しました: {0}")]
  UserLexicon(Arc<dyn std::error::Error + Send + Sync + 'static>),

  /// vibrato-rkyv による辞書のロード失敗
  #[error("vibrato-rkyv 辞書ロードエラー: {0}")]
  VibratoLoad(Arc<dyn std::error::Error + Send + Sync + 'static>),

  /// vibrato-rkyv のプリセット辞書のダウンロード失敗
  #[error("vibrato-rkyv プリセット辞書ダウンロード失敗: {0}")]
  PresetDictDownloadFailed(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

/// トークナイザー関連エラー
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum TokenizerError {
  /// 辞書起因のエラー
  #[error("辞書エラー: {0}")]
  Dictionary(#[from] DictionaryError),

  /// vibrato-rkyv トークナイザーの設定失敗（SPACE カテゴリ未定義など）
  #[error("トークナイザーの設定に失敗しました: {0}")]
  Setup(Arc<dyn std::error::Error + Send + Sync + 'static>),

  /// 解析器がユーザー辞書の追加に対応していない
  #[error("この解析器はユーザー辞書の追加に対応していません")]
  UserLexiconUnsupported,

  /// 解析結果の行が `表層形\t素性` の形式になっていない
  #[error("解析結果の行が不正です: {line:?}")]
  MalformedRecord {
    /// 問題の行
    line: String,
  },

  /// 素性に必要な数のフィールドが存在しない
  #[error("素性のフィールド数が不足しています: field={field}, feature={feature:?}")]
  MalformedFeature {
    /// 素性文字列
    feature: String,
    /// 参照しようとしたフィールド位置（0 始まり）
    field: usize,
  },
}

/// 統合エラー
/// 本クレートの外部に公開するエラー用 API はこのエラーを返すこと
/// `KeitaisoResult<T>` = `Result<T, KeitaisoError>` として使用する
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum KeitaisoError {
  /// 辞書関連エラー
  #[error(transparent)]
  Dictionary(#[from] DictionaryError),

  /// トークナイザー関連エラー
  #[error(transparent)]
  Tokenizer(#[from] TokenizerError),

  /// 設定エラー
  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// keitaiso クレートの標準 Result 型エイリアス
pub type KeitaisoResult<T> = Result<T, KeitaisoError>;
