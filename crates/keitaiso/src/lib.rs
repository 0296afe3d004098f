//! keitaiso 形態素解析ライブラリー
//!
//! vibrato-rkyv による日本語の形態素解析結果を `(index, 品詞, 原形)` に整形し、
//! 品詞・ストップワード・使用単語でフィルタする

/// 解析器モジュール - Analyzer トレイト、vibrato-rkyv 実装、MeCab 形式の読み書き
pub mod analyzer;

/// 設定モジュール - KeitaisoConfig 等の設定構造体を定義
pub mod config;

/// 辞書モジュール - 形態素解析用辞書の管理・ロード機能を提供
pub mod dictionary;

/// エラーモジュール - KeitaisoError, KeitaisoResult 等のエラー型を定義
pub mod errors;

/// フィルタモジュール - 品詞・ストップワード・使用単語によるトークンフィルタ
pub mod filter;

/// ロギングモジュール - tracing-subscriber の初期化
pub mod logging;

/// データモデルモジュール - Token, TextInput 等のデータ構造を定義
pub mod models;

/// サービスモジュール - Keitaiso パイプライン
pub mod service;

/// 再エクスポート
pub use config::KeitaisoConfig;
pub use errors::{KeitaisoError, KeitaisoResult};
pub use models::{TextInput, Token};
pub use service::{Keitaiso, KeitaisoBuilder};
