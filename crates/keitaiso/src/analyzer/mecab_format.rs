//! MeCab 形式の解析結果（1行1形態素）の読み書き
//!
//! ```text
//! すもも\t名詞,一般,*,*,*,*,すもも,スモモ,スモモ
//! も\t助詞,係助詞,*,*,*,*,も,モ,モ
//! EOS
//! ```
//!
//! 最終行 `EOS` と、その後の改行による空行の2行が終端。

use tracing::debug;

use super::{Analyzer, RawRecord};
use crate::errors::TokenizerError;

/// 文末を表す終端行
pub const EOS: &str = "EOS";

/// MeCab 形式の出力を形態素レコードに分解する
///
/// 終端の2行（`EOS` と末尾の空行）は捨てる。CRLF の出力も受け付ける。
///
/// # エラー
/// タブを含まない行があれば `TokenizerError::MalformedRecord`
pub fn parse_mecab_output(output: &str) -> Result<Vec<RawRecord>, TokenizerError> {
  let mut lines: Vec<&str> = output.split('\n').map(|line| line.trim_end_matches('\r')).collect();

  if lines.last() == Some(&"") {
    lines.pop();
  }
  if lines.last() == Some(&EOS) {
    lines.pop();
  }

  lines
    .into_iter()
    .map(|line| {
      line.split_once('\t').map(|(surface, feature)| RawRecord::new(surface, feature)).ok_or_else(
        || TokenizerError::MalformedRecord {
          line: line.to_string(),
        },
      )
    })
    .collect()
}

/// 形態素レコードを MeCab 形式の文字列に書き出す（`EOS` 行と末尾改行を含む）
pub fn render_mecab_output(records: &[RawRecord]) -> String {
  let mut output = String::new();
  for record in records {
    output.push_str(&record.surface);
    output.push('\t');
    output.push_str(&record.feature);
    output.push('\n');
  }
  output.push_str(EOS);
  output.push('\n');
  output
}

/// MeCab 形式の文字列を返す任意の解析関数を [`Analyzer`] として扱うアダプター
///
/// 外部プロセスの MeCab や、テスト用の固定出力をそのまま差し込める。
#[derive(Clone)]
pub struct LineAnalyzer<F> {
  parse: F,
}

impl<F> std::fmt::Debug for LineAnalyzer<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LineAnalyzer").finish_non_exhaustive()
  }
}

impl<F> LineAnalyzer<F>
where
  F: Fn(&str) -> String,
{
  /// 解析関数からアダプターを作成する
  pub fn new(parse: F) -> Self {
    Self { parse }
  }
}

impl<F> Analyzer for LineAnalyzer<F>
where
  F: Fn(&str) -> String,
{
  fn analyze(&self, text: &str) -> Result<Vec<RawRecord>, TokenizerError> {
    let output = (self.parse)(text);
    let records = parse_mecab_output(&output)?;
    debug!(input_text = %text, total_tokens = records.len(), "Parsed line-oriented analyzer output");
    Ok(records)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SUMOMO: &str = "すもも\t名詞,一般,*,*,*,*,すもも,スモモ,スモモ\n\
                        も\t助詞,係助詞,*,*,*,*,も,モ,モ\n\
                        桃\t名詞,一般,*,*,*,*,桃,モモ,モモ\n\
                        EOS\n";

  #[test]
  fn parse_drops_terminator_lines() {
    let records = parse_mecab_output(SUMOMO).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], RawRecord::new("すもも", "名詞,一般,*,*,*,*,すもも,スモモ,スモモ"));
    assert_eq!(records[2].surface, "桃");
  }

  #[test]
  fn parse_empty_sentence() {
    assert!(parse_mecab_output("EOS\n").unwrap().is_empty());
    assert!(parse_mecab_output("").unwrap().is_empty());
  }

  #[test]
  fn parse_accepts_crlf() {
    let records = parse_mecab_output("桃\t名詞,一般,*,*,*,*,桃,モモ,モモ\r\nEOS\r\n").unwrap();
    assert_eq!(records, vec![RawRecord::new("桃", "名詞,一般,*,*,*,*,桃,モモ,モモ")]);
  }

  #[test]
  fn parse_rejects_line_without_tab() {
    let err = parse_mecab_output("桃 名詞\nEOS\n").unwrap_err();
    assert!(
      matches!(err, TokenizerError::MalformedRecord { ref line } if line == "桃 名詞"),
      "unexpected error: {:?}",
      err
    );
  }

  #[test]
  fn render_then_parse_keeps_records() {
    let records = parse_mecab_output(SUMOMO).unwrap();
    assert_eq!(render_mecab_output(&records), SUMOMO);
  }

  #[test]
  fn line_analyzer_runs_parse_function_once() {
    let calls = std::cell::Cell::new(0);
    let analyzer = LineAnalyzer::new(|_text: &str| {
      calls.set(calls.get() + 1);
      SUMOMO.to_string()
    });

    let records = analyzer.analyze("すももも桃").unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(calls.get(), 1);
  }
}
