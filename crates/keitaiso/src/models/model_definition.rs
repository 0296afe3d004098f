//! Data Model Definition
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Part of speech / base form placed in the sentinel token for missing input
pub const SENTINEL_FIELD: &str = "*";

/// Index of the sentinel token
pub const SENTINEL_INDEX: usize = 1;

/// Base form -> occurrence count
pub type FrequencyMap = HashMap<String, usize>;

/// One analyzed morpheme
///
/// `index` is the position in the raw analysis result and survives filtering,
/// so a filtered list can have gaps (e.g. `0, 2, 4, 6`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
  /// Position in the raw analysis result (0 origin)
  pub index: usize,

  /// First part-of-speech field of the feature (e.g. `名詞`)
  pub part_of_speech: String,

  /// Base (dictionary) form
  pub base_form: String,
}

impl Token {
  /// Constructor for Token
  pub fn new(
    index: usize,
    part_of_speech: impl Into<String>,
    base_form: impl Into<String>,
  ) -> Self {
    Self {
      index,
      part_of_speech: part_of_speech.into(),
      base_form: base_form.into(),
    }
  }

  /// Token returned for missing input: `{1, "*", "*"}`
  pub fn sentinel() -> Self {
    Self::new(SENTINEL_INDEX, SENTINEL_FIELD, SENTINEL_FIELD)
  }

  /// Returns true for the missing-input sentinel
  pub fn is_sentinel(&self) -> bool {
    self.index == SENTINEL_INDEX
      && self.part_of_speech == SENTINEL_FIELD
      && self.base_form == SENTINEL_FIELD
  }
}

/// Input accepted by the analysis operations
///
/// Anything that is not text collapses to [`TextInput::Missing`], and analysis of
/// `Missing` yields the single sentinel token instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput<'a> {
  /// Text to analyze
  Text(&'a str),
  /// No text available
  Missing,
}

impl<'a> From<&'a str> for TextInput<'a> {
  fn from(text: &'a str) -> Self {
    TextInput::Text(text)
  }
}

impl<'a> From<&'a String> for TextInput<'a> {
  fn from(text: &'a String) -> Self {
    TextInput::Text(text.as_str())
  }
}

impl<'a, T> From<Option<T>> for TextInput<'a>
where
  T: Into<TextInput<'a>>,
{
  fn from(text: Option<T>) -> Self {
    text.map_or(TextInput::Missing, Into::into)
  }
}

/// Counts base forms of an already tokenized list
pub fn frequency_map(tokens: &[Token]) -> FrequencyMap {
  let mut counts = FrequencyMap::new();
  for token in tokens {
    *counts.entry(token.base_form.clone()).or_insert(0) += 1;
  }
  counts
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sentinel_is_one_star_star() {
    let token = Token::sentinel();
    assert_eq!(token, Token::new(1, "*", "*"));
    assert!(token.is_sentinel());
    assert!(!Token::new(0, "*", "*").is_sentinel());
  }

  #[test]
  fn text_input_from_option() {
    assert_eq!(TextInput::from(Some("桃")), TextInput::Text("桃"));
    assert_eq!(TextInput::from(None::<&str>), TextInput::Missing);

    let owned = String::from("すもも");
    assert_eq!(TextInput::from(Some(&owned)), TextInput::Text("すもも"));
  }

  #[test]
  fn frequency_map_counts_base_forms() {
    let tokens = vec![
      Token::new(0, "名詞", "すもも"),
      Token::new(2, "名詞", "桃"),
      Token::new(4, "名詞", "桃"),
      Token::new(6, "名詞", "内"),
    ];
    let counts = frequency_map(&tokens);

    assert_eq!(counts.len(), 3);
    assert_eq!(counts["すもも"], 1);
    assert_eq!(counts["桃"], 2);
    assert_eq!(counts["内"], 1);
  }

  #[test]
  fn frequency_map_of_empty_list_is_empty() {
    assert!(frequency_map(&[]).is_empty());
  }

  #[test]
  fn token_serializes_with_field_names() {
    let json = serde_json::to_string(&Token::new(2, "名詞", "桃")).unwrap();
    assert_eq!(json, r#"{"index":2,"part_of_speech":"名詞","base_form":"桃"}"#);
  }
}
