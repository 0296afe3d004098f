//! Token filtering
//!
//! Three order-preserving stages applied in sequence:
//! 1. part-of-speech allow-list
//! 2. stop-word block-list (by base form)
//! 3. allowed-word list (by base form, inactive while empty)
//!
//! No stage re-sorts or re-indexes; indices from the raw analysis are kept.

use std::collections::HashSet;

use crate::models::Token;

/// Parts of speech kept by default: noun, verb, adjective, adverb, symbol
pub const DEFAULT_PARTS_OF_SPEECH: [&str; 5] = ["名詞", "動詞", "形容詞", "副詞", "記号"];

/// Returns [`DEFAULT_PARTS_OF_SPEECH`] as owned strings
pub fn default_parts_of_speech() -> Vec<String> {
  DEFAULT_PARTS_OF_SPEECH.iter().map(|pos| pos.to_string()).collect()
}

/// Filter settings, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFilter {
  allowed_parts_of_speech: HashSet<String>,
  stop_words: HashSet<String>,
  allowed_words: HashSet<String>,
}

impl Default for TokenFilter {
  fn default() -> Self {
    Self::new(DEFAULT_PARTS_OF_SPEECH, Vec::<String>::new(), Vec::<String>::new())
  }
}

impl TokenFilter {
  /// Constructor for TokenFilter
  pub fn new<P, S, W>(allowed_parts_of_speech: P, stop_words: S, allowed_words: W) -> Self
  where
    P: IntoIterator,
    P::Item: Into<String>,
    S: IntoIterator,
    S::Item: Into<String>,
    W: IntoIterator,
    W::Item: Into<String>,
  {
    Self {
      allowed_parts_of_speech: allowed_parts_of_speech.into_iter().map(Into::into).collect(),
      stop_words: stop_words.into_iter().map(Into::into).collect(),
      allowed_words: allowed_words.into_iter().map(Into::into).collect(),
    }
  }

  /// Allowed parts of speech
  pub fn allowed_parts_of_speech(&self) -> &HashSet<String> {
    &self.allowed_parts_of_speech
  }

  /// Stop words
  pub fn stop_words(&self) -> &HashSet<String> {
    &self.stop_words
  }

  /// Allowed words (empty = no restriction)
  pub fn allowed_words(&self) -> &HashSet<String> {
    &self.allowed_words
  }

  /// Runs all three stages
  pub fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
    let tokens = self.filter_parts_of_speech(tokens);
    let tokens = self.filter_stop_words(tokens);
    self.filter_allowed_words(tokens)
  }

  /// Keeps tokens whose part of speech is allowed
  pub fn filter_parts_of_speech(&self, tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|t| self.allowed_parts_of_speech.contains(&t.part_of_speech)).collect()
  }

  /// Drops tokens whose base form is a stop word
  pub fn filter_stop_words(&self, tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|t| !self.stop_words.contains(&t.base_form)).collect()
  }

  /// Keeps tokens whose base form is an allowed word; pass-through while the list is empty
  pub fn filter_allowed_words(&self, tokens: Vec<Token>) -> Vec<Token> {
    if self.allowed_words.is_empty() {
      return tokens;
    }
    tokens.into_iter().filter(|t| self.allowed_words.contains(&t.base_form)).collect()
  }
}
