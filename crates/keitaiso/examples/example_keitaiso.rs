//! keitaiso crate example
//!
//! Downloads IPADIC on the first run (cached afterwards), then prints the raw
//! analysis and the filtered tokens of a sample sentence.

use keitaiso::Keitaiso;
use keitaiso::config::{DictionaryConfig, DictionaryPreset, LogLevel};
use keitaiso::logging::init_tracing;

/// Application common result type
type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

const STOP_WORDS: [&str; 10] =
  ["*", "よう", "上", "の", "様", "こちら", "際", "ところ", "はず", "\u{3000}"];

fn main() -> AppResult<()> {
  // RUST_LOG=keitaiso=debug shows per-token logs
  init_tracing(LogLevel::Info);

  let text = "今日は何時に帰ってきますか？　と彼女は尋ねてくる";

  let keitaiso = Keitaiso::builder()
    .allowed_parts_of_speech(["名詞", "動詞", "形容詞", "副詞", "記号"])
    .stop_words(STOP_WORDS)
    .build_with_dictionary(DictionaryConfig::preset(DictionaryPreset::Ipadic))?;

  println!("以下を形態素解析します。");
  println!("{}", text);
  println!("ーーーー");

  println!("結果１：");
  for token in keitaiso.raw_analyze(text)? {
    println!("  [{}, {}, {}]", token.index, token.part_of_speech, token.base_form);
  }
  println!("ーーーー");

  println!("結果２：");
  for token in keitaiso.tokenize(text)? {
    println!("  [{}, {}, {}]", token.index, token.part_of_speech, token.base_form);
  }
  println!("ーーーー");

  println!("Bag of words: {:?}", keitaiso.to_frequency_map(text)?);
  println!("わかち書き: {}", keitaiso.to_space_joined_string(text)?);

  Ok(())
}
