//! 辞書管理と vibrato 解析器を通した統合テスト

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vibrato_rkyv::SystemDictionaryBuilder;
use vibrato_rkyv::dictionary::PresetDictionaryKind;

use keitaiso::config::{DictionaryConfig, KeitaisoConfig};
use keitaiso::dictionary::DictionaryManager;
use keitaiso::errors::{DictionaryError, TokenizerError};
use keitaiso::{Keitaiso, KeitaisoError, Token};

// 最小の MeCab 形式辞書（IPADIC と同じ素性レイアウト）
const LEX: &str = "すもも,1,1,10,名詞,一般,*,*,*,*,すもも,スモモ,スモモ
もも,1,1,10,名詞,一般,*,*,*,*,もも,モモ,モモ
桃,1,1,10,名詞,一般,*,*,*,*,桃,モモ,モモ
内,1,1,10,名詞,非自立,副詞可能,*,*,*,内,ウチ,ウチ
も,2,2,5,助詞,係助詞,*,*,*,*,も,モ,モ
の,2,2,5,助詞,連体化,*,*,*,*,の,ノ,ノ
です,3,3,5,助動詞,*,*,*,特殊・デス,基本形,です,デス,デス
";
const MATRIX: &str = "4 4
0 0 0
0 1 0
0 2 0
0 3 0
1 0 0
1 1 0
1 2 0
1 3 0
2 0 0
2 1 0
2 2 0
2 3 0
3 0 0
3 1 0
3 2 0
3 3 0
";
const CHAR: &str = "DEFAULT 0 1 0\n";
const UNK: &str = "DEFAULT,1,1,1000,名詞,一般,*,*,*,*,*\n";
const CHAR_WITH_SPACE: &str = "DEFAULT 0 1 0\nSPACE 0 1 0\n0x0020 SPACE\n";
const UNK_WITH_SPACE: &str = "DEFAULT,1,1,1000,名詞,一般,*,*,*,*,*\nSPACE,1,1,100,記号,空白,*,*,*,*,*\n";

fn write_mecab_sources(dir: &Path) {
  fs::write(dir.join("lex.csv"), LEX).unwrap();
  fs::write(dir.join("matrix.def"), MATRIX).unwrap();
  fs::write(dir.join("char.def"), CHAR).unwrap();
  fs::write(dir.join("unk.def"), UNK).unwrap();
}

/// MeCab ソースをコンパイルし、`system.dic` として書き出す
fn write_compiled_dictionary(dir: &Path) -> PathBuf {
  let dict = SystemDictionaryBuilder::from_readers(
    LEX.as_bytes(),
    MATRIX.as_bytes(),
    CHAR.as_bytes(),
    UNK.as_bytes(),
  )
  .unwrap();
  let path = dir.join("system.dic");
  dict.write(File::create(&path).unwrap()).unwrap();
  path
}

/// DictionaryManager のコンストラクタが正常に動作することを確認する。
#[test]
fn create_dictionary_manager_with_preset() {
  let result = DictionaryManager::with_preset(PresetDictionaryKind::Ipadic);

  // コンストラクタ自体はネットワーク不要なので成功するはず
  assert!(
    result.is_ok(),
    "DictionaryManager の構築に失敗: {:?}",
    result.err()
  );
}

/// 存在しないパスを指定した場合にエラーが返ることを確認する。
#[test]
fn from_local_path_with_nonexistent_file() {
  let err = DictionaryManager::from_local_path("/nonexistent/path/to/system.dic").unwrap_err();

  assert!(
    matches!(err, DictionaryError::DictionaryNotFound(_)),
    "期待されるエラー型ではありません: {:?}",
    err
  );
}

/// MeCab ソース辞書からパイプラインを構築し、すもも文を解析できることを確認する。
#[test]
fn mecab_source_pipeline_tokenizes_sumomo() {
  let tmp = TempDir::new().unwrap();
  write_mecab_sources(tmp.path());

  let keitaiso = Keitaiso::builder()
    .allowed_parts_of_speech(["名詞", "動詞"])
    .stop_words(["*", "の"])
    .build_with_dictionary(DictionaryConfig::mecab(tmp.path()))
    .expect("パイプライン構築失敗");

  let raw = keitaiso.raw_analyze("すももも桃も桃の内です").unwrap();
  assert_eq!(raw.len(), 8);
  assert_eq!(raw[7], Token::new(7, "助動詞", "です"));

  assert_eq!(
    keitaiso.tokenize("すももも桃も桃の内です").unwrap(),
    vec![
      Token::new(0, "名詞", "すもも"),
      Token::new(2, "名詞", "桃"),
      Token::new(4, "名詞", "桃"),
      Token::new(6, "名詞", "内"),
    ]
  );
  assert_eq!(
    keitaiso.to_space_joined_string("すももも桃も桃の内です").unwrap(),
    "すもも 桃 桃 内"
  );
}

/// ユーザー辞書が複数ファイルでも順に取り込まれることを確認する。
#[test]
fn user_dictionaries_extend_the_lexicon() {
  let tmp = TempDir::new().unwrap();
  write_mecab_sources(tmp.path());

  let user1 = tmp.path().join("user1.csv");
  let user2 = tmp.path().join("user2.csv");
  fs::write(&user1, "桃太郎,1,1,-100,名詞,固有名詞,人名,一般,*,*,桃太郎,モモタロウ,モモタロー\n")
    .unwrap();
  fs::write(&user2, "鬼ヶ島,1,1,-100,名詞,固有名詞,地域,一般,*,*,鬼ヶ島,オニガシマ,オニガシマ\n")
    .unwrap();

  let keitaiso = Keitaiso::builder()
    .allowed_parts_of_speech(["名詞"])
    .user_dictionaries([&user1, &user2])
    .build_with_dictionary(DictionaryConfig::mecab(tmp.path()))
    .expect("パイプライン構築失敗");

  let words = keitaiso.to_space_joined_string("桃太郎も鬼ヶ島").unwrap();
  assert_eq!(words, "桃太郎 鬼ヶ島");
}

/// コンパイル済み辞書にもユーザー辞書を追加できることを確認する。
#[test]
fn user_dictionaries_extend_a_compiled_dictionary() {
  let tmp = TempDir::new().unwrap();
  let compiled = write_compiled_dictionary(tmp.path());

  let user = tmp.path().join("user.csv");
  fs::write(&user, "桃太郎,1,1,-100,名詞,固有名詞,人名,一般,*,*,桃太郎,モモタロウ,モモタロー\n")
    .unwrap();

  let keitaiso = Keitaiso::builder()
    .allowed_parts_of_speech(["名詞"])
    .user_dictionaries([&user])
    .build_with_dictionary(DictionaryConfig::compiled(&compiled))
    .expect("パイプライン構築失敗");

  let raw = keitaiso.raw_analyze("桃太郎").unwrap();
  assert_eq!(raw, vec![Token::new(0, "名詞", "桃太郎")]);
  assert_eq!(keitaiso.to_space_joined_string("桃太郎も桃").unwrap(), "桃太郎 桃");
}

/// 構築済み vibrato 解析器にビルダーからユーザー辞書を追加できることを確認する。
#[test]
fn builder_attaches_user_dictionaries_to_prebuilt_analyzer() {
  let tmp = TempDir::new().unwrap();
  let compiled = write_compiled_dictionary(tmp.path());
  let user = tmp.path().join("user.csv");
  fs::write(&user, "鬼ヶ島,1,1,-100,名詞,固有名詞,地域,一般,*,*,鬼ヶ島,オニガシマ,オニガシマ\n")
    .unwrap();

  let manager = DictionaryManager::from_local_path(&compiled).unwrap();
  let keitaiso = Keitaiso::builder()
    .allowed_parts_of_speech(["名詞"])
    .user_dictionaries([&user])
    .build(manager.analyzer().unwrap())
    .unwrap();

  assert_eq!(keitaiso.to_space_joined_string("鬼ヶ島").unwrap(), "鬼ヶ島");
}

/// 品詞リストが空の場合、構築方法によらず全トークンが除外されることを確認する。
#[test]
fn empty_parts_of_speech_yield_no_tokens_on_every_path() {
  let tmp = TempDir::new().unwrap();
  write_mecab_sources(tmp.path());

  let by_dictionary = Keitaiso::builder()
    .allowed_parts_of_speech(Vec::<String>::new())
    .build_with_dictionary(DictionaryConfig::mecab(tmp.path()))
    .expect("パイプライン構築失敗");
  assert!(by_dictionary.tokenize("すももも桃も桃の内です").unwrap().is_empty());

  let manager = DictionaryManager::from_mecab_sources(tmp.path()).unwrap();
  let by_analyzer = Keitaiso::builder()
    .allowed_parts_of_speech(Vec::<String>::new())
    .build(manager.analyzer().unwrap())
    .unwrap();
  assert!(by_analyzer.tokenize("すももも桃も桃の内です").unwrap().is_empty());
}

/// SPACE カテゴリを持つ辞書で ignore_space を指定すると空白がトークンにならないことを確認する。
#[test]
fn ignore_space_drops_space_tokens() {
  let tmp = TempDir::new().unwrap();
  write_mecab_sources(tmp.path());
  fs::write(tmp.path().join("char.def"), CHAR_WITH_SPACE).unwrap();
  fs::write(tmp.path().join("unk.def"), UNK_WITH_SPACE).unwrap();

  let keeps_space = Keitaiso::builder()
    .build_with_dictionary(DictionaryConfig::mecab(tmp.path()))
    .expect("パイプライン構築失敗");
  let raw = keeps_space.raw_analyze("桃 すもも").unwrap();
  assert_eq!(raw.len(), 3);
  assert_eq!(raw[1], Token::new(1, "記号", "*"));

  let mut dictionary = DictionaryConfig::mecab(tmp.path());
  dictionary.ignore_space = true;
  let ignores_space =
    Keitaiso::builder().build_with_dictionary(dictionary).expect("パイプライン構築失敗");
  assert_eq!(
    ignores_space.raw_analyze("桃 すもも").unwrap(),
    vec![Token::new(0, "名詞", "桃"), Token::new(1, "名詞", "すもも")]
  );
}

/// SPACE カテゴリのない辞書で ignore_space を指定するとトークナイザー設定エラーになることを確認する。
#[test]
fn ignore_space_without_space_category_is_a_setup_error() {
  let tmp = TempDir::new().unwrap();
  write_mecab_sources(tmp.path());

  let json = serde_json::json!({
    "dictionary": { "source": { "kind": "mecab", "dir": tmp.path() }, "ignore_space": true },
  });
  let config: KeitaisoConfig = serde_json::from_value(json).unwrap();

  let err = Keitaiso::from_config(&config).unwrap_err();
  assert!(
    matches!(err, KeitaisoError::Tokenizer(TokenizerError::Setup(_))),
    "期待されるエラー型ではありません: {:?}",
    err
  );
}

/// 設定 JSON からパイプラインを構築できることを確認する。
#[test]
fn from_config_builds_pipeline() {
  let tmp = TempDir::new().unwrap();
  write_mecab_sources(tmp.path());

  let json = serde_json::json!({
    "dictionary": { "source": { "kind": "mecab", "dir": tmp.path() } },
    "filter": { "allowed_parts_of_speech": ["名詞"], "allowed_words": ["桃"] },
  });
  let config: KeitaisoConfig = serde_json::from_value(json).unwrap();

  let keitaiso = Keitaiso::from_config(&config).expect("パイプライン構築失敗");
  let counts = keitaiso.to_frequency_map("すももも桃も桃の内です").unwrap();

  assert_eq!(counts.len(), 1);
  assert_eq!(counts["桃"], 2);
}

/// キャッシュ済み IPADIC での解析テスト。
/// 辞書キャッシュが存在しない場合はスキップする。
#[test]
fn tokenize_with_cached_ipadic() {
  let manager = DictionaryManager::with_preset(PresetDictionaryKind::Ipadic)
    .expect("DictionaryManager 構築失敗");

  if !manager.cache_dir().join(PresetDictionaryKind::Ipadic.name()).exists() {
    eprintln!("辞書キャッシュが存在しないためスキップ");
    return;
  }

  let keitaiso = Keitaiso::builder()
    .allowed_parts_of_speech(["名詞", "動詞"])
    .stop_words(["*", "の"])
    .build(manager.analyzer().expect("辞書ロード失敗"))
    .unwrap();

  let tokens = keitaiso.tokenize("すももも桃も桃の内です").unwrap();
  let base_forms: Vec<&str> = tokens.iter().map(|t| t.base_form.as_str()).collect();
  assert_eq!(base_forms, vec!["すもも", "桃", "桃", "内"]);
}

/// プリセット辞書のダウンロード＆ロード テスト。
///
/// ネットワークアクセスと大容量ファイルの処理が必要なため
/// `#[ignore]` を付けている。
///
/// 実行方法:
/// ```bash
/// cargo test -- --ignored download_and_load_ipadic
/// ```
#[test]
#[ignore = "辞書ダウンロードは時間がかかるため通常テストから除外"]
fn download_and_load_ipadic() {
  let manager = DictionaryManager::with_preset(PresetDictionaryKind::Ipadic)
    .expect("DictionaryManager の構築に失敗");

  // 辞書をロード（初回はダウンロードが発生する）
  let dict = manager.load();
  assert!(dict.is_ok(), "辞書のロードに失敗: {:?}", dict.err());

  // 2回目のロードはキャッシュから取得される
  let dict2 = manager.load();
  assert!(dict2.is_ok(), "2回目のロードに失敗");
}
