//! Integration tests for the complete Grimoire pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - tutor query → raw records → reconciliation → cards.json
//! - written collection → image path contract
//!
//! Run with: cargo test --test integration_tests

use grimoire_cards::{reconcile_set, CardRecord, Classification};
use grimoire_tutor::TutorClient;
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// A scripted `tutor` stand-in serving one small set.
///
/// The set mixes all three record shapes: a basic land, a double-faced
/// pair sharing collector number 10, and a split card reported twice
/// under one id.
fn fake_tutor(dir: &Path) -> PathBuf {
    let script = r#"#!/bin/sh
case "$3" in
  sets)
    echo '["Duskwood"]'
    ;;
  set)
    echo '[{"id": "1"}, {"id": "2"}, {"id": "3"}, {"id": "4"}, {"id": "4"}]'
    ;;
  card)
    case "$4" in
      1) echo '{"id": "1", "name": "Forest", "rarity": "Basic Land", "number": "7", "image_url": "http://img.test/1.jpg"}' ;;
      2) echo '{"id": "2", "name": "Wolf", "rarity": "Rare", "number": "10a"}' ;;
      3) echo '{"id": "3", "name": "Human", "rarity": "Rare", "number": "10b"}' ;;
      4) echo '{"id": "4", "name": "Fire", "rarity": "Uncommon", "number": "12", "alternate_names": {"de": {"name": "Feuer // Eis"}}}' ;;
    esac
    ;;
esac
"#;
    let path = dir.join("tutor");
    fs::write(&path, script).expect("write fake tutor");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

#[test]
fn test_extract_pipeline_end_to_end() {
    let dir = tempdir().expect("tempdir");
    let client = TutorClient::new(fake_tutor(dir.path()));

    let sets = client.sets().expect("sets");
    assert_eq!(sets, vec!["Duskwood"]);

    let records = client.cards_in_set("Duskwood").expect("records");
    assert_eq!(records.len(), 5);

    let set = reconcile_set(records);
    assert!(set.malformed.is_empty());
    assert_eq!(set.cards.len(), 4);

    // Land passthrough.
    assert_eq!(set.cards["1"].classification, Classification::Normal);
    assert_eq!(set.cards["1"].name, "Forest");

    // Double-faced pair linked both ways.
    assert_eq!(set.cards["2"].classification, Classification::DoubleFace);
    assert_eq!(set.cards["2"].companion_id.as_deref(), Some("3"));
    assert_eq!(set.cards["3"].companion_id.as_deref(), Some("2"));

    // Split card renamed from the German localization.
    assert_eq!(set.cards["4"].classification, Classification::SplitOrFlip);
    assert_eq!(set.cards["4"].name, "Feuer // Eis");

    // Written collection round-trips and stays sorted by id.
    let out = dir.path().join("cards.json");
    fs::write(&out, serde_json::to_string_pretty(&set.cards).expect("json")).expect("write");
    let text = fs::read_to_string(&out).expect("read");
    let reloaded: BTreeMap<String, CardRecord> = serde_json::from_str(&text).expect("parse");
    assert_eq!(reloaded, set.cards);
    let keys: Vec<&String> = reloaded.keys().collect();
    assert_eq!(keys, vec!["1", "2", "3", "4"]);
}

#[test]
fn test_malformed_record_survives_pipeline() {
    // A listing entry whose full record is missing its name must end up
    // on the malformed list without disturbing its neighbors.
    let dir = tempdir().expect("tempdir");
    let script = r#"#!/bin/sh
case "$3" in
  set)
    echo '[{"id": "a"}, {"id": "b"}]'
    ;;
  card)
    case "$4" in
      a) echo '{"id": "a", "rarity": "Rare", "number": "1"}' ;;
      b) echo '{"id": "b", "name": "Fine", "rarity": "Rare", "number": "2"}' ;;
    esac
    ;;
esac
"#;
    let path = dir.path().join("tutor");
    fs::write(&path, script).expect("write fake tutor");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");

    let client = TutorClient::new(path);
    let set = reconcile_set(client.cards_in_set("Any").expect("records"));

    assert_eq!(set.malformed.len(), 1);
    assert_eq!(set.malformed[0].id.as_deref(), Some("a"));
    assert_eq!(set.cards.len(), 1);
    assert!(set.cards.contains_key("b"));
}

#[test]
fn test_image_path_contract_from_written_collection() {
    let cards = reconcile_set(vec![serde_json::json!({
        "id": "70",
        "name": "Lightning Bolt",
        "rarity": "Common",
        "number": "70",
        "image_url": "http://img.test/70.jpg"
    })])
    .cards;

    let card = &cards["70"];
    let path = grimoire_images::card_image_path(Path::new("images"), card);
    assert_eq!(path, Path::new("images/70_Lightning Bolt.jpg"));
}
