/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;

use littre_enrich::errors::CorpusError;
use littre_enrich::file_utils::{FLAGS_FILE_NAME, FileManager};
use littre_enrich::model::ReviewFlag;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "shard.json", "[]")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(Path::new("/tmp/corpus/a.json"), Path::new("/tmp/output"));

    assert_eq!(output_path, Path::new("/tmp/output/a.enriched.json"));
}

/// Test that shard discovery skips earlier outputs
#[test]
fn test_findShards_withOutputsPresent_shouldOnlyReturnInputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.json", "[]")?;
    common::create_test_file(dir, "a.json", "[]")?;
    common::create_test_file(dir, "a.enriched.json", "[]")?;
    common::create_test_file(dir, FLAGS_FILE_NAME, "[]")?;
    common::create_test_file(dir, "notes.txt", "")?;

    let shards = FileManager::find_shards(dir, &[])?;

    assert_eq!(shards, vec![dir.join("a.json"), dir.join("b.json")]);
    Ok(())
}

/// Test that excluded files are skipped even when given by a relative-looking path
#[test]
fn test_findShards_withExcludedConfig_shouldSkipIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "A.json", "[]")?;
    common::create_test_file(dir, "conf.json", "{}")?;

    let shards = FileManager::find_shards(dir, &[dir.join(".").join("conf.json"), dir.join("missing.json")])?;

    assert_eq!(shards, vec![dir.join("A.json")]);
    Ok(())
}

/// Test that a single file is its own shard
#[test]
fn test_findShards_withFile_shouldReturnIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let shard = common::create_test_file(temp_dir.path(), "A.json", "[]")?;

    assert_eq!(FileManager::find_shards(&shard, &[])?, vec![shard]);
    Ok(())
}

/// Test that a shard written by the helpers loads back
#[test]
fn test_loadShard_withValidShard_shouldReturnEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let shard = common::write_shard(temp_dir.path(), "A.json", &common::sample_corpus(3))?;

    let docs = FileManager::load_shard(&shard)?;

    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0].headword, "ABAISSER");
    assert_eq!(docs[1].xml_id, "chat-1");
    Ok(())
}

/// Test that invalid JSON surfaces as a decode error naming the file
#[test]
fn test_loadShard_withInvalidJson_shouldReturnDecodeError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let shard = common::create_test_file(temp_dir.path(), "broken.json", r#"[{"headword": }]"#)?;

    let result = FileManager::load_shard(&shard);

    match result {
        Err(CorpusError::Decode { path, .. }) => assert_eq!(path, shard),
        other => panic!("expected a decode error, got {:?}", other.map(|docs| docs.len())),
    }
    Ok(())
}

/// Test that a missing shard surfaces as an I/O error
#[test]
fn test_loadShard_withMissingFile_shouldReturnIoError() {
    let result = FileManager::load_shard("/definitely/not/here.json");

    assert!(matches!(result, Err(CorpusError::Io { .. })));
}

/// Test that save_json creates missing parent directories
#[test]
fn test_saveJson_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("nested").join(FLAGS_FILE_NAME);
    let flags: Vec<ReviewFlag> = Vec::new();

    FileManager::save_json(&path, &flags)?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(std::fs::read_to_string(&path)?, "[]");
    Ok(())
}

/// Test that a larger document is fully on disk when save_json returns
#[test]
fn test_saveJson_withShard_shouldWriteCompleteFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("A.enriched.json");
    let docs: Vec<_> = common::sample_corpus(50).iter().map(|entry| entry.to_doc()).collect();

    FileManager::save_json(&path, &docs)?;

    assert_eq!(FileManager::load_shard(&path)?.len(), 50);
    Ok(())
}
