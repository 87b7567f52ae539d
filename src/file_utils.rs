use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::CorpusError;
use crate::model::EntryDoc;

// @module: Corpus file and directory utilities

/// Suffix appended to a shard's stem for its enriched output
pub const ENRICHED_SUFFIX: &str = "enriched";

/// Name of the merged review flag file
pub const FLAGS_FILE_NAME: &str = "review_flags.json";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Corpus shards below `input`, or `input` itself when it is a file.
    ///
    /// Previously written outputs and the `excluded` files (such as the
    /// config file) are never picked up as inputs.
    pub fn find_shards<P: AsRef<Path>>(input: P, excluded: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let input = input.as_ref();
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }

        // Paths that do not exist cannot be discovered either
        let excluded: Vec<PathBuf> = excluded.iter().filter_map(|path| fs::canonicalize(path).ok()).collect();
        let is_excluded = |path: &Path| {
            fs::canonicalize(path)
                .map(|canonical| excluded.contains(&canonical))
                .unwrap_or(false)
        };

        let shards = Self::find_files(input, "json")?
            .into_iter()
            .filter(|path| !Self::is_output_file(path) && !is_excluded(path.as_path()))
            .collect();
        Ok(shards)
    }

    fn is_output_file(path: &Path) -> bool {
        let enriched = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(&format!(".{}", ENRICHED_SUFFIX)))
            .unwrap_or(false);
        let flags = path.file_name().is_some_and(|name| name == FLAGS_FILE_NAME);
        enriched || flags
    }

    // @generates: Output path for an enriched shard
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(input_file: P1, output_dir: P2) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(ENRICHED_SUFFIX);
        output_filename.push_str(".json");

        output_dir.as_ref().join(output_filename)
    }

    /// Read one shard: a JSON array of entries
    pub fn load_shard<P: AsRef<Path>>(path: P) -> Result<Vec<EntryDoc>, CorpusError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CorpusError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write any serializable value as pretty JSON, creating parent directories
    pub fn save_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<(), CorpusError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let file = File::create(path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| CorpusError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(io_error)
    }
}
