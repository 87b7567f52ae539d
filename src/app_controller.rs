use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::enrichment::{EnrichmentPipeline, EnrichmentReport, PipelineConfig};
use crate::errors::CorpusError;
use crate::file_utils::{FLAGS_FILE_NAME, FileManager};
use crate::model::review::count_by_type;
use crate::model::{Entry, EntryDoc, FlagType};

// @module: Application controller for corpus enrichment

/// One shard after the mutating phases
struct EnrichedShard {
    source: PathBuf,
    entries: Vec<Entry>,
    report: EnrichmentReport,
}

/// Outcome of a corpus run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Shards enriched and written
    pub shards: usize,

    /// Merged statistics of every shard
    pub report: EnrichmentReport,

    /// Flag counts over the whole corpus
    pub flag_counts: BTreeMap<FlagType, usize>,

    /// Outputs that already existed and blocked the run
    pub existing_outputs: Vec<PathBuf>,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Whether the run stopped because outputs already existed
    pub fn was_skipped(&self) -> bool {
        !self.existing_outputs.is_empty()
    }

    pub fn total_flags(&self) -> usize {
        self.flag_counts.values().sum()
    }
}

/// Main application controller for corpus enrichment
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared across shard tasks
    pipeline: Arc<EnrichmentPipeline>,

    // @field: Files in the input directory that are not shards
    excluded_paths: Vec<PathBuf>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let pipeline = Arc::new(EnrichmentPipeline::new(PipelineConfig::from(&config)));

        Ok(Self {
            config,
            pipeline,
            excluded_paths: Vec::new(),
        })
    }

    /// Never treat this file as a corpus shard, typically the config file
    pub fn with_excluded_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.excluded_paths.push(path.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Enrich a shard file or a directory of shards and write the results
    pub async fn run(&self, input: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        let start_time = Instant::now();

        if !input.exists() {
            return Err(anyhow!("Input path does not exist: {:?}", input));
        }

        let shards = FileManager::find_shards(&input, &self.excluded_paths)?;
        if shards.is_empty() {
            warn!("No corpus shards found in {:?}", input);
            return Ok(RunSummary::default());
        }

        FileManager::ensure_dir(&output_dir)?;

        let flags_path = output_dir.join(FLAGS_FILE_NAME);
        let existing_outputs = Self::existing_outputs(&shards, &output_dir, &flags_path);
        if !existing_outputs.is_empty() && !force_overwrite {
            warn!(
                "Skipping run, {} output file(s) already exist in {:?} (use -f to force overwrite)",
                existing_outputs.len(),
                output_dir
            );
            return Ok(RunSummary {
                existing_outputs,
                ..Default::default()
            });
        }

        info!("Enriching {} shard(s) from {:?}", shards.len(), input);
        let enriched = self.enrich_shards(shards).await?;

        let mut report = EnrichmentReport::default();
        let mut corpus: Vec<Entry> = Vec::new();
        let shard_count = enriched.len();

        for shard in enriched {
            let output_path = FileManager::generate_output_path(&shard.source, &output_dir);
            let docs: Vec<EntryDoc> = shard.entries.iter().map(Entry::to_doc).collect();
            FileManager::save_json(&output_path, &docs)?;
            debug!("Wrote {} entries to {:?}", docs.len(), output_path);

            report.merge(&shard.report);
            corpus.extend(shard.entries);
        }

        // Calibration must not depend on how the corpus was sharded
        let flags = self.pipeline.collect_flags(&corpus);
        FileManager::save_json(&flags_path, &flags)?;

        let flag_counts = count_by_type(&flags);
        report.log_summary();
        info!("Review flags ({} total):", flags.len());
        for (flag_type, count) in &flag_counts {
            info!("  {:<18} {:>8}", flag_type.as_str(), count);
        }

        let duration = start_time.elapsed();
        info!("Done in {:.2}s, flags written to {:?}", duration.as_secs_f32(), flags_path);

        Ok(RunSummary {
            shards: shard_count,
            report,
            flag_counts,
            existing_outputs: Vec::new(),
            duration,
        })
    }

    fn existing_outputs(shards: &[PathBuf], output_dir: &Path, flags_path: &Path) -> Vec<PathBuf> {
        shards
            .iter()
            .map(|shard| FileManager::generate_output_path(shard, output_dir))
            .chain(std::iter::once(flags_path.to_path_buf()))
            .filter(|path| FileManager::file_exists(path))
            .collect()
    }

    /// Run the mutating phases on every shard, bounded by `concurrent_shards`
    async fn enrich_shards(&self, shards: Vec<PathBuf>) -> Result<Vec<EnrichedShard>> {
        let progress_bar = ProgressBar::new(shards.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} shards ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Enriching");

        let results = stream::iter(shards.into_iter().enumerate())
            .map(|(shard_index, path)| {
                let pipeline = self.pipeline.clone();
                let progress_bar = progress_bar.clone();
                async move {
                    let display = path.display().to_string();
                    let result = tokio::task::spawn_blocking(move || Self::enrich_shard(&pipeline, path))
                        .await
                        .with_context(|| format!("Shard task panicked: {}", display))
                        .and_then(|result| result.map_err(anyhow::Error::from));
                    progress_bar.inc(1);
                    (shard_index, result)
                }
            })
            .buffer_unordered(self.config.concurrent_shards)
            .collect::<Vec<_>>()
            .await;

        progress_bar.finish_and_clear();

        // Sort results by shard index to keep corpus order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(idx, _)| *idx);

        let mut shards = Vec::with_capacity(sorted_results.len());
        let mut errors = Vec::new();
        for (_, result) in sorted_results {
            match result {
                Ok(shard) => shards.push(shard),
                Err(e) => errors.push(format!("{:#}", e)),
            }
        }

        if !errors.is_empty() {
            let error_message = format!("Failed to enrich all shards: {}", errors.join("; "));
            error!("{}", error_message);
            return Err(anyhow!(error_message));
        }

        Ok(shards)
    }

    fn enrich_shard(pipeline: &EnrichmentPipeline, path: PathBuf) -> Result<EnrichedShard, CorpusError> {
        let docs = FileManager::load_shard(&path)?;
        let mut entries: Vec<Entry> = docs.into_iter().map(Entry::from_doc).collect();

        let report = pipeline.enrich(&mut entries);

        for entry in &entries {
            entry.check_integrity().map_err(|source| CorpusError::Integrity {
                headword: entry.headword.clone(),
                source,
            })?;
        }

        debug!("Enriched {} entries from {:?}", entries.len(), path);
        Ok(EnrichedShard {
            source: path,
            entries,
            report,
        })
    }
}
