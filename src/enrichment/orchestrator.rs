/*!
 * Pipeline orchestrator for the enrichment phases.
 *
 * Phases run in a fixed order, each over the whole batch before the next
 * starts:
 * 1. Classification: role, method and confidence for every Indent
 * 2. Locution extraction: canonical forms, reflexive demotions
 * 3. Scope resolution: container Variantes and label children
 * 4. Flag collection: read-only review worklist
 */

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::model::review::count_by_type;
use crate::model::{Entry, FlagType, IndentRole, ReviewFlag};

use super::classifier::{ClassificationStats, RoleClassifier};
use super::flags::{FlagCollector, FlagConfig};
use super::locutions::{ExtractionStats, LocutionExtractor};
use super::scope::{ScopeConfig, ScopeLog, ScopeResolver};

/// Configuration for the enrichment pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    /// Configuration for scope resolution
    pub scope: ScopeConfig,

    /// Configuration for flag collection
    pub flags: FlagConfig,
}

impl PipelineConfig {
    /// Set the calibration seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.flags.calibration_seed = seed;
        self
    }

    /// Set the calibration sample size per (role, method) bucket.
    pub fn with_sample_size(mut self, per_bucket: usize) -> Self {
        self.flags.calibration_per_bucket = per_bucket;
        self
    }

    /// Set the large-scope threshold used by both the resolver and the collector.
    pub fn with_large_scope_threshold(mut self, threshold: usize) -> Self {
        self.scope.large_scope_threshold = threshold;
        self.flags.large_scope_threshold = threshold;
        self
    }
}

/// Phases of the enrichment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Classification,
    LocutionExtraction,
    ScopeResolution,
    FlagCollection,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classification => "classification",
            Self::LocutionExtraction => "locution extraction",
            Self::ScopeResolution => "scope resolution",
            Self::FlagCollection => "flag collection",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated statistics of the mutating phases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    pub entries: usize,
    pub classification: ClassificationStats,
    pub extraction: ExtractionStats,
    pub scope: ScopeLog,
}

impl EnrichmentReport {
    /// Combine reports from separate batches.
    pub fn merge(&mut self, other: &EnrichmentReport) {
        self.entries += other.entries;
        self.classification.merge(&other.classification);
        self.extraction.merge(&other.extraction);
        self.scope.merge(&other.scope);
    }

    /// Log the per-phase tables at info level.
    pub fn log_summary(&self) {
        info!("Enriched {} entries", self.entries);

        info!("Indent roles ({} total):", self.classification.total());
        let mut roles: Vec<(IndentRole, usize)> = self
            .classification
            .role_counts
            .iter()
            .map(|(role, count)| (*role, *count))
            .collect();
        roles.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (role, count) in roles {
            info!("  {:<18} {:>8}", role.as_str(), count);
        }
        if self.classification.preserved > 0 {
            info!("  Reviewed decisions kept: {}", self.classification.preserved);
        }

        info!("  Extracted canonical forms: {}", self.extraction.extracted);
        info!("  Reclassified to voice_transition: {}", self.extraction.reclassified);
        info!("  Skipped (no clear form): {}", self.extraction.skipped);

        info!("  Strong-scoped variantes (nested entry): {}", self.scope.strong_scoped);
        info!("  Medium-scoped variantes (usage group): {}", self.scope.medium_scoped);
        info!("  Intra-variante grouped indents: {}", self.scope.intra_grouped);
        info!("  Zero-scope transitions (annotation): {}", self.scope.zero_scope);
        if !self.scope.ambiguous.is_empty() {
            warn!("  Ambiguous scopes: {}", self.scope.ambiguous.len());
        }
    }
}

/// Result of a complete pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Statistics of the mutating phases
    pub report: EnrichmentReport,

    /// Review worklist
    pub flags: Vec<ReviewFlag>,

    /// Total duration of pipeline execution
    pub duration: Duration,
}

impl PipelineResult {
    /// Flag counts by type.
    pub fn flag_counts(&self) -> BTreeMap<FlagType, usize> {
        count_by_type(&self.flags)
    }

    /// Get a summary of the pipeline result.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        parts.push(format!("Duration: {:.2}s", self.duration.as_secs_f32()));
        parts.push(format!(
            "Classification: {} indents ({} unknown)",
            self.report.classification.total(),
            self.report.classification.unknown()
        ));
        parts.push(format!(
            "Locutions: {} extracted, {} reclassified, {} skipped",
            self.report.extraction.extracted, self.report.extraction.reclassified, self.report.extraction.skipped
        ));
        parts.push(format!(
            "Scope: {} containers, {} intra-grouped",
            self.report.scope.containers, self.report.scope.intra_grouped
        ));
        parts.push(format!("Flags: {}", self.flags.len()));

        parts.join(" | ")
    }
}

/// The main enrichment pipeline orchestrator.
pub struct EnrichmentPipeline {
    classifier: RoleClassifier,
    extractor: LocutionExtractor,
    resolver: ScopeResolver,
    collector: FlagCollector,
}

impl EnrichmentPipeline {
    /// Create a new pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            classifier: RoleClassifier,
            extractor: LocutionExtractor,
            resolver: ScopeResolver::new(config.scope),
            collector: FlagCollector::new(config.flags),
        }
    }

    /// Run the three mutating phases over a batch of entries.
    pub fn enrich(&self, entries: &mut [Entry]) -> EnrichmentReport {
        let mut report = EnrichmentReport {
            entries: entries.len(),
            ..Default::default()
        };

        debug!("Starting {} phase", PipelinePhase::Classification);
        for entry in entries.iter_mut() {
            let stats = self.classifier.classify_entry(entry);
            report.classification.merge(&stats);
        }

        debug!("Starting {} phase", PipelinePhase::LocutionExtraction);
        for entry in entries.iter_mut() {
            let stats = self.extractor.extract_entry(entry);
            report.extraction.merge(&stats);
        }

        debug!("Starting {} phase", PipelinePhase::ScopeResolution);
        for entry in entries.iter_mut() {
            let log = self.resolver.resolve_entry(entry);
            report.scope.merge(&log);
        }

        report
    }

    /// Scan enriched entries for review items.
    pub fn collect_flags(&self, entries: &[Entry]) -> Vec<ReviewFlag> {
        debug!("Starting {} phase", PipelinePhase::FlagCollection);
        self.collector.collect(entries)
    }

    /// Enrich a batch and collect its flags in one go.
    pub fn run(&self, entries: &mut [Entry]) -> PipelineResult {
        let start_time = Instant::now();

        let report = self.enrich(entries);
        let flags = self.collect_flags(entries);

        PipelineResult {
            report,
            flags,
            duration: start_time.elapsed(),
        }
    }
}

impl Default for EnrichmentPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
