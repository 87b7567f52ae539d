/*!
 * Enrichment phases over the sense tree.
 *
 * - `classifier`: tiered role classification of every Indent
 * - `locutions`: canonical forms for fixed phrases
 * - `scope`: forward scope of transition labels
 * - `flags`: read-only review worklist
 * - `orchestrator`: runs the phases in order and aggregates their statistics
 */

pub mod classifier;
pub mod flags;
pub mod locutions;
pub mod orchestrator;
pub mod scope;

pub use classifier::{ClassificationStats, RoleClassifier, RoleVerdict};
pub use flags::{FlagCollector, FlagConfig};
pub use locutions::{ExtractionStats, LocutionExtractor, LocutionOutcome};
pub use orchestrator::{EnrichmentPipeline, EnrichmentReport, PipelineConfig, PipelinePhase, PipelineResult};
pub use scope::{ScopeConfig, ScopeLog, ScopeResolver, parse_transition};
