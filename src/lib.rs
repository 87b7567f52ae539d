/*!
 * # littre-enrich - Semantic enrichment of the Littré sense trees
 *
 * A Rust library that turns the loosely structured sense markup of the
 * Littré dictionary into explicit structure.
 *
 * ## Features
 *
 * - Tiered role classification of every sense fragment (Indent):
 *   figurative, domain, register, cross-reference, fixed phrase, ...
 * - Canonical forms for fixed phrases (locutions)
 * - Forward scope of grammatical transition labels:
 *   - container Variantes for labels governing following senses
 *   - label children for fragments governed inside one sense
 * - A review worklist with a seeded, stratified calibration sample
 * - A sharded corpus runner over the JSON interchange form
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `model`: the per-entry arena, closed vocabularies, interchange form and review flags
 * - `markup`: helpers over the lightly normalized source markup
 * - `enrichment`: the enrichment phases:
 *   - `enrichment::classifier`: role classification
 *   - `enrichment::locutions`: canonical-form extraction
 *   - `enrichment::scope`: scope resolution
 *   - `enrichment::flags`: review flag collection
 *   - `enrichment::orchestrator`: phase ordering and statistics
 * - `app_config`: Configuration management
 * - `file_utils`: Corpus file operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod enrichment;
pub mod errors;
pub mod file_utils;
pub mod markup;
pub mod model;

// Re-export main types for easier usage
pub use app_config::Config;
pub use enrichment::{EnrichmentPipeline, PipelineConfig, PipelineResult};
pub use errors::{AppError, CorpusError, TreeError};
pub use model::{Entry, EntryDoc, IndentRole, ReviewFlag};
