/*!
 * Sense tree model shared by every enrichment phase.
 *
 * - `types`: closed vocabularies (roles, methods, transition kinds) and citations
 * - `tree`: the per-entry arena of Variantes and Indents
 * - `document`: nested JSON interchange form used at the crate boundary
 * - `review`: review flag records
 */

pub mod document;
pub mod review;
pub mod tree;
pub mod types;

pub use document::{EntryDoc, IndentDoc, RubriqueDoc, TransitionType, VarianteDoc};
pub use review::{FlagContext, FlagPhase, FlagType, ReviewFlag};
pub use tree::{Entry, Indent, IndentId, IndentList, Rubrique, Transition, Variante, VarianteId};
pub use types::{Citation, Classification, ClassificationMethod, IndentRole, RubriqueType, TransitionKind};
