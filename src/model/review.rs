/*!
 * Review flags: audit records produced after enrichment.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Structured, JSON-friendly context attached to a flag.
pub type FlagContext = BTreeMap<String, serde_json::Value>;

/// Enrichment phase a flag is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagPhase {
    Classification,
    LocutionExtraction,
    ScopeResolution,
    Calibration,
}

/// Kind of review item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    LowConfidence,
    SkippedLocution,
    ScopeDecision,
    LargeScope,
    LargeIntraScope,
    CalibrationSample,
}

impl FlagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowConfidence => "low_confidence",
            Self::SkippedLocution => "skipped_locution",
            Self::ScopeDecision => "scope_decision",
            Self::LargeScope => "large_scope",
            Self::LargeIntraScope => "large_intra_scope",
            Self::CalibrationSample => "calibration_sample",
        }
    }
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit record.
///
/// `resolution` and `resolved_by` belong to the external review tooling;
/// the collector always leaves them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewFlag {
    pub entry_id: String,
    pub headword: String,
    pub phase: FlagPhase,
    pub flag_type: FlagType,
    pub reason: String,
    #[serde(default)]
    pub context: FlagContext,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub resolved_by: Option<String>,
}

impl ReviewFlag {
    pub fn new(
        entry_id: &str,
        headword: &str,
        phase: FlagPhase,
        flag_type: FlagType,
        reason: String,
        context: FlagContext,
    ) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            headword: headword.to_string(),
            phase,
            flag_type,
            reason,
            context,
            resolution: None,
            resolved_by: None,
        }
    }
}

/// Count flags per type.
pub fn count_by_type(flags: &[ReviewFlag]) -> BTreeMap<FlagType, usize> {
    let mut counts = BTreeMap::new();
    for flag in flags {
        *counts.entry(flag.flag_type).or_insert(0) += 1;
    }
    counts
}
