/*!
 * Closed vocabularies and leaf value types of the sense tree.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic role of an Indent, assigned during enrichment.
///
/// Every Indent starts as `Unknown`; the classifier and the locution
/// extractor are the only writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndentRole {
    #[default]
    Unknown,
    Figurative,
    Domain,
    NatureLabel,
    CrossReference,
    RegisterLabel,
    Proverb,
    VoiceTransition,
    Locution,
    Constructional,
    Elaboration,
    Continuation,
}

impl IndentRole {
    /// Lowercase identifier used in flags and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Figurative => "figurative",
            Self::Domain => "domain",
            Self::NatureLabel => "nature_label",
            Self::CrossReference => "cross_reference",
            Self::RegisterLabel => "register_label",
            Self::Proverb => "proverb",
            Self::VoiceTransition => "voice_transition",
            Self::Locution => "locution",
            Self::Constructional => "constructional",
            Self::Elaboration => "elaboration",
            Self::Continuation => "continuation",
        }
    }

    /// Labels that open an implicit scope over following material.
    pub fn is_scope_label(&self) -> bool {
        matches!(self, Self::NatureLabel | Self::VoiceTransition)
    }
}

impl fmt::Display for IndentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a role was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Deterministic,
    Heuristic,
    Llm,
    Manual,
}

impl ClassificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::Heuristic => "heuristic",
            Self::Llm => "llm",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A method together with its confidence.
///
/// The two are only ever set as a pair, and the confidence is clamped
/// to `[0, 1]` on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    method: ClassificationMethod,
    confidence: f32,
}

impl Classification {
    pub fn new(method: ClassificationMethod, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        Self { method, confidence }
    }

    pub fn deterministic(confidence: f32) -> Self {
        Self::new(ClassificationMethod::Deterministic, confidence)
    }

    pub fn heuristic(confidence: f32) -> Self {
        Self::new(ClassificationMethod::Heuristic, confidence)
    }

    pub fn method(&self) -> ClassificationMethod {
        self.method
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

/// Back-matter section kinds, keyed by the source section name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RubriqueType {
    #[serde(rename = "HISTORIQUE")]
    Historique,
    #[serde(rename = "ÉTYMOLOGIE")]
    Etymologie,
    #[serde(rename = "REMARQUE")]
    Remarque,
    #[serde(rename = "SYNONYME")]
    Synonyme,
    #[serde(rename = "PROVERBES")]
    Proverbes,
    #[serde(rename = "SUPPLÉMENT AU DICTIONNAIRE")]
    Supplement,
}

/// Outcome of an inter-variante scope decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    /// The label introduces a new headword form with its own part-of-speech.
    Strong { form: String, pos: String },
    /// The label partitions usage without a new form.
    Medium,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong { .. } => "strong",
            Self::Medium => "medium",
        }
    }

    pub fn is_strong(&self) -> bool {
        matches!(self, Self::Strong { .. })
    }
}

/// A quotation attached to a Variante, Indent or Rubrique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub hide: String,
    /// Filled in by the external author forward-fill
    #[serde(default)]
    pub resolved_author: String,
}

impl Citation {
    pub fn new(text: &str, author: &str) -> Self {
        Self {
            text: text.to_string(),
            author: author.to_string(),
            ..Default::default()
        }
    }
}
