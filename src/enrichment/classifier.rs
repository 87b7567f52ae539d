/*!
 * Indent role classification.
 *
 * Roles are decided by an ordered cascade where the first matching rule wins:
 * - Tier A (deterministic): structural markers present in the markup
 * - Tier B (heuristic): prefix and shape patterns over the stripped text
 *
 * The cascade is deliberately conservative. Several true fixed phrases end up
 * as `continuation` or `elaboration`; flag volume and calibration statistics
 * downstream are tuned against exactly this error profile, so the rules are
 * kept as they are rather than tightened here.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::markup::{char_len, strip_tags};
use crate::model::{Classification, ClassificationMethod, Entry, Indent, IndentId, IndentRole};

const FIGURATIVE_MARKER: &str = r#"<semantique type="indicateur">Fig."#;
const DOMAIN_MARKER: &str = r#"<semantique type="domaine">"#;
const NATURE_MARKER: &str = "<nature>";
const LINK_MARKER: &str = "<a ref=";
const EXEMPLE_MARKER: &str = "<exemple>";

/// Cross-references longer than this are running text that happens to link.
const MAX_CROSS_REFERENCE_CHARS: usize = 120;
const MAX_LOCUTION_SHAPE_CHARS: usize = 100;
const MIN_ELABORATION_CHARS: usize = 20;

static SEE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(voy\.|V\.|Voy\.|voyez)").expect("Invalid see-prefix regex")
});

static SEE_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",\s*voy\.\s*$").expect("Invalid see-suffix regex")
});

static PROVERB_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Prov\.|Proverbe|Proverbialement)").expect("Invalid proverb regex")
});

static REGISTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(Populaire|Familière|Familièrement|Vulgaire|Vulgairement|",
        r"Triviale|Trivialemen|Bas|Ironiquement|Plaisamment|Burlesque|",
        r"Poétiquement|Par euphémisme|Par exagération|Par ironie|",
        r"Par dérision|Par extension|Par analogie|Par métaphore|",
        r"Par plaisanterie|Par antiphrase|Néologisme|",
        r"Vieux|Vieilli|Il a vieilli|Peu usité|Inusité)",
    ))
    .expect("Invalid register regex")
});

static VOICE_TRANSITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(V\.\s*(n|a|réfl)|Se\s+conjugue|Absolument|",
        r"Substantivement|Adverbialement|Adjectivement|",
        r"Intransitivement|Neutralement|Impersonnellement|",
        r"Activement|Au\s+pluriel|Au\s+féminin|Au\s+singulier|",
        r"Au\s+masc|Au\s+fém|Avec\s+un\s+nom\s+de)",
    ))
    .expect("Invalid voice transition regex")
});

static LOCUTION_INTRO_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(<exemple>|Loc\.\s|Locution)").expect("Invalid locution intro regex")
});

static CROSS_REFERENCE_SHAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Il est|C'est|On dit|Se dit).{0,40}<a ref=").expect("Invalid cross-reference shape regex")
});

static DEFINITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(Se dit|Il se dit|On dit|On appelle|Se disait|",
        r"Qui se dit|Il s'est dit|Celui qui|Celle qui|",
        r"Ce qui|Chose qui|Action de|État de|Qualité de|",
        r"Nom (donné|que l'on donne)|Terme (de|d')|",
        r"En termes? (de|d'))",
    ))
    .expect("Invalid definition regex")
});

static FIGURATIVE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Fig\.").expect("Invalid figurative prefix regex")
});

// ASCII capitals only: accented initials ("Être ...") fall through to the
// continuation/elaboration fallbacks.
static CAPITALIZED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]").expect("Invalid capitalized regex")
});

static FUNCTION_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Il|On|Se|C'|Qui|Que|Ce|La|Le|Les|Un|Une|Des) ").expect("Invalid function word regex")
});

/// A role decision for one Indent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleVerdict {
    pub role: IndentRole,
    pub classification: Classification,
}

impl RoleVerdict {
    fn deterministic(role: IndentRole, confidence: f32) -> Self {
        Self {
            role,
            classification: Classification::deterministic(confidence),
        }
    }

    fn heuristic(role: IndentRole, confidence: f32) -> Self {
        Self {
            role,
            classification: Classification::heuristic(confidence),
        }
    }
}

/// Per-role tallies from a classification run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationStats {
    pub role_counts: BTreeMap<IndentRole, usize>,
    /// Indents that already carried an LLM or manual decision
    pub preserved: usize,
}

impl ClassificationStats {
    pub fn total(&self) -> usize {
        self.role_counts.values().sum()
    }

    pub fn unknown(&self) -> usize {
        self.role_counts.get(&IndentRole::Unknown).copied().unwrap_or(0)
    }

    pub fn count(&self, role: IndentRole) -> usize {
        self.role_counts.get(&role).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: &ClassificationStats) {
        for (role, count) in &other.role_counts {
            *self.role_counts.entry(*role).or_insert(0) += count;
        }
        self.preserved += other.preserved;
    }
}

/// Tiered role classifier
pub struct RoleClassifier;

impl RoleClassifier {
    /// Decide a role for one Indent, or `None` when no rule applies.
    pub fn classify(indent: &Indent) -> Option<RoleVerdict> {
        Self::classify_deterministic(indent).or_else(|| Self::classify_heuristic(indent))
    }

    /// Tier A: markers the source applied explicitly.
    pub fn classify_deterministic(indent: &Indent) -> Option<RoleVerdict> {
        let content = indent.content.as_str();

        if content.contains(FIGURATIVE_MARKER) {
            return Some(RoleVerdict::deterministic(IndentRole::Figurative, 1.0));
        }
        if content.contains(DOMAIN_MARKER) {
            return Some(RoleVerdict::deterministic(IndentRole::Domain, 1.0));
        }
        if content.contains(NATURE_MARKER) {
            return Some(RoleVerdict::deterministic(IndentRole::NatureLabel, 1.0));
        }

        if content.contains(LINK_MARKER) {
            let plain = strip_tags(content);
            if char_len(&plain) < MAX_CROSS_REFERENCE_CHARS {
                if SEE_PREFIX_REGEX.is_match(&plain) {
                    return Some(RoleVerdict::deterministic(IndentRole::CrossReference, 1.0));
                }
                if SEE_SUFFIX_REGEX.is_match(&plain) {
                    return Some(RoleVerdict::deterministic(IndentRole::CrossReference, 0.95));
                }
            }
        }

        None
    }

    /// Tier B: text patterns, evaluated in a fixed order.
    pub fn classify_heuristic(indent: &Indent) -> Option<RoleVerdict> {
        let content = indent.content.as_str();
        let plain = strip_tags(content);
        let has_citations = !indent.citations.is_empty();

        if PROVERB_REGEX.is_match(&plain) {
            return Some(RoleVerdict::heuristic(IndentRole::Proverb, 0.9));
        }
        if REGISTER_REGEX.is_match(&plain) {
            return Some(RoleVerdict::heuristic(IndentRole::RegisterLabel, 0.85));
        }
        if VOICE_TRANSITION_REGEX.is_match(&plain) {
            return Some(RoleVerdict::heuristic(IndentRole::VoiceTransition, 0.85));
        }
        if content.contains(EXEMPLE_MARKER) || LOCUTION_INTRO_REGEX.is_match(content) {
            return Some(RoleVerdict::heuristic(IndentRole::Locution, 0.8));
        }
        if content.contains(LINK_MARKER) && CROSS_REFERENCE_SHAPE_REGEX.is_match(content) {
            return Some(RoleVerdict::heuristic(IndentRole::CrossReference, 0.8));
        }
        if DEFINITION_REGEX.is_match(&plain) {
            return Some(RoleVerdict::heuristic(IndentRole::Elaboration, 0.75));
        }
        if FIGURATIVE_PREFIX_REGEX.is_match(&plain) {
            return Some(RoleVerdict::heuristic(IndentRole::Figurative, 0.9));
        }

        // Last-resort phrase shape: "Form, gloss."
        if char_len(&plain) < MAX_LOCUTION_SHAPE_CHARS
            && !has_citations
            && plain.contains(',')
            && CAPITALIZED_REGEX.is_match(&plain)
            && !FUNCTION_WORD_REGEX.is_match(&plain)
        {
            return Some(RoleVerdict::heuristic(IndentRole::Locution, 0.6));
        }

        if has_citations {
            return Some(RoleVerdict::heuristic(IndentRole::Continuation, 0.5));
        }
        if char_len(&plain) > MIN_ELABORATION_CHARS {
            return Some(RoleVerdict::heuristic(IndentRole::Elaboration, 0.4));
        }
        // Short glosses ("Béquille.") are still running text
        if !plain.is_empty() {
            return Some(RoleVerdict::heuristic(IndentRole::Elaboration, 0.4));
        }

        None
    }

    /// Classify every Indent of an entry, descending into all children.
    pub fn classify_entry(&self, entry: &mut Entry) -> ClassificationStats {
        let mut stats = ClassificationStats::default();
        for id in entry.indents_preorder() {
            self.classify_node(entry, id, &mut stats);
        }
        debug!(
            "Classified {} indents of '{}' ({} unknown)",
            stats.total(),
            entry.headword,
            stats.unknown()
        );
        stats
    }

    fn classify_node(&self, entry: &mut Entry, id: IndentId, stats: &mut ClassificationStats) {
        let indent = entry.indent(id);

        let reviewed = matches!(
            indent.method(),
            Some(ClassificationMethod::Llm) | Some(ClassificationMethod::Manual)
        );
        if reviewed {
            stats.preserved += 1;
            *stats.role_counts.entry(indent.role).or_insert(0) += 1;
            return;
        }

        let role = match Self::classify(indent) {
            Some(verdict) => {
                entry.indent_mut(id).assign(verdict.role, verdict.classification);
                verdict.role
            }
            None => indent.role,
        };
        *stats.role_counts.entry(role).or_insert(0) += 1;
    }
}
