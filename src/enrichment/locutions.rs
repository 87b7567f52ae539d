/*!
 * Canonical forms for fixed phrases.
 *
 * A locution Indent usually reads "Form, gloss." or wraps the phrase in an
 * `<exemple>` span. The extractor pulls the phrase out so downstream emitters
 * can index it, and demotes reflexive-verb headers that the classifier took
 * for phrases.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::{char_len, first_exemple, strip_tags};
use crate::model::{Classification, Entry, Indent, IndentRole};

/// Longest pre-comma head accepted as a phrase.
const MAX_FORM_CHARS: usize = 60;

static REFLEXIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^S'[A-ZÉÈÊÀÂÎÏÔÙÛÜÇ].*,\s*v\.\s*réfl").expect("Invalid reflexive regex")
});

/// What happened to one Indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocutionOutcome {
    /// Role was not `locution`; nothing done
    NotLocution,
    /// Demoted to `voice_transition`
    Reclassified,
    /// Canonical form set
    Extracted,
    /// Left without a canonical form
    Skipped,
}

/// Counts for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub extracted: usize,
    pub reclassified: usize,
    pub skipped: usize,
}

impl ExtractionStats {
    pub fn visited(&self) -> usize {
        self.extracted + self.reclassified + self.skipped
    }

    pub fn record(&mut self, outcome: LocutionOutcome) {
        match outcome {
            LocutionOutcome::Extracted => self.extracted += 1,
            LocutionOutcome::Reclassified => self.reclassified += 1,
            LocutionOutcome::Skipped => self.skipped += 1,
            LocutionOutcome::NotLocution => {}
        }
    }

    pub fn merge(&mut self, other: &ExtractionStats) {
        self.extracted += other.extracted;
        self.reclassified += other.reclassified;
        self.skipped += other.skipped;
    }
}

/// Locution canonical-form extractor
pub struct LocutionExtractor;

impl LocutionExtractor {
    /// Process one Indent in place.
    pub fn extract(indent: &mut Indent) -> LocutionOutcome {
        if indent.role != IndentRole::Locution {
            return LocutionOutcome::NotLocution;
        }

        let plain = strip_tags(&indent.content);

        if REFLEXIVE_REGEX.is_match(&plain) {
            indent.assign(IndentRole::VoiceTransition, Classification::heuristic(0.9));
            return LocutionOutcome::Reclassified;
        }

        let form = match first_exemple(&indent.content) {
            Some(inner) => Some(inner.trim().to_string()),
            None => plain
                .split_once(',')
                .map(|(head, _)| head.trim().to_string())
                .filter(|head| char_len(head) <= MAX_FORM_CHARS),
        };

        // An empty span or head is no form at all
        match form.filter(|form| !form.is_empty()) {
            Some(form) => {
                indent.canonical_form = Some(form);
                LocutionOutcome::Extracted
            }
            None => {
                indent.canonical_form = None;
                LocutionOutcome::Skipped
            }
        }
    }

    /// Process every locution Indent of an entry.
    pub fn extract_entry(&self, entry: &mut Entry) -> ExtractionStats {
        let mut stats = ExtractionStats::default();
        for id in entry.indents_preorder() {
            stats.record(Self::extract(entry.indent_mut(id)));
        }
        if stats.visited() > 0 {
            debug!(
                "Locutions of '{}': {} extracted, {} reclassified, {} skipped",
                entry.headword, stats.extracted, stats.reclassified, stats.skipped
            );
        }
        stats
    }
}
