/*!
 * Forward scope of transition labels.
 *
 * A grammatical label such as "S'ABAISSER, v. réfl." is written once at the
 * end of a sense but governs the senses that follow it. Two passes make that
 * governance explicit:
 *
 * - inter-variante: a Variante ending in a bare `voice_transition` label
 *   hands the label to a new container Variante, which takes over the run of
 *   following siblings up to the next such Variante
 * - intra-variante: Indents following a `nature_label` or `voice_transition`
 *   Indent become that label's children, up to the next label
 *
 * Both passes only move ids between lists, so no node is ever lost.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::{strip_tags, truncate_chars};
use crate::model::{Entry, IndentId, IndentRole, Transition, TransitionKind, Variante, VarianteId};

pub const DEFAULT_LARGE_SCOPE_THRESHOLD: usize = 15;

static REFLEXIVE_FORM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(S'[A-ZÉÈÊÀÂÎÏÔÙÛÜÇ].+),\s+(v\.\s*.+)").expect("Invalid reflexive form regex")
});

static FORM_POS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([A-ZÉÈÊÀÂÎÏÔÙÛÜÇ][A-ZÉÈÊÀÂÎÏÔÙÛÜÇ '-]+),\s+",
        r"(v\.\s*(?:n|a|réfl)|s\.\s*[mf]|adj)\b",
    ))
    .expect("Invalid form/pos regex")
});

/// Scope resolver settings
#[derive(Debug, Clone, Copy)]
pub struct ScopeConfig {
    /// Scopes governing more Variantes than this are reported as ambiguous
    pub large_scope_threshold: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            large_scope_threshold: DEFAULT_LARGE_SCOPE_THRESHOLD,
        }
    }
}

/// Outcome counters of scope resolution.
///
/// `strong_scoped` and `medium_scoped` count governed Variantes, not
/// containers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeLog {
    pub strong_scoped: usize,
    pub medium_scoped: usize,
    pub intra_grouped: usize,
    pub zero_scope: usize,
    pub containers: usize,
    pub ambiguous: Vec<String>,
}

impl ScopeLog {
    pub fn merge(&mut self, other: &ScopeLog) {
        self.strong_scoped += other.strong_scoped;
        self.medium_scoped += other.medium_scoped;
        self.intra_grouped += other.intra_grouped;
        self.zero_scope += other.zero_scope;
        self.containers += other.containers;
        self.ambiguous.extend(other.ambiguous.iter().cloned());
    }
}

/// Decide strong or medium from a label's stripped text.
pub fn parse_transition(plain: &str) -> TransitionKind {
    let captures = REFLEXIVE_FORM_REGEX
        .captures(plain)
        .or_else(|| FORM_POS_REGEX.captures(plain));

    match captures {
        Some(caps) => TransitionKind::Strong {
            form: caps[1].trim().to_string(),
            pos: caps[2].trim().to_string(),
        },
        None => TransitionKind::Medium,
    }
}

/// Two-pass scope resolver
pub struct ScopeResolver {
    config: ScopeConfig,
}

impl ScopeResolver {
    pub fn new(config: ScopeConfig) -> Self {
        Self { config }
    }

    /// Run both passes over one entry.
    pub fn resolve_entry(&self, entry: &mut Entry) -> ScopeLog {
        let mut log = ScopeLog::default();

        let body = std::mem::take(&mut entry.body);
        entry.body = self.scope_siblings(entry, body, &mut log);
        for vid in entry.body.clone() {
            self.scope_nested(entry, vid, &mut log);
        }

        for vid in entry.variantes_preorder() {
            log.intra_grouped += group_under_labels(entry, vid);
        }

        log
    }

    fn scope_nested(&self, entry: &mut Entry, vid: VarianteId, log: &mut ScopeLog) {
        let subs = std::mem::take(&mut entry.variante_mut(vid).sub_variantes);
        if subs.is_empty() {
            return;
        }
        let scoped = self.scope_siblings(entry, subs, log);
        entry.variante_mut(vid).sub_variantes = scoped.clone();
        for sub in scoped {
            self.scope_nested(entry, sub, log);
        }
    }

    /// Inter-variante pass over one sibling list; returns the new list.
    fn scope_siblings(&self, entry: &mut Entry, siblings: Vec<VarianteId>, log: &mut ScopeLog) -> Vec<VarianteId> {
        let mut out = Vec::with_capacity(siblings.len());
        let mut i = 0;

        while i < siblings.len() {
            let vid = siblings[i];
            let Some(label) = boundary_label(entry, vid) else {
                out.push(vid);
                i += 1;
                continue;
            };

            let remaining = &siblings[i + 1..];
            let scope_end = remaining
                .iter()
                .position(|&next| boundary_label(entry, next).is_some())
                .unwrap_or(remaining.len());

            let content = entry.indent(label).content.clone();
            let plain = strip_tags(&content);

            if scope_end == 0 {
                debug!("{}: '{}' has no following sense, kept as annotation", entry.headword, plain);
                log.zero_scope += 1;
                out.push(vid);
                i += 1;
                continue;
            }

            let governed = remaining[..scope_end].to_vec();
            let kind = parse_transition(&plain);
            if kind.is_strong() {
                log.strong_scoped += governed.len();
            } else {
                log.medium_scoped += governed.len();
            }

            if governed.len() > self.config.large_scope_threshold {
                let message = format!(
                    "{}: {} scopes {} variantes",
                    entry.headword,
                    truncate_chars(&plain, 50),
                    governed.len()
                );
                warn!("Ambiguous scope {}", message);
                log.ambiguous.push(message);
            }

            let origin = entry.variante_mut(vid);
            origin.indents.pop();
            origin.label_lifted = true;

            let container = entry.add_variante(Variante {
                transition: Some(Transition { kind, label, content }),
                sub_variantes: governed,
                ..Default::default()
            });
            log.containers += 1;

            out.push(vid);
            out.push(container);
            i += 1 + scope_end;
        }

        out
    }
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::new(ScopeConfig::default())
    }
}

/// The label Indent that makes a Variante a scope boundary, if any.
fn boundary_label(entry: &Entry, vid: VarianteId) -> Option<IndentId> {
    let variante = entry.variante(vid);
    if variante.label_lifted {
        return None;
    }
    let &last = variante.indents.last()?;
    let indent = entry.indent(last);
    (indent.role == IndentRole::VoiceTransition && indent.citations.is_empty()).then_some(last)
}

/// Intra-variante pass over one Variante; returns the number of moved Indents.
fn group_under_labels(entry: &mut Entry, vid: VarianteId) -> usize {
    let ids = entry.variante(vid).indents.clone();
    if ids.len() < 2 {
        return 0;
    }

    let is_label = |entry: &Entry, id: IndentId| entry.indent(id).role.is_scope_label();
    let mut kept = Vec::with_capacity(ids.len());
    let mut grouped = 0;
    let mut i = 0;

    while i < ids.len() {
        let id = ids[i];
        kept.push(id);
        i += 1;
        if !is_label(entry, id) {
            continue;
        }
        let start = i;
        while i < ids.len() && !is_label(entry, ids[i]) {
            i += 1;
        }
        if i > start {
            entry.indent_mut(id).children.extend_from_slice(&ids[start..i]);
            grouped += i - start;
        }
    }

    entry.variante_mut(vid).indents = kept;
    grouped
}
