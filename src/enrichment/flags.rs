/*!
 * Review flag collection.
 *
 * Flags are produced by a read-only scan after enrichment instead of inline
 * in each phase, which keeps the phases free of audit concerns. The scan
 * emits, in this order: low-confidence decisions, locutions without a
 * canonical form, scope decisions (with oversized intra groupings), and a
 * seeded stratified calibration sample.
 */

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::markup::{strip_tags, truncate_chars};
use crate::model::{Entry, FlagContext, FlagPhase, FlagType, IndentId, IndentRole, ReviewFlag, TransitionKind, VarianteId};

pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_LARGE_INTRA_SCOPE_THRESHOLD: usize = 5;
pub const DEFAULT_CALIBRATION_PER_BUCKET: usize = 5;
pub const DEFAULT_CALIBRATION_SEED: u64 = 42;

const CONTENT_PREVIEW_CHARS: usize = 200;
const NEIGHBOR_PREVIEW_CHARS: usize = 100;
const SCOPED_PREVIEW_CHARS: usize = 80;

/// Roles whose low-confidence decisions are worth a human look.
const RISKY_ROLES: [IndentRole; 8] = [
    IndentRole::Locution,
    IndentRole::Figurative,
    IndentRole::Domain,
    IndentRole::Proverb,
    IndentRole::CrossReference,
    IndentRole::RegisterLabel,
    IndentRole::VoiceTransition,
    IndentRole::NatureLabel,
];

/// Flag collector settings
#[derive(Debug, Clone, Copy)]
pub struct FlagConfig {
    pub low_confidence_threshold: f32,
    pub large_scope_threshold: usize,
    pub large_intra_scope_threshold: usize,
    pub calibration_per_bucket: usize,
    pub calibration_seed: u64,
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            large_scope_threshold: super::scope::DEFAULT_LARGE_SCOPE_THRESHOLD,
            large_intra_scope_threshold: DEFAULT_LARGE_INTRA_SCOPE_THRESHOLD,
            calibration_per_bucket: DEFAULT_CALIBRATION_PER_BUCKET,
            calibration_seed: DEFAULT_CALIBRATION_SEED,
        }
    }
}

/// An Indent together with its position among its siblings.
#[derive(Debug, Clone, Copy)]
struct Site {
    id: IndentId,
    variante_num: Option<u32>,
    prev: Option<IndentId>,
    next: Option<IndentId>,
}

fn indent_sites(entry: &Entry) -> Vec<Site> {
    let mut out = Vec::new();
    for list in entry.indent_lists() {
        let variante_num = list.variante.and_then(|vid| entry.variante(vid).num);
        for (i, &id) in list.ids.iter().enumerate() {
            out.push(Site {
                id,
                variante_num,
                prev: i.checked_sub(1).map(|p| list.ids[p]),
                next: list.ids.get(i + 1).copied(),
            });
        }
    }
    out
}

/// Read-only review flag scanner
pub struct FlagCollector {
    config: FlagConfig,
}

impl FlagCollector {
    pub fn new(config: FlagConfig) -> Self {
        Self { config }
    }

    /// Scan the entries and return every flag, in a deterministic order.
    pub fn collect(&self, entries: &[Entry]) -> Vec<ReviewFlag> {
        let sites: Vec<Vec<Site>> = entries.iter().map(indent_sites).collect();

        let mut flags = Vec::new();
        flags.extend(self.low_confidence(entries, &sites));
        flags.extend(self.skipped_locutions(entries, &sites));
        flags.extend(self.scope_decisions(entries));
        flags.extend(self.calibration_sample(entries, &sites));

        debug!("Collected {} review flags over {} entries", flags.len(), entries.len());
        flags
    }

    fn low_confidence(&self, entries: &[Entry], sites: &[Vec<Site>]) -> Vec<ReviewFlag> {
        let mut flags = Vec::new();
        for (entry, entry_sites) in entries.iter().zip(sites) {
            for site in entry_sites {
                let indent = entry.indent(site.id);
                let Some(classification) = indent.classification else {
                    continue;
                };
                let confidence = classification.confidence();
                if confidence > self.config.low_confidence_threshold || !RISKY_ROLES.contains(&indent.role) {
                    continue;
                }

                let mut context = indent_context(entry, site);
                context.insert("role".into(), json!(indent.role.as_str()));
                context.insert("confidence".into(), json!(confidence));
                context.insert("method".into(), json!(classification.method().as_str()));
                insert_neighbors(&mut context, entry, site);

                flags.push(ReviewFlag::new(
                    &entry.xml_id,
                    &entry.headword,
                    FlagPhase::Classification,
                    FlagType::LowConfidence,
                    format!("confidence={:.2}, role={}", confidence, indent.role),
                    context,
                ));
            }
        }
        flags
    }

    fn skipped_locutions(&self, entries: &[Entry], sites: &[Vec<Site>]) -> Vec<ReviewFlag> {
        let mut flags = Vec::new();
        for (entry, entry_sites) in entries.iter().zip(sites) {
            for site in entry_sites {
                let indent = entry.indent(site.id);
                let has_form = indent.canonical_form.as_deref().is_some_and(|form| !form.is_empty());
                if indent.role != IndentRole::Locution || has_form {
                    continue;
                }
                flags.push(ReviewFlag::new(
                    &entry.xml_id,
                    &entry.headword,
                    FlagPhase::LocutionExtraction,
                    FlagType::SkippedLocution,
                    "no canonical form extracted".to_string(),
                    indent_context(entry, site),
                ));
            }
        }
        flags
    }

    fn scope_decisions(&self, entries: &[Entry]) -> Vec<ReviewFlag> {
        let mut flags = Vec::new();
        for entry in entries {
            let variantes = entry.variantes_preorder();

            for &vid in &variantes {
                let variante = entry.variante(vid);
                let Some(transition) = &variante.transition else {
                    continue;
                };
                let governed = &variante.sub_variantes;
                let flag_type = if governed.len() > self.config.large_scope_threshold {
                    FlagType::LargeScope
                } else {
                    FlagType::ScopeDecision
                };
                let (form, pos) = match &transition.kind {
                    TransitionKind::Strong { form, pos } => (json!(form), json!(pos)),
                    TransitionKind::Medium => (Value::Null, Value::Null),
                };
                let scoped_preview = |id: Option<&VarianteId>| {
                    id.map(|&sub| truncate_chars(&strip_tags(&entry.variante(sub).content), SCOPED_PREVIEW_CHARS))
                        .unwrap_or_default()
                };

                let mut context = FlagContext::new();
                context.insert(
                    "transition_content".into(),
                    json!(truncate_chars(&strip_tags(&transition.content), NEIGHBOR_PREVIEW_CHARS)),
                );
                context.insert("scope_type".into(), json!(transition.kind.as_str()));
                context.insert("transition_form".into(), form);
                context.insert("transition_pos".into(), pos);
                context.insert("num_scoped".into(), json!(governed.len()));
                context.insert("first_scoped".into(), json!(scoped_preview(governed.first())));
                context.insert("last_scoped".into(), json!(scoped_preview(governed.last())));

                flags.push(ReviewFlag::new(
                    &entry.xml_id,
                    &entry.headword,
                    FlagPhase::ScopeResolution,
                    flag_type,
                    format!("{} scope, {} variantes", transition.kind.as_str(), governed.len()),
                    context,
                ));
            }

            for &vid in &variantes {
                let variante = entry.variante(vid);
                for &id in &variante.indents {
                    let indent = entry.indent(id);
                    let children = indent.children.len();
                    if !indent.role.is_scope_label() || children <= self.config.large_intra_scope_threshold {
                        continue;
                    }

                    let mut context = FlagContext::new();
                    context.insert("variante_num".into(), json!(variante.num));
                    context.insert(
                        "indent_content".into(),
                        json!(truncate_chars(&indent.plain_text(), NEIGHBOR_PREVIEW_CHARS)),
                    );
                    context.insert("num_children".into(), json!(children));

                    flags.push(ReviewFlag::new(
                        &entry.xml_id,
                        &entry.headword,
                        FlagPhase::ScopeResolution,
                        FlagType::LargeIntraScope,
                        format!("{} scoped {} children", indent.role, children),
                        context,
                    ));
                }
            }
        }
        flags
    }

    fn calibration_sample(&self, entries: &[Entry], sites: &[Vec<Site>]) -> Vec<ReviewFlag> {
        let mut buckets: BTreeMap<(&'static str, &'static str), Vec<(usize, Site)>> = BTreeMap::new();
        for (index, (entry, entry_sites)) in entries.iter().zip(sites).enumerate() {
            for site in entry_sites {
                let indent = entry.indent(site.id);
                if let Some(method) = indent.method() {
                    buckets
                        .entry((indent.role.as_str(), method.as_str()))
                        .or_default()
                        .push((index, *site));
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(self.config.calibration_seed);
        let mut flags = Vec::new();

        for ((role, method), items) in &buckets {
            let amount = self.config.calibration_per_bucket.min(items.len());
            let mut picked = rand::seq::index::sample(&mut rng, items.len(), amount).into_vec();
            picked.sort_unstable();

            for pick in picked {
                let (index, site) = items[pick];
                let entry = &entries[index];
                let indent = entry.indent(site.id);

                let mut context = indent_context(entry, &site);
                context.insert("role".into(), json!(role));
                context.insert("confidence".into(), json!(indent.confidence()));
                context.insert("method".into(), json!(method));
                context.insert("bucket_size".into(), json!(items.len()));
                insert_neighbors(&mut context, entry, &site);

                flags.push(ReviewFlag::new(
                    &entry.xml_id,
                    &entry.headword,
                    FlagPhase::Calibration,
                    FlagType::CalibrationSample,
                    format!("sample from {}/{} (n={})", role, method, items.len()),
                    context,
                ));
            }
        }
        flags
    }
}

impl Default for FlagCollector {
    fn default() -> Self {
        Self::new(FlagConfig::default())
    }
}

fn indent_context(entry: &Entry, site: &Site) -> FlagContext {
    let mut context = FlagContext::new();
    context.insert("variante_num".into(), json!(site.variante_num));
    context.insert(
        "indent_content".into(),
        json!(truncate_chars(&entry.indent(site.id).content, CONTENT_PREVIEW_CHARS)),
    );
    context
}

fn insert_neighbors(context: &mut FlagContext, entry: &Entry, site: &Site) {
    let preview = |id: IndentId| truncate_chars(&entry.indent(id).plain_text(), NEIGHBOR_PREVIEW_CHARS);
    if let Some(prev) = site.prev {
        context.insert("prev_indent".into(), json!(preview(prev)));
    }
    if let Some(next) = site.next {
        context.insert("next_indent".into(), json!(preview(next)));
    }
}
