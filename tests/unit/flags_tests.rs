/*!
 * Tests for review flag collection
 */

use anyhow::Result;
use serde_json::json;

use littre_enrich::enrichment::{EnrichmentPipeline, FlagCollector, FlagConfig};
use littre_enrich::model::{Entry, EntryDoc, FlagPhase, FlagType, IndentRole, ReviewFlag};

use crate::common;

fn enriched(mut entries: Vec<Entry>) -> Vec<Entry> {
    EnrichmentPipeline::default().enrich(&mut entries);
    entries
}

fn phase_rank(flag: &ReviewFlag) -> usize {
    match flag.flag_type {
        FlagType::LowConfidence => 0,
        FlagType::SkippedLocution => 1,
        FlagType::ScopeDecision | FlagType::LargeScope | FlagType::LargeIntraScope => 2,
        FlagType::CalibrationSample => 3,
    }
}

/// Test the scope decision record of a reflexive container
#[test]
fn test_collect_withReflexiveContainer_shouldDescribeScope() {
    let entries = enriched(vec![common::abaisser_entry()]);

    let flags = FlagCollector::default().collect(&entries);
    let scope: Vec<&ReviewFlag> = flags
        .iter()
        .filter(|f| f.flag_type == FlagType::ScopeDecision)
        .collect();

    assert_eq!(scope.len(), 1);
    let flag = scope[0];
    assert_eq!(flag.entry_id, "abaisser");
    assert_eq!(flag.phase, FlagPhase::ScopeResolution);
    assert_eq!(flag.reason, "strong scope, 2 variantes");
    assert_eq!(flag.context["transition_form"], json!("S'ABAISSER"));
    assert_eq!(flag.context["transition_pos"], json!("v. réfl."));
    assert_eq!(flag.context["first_scoped"], json!("Devenir plus bas."));
    assert_eq!(flag.context["last_scoped"], json!("Fig. S'humilier."));
}

/// Test that flags come grouped by phase
#[test]
fn test_collect_shouldOrderFlagsByPhase() {
    let entries = enriched(common::sample_corpus(6));

    let flags = FlagCollector::default().collect(&entries);
    let ranks: Vec<usize> = flags.iter().map(phase_rank).collect();

    assert!(!flags.is_empty());
    assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", ranks);
}

/// Test that a zero sample size disables calibration only
#[test]
fn test_collect_withZeroSampleSize_shouldSkipCalibration() {
    let entries = enriched(common::sample_corpus(4));
    let collector = FlagCollector::new(FlagConfig {
        calibration_per_bucket: 0,
        ..Default::default()
    });

    let flags = collector.collect(&entries);

    assert!(flags.iter().all(|f| f.flag_type != FlagType::CalibrationSample));
    assert_eq!(flags.len(), 2);
}

/// Test that an oversized sample covers every classified Indent once
#[test]
fn test_collect_withLargeSampleSize_shouldSampleEveryClassifiedIndent() {
    let entries = enriched(common::sample_corpus(4));
    let classified: usize = entries
        .iter()
        .map(|entry| entry.indents().filter(|(_, indent)| indent.classification.is_some()).count())
        .sum();
    let collector = FlagCollector::new(FlagConfig {
        calibration_per_bucket: 1000,
        ..Default::default()
    });

    let flags = collector.collect(&entries);
    let samples = flags
        .iter()
        .filter(|f| f.flag_type == FlagType::CalibrationSample)
        .count();

    assert_eq!(samples, classified);
}

/// Test that an imported low-confidence decision is flagged and kept
#[test]
fn test_collect_withImportedLowConfidence_shouldFlagIt() -> Result<()> {
    let doc: EntryDoc = serde_json::from_value(json!({
        "headword": "MAISON",
        "xml_id": "maison",
        "body_variantes": [{
            "num": 1,
            "content": "Bâtiment d'habitation.",
            "indents": [{
                "content": "Être de la maison, être de la famille.",
                "role": "locution",
                "classification_method": "llm",
                "classification_confidence": 0.3
            }]
        }]
    }))?;
    let entries = enriched(vec![Entry::from_doc(doc)]);

    let flags = FlagCollector::default().collect(&entries);
    let low: Vec<&ReviewFlag> = flags
        .iter()
        .filter(|f| f.flag_type == FlagType::LowConfidence)
        .collect();

    assert_eq!(low.len(), 1);
    assert_eq!(low[0].reason, "confidence=0.30, role=locution");
    assert_eq!(low[0].context["method"], json!("llm"));
    assert_eq!(low[0].context["variante_num"], json!(1));
    Ok(())
}

/// Test that the collector never fills in review outcomes
#[test]
fn test_collect_shouldLeaveResolutionEmpty() -> Result<()> {
    let entries = enriched(common::sample_corpus(2));

    let flags = FlagCollector::default().collect(&entries);
    let exported = serde_json::to_value(&flags)?;

    assert!(flags.iter().all(|f| f.resolution.is_none() && f.resolved_by.is_none()));
    assert_eq!(exported[0]["phase"], json!("scope_resolution"));
    assert_eq!(exported[0]["resolution"], json!(null));
    Ok(())
}

/// Test that different seeds still honor the per-bucket cap
#[test]
fn test_collect_withOtherSeed_shouldKeepBucketSizes() {
    let entries = enriched(common::sample_corpus(8));
    let count = |seed: u64| {
        FlagCollector::new(FlagConfig {
            calibration_seed: seed,
            ..Default::default()
        })
        .collect(&entries)
        .iter()
        .filter(|f| f.flag_type == FlagType::CalibrationSample)
        .count()
    };

    assert_eq!(count(42), count(7));
}

/// Test that a locution reclassified by extraction is not reported as skipped
#[test]
fn test_collect_withReclassifiedLocution_shouldNotFlagSkipped() {
    let entries = enriched(vec![common::abaisser_entry()]);

    let flags = FlagCollector::default().collect(&entries);
    let label = entries[0]
        .indents()
        .find(|(_, indent)| indent.content.starts_with("S'ABAISSER"))
        .map(|(_, indent)| indent.role);

    assert_eq!(label, Some(IndentRole::VoiceTransition));
    assert!(flags.iter().all(|f| f.flag_type != FlagType::SkippedLocution));
}
