/*!
 * Tests for the nested JSON interchange form
 */

use anyhow::Result;
use serde_json::json;

use littre_enrich::enrichment::EnrichmentPipeline;
use littre_enrich::model::{ClassificationMethod, Entry, EntryDoc, IndentRole, TransitionKind, TransitionType};

use crate::common;

/// Test that an enriched tree survives export and re-import unchanged
#[test]
fn test_toDoc_afterEnrichment_shouldReimportIdentically() -> Result<()> {
    let mut entries = vec![common::abaisser_entry(), common::chat_entry()];
    EnrichmentPipeline::default().enrich(&mut entries);

    for entry in &entries {
        let exported = serde_json::to_value(entry.to_doc())?;
        let doc: EntryDoc = serde_json::from_value(exported.clone())?;
        let reimported = Entry::from_doc(doc);

        assert!(reimported.check_integrity().is_ok());
        assert_eq!(reimported.indent_count(), entry.indent_count());
        assert_eq!(reimported.variante_count(), entry.variante_count());
        assert_eq!(serde_json::to_value(reimported.to_doc())?, exported);
    }
    Ok(())
}

/// Test the exported shape of a strong container
#[test]
fn test_toDoc_withStrongContainer_shouldCarryTransitionFields() {
    let mut entries = vec![common::abaisser_entry()];
    EnrichmentPipeline::default().enrich(&mut entries);

    let doc = entries[0].to_doc();
    let container = &doc.body_variantes[1];

    assert_eq!(doc.body_variantes.len(), 2);
    assert!(doc.body_variantes[0].label_lifted);
    assert_eq!(container.num, None);
    assert_eq!(container.transition_type, Some(TransitionType::Strong));
    assert_eq!(container.transition_form, "S'ABAISSER");
    assert_eq!(container.sub_variantes.len(), 2);
    let label = container.transition_label.as_ref().map(|label| label.role);
    assert_eq!(label, Some(IndentRole::VoiceTransition));
}

/// Test that a container without its label Indent gets one from the content
#[test]
fn test_fromDoc_withoutTransitionLabel_shouldSynthesizeIt() -> Result<()> {
    let doc: EntryDoc = serde_json::from_value(json!({
        "headword": "ABATTRE",
        "body_variantes": [
            {"num": 1, "content": "Jeter à bas.", "label_lifted": true},
            {
                "transition_type": "medium",
                "transition_content": "Absolument.",
                "sub_variantes": [{"num": 2, "content": "Faire tomber."}]
            }
        ]
    }))?;

    let entry = Entry::from_doc(doc);
    let container = entry.variante(entry.body[1]);
    let transition = container.transition.as_ref().map(|t| (t.kind.clone(), entry.indent(t.label).content.clone()));

    assert!(entry.check_integrity().is_ok());
    assert_eq!(transition, Some((TransitionKind::Medium, "Absolument.".to_string())));
    assert!(entry.variante(entry.body[0]).label_lifted);
    Ok(())
}

/// Test that half a classification pair is dropped and stray forms are ignored
#[test]
fn test_fromDoc_withPartialEnrichment_shouldKeepOnlyConsistentFields() -> Result<()> {
    let doc: EntryDoc = serde_json::from_value(json!({
        "headword": "CHAT",
        "body_variantes": [{
            "num": 1,
            "content": "Animal.",
            "indents": [
                {"content": "Prov. À bon chat bon rat.", "role": "proverb", "classification_confidence": 0.9},
                {"content": "Béquille.", "role": "elaboration", "canonical_form": "Béquille"},
                {"content": "Jouer au chat, courir.", "role": "locution",
                 "classification_method": "manual", "classification_confidence": 1.0,
                 "canonical_form": "Jouer au chat"}
            ]
        }]
    }))?;

    let entry = Entry::from_doc(doc);
    let ids = entry.variante(entry.body[0]).indents.clone();

    assert!(entry.indent(ids[0]).classification.is_none());
    assert_eq!(entry.indent(ids[0]).role, IndentRole::Proverb);
    assert_eq!(entry.indent(ids[1]).canonical_form, None);
    assert_eq!(entry.indent(ids[2]).method(), Some(ClassificationMethod::Manual));
    assert_eq!(entry.indent(ids[2]).canonical_form.as_deref(), Some("Jouer au chat"));
    Ok(())
}

/// Test that a freshly parsed entry needs no enrichment fields at all
#[test]
fn test_fromDoc_withParserOutput_shouldDefaultToUnknown() -> Result<()> {
    let doc: EntryDoc = serde_json::from_str(
        r#"{"headword": "A", "body_variantes": [{"num": 1, "content": "Lettre.", "indents": [{"content": "Un a."}]}]}"#,
    )?;

    let entry = Entry::from_doc(doc);

    assert_eq!(entry.xml_id, "");
    assert!(entry.indents().all(|(_, indent)| indent.role == IndentRole::Unknown));
    Ok(())
}
