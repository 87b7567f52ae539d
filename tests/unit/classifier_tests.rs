/*!
 * Tests for role classification
 */

use littre_enrich::enrichment::RoleClassifier;
use littre_enrich::model::{ClassificationMethod, Indent, IndentRole};

use crate::common;

fn classify(content: &str) -> Option<(IndentRole, ClassificationMethod, f32)> {
    RoleClassifier::classify(&Indent::new(content)).map(|verdict| {
        (
            verdict.role,
            verdict.classification.method(),
            verdict.classification.confidence(),
        )
    })
}

/// Test that every non-empty Indent of a real-shaped entry gets a role
#[test]
fn test_classifyEntry_withNonEmptyIndents_shouldLeaveNoneUnknown() {
    common::init_logging();
    for mut entry in common::sample_corpus(4) {
        RoleClassifier.classify_entry(&mut entry);

        for id in entry.indents_preorder() {
            let indent = entry.indent(id);
            if !indent.plain_text().is_empty() {
                assert_ne!(indent.role, IndentRole::Unknown, "{}", indent.content);
                assert!(indent.classification.is_some());
            }
        }
    }
}

/// Test that confidences always stay within the unit interval
#[test]
fn test_classifyEntry_shouldKeepConfidenceInUnitInterval() {
    let mut entry = common::chat_entry();
    RoleClassifier.classify_entry(&mut entry);

    for (_, indent) in entry.indents() {
        if let Some(confidence) = indent.confidence() {
            assert!((0.0..=1.0).contains(&confidence));
        }
    }
}

/// Test that rubrique Indents are classified like body Indents
#[test]
fn test_classifyEntry_withRubrique_shouldClassifyItsIndents() {
    let mut entry = common::abaisser_entry();
    let rubrique_indent = entry.rubriques[0].indents[0];

    RoleClassifier.classify_entry(&mut entry);

    // "Bas-lat." trips the register prefix "Bas"
    assert_eq!(entry.indent(rubrique_indent).role, IndentRole::RegisterLabel);
}

/// Test that deterministic markers win over any heuristic prefix
#[test]
fn test_classify_withMarkerAndProverbPrefix_shouldPreferMarker() {
    let result = classify(r#"Prov. <semantique type="domaine">Marine.</semantique>"#);

    assert_eq!(result, Some((IndentRole::Domain, ClassificationMethod::Deterministic, 1.0)));
}

/// Test that the register rule is case-insensitive and the voice rule is not
#[test]
fn test_classify_withLowercasePrefixes_shouldOnlyMatchRegister() {
    assert_eq!(classify("familièrement.").map(|r| r.0), Some(IndentRole::RegisterLabel));
    assert_eq!(classify("absolument, sans régime.").map(|r| r.0), Some(IndentRole::Elaboration));
}

/// Test that the definition opener outranks the phrase shape
#[test]
fn test_classify_withDefinitionOpenerAndComma_shouldBeElaboration() {
    let result = classify("Terme de marine, cordage qui sert à hisser.");

    assert_eq!(result, Some((IndentRole::Elaboration, ClassificationMethod::Heuristic, 0.75)));
}

/// Test the long-text fallback
#[test]
fn test_classify_withLongPlainText_shouldBeLowConfidenceElaboration() {
    let result = classify("dont le sens est assez proche du précédent");

    assert_eq!(result, Some((IndentRole::Elaboration, ClassificationMethod::Heuristic, 0.4)));
}
