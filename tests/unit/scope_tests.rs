/*!
 * Tests for scope resolution
 */

use littre_enrich::enrichment::{ScopeConfig, ScopeResolver, parse_transition};
use littre_enrich::model::{Classification, Entry, Indent, IndentRole, TransitionKind, Variante, VarianteId};

fn label(content: &str) -> Indent {
    let mut indent = Indent::new(content);
    indent.assign(IndentRole::VoiceTransition, Classification::heuristic(0.85));
    indent
}

fn sense(entry: &mut Entry, num: u32) -> VarianteId {
    entry.push_variante(Variante::numbered(num, &format!("Sens {}.", num)))
}

/// Test a medium transition over the rest of the entry
#[test]
fn test_resolveEntry_withMediumLabel_shouldGroupFollowingSenses() {
    let mut entry = Entry::new("ABATTRE");
    let v1 = sense(&mut entry, 1);
    entry.push_indent(v1, label("Absolument."));
    let v2 = sense(&mut entry, 2);
    let v3 = sense(&mut entry, 3);

    let log = ScopeResolver::default().resolve_entry(&mut entry);

    assert_eq!(log.medium_scoped, 2);
    assert_eq!(log.strong_scoped, 0);
    let container = entry.variante(entry.body[1]);
    assert_eq!(container.sub_variantes, vec![v2, v3]);
    assert_eq!(container.transition.as_ref().map(|t| t.kind.clone()), Some(TransitionKind::Medium));
    assert_eq!(container.num, None);
}

/// Test that a second boundary ends the first scope
#[test]
fn test_resolveEntry_withTwoLabels_shouldSplitScopes() {
    let mut entry = Entry::new("ABATTRE");
    let v1 = sense(&mut entry, 1);
    entry.push_indent(v1, label("V. n."));
    let v2 = sense(&mut entry, 2);
    let v3 = sense(&mut entry, 3);
    entry.push_indent(v3, label("S'ABATTRE, v. réfl."));
    let v4 = sense(&mut entry, 4);
    let v5 = sense(&mut entry, 5);

    let log = ScopeResolver::default().resolve_entry(&mut entry);

    assert_eq!(entry.body.len(), 4);
    assert_eq!(entry.body[0], v1);
    assert_eq!(entry.variante(entry.body[1]).sub_variantes, vec![v2]);
    assert_eq!(entry.body[2], v3);
    assert_eq!(entry.variante(entry.body[3]).sub_variantes, vec![v4, v5]);
    assert_eq!(log.medium_scoped, 1);
    assert_eq!(log.strong_scoped, 2);
    assert_eq!(log.containers, 2);
    assert!(entry.check_integrity().is_ok());
}

/// Test that a boundary directly followed by another boundary governs nothing
#[test]
fn test_resolveEntry_withAdjacentBoundaries_shouldCountZeroScope() {
    let mut entry = Entry::new("ABATTRE");
    let v1 = sense(&mut entry, 1);
    entry.push_indent(v1, label("V. n."));
    let v2 = sense(&mut entry, 2);
    entry.push_indent(v2, label("S'ABATTRE, v. réfl."));
    let v3 = sense(&mut entry, 3);

    let log = ScopeResolver::default().resolve_entry(&mut entry);

    assert_eq!(log.zero_scope, 1);
    assert_eq!(entry.variante(v1).indents.len(), 1);
    assert_eq!(entry.body.len(), 3);
    assert_eq!(entry.variante(entry.body[2]).sub_variantes, vec![v3]);
}

/// Test that every Variante and Indent survives restructuring
#[test]
fn test_resolveEntry_shouldPreserveEveryNode() {
    let mut entry = Entry::new("ABATTRE");
    for num in 1..=6 {
        let vid = sense(&mut entry, num);
        entry.push_indent(vid, Indent::new("Emploi."));
        if num % 2 == 1 {
            entry.push_indent(vid, label("Absolument."));
        }
    }
    let indents = entry.indent_count();

    ScopeResolver::default().resolve_entry(&mut entry);

    assert!(entry.check_integrity().is_ok());
    assert_eq!(entry.indent_count(), indents);
    assert_eq!(entry.indents_preorder().len(), indents);
}

/// Test the ambiguity report for oversized scopes
#[test]
fn test_resolveEntry_withOversizedScope_shouldRecordAmbiguity() {
    let mut entry = Entry::new("FAIRE");
    let v1 = sense(&mut entry, 1);
    entry.push_indent(v1, label("Absolument."));
    for num in 2..=5 {
        sense(&mut entry, num);
    }

    let resolver = ScopeResolver::new(ScopeConfig {
        large_scope_threshold: 3,
    });
    let log = resolver.resolve_entry(&mut entry);

    assert_eq!(log.ambiguous, vec!["FAIRE: Absolument. scopes 4 variantes".to_string()]);
    assert_eq!(log.medium_scoped, 4);
}

/// Test that a label followed directly by another label keeps no children
#[test]
fn test_resolveEntry_withAdjacentIntraLabels_shouldLeaveFirstEmpty() {
    let mut entry = Entry::new("TEST");
    let v = sense(&mut entry, 1);
    let first = entry.push_indent(v, label("Activement."));
    let second = entry.push_indent(v, label("Au pluriel."));
    let follower = entry.push_indent(v, Indent::new("Les sens figurés."));

    let log = ScopeResolver::default().resolve_entry(&mut entry);

    // the second label is no longer last, so this is not a scope boundary
    assert!(entry.indent(first).children.is_empty());
    assert_eq!(entry.indent(second).children, vec![follower]);
    assert_eq!(log.intra_grouped, 1);
    assert_eq!(log.containers, 0);
}

/// Test strong transition parsing with a capitalized single form
#[test]
fn test_parseTransition_withVerbHeader_shouldDeriveFormAndPos() {
    assert_eq!(
        parse_transition("ABAISSER, v. a."),
        TransitionKind::Strong {
            form: "ABAISSER".to_string(),
            pos: "v. a".to_string()
        }
    );
}
