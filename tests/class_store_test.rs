//! Tests for ClassStore editing and leader transplanting

use rstest::rstest;

use kernrig::domain::{
    transplant, ClassMark, ClassStore, DomainError, Identifier, TransplantWarning,
};
use kernrig::util::testing;

fn store(entries: &[(&str, &[&str])]) -> ClassStore {
    ClassStore::from_entries(
        entries
            .iter()
            .map(|(name, members)| {
                (
                    name.to_string(),
                    members.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect::<Vec<_>>(),
    )
    .unwrap()
}

fn members(store: &ClassStore, name: &str) -> Vec<String> {
    store
        .get(name)
        .unwrap()
        .members()
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn id(text: &str) -> Identifier {
    Identifier::new(text).unwrap()
}

// ============================================================
// set_leader()
// ============================================================

#[rstest]
#[case::existing_member("a2", false, vec!["a2", "a1", "a3"])]
#[case::already_leader("a1", false, vec!["a1", "a2", "a3"])]
#[case::forced_new_member("a9", true, vec!["a9", "a1", "a2", "a3"])]
fn given_class_when_setting_leader_then_leader_first(
    #[case] glyph: &str,
    #[case] force: bool,
    #[case] expected: Vec<&str>,
) {
    testing::init_test_setup();
    let mut classes = store(&[("A", &["a1", "a2", "a3"])]);

    classes.set_leader("A", id(glyph), force).unwrap();

    assert_eq!(members(&classes, "A"), expected);
    assert_eq!(classes.get("A").unwrap().leader().as_str(), glyph);
}

#[test]
fn given_absent_glyph_without_force_when_setting_leader_then_missing_leader() {
    let mut classes = store(&[("A", &["a1", "a2"])]);

    let result = classes.set_leader("A", id("zz"), false);

    assert!(matches!(result, Err(DomainError::MissingLeader { .. })));
    assert_eq!(members(&classes, "A"), vec!["a1", "a2"]);
}

#[test]
fn given_unknown_class_when_setting_leader_then_missing_class() {
    let mut classes = store(&[("A", &["a1"])]);

    assert_eq!(
        classes.set_leader("B", id("a1"), true),
        Err(DomainError::MissingClass("B".into()))
    );
}

// ============================================================
// class mark toggling
// ============================================================

#[test]
fn given_identifier_when_toggling_mark_twice_then_original() {
    let mark = ClassMark::default();
    let plain = id("A");

    let marked = mark.toggle(&plain);

    assert_eq!(marked.as_str(), "@A");
    assert_eq!(mark.toggle(&marked), plain);
}

// ============================================================
// import and tree view
// ============================================================

#[test]
fn given_metadata_groups_when_importing_then_prefix_convention_applied() {
    let groups = vec![
        ("public.kern1.O".to_string(), vec!["O".to_string(), "Q".to_string()]),
        ("public.kern2.O".to_string(), vec!["O".to_string()]),
        ("public.kern2.H".to_string(), vec!["H".to_string(), "I".to_string()]),
        ("other.group".to_string(), vec!["x".to_string()]),
        ("public.kern1.".to_string(), vec!["y".to_string()]),
    ];

    let classes = ClassStore::import_groups(groups, "public.kern").unwrap();

    assert_eq!(classes.names().collect::<Vec<_>>(), vec!["O", "H"]);
    assert_eq!(members(&classes, "O"), vec!["O", "Q"]);
}

#[test]
fn given_edited_tree_view_when_committing_then_store_follows_view() {
    let classes = store(&[("A", &["a1", "a2"]), ("B", &["b1"])]);
    let mut view = classes.to_tree();
    let (a, b) = (view.roots()[0], view.roots()[1]);
    let a2 = view.children(a).unwrap()[1];

    view.reparent(a2, b, Some(0)).unwrap();
    view.duplicate(&[b]).unwrap();
    let copy = view.roots()[2];
    *view.get_mut(copy).unwrap() = "C".to_string();

    let committed = ClassStore::from_tree(&view).unwrap();

    assert_eq!(committed.names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(members(&committed, "A"), vec!["a1"]);
    assert_eq!(members(&committed, "B"), vec!["a2", "b1"]);
    assert_eq!(members(&committed, "C"), vec!["a2", "b1"]);
}

// ============================================================
// transplant()
// ============================================================

#[test]
fn given_source_leader_when_transplanting_then_destination_sorted_with_leader_first() {
    let source = store(&[("A", &["a1", "a9"])]);
    let destination = store(&[("A", &["a3", "a1", "a2"])]);

    let outcome = transplant(&source, destination, false);

    assert!(outcome.warnings.is_empty());
    assert_eq!(members(&outcome.destination, "A"), vec!["a1", "a2", "a3"]);
}

#[test]
fn given_leader_not_first_alphabetically_when_transplanting_then_moved_to_front() {
    let source = store(&[("A", &["a2"])]);
    let destination = store(&[("A", &["a3", "a1", "a2"])]);

    let outcome = transplant(&source, destination, false);

    assert_eq!(members(&outcome.destination, "A"), vec!["a2", "a1", "a3"]);
}

#[test]
fn given_missing_class_and_leader_when_transplanting_then_warnings_and_rest_applied() {
    let source = store(&[("X", &["x1"]), ("A", &["zz"]), ("B", &["b2"])]);
    let destination = store(&[("A", &["a2", "a1"]), ("B", &["b1", "b2"]), ("C", &["c1"])]);

    let outcome = transplant(&source, destination, false);

    assert_eq!(
        outcome.warnings,
        vec![
            TransplantWarning::MissingClass("X".into()),
            TransplantWarning::MissingLeader {
                class: "A".into(),
                leader: "zz".into(),
            },
        ]
    );
    assert_eq!(members(&outcome.destination, "A"), vec!["a2", "a1"]);
    assert_eq!(members(&outcome.destination, "B"), vec!["b2", "b1"]);
    assert_eq!(members(&outcome.destination, "C"), vec!["c1"]);
}

#[test]
fn given_force_add_when_transplanting_then_leader_inserted() {
    let source = store(&[("A", &["zz"])]);
    let destination = store(&[("A", &["a2", "a1"])]);

    let outcome = transplant(&source, destination, true);

    assert!(outcome.warnings.is_empty());
    assert_eq!(members(&outcome.destination, "A"), vec!["zz", "a1", "a2"]);
}
