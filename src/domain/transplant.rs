//! Carry class leaders from one class collection into another.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::classes::ClassStore;
use crate::domain::error::DomainError;

/// Per-class problem recorded while transplanting; the class is left as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransplantWarning {
    #[error("class {0} has no counterpart in the destination")]
    MissingClass(String),

    #[error("class {class}: leader {leader} is not a destination member")]
    MissingLeader { class: String, leader: String },
}

impl From<TransplantWarning> for DomainError {
    fn from(warning: TransplantWarning) -> Self {
        match warning {
            TransplantWarning::MissingClass(class) => DomainError::MissingClass(class),
            TransplantWarning::MissingLeader { class, leader } => {
                DomainError::MissingLeader { class, leader }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransplantOutcome {
    pub destination: ClassStore,
    pub warnings: Vec<TransplantWarning>,
}

/// Merge leader designations from `source` into `destination`.
///
/// For each source class with a same-named destination class, the destination
/// members are sorted alphabetically and the source leader is moved (or, with
/// `force_add`, inserted) to the front. Missing classes or leaders produce a
/// warning and leave that class untouched; destination-only classes are kept.
#[instrument(level = "debug", skip(source, destination), fields(classes = source.len()))]
pub fn transplant(
    source: &ClassStore,
    mut destination: ClassStore,
    force_add: bool,
) -> TransplantOutcome {
    let mut warnings = Vec::new();

    for class in source.iter() {
        let Some(target) = destination.get(class.name()) else {
            warnings.push(TransplantWarning::MissingClass(class.name().to_string()));
            continue;
        };

        let leader = class.leader().clone();
        let mut updated = target.clone();
        updated.sort_members();
        if updated.set_leader(leader.clone(), force_add).is_err() {
            warnings.push(TransplantWarning::MissingLeader {
                class: class.name().to_string(),
                leader: leader.to_string(),
            });
            continue;
        }

        if destination.replace(updated).is_err() {
            warnings.push(TransplantWarning::MissingClass(class.name().to_string()));
            continue;
        }
        debug!("transplant: {} now led by {}", class.name(), leader);
    }

    TransplantOutcome {
        destination,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classes::ClassDefinition;
    use crate::domain::entities::Identifier;

    fn store(classes: &[(&str, &[&str])]) -> ClassStore {
        let mut store = ClassStore::new();
        for (name, members) in classes {
            let members = members.iter().map(|m| Identifier::new(*m).unwrap()).collect();
            store.insert(ClassDefinition::new(*name, members).unwrap()).unwrap();
        }
        store
    }

    fn members(store: &ClassStore, name: &str) -> Vec<String> {
        store
            .get(name)
            .unwrap()
            .members()
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    #[test]
    fn given_leader_present_when_transplanting_then_sorted_with_leader_first() {
        let source = store(&[("A", &["a2", "a1"])]);
        let destination = store(&[("A", &["a3", "a1", "a2"])]);

        let outcome = transplant(&source, destination, false);

        assert!(outcome.warnings.is_empty());
        assert_eq!(members(&outcome.destination, "A"), vec!["a2", "a1", "a3"]);
    }

    #[test]
    fn given_leader_absent_when_forcing_then_inserted_before_sorted_members() {
        let source = store(&[("A", &["x"])]);
        let destination = store(&[("A", &["a2", "a1"])]);

        let outcome = transplant(&source, destination, true);

        assert!(outcome.warnings.is_empty());
        assert_eq!(members(&outcome.destination, "A"), vec!["x", "a1", "a2"]);
    }

    #[test]
    fn given_leader_absent_without_force_when_transplanting_then_warns_and_keeps_class() {
        let source = store(&[("A", &["x"]), ("B", &["b2"])]);
        let destination = store(&[("A", &["a2", "a1"]), ("B", &["b1", "b2"])]);

        let outcome = transplant(&source, destination, false);

        assert_eq!(
            outcome.warnings,
            vec![TransplantWarning::MissingLeader {
                class: "A".into(),
                leader: "x".into()
            }]
        );
        assert_eq!(members(&outcome.destination, "A"), vec!["a2", "a1"]);
        assert_eq!(members(&outcome.destination, "B"), vec!["b2", "b1"]);
    }

    #[test]
    fn given_class_missing_in_destination_when_transplanting_then_warns_without_creating() {
        let source = store(&[("Z", &["z"])]);
        let destination = store(&[("C", &["c2", "c1"])]);

        let outcome = transplant(&source, destination, true);

        assert_eq!(
            outcome.warnings,
            vec![TransplantWarning::MissingClass("Z".into())]
        );
        assert!(!outcome.destination.contains("Z"));
        assert_eq!(members(&outcome.destination, "C"), vec!["c2", "c1"]);
    }
}
