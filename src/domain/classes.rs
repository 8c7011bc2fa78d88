//! Kerning classes and the ordered collection holding them.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::entities::Identifier;
use crate::domain::error::{DomainError, DomainResult};

/// Named, ordered group of glyphs. The first member is the leader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    name: String,
    members: Vec<Identifier>,
}

impl ClassDefinition {
    /// Create a class; members must be non-empty and free of duplicates.
    pub fn new(name: impl Into<String>, members: Vec<Identifier>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidClass {
                class: name,
                reason: "empty class name".into(),
            });
        }
        validate_members(&name, &members)?;
        Ok(Self { name, members })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Identifier] {
        &self.members
    }

    pub fn leader(&self) -> &Identifier {
        &self.members[0]
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.position(identifier).is_some()
    }

    fn position(&self, identifier: &str) -> Option<usize> {
        self.members.iter().position(|m| m.as_str() == identifier)
    }

    /// Promote `identifier` to leader.
    ///
    /// An existing member moves to index 0; a non-member is inserted there
    /// only when `force_add` is set.
    pub fn set_leader(&mut self, identifier: Identifier, force_add: bool) -> DomainResult<()> {
        match self.position(identifier.as_str()) {
            Some(index) => {
                let leader = self.members.remove(index);
                self.members.insert(0, leader);
            }
            None if force_add => self.members.insert(0, identifier),
            None => {
                return Err(DomainError::MissingLeader {
                    class: self.name.clone(),
                    leader: identifier.to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn add_member(&mut self, identifier: Identifier) -> DomainResult<()> {
        if self.contains(identifier.as_str()) {
            return Err(DomainError::InvalidClass {
                class: self.name.clone(),
                reason: format!("duplicate member {}", identifier),
            });
        }
        self.members.push(identifier);
        Ok(())
    }

    pub fn remove_member(&mut self, identifier: &str) -> DomainResult<Identifier> {
        let index = self.position(identifier).ok_or_else(|| DomainError::InvalidClass {
            class: self.name.clone(),
            reason: format!("{} is not a member", identifier),
        })?;
        if self.members.len() == 1 {
            return Err(DomainError::InvalidClass {
                class: self.name.clone(),
                reason: "cannot remove the last member".into(),
            });
        }
        Ok(self.members.remove(index))
    }

    /// Reorder: move the member at `from` to position `to` (clamped).
    pub fn move_member(&mut self, from: usize, to: usize) -> DomainResult<()> {
        if from >= self.members.len() {
            return Err(DomainError::InvalidClass {
                class: self.name.clone(),
                reason: format!("no member at index {}", from),
            });
        }
        let member = self.members.remove(from);
        let to = to.min(self.members.len());
        self.members.insert(to, member);
        Ok(())
    }

    /// Alphabetical normalization of the member list.
    pub fn sort_members(&mut self) {
        self.members.sort();
    }
}

fn validate_members(class: &str, members: &[Identifier]) -> DomainResult<()> {
    if members.is_empty() {
        return Err(DomainError::InvalidClass {
            class: class.to_string(),
            reason: "class has no members".into(),
        });
    }
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if !seen.insert(member.as_str()) {
            return Err(DomainError::InvalidClass {
                class: class.to_string(),
                reason: format!("duplicate member {}", member),
            });
        }
    }
    Ok(())
}

/// Insertion-ordered collection of classes, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassStore {
    classes: Vec<ClassDefinition>,
}

impl ClassStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, members)` entries as produced by a class reader.
    pub fn from_entries<I>(entries: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut store = Self::new();
        for (name, members) in entries {
            let members = members
                .into_iter()
                .map(Identifier::new)
                .collect::<DomainResult<Vec<_>>>()?;
            store.insert(ClassDefinition::new(name, members)?)?;
        }
        Ok(store)
    }

    /// Entries in stored order, for a class writer.
    pub fn to_entries(&self) -> Vec<(String, Vec<String>)> {
        self.classes
            .iter()
            .map(|class| {
                (
                    class.name.clone(),
                    class.members.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect()
    }

    /// Import project-metadata groups that follow the kerning prefix convention.
    ///
    /// `public.kern1.O` with prefix `public.kern` becomes class `O`: the prefix
    /// and the two characters after it (side digit and dot) are stripped.
    /// Other groups are ignored. A name already imported is skipped, so
    /// `public.kern2.O` after `public.kern1.O` keeps the first-side members.
    #[instrument(level = "debug", skip(groups))]
    pub fn import_groups<I>(groups: I, prefix: &str) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut store = Self::new();
        for (group, members) in groups {
            let Some(rest) = group.strip_prefix(prefix) else {
                debug!("import_groups: ignoring {}", group);
                continue;
            };
            let name: String = rest.chars().skip(2).collect();
            if name.is_empty() {
                warn!("import_groups: {} has no class name after the prefix", group);
                continue;
            }
            if members.is_empty() {
                warn!("import_groups: {} has no members", group);
                continue;
            }
            if store.contains(&name) {
                warn!("import_groups: {} skipped, class {} already imported", group, name);
                continue;
            }
            let members = members
                .into_iter()
                .map(Identifier::new)
                .collect::<DomainResult<Vec<_>>>()?;
            store.insert(ClassDefinition::new(name, members)?)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|class| class.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|class| class.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClassDefinition> {
        self.classes.iter_mut().find(|class| class.name == name)
    }

    /// Append a class; names must stay unique.
    pub fn insert(&mut self, class: ClassDefinition) -> DomainResult<()> {
        if self.contains(&class.name) {
            return Err(DomainError::InvalidClass {
                class: class.name,
                reason: "duplicate class name".into(),
            });
        }
        self.classes.push(class);
        Ok(())
    }

    /// Replace the class with the same name in place, keeping its position.
    pub fn replace(&mut self, class: ClassDefinition) -> DomainResult<()> {
        let slot = self
            .get_mut(&class.name)
            .ok_or_else(|| DomainError::MissingClass(class.name.clone()))?;
        *slot = class;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<ClassDefinition> {
        let index = self.classes.iter().position(|class| class.name == name)?;
        Some(self.classes.remove(index))
    }

    pub fn rename(&mut self, name: &str, new_name: impl Into<String>) -> DomainResult<()> {
        let new_name = new_name.into();
        if new_name.trim().is_empty() {
            return Err(DomainError::InvalidClass {
                class: name.to_string(),
                reason: "empty class name".into(),
            });
        }
        if new_name != name && self.contains(&new_name) {
            return Err(DomainError::InvalidClass {
                class: new_name,
                reason: "duplicate class name".into(),
            });
        }
        let class = self
            .get_mut(name)
            .ok_or_else(|| DomainError::MissingClass(name.to_string()))?;
        class.name = new_name;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_leader(
        &mut self,
        name: &str,
        identifier: Identifier,
        force_add: bool,
    ) -> DomainResult<()> {
        self.get_mut(name)
            .ok_or_else(|| DomainError::MissingClass(name.to_string()))?
            .set_leader(identifier, force_add)
    }

    /// Editing view: one root-level node per class, members as children.
    pub fn to_tree(&self) -> TreeArena<String> {
        let mut tree = TreeArena::new();
        for class in &self.classes {
            let Ok(class_node) = tree.add(None, class.name.clone()) else {
                continue;
            };
            for member in &class.members {
                // parent was created above, add cannot miss it
                let _ = tree.add(Some(class_node), member.to_string());
            }
        }
        tree
    }

    /// Commit an edited view back into a store.
    ///
    /// Root-level labels are class names, their direct children are members;
    /// anything nested deeper is not part of a class and is ignored. The
    /// whole commit fails if any class would violate its invariants.
    #[instrument(level = "debug", skip(tree))]
    pub fn from_tree(tree: &TreeArena<String>) -> DomainResult<Self> {
        let mut store = Self::new();
        for &root in tree.roots() {
            let name = tree.get(root).cloned().unwrap_or_default();
            let members = tree
                .children(root)?
                .iter()
                .filter_map(|&child| tree.get(child))
                .map(|label| Identifier::new(label.trim()))
                .collect::<DomainResult<Vec<_>>>()?;
            store.insert(ClassDefinition::new(name, members)?)?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(names: &[&str]) -> Vec<Identifier> {
        names.iter().map(|n| Identifier::new(*n).unwrap()).collect()
    }

    fn class(name: &str, members: &[&str]) -> ClassDefinition {
        ClassDefinition::new(name, ids(members)).unwrap()
    }

    #[rstest]
    #[case::existing_member(&["a1", "a2", "a3"], "a3", false, &["a3", "a1", "a2"])]
    #[case::already_leader(&["a1", "a2"], "a1", false, &["a1", "a2"])]
    #[case::forced_outsider(&["a1", "a2"], "x", true, &["x", "a1", "a2"])]
    fn given_class_when_setting_leader_then_leader_is_first(
        #[case] members: &[&str],
        #[case] leader: &str,
        #[case] force: bool,
        #[case] expected: &[&str],
    ) {
        let mut c = class("A", members);
        c.set_leader(Identifier::new(leader).unwrap(), force).unwrap();
        assert_eq!(c.members(), ids(expected).as_slice());
        assert_eq!(c.leader().as_str(), leader);
    }

    #[test]
    fn given_outsider_without_force_when_setting_leader_then_missing_leader() {
        let mut c = class("A", &["a1", "a2"]);
        let err = c.set_leader(Identifier::new("x").unwrap(), false).unwrap_err();
        assert!(matches!(err, DomainError::MissingLeader { .. }));
        assert_eq!(c.members(), ids(&["a1", "a2"]).as_slice());
    }

    #[test]
    fn given_duplicate_or_empty_members_when_creating_then_rejects() {
        assert!(ClassDefinition::new("A", vec![]).is_err());
        assert!(ClassDefinition::new("A", ids(&["a", "a"])).is_err());
    }

    #[test]
    fn given_class_when_adding_member_then_appended_and_duplicate_rejected() {
        let mut c = class("A", &["a1"]);
        c.add_member(Identifier::new("a2").unwrap()).unwrap();
        assert_eq!(c.members(), ids(&["a1", "a2"]).as_slice());
        assert_eq!(c.leader().as_str(), "a1");

        let err = c.add_member(Identifier::new("a1").unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidClass { .. }));
        assert_eq!(c.members(), ids(&["a1", "a2"]).as_slice());
    }

    #[test]
    fn given_single_member_when_removing_then_rejects() {
        let mut c = class("A", &["a1"]);
        assert!(c.remove_member("a1").is_err());
        let mut c = class("A", &["a1", "a2"]);
        assert_eq!(c.remove_member("a1").unwrap().as_str(), "a1");
        assert_eq!(c.leader().as_str(), "a2");
    }

    #[test]
    fn given_class_when_moving_member_then_reorders() {
        let mut c = class("A", &["a1", "a2", "a3"]);
        c.move_member(0, 10).unwrap();
        assert_eq!(c.members(), ids(&["a2", "a3", "a1"]).as_slice());
        assert!(c.move_member(5, 0).is_err());
    }

    #[test]
    fn given_store_when_inserting_duplicate_name_then_rejects() {
        let mut store = ClassStore::new();
        store.insert(class("A", &["a"])).unwrap();
        assert!(store.insert(class("A", &["b"])).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn given_unknown_class_when_setting_leader_then_missing_class() {
        let mut store = ClassStore::new();
        let err = store
            .set_leader("Z", Identifier::new("z").unwrap(), true)
            .unwrap_err();
        assert_eq!(err, DomainError::MissingClass("Z".into()));
    }

    #[test]
    fn given_entries_when_round_tripping_then_preserves_order() {
        let entries = vec![
            ("O".to_string(), vec!["O".to_string(), "Q".to_string()]),
            ("A".to_string(), vec!["A".to_string(), "Agrave".to_string()]),
        ];
        let store = ClassStore::from_entries(entries.clone()).unwrap();
        assert_eq!(store.to_entries(), entries);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["O", "A"]);
    }

    #[test]
    fn given_store_when_renaming_onto_existing_name_then_rejects() {
        let mut store = ClassStore::new();
        store.insert(class("A", &["a"])).unwrap();
        store.insert(class("B", &["b"])).unwrap();
        assert!(store.rename("A", "B").is_err());
        store.rename("A", "C").unwrap();
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["C", "B"]);
    }

    #[test]
    fn given_edited_tree_when_committing_then_rebuilds_store() {
        let mut store = ClassStore::new();
        store.insert(class("A", &["a1", "a2"])).unwrap();
        store.insert(class("B", &["b1"])).unwrap();

        let mut tree = store.to_tree();
        let a = tree.roots()[0];
        let b = tree.roots()[1];
        let a2 = tree.children(a).unwrap()[1];
        tree.reparent(a2, b, Some(0)).unwrap();

        let edited = ClassStore::from_tree(&tree).unwrap();
        assert_eq!(edited.get("A").unwrap().members(), ids(&["a1"]).as_slice());
        assert_eq!(edited.get("B").unwrap().members(), ids(&["a2", "b1"]).as_slice());
    }

    #[test]
    fn given_member_unnested_to_root_when_committing_then_rejects_empty_class() {
        let mut store = ClassStore::new();
        store.insert(class("A", &["a1", "a2"])).unwrap();
        let mut tree = store.to_tree();
        let a1 = tree.children(tree.roots()[0]).unwrap()[0];
        tree.unnest(&[a1]).unwrap();

        let err = ClassStore::from_tree(&tree).unwrap_err();
        assert!(matches!(err, DomainError::InvalidClass { class, .. } if class == "a1"));
    }
}
