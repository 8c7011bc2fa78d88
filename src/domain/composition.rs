//! Pair composition: named groups of side-tagged class references and glyph runs.

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::classes::ClassStore;
use crate::domain::entities::Identifier;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::pairs::{PairGroup, PairMember};

/// Leading marker that turns a label into a class reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMark(String);

impl Default for ClassMark {
    fn default() -> Self {
        Self("@".into())
    }
}

impl ClassMark {
    pub fn new(mark: impl Into<String>) -> DomainResult<Self> {
        let mark = mark.into();
        if mark.is_empty() || mark.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidIdentifier(mark));
        }
        Ok(Self(mark))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Add the mark when absent, strip it when present. Surrounding blanks are dropped.
    pub fn toggle_label(&self, label: &str) -> String {
        let label = label.trim();
        match label.strip_prefix(self.0.as_str()) {
            Some(stripped) => stripped.trim_start().to_string(),
            None => format!("{}{}", self.0, label),
        }
    }

    /// Identifier form of [`ClassMark::toggle_label`]. A bare mark is left as is.
    pub fn toggle(&self, identifier: &Identifier) -> Identifier {
        Identifier::new(self.toggle_label(identifier.as_str()))
            .unwrap_or_else(|_| identifier.clone())
    }

    /// Resolve a label once into a tagged reference.
    pub fn parse(&self, label: &str, separator: &str) -> DomainResult<MemberRef> {
        let label = label.trim();
        if let Some(name) = label.strip_prefix(self.0.as_str()) {
            let name = Identifier::new(name.trim())?;
            let token = Identifier::new(format!("{}{}", self.0, name))?;
            return Ok(MemberRef::Class {
                name: name.into(),
                token,
            });
        }
        let glyphs = Identifier::parse_sequence(label, separator)?;
        if glyphs.is_empty() {
            return Err(DomainError::InvalidIdentifier(label.to_string()));
        }
        Ok(MemberRef::Literal(glyphs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    /// `token` is the normalised marked form, used as-is for class kerning
    Class { name: String, token: Identifier },
    Literal(Vec<Identifier>),
}

/// Which position of a kerning pair an entry feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionEntry {
    /// Text as typed, sigil included
    pub label: String,
    pub reference: MemberRef,
    pub first: bool,
    pub second: bool,
}

impl CompositionEntry {
    pub fn new(
        label: impl Into<String>,
        first: bool,
        second: bool,
        mark: &ClassMark,
        separator: &str,
    ) -> DomainResult<Self> {
        let label = label.into();
        let reference = mark.parse(&label, separator)?;
        Ok(Self {
            label,
            reference,
            first,
            second,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionGroup {
    pub name: String,
    pub entries: Vec<CompositionEntry>,
}

impl CompositionGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }
}

/// Payload of the composition editing view. Group nodes ignore the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionNode {
    pub label: String,
    pub first: bool,
    pub second: bool,
}

impl CompositionNode {
    pub fn group(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            first: false,
            second: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairComposition {
    pub name: String,
    pub groups: Vec<CompositionGroup>,
}

impl PairComposition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Snapshot the composition as generator input.
    ///
    /// With `expand_classes`, a class reference stands for the class members
    /// and must exist in `classes`. Without it, the marked label itself is the
    /// token, producing class-kerning pairs such as `@A b1`.
    #[instrument(level = "debug", skip(self, classes))]
    pub fn resolve(
        &self,
        classes: &ClassStore,
        expand_classes: bool,
    ) -> DomainResult<Vec<PairGroup>> {
        self.groups
            .iter()
            .map(|group| {
                let entries = group
                    .entries
                    .iter()
                    .map(|entry| {
                        Ok(PairMember {
                            identifier_sequence: resolve_entry(entry, classes, expand_classes)?,
                            include_as_first: entry.first,
                            include_as_second: entry.second,
                        })
                    })
                    .collect::<DomainResult<Vec<_>>>()?;
                Ok(PairGroup {
                    name: group.name.clone(),
                    entries,
                })
            })
            .collect()
    }

    /// Editing view: groups at the root level, entries as their children.
    pub fn to_tree(&self) -> TreeArena<CompositionNode> {
        let mut tree = TreeArena::new();
        for group in &self.groups {
            let Ok(group_node) = tree.add(None, CompositionNode::group(&group.name)) else {
                continue;
            };
            for entry in &group.entries {
                let node = CompositionNode {
                    label: entry.label.clone(),
                    first: entry.first,
                    second: entry.second,
                };
                let _ = tree.add(Some(group_node), node);
            }
        }
        tree
    }

    /// Commit an edited view. Nodes nested below entries are ignored.
    pub fn from_tree(
        name: impl Into<String>,
        tree: &TreeArena<CompositionNode>,
        mark: &ClassMark,
        separator: &str,
    ) -> DomainResult<Self> {
        let mut composition = Self::new(name);
        for &root in tree.roots() {
            let Some(group_node) = tree.get(root) else {
                continue;
            };
            let mut group = CompositionGroup::new(group_node.label.clone());
            for &child in tree.children(root)? {
                if let Some(node) = tree.get(child) {
                    group.entries.push(CompositionEntry::new(
                        node.label.clone(),
                        node.first,
                        node.second,
                        mark,
                        separator,
                    )?);
                }
            }
            composition.groups.push(group);
        }
        Ok(composition)
    }
}

fn resolve_entry(
    entry: &CompositionEntry,
    classes: &ClassStore,
    expand_classes: bool,
) -> DomainResult<Vec<Identifier>> {
    match &entry.reference {
        MemberRef::Literal(glyphs) => Ok(glyphs.clone()),
        MemberRef::Class { name, .. } if expand_classes => classes
            .get(name)
            .map(|class| class.members().to_vec())
            .ok_or_else(|| DomainError::MissingClass(name.clone())),
        MemberRef::Class { token, .. } => Ok(vec![token.clone()]),
    }
}

/// Flip the side flag on every selected node of a composition view.
pub fn toggle_side(
    tree: &mut TreeArena<CompositionNode>,
    ids: &[NodeId],
    side: Side,
) -> DomainResult<()> {
    for &id in ids {
        tree.get(id).ok_or(DomainError::NotFound(id))?;
    }
    for &id in ids {
        if let Some(node) = tree.get_mut(id) {
            match side {
                Side::First => node.first = !node.first,
                Side::Second => node.second = !node.second,
            }
        }
    }
    debug!("toggled {:?} on {} nodes", side, ids.len());
    Ok(())
}

/// Add or strip the class mark on every selected node of a composition view.
pub fn toggle_class_mark(
    tree: &mut TreeArena<CompositionNode>,
    ids: &[NodeId],
    mark: &ClassMark,
) -> DomainResult<()> {
    for &id in ids {
        tree.get(id).ok_or(DomainError::NotFound(id))?;
    }
    for &id in ids {
        if let Some(node) = tree.get_mut(id) {
            node.label = mark.toggle_label(&node.label);
        }
    }
    Ok(())
}
