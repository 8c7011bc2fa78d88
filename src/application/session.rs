//! Per-document editing state
//!
//! Each open document set gets its own session; nothing here is global, so
//! two sessions (or two tests) never see each other's paths or data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{
    ClassMark, ClassStore, CompositionNode, DomainResult, PairComposition, TreeArena,
};

/// Kinds of documents a session reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Classes,
    Composition,
    Pairs,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Classes => "classes",
            DocumentKind::Composition => "composition",
            DocumentKind::Pairs => "pairs",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    pub classes: ClassStore,
    pub composition: PairComposition,
    last_paths: HashMap<DocumentKind, PathBuf>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path the given kind of document was last opened from or saved to.
    pub fn last_path(&self, kind: DocumentKind) -> Option<&Path> {
        self.last_paths.get(&kind).map(PathBuf::as_path)
    }

    pub fn remember_path(&mut self, kind: DocumentKind, path: &Path) {
        debug!("session: {} -> {}", kind.as_str(), path.display());
        self.last_paths.insert(kind, path.to_path_buf());
    }

    /// Editing view of the session's classes.
    pub fn class_view(&self) -> TreeArena<String> {
        self.classes.to_tree()
    }

    /// Replace the classes with an edited view; on error the session is unchanged.
    pub fn commit_classes(&mut self, view: &TreeArena<String>) -> DomainResult<()> {
        self.classes = ClassStore::from_tree(view)?;
        Ok(())
    }

    /// Editing view of the session's composition.
    pub fn composition_view(&self) -> TreeArena<CompositionNode> {
        self.composition.to_tree()
    }

    /// Replace the composition with an edited view; on error the session is unchanged.
    pub fn commit_composition(
        &mut self,
        view: &TreeArena<CompositionNode>,
        mark: &ClassMark,
        separator: &str,
    ) -> DomainResult<()> {
        let name = self.composition.name.clone();
        self.composition = PairComposition::from_tree(name, view, mark, separator)?;
        Ok(())
    }
}
