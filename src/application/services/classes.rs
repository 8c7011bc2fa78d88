//! Class collection service
//!
//! Loads, saves and imports class collections and applies leader edits.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{
    ApplicationError, ApplicationResult, DocumentKind, EditSession, IoResultExt,
};
use crate::domain::{ClassStore, Identifier};
use crate::infrastructure::traits::{ClassReader, ClassWriter, GroupReader};

pub struct ClassService {
    reader: Arc<dyn ClassReader>,
    writer: Arc<dyn ClassWriter>,
    groups: Arc<dyn GroupReader>,
}

impl ClassService {
    pub fn new(
        reader: Arc<dyn ClassReader>,
        writer: Arc<dyn ClassWriter>,
        groups: Arc<dyn GroupReader>,
    ) -> Self {
        Self {
            reader,
            writer,
            groups,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<ClassStore> {
        let entries = self
            .reader
            .read_classes(path)
            .with_path_context("read classes", path)?;
        let store = ClassStore::from_entries(entries)?;
        debug!("load: {} classes from {}", store.len(), path.display());
        Ok(store)
    }

    #[instrument(level = "debug", skip(self, store))]
    pub fn save(&self, path: &Path, store: &ClassStore) -> ApplicationResult<()> {
        self.writer
            .write_classes(path, &store.to_entries())
            .with_path_context("write classes", path)
    }

    /// Import kerning groups from project metadata as classes.
    #[instrument(level = "debug", skip(self))]
    pub fn import_groups(&self, path: &Path, prefix: &str) -> ApplicationResult<ClassStore> {
        let groups = self
            .groups
            .read_groups(path)
            .with_path_context("read project groups", path)?;
        let total = groups.len();
        let store = ClassStore::import_groups(groups, prefix)?;
        info!(
            "imported {} of {} groups from {}",
            store.len(),
            total,
            path.display()
        );
        Ok(store)
    }

    /// Promote `glyph` to leader of `class` in the collection at `path`, in place.
    #[instrument(level = "debug", skip(self))]
    pub fn set_leader(
        &self,
        path: &Path,
        class: &str,
        glyph: &str,
        force_add: bool,
    ) -> ApplicationResult<ClassStore> {
        let mut store = self.load(path)?;
        store.set_leader(class, Identifier::new(glyph)?, force_add)?;
        self.save(path, &store)?;
        Ok(store)
    }

    /// Load classes into a session and remember where they came from.
    pub fn open(&self, session: &mut EditSession, path: &Path) -> ApplicationResult<()> {
        session.classes = self.load(path)?;
        session.remember_path(DocumentKind::Classes, path);
        Ok(())
    }

    /// Save the session's classes to `path`, or to the last used classes path.
    pub fn save_session(
        &self,
        session: &mut EditSession,
        path: Option<&Path>,
    ) -> ApplicationResult<()> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => session
                .last_path(DocumentKind::Classes)
                .map(Path::to_path_buf)
                .ok_or(ApplicationError::NoDocumentPath(DocumentKind::Classes.as_str()))?,
        };
        self.save(&target, &session.classes)?;
        session.remember_path(DocumentKind::Classes, &target);
        Ok(())
    }
}
