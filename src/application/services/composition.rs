//! Composition document service
//!
//! A composition document is a JSON array of groups, each written as
//! `[name, [[label, first, second], ...]]`.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{
    ApplicationError, ApplicationResult, DocumentKind, EditSession, IoResultExt,
};
use crate::domain::{ClassMark, CompositionEntry, CompositionGroup, PairComposition};
use crate::infrastructure::traits::FileSystem;

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord(String, bool, bool);

#[derive(Debug, Serialize, Deserialize)]
struct GroupRecord(String, Vec<EntryRecord>);

pub struct CompositionService {
    fs: Arc<dyn FileSystem>,
    mark: ClassMark,
    separator: String,
}

impl CompositionService {
    pub fn new(fs: Arc<dyn FileSystem>, mark: ClassMark, separator: impl Into<String>) -> Self {
        Self {
            fs,
            mark,
            separator: separator.into(),
        }
    }

    /// Load a composition; its name is the file stem.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<PairComposition> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read composition", path)?;
        let records: Vec<GroupRecord> =
            serde_json::from_str(&content).map_err(|e| ApplicationError::OperationFailed {
                context: format!("parse composition {}", path.display()),
                source: Box::new(e),
            })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut composition = PairComposition::new(name);
        for GroupRecord(group_name, entries) in records {
            let mut group = CompositionGroup::new(group_name);
            for EntryRecord(label, first, second) in entries {
                group.entries.push(CompositionEntry::new(
                    label,
                    first,
                    second,
                    &self.mark,
                    &self.separator,
                )?);
            }
            composition.groups.push(group);
        }
        debug!(
            "load: {} groups from {}",
            composition.groups.len(),
            path.display()
        );
        Ok(composition)
    }

    #[instrument(level = "debug", skip(self, composition))]
    pub fn save(&self, path: &Path, composition: &PairComposition) -> ApplicationResult<()> {
        let records: Vec<GroupRecord> = composition
            .groups
            .iter()
            .map(|group| {
                GroupRecord(
                    group.name.clone(),
                    group
                        .entries
                        .iter()
                        .map(|e| EntryRecord(e.label.clone(), e.first, e.second))
                        .collect(),
                )
            })
            .collect();
        let content =
            serde_json::to_string(&records).map_err(|e| ApplicationError::OperationFailed {
                context: format!("serialize composition {}", path.display()),
                source: Box::new(e),
            })?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create composition directory", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write composition", path)
    }

    /// Load a composition into a session and remember where it came from.
    pub fn open(&self, session: &mut EditSession, path: &Path) -> ApplicationResult<()> {
        session.composition = self.load(path)?;
        session.remember_path(DocumentKind::Composition, path);
        Ok(())
    }

    /// Save the session's composition to `path`, or to the last used composition path.
    pub fn save_session(
        &self,
        session: &mut EditSession,
        path: Option<&Path>,
    ) -> ApplicationResult<()> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => session
                .last_path(DocumentKind::Composition)
                .map(Path::to_path_buf)
                .ok_or(ApplicationError::NoDocumentPath(
                    DocumentKind::Composition.as_str(),
                ))?,
        };
        self.save(&target, &session.composition)?;
        session.remember_path(DocumentKind::Composition, &target);
        Ok(())
    }
}
