//! Leader transplant service

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{transplant, ClassStore, TransplantOutcome};
use crate::infrastructure::traits::{ClassReader, ClassWriter};

pub struct LeaderService {
    reader: Arc<dyn ClassReader>,
    writer: Arc<dyn ClassWriter>,
}

impl LeaderService {
    pub fn new(reader: Arc<dyn ClassReader>, writer: Arc<dyn ClassWriter>) -> Self {
        Self { reader, writer }
    }

    fn load(&self, path: &Path) -> ApplicationResult<ClassStore> {
        let entries = self
            .reader
            .read_classes(path)
            .with_path_context("read classes", path)?;
        Ok(ClassStore::from_entries(entries)?)
    }

    /// Copy leaders from `source` into `destination` and persist the result.
    ///
    /// The merged classes go to `output`, or back to `destination` when no
    /// output is given. Per-class warnings are logged and returned; they never
    /// abort the merge.
    #[instrument(level = "debug", skip(self))]
    pub fn transplant_files(
        &self,
        source: &Path,
        destination: &Path,
        output: Option<&Path>,
        force_add: bool,
    ) -> ApplicationResult<TransplantOutcome> {
        let source_classes = self.load(source)?;
        let destination_classes = self.load(destination)?;

        let outcome = transplant(&source_classes, destination_classes, force_add);
        for warning in &outcome.warnings {
            warn!("transplant: {}", warning);
        }

        let target = output.unwrap_or(destination);
        self.writer
            .write_classes(target, &outcome.destination.to_entries())
            .with_path_context("write classes", target)?;
        info!(
            "transplanted {} classes into {} ({} warnings)",
            source_classes.len().saturating_sub(outcome.warnings.len()),
            target.display(),
            outcome.warnings.len()
        );
        Ok(outcome)
    }
}
