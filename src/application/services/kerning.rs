//! Kerning pair service
//!
//! Turns a composition plus its classes into a pair table.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::{ApplicationResult, DocumentKind, EditSession, IoResultExt};
use crate::config::PairSettings;
use crate::domain::{dedup_pairs, generate, sort_pairs, ClassStore, KernPair, PairComposition};
use crate::infrastructure::traits::PairWriter;

pub struct KerningService {
    writer: Arc<dyn PairWriter>,
    settings: PairSettings,
}

impl KerningService {
    pub fn new(writer: Arc<dyn PairWriter>, settings: PairSettings) -> Self {
        Self { writer, settings }
    }

    pub fn settings(&self) -> &PairSettings {
        &self.settings
    }

    /// Same writer, different pair settings (per-invocation overrides).
    pub fn with_settings(&self, settings: PairSettings) -> Self {
        Self {
            writer: self.writer.clone(),
            settings,
        }
    }

    /// Resolve, generate, then apply the dedup and sort settings.
    #[instrument(level = "debug", skip_all)]
    pub fn build(
        &self,
        composition: &PairComposition,
        classes: &ClassStore,
    ) -> ApplicationResult<Vec<KernPair>> {
        let groups = composition.resolve(classes, self.settings.expand_classes)?;
        let mut pairs = generate(&groups);
        if self.settings.dedup {
            pairs = dedup_pairs(pairs);
        }
        if self.settings.sort {
            sort_pairs(&mut pairs);
        }
        Ok(pairs)
    }

    /// Build pairs and write them to `path`. Returns the number written.
    #[instrument(level = "debug", skip(self, composition, classes))]
    pub fn export(
        &self,
        path: &Path,
        composition: &PairComposition,
        classes: &ClassStore,
    ) -> ApplicationResult<usize> {
        let pairs = self.build(composition, classes)?;
        let rows: Vec<(String, String)> = pairs
            .into_iter()
            .map(|pair| (pair.first.into(), pair.second.into()))
            .collect();
        self.writer
            .write_pairs(path, &rows, self.settings.header_text())
            .with_path_context("write pairs", path)?;
        info!("wrote {} pairs to {}", rows.len(), path.display());
        Ok(rows.len())
    }

    /// Export the session's composition and classes, remembering the path.
    pub fn export_session(
        &self,
        session: &mut EditSession,
        path: &Path,
    ) -> ApplicationResult<usize> {
        let written = self.export(path, &session.composition, &session.classes)?;
        session.remember_path(DocumentKind::Pairs, path);
        Ok(written)
    }
}
