//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    ClassService, CompositionService, KerningService, LeaderService,
};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::codec::{JsonClassCodec, JsonGroupReader, TextPairWriter};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub classes: ClassService,
    pub compositions: CompositionService,
    pub kerning: KerningService,
    pub leaders: LeaderService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> ApplicationResult<Self> {
        settings.validate()?;
        let mark = settings.class_mark()?;

        let class_codec = Arc::new(JsonClassCodec::new(fs.clone()));
        let groups = Arc::new(JsonGroupReader::new(fs.clone()));
        let pair_writer = Arc::new(TextPairWriter::new(fs.clone()));

        let classes = ClassService::new(class_codec.clone(), class_codec.clone(), groups);
        let compositions =
            CompositionService::new(fs.clone(), mark, settings.glyph_separator.clone());
        let kerning = KerningService::new(pair_writer, settings.pairs.clone());
        let leaders = LeaderService::new(class_codec.clone(), class_codec);

        Ok(Self {
            settings: Arc::new(settings),
            fs,
            classes,
            compositions,
            kerning,
            leaders,
        })
    }
}
