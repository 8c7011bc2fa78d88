//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;

/// `(class name, member glyphs)` as exchanged with class readers and writers.
pub type ClassEntry = (String, Vec<String>);

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.exists(parent) => {
                self.create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

/// Source of class definitions. Order must be preserved.
pub trait ClassReader: Send + Sync {
    fn read_classes(&self, path: &Path) -> io::Result<Vec<ClassEntry>>;
}

/// Sink for class definitions, written in the given order.
pub trait ClassWriter: Send + Sync {
    fn write_classes(&self, path: &Path, classes: &[ClassEntry]) -> io::Result<()>;
}

/// Source of named member lists from design-project metadata.
pub trait GroupReader: Send + Sync {
    fn read_groups(&self, path: &Path) -> io::Result<Vec<ClassEntry>>;
}

/// Sink for kerning pairs, written in the given order.
pub trait PairWriter: Send + Sync {
    fn write_pairs(
        &self,
        path: &Path,
        pairs: &[(String, String)],
        header: Option<&str>,
    ) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
