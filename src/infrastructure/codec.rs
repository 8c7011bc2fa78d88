//! Interchange formats for classes, project groups and pair tables
//!
//! Classes: JSON array of `{"name": ..., "members": [...]}` in class order.
//! Groups: JSON object of group name to member list (groups.plist layout);
//! groups are read in name order.
//! Pairs: plain text, `# ` header lines followed by one `first second` per line.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::infrastructure::traits::{
    ClassEntry, ClassReader, ClassWriter, FileSystem, GroupReader, PairWriter,
};

#[derive(Debug, Serialize, Deserialize)]
struct ClassRecord {
    name: String,
    members: Vec<String>,
}

/// Any parse failure, truncation included, is a malformed document.
fn malformed(e: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

pub struct JsonClassCodec {
    fs: Arc<dyn FileSystem>,
}

impl JsonClassCodec {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl ClassReader for JsonClassCodec {
    fn read_classes(&self, path: &Path) -> io::Result<Vec<ClassEntry>> {
        let content = self.fs.read_to_string(path)?;
        let records: Vec<ClassRecord> = serde_json::from_str(&content).map_err(malformed)?;
        debug!("read {} classes from {}", records.len(), path.display());
        Ok(records.into_iter().map(|r| (r.name, r.members)).collect())
    }
}

impl ClassWriter for JsonClassCodec {
    fn write_classes(&self, path: &Path, classes: &[ClassEntry]) -> io::Result<()> {
        let records: Vec<ClassRecord> = classes
            .iter()
            .map(|(name, members)| ClassRecord {
                name: name.clone(),
                members: members.clone(),
            })
            .collect();
        let content = serde_json::to_string_pretty(&records).map_err(io::Error::from)?;
        self.fs.ensure_parent(path)?;
        self.fs.write(path, &content)
    }
}

pub struct JsonGroupReader {
    fs: Arc<dyn FileSystem>,
}

impl JsonGroupReader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl GroupReader for JsonGroupReader {
    fn read_groups(&self, path: &Path) -> io::Result<Vec<ClassEntry>> {
        let content = self.fs.read_to_string(path)?;
        let groups: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&content).map_err(malformed)?;
        Ok(groups.into_iter().collect())
    }
}

pub struct TextPairWriter {
    fs: Arc<dyn FileSystem>,
}

impl TextPairWriter {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn render(pairs: &[(String, String)], header: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(header) = header {
            for line in header.lines() {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        for (first, second) in pairs {
            out.push_str(first);
            out.push(' ');
            out.push_str(second);
            out.push('\n');
        }
        out
    }
}

impl PairWriter for TextPairWriter {
    fn write_pairs(
        &self,
        path: &Path,
        pairs: &[(String, String)],
        header: Option<&str>,
    ) -> io::Result<()> {
        self.fs.ensure_parent(path)?;
        self.fs.write(path, &Self::render(pairs, header))
    }
}
