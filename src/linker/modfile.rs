//! Manifest adapter over `toml_edit`.
//!
//! `ModuleFile` and `WorkFile` map the rewritten manifests onto the engine's
//! entry model. Parsing and formatting are delegated entirely to `toml_edit`,
//! which round-trips unrecognized directives, formatting, and comments
//! verbatim; the engine only ever touches the `[override]` and `[use]`
//! tables. Both types are ephemeral: read, mutate in memory, write back.

use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, InlineTable, Item, Table, Value};

use crate::linker::error::LinkError;
use crate::linker::ownership::Ownership;

/// Per-package module manifest file name.
pub const MODULE_MANIFEST: &str = "Module.toml";

/// Workspace-level manifest file name.
pub const WORKSPACE_MANIFEST: &str = "Workspace.toml";

const MODULE_TABLE: &str = "module";
const OVERRIDE_TABLE: &str = "override";
const USE_TABLE: &str = "use";

/// A module path with an optional version.
///
/// Encoded in override keys as `path` or `path@version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    pub path: String,
    pub version: Option<String>,
}

impl ModuleRef {
    /// A versionless reference.
    pub fn new(path: impl Into<String>) -> Self {
        ModuleRef {
            path: path.into(),
            version: None,
        }
    }

    /// A versioned reference.
    pub fn with_version(path: impl Into<String>, version: impl Into<String>) -> Self {
        ModuleRef {
            path: path.into(),
            version: Some(version.into()),
        }
    }

    /// Decode from a TOML override key.
    pub fn parse_key(raw: &str) -> Self {
        match raw.split_once('@') {
            Some((path, version)) => ModuleRef::with_version(path, version),
            None => ModuleRef::new(raw),
        }
    }

    /// Encode as a TOML override key.
    pub fn as_key(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", self.path, version),
            None => self.path.clone(),
        }
    }
}

impl std::fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// One override directive: resolve `old` from `new` instead.
#[derive(Debug, Clone)]
pub struct OverrideEntry {
    pub old: ModuleRef,
    pub new: ModuleRef,
    pub ownership: Ownership,
}

/// One workspace membership directive.
#[derive(Debug, Clone)]
pub struct UseEntry {
    pub dir: String,
    pub ownership: Ownership,
}

fn parse_document(path: &Path, content: &str) -> Result<DocumentMut, LinkError> {
    content.parse().map_err(|source| LinkError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_document(path: &Path) -> Result<DocumentMut, LinkError> {
    let content = std::fs::read_to_string(path).map_err(|source| LinkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &content)
}

fn write_document(path: &Path, doc: &DocumentMut) -> Result<(), LinkError> {
    std::fs::write(path, doc.to_string()).map_err(|source| LinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The trailing annotation of an entry's value, if any.
fn value_annotation(item: &Item) -> Option<&str> {
    item.as_value()
        .and_then(|v| v.decor().suffix())
        .and_then(|raw| raw.as_str())
}

/// A per-package `Module.toml`, loaded fresh from disk per operation.
#[derive(Debug)]
pub struct ModuleFile {
    path: PathBuf,
    doc: DocumentMut,
}

impl ModuleFile {
    /// Read and parse a module manifest.
    pub fn read(path: &Path) -> Result<Self, LinkError> {
        Ok(ModuleFile {
            path: path.to_path_buf(),
            doc: read_document(path)?,
        })
    }

    /// Parse module manifest content.
    pub fn parse(path: &Path, content: &str) -> Result<Self, LinkError> {
        Ok(ModuleFile {
            path: path.to_path_buf(),
            doc: parse_document(path, content)?,
        })
    }

    /// The manifest file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory containing the manifest; override target paths are
    /// relative to it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// The module identity declared in `[module]`.
    pub fn module_name(&self) -> Result<&str, LinkError> {
        self.doc
            .get(MODULE_TABLE)
            .and_then(Item::as_table_like)
            .and_then(|t| t.get("name"))
            .and_then(Item::as_str)
            .ok_or_else(|| LinkError::Invalid {
                path: self.path.clone(),
                reason: "missing `name` in [module]".to_string(),
            })
    }

    /// All override entries, classified.
    pub fn overrides(&self) -> Result<Vec<OverrideEntry>, LinkError> {
        let Some(item) = self.doc.get(OVERRIDE_TABLE) else {
            return Ok(Vec::new());
        };
        let table = item.as_table().ok_or_else(|| LinkError::Invalid {
            path: self.path.clone(),
            reason: "[override] is not a table".to_string(),
        })?;

        let mut entries = Vec::new();
        for (key, item) in table.iter() {
            let new = item.as_value().and_then(target_from_value).ok_or_else(|| {
                LinkError::Invalid {
                    path: self.path.clone(),
                    reason: format!("override `{}` has no target path", key),
                }
            })?;
            entries.push(OverrideEntry {
                old: ModuleRef::parse_key(key),
                new,
                ownership: Ownership::classify(value_annotation(item)),
            });
        }
        Ok(entries)
    }

    /// Remove the override with the given key, if present.
    pub fn drop_override(&mut self, old: &ModuleRef) {
        if let Some(table) = self.doc.get_mut(OVERRIDE_TABLE).and_then(Item::as_table_mut) {
            table.remove(&old.as_key());
        }
    }

    /// Insert an override entry, replacing any entry with the same key.
    /// Conflict policy is the caller's business.
    pub fn add_override(&mut self, entry: &OverrideEntry) {
        if self.doc.get(OVERRIDE_TABLE).and_then(Item::as_table).is_none() {
            self.doc[OVERRIDE_TABLE] = Item::Table(Table::new());
        }

        let mut target = InlineTable::new();
        target.insert("path", entry.new.path.clone().into());
        if let Some(version) = &entry.new.version {
            target.insert("version", version.clone().into());
        }

        let mut value: Value = target.into();
        if let Some(annotation) = entry.ownership.annotation() {
            value.decor_mut().set_suffix(format!(" {}", annotation));
        }

        let key = entry.old.as_key();
        let table = self.doc[OVERRIDE_TABLE].as_table_mut().unwrap();
        table.remove(&key);
        table.insert(&key, Item::Value(value));
    }

    /// Drop the `[override]` table entirely once it has no entries left.
    pub fn cleanup(&mut self) {
        if let Some(table) = self.doc.get(OVERRIDE_TABLE).and_then(Item::as_table) {
            if table.is_empty() {
                self.doc.remove(OVERRIDE_TABLE);
            }
        }
    }

    /// Serialize the document.
    pub fn render(&self) -> String {
        self.doc.to_string()
    }

    /// Write the document back to disk.
    pub fn write(&self) -> Result<(), LinkError> {
        write_document(&self.path, &self.doc)
    }
}

fn target_from_value(value: &Value) -> Option<ModuleRef> {
    match value {
        // Shorthand form: `"old" = "../new"`
        Value::String(s) => Some(ModuleRef::new(s.value().clone())),
        Value::InlineTable(t) => {
            let path = t.get("path")?.as_str()?.to_string();
            let version = t.get("version").and_then(Value::as_str).map(str::to_string);
            Some(ModuleRef { path, version })
        }
        _ => None,
    }
}

/// The workspace-level `Workspace.toml`.
#[derive(Debug)]
pub struct WorkFile {
    path: PathBuf,
    doc: DocumentMut,
}

impl WorkFile {
    /// Read and parse the workspace manifest.
    pub fn read(path: &Path) -> Result<Self, LinkError> {
        Ok(WorkFile {
            path: path.to_path_buf(),
            doc: read_document(path)?,
        })
    }

    /// Parse workspace manifest content.
    pub fn parse(path: &Path, content: &str) -> Result<Self, LinkError> {
        Ok(WorkFile {
            path: path.to_path_buf(),
            doc: parse_document(path, content)?,
        })
    }

    /// The manifest file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All membership entries, classified.
    pub fn use_entries(&self) -> Result<Vec<UseEntry>, LinkError> {
        let Some(item) = self.doc.get(USE_TABLE) else {
            return Ok(Vec::new());
        };
        let table = item.as_table().ok_or_else(|| LinkError::Invalid {
            path: self.path.clone(),
            reason: "[use] is not a table".to_string(),
        })?;

        Ok(table
            .iter()
            .map(|(key, item)| UseEntry {
                dir: key.to_string(),
                ownership: Ownership::classify(value_annotation(item)),
            })
            .collect())
    }

    /// Remove the membership entry for a directory, if present.
    pub fn drop_use(&mut self, dir: &str) {
        if let Some(table) = self.doc.get_mut(USE_TABLE).and_then(Item::as_table_mut) {
            table.remove(dir);
        }
    }

    /// Insert a membership entry, replacing any entry for the same directory.
    pub fn add_use(&mut self, dir: &str, ownership: &Ownership) {
        if self.doc.get(USE_TABLE).and_then(Item::as_table).is_none() {
            self.doc[USE_TABLE] = Item::Table(Table::new());
        }

        let mut value = Value::from(true);
        if let Some(annotation) = ownership.annotation() {
            value.decor_mut().set_suffix(format!(" {}", annotation));
        }

        let table = self.doc[USE_TABLE].as_table_mut().unwrap();
        table.remove(dir);
        table.insert(dir, Item::Value(value));
    }

    /// Drop the `[use]` table entirely once it has no entries left.
    pub fn cleanup(&mut self) {
        if let Some(table) = self.doc.get(USE_TABLE).and_then(Item::as_table) {
            if table.is_empty() {
                self.doc.remove(USE_TABLE);
            }
        }
    }

    /// Serialize the document.
    pub fn render(&self) -> String {
        self.doc.to_string()
    }

    /// Write the document back to disk.
    pub fn write(&self) -> Result<(), LinkError> {
        write_document(&self.path, &self.doc)
    }
}
