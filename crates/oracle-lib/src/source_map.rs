//! Source storage for an analysis session.
//!
//! Every loaded schema (root files, imports, inline sources) is stored here once
//! and addressed by [`SourceId`]. Diagnostics carry the id so they can be
//! rendered against the right text later.

use oracle_core::SourceId;

/// Describes the origin of a source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// Source passed in directly, labeled by its namespace.
    Inline(String),
    /// A file, with its canonical path as reported by the loader.
    File(String),
}

impl SourceKind {
    /// Returns the display name for diagnostics.
    pub fn display_name(&self) -> &str {
        match self {
            SourceKind::Inline(namespace) => namespace,
            SourceKind::File(path) => path,
        }
    }
}

/// A borrowed view of a source: id, kind, namespace and content.
#[derive(Clone, Debug)]
pub struct Source<'s> {
    pub id: SourceId,
    pub kind: &'s SourceKind,
    pub namespace: &'s str,
    pub content: &'s str,
}

#[derive(Clone, Debug)]
struct SourceEntry {
    kind: SourceKind,
    namespace: String,
    content: String,
}

/// Registry of all sources seen by one analysis run.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_inline(&mut self, namespace: &str, content: &str) -> SourceId {
        self.push_entry(SourceKind::Inline(namespace.to_owned()), namespace, content)
    }

    pub fn add_file(&mut self, path: &str, namespace: &str, content: &str) -> SourceId {
        self.push_entry(SourceKind::File(path.to_owned()), namespace, content)
    }

    pub fn content(&self, id: SourceId) -> Option<&str> {
        self.entries.get(id.index()).map(|e| e.content.as_str())
    }

    pub fn kind(&self, id: SourceId) -> Option<&SourceKind> {
        self.entries.get(id.index()).map(|e| &e.kind)
    }

    pub fn namespace(&self, id: SourceId) -> Option<&str> {
        self.entries.get(id.index()).map(|e| e.namespace.as_str())
    }

    /// The file path if this source is a file.
    pub fn path(&self, id: SourceId) -> Option<&str> {
        match self.kind(id)? {
            SourceKind::File(path) => Some(path),
            SourceKind::Inline(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Option<Source<'_>> {
        self.entries.get(id.index()).map(|entry| view(id, entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| view(SourceId::new(idx as u32), entry))
    }

    fn push_entry(&mut self, kind: SourceKind, namespace: &str, content: &str) -> SourceId {
        let id = SourceId::new(self.entries.len() as u32);
        self.entries.push(SourceEntry {
            kind,
            namespace: namespace.to_owned(),
            content: content.to_owned(),
        });
        id
    }
}

fn view(id: SourceId, entry: &SourceEntry) -> Source<'_> {
    Source {
        id,
        kind: &entry.kind,
        namespace: &entry.namespace,
        content: &entry.content,
    }
}
