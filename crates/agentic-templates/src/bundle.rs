//! Read-only in-memory filesystem over a captured directory tree.
//!
//! A [`Bundle`] is built once, either from an [`include_dir::Dir`] captured at
//! compile time or from in-memory `(path, bytes)` pairs, and is never mutated
//! afterwards. All lookups resolve against a sorted index, so directory listings
//! and walks are deterministic (lexicographic by name).
//!
//! ```ignore
//! let bundle = agentic_templates::bundle();
//! let guide = bundle.read_to_string("templates/web-frontend/CLAUDE.md")?;
//! for entry in bundle.read_dir("templates")? {
//!     println!("{} {}", if entry.is_dir { "d" } else { "-" }, entry.name);
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};

use include_dir::Dir;
use tracing::{debug, trace};

use crate::error::{Result, TemplatesError};
use crate::path;

#[derive(Debug, Clone)]
enum Node {
    /// Full paths of the immediate children, name-sorted.
    Dir { children: Vec<String> },
    File { contents: &'static [u8] },
}

impl Node {
    fn size(&self) -> u64 {
        match self {
            Node::Dir { .. } => 0,
            Node::File { contents } => contents.len() as u64,
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self, Node::Dir { .. })
    }
}

/// Basic metadata for a bundle entry. Directories report a size of 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}

/// One immediate child of a directory, as returned by [`Bundle::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    /// Full bundle path of the child.
    pub path: String,
    pub is_dir: bool,
}

/// Readable handle to a bundled file.
///
/// Reads are served from the embedded slice; dropping the handle releases nothing.
#[derive(Debug, Clone)]
pub struct FileHandle {
    path: String,
    cursor: Cursor<&'static [u8]>,
}

impl FileHandle {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        path::file_name(&self.path)
    }

    /// The whole file, independent of the read position.
    pub fn contents(&self) -> &'static [u8] {
        *self.cursor.get_ref()
    }

    pub fn contents_utf8(&self) -> Option<&'static str> {
        std::str::from_utf8(self.contents()).ok()
    }

    pub fn len(&self) -> u64 {
        self.contents().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.contents().is_empty()
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            name: self.name().to_string(),
            size: self.len(),
            is_dir: false,
        }
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl BufRead for FileHandle {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.cursor.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.cursor.consume(amt)
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

/// Handle to a bundled directory with its children already resolved.
#[derive(Debug, Clone)]
pub struct DirHandle {
    path: String,
    entries: Vec<DirEntry>,
}

impl DirHandle {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        path::file_name(&self.path)
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            name: self.name().to_string(),
            size: 0,
            is_dir: true,
        }
    }
}

/// Result of [`Bundle::get`]: either kind of handle.
#[derive(Debug, Clone)]
pub enum Entry {
    File(FileHandle),
    Dir(DirHandle),
}

impl Entry {
    pub fn path(&self) -> &str {
        match self {
            Entry::File(f) => f.path(),
            Entry::Dir(d) => d.path(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir(_))
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            Entry::File(f) => f.metadata(),
            Entry::Dir(d) => d.metadata(),
        }
    }
}

/// An entry produced by [`Walk`].
#[derive(Debug, Clone, Copy)]
pub struct WalkEntry<'a> {
    path: &'a str,
    depth: usize,
    node: &'a Node,
}

impl<'a> WalkEntry<'a> {
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn name(&self) -> &'a str {
        path::file_name(self.path)
    }

    /// Distance from the walk root (the root itself is depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_dir(&self) -> bool {
        self.node.is_dir()
    }

    pub fn is_file(&self) -> bool {
        !self.node.is_dir()
    }

    pub fn size(&self) -> u64 {
        self.node.size()
    }

    /// File bytes, or `None` for a directory.
    pub fn contents(&self) -> Option<&'static [u8]> {
        match self.node {
            Node::File { contents } => Some(*contents),
            Node::Dir { .. } => None,
        }
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            name: self.name().to_string(),
            size: self.size(),
            is_dir: self.is_dir(),
        }
    }
}

/// Lazy pre-order depth-first traversal. Children are visited in name order.
///
/// Each call to [`Bundle::walk`] starts a fresh traversal.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    bundle: &'a Bundle,
    stack: Vec<(&'a str, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (path, depth) = self.stack.pop()?;
        let node = self.bundle.nodes.get(path)?;
        if let Node::Dir { children } = node {
            self.stack
                .extend(children.iter().rev().map(|c| (c.as_str(), depth + 1)));
        }
        Some(WalkEntry { path, depth, node })
    }
}

impl std::iter::FusedIterator for Walk<'_> {}

/// Immutable mapping from bundle path to directory marker or file payload.
#[derive(Clone)]
pub struct Bundle {
    namespace: String,
    nodes: BTreeMap<String, Node>,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("namespace", &self.namespace)
            .field("entries", &self.nodes.len())
            .finish()
    }
}

impl Bundle {
    /// Index a compile-time captured directory under `namespace`.
    ///
    /// Every entry is included, whatever its name (`_shared`, `.cursorrules`, ...).
    pub fn from_dir(namespace: &str, dir: &'static Dir<'static>) -> Result<Self> {
        path::validate_namespace(namespace)?;
        let mut builder = Builder::new(namespace);
        capture(&mut builder, namespace, dir)?;
        Ok(builder.finish())
    }

    /// Build a bundle from `(relative path, bytes)` pairs.
    ///
    /// Paths are relative to the namespace root; intermediate directories are
    /// created implicitly.
    pub fn from_files<'p, I>(namespace: &str, files: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'p str, &'static [u8])>,
    {
        path::validate_namespace(namespace)?;
        let mut builder = Builder::new(namespace);
        for (relative, contents) in files {
            path::validate_relative(relative)?;
            builder.add_file(path::join(namespace, relative), contents)?;
        }
        Ok(builder.finish())
    }

    /// The fixed root segment every bundle path starts with.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn lookup<'a>(&'a self, path: &str) -> Result<(&'a str, &'a Node)> {
        path::validate(path, &self.namespace)?;
        match self.nodes.get_key_value(path) {
            Some((key, node)) => Ok((key.as_str(), node)),
            None => {
                trace!(%path, "bundle lookup miss");
                Err(TemplatesError::NotFound(path.to_string()))
            }
        }
    }

    fn dir_entries(&self, children: &[String]) -> Vec<DirEntry> {
        children
            .iter()
            .map(|child| DirEntry {
                name: path::file_name(child).to_string(),
                path: child.clone(),
                is_dir: self.nodes.get(child).is_some_and(Node::is_dir),
            })
            .collect()
    }

    /// Open a file for reading.
    pub fn open(&self, path: &str) -> Result<FileHandle> {
        match self.lookup(path)? {
            (key, Node::File { contents }) => Ok(FileHandle {
                path: key.to_string(),
                cursor: Cursor::new(*contents),
            }),
            (key, Node::Dir { .. }) => Err(TemplatesError::IsADirectory(key.to_string())),
        }
    }

    /// Resolve a path to a file or directory handle.
    pub fn get(&self, path: &str) -> Result<Entry> {
        match self.lookup(path)? {
            (key, Node::File { contents }) => Ok(Entry::File(FileHandle {
                path: key.to_string(),
                cursor: Cursor::new(*contents),
            })),
            (key, Node::Dir { children }) => Ok(Entry::Dir(DirHandle {
                path: key.to_string(),
                entries: self.dir_entries(children),
            })),
        }
    }

    /// Complete contents of a file.
    pub fn read_all(&self, path: &str) -> Result<&'static [u8]> {
        match self.lookup(path)? {
            (_, Node::File { contents }) => Ok(*contents),
            (key, Node::Dir { .. }) => Err(TemplatesError::IsADirectory(key.to_string())),
        }
    }

    /// Complete contents of a file as UTF-8 text.
    pub fn read_to_string(&self, path: &str) -> Result<&'static str> {
        let bytes = self.read_all(path)?;
        std::str::from_utf8(bytes).map_err(|_| TemplatesError::InvalidUtf8(path.to_string()))
    }

    /// Immediate children of a directory, sorted by name.
    pub fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        match self.lookup(path)? {
            (_, Node::Dir { children }) => Ok(self.dir_entries(children)),
            (key, Node::File { .. }) => Err(TemplatesError::NotADirectory(key.to_string())),
        }
    }

    pub fn stat(&self, path: &str) -> Result<Metadata> {
        let (key, node) = self.lookup(path)?;
        Ok(Metadata {
            name: path::file_name(key).to_string(),
            size: node.size(),
            is_dir: node.is_dir(),
        })
    }

    /// True when `path` is valid and names an entry.
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// Start a depth-first traversal at `root` (inclusive).
    pub fn walk(&self, root: &str) -> Result<Walk<'_>> {
        let (key, _) = self.lookup(root)?;
        Ok(Walk {
            bundle: self,
            stack: vec![(key, 0)],
        })
    }

    /// Visit every entry under `root` (inclusive) in walk order.
    pub fn walk_with<F>(&self, root: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&WalkEntry<'_>),
    {
        for entry in self.walk(root)? {
            visit(&entry);
        }
        Ok(())
    }

    /// Number of files (directories excluded).
    pub fn file_count(&self) -> usize {
        self.nodes.values().filter(|n| !n.is_dir()).count()
    }

    /// Sum of all file sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.nodes.values().map(Node::size).sum()
    }
}

/// Accumulates nodes and keeps parent directories in sync.
struct Builder {
    namespace: String,
    nodes: BTreeMap<String, Node>,
}

impl Builder {
    fn new(namespace: &str) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            namespace.to_string(),
            Node::Dir {
                children: Vec::new(),
            },
        );
        Self {
            namespace: namespace.to_string(),
            nodes,
        }
    }

    fn link_to_parent(&mut self, path: &str) -> Result<()> {
        let Some(parent) = path::parent(path) else {
            return Ok(());
        };
        self.add_dir(parent.to_string())?;
        if let Some(Node::Dir { children }) = self.nodes.get_mut(parent) {
            children.push(path.to_string());
        }
        Ok(())
    }

    fn add_dir(&mut self, path: String) -> Result<()> {
        match self.nodes.get(&path) {
            Some(Node::Dir { .. }) => return Ok(()),
            Some(Node::File { .. }) => return Err(TemplatesError::DuplicatePath(path)),
            None => {}
        }
        self.link_to_parent(&path)?;
        self.nodes.insert(
            path,
            Node::Dir {
                children: Vec::new(),
            },
        );
        Ok(())
    }

    fn add_file(&mut self, path: String, contents: &'static [u8]) -> Result<()> {
        if self.nodes.contains_key(&path) {
            return Err(TemplatesError::DuplicatePath(path));
        }
        self.link_to_parent(&path)?;
        self.nodes.insert(path, Node::File { contents });
        Ok(())
    }

    fn finish(mut self) -> Bundle {
        let mut files = 0usize;
        let mut bytes = 0u64;
        for node in self.nodes.values_mut() {
            match node {
                Node::Dir { children } => children.sort(),
                Node::File { contents } => {
                    files += 1;
                    bytes += contents.len() as u64;
                }
            }
        }
        debug!(
            namespace = %self.namespace,
            entries = self.nodes.len(),
            files,
            bytes,
            "bundle index built"
        );
        Bundle {
            namespace: self.namespace,
            nodes: self.nodes,
        }
    }
}

fn capture(builder: &mut Builder, prefix: &str, dir: &'static Dir<'static>) -> Result<()> {
    for entry in dir.entries() {
        let name = entry
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| TemplatesError::InvalidPath {
                path: entry.path().display().to_string(),
                reason: "non UTF-8 file name",
            })?;
        let bundle_path = path::join(prefix, name);

        match entry {
            include_dir::DirEntry::Dir(sub) => {
                builder.add_dir(bundle_path.clone())?;
                capture(builder, &bundle_path, sub)?;
            }
            include_dir::DirEntry::File(file) => {
                builder.add_file(bundle_path, file.contents())?;
            }
        }
    }
    Ok(())
}
