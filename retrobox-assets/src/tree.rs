//! Resource trie — the asset namespace built from one filesystem scan.
//!
//! Identifiers are `/`-separated relative paths with the file extension
//! stripped (`styles/classic/themes/default/frame/top_left`), so lookup
//! never touches the disk and never cares whether an asset shipped as
//! `.png` or `.xml`. Directories named `*.iconset` are recorded as
//! terminal resources and not descended into; their entries are indexed
//! separately by the asset manager.
//!
//! The scan sorts directory entries by name, so the trie (and every log
//! line derived from it) is identical across platforms and runs.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rustc_hash::FxHashMap;

const ICON_SET_SUFFIX: &str = ".iconset";

#[derive(Default)]
struct Node {
    children: FxHashMap<String, Node>,
    /// Backing file (or `.iconset` directory) if this node is terminal.
    resource: Option<PathBuf>,
}

/// Immutable after construction; shared freely across threads.
#[derive(Default)]
pub struct ResourceTree {
    root: Node,
    len: usize,
}

impl ResourceTree {
    /// Scan `root` recursively and index every file it contains.
    pub fn scan(root: &Path) -> io::Result<ResourceTree> {
        let start = Instant::now();
        let mut tree = ResourceTree::default();
        scan_dir(root, String::new(), &mut tree)?;
        log::info!(
            "indexed {} resources under {} ({:.1}ms)",
            tree.len,
            root.display(),
            start.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(tree)
    }

    /// Build a trie from explicit `(identifier, path)` pairs.
    pub fn from_entries<I>(entries: I) -> ResourceTree
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let mut tree = ResourceTree::default();
        for (id, path) in entries {
            tree.insert(&id, path);
        }
        tree
    }

    pub fn insert(&mut self, id: &str, path: PathBuf) {
        let mut node = &mut self.root;
        for seg in id.split('/').filter(|s| !s.is_empty()) {
            node = node.children.entry(seg.to_owned()).or_default();
        }
        if let Some(old) = node.resource.replace(path) {
            log::warn!("duplicate resource id {id} shadows {}", old.display());
        } else {
            self.len += 1;
        }
    }

    fn node(&self, segments: &[&str]) -> Option<&Node> {
        let mut node = &self.root;
        for seg in segments {
            node = node.children.get(*seg)?;
        }
        Some(node)
    }

    /// Backing path for the resource at `segments`, if any.
    pub fn get(&self, segments: &[&str]) -> Option<&Path> {
        self.node(segments)?.resource.as_deref()
    }

    /// Lookup by a joined `/`-separated identifier.
    pub fn get_id(&self, id: &str) -> Option<&Path> {
        let segments: Vec<&str> = id.split('/').filter(|s| !s.is_empty()).collect();
        self.get(&segments)
    }

    /// All terminal resources below `segments`, as `(relative id, path)`
    /// pairs sorted by id. Empty if the prefix does not exist.
    pub fn leaves_under(&self, segments: &[&str]) -> Vec<(String, &Path)> {
        let mut out = Vec::new();
        if let Some(node) = self.node(segments) {
            collect_leaves(node, String::new(), &mut out);
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn collect_leaves<'a>(node: &'a Node, prefix: String, out: &mut Vec<(String, &'a Path)>) {
    if let Some(path) = &node.resource {
        if !prefix.is_empty() {
            out.push((prefix.clone(), path.as_path()));
        }
    }
    for (name, child) in &node.children {
        let child_prefix = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        collect_leaves(child, child_prefix, out);
    }
}

fn scan_dir(dir: &Path, prefix: String, tree: &mut ResourceTree) -> io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            log::warn!("skipping non-UTF-8 entry under {}", dir.display());
            continue;
        };
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if let Some(stem) = name.strip_suffix(ICON_SET_SUFFIX) {
                // Terminal: the manager indexes the entries itself.
                tree.insert(&join_id(&prefix, stem), path);
            } else {
                scan_dir(&path, join_id(&prefix, name), tree)?;
            }
        } else if file_type.is_file() {
            let stem = name.rsplit_once('.').map_or(name, |(s, _)| s);
            if stem.is_empty() {
                continue; // dotfile
            }
            tree.insert(&join_id(&prefix, stem), path);
        }
    }
    Ok(())
}

fn join_id(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

// ===================================================================
// Tests
// ===================================================================
