use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::FileEntry;
use crate::core::affix::common_affix;
use crate::core::cluster::file_stem;
use crate::core::fs::{dirs_with_files, normalize_path, path_components, read_file_names};
use crate::error::{Error, Result};

/// Opaque handle to a trie node. Ids are never reused, so a handle kept
/// across a removal simply stops resolving instead of aliasing a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

/// One node of the path-compressed trie.
///
/// `label` is the compressed edge from the logical parent: one or more path
/// components for a directory, exactly the file name for a file. The root is
/// the only node with an empty label.
#[derive(Debug, Clone)]
pub struct Node {
    pub label: Vec<String>,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    dir_children: Vec<NodeId>,
    file_children: Vec<NodeId>,
}

impl Node {
    fn new(label: Vec<String>, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            label,
            kind,
            parent,
            dir_children: Vec::new(),
            file_children: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Directory children, sorted case-insensitively by the first component
    /// of each child's label; case-variant collisions keep insertion order.
    #[must_use]
    pub fn dir_children(&self) -> &[NodeId] {
        &self.dir_children
    }

    /// File children, sorted case-insensitively by `(stem, name)`.
    #[must_use]
    pub fn file_children(&self) -> &[NodeId] {
        &self.file_children
    }
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Case-folded comparison without materializing the folded strings.
fn fold_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn file_sort_key(name: &str) -> (String, String) {
    (fold(file_stem(name)), fold(name))
}

/// Result of looking a path component up among a node's directory children.
enum ChildLookup {
    /// An existing child whose first label component matches exactly.
    Found(NodeId),
    /// No exact match; a new child belongs at this position (the end of the
    /// case-folded equal range, so case collisions stay in insertion order).
    Missing(usize),
}

/// Path-compressed trie over ingested directories and their files.
///
/// Directory labels hold maximal branch-free runs of components: inserting a
/// diverging path splits the node at the divergence index, and removing the
/// last branch collapses the parent with its sole surviving child.
#[derive(Debug, Clone)]
pub struct PathTrie {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for PathTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTrie {
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(Vec::new(), NodeKind::Directory, None));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Resolve a caller-supplied handle; stale handles are a `NotFound`.
    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("node handle {}", id.0)))
    }

    /// Resolve an id the trie itself recorded; a miss here means the arena
    /// and the child lists disagree.
    fn arena(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or_else(|| {
            log::warn!("child list refers to missing node {}", id.0);
            Error::InvariantViolation(format!("child list refers to missing node {}", id.0))
        })
    }

    fn arena_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or_else(|| {
            log::warn!("child list refers to missing node {}", id.0);
            Error::InvariantViolation(format!("child list refers to missing node {}", id.0))
        })
    }

    fn alloc(&mut self, label: Vec<String>, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(label, kind, Some(parent)));
        id
    }

    /// Full path of a node: ancestor labels joined root-to-node.
    pub fn full_path(&self, id: NodeId) -> Result<PathBuf> {
        self.get(id)?;
        let mut labels: Vec<&Vec<String>> = Vec::new();
        let mut cur = Some(id);
        while let Some(nid) = cur {
            let node = self.arena(nid)?;
            labels.push(&node.label);
            cur = node.parent;
        }
        labels.reverse();
        let mut path = PathBuf::new();
        for label in labels {
            for comp in label {
                path.push(comp);
            }
        }
        Ok(path)
    }

    /* ================================ Insert ================================ */

    /// Ingest one directory: locate or create its node (splitting compressed
    /// labels on divergence) and synchronize its file children with the
    /// directory reader's listing. Returns the directory's node.
    ///
    /// The directory must exist and contain at least one direct regular
    /// file; re-running the call only picks up newly appeared files.
    pub fn insert(&mut self, dir: &Path) -> Result<NodeId> {
        let normalized = normalize_path(dir);
        let comps = path_components(&normalized);
        if comps.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "'{}' does not name a folder",
                dir.display()
            )));
        }

        // Preconditions and the file listing, before any tree mutation.
        let files = read_file_names(&normalized)?;

        let mut cur = self.root;
        let mut depth = 0usize;
        let target = loop {
            match self.find_dir_child(cur, &comps[depth])? {
                ChildLookup::Missing(pos) => {
                    // No child starts with this component: the whole rest of
                    // the path becomes one compressed node.
                    let id = self.alloc(comps[depth..].to_vec(), NodeKind::Directory, cur);
                    self.arena_mut(cur)?.dir_children.insert(pos, id);
                    break id;
                }
                ChildLookup::Found(child) => {
                    let label = self.arena(child)?.label.clone();
                    let rest = &comps[depth..];
                    let matched = common_affix(&[rest, label.as_slice()], false)?;
                    if matched == label.len() && depth + matched == comps.len() {
                        // Fully represented already.
                        break child;
                    } else if matched == label.len() {
                        // The child's label is a proper prefix of the path.
                        cur = child;
                        depth += matched;
                    } else {
                        // Divergence inside the compressed label.
                        let remainder = comps[depth + matched..].to_vec();
                        break self.split_child(cur, child, matched, remainder)?;
                    }
                }
            }
        };

        self.sync_files(target, &files)?;
        log::debug!("ingested {}", normalized.display());
        Ok(target)
    }

    /// Ingest a directory and every subdirectory that has at least one
    /// direct regular file. Fileless subdirectories are skipped; the top
    /// directory itself must qualify. Returns the inserted nodes, top first.
    pub fn insert_with_subfolders(&mut self, dir: &Path) -> Result<Vec<NodeId>> {
        let top = normalize_path(dir);
        let mut ids = vec![self.insert(&top)?];
        for sub in dirs_with_files(&top)? {
            if sub == top {
                continue;
            }
            ids.push(self.insert(&sub)?);
        }
        Ok(ids)
    }

    /// First label component of a directory child recorded in a child list.
    fn first_component(&self, cid: NodeId) -> Result<&str> {
        let child = self.arena(cid)?;
        child.label.first().map(String::as_str).ok_or_else(|| {
            log::warn!("directory node {} has an empty label", cid.0);
            Error::InvariantViolation(format!("directory node {} has an empty label", cid.0))
        })
    }

    /// Find `comp` among the directory children of `parent`.
    ///
    /// Ordering is case-folded; descending requires an exact component
    /// match, so `Data` and `DATA` remain distinct adjacent siblings.
    /// Binary search over the sorted child list, comparing in place.
    fn find_dir_child(&self, parent: NodeId, comp: &str) -> Result<ChildLookup> {
        let node = self.arena(parent)?;
        let children = &node.dir_children;

        // Hand-rolled partition point: the comparison can fail, which the
        // slice method's closure cannot report.
        let mut lo = 0usize;
        let mut hi = children.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if fold_cmp(self.first_component(children[mid])?, comp) == Ordering::Less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        // Scan the folded-equal range for an exact match; a miss lands at
        // its end, so case collisions stay in insertion order.
        let mut idx = lo;
        while idx < children.len() {
            let first = self.first_component(children[idx])?;
            if fold_cmp(first, comp) != Ordering::Equal {
                break;
            }
            if first == comp {
                return Ok(ChildLookup::Found(children[idx]));
            }
            idx += 1;
        }
        Ok(ChildLookup::Missing(idx))
    }

    /// Split the compressed label of `child` at index `at`: a new node takes
    /// the shared prefix and the child keeps the suffix. With a non-empty
    /// `remainder` a second suffix sibling is created for the inserted path
    /// and becomes the target; otherwise the prefix node is the target.
    fn split_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        at: usize,
        remainder: Vec<String>,
    ) -> Result<NodeId> {
        let (prefix_label, suffix_label) = {
            let c = self.arena(child)?;
            (c.label[..at].to_vec(), c.label[at..].to_vec())
        };
        let pos = self
            .arena(parent)?
            .dir_children
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| {
                log::warn!("node {} is not a child of its parent {}", child.0, parent.0);
                Error::InvariantViolation(format!(
                    "node {} is not a child of its parent {}",
                    child.0, parent.0
                ))
            })?;

        // All lookups succeeded; mutations start here.
        let prefix = self.alloc(prefix_label, NodeKind::Directory, parent);
        self.arena_mut(parent)?.dir_children[pos] = prefix;
        {
            let c = self.arena_mut(child)?;
            c.label = suffix_label.clone();
            c.parent = Some(prefix);
        }

        if remainder.is_empty() {
            self.arena_mut(prefix)?.dir_children.push(child);
            return Ok(prefix);
        }

        let sibling = self.alloc(remainder.clone(), NodeKind::Directory, prefix);
        // Order the two suffix children; the pre-existing child wins ties.
        let pair = if fold_cmp(&remainder[0], &suffix_label[0]) == Ordering::Less {
            vec![sibling, child]
        } else {
            vec![child, sibling]
        };
        self.arena_mut(prefix)?.dir_children = pair;
        Ok(sibling)
    }

    /// Merge the reader's file listing into `target`'s file children.
    /// Present names (by case-folded `(stem, name)` key) are left alone;
    /// nothing is ever removed here.
    fn sync_files(&mut self, target: NodeId, names: &[String]) -> Result<()> {
        let mut keys: Vec<(String, String)> = Vec::new();
        for &fid in &self.arena(target)?.file_children {
            let f = self.arena(fid)?;
            let name = f.label.first().ok_or_else(|| {
                log::warn!("file node {} has an empty label", fid.0);
                Error::InvariantViolation(format!("file node {} has an empty label", fid.0))
            })?;
            keys.push(file_sort_key(name));
        }

        for name in names {
            let key = file_sort_key(name);
            match keys.binary_search(&key) {
                Ok(_) => {}
                Err(pos) => {
                    let id = self.alloc(vec![name.clone()], NodeKind::File, target);
                    self.arena_mut(target)?.file_children.insert(pos, id);
                    keys.insert(pos, key);
                }
            }
        }
        Ok(())
    }

    /* ================================ Remove ================================ */

    /// Detach `id` and its whole subtree. If the parent is then a non-root
    /// directory with exactly one directory child left and no files, parent
    /// and child are merged into a single node carrying the joined label.
    /// The merge is applied once; it does not cascade further up.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvalidArgument(
                "the root node cannot be removed".into(),
            ));
        }
        let node = self.get(id)?;
        let is_dir = node.is_dir();
        let parent = node.parent.ok_or_else(|| {
            Error::InvariantViolation(format!("non-root node {} has no parent", id.0))
        })?;

        let pos = {
            let p = self.arena(parent)?;
            let list = if is_dir {
                &p.dir_children
            } else {
                &p.file_children
            };
            list.iter().position(|&c| c == id).ok_or_else(|| {
                log::warn!("node {} is not a child of its parent {}", id.0, parent.0);
                Error::InvariantViolation(format!(
                    "node {} is not a child of its parent {}",
                    id.0, parent.0
                ))
            })?
        };

        {
            let p = self.arena_mut(parent)?;
            if is_dir {
                p.dir_children.remove(pos);
            } else {
                p.file_children.remove(pos);
            }
        }
        self.drop_subtree(id);

        self.try_collapse(parent)
    }

    /// Fold `parent` into its sole remaining directory child, if eligible.
    fn try_collapse(&mut self, parent: NodeId) -> Result<()> {
        if parent == self.root {
            return Ok(());
        }
        let (only_child, grand) = {
            let p = self.arena(parent)?;
            if !(p.file_children.is_empty() && p.dir_children.len() == 1) {
                return Ok(());
            }
            let grand = p.parent.ok_or_else(|| {
                Error::InvariantViolation(format!("non-root node {} has no parent", parent.0))
            })?;
            (p.dir_children[0], grand)
        };

        let merged_label: Vec<String> = {
            let p = self.arena(parent)?;
            let c = self.arena(only_child)?;
            p.label.iter().chain(c.label.iter()).cloned().collect()
        };
        let pos = self
            .arena(grand)?
            .dir_children
            .iter()
            .position(|&c| c == parent)
            .ok_or_else(|| {
                log::warn!("node {} is not a child of its parent {}", parent.0, grand.0);
                Error::InvariantViolation(format!(
                    "node {} is not a child of its parent {}",
                    parent.0, grand.0
                ))
            })?;

        // The merged label starts with the parent's first component, so the
        // parent's slot in the grandparent keeps its sort position.
        let merged = self.alloc(merged_label, NodeKind::Directory, grand);
        let (dirs, files) = {
            let c = self.arena(only_child)?;
            (c.dir_children.clone(), c.file_children.clone())
        };
        for &cid in dirs.iter().chain(files.iter()) {
            self.arena_mut(cid)?.parent = Some(merged);
        }
        {
            let m = self.arena_mut(merged)?;
            m.dir_children = dirs;
            m.file_children = files;
        }
        self.arena_mut(grand)?.dir_children[pos] = merged;
        self.nodes.remove(&parent);
        self.nodes.remove(&only_child);
        Ok(())
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(nid) = stack.pop() {
            if let Some(node) = self.nodes.remove(&nid) {
                stack.extend(node.dir_children);
                stack.extend(node.file_children);
            }
        }
    }

    /* ================================ Flatten =============================== */

    /// Lazy depth-first traversal yielding every file with the full path of
    /// its containing directory. Files of one directory come out
    /// contiguously and in sorted order, before any subdirectory's files.
    #[must_use]
    pub fn flatten(&self) -> Flatten<'_> {
        Flatten {
            trie: self,
            stack: vec![Frame {
                node: self.root,
                dir: PathBuf::new(),
                next_file: 0,
                next_dir: 0,
            }],
        }
    }
}

struct Frame {
    node: NodeId,
    dir: PathBuf,
    next_file: usize,
    next_dir: usize,
}

/// See [`PathTrie::flatten`]. The trie must not be mutated while this
/// iterator is alive (the borrow checker enforces as much).
pub struct Flatten<'a> {
    trie: &'a PathTrie,
    stack: Vec<Frame>,
}

impl Iterator for Flatten<'_> {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        let trie = self.trie;
        loop {
            let frame = self.stack.last_mut()?;
            let Some(node) = trie.nodes.get(&frame.node) else {
                self.stack.pop();
                continue;
            };

            if frame.next_file < node.file_children.len() {
                let fid = node.file_children[frame.next_file];
                frame.next_file += 1;
                if let Some(name) = trie.nodes.get(&fid).and_then(|f| f.label.first()) {
                    return Some(FileEntry::new(name.clone(), frame.dir.clone()));
                }
                continue;
            }

            if frame.next_dir < node.dir_children.len() {
                let did = node.dir_children[frame.next_dir];
                frame.next_dir += 1;
                if let Some(child) = trie.nodes.get(&did) {
                    let mut dir = frame.dir.clone();
                    for comp in &child.label {
                        dir.push(comp);
                    }
                    self.stack.push(Frame {
                        node: did,
                        dir,
                        next_file: 0,
                        next_dir: 0,
                    });
                }
                continue;
            }

            self.stack.pop();
        }
    }
}
