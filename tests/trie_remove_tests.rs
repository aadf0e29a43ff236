use std::fs;

use duptree::core::{NodeId, PathTrie};
use duptree::error::Error;
use tempfile::TempDir;

fn touch(path: &std::path::Path) {
    fs::write(path, "x").unwrap();
}

fn label_of(trie: &PathTrie, id: NodeId) -> Vec<String> {
    trie.node(id).unwrap().label.clone()
}

fn only_dir_child(trie: &PathTrie, id: NodeId) -> NodeId {
    let children = trie.node(id).unwrap().dir_children();
    assert_eq!(children.len(), 1, "expected exactly one directory child");
    children[0]
}

#[test]
fn removing_a_branch_collapses_the_split_back() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("A/B/C")).unwrap();
    fs::create_dir_all(root.join("A/B/D")).unwrap();
    touch(&root.join("A/B/C/f1.txt"));
    touch(&root.join("A/B/D/f2.txt"));

    let mut trie = PathTrie::new();
    let c = trie.insert(&root.join("A/B/C")).unwrap();
    let d = trie.insert(&root.join("A/B/D")).unwrap();

    trie.remove(c).unwrap();

    // The split is undone: a single compressed node ".../A/B/D" remains.
    let merged = only_dir_child(&trie, trie.root());
    let label = label_of(&trie, merged);
    assert!(label.ends_with(&["A".to_string(), "B".to_string(), "D".to_string()]));
    assert_eq!(trie.node(merged).unwrap().file_children().len(), 1);

    // Both halves of the collapsed pair are gone for good.
    assert!(trie.node(c).is_none());
    assert!(trie.node(d).is_none());
}

#[test]
fn removing_the_last_file_child_also_collapses() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("top/sub")).unwrap();
    touch(&root.join("top/loose.txt"));
    touch(&root.join("top/sub/kept.txt"));

    let mut trie = PathTrie::new();
    let top = trie.insert(&root.join("top")).unwrap();
    trie.insert(&root.join("top/sub")).unwrap();

    let file = trie.node(top).unwrap().file_children()[0];
    trie.remove(file).unwrap();

    // "top" ends up with one directory child and no files: merged away.
    let merged = only_dir_child(&trie, trie.root());
    assert!(
        label_of(&trie, merged).ends_with(&["top".to_string(), "sub".to_string()]),
        "expected top+sub to merge, got {:?}",
        label_of(&trie, merged)
    );
    assert!(trie.node(top).is_none());
}

#[test]
fn collapse_is_applied_at_most_once() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("M/A/B/C")).unwrap();
    fs::create_dir_all(root.join("M/A/B/D")).unwrap();
    fs::create_dir_all(root.join("M/Z")).unwrap();
    touch(&root.join("M/A/B/C/c.txt"));
    touch(&root.join("M/A/B/D/d.txt"));
    touch(&root.join("M/Z/z.txt"));

    let mut trie = PathTrie::new();
    let c = trie.insert(&root.join("M/A/B/C")).unwrap();
    trie.insert(&root.join("M/A/B/D")).unwrap();
    trie.insert(&root.join("M/Z")).unwrap();

    let m = only_dir_child(&trie, trie.root());
    assert_eq!(trie.node(m).unwrap().dir_children().len(), 2);

    trie.remove(c).unwrap();

    // ".../A/B" merged with "D"; the grandparent keeps its two children and
    // its own label untouched.
    let m_after = only_dir_child(&trie, trie.root());
    assert_eq!(m_after, m);
    let children = trie.node(m).unwrap().dir_children().to_vec();
    assert_eq!(children.len(), 2);
    assert_eq!(
        label_of(&trie, children[0]),
        vec!["A".to_string(), "B".to_string(), "D".to_string()]
    );
    assert_eq!(label_of(&trie, children[1]), vec!["Z".to_string()]);
}

#[test]
fn the_root_cannot_be_removed() {
    let mut trie = PathTrie::new();
    let err = trie.remove(trie.root()).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn stale_handles_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("gone")).unwrap();
    touch(&root.join("gone/f.txt"));

    let mut trie = PathTrie::new();
    let id = trie.insert(&root.join("gone")).unwrap();
    trie.remove(id).unwrap();

    assert!(matches!(trie.remove(id), Err(Error::NotFound(_))));
    assert!(matches!(trie.full_path(id), Err(Error::NotFound(_))));
    assert!(trie.node(id).is_none());
}

#[test]
fn removal_drops_the_whole_subtree() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("t/a")).unwrap();
    fs::create_dir_all(root.join("t/b")).unwrap();
    touch(&root.join("t/top.txt"));
    touch(&root.join("t/a/a.txt"));
    touch(&root.join("t/b/b.txt"));

    let mut trie = PathTrie::new();
    let top = trie.insert(&root.join("t")).unwrap();
    let a = trie.insert(&root.join("t/a")).unwrap();
    let b = trie.insert(&root.join("t/b")).unwrap();

    trie.remove(top).unwrap();
    assert!(trie.node(a).is_none());
    assert!(trie.node(b).is_none());
    assert_eq!(trie.flatten().count(), 0);
    assert!(trie.is_empty());
}
