use std::fs;

use duptree::core::{FileEntry, PathTrie};
use tempfile::TempDir;

fn touch(path: &std::path::Path) {
    fs::write(path, "x").unwrap();
}

#[test]
fn files_come_out_sorted_by_stem_then_name() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("d")).unwrap();
    for name in ["b.txt", "A.txt", "a (1).txt", "summary.txt", "report (1).txt", "report.txt"] {
        touch(&root.join("d").join(name));
    }

    let mut trie = PathTrie::new();
    trie.insert(&root.join("d")).unwrap();

    let names: Vec<String> = trie.flatten().map(|e| e.name).collect();
    assert_eq!(
        names,
        vec![
            "A.txt",
            "a (1).txt",
            "b.txt",
            "report.txt",
            "report (1).txt",
            "summary.txt"
        ]
    );
}

#[test]
fn each_directory_is_emitted_contiguously_files_first() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("top/inner")).unwrap();
    touch(&root.join("top/t1.txt"));
    touch(&root.join("top/t2.txt"));
    touch(&root.join("top/inner/i1.txt"));

    let mut trie = PathTrie::new();
    trie.insert(&root.join("top")).unwrap();
    trie.insert(&root.join("top/inner")).unwrap();

    let entries: Vec<FileEntry> = trie.flatten().collect();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["t1.txt", "t2.txt", "i1.txt"]);

    // Directory runs are contiguous: once the traversal leaves a directory
    // it never emits for it again.
    let mut seen = Vec::new();
    for e in &entries {
        if seen.last() != Some(&e.dir) {
            assert!(!seen.contains(&e.dir), "directory runs interleaved");
            seen.push(e.dir.clone());
        }
    }
}

#[test]
fn flatten_is_restartable() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("r")).unwrap();
    touch(&root.join("r/f.txt"));

    let mut trie = PathTrie::new();
    trie.insert(&root.join("r")).unwrap();

    let first: Vec<FileEntry> = trie.flatten().collect();
    let second: Vec<FileEntry> = trie.flatten().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn directory_children_recurse_in_sorted_order() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    for d in ["zoo", "Alpha", "beta"] {
        fs::create_dir_all(root.join(d)).unwrap();
        touch(&root.join(d).join("f.txt"));
    }

    let mut trie = PathTrie::new();
    for d in ["zoo", "Alpha", "beta"] {
        trie.insert(&root.join(d)).unwrap();
    }

    let dirs: Vec<String> = trie
        .flatten()
        .map(|e| e.dir.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(dirs, vec!["Alpha", "beta", "zoo"]);
}
