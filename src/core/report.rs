use crate::core::trie::{NodeId, PathTrie};
use crate::core::FileEntry;

fn label_text(label: &[String]) -> String {
    label.join("/")
}

/// Render the trie as a unicode box-drawing tree, the way the presentation
/// layer lists it: each directory's files first, subdirectories after,
/// compressed labels shown as one joined entry.
#[must_use]
pub fn render_tree(trie: &PathTrie) -> String {
    fn children_of(trie: &PathTrie, id: NodeId) -> Vec<(String, Option<NodeId>)> {
        let Some(node) = trie.node(id) else {
            return Vec::new();
        };
        let mut rows = Vec::with_capacity(node.file_children().len() + node.dir_children().len());
        for &fid in node.file_children() {
            if let Some(f) = trie.node(fid) {
                rows.push((label_text(&f.label), None));
            }
        }
        for &did in node.dir_children() {
            if let Some(d) = trie.node(did) {
                rows.push((label_text(&d.label), Some(did)));
            }
        }
        rows
    }

    fn render(trie: &PathTrie, id: NodeId, prefix: &mut String, out: &mut String) {
        let rows = children_of(trie, id);
        let len = rows.len();
        for (idx, (text, dir)) in rows.into_iter().enumerate() {
            let last = idx + 1 == len;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&text);
            out.push('\n');

            if let Some(did) = dir {
                let saved = prefix.len();
                prefix.push_str(if last { "    " } else { "│   " });
                render(trie, did, prefix, out);
                prefix.truncate(saved);
            }
        }
    }

    let mut out = String::new();
    let mut prefix = String::new();
    render(trie, trie.root(), &mut prefix, &mut out);
    out
}

/// Plain-text report of the clusterer's output: one block per cluster,
/// anchor first, every line carrying the file's directory.
#[must_use]
pub fn render_report(duplicates: &[Vec<FileEntry>], similars: &[Vec<FileEntry>]) -> String {
    fn section(out: &mut String, title: &str, clusters: &[Vec<FileEntry>]) {
        out.push_str(title);
        out.push('\n');
        if clusters.is_empty() {
            out.push_str("  (none)\n");
            return;
        }
        for (idx, cluster) in clusters.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            for entry in cluster {
                out.push_str("  ");
                out.push_str(&entry.name);
                out.push_str("  in  ");
                out.push_str(&entry.dir.display().to_string());
                out.push('\n');
            }
        }
    }

    let mut out = String::new();
    section(&mut out, "Duplicates:", duplicates);
    out.push('\n');
    section(&mut out, "Similar names:", similars);
    out
}
