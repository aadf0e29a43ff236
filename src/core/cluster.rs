use std::sync::OnceLock;

use regex::Regex;

use crate::core::FileEntry;
use crate::core::affix::common_affix;

/// File name without its trailing extension, `Path::file_stem` style:
/// `"archive.tar.gz"` → `"archive.tar"`, `".bashrc"` → `".bashrc"`.
#[must_use]
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

fn postfix_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // XXXX-23, XXXX_ (23), XXXX(23), plain trailing digits.
            Regex::new(r"^[-_]*\s*\(?\d+\)?$").expect("valid regex"),
            // XXXX (23)
            Regex::new(r"^\s*\(\d+\)$").expect("valid regex"),
            // XXXX_copy, XXXX - copy copy, anywhere in the postfix.
            Regex::new(r"(?:[-_ ]*copy)+").expect("valid regex"),
        ]
    })
}

/// Whether `text` looks like the tail a copying tool appends to a file name,
/// such as `" (23)"`, `"_2"`, or `"-copy"`. Case-sensitive.
#[must_use]
pub fn is_duplicate_postfix(text: &str) -> bool {
    postfix_patterns().iter().any(|re| re.is_match(text))
}

/// Group a flattened file listing into duplicate-looking and similar-looking
/// name clusters.
///
/// The input must list each directory's files contiguously (the order
/// [`crate::core::PathTrie::flatten`] produces); clusters never span a
/// directory boundary. Within a run, a window grows from an anchor file
/// while the anchor's stem is an exact prefix of the following stems; each
/// window member lands in the duplicate cluster when the leftover postfix
/// matches the grammar above, in the similar cluster otherwise. An anchor
/// with both kinds of neighbors heads one cluster of each kind.
#[must_use]
pub fn report_duplicates(entries: &[FileEntry]) -> (Vec<Vec<FileEntry>>, Vec<Vec<FileEntry>>) {
    let mut all_duplicates: Vec<Vec<FileEntry>> = Vec::new();
    let mut all_similars: Vec<Vec<FileEntry>> = Vec::new();

    let mut i = 0;
    while i < entries.len() {
        let anchor = &entries[i];
        let anchor_stem: Vec<char> = file_stem(&anchor.name).chars().collect();

        let mut duplicates: Vec<FileEntry> = Vec::new();
        let mut similars: Vec<FileEntry> = Vec::new();

        let mut j = i + 1;
        while j < entries.len() && entries[j].dir == anchor.dir {
            let stem: Vec<char> = file_stem(&entries[j].name).chars().collect();
            // Two sequences are always passed, so the arity check cannot fire.
            let shared = common_affix(&[anchor_stem.as_slice(), stem.as_slice()], false)
                .expect("exactly two sequences");
            if shared < anchor_stem.len() {
                break;
            }
            let postfix: String = stem[shared..].iter().collect();
            if is_duplicate_postfix(&postfix) {
                duplicates.push(entries[j].clone());
            } else {
                similars.push(entries[j].clone());
            }
            j += 1;
        }

        if !duplicates.is_empty() {
            duplicates.insert(0, anchor.clone());
            all_duplicates.push(duplicates);
        }
        if !similars.is_empty() {
            similars.insert(0, anchor.clone());
            all_similars.push(similars);
        }

        i = j;
    }

    (all_duplicates, all_similars)
}
