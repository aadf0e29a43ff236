// benches/trie_bench.rs
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use duptree::core::{FileEntry, PathTrie, report_duplicates};

// ---------- Fixture: synthetic folder tree we reuse across benches ----------
struct Fixture {
    _tmp: TempDir,
    dirs: Vec<PathBuf>,
}

static FS_FIXTURE: Lazy<Fixture> = Lazy::new(|| {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().to_path_buf();

    let mut dirs = Vec::new();
    for a in 0..8 {
        for b in 0..8 {
            let dir = root.join(format!("group_{a:02}/batch_{b:02}/leaf"));
            fs::create_dir_all(&dir).unwrap();
            for f in 0..12 {
                let name = match f % 4 {
                    0 => format!("track_{f:02}.mp3"),
                    1 => format!("track_{:02} (1).mp3", f - 1),
                    2 => format!("track_{:02}_copy.mp3", f - 2),
                    _ => format!("cover_{f:02}.png"),
                };
                fs::write(dir.join(name), "x").unwrap();
            }
            dirs.push(dir);
        }
    }

    Fixture { _tmp: tmp, dirs }
});

fn populated_trie() -> PathTrie {
    let mut trie = PathTrie::new();
    for dir in &FS_FIXTURE.dirs {
        trie.insert(dir).unwrap();
    }
    trie
}

fn bench_insert(c: &mut Criterion) {
    let fixture = &*FS_FIXTURE;
    c.bench_function("insert_64_dirs", |b| {
        b.iter_batched(
            PathTrie::new,
            |mut trie| {
                for dir in &fixture.dirs {
                    trie.insert(black_box(dir)).unwrap();
                }
                trie
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_flatten(c: &mut Criterion) {
    let trie = populated_trie();
    c.bench_function("flatten_full_tree", |b| {
        b.iter(|| black_box(trie.flatten().count()));
    });
}

fn bench_cluster(c: &mut Criterion) {
    let trie = populated_trie();
    let entries: Vec<FileEntry> = trie.flatten().collect();
    c.bench_function("report_duplicates", |b| {
        b.iter(|| black_box(report_duplicates(black_box(&entries))));
    });
}

criterion_group!(benches, bench_insert, bench_flatten, bench_cluster);
criterion_main!(benches);
