#![allow(clippy::needless_return)]

use std::env;
use std::path::PathBuf;

use anyhow::bail;

use duptree::core::{
    FileEntry, PathTrie, load_settings, render_report, render_tree, report_duplicates,
    save_settings, settings_file,
};
use duptree::logging;

const USAGE: &str = "usage: duptree [-s|--subfolders] [-v|--verbose] <folder>...

Adds each folder to a path-compressed tree, prints the tree, and reports
file names that look like duplicates or near-duplicates of each other.
With no folder arguments the last scanned folder is reused.";

fn main() -> anyhow::Result<()> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    let mut subfolders = false;
    let mut verbose = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-s" | "--subfolders" => subfolders = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => dirs.push(PathBuf::from(arg)),
        }
    }

    logging::init(verbose);

    let settings_path = settings_file(&env::current_dir()?);
    let mut settings = load_settings(&settings_path).unwrap_or_default();

    if dirs.is_empty() {
        match &settings.last_dir {
            Some(last) => {
                log::info!("no folders given; reusing {last}");
                dirs.push(PathBuf::from(last));
                subfolders = subfolders || settings.include_subfolders;
            }
            None => {
                eprintln!("{USAGE}");
                bail!("no folders to scan");
            }
        }
    }

    let mut trie = PathTrie::new();
    for dir in &dirs {
        let outcome = if subfolders {
            trie.insert_with_subfolders(dir).map(|_| ())
        } else {
            trie.insert(dir).map(|_| ())
        };
        if let Err(err) = outcome {
            log::error!("skipping {}: {err}", dir.display());
        }
    }
    if trie.is_empty() {
        bail!("nothing could be scanned");
    }

    if let Some(last) = dirs.last() {
        settings.last_dir = Some(last.display().to_string());
    }
    settings.include_subfolders = subfolders;

    print!("{}", render_tree(&trie));
    println!();

    let entries: Vec<FileEntry> = trie.flatten().collect();
    let (duplicates, similars) = report_duplicates(&entries);
    print!("{}", render_report(&duplicates, &similars));

    if let Err(err) = save_settings(&settings_path, &settings) {
        log::warn!("could not save settings: {err}");
    }
    Ok(())
}
