//! Source-tree walker
//!
//! Parses every file of every package concurrently (`each_async`), joins
//! the parsed files per package (`join_async`), and expands one loaded
//! batch back into per-item outcomes (`disjoin`) so the failures can be
//! reported individually with `only_errors`.

use std::collections::BTreeMap;
use std::time::Duration;

use nebula_outcome::prelude::*;
use nebula_outcome::{LogConfig, init_logging};

#[derive(Debug, Clone)]
struct ParsedFile {
    path: String,
    items: usize,
}

fn parse(path: &str, source: &str) -> Outcome<ParsedFile> {
    if source.contains("<<<") {
        return Err(OutcomeError::msg(format!("{path}: unexpected merge marker")));
    }
    let items = source
        .lines()
        .filter(|line| line.starts_with("fn ") || line.starts_with("struct "))
        .count();
    Ok(ParsedFile {
        path: path.to_string(),
        items,
    })
}

fn tree() -> BTreeMap<&'static str, Vec<(&'static str, &'static str)>> {
    BTreeMap::from([
        (
            "core",
            vec![
                ("core/lib.rs", "struct Id;\nfn new() {}\n"),
                ("core/util.rs", "fn helper() {}\n"),
            ],
        ),
        (
            "engine",
            vec![
                ("engine/run.rs", "fn run() {}\nfn stop() {}\nstruct State;\n"),
                ("engine/broken.rs", "fn a() {}\n<<<<<<< HEAD\n"),
            ],
        ),
    ])
}

#[tokio::main]
async fn main() {
    if let Err(error) = init_logging(&LogConfig::development()) {
        eprintln!("logging disabled: {error}");
    }

    let mut packages = Vec::new();
    for (package, files) in tree() {
        // simulated read latency, longer for earlier files
        let reads = files.into_iter().enumerate().map(|(index, (path, source))| {
            Deferred::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5 * (3 - index as u64))).await;
                Outcome::Ok((path, source))
            })
        });
        let parsed = each_async(reads, |(path, source)| parse(path, source));
        packages.push((package, join_async(parsed)));
    }

    for (package, files) in &packages {
        match files.outcome().await {
            Ok(files) => {
                let items: usize = files.iter().map(|f| f.items).sum();
                println!("{package}: {} files, {items} items", files.len());
                for file in &files {
                    println!("  {} ({} items)", file.path, file.items);
                }
            }
            Err(error) => println!("{package}: failed: {error}"),
        }
    }

    // a batch loaded in one go, reported per item
    let batch = range(4, |i| Outcome::Ok(format!("item-{i}")));
    let loaded = join(batch);
    let per_item = disjoin(loaded);
    println!("loaded {} items", only_oks(per_item.clone()).len());
    for failed in only_errors(per_item) {
        if let Err(error) = failed {
            println!("  {error}");
        }
    }
}
