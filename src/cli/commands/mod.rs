pub mod generate;
pub mod inspect;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Collect `.kt` files from the given files and directories, sorted for
/// deterministic processing order.
pub fn collect_kotlin_sources(roots: &[PathBuf]) -> Result<Vec<(String, String)>> {
    let mut paths = Vec::new();
    for root in roots {
        collect_paths(root, &mut paths)
            .with_context(|| format!("could not scan {}", root.display()))?;
    }
    paths.sort();
    paths.dedup();
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        sources.push((path.to_string_lossy().into_owned(), content));
    }
    Ok(sources)
}

fn collect_paths(root: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if root.is_dir() {
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            collect_paths(&entry.path(), out)?;
        }
    } else if root.extension().is_some_and(|ext| ext == "kt") {
        out.push(root.to_path_buf());
    }
    Ok(())
}
