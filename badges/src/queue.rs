use std::fs::canonicalize;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use config::Config;


/// Source badge and the path its circular version is written to.
pub type Queued = (PathBuf, PathBuf);

/// Build the badge queue, either from the configured file list or by scanning the source dir.
pub fn badge_queue(config: &Config) -> Result<Vec<Queued>> {
    let source_dir = config.source_dir();
    let output_dir = config.output_dir();

    // Checked before anything gets created so a mistyped dir is never made up
    if !source_dir.is_dir() {
        bail!("Badge source dir {:?} doesn't exist", source_dir)
    }

    // Listed files are queued as is, the driver reports the missing ones
    if let Some(include) = config.include() {
        debug!("Using configured list of {} badge files", include.len());

        let mut queue = vec![];

        for name in include {
            let filename = match name.file_name() {
                Some(f) => f,
                None => bail!("Configured badge {:?} is not a file name", name),
            };

            queue.push((source_dir.join(name), output_dir.join(filename)));
        }

        return Ok(queue)
    }

    debug!("No badge list configured, scanning {:?} for PNG files", source_dir);

    let mut queue = vec![];

    // Output dir lives inside the source dir, one level deep is enough to never read it back
    for i in WalkDir::new(&source_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let e = i.map_err(|e| anyhow!("Failed to read badge dir entry: {}", e))?;

        if !e.file_type().is_file() || !is_png(e.path()) {
            continue;
        }

        if config.is_excluded(e.path()) {
            warn!("Skipping badge as it's excluded: {:?}", e.path());
            continue;
        }

        let target = output_dir.join(e.file_name());
        queue.push((e.into_path(), target));
    }

    Ok(queue)
}

/// Output must not resolve to the source dir, badges would replace their sources.
/// Both dirs have to exist.
pub fn check_output_dir(source_dir: &Path, output_dir: &Path) -> Result<()> {
    let source = canonicalize(source_dir)
        .map_err(|e| anyhow!("Failed to resolve badge source dir {:?}: {}", source_dir, e))?;
    let output = canonicalize(output_dir)
        .map_err(|e| anyhow!("Failed to resolve badge output dir {:?}: {}", output_dir, e))?;

    if source.eq(&output) {
        bail!("Output dir {:?} is the badge source dir, refusing to overwrite source badges", output_dir)
    }

    Ok(())
}

/// Whether writing `target` would replace `source`.
pub fn is_same_file(source: &Path, target: &Path) -> bool {
    if source.eq(target) {
        return true
    }

    match (canonicalize(source), canonicalize(target)) {
        (Ok(s), Ok(t)) => s.eq(&t),
        _ => false,
    }
}

fn is_png(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}
