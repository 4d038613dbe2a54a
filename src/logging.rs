use std::fs::{self, File};
use std::path::Path;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::fmt::format::FmtSpan;

/// Route tracing events to `output_path` as JSON lines.
///
/// The terminal belongs to the overlay, so nothing is installed unless a
/// log file was requested.
pub fn init_tracing_json(output_path: &Path, level: tracing::Level) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let file = File::create(output_path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dirs_are_created() {
        let dir = std::env::temp_dir().join(format!("wtop_log_{}", std::process::id()));
        let path = dir.join("a").join("b").join("wtop.jsonl");
        ensure_parent_dir(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
        let _ = fs::remove_dir_all(&dir);
    }
}
