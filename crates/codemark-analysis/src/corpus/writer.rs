//! Artifact writing under `<output_dir>/<language>/`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use codemark_core::errors::CorpusError;
use serde::Serialize;
use tracing::info;

use crate::marking::AssembledDataset;
use crate::parsers::Language;

/// Paths of every artifact written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    /// One per rate, baseline first.
    pub results: Vec<PathBuf>,
    pub test: PathBuf,
    pub actual: PathBuf,
    pub stats: PathBuf,
}

/// File-name label of a mark rate: `0` for the baseline, otherwise the
/// percentage truncated to an integer.
pub fn mark_label(rate: f64) -> String {
    if rate <= 0.0 {
        "0".to_string()
    } else {
        ((rate * 100.0) as u32).to_string()
    }
}

/// Compute artifact paths without touching the filesystem.
pub fn artifact_paths(
    output_dir: &Path,
    language: Language,
    dataset_name: &str,
    rates: &[f64],
    parts: usize,
) -> ArtifactPaths {
    let dir = output_dir.join(language.name());
    ArtifactPaths {
        results: rates
            .iter()
            .map(|&r| dir.join(format!("{dataset_name}_b_{}.json", mark_label(r))))
            .collect(),
        test: dir.join(format!("{dataset_name}_b_test.jsonl")),
        actual: dir.join(format!("{dataset_name}_b{parts}_actual.jsonl")),
        stats: dir.join(format!("{dataset_name}_stats.json")),
        dir,
    }
}

/// Write every artifact of `dataset`, creating the output directory.
pub fn write_artifacts(
    dataset: &AssembledDataset,
    output_dir: &Path,
    language: Language,
    dataset_name: &str,
) -> Result<ArtifactPaths, CorpusError> {
    let rates: Vec<f64> = dataset.results.iter().map(|r| r.mark_rate).collect();
    let paths = artifact_paths(output_dir, language, dataset_name, &rates, dataset.parts);
    std::fs::create_dir_all(&paths.dir).map_err(|e| CorpusError::io(&paths.dir, e))?;

    for (result, path) in dataset.results.iter().zip(&paths.results) {
        write_json(path, result, "rewrite result")?;
    }
    write_jsonl(&paths.test, &dataset.test, "test record")?;
    write_jsonl(&paths.actual, &dataset.actual, "actual record")?;
    write_json(&paths.stats, &dataset.stats, "statistics")?;

    info!(
        dir = %paths.dir.display(),
        results = paths.results.len(),
        test = dataset.test.len(),
        actual = dataset.actual.len(),
        "artifacts written"
    );
    Ok(paths)
}

fn create(path: &Path) -> Result<BufWriter<File>, CorpusError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| CorpusError::io(path, e))
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), CorpusError> {
    let mut out = create(path)?;
    serde_json::to_writer(&mut out, value).map_err(|source| CorpusError::Serialize {
        what: what.to_string(),
        source,
    })?;
    out.flush().map_err(|e| CorpusError::io(path, e))
}

fn write_jsonl<T: Serialize>(path: &Path, records: &[T], what: &str) -> Result<(), CorpusError> {
    let mut out = create(path)?;
    for record in records {
        serde_json::to_writer(&mut out, record).map_err(|source| CorpusError::Serialize {
            what: what.to_string(),
            source,
        })?;
        out.write_all(b"\n").map_err(|e| CorpusError::io(path, e))?;
    }
    out.flush().map_err(|e| CorpusError::io(path, e))
}
