//! Corpus loading from JSON / JSONL files or a directory of them.

use std::path::{Path, PathBuf};

use codemark_core::errors::CorpusError;
use serde_json::Value;
use tracing::{debug, info};

/// Load every code string under `path`. A directory is scanned
/// non-recursively in file-name order and the files are concatenated.
pub fn load_corpus(path: &Path) -> Result<Vec<String>, CorpusError> {
    let metadata = std::fs::metadata(path).map_err(|e| CorpusError::io(path, e))?;
    if !metadata.is_dir() {
        return load_file(path);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(path).map_err(|e| CorpusError::io(path, e))? {
        let entry = entry.map_err(|e| CorpusError::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| CorpusError::io(entry.path(), e))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut samples = Vec::new();
    for file in &files {
        samples.extend(load_file(file)?);
    }
    info!(path = %path.display(), files = files.len(), samples = samples.len(), "corpus loaded");
    Ok(samples)
}

/// Load one file. Names ending in `jsonl` are line-delimited objects with a
/// `code` field; anything else is a JSON list of strings or an object whose
/// `code` key holds that list.
pub fn load_file(path: &Path) -> Result<Vec<String>, CorpusError> {
    let text = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    let is_jsonl = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("jsonl"));
    let samples = if is_jsonl {
        parse_jsonl(path, &text)?
    } else {
        parse_document(path, &text)?
    };
    debug!(path = %path.display(), samples = samples.len(), "corpus file read");
    Ok(samples)
}

fn parse_jsonl(path: &Path, text: &str) -> Result<Vec<String>, CorpusError> {
    let mut samples = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Value = serde_json::from_str(line).map_err(|source| CorpusError::Json {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        match record.get("code").and_then(Value::as_str) {
            Some(code) => samples.push(code.to_string()),
            None => {
                return Err(CorpusError::MissingCode {
                    path: path.to_path_buf(),
                    line: i + 1,
                })
            }
        }
    }
    Ok(samples)
}

fn parse_document(path: &Path, text: &str) -> Result<Vec<String>, CorpusError> {
    let document: Value = serde_json::from_str(text).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        line: 0,
        source,
    })?;
    let list = match &document {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("code") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CorpusError::UnsupportedDocument {
                    path: path.to_path_buf(),
                    reason: "object has no 'code' list".to_string(),
                })
            }
        },
        _ => {
            return Err(CorpusError::UnsupportedDocument {
                path: path.to_path_buf(),
                reason: "expected a list or an object".to_string(),
            })
        }
    };
    list.iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| CorpusError::UnsupportedDocument {
                    path: path.to_path_buf(),
                    reason: "code list contains a non-string entry".to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_skips_blank_lines() {
        let samples = parse_jsonl(Path::new("x.jsonl"), "{\"code\":\"a\"}\n\n{\"code\":\"b\"}\n").unwrap();
        assert_eq!(samples, vec!["a", "b"]);
    }

    #[test]
    fn jsonl_requires_code() {
        let err = parse_jsonl(Path::new("x.jsonl"), "{\"text\":\"a\"}\n").unwrap_err();
        assert!(matches!(err, CorpusError::MissingCode { line: 1, .. }));
    }

    #[test]
    fn documents_accept_list_or_code_map() {
        let path = Path::new("x.json");
        assert_eq!(parse_document(path, "[\"a\", \"b\"]").unwrap(), vec!["a", "b"]);
        assert_eq!(parse_document(path, "{\"code\": [\"c\"]}").unwrap(), vec!["c"]);
        assert!(parse_document(path, "{\"other\": []}").is_err());
        assert!(parse_document(path, "[1]").is_err());
    }
}
