use std::path::{Path, PathBuf};

use super::chunker::PassageChunker;
use super::{EvidenceCategory, EvidencePassage, RagError};

/// Reference passages loaded from `<dir>/clinical` and `<dir>/insurance`.
#[derive(Debug, Clone, Default)]
pub struct EvidenceCorpus {
    passages: Vec<EvidencePassage>,
}

impl EvidenceCorpus {
    pub fn new(passages: Vec<EvidencePassage>) -> Self {
        Self { passages }
    }

    /// Load every `.txt`/`.md` file under the category subdirectories.
    /// Files are visited in name order so passage order is stable.
    pub fn load_dir(dir: &Path) -> Result<Self, RagError> {
        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "Evidence directory not found, retrieval will return no passages");
            return Ok(Self::default());
        }

        let chunker = PassageChunker::new();
        let mut passages = Vec::new();

        for category in EvidenceCategory::ALL {
            let sub = dir.join(category.dir_name());
            if !sub.is_dir() {
                tracing::debug!(path = %sub.display(), "No evidence documents for category");
                continue;
            }
            for path in document_paths(&sub)? {
                let text = std::fs::read_to_string(&path)?;
                let source = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                for chunk in chunker.chunk(&text) {
                    passages.push(EvidencePassage {
                        category,
                        source: source.clone(),
                        section_title: chunk.section_title,
                        text: chunk.content,
                    });
                }
            }
        }

        if passages.is_empty() {
            tracing::warn!(path = %dir.display(), "Evidence corpus is empty");
        } else {
            tracing::info!(path = %dir.display(), passages = passages.len(), "Evidence corpus loaded");
        }
        Ok(Self { passages })
    }

    pub fn passages(&self) -> &[EvidencePassage] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

fn document_paths(dir: &Path) -> Result<Vec<PathBuf>, RagError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_document = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("md"));
        if path.is_file() && is_document {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
