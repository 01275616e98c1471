//! Reads MedQuAD-style CSV exports into `(question, answer)` pairs.
//!
//! Each export has an `Answer` column whose cells carry a whole record:
//!
//! ```text
//! Question: What is asthma?
//! URL: https://...
//! Answer: Asthma is a chronic disease ...
//! ```
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::corpus::Corpus;
use crate::types::QaPair;

const RECORD_COLUMN: &str = "Answer";

pub struct CorpusLoader {
    question_re: Regex,
    answer_re: Regex,
}

impl CorpusLoader {
    pub fn new() -> Result<Self> {
        let question_re = Regex::new(r"(?s)Question:\s*(.*?)\s*URL:").context("question pattern")?;
        let answer_re = Regex::new(r"(?s)Answer:\s*(.*)").context("answer pattern")?;
        Ok(Self { question_re, answer_re })
    }

    /// Loads every CSV under `data_dir` in path order and deduplicates the result.
    ///
    /// Only a missing directory is fatal. A file that cannot be read is logged
    /// and contributes no pairs.
    pub fn load_dir(&self, data_dir: &Path) -> Result<Corpus> {
        self.load_dir_with(data_dir, |_, _| {})
    }

    /// Like [`CorpusLoader::load_dir`], calling `on_file(path, total)` after each file.
    pub fn load_dir_with<F>(&self, data_dir: &Path, mut on_file: F) -> Result<Corpus>
    where
        F: FnMut(&Path, usize),
    {
        if !data_dir.is_dir() {
            bail!("corpus directory {} does not exist", data_dir.display());
        }
        let files = self.list_files(data_dir);
        if files.is_empty() {
            tracing::warn!(dir = %data_dir.display(), "no .csv files found");
        }
        let mut pairs = Vec::new();
        let mut failed = 0usize;
        for file in &files {
            match self.load_file(file) {
                Ok(found) => pairs.extend(found),
                Err(e) => {
                    tracing::error!(file = %file.display(), error = format!("{e:#}"), "skipping unreadable file");
                    failed += 1;
                }
            }
            on_file(file, files.len());
        }
        let corpus = Corpus::from_pairs(pairs);
        tracing::info!(files = files.len(), failed, pairs = corpus.len(), dir = %data_dir.display(), "loaded corpus");
        Ok(corpus)
    }

    /// Parses one CSV export. A file without an `Answer` column yields no pairs.
    pub fn load_file(&self, path: &Path) -> Result<Vec<QaPair>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header of {}", path.display()))?;
        let Some(column) = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == RECORD_COLUMN)
        else {
            tracing::warn!(file = %path.display(), "skipping file without '{}' column", RECORD_COLUMN);
            return Ok(Vec::new());
        };

        let mut pairs = Vec::new();
        let mut skipped = 0usize;
        for (row, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(file = %path.display(), row, error = %e, "unreadable row");
                    skipped += 1;
                    continue;
                }
            };
            let cell = record.get(column).unwrap_or("");
            if cell.trim().is_empty() {
                continue;
            }
            match self.parse_record(cell) {
                Some(pair) => pairs.push(pair),
                None => skipped += 1,
            }
        }
        tracing::debug!(file = %path.display(), pairs = pairs.len(), skipped, "parsed file");
        Ok(pairs)
    }

    /// Extracts the question and answer from one record cell.
    pub fn parse_record(&self, text: &str) -> Option<QaPair> {
        let question = self.question_re.captures(text)?.get(1)?.as_str();
        let answer = self.answer_re.captures(text)?.get(1)?.as_str();
        Some(QaPair::new(flatten(question), flatten(answer)))
    }

    pub fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    }
}

fn flatten(s: &str) -> String {
    s.trim().replace('\n', " ")
}
