//! Corpus loading and decoded-batch dumps.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::config::EvalConfig;
use crate::constants::{CSV_EXTENSION, SMILES_COLUMN, SMI_EXTENSION};
use crate::error::{Error, Result};

/// Read one SMILES per line, trimming surrounding whitespace.
pub fn read_smi(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut smiles = Vec::new();
    for line in reader.lines() {
        smiles.push(line?.trim().to_string());
    }
    Ok(smiles)
}

/// Split one CSV record into fields.
///
/// Double-quoted fields may hold commas, and `""` inside quotes is a literal
/// quote. Unquoted fields are trimmed.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() && !quoted => {
                field.clear();
                quoted = true;
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&mut field, quoted));
                quoted = false;
            }
            // Whitespace after a closing quote.
            c if quoted && !in_quotes && c.is_whitespace() => {}
            _ => field.push(c),
        }
    }
    fields.push(finish_field(&mut field, quoted));
    fields
}

fn finish_field(field: &mut String, quoted: bool) -> String {
    let value = std::mem::take(field);
    if quoted {
        value
    } else {
        value.trim().to_string()
    }
}

/// Read the `smiles` column of a comma-separated file with a header row.
pub fn read_smiles_csv(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(Error::MissingColumn(SMILES_COLUMN.to_string())),
    };
    let idx = split_fields(&header)
        .iter()
        .position(|name| name == SMILES_COLUMN)
        .ok_or_else(|| Error::MissingColumn(SMILES_COLUMN.to_string()))?;

    let mut smiles = Vec::new();
    for (row, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = split_fields(&line);
        if idx < fields.len() {
            smiles.push(fields.swap_remove(idx));
        } else {
            log::warn!("Skipping row {}: no field at column {}", row + 1, idx);
        }
    }
    Ok(smiles)
}

/// Load a training corpus, choosing the format by file extension.
pub fn load_train_data(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let smiles = match ext {
        CSV_EXTENSION => read_smiles_csv(path)?,
        SMI_EXTENSION => read_smi(path)?,
        other => return Err(Error::UnsupportedExtension(other.to_string())),
    };
    log::info!("Loaded {} SMILES from {}", smiles.len(), path.display());
    Ok(smiles)
}

/// Destination for decoded batches.
pub trait ArtifactStore {
    /// Persist `samples` under `name`.
    fn save(&self, name: &str, samples: &[String]) -> Result<()>;
}

/// Writes each batch to `<dir>/<name>.smi`, one SMILES per line.
#[derive(Debug, Clone)]
pub struct SmiStore {
    dir: PathBuf,
}

impl SmiStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &EvalConfig) -> Self {
        Self::new(config.artifact_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SMI_EXTENSION))
    }
}

impl ArtifactStore for SmiStore {
    fn save(&self, name: &str, samples: &[String]) -> Result<()> {
        save_smi(&self.dir, name, samples).map(|_| ())
    }
}

/// Write `samples` newline-joined to `<dir>/<name>.smi`, creating `dir`.
pub fn save_smi(dir: impl AsRef<Path>, name: &str, samples: &[String]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", name, SMI_EXTENSION));
    let mut file = File::create(&path)?;
    file.write_all(samples.join("\n").as_bytes())?;
    log::debug!("Saved {} samples to {}", samples.len(), path.display());
    Ok(path)
}
