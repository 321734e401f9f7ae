// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::extractors::fields::Document;
use crate::utils::error::StorageError;

const JSON_INDENT: &[u8] = b"    ";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified output directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the output directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Output location for an input PDF: same stem, `.json` extension, in the output directory.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        self.derived_path(input, "json")
    }

    /// Location of an auxiliary file for an input, e.g. `debug/<stem>.lines.txt`.
    pub fn debug_path_for(&self, input: &Path) -> PathBuf {
        self.base_dir.join("debug").join(format!("{}.lines.txt", Self::file_stem(input)))
    }

    /// Serializes the document fully, writes it to a sibling temp file, then renames it into place.
    /// A failure at any step leaves no `.json` behind.
    pub fn save_document(&self, document: &Document, input: &Path) -> Result<PathBuf, StorageError> {
        let json = to_pretty_json(document)?;
        let file_path = self.output_path_for(input);
        let temp_path = self.derived_path(input, "json.part");

        let written = fs::write(&temp_path, json).and_then(|_| fs::rename(&temp_path, &file_path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                tracing::debug!("Could not remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(StorageError::IoError(e));
        }

        tracing::debug!("Saved document to {}", file_path.display());

        Ok(file_path)
    }

    fn derived_path(&self, input: &Path, extension: &str) -> PathBuf {
        // Stems can contain dots (e.g. `FORM.B`)
        self.base_dir.join(format!("{}.{}", Self::file_stem(input), extension))
    }

    fn file_stem(input: &Path) -> String {
        input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }
}

/// JSON with a four-space indent. Non-ASCII characters are written as-is.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    value
        .serialize(&mut serializer)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    Ok(buffer)
}
