//! Loading descriptor batches from files.

use std::path::{Path, PathBuf};

use oxide_ddl_core::{read_delimited, read_json, ColumnDescriptor, InputFormat};
use tracing::debug;

use crate::error::{Error, Result};

/// One independent input: the descriptors read from a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Where the descriptors came from (a file path or a label).
    pub source: String,
    /// The descriptors, in input order.
    pub descriptors: Vec<ColumnDescriptor>,
}

impl Batch {
    /// Creates a batch from already-parsed descriptors.
    #[must_use]
    pub fn new(source: impl Into<String>, descriptors: Vec<ColumnDescriptor>) -> Self {
        Self {
            source: source.into(),
            descriptors,
        }
    }
}

/// Reads a descriptor file.
///
/// Files with a `.json` extension are read as a JSON array of descriptors;
/// anything else as delimited text in `format`.
pub fn read_batch(path: &Path, format: &InputFormat) -> Result<Batch> {
    let wrap = |source: Error| Error::Input {
        path: PathBuf::from(path),
        source: Box::new(source),
    };

    let text = std::fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let descriptors = if is_json {
        read_json(&text)
    } else {
        read_delimited(&text, format)
    }
    .map_err(|e| wrap(e.into()))?;

    debug!(
        path = %path.display(),
        descriptors = descriptors.len(),
        "Read descriptor file"
    );

    Ok(Batch::new(path.display().to_string(), descriptors))
}
