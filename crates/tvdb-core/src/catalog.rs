//! Languages and translations files
//!
//! Both are read-only JSON inputs prepared by the user before a run.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, TvdbError};
use crate::types::TranslationEntry;

/// Language code to display name, e.g. `"deu" -> "German"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Languages {
    names: BTreeMap<String, String>,
}

impl Languages {
    /// Load the languages file.
    ///
    /// # Errors
    /// - `TvdbError::CatalogMissing` if the file does not exist
    /// - `TvdbError::Json` if it is not a JSON object of strings
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_catalog(path)?;
        let names = serde_json::from_str(&raw)?;
        Ok(Self { names })
    }

    /// Display name of a language code, if the code is known
    pub fn resolve(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Number of known languages
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no languages are known
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for Languages {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Load the ordered list of translations to apply.
///
/// # Errors
/// - `TvdbError::CatalogMissing` if the file does not exist
/// - `TvdbError::Json` if an entry is malformed
pub fn load_translations(path: &Path) -> Result<Vec<TranslationEntry>> {
    let raw = read_catalog(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_catalog(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(TvdbError::CatalogMissing(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
