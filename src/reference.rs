use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, ZipCleanError};

/// Read-only set of known-valid US zip code strings.
///
/// Loaded once per run and shared by reference between guides; nothing
/// mutates it after construction.
#[derive(Debug, Clone, Default)]
pub struct ZipReferenceSet {
    codes: HashSet<String>,
}

static BUNDLED: Lazy<Option<Arc<ZipReferenceSet>>> = Lazy::new(|| {
    // Avoid zipcodes::matching to suppress debug_print output.
    let all = zipcodes::filter_by(vec![|z: &zipcodes::Zipcode| !z.zip_code.is_empty()], None).ok()?;
    let set: ZipReferenceSet = all.into_iter().map(|z| z.zip_code).collect();
    debug!("Built bundled zip reference set with {} codes", set.len());
    Some(Arc::new(set))
});

impl ZipReferenceSet {
    /// Every US zip code from the `zipcodes` database, built once per process
    pub fn bundled() -> Result<Arc<Self>> {
        BUNDLED
            .as_ref()
            .cloned()
            .filter(|set| !set.is_empty())
            .ok_or_else(|| {
                ZipCleanError::ReferenceSet("bundled zip code database could not be read".to_string())
            })
    }

    /// Load a reference set from disk.
    ///
    /// Accepts either a JSON array of strings or plain text with one zip code
    /// per line. Blank lines and lines starting with `#` are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ZipCleanError::ReferenceSet(format!("failed to read '{}': {}", path.display(), e))
        })?;

        let set: Self = if content.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<String>>(&content)?
                .into_iter()
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect()
        } else {
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .collect()
        };

        if set.is_empty() {
            return Err(ZipCleanError::ReferenceSet(format!(
                "no zip codes found in '{}'",
                path.display()
            )));
        }

        info!("Loaded {} reference zip codes from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.codes.contains(token)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ZipReferenceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}
