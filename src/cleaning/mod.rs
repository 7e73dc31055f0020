// Zip code detection and removal for a single guide

pub mod extractor;
pub mod sanitizer;

pub use extractor::extract_zip_tokens;
pub use sanitizer::{sanitize_addresses, SanitizeStats};

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, ZipCleanError};
use crate::reference::ZipReferenceSet;

/// Remove zip codes from the guide's addresses and return the same guide.
///
/// Stateless: the zip tokens are derived from this guide alone and
/// discarded once its addresses are rewritten.
pub fn clean_guide(mut guide: Value, reference: &ZipReferenceSet, frequency_threshold: usize) -> Value {
    let zip_tokens = extract_zip_tokens(&guide, reference, frequency_threshold);
    sanitize_addresses(&mut guide, &zip_tokens);
    guide
}

/// Outcome of cleaning one guide
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    /// The guide had no `Cities[0].pois` list and was left unchanged
    pub structure_missing: bool,
    pub zip_tokens: BTreeSet<String>,
    pub stats: SanitizeStats,
}

/// A reference set plus frequency threshold, applied guide by guide
#[derive(Debug, Clone)]
pub struct ZipCleaner {
    reference: Arc<ZipReferenceSet>,
    frequency_threshold: usize,
}

impl ZipCleaner {
    pub fn new(reference: Arc<ZipReferenceSet>, frequency_threshold: usize) -> Result<Self> {
        if frequency_threshold == 0 {
            return Err(ZipCleanError::InvalidThreshold(frequency_threshold));
        }
        Ok(Self {
            reference,
            frequency_threshold,
        })
    }

    /// Cleaner backed by the bundled US zip code database
    pub fn bundled(frequency_threshold: usize) -> Result<Self> {
        Self::new(ZipReferenceSet::bundled()?, frequency_threshold)
    }

    pub fn frequency_threshold(&self) -> usize {
        self.frequency_threshold
    }

    pub fn reference(&self) -> &ZipReferenceSet {
        &self.reference
    }

    /// Clean a guide in place and report what changed
    pub fn clean(&self, guide: &mut Value) -> CleanReport {
        let zip_tokens = extract_zip_tokens(guide, &self.reference, self.frequency_threshold);
        debug!(
            "Confirmed {} zip tokens at threshold {}: {:?}",
            zip_tokens.len(),
            self.frequency_threshold,
            zip_tokens
        );

        match sanitize_addresses(guide, &zip_tokens) {
            Some(stats) => CleanReport {
                structure_missing: false,
                zip_tokens,
                stats,
            },
            None => CleanReport {
                structure_missing: true,
                ..CleanReport::default()
            },
        }
    }
}
