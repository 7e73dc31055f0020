use metrics::counter;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

use crate::cleaning::ZipCleaner;
use crate::error::Result;
use crate::storage::GuideStore;

/// Result of cleaning every guide under a root
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub root: String,
    pub total_guides: usize,
    pub cleaned_guides: usize,
    /// Guides without a `Cities[0].pois` list; saved back unchanged
    pub missing_structure: usize,
    pub tokens_removed: usize,
    pub errors: Vec<String>,
    pub no_guides_found: bool,
}

pub struct Pipeline;

impl Pipeline {
    /// Clean every guide the store lists and write each one back.
    ///
    /// A guide that cannot be loaded or saved is logged and skipped; the
    /// remaining guides are still processed. Finding no guides at all is
    /// reported through `no_guides_found`, not as an error.
    #[instrument(skip(root, store, cleaner), fields(root = %root.display()))]
    pub fn run(root: &Path, store: &dyn GuideStore, cleaner: &ZipCleaner) -> Result<PipelineResult> {
        info!("zipcode cleaning from directory {} started", root.display());
        counter!("zipclean_runs_total").increment(1);

        let mut result = PipelineResult {
            root: root.display().to_string(),
            ..PipelineResult::default()
        };

        let guides = store.list_guides()?;
        result.total_guides = guides.len();

        if guides.is_empty() {
            result.no_guides_found = true;
            warn!("no guide found under {} so no zipcode cleaning was performed", root.display());
            return Ok(result);
        }

        for path in &guides {
            let mut guide = match store.load(path) {
                Ok(guide) => guide,
                Err(e) => {
                    error!("{}", e);
                    counter!("zipclean_guide_errors_total", "stage" => "load").increment(1);
                    result.errors.push(e.to_string());
                    continue;
                }
            };

            let report = cleaner.clean(&mut guide);
            if report.structure_missing {
                warn!("{} has no Cities[0].pois list, no address to clean", path.display());
                result.missing_structure += 1;
            } else {
                debug!(
                    "{}: {} zip tokens, {} of {} addresses rewritten",
                    path.display(),
                    report.zip_tokens.len(),
                    report.stats.addresses_rewritten,
                    report.stats.addresses_visited
                );
            }

            if let Err(e) = store.save(path, &guide) {
                error!("could not write cleaned guide {}: {}", path.display(), e);
                counter!("zipclean_guide_errors_total", "stage" => "save").increment(1);
                result.errors.push(format!("{}: {}", path.display(), e));
                continue;
            }

            result.cleaned_guides += 1;
            result.tokens_removed += report.stats.tokens_removed;
            counter!("zipclean_guides_cleaned_total").increment(1);
            counter!("zipclean_tokens_removed_total").increment(report.stats.tokens_removed as u64);
            info!("zipcode cleaning for {} done", path.display());
        }

        info!(
            "zipcode cleaning from directory {} finished: {} of {} guides cleaned ({} errors)",
            root.display(),
            result.cleaned_guides,
            result.total_guides,
            result.errors.len()
        );
        Ok(result)
    }
}
