//! Removes US zip codes from the postal addresses of travel guides

pub mod cleaning;
pub mod config;
pub mod constants;
pub mod error;
pub mod guide;
pub mod logging;
pub mod pipeline;
pub mod reference;
pub mod storage;

pub use cleaning::{clean_guide, extract_zip_tokens, sanitize_addresses, CleanReport, ZipCleaner};
pub use error::{Result, ZipCleanError};
pub use pipeline::{Pipeline, PipelineResult};
pub use reference::ZipReferenceSet;
pub use storage::{FsGuideStore, GuideStore, InMemoryGuideStore};
