//! Descriptor discovery over a directory tree.

use std::path::{Path, PathBuf};

use tracing::{error, info};
use walkdir::WalkDir;

use crate::error::CoreResult;
use crate::generator::{GenerationReport, Generator};

/// Reports collected over one discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoverySummary {
    pub reports: Vec<GenerationReport>,
    /// Entries that could not be visited. Each was logged.
    pub traversal_errors: Vec<String>,
}

impl DiscoverySummary {
    pub fn descriptors(&self) -> usize {
        self.reports.len()
    }

    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.reports.iter().flat_map(|r| r.written.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.reports.iter().map(|r| r.failures.len()).sum()
    }
}

/// Generate artifacts for every file under `descriptors_root`.
///
/// Entries are visited recursively in lexical order and every non-directory
/// entry is treated as a descriptor. Traversal errors are logged and
/// skipped; a descriptor that fails to load stops the run.
pub fn discover_and_generate(
    generator: &Generator,
    descriptors_root: &Path,
) -> CoreResult<DiscoverySummary> {
    info!("Discovering descriptors under {}", descriptors_root.display());
    let mut summary = DiscoverySummary::default();

    for entry in WalkDir::new(descriptors_root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error walking {}: {}", descriptors_root.display(), e);
                summary.traversal_errors.push(e.to_string());
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let report = generator.generate(descriptors_root, entry.path())?;
        summary.reports.push(report);
    }

    info!(
        "Processed {} descriptor(s), {} render failure(s)",
        summary.descriptors(),
        summary.failure_count()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use tempfile::tempdir;

    #[test]
    fn test_missing_root_is_not_fatal() {
        let temp = tempdir().unwrap();
        let generator = Generator::new(GeneratorConfig::new(temp.path()));

        let summary = discover_and_generate(&generator, &temp.path().join("nowhere")).unwrap();
        assert_eq!(summary.descriptors(), 0);
        assert_eq!(summary.traversal_errors.len(), 1);
    }

    #[test]
    fn test_empty_root_yields_nothing() {
        let temp = tempdir().unwrap();
        let generator = Generator::new(GeneratorConfig::new(temp.path()));

        let summary = discover_and_generate(&generator, temp.path()).unwrap();
        assert_eq!(summary.descriptors(), 0);
        assert!(summary.traversal_errors.is_empty());
        assert_eq!(summary.written().count(), 0);
    }
}
