//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup plus lookup helpers and bulk extractors that work
//! with scan-phase data structures (`Manifest`, `Project`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let ingest = find_project(&manifest, "ingest");
//! assert_eq!(ingest.source_dir, "projects/ingest-pipeline");
//!
//! assert_eq!(
//!     visible_slugs(&manifest),
//!     vec!["ingest", "checkout-redesign", "design-system", "realtime-dashboard"],
//! );
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::registry::ProjectRegistry;
use crate::scan::Manifest;
use crate::types::Project;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find a project by slug. Panics if not found.
pub fn find_project<'a>(manifest: &'a Manifest, slug: &str) -> &'a Project {
    manifest
        .projects
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs = project_slugs(manifest);
            panic!("project '{slug}' not found. Available: {slugs:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All project slugs in scan (folder) order, drafts included.
pub fn project_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.projects.iter().map(|p| p.slug.as_str()).collect()
}

/// Slugs of visible projects in display order, for the manifest's environment.
pub fn visible_slugs(manifest: &Manifest) -> Vec<String> {
    let registry = ProjectRegistry::new(
        manifest.projects.clone(),
        manifest.config.site.environment,
    );
    registry
        .list_visible()
        .iter()
        .map(|p| p.slug.clone())
        .collect()
}
