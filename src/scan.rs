//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads every case study and the site config,
//! producing a [`Manifest`] the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── resume.pdf                   # Resume shown on /resume/ (optional)
//! └── projects/
//!     ├── checkout-redesign/
//!     │   ├── index.mdx            # Frontmatter + case study body
//!     │   ├── cover.jpg            # Referenced from frontmatter
//!     │   └── flow-01.png
//!     └── ingest-pipeline/
//!         └── index.mdx
//! ```
//!
//! ## Slugs
//!
//! A project's slug is its frontmatter `slug` when present, otherwise the
//! folder name. Slugs must be unique and match `^[a-z0-9]+(-[a-z0-9]+)*$`.
//!
//! ## Validation
//!
//! The scanner enforces these rules:
//! - Every project folder has an `index.mdx` (or `index.md`) with frontmatter
//! - No two projects share a slug
//! - Slugs are lowercase, dash-separated words
//!
//! Image references are *not* checked here; a missing image degrades to a
//! placeholder at generate time.

use crate::config::{self, SiteConfig};
use crate::frontmatter::{self, FrontmatterError};
use crate::naming;
use crate::types::Project;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("Invalid slug {slug:?} in {path} (use lowercase letters, digits and single dashes)")]
    InvalidSlug { slug: String, path: PathBuf },
    #[error("Duplicate slug {slug:?}: {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Every loaded project, drafts included, in folder order.
    pub projects: Vec<Project>,
    /// Resume PDF path relative to the content root, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    pub config: SiteConfig,
}

const PROJECTS_DIR: &str = "projects";
const INDEX_FILES: &[&str] = &["index.mdx", "index.md"];

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let projects = scan_projects(root)?;

    let resume = Some(config.resume.file.clone()).filter(|file| root.join(file).is_file());
    if resume.is_none() {
        tracing::debug!(file = %config.resume.file, "no resume found");
    }

    Ok(Manifest {
        projects,
        resume,
        config,
    })
}

fn scan_projects(root: &Path) -> Result<Vec<Project>, ScanError> {
    let projects_dir = root.join(PROJECTS_DIR);
    if !projects_dir.is_dir() {
        tracing::warn!(dir = %projects_dir.display(), "no projects directory");
        return Ok(Vec::new());
    }

    let mut projects = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    let folders = WalkDir::new(&projects_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in folders {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let folder = entry.file_name().to_string_lossy().to_string();
        if folder.starts_with('.') || folder.starts_with('_') {
            continue;
        }

        let Some(index) = find_index(entry.path()) else {
            tracing::warn!(folder = %folder, "project folder has no index.mdx; skipping");
            continue;
        };

        let project = load_project(&index, &folder)?;

        if let Some(first) = seen.get(&project.slug) {
            return Err(ScanError::DuplicateSlug {
                slug: project.slug,
                first: first.clone(),
                second: project.source_dir,
            });
        }
        seen.insert(project.slug.clone(), project.source_dir.clone());
        projects.push(project);
    }

    Ok(projects)
}

fn find_index(folder: &Path) -> Option<PathBuf> {
    INDEX_FILES
        .iter()
        .map(|name| folder.join(name))
        .find(|p| p.is_file())
}

fn load_project(index: &Path, folder: &str) -> Result<Project, ScanError> {
    let source = fs::read_to_string(index)?;
    let (fm, body) = frontmatter::parse(&source).map_err(|source| ScanError::Frontmatter {
        path: index.to_path_buf(),
        source,
    })?;

    let slug = fm
        .slug
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| folder.to_string());
    if !naming::is_valid_slug(&slug) {
        return Err(ScanError::InvalidSlug {
            slug,
            path: index.to_path_buf(),
        });
    }

    Ok(Project {
        slug,
        title: fm.title,
        tagline: non_empty(fm.tagline),
        summary: non_empty(fm.summary),
        metric: non_empty(fm.metric),
        project_type: fm.project_type,
        date: non_empty(fm.date),
        featured: fm.featured,
        order: fm.order,
        draft: fm.draft,
        cover: fm.cover,
        gallery: fm.gallery,
        tech: fm.tech,
        roles: fm.roles,
        tags: fm.tags,
        links: fm.links,
        body,
        source_dir: format!("{PROJECTS_DIR}/{folder}"),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
