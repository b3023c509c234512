//! New project scaffolding.
//!
//! `folio new <slug>` creates `projects/<slug>/index.mdx` with every
//! frontmatter field filled in or stubbed, marked `draft: true` so it stays
//! off the production site until it is ready.

use crate::naming;
use crate::types::ProjectType;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid slug {0:?} (use lowercase letters, digits and single dashes)")]
    InvalidSlug(String),
    #[error("Title is required")]
    MissingTitle,
    #[error("Project folder already exists: {0}")]
    Exists(PathBuf),
}

/// Answers for a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub slug: String,
    pub title: String,
    pub project_type: ProjectType,
    pub tagline: Option<String>,
    pub featured: bool,
}

const SECTIONS: &[(&str, &str)] = &[
    ("Overview", "Add project overview here"),
    ("Challenge", "Describe the main challenges and objectives"),
    ("Solution", "Explain your approach and implementation"),
    ("Outcome", "Share the results and impact"),
    ("Learnings", "Discuss key takeaways and lessons learned"),
];

/// Create the project folder and its `index.mdx`. Returns the file path.
pub fn create_project(
    content_root: &Path,
    new: &NewProject,
    today: NaiveDate,
) -> Result<PathBuf, ScaffoldError> {
    if !naming::is_valid_slug(&new.slug) {
        return Err(ScaffoldError::InvalidSlug(new.slug.clone()));
    }
    if new.title.trim().is_empty() {
        return Err(ScaffoldError::MissingTitle);
    }

    let dir = content_root.join("projects").join(&new.slug);
    if dir.exists() {
        return Err(ScaffoldError::Exists(dir));
    }
    fs::create_dir_all(&dir)?;

    let path = dir.join("index.mdx");
    fs::write(&path, render_template(new, today)?)?;
    tracing::info!(path = %path.display(), "created project");
    Ok(path)
}

/// YAML double-quoted scalar. JSON string syntax is a subset of it.
fn quote(value: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

// Written by hand rather than through serde_yaml_ng so the field order and
// the blank `order:` placeholder survive for the author to fill in.
fn render_template(new: &NewProject, today: NaiveDate) -> Result<String, serde_json::Error> {
    let tagline = new.tagline.as_deref().unwrap_or("");
    let mut out = String::from("---\n");
    out.push_str(&format!("slug: {}\n", quote(&new.slug)?));
    out.push_str(&format!("title: {}\n", quote(&new.title)?));
    out.push_str(&format!("tagline: {}\n", quote(tagline)?));
    out.push_str(&format!("date: \"{}\"\n", today.format("%Y-%m-%d")));
    out.push_str(&format!("type: \"{}\"\n", new.project_type.as_str()));
    out.push_str(&format!("featured: {}\n", new.featured));
    out.push_str("cover:\n");
    out.push_str("  filename: \"cover.jpg\"\n");
    out.push_str(&format!(
        "  alt: {}\n",
        quote(&format!("{} cover image", new.title))?
    ));
    out.push_str("gallery: []\n");
    out.push_str("tech: []\n");
    out.push_str("metric: \"\"\n");
    out.push_str("links: []\n");
    out.push_str("summary: \"\"\n");
    out.push_str("roles: []\n");
    out.push_str("order:\n");
    out.push_str("draft: true\n");
    out.push_str("---\n");

    for (heading, hint) in SECTIONS {
        out.push_str(&format!("\n## {heading}\n\n[{hint}]\n"));
    }
    Ok(out)
}
