//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every project leads with its positional index and title, in display
//! order. Slugs, folders and skills follow as indented context lines so the
//! output reads as a portfolio inventory while still pointing back at files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Projects
//! 001 Event Ingest Pipeline [engineering, featured]
//!     Slug: ingest
//!     Source: projects/ingest-pipeline/
//!     Skills: Rust, Kafka, Postgres
//!
//! Drafts (hidden)
//!     Untitled Experiment
//!         Source: projects/wip-experiment/
//!
//! Resume
//!     resume.pdf
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Show
//!
//! ```text
//! Event Ingest Pipeline [engineering, featured]
//!     Slug: ingest
//!     Source: projects/ingest-pipeline/
//!     Skills: Rust, Kafka, Postgres
//!     Page: projects/ingest/index.html
//! ```
//!
//! ## Skills
//!
//! ```text
//!   2 Figma
//!   2 React
//!   1 Kafka
//! ```
//!
//! ## Generate
//!
//! ```text
//! Sam Rivera → index.html
//! Projects → projects/index.html
//! Event Ingest Pipeline → projects/ingest/index.html
//!
//! Generated 4 projects, 11 skill pages, 18 pages
//! Images: 3 bundled, 1 placeholder
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O beyond existence checks, no side effects.

use crate::generate::GenerateSummary;
use crate::registry::{ProjectRegistry, SkillCount};
use crate::scan::Manifest;
use crate::types::Project;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// `[engineering, featured, draft]` style tag list; empty when nothing applies.
fn project_flags(project: &Project) -> String {
    let mut flags = Vec::new();
    if let Some(t) = project.project_type {
        flags.push(t.as_str());
    }
    if project.featured {
        flags.push("featured");
    }
    if project.draft {
        flags.push("draft");
    }
    if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Output file for a generated route.
fn route_file(route: &str) -> String {
    if route.is_empty() || route.ends_with('/') {
        format!("{route}index.html")
    } else {
        route.to_string()
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output: visible projects in display order, then hidden
/// drafts, the resume and the config file.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let registry = ProjectRegistry::new(
        manifest.projects.clone(),
        manifest.config.site.environment,
    );
    let visible = registry.list_visible();
    let mut lines = vec!["Projects".to_string()];

    if visible.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, project) in visible.iter().enumerate() {
        lines.push(format!(
            "{} {}{}",
            format_index(i + 1),
            project.title,
            project_flags(project)
        ));
        if project.source_dir != format!("projects/{}", project.slug) {
            lines.push(format!("    Slug: {}", project.slug));
        }
        lines.push(format!("    Source: {}/", project.source_dir));
        if let Some(tagline) = &project.tagline {
            lines.push(format!("    {}", truncate_desc(tagline, 60)));
        }
        if !project.tech.is_empty() {
            lines.push(format!("    Skills: {}", project.tech.join(", ")));
        }
    }

    let hidden: Vec<&Project> = registry
        .all()
        .iter()
        .filter(|p| !visible.iter().any(|v| v.slug == p.slug))
        .collect();
    if !hidden.is_empty() {
        lines.push(String::new());
        lines.push("Drafts (hidden)".to_string());
        for project in hidden {
            lines.push(format!("    {}", project.title));
            lines.push(format!("        Source: {}/", project.source_dir));
        }
    }

    lines.push(String::new());
    lines.push("Resume".to_string());
    match &manifest.resume {
        Some(file) => lines.push(format!("    {}", file)),
        None => lines.push(format!("    missing ({})", manifest.config.resume.file)),
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    } else {
        lines.push("    (defaults)".to_string());
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Registry queries
// ============================================================================

/// One line per project: index, slug and title.
pub fn format_project_list(projects: &[&Project]) -> Vec<String> {
    if projects.is_empty() {
        return vec!["No matching projects".to_string()];
    }
    let width = projects.iter().map(|p| p.slug.len()).max().unwrap_or(0);
    projects
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{} {:<width$}  {}{}",
                format_index(i + 1),
                p.slug,
                p.title,
                project_flags(p),
                width = width
            )
        })
        .collect()
}

/// Print project list to stdout.
pub fn print_project_list(projects: &[&Project]) {
    for line in format_project_list(projects) {
        println!("{}", line);
    }
}

/// Everything known about one project, for `folio show`.
///
/// `visible` says whether the project gets a page in the current environment.
pub fn format_project_detail(project: &Project, visible: bool) -> Vec<String> {
    let mut lines = vec![format!("{}{}", project.title, project_flags(project))];
    lines.push(format!("    Slug: {}", project.slug));
    lines.push(format!("    Source: {}/", project.source_dir));
    if let Some(tagline) = &project.tagline {
        lines.push(format!("    Tagline: {}", tagline));
    }
    if let Some(date) = &project.date {
        lines.push(format!("    Date: {}", date));
    }
    if let Some(metric) = &project.metric {
        lines.push(format!("    Metric: {}", metric));
    }
    if !project.tech.is_empty() {
        lines.push(format!("    Skills: {}", project.tech.join(", ")));
    }
    if !project.roles.is_empty() {
        lines.push(format!("    Roles: {}", project.roles.join(", ")));
    }
    for (name, url) in project.links.iter() {
        lines.push(format!("    Link: {} {}", name, url));
    }
    if visible {
        lines.push(format!("    Page: projects/{}/index.html", project.slug));
    } else {
        lines.push("    Page: none (draft, hidden in this environment)".to_string());
    }
    lines
}

/// Print project detail to stdout.
pub fn print_project_detail(project: &Project, visible: bool) {
    for line in format_project_detail(project, visible) {
        println!("{}", line);
    }
}

/// Skill counts, most used first.
pub fn format_skills(skills: &[SkillCount]) -> Vec<String> {
    if skills.is_empty() {
        return vec!["No skills".to_string()];
    }
    skills
        .iter()
        .map(|s| format!("{:>3} {}", s.count, s.skill))
        .collect()
}

/// Print skill counts to stdout.
pub fn print_skills(skills: &[SkillCount]) {
    for line in format_skills(skills) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output: each page with its output file, then totals.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .pages
        .iter()
        .map(|page| format!("{} → {}", page.title, route_file(&page.route)))
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(summary.projects, "project", "projects"),
        plural(summary.skill_pages, "skill page", "skill pages"),
        plural(summary.pages.len(), "page", "pages"),
    ));
    lines.push(format!(
        "Images: {} bundled, {}",
        summary.images_bundled,
        plural(summary.placeholders, "placeholder", "placeholders"),
    ));
    if !summary.resume {
        lines.push("Resume: missing".to_string());
    }
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}
