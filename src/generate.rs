//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest, builds the
//! [`ProjectRegistry`], bundles images and writes the final static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero, about + skills, project showcase and
//!   contact, rendered once per persona; the inactive persona is `hidden`
//! - **Project list** (`/projects/index.html`): every visible project with
//!   skill filter pills and counts
//! - **Skill pages** (`/projects/skills/{skill}/index.html`): the list
//!   pre-filtered to one skill, so pills work without JavaScript
//! - **Project pages** (`/projects/{slug}/index.html`): case study with
//!   metadata strip, table of contents, gallery, links and prev/next
//! - **Resume** (`/resume/index.html`): embedded PDF with a direct link
//! - **Not found** (`/404.html`)
//!
//! Every link is prefixed with `site.base_path`.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (persona colors injected from config)
//! - `static/mode.js`: persona toggle and multi-skill filtering
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::assets::{self, AssetError, AssetMap, ImageSource, ResolvedImage};
use crate::config::{self, SiteConfig};
use crate::mode::{Mode, ModeToggle};
use crate::naming;
use crate::registry::{ProjectRegistry, SkillCount, filter_by_skills};
use crate::scan::Manifest;
use crate::types::Project;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// One written page.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    /// Route relative to the base path, e.g. `projects/ingest/`
    pub route: String,
    pub title: String,
}

/// What a generate run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerateSummary {
    pub pages: Vec<GeneratedPage>,
    pub projects: usize,
    pub skill_pages: usize,
    pub images_bundled: usize,
    pub placeholders: usize,
    pub resume: bool,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/mode.js");

/// Generate the site from a manifest file written by the scan stage.
pub fn generate(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, source_root, output_dir)
}

/// Generate the site from an in-memory manifest.
pub fn generate_site(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let config = &manifest.config;
    let registry = ProjectRegistry::new(manifest.projects.clone(), config.site.environment);
    let visible = registry.list_visible();

    fs::create_dir_all(output_dir)?;
    clear_previous_build(output_dir)?;
    let assets = assets::bundle(
        &visible,
        manifest.resume.as_deref(),
        source_root,
        output_dir,
        config,
    )?;

    let site = Site::new(config);
    let mut summary = GenerateSummary {
        projects: visible.len(),
        images_bundled: assets.bundled_count(),
        placeholders: assets.placeholder_count(),
        resume: assets.resume.is_some(),
        ..Default::default()
    };
    let mut write = |route: &str, title: &str, markup: Markup| -> std::io::Result<()> {
        write_page(output_dir, route, markup)?;
        tracing::debug!(route, "generated");
        summary.pages.push(GeneratedPage {
            route: route.to_string(),
            title: title.to_string(),
        });
        Ok(())
    };

    write("", &config.site.title, render_index(&site, &registry, &assets))?;

    let skills = registry.all_skills(None);
    write(
        "projects/",
        "Projects",
        render_project_list(&site, &registry, &assets, &skills, None),
    )?;

    let skill_routes = skill_slugs(&skills);
    for (skill, slug) in skills.iter().zip(&skill_routes) {
        let route = format!("projects/skills/{slug}/");
        let title = format!("Projects · {}", skill.skill);
        let page = render_project_list(&site, &registry, &assets, &skills, Some(&skill.skill));
        write(&route, &title, page)?;
    }

    for project in &visible {
        let route = format!("projects/{}/", project.slug);
        let page = render_project_page(&site, &registry, &assets, project);
        write(&route, &project.title, page)?;
    }

    if assets.resume.is_none() {
        tracing::warn!("no resume bundled; /resume/ will show an error state");
    }
    write("resume/", "Resume", render_resume_page(&site, &assets))?;
    write("404.html", "Not found", render_not_found(&site))?;

    summary.skill_pages = skill_routes.len();
    Ok(summary)
}

/// Directories whose contents depend on the project set. They are rebuilt
/// from scratch so pages and assets from an earlier run (a draft rendered in
/// development, a renamed slug, an old image hash) never survive.
const GENERATED_DIRS: &[&str] = &["projects", "assets"];

fn clear_previous_build(output_dir: &Path) -> std::io::Result<()> {
    for dir in GENERATED_DIRS {
        let path = output_dir.join(dir);
        if path.is_dir() {
            tracing::debug!(dir = %path.display(), "removing previous build output");
            fs::remove_dir_all(&path)?;
        }
    }
    Ok(())
}

/// Write a page. Routes ending in `/` become `<route>index.html`.
fn write_page(output_dir: &Path, route: &str, markup: Markup) -> std::io::Result<()> {
    let path = if route.is_empty() || route.ends_with('/') {
        output_dir.join(route).join("index.html")
    } else {
        output_dir.join(route)
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())
}

/// Route slugs for skill filter pages, unique even when two labels slugify
/// to the same string.
pub fn skill_slugs(skills: &[SkillCount]) -> Vec<String> {
    let mut used = HashSet::new();
    skills
        .iter()
        .map(|s| {
            let base = Some(naming::slugify(&s.skill))
                .filter(|slug| !slug.is_empty())
                .unwrap_or_else(|| "skill".to_string());
            let mut slug = base.clone();
            let mut n = 2;
            while !used.insert(slug.clone()) {
                slug = format!("{base}-{n}");
                n += 1;
            }
            slug
        })
        .collect()
}

// ============================================================================
// Markdown
// ============================================================================

/// A heading found in a case study body.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Render Markdown to HTML, giving every heading a unique `id`.
pub fn render_markdown(body: &str) -> (String, Vec<Heading>) {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let events: Vec<Event> = Parser::new_ext(body, options).collect();

    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;
    for event in &events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u8, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    headings.push((level, text));
                }
            }
            _ => {}
        }
    }

    let mut used = HashSet::new();
    let headings: Vec<Heading> = headings
        .into_iter()
        .map(|(level, text)| {
            let base = Some(naming::slugify(&text))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "section".to_string());
            let mut id = base.clone();
            let mut n = 1;
            while !used.insert(id.clone()) {
                id = format!("{base}-{n}");
                n += 1;
            }
            Heading { level, id, text }
        })
        .collect();

    let mut ids = headings.iter().map(|h| h.id.clone());
    let events = events.into_iter().map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id: _,
            classes,
            attrs,
        }) => Event::Start(Tag::Heading {
            level,
            id: ids.next().map(CowStr::from),
            classes,
            attrs,
        }),
        other => other,
    });

    let mut out = String::new();
    md_html::push_html(&mut out, events);
    (out, headings)
}

// ============================================================================
// HTML Components
// ============================================================================

struct Site<'a> {
    config: &'a SiteConfig,
    base: &'a str,
    css: String,
    /// Initial toggle state; the page script replays its timings.
    toggle: ModeToggle,
}

impl<'a> Site<'a> {
    fn new(config: &'a SiteConfig) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        Self {
            config,
            base: &config.site.base_path,
            css: format!("{}\n\n{}", color_css, CSS_STATIC),
            toggle: ModeToggle::new(config.site.default_mode),
        }
    }

    fn default_mode(&self) -> Mode {
        self.toggle.mode()
    }

    fn project_url(&self, project: &Project) -> String {
        format!("{}projects/{}/", self.base, project.slug)
    }
}

/// Renders the base HTML document structure.
fn base_document(site: &Site, title: &str, content: Markup) -> Markup {
    let page_title = if title == site.config.site.title {
        title.to_string()
    } else {
        format!("{} · {}", title, site.config.site.title)
    };
    let t = site.toggle.timings();
    html! {
        (DOCTYPE)
        html lang="en" data-mode=(site.default_mode().as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                style { (PreEscaped(&site.css)) }
            }
            body
                data-transition-enter=(t.enter.as_millis() as u64)
                data-transition-hold=(t.hold.as_millis() as u64)
                data-transition-exit=(t.exit.as_millis() as u64)
            {
                (site_header(site))
                (content)
                div.mode-overlay aria-hidden="true" {}
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Header with brand, page links and the persona toggle.
fn site_header(site: &Site) -> Markup {
    let base = site.base;
    html! {
        header.site-header {
            a.brand href=(base) { (site.config.profile.name) }
            nav.site-nav {
                a href={ (base) "projects/" } { "Work" }
                a href={ (base) "#about" } { "About" }
                a href={ (base) "resume/" } { "Resume" }
                a href={ (base) "#contact" } { "Contact" }
            }
            button.mode-toggle type="button" data-mode-toggle aria-label="Switch persona" {
                span.mode-label data-for="engineer" { "Engineer" }
                span.mode-label data-for="designer" { "Designer" }
            }
        }
    }
}

/// Wrap per-persona content; only the default persona starts visible.
fn mode_variants(site: &Site, render: impl Fn(Mode) -> Markup) -> Markup {
    html! {
        @for mode in [Mode::Engineer, Mode::Designer] {
            div.mode-variant data-mode-variant=(mode.as_str()) hidden[mode != site.default_mode()] {
                (render(mode))
            }
        }
    }
}

/// Renders an image, or a same-shaped placeholder when it is missing.
fn render_image(image: &ResolvedImage, class: &str) -> Markup {
    match &image.source {
        ImageSource::Bundled { url, dimensions } => html! {
            img class=(class) src=(url) alt=(image.alt)
                width=[dimensions.map(|d| d.0)]
                height=[dimensions.map(|d| d.1)]
                loading="lazy";
        },
        ImageSource::Placeholder { aspect: (w, h) } => {
            let style = format!("aspect-ratio: {w} / {h};");
            html! {
                div class={ (class) " image-placeholder" } role="img" aria-label=(image.alt) style=(style) {}
            }
        }
    }
}

fn tech_list(tech: &[String]) -> Markup {
    html! {
        @if !tech.is_empty() {
            ul.tech-list {
                @for skill in tech {
                    li { (skill) }
                }
            }
        }
    }
}

/// Card linking to a project page; `data-tech` (a JSON array) drives
/// client-side filtering.
fn project_card(site: &Site, assets: &AssetMap, project: &Project, hidden: bool) -> Markup {
    let data_tech = serde_json::Value::from(project.tech.clone()).to_string();
    html! {
        a.project-card href=(site.project_url(project)) hidden[hidden] data-tech=(data_tech)
            data-type=[project.project_type.map(|t| t.as_str())]
        {
            @if let Some(cover) = &project.cover {
                (render_image(&assets.resolve(project, cover), "card-cover"))
            }
            div.card-body {
                h3 { (project.title) }
                @if let Some(tagline) = &project.tagline {
                    p.tagline { (tagline) }
                }
                @if let Some(metric) = &project.metric {
                    p.metric { (metric) }
                }
                (tech_list(&project.tech))
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Home page: hero, about, showcase and contact for each persona.
fn render_index(site: &Site, registry: &ProjectRegistry, assets: &AssetMap) -> Markup {
    let profile = &site.config.profile;
    let base = site.base;

    let content = html! {
        main.home {
            section.hero {
                (mode_variants(site, |mode| {
                    let persona = profile.persona(mode);
                    html! {
                        p.eyebrow { (profile.name) " · " (mode.as_str()) }
                        h1 { (persona.headline) }
                        @if !profile.location.is_empty() {
                            p.location { (profile.location) }
                        }
                        div.hero-actions {
                            a.button href="#projects" { "View work" }
                            a.button.secondary href="#contact" { "Get in touch" }
                        }
                    }
                }))
            }
            section.about id="about" {
                h2 { "About" }
                (mode_variants(site, |mode| {
                    let persona = profile.persona(mode);
                    let skills: Vec<String> = if persona.skills.is_empty() {
                        registry
                            .all_skills(Some(mode.project_type()))
                            .into_iter()
                            .take(8)
                            .map(|s| s.skill)
                            .collect()
                    } else {
                        persona.skills.clone()
                    };
                    html! {
                        @if !persona.intro.is_empty() {
                            p.intro { (persona.intro) }
                        }
                        (tech_list(&skills))
                    }
                }))
            }
            section.projects id="projects" {
                (mode_variants(site, |mode| {
                    let projects = registry.by_type(mode.project_type());
                    html! {
                        h2 { @if mode == Mode::Engineer { "Engineering work" } @else { "Design work" } }
                        @if projects.is_empty() {
                            p.empty-state { "Nothing here yet." }
                        } @else {
                            div.project-grid {
                                @for project in &projects {
                                    (project_card(site, assets, project, false))
                                }
                            }
                        }
                    }
                }))
                a.all-projects href={ (base) "projects/" } { "All projects →" }
            }
            section.contact id="contact" {
                h2 { "Contact" }
                @if !profile.email.is_empty() {
                    a.email href={ "mailto:" (profile.email) } { (profile.email) }
                }
                @if !profile.social.is_empty() {
                    ul.social {
                        @for link in &profile.social {
                            li { a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.label) } }
                        }
                    }
                }
            }
        }
    };

    base_document(site, &site.config.site.title, content)
}

/// Project list, optionally pre-filtered to one skill.
fn render_project_list(
    site: &Site,
    registry: &ProjectRegistry,
    assets: &AssetMap,
    skills: &[SkillCount],
    selected: Option<&str>,
) -> Markup {
    let base = site.base;
    let visible = registry.list_visible();
    let selected_skills: Vec<&str> = selected.into_iter().collect();
    // Every visible card is rendered; non-matching ones start hidden so the
    // script can widen the selection again.
    let matching: HashSet<&str> = filter_by_skills(&visible, &selected_skills)
        .iter()
        .map(|p| p.slug.as_str())
        .collect();
    let routes = skill_slugs(skills);

    let title = match selected {
        Some(skill) => format!("Projects · {skill}"),
        None => "Projects".to_string(),
    };

    let content = html! {
        main.project-list {
            h1 { "Projects" }
            div.filter-bar data-filter-bar {
                div.filter-header {
                    h2 { "Filter by Skills" }
                    p.filter-status data-filter-status {
                        @if selected.is_some() { "1 filter active" }
                    }
                    a.filter-clear href={ (base) "projects/" } data-filter-clear hidden[selected.is_none()] {
                        "Clear all"
                    }
                }
                div.filter-pills {
                    @for (skill, route) in skills.iter().zip(&routes) {
                        @let active = selected == Some(skill.skill.as_str());
                        a.filter-pill.active[active]
                            href={ (base) "projects/skills/" (route) "/" }
                            data-skill=(skill.skill)
                        {
                            span { (skill.skill) }
                            span.count { (skill.count) }
                        }
                    }
                }
            }
            div.project-grid data-project-grid {
                @for project in &visible {
                    (project_card(site, assets, project, !matching.contains(project.slug.as_str())))
                }
            }
            p.empty-state data-empty-state hidden[!matching.is_empty()] {
                "No projects match all selected skills."
            }
        }
    };

    base_document(site, &title, content)
}

/// Metadata strip: deliverables, roles, type, completion date, metric.
fn metadata_strip(project: &Project) -> Markup {
    let mut rows: Vec<(&str, String)> = Vec::new();
    if !project.tags.is_empty() {
        rows.push(("Deliverables", project.tags.join(", ")));
    }
    if !project.roles.is_empty() {
        rows.push(("My Role", project.roles.join(", ")));
    }
    if let Some(t) = project.project_type {
        rows.push(("Type", naming::display_label(t.as_str())));
    }
    if let Some(date) = project.date_value() {
        rows.push(("Completed", date.format("%B %Y").to_string()));
    }

    html! {
        @if !rows.is_empty() || project.metric.is_some() {
            div.metadata-strip {
                @for (label, value) in &rows {
                    div.metadata-item {
                        div.metadata-label { (label) }
                        div.metadata-value { (value) }
                    }
                }
                @if let Some(metric) = &project.metric {
                    div.metadata-item.metric {
                        div.metadata-label { "Impact" }
                        div.metadata-value { (metric) }
                    }
                }
            }
        }
    }
}

fn table_of_contents(headings: &[Heading]) -> Markup {
    let entries: Vec<&Heading> = headings
        .iter()
        .filter(|h| h.level == 2 || h.level == 3)
        .collect();
    html! {
        @if !entries.is_empty() {
            nav.toc aria-label="Table of contents" {
                h2 { "On this page" }
                ul {
                    @for h in entries {
                        li class={ "toc-level-" (h.level) } {
                            a href={ "#" (h.id) } { (h.text) }
                        }
                    }
                }
            }
        }
    }
}

/// Renders a project case study.
fn render_project_page(
    site: &Site,
    registry: &ProjectRegistry,
    assets: &AssetMap,
    project: &Project,
) -> Markup {
    let base = site.base;
    let (body_html, headings) = render_markdown(&project.body);
    let (prev, next) = registry.neighbors(&project.slug);

    let content = html! {
        main.project-page {
            header.project-hero {
                a.back href={ (base) "#projects" } { "← Back" }
                h1 { (project.title) }
                @if let Some(tagline) = &project.tagline {
                    p.tagline { (tagline) }
                }
                @if let Some(cover) = &project.cover {
                    (render_image(&assets.resolve(project, cover), "hero-cover"))
                }
            }
            (metadata_strip(project))
            div.project-layout {
                (table_of_contents(&headings))
                article.project-body {
                    @if project.body.trim().is_empty() {
                        @if let Some(summary) = &project.summary {
                            p { (summary) }
                        }
                    } @else {
                        (PreEscaped(body_html))
                    }
                    (tech_list(&project.tech))
                }
            }
            @if !project.gallery.is_empty() {
                section.gallery {
                    @for image in &project.gallery {
                        @let resolved = assets.resolve(project, image);
                        figure {
                            (render_image(&resolved, "gallery-image"))
                            @if let Some(caption) = &resolved.caption {
                                figcaption { (caption) }
                            }
                        }
                    }
                }
            }
            footer.project-footer {
                @if !project.links.is_empty() {
                    div.project-links {
                        h2 { "Links" }
                        @for (name, url) in project.links.iter() {
                            a.button href=(url) target="_blank" rel="noopener noreferrer" {
                                (naming::display_label(name))
                            }
                        }
                    }
                }
                nav.project-nav {
                    div {
                        @if let Some(p) = prev {
                            a.prev href=(site.project_url(p)) {
                                span.direction { "Previous" }
                                span.title { (p.title) }
                            }
                        }
                    }
                    a.button.ghost href={ (base) "#projects" } { "Back to Projects" }
                    div {
                        @if let Some(n) = next {
                            a.next href=(site.project_url(n)) {
                                span.direction { "Next" }
                                span.title { (n.title) }
                            }
                        }
                    }
                }
            }
        }
    };

    base_document(site, &project.title, content)
}

/// Resume viewer, or an inline error state when no PDF was bundled.
fn render_resume_page(site: &Site, assets: &AssetMap) -> Markup {
    let content = html! {
        main.resume-page {
            h1 { "Resume" }
            @if let Some(url) = &assets.resume {
                object.resume-viewer data=(url) type="application/pdf" {
                    p.resume-fallback {
                        "This browser can't display the PDF inline. "
                        a href=(url) { "Open the resume directly" }
                    }
                }
                a.button href=(url) target="_blank" rel="noopener" { "Open directly" }
            } @else {
                div.resume-error role="alert" {
                    p { "The resume could not be loaded." }
                    a href=(site.base) { "Go home" }
                }
            }
        }
    };
    base_document(site, "Resume", content)
}

/// Catch-all page for unknown routes and missing project slugs.
fn render_not_found(site: &Site) -> Markup {
    let content = html! {
        main.not-found {
            h1 { "Not found" }
            p { "Project not found." }
            a href=(site.base) { "Go home" }
        }
    };
    base_document(site, "Not found", content)
}

// ============================================================================
// Tests
// ============================================================================
