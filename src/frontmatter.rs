//! MDX frontmatter extraction.
//!
//! Every case study is a single `index.mdx` whose first lines are a YAML block
//! fenced by `---`:
//!
//! ```text
//! ---
//! title: "Checkout Redesign"
//! type: "design"
//! featured: true
//! tech: ["Figma", "React"]
//! cover:
//!   filename: "cover.jpg"
//!   alt: "Checkout flow on mobile"
//! ---
//!
//! ## Overview
//! ...
//! ```
//!
//! Unknown keys are ignored so authors can keep private notes in the block.
//! JSX components are not evaluated; top-level `import`/`export` statements
//! are dropped and the remainder is rendered as Markdown.

use crate::types::{Links, ProjectImage, ProjectType};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("missing opening `---` line")]
    MissingOpening,
    #[error("frontmatter block is never closed with `---`")]
    Unclosed,
    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Raw frontmatter as authored. Turned into a [`crate::types::Project`] by the scanner.
#[derive(Debug, Clone, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(rename = "type", default)]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub cover: Option<ProjectImage>,
    #[serde(default)]
    pub gallery: Vec<ProjectImage>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Links,
}

/// Split a document into its YAML block and body.
pub fn split(source: &str) -> Result<(&str, &str), FrontmatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = match source.split_once('\n') {
        Some((first, rest)) if first.trim_end() == "---" => rest,
        _ => return Err(FrontmatterError::MissingOpening),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }
    Err(FrontmatterError::Unclosed)
}

/// Parse a document into its frontmatter and Markdown body.
pub fn parse(source: &str) -> Result<(Frontmatter, String), FrontmatterError> {
    let (yaml, body) = split(source)?;
    let frontmatter: Frontmatter = serde_yaml_ng::from_str(yaml)?;
    Ok((frontmatter, strip_mdx_esm(body)))
}

/// Drop top-level MDX `import` / `export` statements.
///
/// Only unindented lines outside fenced code blocks are touched, so code
/// samples that happen to start with `import` survive.
pub fn strip_mdx_esm(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_fence = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        if !in_fence && (line.starts_with("import ") || line.starts_with("export ")) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAFFOLDED: &str = r#"---
slug: "social-integration-pd"
title: "Social Integration"
tagline: ""
date: "2024-05-01"
type: "engineering"
featured: false
cover:
  filename: "cover.jpg"
  alt: "Social Integration cover image"
gallery: []
tech: []
metric: ""
links: []
summary: ""
roles: []
order:
draft: true
---

## Overview

[Add project overview here]
"#;

    #[test]
    fn split_separates_yaml_and_body() {
        let (yaml, body) = split("---\ntitle: x\n---\nHello\n").unwrap();
        assert_eq!(yaml, "title: x\n");
        assert_eq!(body, "Hello\n");
    }

    #[test]
    fn split_tolerates_crlf_and_bom() {
        let (yaml, body) = split("\u{feff}---\r\ntitle: x\r\n---\r\nHello").unwrap();
        assert_eq!(yaml, "title: x\r\n");
        assert_eq!(body, "Hello");
    }

    #[test]
    fn split_requires_opening_fence() {
        assert!(matches!(
            split("title: x\n---\n"),
            Err(FrontmatterError::MissingOpening)
        ));
    }

    #[test]
    fn split_requires_closing_fence() {
        assert!(matches!(
            split("---\ntitle: x\nbody"),
            Err(FrontmatterError::Unclosed)
        ));
    }

    #[test]
    fn parses_scaffolded_template() {
        let (fm, body) = parse(SCAFFOLDED).unwrap();
        assert_eq!(fm.slug.as_deref(), Some("social-integration-pd"));
        assert_eq!(fm.project_type, Some(ProjectType::Engineering));
        assert_eq!(fm.order, None);
        assert!(fm.draft);
        assert!(fm.links.is_empty());
        assert_eq!(fm.cover.unwrap().filename, "cover.jpg");
        assert!(body.starts_with("## Overview"));
    }

    #[test]
    fn parses_links_in_order() {
        let src = "---\ntitle: T\nlinks:\n  live: https://a.example\n  github: https://b.example\n---\n";
        let (fm, _) = parse(src).unwrap();
        let keys: Vec<&str> = fm.links.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["live", "github"]);
    }

    #[test]
    fn unquoted_date_is_kept_as_text() {
        let (fm, _) = parse("---\ntitle: T\ndate: 2024-01-01\n---\n").unwrap();
        assert_eq!(fm.date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (fm, _) = parse("---\ntitle: T\ndescription: legacy\n---\n").unwrap();
        assert_eq!(fm.title, "T");
    }

    #[test]
    fn missing_title_is_an_error() {
        assert!(matches!(
            parse("---\ntagline: no title\n---\n"),
            Err(FrontmatterError::Yaml(_))
        ));
    }

    #[test]
    fn strips_esm_but_not_code_samples() {
        let body = "import Chart from './Chart'\n\n## Setup\n\n```js\nimport x from 'y'\n```\nexport const meta = {}\n";
        let out = strip_mdx_esm(body);
        assert!(!out.contains("import Chart"));
        assert!(!out.contains("export const"));
        assert!(out.contains("import x from 'y'"));
        assert!(out.starts_with("## Setup"));
    }
}
