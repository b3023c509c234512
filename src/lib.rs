//! # Folio
//!
//! A static site generator for a two-sided "engineer + designer" portfolio.
//! Case studies are MDX files with YAML frontmatter, one folder per project;
//! the generator turns them into a plain HTML site with a persona toggle,
//! skill filters and per-project pages.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (frontmatter → structured data)
//! 2. Generate  manifest  →  dist/            (registry → assets + HTML)
//! ```
//!
//! The manifest is human-readable JSON, so a scan can be inspected (or edited
//! by hand) before generating. Ordering, draft filtering and skill counting
//! all happen in the [`registry`] at generate time, so the same manifest can
//! be rendered for different environments.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads `projects/*/index.mdx` and `config.toml` into a manifest |
//! | [`generate`] | Stage 2: renders every page with Maud and writes the site |
//! | [`registry`] | Immutable project collection: display order, lookup, skill filtering and counts |
//! | [`assets`] | Content-hashed image and resume bundling, with placeholders for missing files |
//! | [`frontmatter`] | YAML frontmatter split and parse, MDX import/export stripping |
//! | [`mode`] | Engineer/designer persona and the guarded switch transition |
//! | [`config`] | `config.toml` loading, validation, merging and CSS color generation |
//! | [`scaffold`] | `folio new`: writes a draft case study template |
//! | [`types`] | Shared types serialized in the manifest (`Project`, `ProjectImage`) |
//! | [`naming`] | Slug validation and slugify for skills and headings |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), so malformed
//! markup is a build error and every interpolation is escaped. There is no
//! template directory to ship.
//!
//! ## Both Personas In Every Page
//!
//! The home page renders the engineer and designer variants side by side and
//! hides the inactive one. Switching persona is a class flip in the browser,
//! no second page load, and the site still works with JavaScript disabled.
//!
//! ## Skill Pages As Plain Links
//!
//! Every filter pill links to a pre-filtered `projects/skills/<skill>/` page.
//! Those pages carry every card and hide the non-matching ones, so the
//! embedded script can upgrade pills to multi-select (intersection) filtering
//! in place and clearing the filter shows the full list again.
//!
//! ## Missing Images Degrade
//!
//! A referenced image that is not on disk becomes a placeholder with the
//! configured aspect ratio and a warning, never a failed build.

pub mod assets;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod mode;
pub mod naming;
pub mod output;
pub mod registry;
pub mod scaffold;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
