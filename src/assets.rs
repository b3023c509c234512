//! Image and resume bundling.
//!
//! Every image a visible project references (cover and gallery) is copied
//! into the output tree under a content-hashed name, the way a front-end
//! bundler would:
//!
//! ```text
//! content/projects/checkout-redesign/cover.png
//!   → dist/assets/checkout-redesign/cover-1a2b3c4d.png
//! ```
//!
//! The hash is a prefix of the file's SHA-256, so a changed image always gets
//! a new URL and unchanged images keep theirs across builds.
//!
//! ## Missing images
//!
//! A reference to a file that does not exist is not an error. It resolves to
//! [`ImageSource::Placeholder`] with the configured aspect ratio and logs a
//! warning; the page renders a block of the same shape instead of a broken
//! `<img>`.
//!
//! ## Parallelism
//!
//! Files are hashed and copied in parallel with [rayon](https://docs.rs/rayon);
//! the global pool size comes from `processing.max_processes`.

use crate::config::SiteConfig;
use crate::types::{Project, ProjectImage};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error bundling {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where an image reference ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Bundled {
        /// Absolute URL including the base path
        url: String,
        /// Pixel size when the file could be decoded
        dimensions: Option<(u32, u32)>,
    },
    Placeholder {
        aspect: (u32, u32),
    },
}

/// An image reference ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub source: ImageSource,
    pub alt: String,
    pub caption: Option<String>,
}

/// Output of [`bundle`]: lookup table from references to bundled URLs.
#[derive(Debug, Clone, Default)]
pub struct AssetMap {
    images: HashMap<(String, String), ImageSource>,
    placeholder_aspect: (u32, u32),
    /// URL of the bundled resume PDF
    pub resume: Option<String>,
}

impl AssetMap {
    pub fn resolve(&self, project: &Project, image: &ProjectImage) -> ResolvedImage {
        let key = (project.slug.clone(), image.filename.clone());
        let source = self
            .images
            .get(&key)
            .cloned()
            .unwrap_or(ImageSource::Placeholder {
                aspect: self.placeholder_aspect,
            });
        ResolvedImage {
            source,
            alt: image.alt.clone(),
            caption: image.caption.clone(),
        }
    }

    pub fn bundled_count(&self) -> usize {
        self.images
            .values()
            .filter(|s| matches!(s, ImageSource::Bundled { .. }))
            .count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.images.len() - self.bundled_count()
    }
}

struct Job<'a> {
    slug: &'a str,
    source_dir: &'a str,
    filename: &'a str,
}

/// Hash and copy every image the given projects reference, plus the resume.
pub fn bundle(
    projects: &[&Project],
    resume: Option<&str>,
    source_root: &Path,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<AssetMap, AssetError> {
    let [w, h] = config.images.placeholder_aspect;
    let placeholder_aspect = (w, h);
    let base = &config.site.base_path;
    let hash_len = config.images.hash_length;

    let mut seen = BTreeSet::new();
    let mut jobs = Vec::new();
    for project in projects {
        for image in project.images() {
            if seen.insert((project.slug.as_str(), image.filename.as_str())) {
                jobs.push(Job {
                    slug: &project.slug,
                    source_dir: &project.source_dir,
                    filename: &image.filename,
                });
            }
        }
    }

    let bundled: Vec<((String, String), ImageSource)> = jobs
        .par_iter()
        .map(|job| {
            let source = bundle_image(job, source_root, output_dir, base, hash_len)?
                .unwrap_or(ImageSource::Placeholder {
                    aspect: placeholder_aspect,
                });
            Ok::<_, AssetError>(((job.slug.to_string(), job.filename.to_string()), source))
        })
        .collect::<Result<_, AssetError>>()?;

    let resume = match resume {
        Some(file) => {
            let src = source_root.join(file);
            let rel = copy_hashed(&src, Path::new("assets"), "resume", output_dir, hash_len)?;
            Some(format!("{base}{rel}"))
        }
        None => None,
    };

    Ok(AssetMap {
        images: bundled.into_iter().collect(),
        placeholder_aspect,
        resume,
    })
}

fn bundle_image(
    job: &Job,
    source_root: &Path,
    output_dir: &Path,
    base: &str,
    hash_len: usize,
) -> Result<Option<ImageSource>, AssetError> {
    if !is_plain_relative(job.filename) {
        tracing::warn!(
            project = job.slug,
            image = job.filename,
            "image path leaves the project folder; rendering placeholder"
        );
        return Ok(None);
    }

    let src = source_root.join(job.source_dir).join(job.filename);
    if !src.is_file() {
        tracing::warn!(
            project = job.slug,
            image = %src.display(),
            "image not found; rendering placeholder"
        );
        return Ok(None);
    }

    let dimensions = match image::image_dimensions(&src) {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::debug!(image = %src.display(), error = %e, "could not read image size");
            None
        }
    };

    let stem = Path::new(job.filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let dir = Path::new("assets").join(job.slug);
    let rel = copy_hashed(&src, &dir, &stem, output_dir, hash_len)?;

    Ok(Some(ImageSource::Bundled {
        url: format!("{base}{rel}"),
        dimensions,
    }))
}

/// Copy `src` to `<output>/<dir>/<stem>-<hash>.<ext>`, returning the relative path.
fn copy_hashed(
    src: &Path,
    dir: &Path,
    stem: &str,
    output_dir: &Path,
    hash_len: usize,
) -> Result<String, AssetError> {
    let io_err = |source| AssetError::Io {
        path: src.display().to_string(),
        source,
    };

    let bytes = fs::read(src).map_err(io_err)?;
    let digest = format!("{:x}", Sha256::digest(&bytes));
    let hash = &digest[..hash_len.min(digest.len())];

    let filename = match src.extension() {
        Some(ext) => format!("{stem}-{hash}.{}", ext.to_string_lossy().to_lowercase()),
        None => format!("{stem}-{hash}"),
    };
    let rel = dir.join(filename);

    let dest = output_dir.join(&rel);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&dest, &bytes).map_err(io_err)?;

    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// True for paths like `cover.jpg` or `shots/01.png`; false for anything
/// absolute or containing `..`.
fn is_plain_relative(filename: &str) -> bool {
    !filename.is_empty()
        && Path::new(filename)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
