//! Shared types used across all pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → generate) and
//! are the only shape a project record ever has: once a [`Project`] leaves
//! the scanner it is never mutated.

use chrono::{DateTime, NaiveDate};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Audience a project is written for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Engineering,
    Design,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Engineering => "engineering",
            ProjectType::Design => "design",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build environment. Drafts are only listed in development.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn shows_drafts(self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// An image referenced from frontmatter, relative to the project folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub filename: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Named external links in declaration order (`github`, `live`, ...).
///
/// Accepts a mapping, or an empty list / null for "no links" since the
/// project scaffold writes `links: []`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links(pub Vec<(String, String)>);

impl Links {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, url) in &self.0 {
            map.serialize_entry(name, url)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinksVisitor;

        impl<'de> Visitor<'de> for LinksVisitor {
            type Value = Links;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of link names to URLs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Links, A::Error> {
                let mut links = Vec::new();
                while let Some((name, url)) = access.next_entry::<String, String>()? {
                    links.push((name, url));
                }
                Ok(Links(links))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Links, A::Error> {
                if access.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(
                        "links must be a map of name: url, not a list",
                    ));
                }
                Ok(Links::default())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Links, E> {
                Ok(Links::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Links, E> {
                Ok(Links::default())
            }
        }

        deserializer.deserialize_any(LinksVisitor)
    }
}

/// Sentinel rank for projects without an explicit `order`.
pub const UNORDERED: i64 = 9999;

/// One portfolio case study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier; frontmatter `slug` or the folder name
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    /// Raw date string as authored (`YYYY-MM-DD` or RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<ProjectImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<ProjectImage>,
    /// Skills / technologies, used for display and filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tech: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Deliverables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    /// Markdown body with MDX import/export lines removed
    #[serde(default)]
    pub body: String,
    /// Folder relative to the content root (`projects/<folder>`)
    pub source_dir: String,
}

impl Project {
    /// Explicit rank, or [`UNORDERED`] when absent.
    pub fn rank(&self) -> i64 {
        self.order.unwrap_or(UNORDERED)
    }

    /// Parsed date. Unparseable or missing dates yield `None`, which sorts
    /// as the oldest possible date.
    pub fn date_value(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.tech.iter().any(|t| t == skill)
    }

    /// Every image this project references: cover first, then gallery.
    pub fn images(&self) -> impl Iterator<Item = &ProjectImage> {
        self.cover.iter().chain(self.gallery.iter())
    }
}
