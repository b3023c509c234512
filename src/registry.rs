//! The project registry: ordering, lookup and skill filtering.
//!
//! Built once from the scanned projects and never mutated. Display order is a
//! strict total order:
//!
//! 1. featured projects first
//! 2. explicit `order` ascending (missing = 9999)
//! 3. date descending (missing or unparseable dates last)
//! 4. slug ascending
//!
//! Drafts are hidden from every listing unless the environment is
//! development. Slug lookups see drafts too, so a direct link to a draft
//! still resolves.

use crate::types::{Environment, Project, ProjectType};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A skill label with the number of visible projects using it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    all: Vec<Project>,
    /// Indices into `all`, in display order.
    visible: Vec<usize>,
}

impl ProjectRegistry {
    pub fn new(projects: Vec<Project>, env: Environment) -> Self {
        let mut visible: Vec<usize> = projects
            .iter()
            .enumerate()
            .filter(|(_, p)| env.shows_drafts() || !p.draft)
            .map(|(i, _)| i)
            .collect();
        visible.sort_by(|&a, &b| display_order(&projects[a], &projects[b]));
        Self {
            all: projects,
            visible,
        }
    }

    /// Every loaded project, drafts included, in load order.
    pub fn all(&self) -> &[Project] {
        &self.all
    }

    /// Visible projects in display order.
    pub fn list_visible(&self) -> Vec<&Project> {
        self.visible.iter().map(|&i| &self.all[i]).collect()
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Project> {
        self.all.iter().find(|p| p.slug == slug)
    }

    /// Visible projects of one type, in display order.
    pub fn by_type(&self, project_type: ProjectType) -> Vec<&Project> {
        self.list_visible()
            .into_iter()
            .filter(|p| p.project_type == Some(project_type))
            .collect()
    }

    /// Previous and next visible projects around `slug`.
    pub fn neighbors(&self, slug: &str) -> (Option<&Project>, Option<&Project>) {
        let visible = self.list_visible();
        let Some(pos) = visible.iter().position(|p| p.slug == slug) else {
            return (None, None);
        };
        let prev = pos.checked_sub(1).map(|i| visible[i]);
        let next = visible.get(pos + 1).copied();
        (prev, next)
    }

    /// Distinct skills across visible projects (optionally one type), most
    /// used first, ties broken alphabetically.
    pub fn all_skills(&self, project_type: Option<ProjectType>) -> Vec<SkillCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for project in self.list_visible() {
            if project_type.is_some_and(|t| project.project_type != Some(t)) {
                continue;
            }
            let mut seen = Vec::new();
            for skill in &project.tech {
                // A skill listed twice on one project still counts once.
                if !seen.contains(&skill.as_str()) {
                    seen.push(skill.as_str());
                    *counts.entry(skill.as_str()).or_default() += 1;
                }
            }
        }

        let mut skills: Vec<SkillCount> = counts
            .into_iter()
            .map(|(skill, count)| SkillCount {
                skill: skill.to_string(),
                count,
            })
            .collect();
        skills.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| compare_labels(&a.skill, &b.skill))
        });
        skills
    }
}

/// Keep projects whose skills include every requested skill.
///
/// An empty request returns the input unchanged.
pub fn filter_by_skills<'a, S: AsRef<str>>(
    projects: &[&'a Project],
    skills: &[S],
) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| skills.iter().all(|s| p.has_skill(s.as_ref())))
        .copied()
        .collect()
}

fn display_order(a: &Project, b: &Project) -> Ordering {
    b.featured
        .cmp(&a.featured)
        .then_with(|| a.rank().cmp(&b.rank()))
        .then_with(|| b.date_value().cmp(&a.date_value()))
        .then_with(|| a.slug.cmp(&b.slug))
}

/// Case-insensitive label order, falling back to byte order for labels that
/// differ only in case.
fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Links;

    fn project(slug: &str) -> Project {
        Project {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            tagline: None,
            summary: None,
            metric: None,
            project_type: None,
            date: None,
            featured: false,
            order: None,
            draft: false,
            cover: None,
            gallery: vec![],
            tech: vec![],
            roles: vec![],
            tags: vec![],
            links: Links::default(),
            body: String::new(),
            source_dir: format!("projects/{slug}"),
        }
    }

    fn with(slug: &str, f: impl FnOnce(&mut Project)) -> Project {
        let mut p = project(slug);
        f(&mut p);
        p
    }

    fn slugs(projects: &[&Project]) -> Vec<String> {
        projects.iter().map(|p| p.slug.clone()).collect()
    }

    fn typed(slug: &str, t: ProjectType, tech: &[&str]) -> Project {
        with(slug, |p| {
            p.project_type = Some(t);
            p.tech = tech.iter().map(|s| s.to_string()).collect();
        })
    }

    #[test]
    fn featured_then_order_then_date() {
        let projects = vec![
            with("c", |p| p.date = Some("2024-01-01".into())),
            with("a", |p| {
                p.featured = true;
                p.order = Some(2);
            }),
            with("b", |p| {
                p.featured = true;
                p.order = Some(1);
            }),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        assert_eq!(slugs(&registry.list_visible()), vec!["b", "a", "c"]);
    }

    #[test]
    fn ordered_projects_precede_unordered() {
        let projects = vec![
            with("new", |p| p.date = Some("2025-01-01".into())),
            with("ranked", |p| {
                p.order = Some(50);
                p.date = Some("2019-01-01".into());
            }),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        assert_eq!(slugs(&registry.list_visible()), vec!["ranked", "new"]);
    }

    #[test]
    fn newer_dates_first_and_undated_last() {
        let projects = vec![
            with("undated", |_| {}),
            with("old", |p| p.date = Some("2020-05-01".into())),
            with("garbage", |p| p.date = Some("someday".into())),
            with("new", |p| p.date = Some("2023-05-01".into())),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        assert_eq!(
            slugs(&registry.list_visible()),
            vec!["new", "old", "garbage", "undated"]
        );
    }

    #[test]
    fn full_ties_break_on_slug() {
        let projects = vec![project("zeta"), project("alpha"), project("mid")];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        assert_eq!(
            slugs(&registry.list_visible()),
            vec!["alpha", "mid", "zeta"]
        );
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let registry = ProjectRegistry::new(vec![], Environment::Production);
        assert!(registry.list_visible().is_empty());
        assert!(registry.all_skills(None).is_empty());
    }

    #[test]
    fn drafts_hidden_outside_development() {
        let projects = vec![project("live"), with("draft", |p| p.draft = true)];

        for env in [Environment::Production, Environment::Staging] {
            let registry = ProjectRegistry::new(projects.clone(), env);
            assert_eq!(slugs(&registry.list_visible()), vec!["live"]);
        }

        let dev = ProjectRegistry::new(projects, Environment::Development);
        assert_eq!(slugs(&dev.list_visible()), vec!["draft", "live"]);
    }

    #[test]
    fn get_by_slug_finds_drafts_and_misses_cleanly() {
        let projects = vec![project("live"), with("draft", |p| p.draft = true)];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        assert_eq!(registry.get_by_slug("draft").unwrap().slug, "draft");
        assert!(registry.get_by_slug("nope").is_none());
    }

    #[test]
    fn filter_single_skill() {
        let projects = vec![
            typed("a", ProjectType::Design, &["Figma", "React"]),
            typed("b", ProjectType::Engineering, &["Rust"]),
            typed("c", ProjectType::Engineering, &["React"]),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        let visible = registry.list_visible();
        assert_eq!(slugs(&filter_by_skills(&visible, &["Figma"])), vec!["a"]);
    }

    #[test]
    fn filter_requires_every_skill() {
        let projects = vec![
            typed("a", ProjectType::Design, &["Figma", "React"]),
            typed("c", ProjectType::Engineering, &["React"]),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        let visible = registry.list_visible();
        assert_eq!(
            slugs(&filter_by_skills(&visible, &["React", "Figma"])),
            vec!["a"]
        );
        assert!(filter_by_skills(&visible, &["React", "Figma", "Rust"]).is_empty());
    }

    #[test]
    fn empty_filter_is_identity() {
        let projects = vec![project("b"), project("a")];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        let visible = registry.list_visible();
        let none: [&str; 0] = [];
        assert_eq!(filter_by_skills(&visible, &none), visible);
    }

    #[test]
    fn skill_matching_is_exact() {
        let projects = vec![typed("a", ProjectType::Design, &["React"])];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        let visible = registry.list_visible();
        assert!(filter_by_skills(&visible, &["react"]).is_empty());
    }

    #[test]
    fn all_skills_sorted_by_count_then_label() {
        let projects = vec![
            typed("a", ProjectType::Design, &["Figma", "React"]),
            typed("b", ProjectType::Engineering, &["Rust", "React"]),
            typed("c", ProjectType::Engineering, &["Rust", "axum"]),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        let skills = registry.all_skills(None);
        let pairs: Vec<(&str, usize)> =
            skills.iter().map(|s| (s.skill.as_str(), s.count)).collect();
        assert_eq!(
            pairs,
            vec![("React", 2), ("Rust", 2), ("axum", 1), ("Figma", 1)]
        );
    }

    #[test]
    fn all_skills_scoped_by_type() {
        let projects = vec![
            typed("a", ProjectType::Design, &["Figma", "React"]),
            typed("b", ProjectType::Engineering, &["Rust", "React"]),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        let skills: Vec<String> = registry
            .all_skills(Some(ProjectType::Engineering))
            .into_iter()
            .map(|s| s.skill)
            .collect();
        assert_eq!(skills, vec!["React", "Rust"]);
    }

    #[test]
    fn all_skills_counts_match_filter_results() {
        let projects = vec![
            typed("a", ProjectType::Design, &["Figma", "React", "React"]),
            typed("b", ProjectType::Engineering, &["Rust", "React"]),
            with("d", |p| {
                p.draft = true;
                p.tech = vec!["React".into()];
            }),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        let visible = registry.list_visible();
        for SkillCount { skill, count } in registry.all_skills(None) {
            assert_eq!(filter_by_skills(&visible, &[&skill]).len(), count, "{skill}");
        }
    }

    #[test]
    fn by_type_keeps_display_order() {
        let projects = vec![
            typed("late", ProjectType::Design, &[]),
            with("first", |p| {
                p.project_type = Some(ProjectType::Design);
                p.featured = true;
            }),
            typed("eng", ProjectType::Engineering, &[]),
        ];
        let registry = ProjectRegistry::new(projects, Environment::Production);
        assert_eq!(
            slugs(&registry.by_type(ProjectType::Design)),
            vec!["first", "late"]
        );
    }

    #[test]
    fn neighbors_follow_visible_order() {
        let projects = vec![project("a"), project("b"), project("c")];
        let registry = ProjectRegistry::new(projects, Environment::Production);

        let (prev, next) = registry.neighbors("a");
        assert!(prev.is_none());
        assert_eq!(next.unwrap().slug, "b");

        let (prev, next) = registry.neighbors("c");
        assert_eq!(prev.unwrap().slug, "b");
        assert!(next.is_none());

        assert_eq!(registry.neighbors("missing"), (None, None));
    }

    #[test]
    fn fixture_portfolio_display_order() {
        let tmp = crate::test_helpers::setup_fixtures();
        let mut manifest = crate::scan::scan(tmp.path()).unwrap();
        assert_eq!(
            crate::test_helpers::visible_slugs(&manifest),
            vec!["ingest", "checkout-redesign", "design-system", "realtime-dashboard"]
        );

        manifest.config.site.environment = Environment::Development;
        // Draft has no order and is not featured; newest among the unranked
        assert_eq!(
            crate::test_helpers::visible_slugs(&manifest),
            vec![
                "ingest",
                "checkout-redesign",
                "wip-experiment",
                "design-system",
                "realtime-dashboard"
            ]
        );
    }
}
