//! Slug rules shared by projects, skills and headings.
//!
//! Project slugs end up as directory names under `dist/projects/`, so they are
//! held to a strict shape: lowercase ASCII words joined by single dashes.
//!
//! ```text
//! social-integration-pd   valid
//! pd2                     valid
//! Social_Integration      invalid (uppercase, underscore)
//! -leading                invalid
//! ```
//!
//! Skill labels and markdown headings are free text and go through
//! [`slugify`] instead, which never fails.

const MAX_SLUG_LEN: usize = 80;

/// True if `slug` matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|word| {
            !word.is_empty()
                && word
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// Turn a free-text label into a URL-safe slug.
///
/// - Lowercases ASCII letters
/// - Spells out `+` and `#` so `C++` and `C#` stay distinct
/// - Replaces every other non-alphanumeric character with a dash
/// - Collapses consecutive dashes and strips them from both ends
/// - Truncates to `MAX_SLUG_LEN` characters at the last dash before the limit
pub fn slugify(label: &str) -> String {
    let mut spelled = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '+' => spelled.push_str("-plus"),
            '#' => spelled.push_str("-sharp"),
            c if c.is_ascii_alphanumeric() => spelled.push(c.to_ascii_lowercase()),
            _ => spelled.push('-'),
        }
    }

    let mut collapsed = String::with_capacity(spelled.len());
    let mut prev_dash = false;
    for c in spelled.chars() {
        if c == '-' {
            if !prev_dash {
                collapsed.push('-');
            }
            prev_dash = true;
        } else {
            collapsed.push(c);
            prev_dash = false;
        }
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.len() <= MAX_SLUG_LEN {
        trimmed.to_string()
    } else {
        let truncated = &trimmed[..MAX_SLUG_LEN];
        match truncated.rfind('-') {
            Some(pos) => truncated[..pos].to_string(),
            None => truncated.to_string(),
        }
    }
}

/// Display label for a link key: first character uppercased.
///
/// `github` → `Github`, `case study` → `Case study`.
pub fn display_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        assert!(is_valid_slug("social-integration-pd"));
        assert!(is_valid_slug("pd2"));
        assert!(is_valid_slug("2024-redesign"));
    }

    #[test]
    fn invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Upper"));
        assert!(!is_valid_slug("snake_case"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--dash"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Design Systems"), "design-systems");
        assert_eq!(slugify("Node.js"), "node-js");
    }

    #[test]
    fn slugify_keeps_plus_and_sharp_distinct() {
        assert_eq!(slugify("C++"), "c-plus-plus");
        assert_eq!(slugify("C#"), "c-sharp");
        assert_ne!(slugify("C++"), slugify("C"));
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("  The   Challenge!  "), "the-challenge");
        assert_eq!(slugify("@@@"), "");
    }

    #[test]
    fn slugify_truncates_at_word_boundary() {
        let long = "word ".repeat(30);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn display_label_capitalises_first_letter() {
        assert_eq!(display_label("github"), "Github");
        assert_eq!(display_label("live demo"), "Live demo");
        assert_eq!(display_label(""), "");
    }
}
