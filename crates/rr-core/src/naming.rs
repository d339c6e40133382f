//! Naming conventions for association resolution.
//!
//! Association metadata is derived from names: `belongs_to :author` targets
//! the `Author` class through the `author_id` attribute. This module holds
//! the string transformations behind those derivations:
//!
//! - [`camelize`] - `blog_post` → `BlogPost`, `admin/user` → `Admin::User`
//! - [`singularize`] - `people` → `person`, `categories` → `category`
//! - [`classify`] - singularize then camelize (`blog_posts` → `BlogPost`)
//! - [`foreign_key`] / [`foreign_type`] - `Author` → `author_id` / `author_type`
//! - [`element_name`] - `Admin::BlogPost` → `blog_post`
//!
//! The foreign-key and foreign-type spellings are the wire contract with the
//! attribute payloads of the remote service, so they only lower-case the
//! name; they never underscore it.

use std::sync::LazyLock;

use convert_case::{Case, Casing};
use regex::Regex;

/// Words whose singular and plural forms are identical.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// Plural → singular rules, highest priority first. The first rule whose
/// pattern matches wins.
static SINGULAR_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Irregular words
        (r"(?i)(p)eople$", "${1}erson"),
        (r"(?i)(m)en$", "${1}an"),
        (r"(?i)(c)hildren$", "${1}hild"),
        (r"(?i)(s)exes$", "${1}ex"),
        (r"(?i)(m)oves$", "${1}ove"),
        (r"(?i)(z)ombies$", "${1}ombie"),
        // Suffix rules
        (r"(?i)(database)s$", "${1}"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en", "${1}"),
        (r"(?i)(alias|status)(es)?$", "${1}"),
        (r"(?i)(octop|vir)(us|i)$", "${1}us"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(cris|test)(is|es)$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(bus)(es)?$", "${1}"),
        (r"(?i)^(m|l)ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)(s)eries$", "${1}eries"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(^analy)(sis|ses)$", "${1}sis"),
        (
            r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
            "${1}sis",
        ),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)(n)ews$", "${1}ews"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| {
        Regex::new(pattern).ok().map(|regex| (regex, replacement))
    })
    .collect()
});

/// Converts an underscored, slash-namespaced term to a `PascalCase` class
/// name.
///
/// The leading run of lowercase characters gets its first letter
/// capitalized. Each `_` is dropped and the word after it capitalized; each
/// `/` becomes a `::` namespace separator. Text that is already `PascalCase`
/// comes back unchanged.
///
/// # Examples
///
/// ```
/// use rr_core::naming::camelize;
///
/// assert_eq!(camelize("writer"), "Writer");
/// assert_eq!(camelize("blog_post"), "BlogPost");
/// assert_eq!(camelize("admin/user"), "Admin::User");
/// assert_eq!(camelize("BlogPost"), "BlogPost");
/// ```
#[must_use]
pub fn camelize(term: &str) -> String {
    let mut result = String::with_capacity(term.len() + 2);
    let mut leading = true;
    let mut word_start = false;
    let mut in_word = false;

    for (i, c) in term.chars().enumerate() {
        if leading {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                result.push(if i == 0 { c.to_ascii_uppercase() } else { c });
                continue;
            }
            leading = false;
        }

        match c {
            '_' | '/' => {
                if c == '/' {
                    result.push_str("::");
                }
                word_start = true;
                in_word = false;
            }
            c if c.is_ascii_alphanumeric() && word_start => {
                result.push(c.to_ascii_uppercase());
                word_start = false;
                in_word = true;
            }
            c if c.is_ascii_alphanumeric() && in_word => result.push(c.to_ascii_lowercase()),
            c => {
                word_start = false;
                in_word = false;
                result.push(c);
            }
        }
    }

    result
}

/// Returns the singular form of a plural English word.
///
/// Only the final word is inflected, so namespaced and underscored terms keep
/// their prefix (`admin/users` → `admin/user`). Uncountable words and words
/// that are already singular come back unchanged.
///
/// # Examples
///
/// ```
/// use rr_core::naming::singularize;
///
/// assert_eq!(singularize("authors"), "author");
/// assert_eq!(singularize("people"), "person");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("statuses"), "status");
/// assert_eq!(singularize("sheep"), "sheep");
/// assert_eq!(singularize("owner"), "owner");
/// ```
#[must_use]
pub fn singularize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_owned();
    }

    SINGULAR_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(word))
        .map_or_else(
            || word.to_owned(),
            |(pattern, replacement)| pattern.replace(word, *replacement).into_owned(),
        )
}

/// Returns `true` if the last word of `word` is uncountable.
fn is_uncountable(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    UNCOUNTABLE.iter().any(|candidate| {
        lower.strip_suffix(candidate).is_some_and(|prefix| {
            prefix
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_ascii_alphanumeric())
        })
    })
}

/// Derives a class name from a (possibly plural) association or table name.
///
/// # Examples
///
/// ```
/// use rr_core::naming::classify;
///
/// assert_eq!(classify("author"), "Author");
/// assert_eq!(classify("blog_posts"), "BlogPost");
/// assert_eq!(classify("admin/users"), "Admin::User");
/// ```
#[must_use]
pub fn classify(name: &str) -> String {
    camelize(&singularize(name))
}

/// Strips any `::` namespace prefix from a class name.
///
/// # Examples
///
/// ```
/// use rr_core::naming::demodulize;
///
/// assert_eq!(demodulize("Admin::User"), "User");
/// assert_eq!(demodulize("User"), "User");
/// ```
#[must_use]
pub fn demodulize(class_name: &str) -> &str {
    class_name
        .rsplit_once("::")
        .map_or(class_name, |(_, last)| last)
}

/// Converts a `PascalCase` class name to `snake_case`.
///
/// # Examples
///
/// ```
/// use rr_core::naming::underscore;
///
/// assert_eq!(underscore("BlogPost"), "blog_post");
/// assert_eq!(underscore("Author"), "author");
/// ```
#[must_use]
pub fn underscore(class_name: &str) -> String {
    class_name.to_case(Case::Snake)
}

/// Returns the singular element name of a resource class, as used in
/// payload keys: the underscored class name without its namespace.
///
/// # Examples
///
/// ```
/// use rr_core::naming::element_name;
///
/// assert_eq!(element_name("Admin::BlogPost"), "blog_post");
/// ```
#[must_use]
pub fn element_name(class_name: &str) -> String {
    underscore(demodulize(class_name))
}

/// Returns the conventional foreign-key attribute for an association name.
///
/// # Examples
///
/// ```
/// use rr_core::naming::foreign_key;
///
/// assert_eq!(foreign_key("author"), "author_id");
/// assert_eq!(foreign_key("Owner"), "owner_id");
/// ```
#[must_use]
pub fn foreign_key(name: &str) -> String {
    format!("{}_id", name.to_lowercase())
}

/// Returns the conventional foreign-type attribute for an association name.
///
/// # Examples
///
/// ```
/// use rr_core::naming::foreign_type;
///
/// assert_eq!(foreign_type("owner"), "owner_type");
/// ```
#[must_use]
pub fn foreign_type(name: &str) -> String {
    format!("{}_type", name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("author"), "Author");
        assert_eq!(camelize("writer"), "Writer");
        assert_eq!(camelize("Writer"), "Writer");
        assert_eq!(camelize("blog_post"), "BlogPost");
        assert_eq!(camelize("blogPost"), "BlogPost");
        assert_eq!(camelize("admin/blog_post"), "Admin::BlogPost");
        assert_eq!(camelize("Admin::User"), "Admin::User");
        assert_eq!(camelize("people"), "People");
        assert_eq!(camelize(""), "");
    }

    #[test]
    fn test_camelize_lowercases_after_separator() {
        assert_eq!(camelize("blog_POST"), "BlogPost");
    }

    #[test]
    fn test_singularize_regular() {
        assert_eq!(singularize("authors"), "author");
        assert_eq!(singularize("blog_posts"), "blog_post");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("companies"), "company");
        assert_eq!(singularize("wolves"), "wolf");
        assert_eq!(singularize("knives"), "knife");
        assert_eq!(singularize("buses"), "bus");
        assert_eq!(singularize("data"), "datum");
    }

    #[test]
    fn test_singularize_irregular() {
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("salespeople"), "salesperson");
        assert_eq!(singularize("women"), "woman");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("mice"), "mouse");
        assert_eq!(singularize("indices"), "index");
        assert_eq!(singularize("analyses"), "analysis");
    }

    #[test]
    fn test_singularize_leaves_singulars() {
        assert_eq!(singularize("owner"), "owner");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("news"), "news");
    }

    #[test]
    fn test_singularize_uncountable() {
        assert_eq!(singularize("sheep"), "sheep");
        assert_eq!(singularize("equipment"), "equipment");
        assert_eq!(singularize("farm_equipment"), "farm_equipment");
        assert_eq!(singularize("Information"), "Information");
    }

    #[test]
    fn test_singularize_preserves_case() {
        assert_eq!(singularize("People"), "Person");
        assert_eq!(singularize("Authors"), "Author");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("author"), "Author");
        assert_eq!(classify("owner"), "Owner");
        assert_eq!(classify("people"), "Person");
        assert_eq!(classify("blog_posts"), "BlogPost");
        assert_eq!(classify("admin/users"), "Admin::User");
    }

    #[test]
    fn test_foreign_names() {
        assert_eq!(foreign_key("author"), "author_id");
        assert_eq!(foreign_type("author"), "author_type");
        assert_eq!(foreign_key("BlogPost"), "blogpost_id");
    }

    #[test]
    fn test_element_name() {
        assert_eq!(element_name("Author"), "author");
        assert_eq!(element_name("BlogPost"), "blog_post");
        assert_eq!(element_name("Admin::BlogPost"), "blog_post");
    }
}
