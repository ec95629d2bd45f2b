//! Entity name derivation
//!
//! Produces the singular/plural forms and casing variants that destination
//! paths and templates refer to. The engine treats them as opaque strings.

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase, ToTitleCase};
use serde::Serialize;

use crate::templates::Substitutions;

/// Every naming form of one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Names {
    /// `BlogPost`
    pub studly_singular: String,
    /// `BlogPosts`
    pub studly_plural: String,
    /// `blogPost`
    pub camel_singular: String,
    /// `blogPosts`
    pub camel_plural: String,
    /// `blog_post`
    pub snake_singular: String,
    /// `blog_posts`
    pub snake_plural: String,
    /// `blog-post`
    pub kebab_singular: String,
    /// `blog-posts`
    pub kebab_plural: String,
    /// `Blog Post`
    pub title_singular: String,
    /// `Blog Posts`
    pub title_plural: String,
}

impl Names {
    /// Inline token values exposed to templates and path patterns
    pub fn substitutions(&self) -> Substitutions {
        Substitutions::new()
            .with("ModelName", &self.studly_singular)
            .with("ModelNames", &self.studly_plural)
            .with("modelName", &self.camel_singular)
            .with("modelNames", &self.camel_plural)
            .with("model_name", &self.snake_singular)
            .with("model_names", &self.snake_plural)
            .with("model-name", &self.kebab_singular)
            .with("model-names", &self.kebab_plural)
            .with("ModelTitle", &self.title_singular)
            .with("ModelTitles", &self.title_plural)
    }
}

/// Turns a canonical entity name into its naming forms
pub trait NameDeriver {
    /// Derive every form of `name`
    fn derive(&self, name: &str) -> Names;
}

/// English naming rules
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNameDeriver;

impl NameDeriver for EnglishNameDeriver {
    fn derive(&self, name: &str) -> Names {
        let snake = name.trim().to_snake_case();
        let singular = inflect_last_word(&snake, singularize);
        let plural = inflect_last_word(&singular, pluralize);

        Names {
            studly_singular: singular.to_pascal_case(),
            studly_plural: plural.to_pascal_case(),
            camel_singular: singular.to_lower_camel_case(),
            camel_plural: plural.to_lower_camel_case(),
            snake_singular: singular.to_snake_case(),
            snake_plural: plural.to_snake_case(),
            kebab_singular: singular.to_kebab_case(),
            kebab_plural: plural.to_kebab_case(),
            title_singular: singular.to_title_case(),
            title_plural: plural.to_title_case(),
        }
    }
}

/// Human label for a column name: `published_at` becomes `Published At`
pub fn label(column: &str) -> String {
    column.to_title_case()
}

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("shelf", "shelves"),
    ("wolf", "wolves"),
    ("criterion", "criteria"),
    ("analysis", "analyses"),
    ("status", "statuses"),
    ("alias", "aliases"),
    ("atlas", "atlases"),
    ("canvas", "canvases"),
    ("gas", "gases"),
    ("axis", "axes"),
    ("iris", "irises"),
    ("lens", "lenses"),
    ("bus", "buses"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
    "media",
    "data",
    "metadata",
    "feedback",
    "tennis",
    "chassis",
];

fn inflect_last_word(snake: &str, inflect: fn(&str) -> String) -> String {
    match snake.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, inflect(last)),
        None => inflect(snake),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Plural form of a single lower-case word
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return plural.to_string();
    }

    let before_last = word.chars().rev().nth(1);
    if word.ends_with('y') && before_last.is_some_and(|c| !is_vowel(c)) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

/// Singular form of a single lower-case word
pub fn singularize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *p == word || *s == word) {
        return singular.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    let kept = ["ss", "us", "sis"];
    if word.ends_with('s') && !kept.iter().any(|k| word.ends_with(k)) && word.len() > 1 {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
