//! Structured document queries over parsed HTML
//!
//! Site pages describe fields as label/value pairs, either as siblings
//! (`<div class="fi-label">Жанр:</div><div class="fi-desc"><a>Драма</a></div>`)
//! or inside one row (`<li><span>Жанр:</span> <a>Драма</a></li>`).
//! [`FieldRole`] captures one such convention and [`DocumentQuery`] answers
//! "find the label", "read the value next to it" and "give me its text"
//! for any element of a `scraper` tree.

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("Invalid link selector"));

/// A labelled field: which elements are labels, which text marks this
/// field, and which sibling element holds the value (`None` when the value
/// follows the label text inside the same element).
#[derive(Debug, Clone)]
pub struct FieldRole {
    label: Selector,
    value: Option<Selector>,
    pattern: Regex,
}

fn label_pattern(label_text: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i){}\s*:", regex::escape(label_text))).ok()
}

impl FieldRole {
    /// Build a role matching labels whose text contains `label_text`
    /// followed by a colon, case-insensitively.
    ///
    /// Returns `None` if either CSS selector fails to parse.
    pub fn new(label_css: &str, value_css: &str, label_text: &str) -> Option<Self> {
        let label = Selector::parse(label_css).ok()?;
        let value = Some(Selector::parse(value_css).ok()?);
        let pattern = label_pattern(label_text)?;
        Some(Self { label, value, pattern })
    }

    /// Build a role for rows carrying both label and value, e.g.
    /// `<li><span>Режисер:</span> Іван Петренко</li>`.
    pub fn inline(row_css: &str, label_text: &str) -> Option<Self> {
        let label = Selector::parse(row_css).ok()?;
        let pattern = label_pattern(label_text)?;
        Some(Self {
            label,
            value: None,
            pattern,
        })
    }

    fn labels_text(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Row text following the label
    fn text_after_label(&self, text: &str) -> String {
        match self.pattern.find(text) {
            Some(m) => text[m.end()..].trim().to_string(),
            None => text.trim().to_string(),
        }
    }
}

/// Query capability over one element of a parsed document
pub trait DocumentQuery<'a> {
    /// First descendant matching `selector`
    fn first(&self, selector: &Selector) -> Option<ElementRef<'a>>;

    /// First descendant label element whose text names `role`
    fn find_by_role(&self, role: &FieldRole) -> Option<ElementRef<'a>>;

    /// Next sibling of this (label) element that holds the value for `role`
    fn sibling_value(&self, role: &FieldRole) -> Option<ElementRef<'a>>;

    /// Whitespace-normalized text content
    fn text_of(&self) -> String;

    /// Attribute value, if present
    fn attr_of(&self, name: &str) -> Option<&'a str>;

    /// Value element for `role` found under this element
    fn role_value(&self, role: &FieldRole) -> Option<ElementRef<'a>> {
        self.find_by_role(role)?.sibling_value(role)
    }

    /// Value of `role` as a list: link texts, else comma-split text
    fn role_list(&self, role: &FieldRole) -> Vec<String> {
        let Some(label) = self.find_by_role(role) else {
            return Vec::new();
        };
        if role.value.is_some() {
            return label.sibling_value(role).map(value_list).unwrap_or_default();
        }
        let links = link_texts(label);
        if !links.is_empty() {
            return links;
        }
        split_commas(&role.text_after_label(&label.text_of()))
    }

    /// Value of `role` as plain text
    fn role_text(&self, role: &FieldRole) -> Option<String> {
        let label = self.find_by_role(role)?;
        let text = match role.value {
            Some(_) => label.sibling_value(role)?.text_of(),
            None => role.text_after_label(&label.text_of()),
        };
        Some(text).filter(|t| !t.is_empty())
    }

    /// Text of the first descendant matching `selector`
    fn text_at(&self, selector: &Selector) -> Option<String> {
        self.first(selector).map(|el| el.text_of()).filter(|t| !t.is_empty())
    }

    /// Attribute of the first descendant matching `selector`
    fn attr_at(&self, selector: &Selector, name: &str) -> Option<&'a str> {
        self.first(selector).and_then(|el| el.attr_of(name))
    }
}

impl<'a> DocumentQuery<'a> for ElementRef<'a> {
    fn first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn find_by_role(&self, role: &FieldRole) -> Option<ElementRef<'a>> {
        self.select(&role.label)
            .find(|label| role.labels_text(&label.text_of()))
    }

    fn sibling_value(&self, role: &FieldRole) -> Option<ElementRef<'a>> {
        let value = role.value.as_ref()?;
        self.next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| value.matches(sibling))
    }

    fn text_of(&self) -> String {
        self.text()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn attr_of(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }
}

/// Read a value element as a list: the texts of its links when it has any,
/// otherwise its raw text split by commas.
pub fn value_list(value: ElementRef<'_>) -> Vec<String> {
    let links = link_texts(value);
    if !links.is_empty() {
        return links;
    }

    comma_list(value)
}

/// Text pieces of `value` joined and split on commas
pub fn comma_list(value: ElementRef<'_>) -> Vec<String> {
    split_commas(
        &value
            .text()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(","),
    )
}

fn link_texts(element: ElementRef<'_>) -> Vec<String> {
    element
        .select(&LINK_SELECTOR)
        .map(|a| a.text_of())
        .filter(|t| !t.is_empty())
        .collect()
}

fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
