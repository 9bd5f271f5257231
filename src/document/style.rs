//! Minimal CSS support for text styling.
//!
//! Only what text resolution needs: class rules from `<style>` elements
//! (`.label` and `text.label` selectors, comma-separated lists) and inline
//! `style` declarations. Later rules win over earlier ones.

use super::dom::SvgDocument;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_COMMENT: Regex = Regex::new(r"(?s)/\*.*?\*/").unwrap();
    static ref RE_RULE: Regex = Regex::new(r"([^{}]+)\{([^{}]*)\}").unwrap();
    static ref RE_CLASS_SELECTOR: Regex =
        Regex::new(r"^([A-Za-z][\w-]*)?\.([\w-]+)$").unwrap();
}

/// A class rule: optional element name, class name, declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRule {
    /// Element local name the selector is restricted to
    pub element: Option<String>,
    /// Class name without the dot
    pub class: String,
    /// Property name to value
    pub declarations: IndexMap<String, String>,
}

impl ClassRule {
    fn matches(&self, element: &str, classes: &[&str]) -> bool {
        self.element.as_deref().map_or(true, |e| e == element)
            && classes.iter().any(|c| *c == self.class)
    }
}

/// Class rules collected from a document, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    rules: Vec<ClassRule>,
}

impl StyleSheet {
    /// Parse CSS text. Unsupported selectors are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::document::style::StyleSheet;
    ///
    /// let sheet = StyleSheet::parse(".title, text.big { font-size: 24px; }");
    /// assert_eq!(sheet.lookup("text", Some("big"), "font-size"), Some("24px"));
    /// assert_eq!(sheet.lookup("tspan", Some("big"), "font-size"), None);
    /// ```
    pub fn parse(css: &str) -> Self {
        let css = RE_COMMENT.replace_all(css, "");
        let mut rules = Vec::new();

        for caps in RE_RULE.captures_iter(&css) {
            let (Some(selectors), Some(body)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let declarations = parse_declarations(body.as_str());
            if declarations.is_empty() {
                continue;
            }
            for selector in selectors.as_str().split(',') {
                let selector = selector.trim();
                match RE_CLASS_SELECTOR.captures(selector) {
                    Some(sel) => rules.push(ClassRule {
                        element: sel.get(1).map(|m| m.as_str().to_string()),
                        class: sel.get(2).map_or_else(String::new, |m| m.as_str().to_string()),
                        declarations: declarations.clone(),
                    }),
                    None => log::debug!("Ignoring unsupported selector {:?}", selector),
                }
            }
        }

        Self { rules }
    }

    /// Concatenate and parse every `<style>` element of a document.
    pub fn from_document(doc: &SvgDocument) -> Self {
        let css: String = doc
            .elements_named("style")
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect::<Vec<_>>()
            .join("\n");
        let sheet = Self::parse(&css);
        log::debug!("Style sheet: {} class rules", sheet.rules.len());
        sheet
    }

    /// Value of `property` from the last class rule matching `element` and
    /// any class in the whitespace-separated `class_attr`.
    pub fn lookup(&self, element: &str, class_attr: Option<&str>, property: &str) -> Option<&str> {
        let classes: Vec<&str> = class_attr?.split_whitespace().collect();
        if classes.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .rev()
            .filter(|rule| rule.matches(element, &classes))
            .find_map(|rule| rule.declarations.get(property))
            .map(String::as_str)
    }

    /// Number of class rules (one per selector).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no class rule was found.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse `a: b; c: d` declarations. Later duplicates win.
pub fn parse_declarations(block: &str) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    for declaration in block.split(';') {
        if let Some((name, value)) = declaration.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().trim_end_matches("!important").trim();
            if !name.is_empty() && !value.is_empty() {
                out.insert(name, value.to_string());
            }
        }
    }
    out
}

/// Value of `property` in an inline `style` attribute.
pub fn inline_property(style: &str, property: &str) -> Option<String> {
    parse_declarations(style).shift_remove(property)
}
