//! In-memory page model standing in for the browser DOM.
//!
//! Elements are kept in document order. Lookups by a missing id return
//! `None` and every mutation through [`Page::update`] on a missing id is a
//! silent no-op, the same way an empty jQuery selection behaves.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    /// `data-*` attributes, keyed without the `data-` prefix.
    #[serde(default)]
    pub data: BTreeMap<String, String>,

    /// Current value of a form control (textarea, input).
    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub inner_html: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Element {
    pub fn new(tag: &str, id: &str) -> Self {
        Self {
            id: id.to_string(),
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.set_data(key, value);
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_inner_html(mut self, html: &str) -> Self {
        self.inner_html = html.to_string();
        self
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent = Some(parent_id.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn set_data(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }
}

/// The two selector forms the controllers are configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
}

impl Selector {
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Id(id) => element.id == *id,
            Selector::Class(class) => element.has_class(class),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl FromStr for Selector {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (kind, name) = s.split_at(s.chars().next().map_or(0, char::len_utf8));
        if name.is_empty() || !name.chars().all(is_name_char) {
            return Err(AppError::Selector(format!("unsupported selector '{}'", s)));
        }
        match kind {
            "#" => Ok(Selector::Id(name.to_string())),
            "." => Ok(Selector::Class(name.to_string())),
            _ => Err(AppError::Selector(format!("unsupported selector '{}'", s))),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Class(class) => write!(f, ".{}", class),
        }
    }
}

/// A form submission in flight through a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    pub form_id: String,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form_id: &str) -> Self {
        Self {
            form_id: form_id.to_string(),
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Document URL; relative form actions resolve against it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { url: None, elements }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Apply `f` to the element with `id`. Returns false when there is no such element.
    pub fn update<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Element),
    {
        match self.get_mut(id) {
            Some(element) => {
                f(element);
                true
            }
            None => false,
        }
    }

    /// Ids of all elements matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<String> {
        self.elements
            .iter()
            .filter(|e| !e.id.is_empty() && selector.matches(e))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Whether `ancestor_id` appears on the parent chain of `element`.
    pub fn is_descendant(&self, element: &Element, ancestor_id: &str) -> bool {
        let mut current = element.parent.as_deref();
        // Bounded by the element count so a cyclic snapshot cannot hang.
        for _ in 0..self.elements.len() {
            match current {
                Some(parent) if parent == ancestor_id => return true,
                Some(parent) => current = self.get(parent).and_then(|p| p.parent.as_deref()),
                None => return false,
            }
        }
        false
    }

    /// Value of the first `<input name="...">` nested inside `scope_id`.
    pub fn scoped_input_value(&self, scope_id: &str, name: &str) -> Option<String> {
        self.elements
            .iter()
            .filter(|e| e.tag == "input" && e.attr("name") == Some(name))
            .find(|e| self.is_descendant(e, scope_id))
            .map(|e| e.value.clone())
    }
}
