use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::text::normalize_text;

/// Element geometry in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Too small to be a usable click target.
    pub fn is_tiny(&self) -> bool {
        self.width < 6.0 || self.height < 6.0
    }
}

/// The subset of computed CSS the detectors look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: f32,
    pub pointer_events: String,
    /// `None` when the source could not determine a font size.
    pub font_size_px: Option<f32>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
            pointer_events: "auto".to_string(),
            font_size_px: None,
        }
    }
}

impl ComputedStyle {
    /// Not rendered, fully transparent, or not clickable.
    pub fn suppresses_interaction(&self) -> bool {
        self.display.eq_ignore_ascii_case("none")
            || self.visibility.eq_ignore_ascii_case("hidden")
            || self.opacity < 0.05
            || self.pointer_events.eq_ignore_ascii_case("none")
    }
}

/// One element of the page, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView {
    pub tag: String,
    /// Whitespace-collapsed text content, original case.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub computed_style: ComputedStyle,
    /// `None` when the source has no layout information.
    #[serde(default)]
    pub rect: Option<Rect>,
    /// Best-effort, non-unique locator. Re-querying it may find nothing.
    #[serde(default)]
    pub selector_hint: String,
    /// Index of the parent element in `PageModel::elements`.
    #[serde(default)]
    pub parent: Option<usize>,
}

impl ElementView {
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        Self {
            selector_hint: tag.clone(),
            tag,
            text: String::new(),
            attributes: BTreeMap::new(),
            computed_style: ComputedStyle::default(),
            rect: None,
            parent: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self.selector_hint = selector_hint(&self.tag, &self.attributes);
        self
    }

    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.computed_style = style;
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Lower-cased `type` attribute, empty when absent.
    pub fn input_type(&self) -> String {
        self.attr("type").unwrap_or_default().trim().to_ascii_lowercase()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Visible label as a user reads it: text content, else the `value` attribute.
    /// Lower-cased and trimmed.
    pub fn label(&self) -> String {
        let raw = if self.text.trim().is_empty() {
            self.attr("value").unwrap_or_default()
        } else {
            self.text.as_str()
        };
        raw.trim().to_lowercase()
    }

    /// Present in the model but effectively unusable by a person.
    pub fn is_effectively_hidden(&self) -> bool {
        self.computed_style.suppresses_interaction() || self.rect.is_some_and(|r| r.is_tiny())
    }
}

/// Build a locator hint: `#id`, else `tag.first-class`, else `tag`.
pub fn selector_hint(tag: &str, attributes: &BTreeMap<String, String>) -> String {
    if let Some(id) = attributes.get("id").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        return format!("#{id}");
    }
    if let Some(class) = attributes
        .get("class")
        .and_then(|c| c.split_whitespace().next())
    {
        return format!("{tag}.{class}");
    }
    tag.to_string()
}

/// Immutable snapshot of one page, produced once per scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PageModelRepr")]
pub struct PageModel {
    text: String,
    elements: Vec<ElementView>,
}

#[derive(Deserialize)]
struct PageModelRepr {
    #[serde(default)]
    text: String,
    #[serde(default)]
    elements: Vec<ElementView>,
}

impl From<PageModelRepr> for PageModel {
    fn from(repr: PageModelRepr) -> Self {
        PageModel::new(&repr.text, repr.elements)
    }
}

impl PageModel {
    /// Normalizes `text` and repairs element links so every parent precedes its child.
    pub fn new(text: &str, elements: Vec<ElementView>) -> Self {
        let elements = elements
            .into_iter()
            .enumerate()
            .map(|(idx, mut el)| {
                el.tag = el.tag.to_ascii_lowercase();
                if el.parent.is_some_and(|p| p >= idx) {
                    el.parent = None;
                }
                if el.selector_hint.is_empty() {
                    el.selector_hint = selector_hint(&el.tag, &el.attributes);
                }
                el
            })
            .collect();
        Self {
            text: normalize_text(text),
            elements,
        }
    }

    pub fn empty() -> Self {
        Self::new("", Vec::new())
    }

    /// Lower-cased, whitespace-normalized page text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn elements(&self) -> &[ElementView] {
        &self.elements
    }

    pub fn element(&self, idx: usize) -> Option<&ElementView> {
        self.elements.get(idx)
    }

    pub fn parent_of(&self, idx: usize) -> Option<(usize, &ElementView)> {
        let parent = self.elements.get(idx)?.parent?;
        self.elements.get(parent).map(|el| (parent, el))
    }

    /// Ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: usize) -> Ancestors<'_> {
        Ancestors {
            page: self,
            current: idx,
        }
    }

    /// Nearest ancestor (excluding `idx` itself) with the given tag.
    pub fn closest(&self, idx: usize, tag: &str) -> Option<(usize, &ElementView)> {
        self.ancestors(idx).find(|(_, el)| el.is_tag(tag))
    }

    /// SHA-256 over the text and element structure; equal pages give equal digests.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        for el in &self.elements {
            hasher.update(b"\n");
            hasher.update(el.tag.as_bytes());
            hasher.update(b"\0");
            hasher.update(el.text.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

pub struct Ancestors<'a> {
    page: &'a PageModel,
    current: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (usize, &'a ElementView);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, el) = self.page.parent_of(self.current)?;
        self.current = idx;
        Some((idx, el))
    }
}
