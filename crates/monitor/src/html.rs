//! Static HTML adapter.
//!
//! Builds a [`PageModel`] from markup alone. Computed style is approximated
//! from inline `style` attributes with CSS inheritance; stylesheets and
//! layout are out of reach, so geometry and font size stay unknown unless
//! declared inline.

use std::collections::BTreeMap;

use darkux_guard::page::{ComputedStyle, ElementView, PageModel, Rect};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

/// Subtrees that never render text.
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Phrasing elements that do not break the surrounding text run.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u",
    "var",
];

/// `rem` base and `em` base when nothing declares a font size.
const ROOT_FONT_PX: f32 = 16.0;

const PT_TO_PX: f32 = 4.0 / 3.0;

/// Inherited rendering state passed from parent to child.
#[derive(Debug, Clone)]
struct Inherited {
    hidden: bool,
    visibility: String,
    pointer_events: String,
    opacity: f32,
    font_size_px: Option<f32>,
}

impl Default for Inherited {
    fn default() -> Self {
        Self {
            hidden: false,
            visibility: "visible".to_string(),
            pointer_events: "auto".to_string(),
            opacity: 1.0,
            font_size_px: None,
        }
    }
}

/// Parse a full HTML document into a page snapshot.
pub fn snapshot(html: &str) -> PageModel {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut elements: Vec<ElementView> = Vec::new();
    let mut stack = vec![(root, None::<usize>, Inherited::default())];

    while let Some((el, parent, inherited)) = stack.pop() {
        let tag = el.value().name().to_ascii_lowercase();
        if SKIPPED_TAGS.contains(&tag.as_str()) {
            continue;
        }

        let (computed_style, rect, next) = resolve_style(&el, &inherited);
        let attributes: BTreeMap<String, String> = el
            .value()
            .attrs()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
            .collect();

        let idx = elements.len();
        elements.push(ElementView {
            selector_hint: String::new(),
            text: collapse(&rendered_text(el, false)),
            tag,
            attributes,
            computed_style,
            rect,
            parent,
        });

        // reversed so the stack pops children in document order
        let children: Vec<ElementRef> = el.children().filter_map(ElementRef::wrap).collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(idx), next.clone()));
        }
    }

    let body = root
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .unwrap_or(root);

    PageModel::new(&rendered_text(body, true), elements)
}

enum Step<'a> {
    Text(&'a str),
    Element(ElementRef<'a>, bool),
    Break,
}

/// Text under `el` with non-rendering subtrees skipped and a space at every
/// non-inline element boundary. With `visible_only`, hidden subtrees and
/// text under `visibility: hidden` are dropped as well.
fn rendered_text(el: ElementRef, visible_only: bool) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Element(el, true)];

    while let Some(step) = stack.pop() {
        let (el, visible) = match step {
            Step::Text(text) => {
                out.push_str(text);
                continue;
            }
            Step::Break => {
                out.push(' ');
                continue;
            }
            Step::Element(el, visible) => (el, visible),
        };

        let element = el.value();
        let tag = element.name().to_ascii_lowercase();
        if SKIPPED_TAGS.contains(&tag.as_str()) {
            continue;
        }
        let visible = if visible_only {
            if hides_subtree(element) {
                continue;
            }
            own_visibility(element).unwrap_or(visible)
        } else {
            true
        };

        let block = !INLINE_TAGS.contains(&tag.as_str());
        if block {
            stack.push(Step::Break);
        }
        // reversed so the stack pops children in document order
        let children: Vec<_> = el.children().collect();
        for child in children.into_iter().rev() {
            match child.value() {
                Node::Text(text) if visible => stack.push(Step::Text(&**text)),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        stack.push(Step::Element(child, visible));
                    }
                }
                _ => {}
            }
        }
        if block {
            stack.push(Step::Break);
        }
    }

    out
}

/// Whether `element` itself takes its subtree out of rendering.
fn hides_subtree(element: &Element) -> bool {
    let is_hidden_input = element.name().eq_ignore_ascii_case("input")
        && element
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"));
    is_hidden_input
        || element.attr("hidden").is_some()
        || declarations(element.attr("style").unwrap_or_default())
            .any(|(property, value)| property == "display" && value == "none")
}

/// `Some(rendered)` when `element` declares its own `visibility`.
fn own_visibility(element: &Element) -> Option<bool> {
    declarations(element.attr("style").unwrap_or_default())
        .filter(|(property, _)| property == "visibility")
        .last()
        .map(|(_, value)| value != "hidden" && value != "collapse")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve_style(el: &ElementRef, parent: &Inherited) -> (ComputedStyle, Option<Rect>, Inherited) {
    let element = el.value();
    let em_base = parent.font_size_px.unwrap_or(ROOT_FONT_PX);

    let mut display: Option<String> = None;
    let mut visibility = parent.visibility.clone();
    let mut pointer_events = parent.pointer_events.clone();
    let mut opacity = 1.0_f32;
    let mut font_size_px = parent.font_size_px;
    let mut width = None;
    let mut height = None;

    for (property, value) in declarations(element.attr("style").unwrap_or_default()) {
        match property.as_str() {
            "display" => display = Some(value),
            "visibility" => visibility = value,
            "pointer-events" => pointer_events = value,
            "opacity" => {
                if let Some(parsed) = parse_opacity(&value) {
                    opacity = parsed;
                }
            }
            "font-size" => {
                if let Some(px) = parse_length(&value, em_base) {
                    font_size_px = Some(px);
                }
            }
            "width" => width = parse_dimension(&value),
            "height" => height = parse_dimension(&value),
            _ => {}
        }
    }

    let hidden = parent.hidden || hides_subtree(element);

    let opacity = (parent.opacity * opacity).clamp(0.0, 1.0);
    let style = ComputedStyle {
        display: if hidden {
            "none".to_string()
        } else {
            display.unwrap_or_else(|| "inline".to_string())
        },
        visibility: visibility.clone(),
        opacity,
        pointer_events: pointer_events.clone(),
        font_size_px,
    };

    let rect = match (width, height) {
        (Some(w), Some(h)) => Some(Rect::new(0.0, 0.0, f64::from(w), f64::from(h))),
        _ => None,
    };

    let inherited = Inherited {
        hidden,
        visibility,
        pointer_events,
        opacity,
        font_size_px,
    };
    (style, rect, inherited)
}

/// `prop: value` pairs of an inline style, lower-cased, `!important` dropped.
fn declarations(style: &str) -> impl Iterator<Item = (String, String)> + '_ {
    style.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let value = value.trim().trim_end_matches("!important").trim();
        Some((property.trim().to_ascii_lowercase(), value.to_ascii_lowercase()))
    })
}

/// Length in pixels. `em` and `%` resolve against `em_base`.
fn parse_length(value: &str, em_base: f32) -> Option<f32> {
    let value = value.trim();
    let (number, factor) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, PT_TO_PX)
    } else if let Some(n) = value.strip_suffix("rem") {
        (n, ROOT_FONT_PX)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, em_base)
    } else if let Some(n) = value.strip_suffix('%') {
        (n, em_base / 100.0)
    } else if value == "0" {
        (value, 1.0)
    } else {
        return None;
    };

    let number: f32 = number.trim().parse().ok()?;
    (number.is_finite() && number >= 0.0).then_some(number * factor)
}

/// Box dimension in pixels; percentages depend on layout and stay unknown.
fn parse_dimension(value: &str) -> Option<f32> {
    if value.trim_end().ends_with('%') {
        return None;
    }
    parse_length(value, ROOT_FONT_PX)
}

fn parse_opacity(value: &str) -> Option<f32> {
    let parsed = match value.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
        None => value.parse::<f32>().ok()?,
    };
    parsed.is_finite().then_some(parsed.clamp(0.0, 1.0))
}
