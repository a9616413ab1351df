//! Annotated markdown: provision text with category highlight spans.
//!
//! Colouring fields are markdown strings carrying inline
//! `<span class="who">…</span>` markup. [`AnnotatedText::parse`] turns one
//! into a flat list of [`Segment`]s tagged with their [`Category`]; the
//! `strip`, `to_html`, and `to_terminal` interpreters all read that one
//! structure.

use std::fmt;
use std::str::FromStr;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// Highlight category of an annotated span (and name of a colouring field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Who,
    When,
    Where,
    How,
    Tone,
    Penalty,
}

impl Category {
    /// Tab order in the comparison view.
    pub const ALL: [Category; 6] = [
        Category::Who,
        Category::When,
        Category::Where,
        Category::How,
        Category::Tone,
        Category::Penalty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Who => "who",
            Category::When => "when",
            Category::Where => "where",
            Category::How => "how",
            Category::Tone => "tone",
            Category::Penalty => "penalty",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A run of markdown text with at most one highlight category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub category: Option<Category>,
    pub text: String,
}

/// Markdown split into category-tagged segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedText {
    segments: Vec<Segment>,
}

const SPAN_OPEN: &str = "<span";
const SPAN_CLOSE: &str = "</span>";

impl AnnotatedText {
    /// Parse markdown with inline `<span class="…">` markup.
    ///
    /// Nested spans take the innermost known category. Unknown classes keep
    /// their text untagged, stray closing tags are dropped, and an opening
    /// tag without its `>` is kept as literal text.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        let mut segments = Vec::new();
        let mut stack: Vec<Option<Category>> = Vec::new();
        let mut current = String::new();
        let mut pos = 0;

        while pos < raw.len() {
            let rest = &lower[pos..];
            let Some(offset) = rest.find('<') else {
                current.push_str(&raw[pos..]);
                break;
            };
            current.push_str(&raw[pos..pos + offset]);
            pos += offset;
            let rest = &lower[pos..];

            if rest.starts_with(SPAN_CLOSE) {
                flush(&mut segments, &mut current, innermost(&stack));
                stack.pop();
                pos += SPAN_CLOSE.len();
            } else if rest.starts_with(SPAN_OPEN)
                && rest[SPAN_OPEN.len()..].starts_with(|c: char| c == '>' || c.is_whitespace())
                && let Some(end) = rest.find('>')
            {
                flush(&mut segments, &mut current, innermost(&stack));
                stack.push(span_category(&raw[pos..pos + end]));
                pos += end + 1;
            } else {
                current.push('<');
                pos += 1;
            }
        }
        flush(&mut segments, &mut current, innermost(&stack));

        Self { segments }
    }

    /// Untagged text.
    pub fn plain(text: &str) -> Self {
        let mut segments = Vec::new();
        flush(&mut segments, &mut text.to_string(), None);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Distinct categories present, in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut out = Vec::new();
        for c in self.segments.iter().filter_map(|s| s.category) {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }

    /// Markdown with all highlight markup removed.
    pub fn strip(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Markdown with normalised `<span class="category">` markup.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg.category {
                Some(c) => {
                    out.push_str(&format!("<span class=\"{c}\">"));
                    out.push_str(&seg.text);
                    out.push_str(SPAN_CLOSE);
                }
                None => out.push_str(&seg.text),
            }
        }
        out
    }

    /// HTML rendering with category spans kept for styling.
    pub fn to_html(&self) -> String {
        let markdown = self.to_markdown();
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, Parser::new(&markdown));
        html
    }

    /// Plain terminal text. Segments of the `focus` category are wrapped in
    /// `«…»`; with no focus the output equals the stripped text rendered.
    pub fn to_terminal(&self, focus: Option<Category>) -> String {
        let mut marked = String::new();
        for seg in &self.segments {
            if focus.is_some() && seg.category == focus {
                marked.push('«');
                marked.push_str(&seg.text);
                marked.push('»');
            } else {
                marked.push_str(&seg.text);
            }
        }
        markdown_to_text(&marked)
    }
}

fn innermost(stack: &[Option<Category>]) -> Option<Category> {
    stack.iter().rev().find_map(|c| *c)
}

fn flush(segments: &mut Vec<Segment>, current: &mut String, category: Option<Category>) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    // Merge with the previous segment when the category did not change.
    if let Some(last) = segments.last_mut()
        && last.category == category
    {
        last.text.push_str(&text);
        return;
    }
    segments.push(Segment { category, text });
}

/// Extract the first recognised category from a span tag's class attribute.
fn span_category(tag: &str) -> Option<Category> {
    let lower = tag.to_ascii_lowercase();
    let start = lower.find("class")?;
    let after = lower[start + "class".len()..].trim_start();
    let after = after.strip_prefix('=')?.trim_start();
    let value = match after.chars().next()? {
        q @ ('"' | '\'') => {
            let inner = &after[1..];
            &inner[..inner.find(q).unwrap_or(inner.len())]
        }
        _ => after.split(|c: char| c.is_whitespace() || c == '>').next()?,
    };
    value.split_whitespace().find_map(|cls| cls.parse().ok())
}

/// Render markdown to plain text for a terminal.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Start(Tag::Item) => out.push_str("- "),
            Event::End(TagEnd::Item) => out.push('\n'),
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Heading(_)) => {
                out.push_str("\n\n")
            }
            Event::Rule => out.push_str("---\n\n"),
            _ => {}
        }
    }
    out.trim_end().to_string()
}

/// Close a dangling bold marker: an odd count of `**` gets one appended.
pub fn normalize_markdown(text: &str) -> String {
    let mut out = text.to_string();
    if out.matches("**").count() % 2 != 0 {
        out.push_str("**");
    }
    out
}
