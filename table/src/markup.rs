//! Owned HTML fragments.
//!
//! Text only becomes markup through [`Markup::text`], which escapes it.
//! [`Markup::raw`] is for fragments that are already well-formed HTML.

use std::fmt::{self, Display};

/// An owned, already-escaped HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    /// Empty fragment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Escape `text` and wrap it as markup.
    pub fn text(text: impl AsRef<str>) -> Self {
        Self(escape(text.as_ref()))
    }

    /// Wrap an already-built HTML fragment without escaping it.
    pub fn raw(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append another fragment.
    pub fn push(&mut self, other: &Self) {
        self.0.push_str(&other.0);
    }

    /// Append escaped text.
    pub fn push_text(&mut self, text: &str) {
        self.0.push_str(&escape(text));
    }

    /// Append a raw HTML fragment.
    pub fn push_raw(&mut self, html: &str) {
        self.0.push_str(html);
    }

    /// Wrap this fragment in `<tag class="...">...</tag>`.
    pub fn wrap(self, tag: &str, class: Option<&str>) -> Self {
        let mut out = String::with_capacity(self.0.len() + tag.len() * 2 + 16);
        out.push('<');
        out.push_str(tag);
        if let Some(class) = class {
            out.push_str(" class=\"");
            out.push_str(&escape(class));
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.0);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        Self(out)
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> Self {
        markup.0
    }
}

impl FromIterator<Self> for Markup {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        let mut out = Self::empty();
        for fragment in iter {
            out.push(&fragment);
        }
        out
    }
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
