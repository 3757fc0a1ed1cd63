mod color;
mod field;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use color::Color;
pub use field::Field;

/// Stable identity of an [`Embed`] or [`Field`] for the lifetime of the process.
///
/// Editors bind to keys instead of positions, since positions shift whenever
/// something before them gets removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u64);

impl Key {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footer {
    pub text: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub icon_url: String,
}

/// One editable message card.
///
/// Equality compares content only; two embeds with different keys but the
/// same attributes are equal, and an empty image URL equals no image.
#[derive(Debug, Clone)]
pub struct Embed {
    key: Key,
    pub title: String,
    pub description: String,
    /// `#RRGGBB`, or empty for the default
    pub color: String,
    pub footer: Footer,
    pub author: Author,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub fields: Vec<Field>,
}

impl Embed {
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: Key::next(),
            title: String::new(),
            description: String::new(),
            color: String::new(),
            footer: Footer::default(),
            author: Author::default(),
            image: None,
            thumbnail: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }

    /// Only embeds with a title or a description make it into exports.
    #[must_use]
    pub const fn is_exportable(&self) -> bool {
        !self.title.is_empty() || !self.description.is_empty()
    }

    /// The color to draw this embed with; white if unset or not valid hex.
    #[must_use]
    pub fn render_color(&self) -> Color {
        Color::from_hex(&self.color).unwrap_or(Color::WHITE)
    }

    /// The image URL, if there is a non-empty one
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|u| !u.is_empty())
    }

    /// The thumbnail URL, if there is a non-empty one
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.as_deref().filter(|u| !u.is_empty())
    }

    #[must_use]
    pub fn field_position(&self, key: Key) -> Option<usize> {
        self.fields.iter().position(|f| f.key() == key)
    }
}

impl Default for Embed {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Embed {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.color == other.color
            && self.footer == other.footer
            && self.author == other.author
            && self.image_url() == other.image_url()
            && self.thumbnail_url() == other.thumbnail_url()
            && self.fields == other.fields
    }
}

impl Eq for Embed {}
