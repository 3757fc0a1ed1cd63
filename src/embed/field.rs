use super::Key;

#[derive(Debug, Clone)]
pub struct Field {
    key: Key,
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Field {
    /// A blank, non-inline field
    #[must_use]
    pub fn new() -> Self {
        Self::with(String::new(), String::new(), false)
    }

    #[must_use]
    pub fn with(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            key: Key::next(),
            name: name.into(),
            value: value.into(),
            inline,
        }
    }

    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.inline == other.inline
    }
}

impl Eq for Field {}
