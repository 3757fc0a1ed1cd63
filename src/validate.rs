use std::collections::HashSet;

use anyhow::{Result, bail};

use crate::embed::Color;

pub fn api_key(key: &str) -> Result<()> {
    const CHARS: &[u8; 65] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_.";
    validate_charset("API Key", key, CHARS)
}

/// Empty is allowed (it means "default color"), anything else must be `#RRGGBB`.
pub fn hex_color(color: &str) -> Result<()> {
    if color.is_empty() || Color::from_hex(color).is_some() {
        return Ok(());
    }
    bail!("Color {color:?} is not of the form #RRGGBB");
}

fn validate_charset(description: &'static str, string: &str, charset: &'static [u8]) -> Result<()> {
    if string.is_empty() {
        bail!("{description} is empty");
    }
    if string.bytes().all(|b| charset.contains(&b)) {
        return Ok(());
    }

    let set = string
        .bytes()
        .filter(|b| !charset.contains(b))
        .map(char::from)
        .collect::<HashSet<char>>();
    bail!("{description} contains invalid characters: {set:?}");
}
