use serde::{Deserialize, Deserializer};

use crate::embed::Color;

/// Deserializes a Vec, using an empty Vec if the field is null
pub fn parse_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

/// Deserializes a String, using an empty String if the field is null
pub fn parse_string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Deserializes a bool, using `false` if the field is null
pub fn parse_bool<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(d)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrInt {
    String(String),
    Int(u64),
}

/// Deserializes a color as either the hex string we export ourselves,
/// or the packed integer the platform uses (converted to `#RRGGBB`).
pub fn parse_color<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let color = match Option::<StringOrInt>::deserialize(d)? {
        None => String::new(),
        Some(StringOrInt::String(s)) => s,
        Some(StringOrInt::Int(n)) => {
            let packed = u32::try_from(n)
                .ok()
                .filter(|&n| n <= 0x00FF_FFFF)
                .ok_or_else(|| {
                    <D::Error as serde::de::Error>::custom(format!("color {n} is out of range"))
                })?;
            Color::from_packed(packed).to_hex()
        }
    };
    Ok(color)
}

/// Deserializes an identifier that may be sent as a string or as a number
pub fn parse_id<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrInt::deserialize(d)? {
        StringOrInt::String(s) => s,
        StringOrInt::Int(n) => n.to_string(),
    })
}

/// Renders a serde error together with the part of the document it points at.
pub fn improve_json_error(err: &serde_json::Error, json_string: &str) -> String {
    let Some(line) = json_string.lines().nth(err.line().saturating_sub(1)) else {
        return err.to_string();
    };

    let col = err.column().min(line.len());
    let start = floor_char_boundary(line, col.saturating_sub(40));
    let end = floor_char_boundary(line, (col + 40).min(line.len()));
    let start_ell = if start == 0 { "" } else { "..." };
    let end_ell = if end == line.len() { "" } else { "..." };

    let snippet = line[start..end].trim();
    if snippet.is_empty() {
        return err.to_string();
    }
    format!("{err} | {start_ell}{snippet}{end_ell}")
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
