//! Conversion between the editable [`Embed`] state and the JSON schema the
//! gateway (and the platform behind it) understands.
//!
//! Export only includes embeds that have a title or a description; everything
//! else stays editable but never leaves the session.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collection::EmbedCollection;
use crate::embed::{Author, Embed, Field, Footer};
use crate::error::{Error, Result};
use crate::json_util::{improve_json_error, parse_bool, parse_color, parse_string, parse_vec};

/// File name offered for the exported JSON document
pub const EXPORT_FILE_NAME: &str = "discord_embeds.json";
pub const EXPORT_MIME: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireEmbed<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub color: &'a str,
    pub footer: WireFooter<'a>,
    pub author: WireAuthor<'a>,
    pub image: Option<WireImage<'a>>,
    pub thumbnail: Option<WireImage<'a>>,
    pub fields: Vec<WireField<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireFooter<'a> {
    pub text: &'a str,
    pub icon_url: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireAuthor<'a> {
    pub name: &'a str,
    pub icon_url: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireImage<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireField<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub inline: bool,
}

impl<'a> WireEmbed<'a> {
    #[must_use]
    pub fn new(embed: &'a Embed) -> Self {
        Self {
            title: &embed.title,
            description: &embed.description,
            color: &embed.color,
            footer: WireFooter {
                text: &embed.footer.text,
                icon_url: &embed.footer.icon_url,
            },
            author: WireAuthor {
                name: &embed.author.name,
                icon_url: &embed.author.icon_url,
            },
            image: embed.image_url().map(|url| WireImage { url }),
            thumbnail: embed.thumbnail_url().map(|url| WireImage { url }),
            fields: embed
                .fields
                .iter()
                .map(|f| WireField {
                    name: &f.name,
                    value: &f.value,
                    inline: f.inline,
                })
                .collect(),
        }
    }
}

/// Borrows every exportable embed of the collection in wire form, in order.
#[must_use]
pub fn to_wire(collection: &EmbedCollection) -> Vec<WireEmbed<'_>> {
    collection.exportable().map(WireEmbed::new).collect()
}

/// The exported document: [`to_wire`] as indented JSON.
pub fn to_json(collection: &EmbedCollection) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_wire(collection))
}

#[derive(Deserialize)]
struct ImportedEmbed {
    #[serde(default, deserialize_with = "parse_string")]
    title: String,
    #[serde(default, deserialize_with = "parse_string")]
    description: String,
    #[serde(default, deserialize_with = "parse_color")]
    color: String,
    #[serde(default)]
    footer: Option<ImportedFooter>,
    #[serde(default)]
    author: Option<ImportedAuthor>,
    #[serde(default)]
    image: Option<ImportedImage>,
    #[serde(default)]
    thumbnail: Option<ImportedImage>,
    #[serde(default, deserialize_with = "parse_vec")]
    fields: Vec<ImportedField>,
}

#[derive(Deserialize)]
struct ImportedFooter {
    #[serde(default, deserialize_with = "parse_string")]
    text: String,
    #[serde(default, deserialize_with = "parse_string")]
    icon_url: String,
}

#[derive(Deserialize)]
struct ImportedAuthor {
    #[serde(default, deserialize_with = "parse_string")]
    name: String,
    #[serde(default, deserialize_with = "parse_string")]
    icon_url: String,
}

#[derive(Deserialize)]
struct ImportedImage {
    #[serde(default)]
    url: Option<String>,
}

impl ImportedImage {
    fn into_url(self) -> Option<String> {
        self.url.filter(|u| !u.is_empty())
    }
}

#[derive(Deserialize)]
struct ImportedField {
    #[serde(default, deserialize_with = "parse_string")]
    name: String,
    #[serde(default, deserialize_with = "parse_string")]
    value: String,
    #[serde(default, deserialize_with = "parse_bool")]
    inline: bool,
}

impl From<ImportedEmbed> for Embed {
    fn from(imported: ImportedEmbed) -> Self {
        let mut embed = Self::new();
        embed.title = imported.title;
        embed.description = imported.description;
        embed.color = imported.color;
        if let Some(footer) = imported.footer {
            embed.footer = Footer {
                text: footer.text,
                icon_url: footer.icon_url,
            };
        }
        if let Some(author) = imported.author {
            embed.author = Author {
                name: author.name,
                icon_url: author.icon_url,
            };
        }
        embed.image = imported.image.and_then(ImportedImage::into_url);
        embed.thumbnail = imported.thumbnail.and_then(ImportedImage::into_url);
        embed.fields = imported
            .fields
            .into_iter()
            .map(|f| Field::with(f.name, f.value, f.inline))
            .collect();
        embed
    }
}

/// Parses a previously exported document back into editable embeds.
///
/// Missing or `null` keys take the blank-embed defaults. Anything that is not
/// an array of objects is a [`Error::MalformedImport`].
pub fn from_wire(document: &str) -> Result<Vec<Embed>> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(document)
        .map_err(|e| Error::MalformedImport(improve_json_error(&e, document)))?;

    objects
        .into_iter()
        .enumerate()
        .map(|(i, object)| {
            serde_json::from_value::<ImportedEmbed>(Value::Object(object))
                .map(Embed::from)
                .map_err(|e| Error::MalformedImport(format!("embed #{}: {e}", i + 1)))
        })
        .collect()
}
