use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Error, Result, bail};

/// An embed attribute that can be set with a single string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Title,
    Description,
    Color,
    FooterText,
    FooterIcon,
    AuthorName,
    AuthorIcon,
    Image,
    Thumbnail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAttribute {
    Name,
    Value,
    Inline,
}

/// One line of user input.
///
/// Positions are 1-based, exactly as shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Add,
    Remove(usize),
    Set {
        embed: usize,
        attribute: Attribute,
        value: String,
    },
    FieldAdd(usize),
    FieldRemove {
        embed: usize,
        field: usize,
    },
    FieldSet {
        embed: usize,
        field: usize,
        attribute: FieldAttribute,
        value: String,
    },
    Import(PathBuf),
    Generate,
    Export(Option<PathBuf>),
    Preview(Option<PathBuf>),
    Channels,
    Select(String),
    Send,
    Quit,
}

pub const HELP: &str = "\
Commands (positions are as listed, starting at 1):
  list                              show all embeds
  add                               append a blank embed
  remove N                          remove embed N
  set N ATTR VALUE                  ATTR: title, description, color, footer, footer-icon,
                                          author, author-icon, image, thumbnail
                                    (\\n in VALUE becomes a line break, \\\\ a backslash;
                                     empty VALUE clears)
  field add N                       append a blank field to embed N
  field remove N M                  remove field M of embed N
  field set N M name|value|inline VALUE
  import PATH                       load an exported JSON document (only while empty)
  generate                          print the JSON document
  export [PATH]                     write the JSON document (default discord_embeds.json)
  preview [PATH]                    write an HTML preview (default embed_preview.html)
  channels                          fetch the channel list from the gateway
  select NAME                       choose the channel to send to
  send                              send all embeds with a title or description
  quit";

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "title" => Self::Title,
            "description" | "desc" => Self::Description,
            "color" | "colour" => Self::Color,
            "footer" => Self::FooterText,
            "footer-icon" => Self::FooterIcon,
            "author" => Self::AuthorName,
            "author-icon" => Self::AuthorIcon,
            "image" => Self::Image,
            "thumbnail" => Self::Thumbnail,
            _ => bail!("Unknown attribute {s:?}"),
        })
    }
}

impl FromStr for FieldAttribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "name" => Self::Name,
            "value" => Self::Value,
            "inline" => Self::Inline,
            _ => bail!("Unknown field attribute {s:?}"),
        })
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let (word, rest) = split_word(line.trim());
        let command = match word {
            "help" | "?" => Self::Help,
            "list" | "ls" => Self::List,
            "add" => Self::Add,
            "remove" | "rm" => Self::Remove(position(rest)?),
            "set" => {
                let (embed, rest) = split_word(rest);
                let (attribute, value) = split_word(rest);
                Self::Set {
                    embed: position(embed)?,
                    attribute: attribute.parse()?,
                    value: unescape(value),
                }
            }
            "field" => parse_field(rest)?,
            "import" => Self::Import(PathBuf::from(required(rest, "path")?)),
            "generate" | "json" => Self::Generate,
            "export" => Self::Export(optional_path(rest)),
            "preview" => Self::Preview(optional_path(rest)),
            "channels" => Self::Channels,
            "select" => Self::Select(required(rest, "channel name")?.to_string()),
            "send" => Self::Send,
            "quit" | "exit" => Self::Quit,
            "" => bail!("Empty command"),
            _ => bail!("Unknown command {word:?} (try `help`)"),
        };
        Ok(command)
    }
}

fn parse_field(rest: &str) -> Result<Command> {
    let (action, rest) = split_word(rest);
    let (embed, rest) = split_word(rest);
    let embed = position(embed)?;
    Ok(match action {
        "add" => Command::FieldAdd(embed),
        "remove" | "rm" => Command::FieldRemove {
            embed,
            field: position(rest)?,
        },
        "set" => {
            let (field, rest) = split_word(rest);
            let (attribute, value) = split_word(rest);
            Command::FieldSet {
                embed,
                field: position(field)?,
                attribute: attribute.parse()?,
                value: unescape(value),
            }
        }
        _ => bail!("Unknown field action {action:?} (expected add, remove or set)"),
    })
}

/// Splits off the first whitespace-separated word; the rest keeps inner spacing.
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn position(s: &str) -> Result<usize> {
    let s = s.trim();
    let n: usize = s
        .parse()
        .with_context(|| format!("Expected a position, got {s:?}"))?;
    if n == 0 {
        bail!("Positions start at 1");
    }
    Ok(n)
}

fn required<'a>(s: &'a str, what: &str) -> Result<&'a str> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Missing {what}");
    }
    Ok(s)
}

fn optional_path(s: &str) -> Option<PathBuf> {
    let s = s.trim();
    (!s.is_empty()).then(|| PathBuf::from(s))
}

/// `\n` becomes a line break and `\\` a single backslash; other backslashes stay.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Accepts the usual spellings of yes and no
pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" | "" => Ok(false),
        other => bail!("Expected yes or no, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        line.parse().unwrap()
    }

    #[test]
    fn set_keeps_spaces_and_unescapes_newlines() {
        assert_eq!(
            parse("set 2 description  Hello   world\\nbye"),
            Command::Set {
                embed: 2,
                attribute: Attribute::Description,
                value: "Hello   world\nbye".to_string(),
            }
        );
    }

    #[test]
    fn doubled_backslash_is_literal() {
        assert_eq!(unescape(r"C:\\new"), r"C:\new");
        assert_eq!(unescape(r"a\\\nb"), "a\\\nb");
        assert_eq!(unescape(r"C:\temp\"), r"C:\temp\");
    }

    #[test]
    fn set_without_value_clears() {
        assert_eq!(
            parse("set 1 image"),
            Command::Set {
                embed: 1,
                attribute: Attribute::Image,
                value: String::new(),
            }
        );
    }

    #[test]
    fn field_commands() {
        assert_eq!(parse("field add 3"), Command::FieldAdd(3));
        assert_eq!(
            parse("field rm 1 2"),
            Command::FieldRemove { embed: 1, field: 2 }
        );
        assert_eq!(
            parse("field set 1 2 inline yes"),
            Command::FieldSet {
                embed: 1,
                field: 2,
                attribute: FieldAttribute::Inline,
                value: "yes".to_string(),
            }
        );
    }

    #[test]
    fn optional_paths() {
        assert_eq!(parse("export"), Command::Export(None));
        assert_eq!(
            parse("preview out/page.html"),
            Command::Preview(Some(PathBuf::from("out/page.html")))
        );
    }

    #[test]
    fn rejects_bad_input() {
        for line in ["", "remove", "remove 0", "remove x", "set 1 colr #fff", "field swap 1", "import", "frobnicate"] {
            assert!(line.parse::<Command>().is_err(), "{line:?}");
        }
    }

    #[test]
    fn flags() {
        assert!(parse_flag("Yes").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
