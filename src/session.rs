//! Line-oriented front end that owns one [`EmbedCollection`] for the duration
//! of a run.
//!
//! Positions typed by the user refer to the last listing. Each listing records
//! the keys it showed, and every command goes through those keys, so an edit
//! can never land on an embed that merely moved into the shown position.

mod command;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize as _;

pub use command::{Attribute, Command, FieldAttribute, HELP};

use crate::collection::{EmbedCollection, ImportOutcome, Rerender};
use crate::embed::{Embed, Key};
use crate::gateway::{Channels, GatewayClient};
use crate::{preview, validate, wire};

pub const PREVIEW_FILE_NAME: &str = "embed_preview.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Keys shown by the last listing, by position
#[derive(Debug, Clone)]
struct Binding {
    embed: Key,
    fields: Vec<Key>,
}

pub struct Session<W: Write> {
    out: W,
    collection: EmbedCollection,
    gateway: Option<GatewayClient>,
    channels: Channels,
    selected_channel: Option<String>,
    bindings: Vec<Binding>,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, gateway: Option<GatewayClient>) -> Self {
        Self {
            out,
            collection: EmbedCollection::new(),
            gateway,
            channels: Channels::new(),
            selected_channel: None,
            bindings: Vec::new(),
        }
    }

    #[must_use]
    pub const fn collection(&self) -> &EmbedCollection {
        &self.collection
    }

    #[must_use]
    pub const fn output(&self) -> &W {
        &self.out
    }

    #[must_use]
    pub fn selected_channel(&self) -> Option<&str> {
        self.selected_channel.as_deref()
    }

    /// Parses and runs one line. Failures are reported to the user, never returned.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        let result = line
            .parse::<Command>()
            .and_then(|command| self.execute(command));
        match result {
            Ok(flow) => flow,
            Err(e) => {
                log::debug!("Command {line:?} failed: {e:?}");
                let _ = writeln!(self.out, "{} {e:#}", "error:".red().bold());
                Flow::Continue
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::List => self.render()?,
            Command::Add => {
                let rerender = self.collection.append_blank();
                self.apply(rerender)?;
            }
            Command::Remove(pos) => {
                let index = self.resolve_embed(pos)?;
                let rerender = self.collection.remove_embed(index)?;
                self.apply(rerender)?;
            }
            Command::Set {
                embed,
                attribute,
                value,
            } => {
                let index = self.resolve_embed(embed)?;
                set_attribute(self.collection.get_mut(index)?, attribute, value)?;
            }
            Command::FieldAdd(pos) => {
                let index = self.resolve_embed(pos)?;
                let rerender = self.collection.append_field(index)?;
                self.apply(rerender)?;
            }
            Command::FieldRemove { embed, field } => {
                let (index, field_index) = self.resolve_field(embed, field)?;
                let rerender = self.collection.remove_field(index, field_index)?;
                self.apply(rerender)?;
            }
            Command::FieldSet {
                embed,
                field,
                attribute,
                value,
            } => {
                let (index, field_index) = self.resolve_field(embed, field)?;
                let field = &mut self.collection.get_mut(index)?.fields[field_index];
                match attribute {
                    FieldAttribute::Name => field.name = value,
                    FieldAttribute::Value => field.value = value,
                    FieldAttribute::Inline => field.inline = command::parse_flag(&value)?,
                }
            }
            Command::Import(path) => self.import(&path)?,
            Command::Generate => {
                let json = wire::to_json(&self.collection).context("Could not serialize embeds")?;
                writeln!(self.out, "{json}")?;
            }
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(wire::EXPORT_FILE_NAME));
                self.export(&path)?;
            }
            Command::Preview(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(PREVIEW_FILE_NAME));
                std::fs::write(&path, preview::render(&self.collection))
                    .with_context(|| format!("Could not write preview to {}", path.display()))?;
                writeln!(self.out, "Preview written to {}", path.display())?;
            }
            Command::Channels => self.refresh_channels()?,
            Command::Select(name) => self.select(name)?,
            Command::Send => {
                let gateway = self.gateway()?;
                gateway.send(self.selected_channel.as_deref(), &self.collection)?;
                writeln!(self.out, "{}", "Embeds sent.".green())?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, _: Rerender) -> Result<()> {
        self.render()
    }

    /// Lists the collection and rebinds displayed positions to keys.
    pub fn render(&mut self) -> Result<()> {
        self.bindings = self
            .collection
            .iter()
            .map(|e| Binding {
                embed: e.key(),
                fields: e.fields.iter().map(|f| f.key()).collect(),
            })
            .collect();

        if self.collection.is_empty() {
            writeln!(self.out, "{}", "No embeds yet; `add` one or `import` a file.".dimmed())?;
            return Ok(());
        }
        for (i, embed) in self.collection.iter().enumerate() {
            render_embed(&mut self.out, i + 1, embed)?;
        }
        Ok(())
    }

    fn binding(&self, pos: usize) -> Result<&Binding> {
        pos.checked_sub(1)
            .and_then(|i| self.bindings.get(i))
            .with_context(|| format!("There is no embed {pos} in the current listing"))
    }

    fn resolve_embed(&self, pos: usize) -> Result<usize> {
        let binding = self.binding(pos)?;
        self.collection
            .position(binding.embed)
            .with_context(|| format!("Embed {pos} no longer exists; `list` again"))
    }

    fn resolve_field(&self, embed_pos: usize, field_pos: usize) -> Result<(usize, usize)> {
        let index = self.resolve_embed(embed_pos)?;
        let Some(&key) = field_pos
            .checked_sub(1)
            .and_then(|i| self.binding(embed_pos).ok()?.fields.get(i))
        else {
            bail!("Embed {embed_pos} has no field {field_pos} in the current listing");
        };
        let field_index = self
            .collection
            .get(index)?
            .field_position(key)
            .with_context(|| format!("Field {field_pos} no longer exists; `list` again"))?;
        Ok((index, field_index))
    }

    fn import(&mut self, path: &Path) -> Result<()> {
        if !self.collection.is_empty() {
            writeln!(
                self.out,
                "{}",
                "Import skipped: the collection already has embeds.".yellow()
            )?;
            return Ok(());
        }
        let document = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        match self.collection.replace_from_import(&document)? {
            ImportOutcome::Replaced(rerender) => self.apply(rerender),
            ImportOutcome::Protected => Ok(()),
        }
    }

    fn export(&mut self, path: &Path) -> Result<()> {
        let json = wire::to_json(&self.collection).context("Could not serialize embeds")?;
        std::fs::write(path, json).with_context(|| format!("Could not write {}", path.display()))?;
        let count = self.collection.exportable().count();
        log::info!("Exported {count} embeds as {}", wire::EXPORT_MIME);
        writeln!(self.out, "Wrote {count} embeds to {}", path.display())?;
        Ok(())
    }

    fn gateway(&self) -> Result<&GatewayClient> {
        self.gateway
            .as_ref()
            .context("The channel gateway is not configured (see --help)")
    }

    fn refresh_channels(&mut self) -> Result<()> {
        self.channels = self.gateway()?.list_channels();
        if self.channels.is_empty() {
            writeln!(
                self.out,
                "{}",
                "No channels available; the gateway may be unreachable.".yellow()
            )?;
            return Ok(());
        }
        for (name, id) in &self.channels {
            writeln!(self.out, "  {name} {}", format!("({})", id.0).dimmed())?;
        }
        Ok(())
    }

    fn select(&mut self, name: String) -> Result<()> {
        if self.channels.is_empty() {
            log::warn!("Selecting {name:?} without a channel listing");
        } else if !self.channels.contains_key(&name) {
            bail!("Unknown channel {name:?} (run `channels` to list them)");
        }
        writeln!(self.out, "Selected channel {name}")?;
        self.selected_channel = Some(name);
        Ok(())
    }
}

fn set_attribute(embed: &mut Embed, attribute: Attribute, value: String) -> Result<()> {
    match attribute {
        Attribute::Title => embed.title = value,
        Attribute::Description => embed.description = value,
        Attribute::Color => {
            validate::hex_color(&value)?;
            embed.color = value;
        }
        Attribute::FooterText => embed.footer.text = value,
        Attribute::FooterIcon => embed.footer.icon_url = value,
        Attribute::AuthorName => embed.author.name = value,
        Attribute::AuthorIcon => embed.author.icon_url = value,
        Attribute::Image => embed.image = Some(value).filter(|v| !v.is_empty()),
        Attribute::Thumbnail => embed.thumbnail = Some(value).filter(|v| !v.is_empty()),
    }
    Ok(())
}

fn render_embed(out: &mut impl Write, pos: usize, embed: &Embed) -> std::io::Result<()> {
    let heading = format!("Embed {pos}");
    write!(out, "{} {}", heading.bold(), embed.render_color())?;
    if !embed.title.is_empty() {
        write!(out, " {:?}", embed.title)?;
    }
    if !embed.is_exportable() {
        write!(out, " {}", "(no title or description; not exported)".dimmed())?;
    }
    writeln!(out)?;

    if !embed.description.is_empty() {
        writeln!(out, "  description: {:?}", embed.description)?;
    }
    for (i, field) in embed.fields.iter().enumerate() {
        let inline = if field.inline { " (inline)" } else { "" };
        writeln!(
            out,
            "  field {}: {:?} = {:?}{inline}",
            i + 1,
            field.name,
            field.value
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<Vec<u8>> {
        Session::new(Vec::new(), None)
    }

    fn run(session: &mut Session<Vec<u8>>, lines: &[&str]) {
        for line in lines {
            assert_eq!(session.handle_line(line), Flow::Continue, "{line}");
        }
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(session.output()).into_owned()
    }

    #[test]
    fn edits_follow_the_listing() {
        let mut s = session();
        run(
            &mut s,
            &[
                "add",
                "add",
                "set 1 title First",
                "set 2 title Second",
                "field add 2",
                "field set 2 1 name Key",
                "field set 2 1 inline yes",
                "remove 1",
                "set 1 description moved up",
            ],
        );

        let embed = s.collection().get(0).unwrap();
        assert_eq!(s.collection().len(), 1);
        assert_eq!(embed.title, "Second");
        assert_eq!(embed.description, "moved up");
        assert_eq!(embed.fields[0].name, "Key");
        assert!(embed.fields[0].inline);
    }

    #[test]
    fn edits_bind_to_keys_not_positions() {
        let mut s = session();
        run(&mut s, &["add", "add", "set 1 title A", "set 2 title B"]);
        // Removing behind the listing's back must not redirect edits
        let _ = s.collection.remove_embed(0).unwrap();

        run(&mut s, &["set 2 description still B", "set 1 title lost"]);
        assert!(output(&s).contains("Embed 1 no longer exists"));
        assert_eq!(s.collection().len(), 1);
        let embed = s.collection().get(0).unwrap();
        assert_eq!(embed.title, "B");
        assert_eq!(embed.description, "still B");
    }

    #[test]
    fn field_edits_bind_to_keys_not_positions() {
        let mut s = session();
        run(
            &mut s,
            &[
                "add",
                "field add 1",
                "field add 1",
                "field add 1",
                "field set 1 1 name first",
                "field set 1 2 name second",
                "field set 1 3 name third",
            ],
        );
        // Removing behind the listing's back must not redirect edits
        let _ = s.collection.remove_field(0, 0).unwrap();

        run(&mut s, &["field set 1 1 value lost", "field set 1 2 value moved"]);
        assert!(output(&s).contains("Field 1 no longer exists"));

        let fields = &s.collection().get(0).unwrap().fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "second");
        assert_eq!(fields[0].value, "moved");
        assert_eq!(fields[1].name, "third");
        assert!(fields[1].value.is_empty());
    }

    #[test]
    fn invalid_color_is_reported_and_ignored() {
        let mut s = session();
        run(&mut s, &["add", "set 1 color red"]);
        assert!(output(&s).contains("#RRGGBB"));
        assert!(s.collection().get(0).unwrap().color.is_empty());

        run(&mut s, &["set 1 color #00FF00"]);
        assert_eq!(s.collection().get(0).unwrap().color, "#00FF00");
    }

    #[test]
    fn clearing_image_sets_none() {
        let mut s = session();
        run(&mut s, &["add", "set 1 image https://example.com/a.png", "set 1 image"]);
        assert_eq!(s.collection().get(0).unwrap().image, None);
    }

    #[test]
    fn generate_prints_only_exportable_embeds() {
        let mut s = session();
        run(&mut s, &["add", "add", "set 2 title Shown", "generate"]);
        let out = output(&s);
        assert!(out.contains("\"title\": \"Shown\""));
        assert_eq!(out.matches("\"title\"").count(), 1);
    }

    #[test]
    fn export_then_import_restores_embeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(wire::EXPORT_FILE_NAME);

        let mut s = session();
        run(
            &mut s,
            &["add", "set 1 title Hello", "field add 1", "field set 1 1 value v"],
        );
        s.handle_line(&format!("export {}", path.display()));

        let mut restored = session();
        restored.handle_line(&format!("import {}", path.display()));
        assert_eq!(restored.collection(), s.collection());
    }

    #[test]
    fn import_into_non_empty_session_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        std::fs::write(&path, r#"[{"title": "imported"}]"#).unwrap();

        let mut s = session();
        let import = format!("import {}", path.display());
        run(&mut s, &["add", import.as_str()]);
        assert_eq!(s.collection().len(), 1);
        assert!(s.collection().get(0).unwrap().title.is_empty());
        assert!(output(&s).contains("Import skipped"));
    }

    #[test]
    fn malformed_import_keeps_session_usable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut s = session();
        s.handle_line(&format!("import {}", path.display()));
        assert!(output(&s).contains("malformed import"));
        assert!(s.collection().is_empty());
        run(&mut s, &["add"]);
        assert_eq!(s.collection().len(), 1);
    }

    #[test]
    fn gateway_commands_without_gateway_fail_softly() {
        let mut s = session();
        run(&mut s, &["channels", "send"]);
        assert!(output(&s).contains("not configured"));
    }

    #[test]
    fn quit_stops() {
        assert_eq!(session().handle_line("quit"), Flow::Quit);
    }
}
