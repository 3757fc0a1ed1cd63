use crate::embed::{Embed, Field, Key};
use crate::error::{Error, Result};
use crate::wire;

/// Returned by every edit that changes the shape of the collection.
///
/// Whoever displays the collection must redraw it from scratch; positions shown
/// before the edit are no longer valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the collection changed shape and has to be re-rendered"]
pub struct Rerender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Replaced(Rerender),
    /// The collection already had embeds, so nothing was imported
    Protected,
}

/// The ordered embeds of one editing session.
/// Insertion order is display order is export order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedCollection {
    embeds: Vec<Embed>,
}

impl EmbedCollection {
    #[must_use]
    pub const fn new() -> Self {
        Self { embeds: Vec::new() }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.embeds.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.embeds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Embed> {
        self.embeds.iter()
    }

    /// Embeds that survive export: those with a title or a description
    pub fn exportable(&self) -> impl Iterator<Item = &Embed> {
        self.embeds.iter().filter(|e| e.is_exportable())
    }

    pub fn get(&self, index: usize) -> Result<&Embed> {
        let len = self.embeds.len();
        self.embeds.get(index).ok_or(Error::IndexOutOfRange {
            what: "embed",
            index,
            len,
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Embed> {
        let len = self.embeds.len();
        self.embeds.get_mut(index).ok_or(Error::IndexOutOfRange {
            what: "embed",
            index,
            len,
        })
    }

    /// Current position of the embed with the given key, if it still exists.
    #[must_use]
    pub fn position(&self, key: Key) -> Option<usize> {
        self.embeds.iter().position(|e| e.key() == key)
    }

    pub fn push(&mut self, embed: Embed) -> Rerender {
        self.embeds.push(embed);
        Rerender
    }

    pub fn append_blank(&mut self) -> Rerender {
        log::debug!("Appending blank embed #{}", self.embeds.len() + 1);
        self.push(Embed::new())
    }

    pub fn remove_embed(&mut self, index: usize) -> Result<Rerender> {
        self.get(index)?;
        let removed = self.embeds.remove(index);
        log::debug!("Removed embed {} at index {index}", removed.key());
        Ok(Rerender)
    }

    pub fn append_field(&mut self, embed_index: usize) -> Result<Rerender> {
        self.get_mut(embed_index)?.fields.push(Field::new());
        Ok(Rerender)
    }

    pub fn remove_field(&mut self, embed_index: usize, field_index: usize) -> Result<Rerender> {
        let fields = &mut self.get_mut(embed_index)?.fields;
        if field_index >= fields.len() {
            return Err(Error::IndexOutOfRange {
                what: "field",
                index: field_index,
                len: fields.len(),
            });
        }
        fields.remove(field_index);
        Ok(Rerender)
    }

    /// Replaces the (empty) collection with the embeds of an exported document.
    ///
    /// A non-empty collection is never touched, so unsaved edits can't be lost,
    /// and the document is not even parsed in that case. On a parse failure the
    /// collection stays empty.
    pub fn replace_from_import(&mut self, document: &str) -> Result<ImportOutcome> {
        if !self.is_empty() {
            log::debug!("Ignoring import into non-empty collection");
            return Ok(ImportOutcome::Protected);
        }
        self.embeds = wire::from_wire(document)?;
        log::info!("Imported {} embeds", self.embeds.len());
        Ok(ImportOutcome::Replaced(Rerender))
    }
}

impl<'a> IntoIterator for &'a EmbedCollection {
    type Item = &'a Embed;
    type IntoIter = std::slice::Iter<'a, Embed>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(titles: &[&str]) -> EmbedCollection {
        let mut collection = EmbedCollection::new();
        for title in titles {
            let _ = collection.append_blank();
            collection.get_mut(collection.len() - 1).unwrap().title = (*title).to_string();
        }
        collection
    }

    fn titles(collection: &EmbedCollection) -> Vec<&str> {
        collection.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn append_blank_adds_exactly_one_blank_embed() {
        let mut collection = titled(&["a"]);
        let _ = collection.append_blank();

        assert_eq!(collection.len(), 2);
        let embed = collection.get(1).unwrap();
        assert_eq!(embed, &Embed::new());
        assert_eq!(embed.image, None);
        assert_eq!(embed.thumbnail, None);
        assert!(embed.fields.is_empty());
    }

    #[test]
    fn remove_embed_shifts_later_embeds_down() {
        let mut collection = titled(&["a", "b", "c"]);
        let key_c = collection.get(2).unwrap().key();

        let _ = collection.remove_embed(1).unwrap();

        assert_eq!(titles(&collection), ["a", "c"]);
        assert_eq!(collection.position(key_c), Some(1));
    }

    #[test]
    fn remove_embed_past_the_end_fails() {
        let mut collection = titled(&["a", "b"]);
        let err = collection.remove_embed(2).unwrap_err();

        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                what: "embed",
                index: 2,
                len: 2
            }
        ));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn removed_embed_key_no_longer_resolves() {
        let mut collection = titled(&["a", "b"]);
        let key_a = collection.get(0).unwrap().key();
        let _ = collection.remove_embed(0).unwrap();
        assert_eq!(collection.position(key_a), None);
    }

    #[test]
    fn fields_append_and_remove_within_one_embed() {
        let mut collection = titled(&["a", "b"]);
        for _ in 0..3 {
            let _ = collection.append_field(1).unwrap();
        }
        let embed = collection.get_mut(1).unwrap();
        for (i, field) in embed.fields.iter_mut().enumerate() {
            field.name = i.to_string();
        }
        let key_last = embed.fields[2].key();

        let _ = collection.remove_field(1, 0).unwrap();

        let embed = collection.get(1).unwrap();
        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["1", "2"]);
        assert_eq!(embed.field_position(key_last), Some(1));
        assert!(collection.get(0).unwrap().fields.is_empty());
    }

    #[test]
    fn new_fields_are_blank_and_not_inline() {
        let mut collection = titled(&["a"]);
        let _ = collection.append_field(0).unwrap();
        assert_eq!(collection.get(0).unwrap().fields, [Field::new()]);
        assert!(!collection.get(0).unwrap().fields[0].inline);
    }

    #[test]
    fn field_operations_check_both_indices() {
        let mut collection = titled(&["a"]);
        let _ = collection.append_field(0).unwrap();

        assert!(matches!(
            collection.append_field(1),
            Err(Error::IndexOutOfRange { what: "embed", .. })
        ));
        assert!(matches!(
            collection.remove_field(0, 1),
            Err(Error::IndexOutOfRange {
                what: "field",
                index: 1,
                len: 1
            })
        ));
        assert_eq!(collection.get(0).unwrap().fields.len(), 1);
    }

    #[test]
    fn import_fills_empty_collection() {
        let mut collection = EmbedCollection::new();
        let outcome = collection
            .replace_from_import(r#"[{"title": "a"}, {"description": "b"}]"#)
            .unwrap();

        assert_eq!(outcome, ImportOutcome::Replaced(Rerender));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(1).unwrap().description, "b");
    }

    #[test]
    fn import_into_non_empty_collection_is_a_no_op() {
        for document in [r#"[{"title": "new"}]"#, "this is not json"] {
            let mut collection = titled(&["kept"]);
            let before = collection.clone();

            let outcome = collection.replace_from_import(document).unwrap();

            assert_eq!(outcome, ImportOutcome::Protected);
            assert_eq!(collection, before);
        }
    }

    #[test]
    fn malformed_import_leaves_collection_empty() {
        let mut collection = EmbedCollection::new();
        let result = collection.replace_from_import("[{\"title\": }]");
        assert!(matches!(result, Err(Error::MalformedImport(_))));
        assert!(collection.is_empty());
    }

    #[test]
    fn exportable_skips_embeds_without_title_and_description() {
        let mut collection = titled(&["a", "", "c"]);
        let _ = collection.append_field(1).unwrap();
        let exported: Vec<&str> = collection.exportable().map(|e| e.title.as_str()).collect();
        assert_eq!(exported, ["a", "c"]);
        assert_eq!(collection.len(), 3);
    }
}
