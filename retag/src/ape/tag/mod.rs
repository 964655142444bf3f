pub(crate) mod gain;
pub(crate) mod item;
pub(crate) mod read;
mod write;

use crate::ape::constants::APE_VERSION_2;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::tag::Accessor;
use gain::{Mp3GainItems, ReplayGainItems};
use item::ApeItem;

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

macro_rules! impl_accessor {
	($($name:ident => $key:literal;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.get_text($key).map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.insert(ApeItem::text($key, value));
				}

				fn [<remove_ $name>](&mut self) {
					self.remove($key);
				}
			)+
		}
	}
}

// Getters and setters for the well known keys without an `Accessor` counterpart
macro_rules! impl_known_fields {
	($($name:ident => $key:literal;)+) => {
		paste::paste! {
			$(
				#[doc = "Returns the `" $key "` item"]
				pub fn $name(&self) -> Option<&str> {
					self.get_text($key)
				}

				#[doc = "Sets the `" $key "` item, returning the previous value"]
				pub fn [<set_ $name>](&mut self, value: String) -> Option<String> {
					let previous = self.$name().map(str::to_owned);
					self.insert(ApeItem::text($key, value));
					previous
				}
			)+
		}
	}
}

/// An `APE` tag
///
/// ## Item storage
///
/// Items are kept in the order they were read or inserted. Keys are matched case-insensitively,
/// and keys read from a file are upper-cased.
///
/// When a file holds the same key more than once, the **first** value is kept, unless it is
/// empty, in which case the next value replaces it. Every other duplicate is discarded.
///
/// Items prefixed by `REPLAYGAIN_` and `MP3GAIN_` are also exposed as dedicated collections,
/// see [`ApeTag::replay_gain`] and [`ApeTag::mp3_gain`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ApeTag {
	/// Whether or not to mark the tag as read only
	pub read_only: bool,
	pub(super) version: u32,
	pub(crate) items: Vec<ApeItem>,
	pub(super) offset: Option<u64>,
	pub(super) size_on_disk: u64,
}

impl Default for ApeTag {
	fn default() -> Self {
		Self {
			read_only: false,
			version: APE_VERSION_2,
			items: Vec::new(),
			offset: None,
			size_on_disk: 0,
		}
	}
}

impl ApeTag {
	/// Create a new empty `ApeTag`
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::ape::ApeTag;
	///
	/// let ape_tag = ApeTag::new();
	/// assert!(ape_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// The tag version, 1000 (APEv1) or 2000 (APEv2)
	pub fn version(&self) -> u32 {
		self.version
	}

	/// The offset of the tag in the file it was read from
	pub fn offset(&self) -> Option<u64> {
		self.offset
	}

	/// The full size of the tag in the file it was read from, including its header and footer
	pub fn size_on_disk(&self) -> u64 {
		self.size_on_disk
	}

	/// The number of items
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether the tag has no items
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns an iterator over the items
	pub fn items(&self) -> std::slice::Iter<'_, ApeItem> {
		self.items.iter()
	}

	/// Get an [`ApeItem`] by key
	///
	/// NOTE: While `APE` items are supposed to be case-sensitive,
	/// this rule is rarely followed, so this will ignore case when searching.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::ape::ApeTag;
	/// use retag::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	///
	/// // Get the title by its key
	/// let title = ape_tag.get("Title");
	/// assert!(title.is_some());
	/// ```
	pub fn get(&self, key: &str) -> Option<&ApeItem> {
		self.items
			.iter()
			.find(|i| i.key().eq_ignore_ascii_case(key))
	}

	/// Get the text of a text item
	pub fn get_text(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(|item| item.value().text())
	}

	/// Insert an [`ApeItem`]
	///
	/// This replaces any item with the same key, keeping its position. The replaced item is
	/// returned.
	pub fn insert(&mut self, item: ApeItem) -> Option<ApeItem> {
		match self
			.items
			.iter_mut()
			.find(|i| i.key().eq_ignore_ascii_case(item.key()))
		{
			Some(existing) => Some(std::mem::replace(existing, item)),
			None => {
				self.items.push(item);
				None
			},
		}
	}

	/// Insert an item read from a file, applying the duplicate key rule
	pub(super) fn insert_read(&mut self, item: ApeItem) {
		match self
			.items
			.iter_mut()
			.find(|i| i.key().eq_ignore_ascii_case(item.key()))
		{
			Some(existing) if existing.value().is_empty() => {
				log::debug!("APE: Replacing empty duplicate of '{}'", item.key());
				*existing = item;
			},
			Some(_) => log::warn!("APE: Discarding duplicate item '{}'", item.key()),
			None => self.items.push(item),
		}
	}

	/// Remove an [`ApeItem`] by key
	///
	/// NOTE: Like [`ApeTag::get`], this is not case-sensitive
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::ape::ApeTag;
	/// use retag::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	///
	/// // Remove the title
	/// let removed = ape_tag.remove("Title");
	/// assert!(removed.is_some());
	/// assert!(ape_tag.get("Title").is_none());
	/// ```
	pub fn remove(&mut self, key: &str) -> Option<ApeItem> {
		let position = self
			.items
			.iter()
			.position(|i| i.key().eq_ignore_ascii_case(key))?;
		Some(self.items.remove(position))
	}

	impl_known_fields! {
		publisher   => "PUBLISHER";
		catalog     => "CATALOG";
		record_date => "RECORD DATE";
		media       => "MEDIA";
		language    => "LANGUAGE";
	}

	/// The `REPLAYGAIN_*` items
	pub fn replay_gain(&self) -> ReplayGainItems {
		ReplayGainItems::from_tag(self)
	}

	/// Replace every `REPLAYGAIN_*` item handled by [`ReplayGainItems`]
	pub fn set_replay_gain(&mut self, items: ReplayGainItems) {
		items.store(self);
	}

	/// The `MP3GAIN_*` items
	pub fn mp3_gain(&self) -> Mp3GainItems {
		Mp3GainItems::from_tag(self)
	}

	/// Replace every `MP3GAIN_*` item handled by [`Mp3GainItems`]
	pub fn set_mp3_gain(&mut self, items: Mp3GainItems) {
		items.store(self);
	}

	/// Checks for an APE tag at the end of `reader`
	///
	/// # Errors
	///
	/// * Failure to read from `reader`
	/// * The footer is malformed
	pub fn exists<R>(reader: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		Ok(read::read_ape_tag(reader, false, ParseOptions::new())?.is_some())
	}

	/// Read a tag from the end of `reader`
	///
	/// Returns `None` if no tag is present.
	///
	/// # Errors
	///
	/// * The footer is malformed
	/// * An item is malformed
	/// * Failure to read from `reader`
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Option<Self>>
	where
		R: Read + Seek,
	{
		read::read_ape_tag(reader, true, parse_options)
	}

	/// Read a tag from the file at `path`
	///
	/// # Errors
	///
	/// See [`ApeTag::read_from`]
	pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Option<Self>>
	where
		P: AsRef<Path>,
	{
		let mut reader = BufReader::new(File::open(path)?);
		Self::read_from(&mut reader, parse_options)
	}

	/// Serialize the tag: header, items and footer
	///
	/// A tag without items serializes to nothing.
	///
	/// # Errors
	///
	/// * The tag is too large
	pub fn get_bytes(&self) -> Result<Vec<u8>> {
		write::create_ape_tag(self)
	}

	/// Save the tag to the end of the file at `path`
	///
	/// Any existing APE tag is replaced. Otherwise, the tag is placed at the end of the file,
	/// before an ID3v1 tag if there is one. Saving an empty tag removes the existing one.
	///
	/// # Errors
	///
	/// * [`WriteOptions::respect_read_only`] and the existing tag is read only
	/// * See [`ApeTag::get_bytes`]
	/// * Failure to write to the file
	pub fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		write::write_to_path(self, path.as_ref(), write_options)
	}

	/// Remove an APE tag from the file at `path`
	///
	/// Returns `false` (leaving the file untouched) if there was no tag to remove.
	///
	/// # Errors
	///
	/// * The existing footer is malformed
	/// * Failure to write to the file
	pub fn remove_from_path<P>(path: P) -> Result<bool>
	where
		P: AsRef<Path>,
	{
		write::remove_from_path(path.as_ref())
	}
}

impl IntoIterator for ApeTag {
	type Item = ApeItem;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a> IntoIterator for &'a ApeTag {
	type Item = &'a ApeItem;
	type IntoIter = std::slice::Iter<'a, ApeItem>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

impl Accessor for ApeTag {
	impl_accessor!(
		title   => "TITLE";
		artist  => "ARTIST";
		album   => "ALBUM";
		genre   => "GENRE";
		track   => "TRACK";
		comment => "COMMENT";
	);

	// For some reason, the ecosystem agreed on the key "Year", even for full date strings.
	fn year(&self) -> Option<Cow<'_, str>> {
		self.get_text("YEAR")
			.or_else(|| self.get_text("RECORD DATE"))
			.map(Cow::Borrowed)
	}

	fn set_year(&mut self, value: String) {
		self.insert(ApeItem::text("YEAR", value));
	}

	fn remove_year(&mut self) {
		self.remove("YEAR");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ape::ApeItemValue;

	#[test_log::test]
	fn case_insensitive_keys() {
		let mut tag = ApeTag::new();
		tag.set_title(String::from("Foo"));

		assert_eq!(tag.get_text("title"), Some("Foo"));
		assert_eq!(tag.title().as_deref(), Some("Foo"));

		let previous = tag.insert(ApeItem::text("Title", String::from("Bar")));
		assert_eq!(previous.map(ApeItem::into_value), Some(ApeItemValue::Text(String::from("Foo"))));
		assert_eq!(tag.len(), 1);

		assert!(tag.remove("TITLE").is_some());
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn known_fields() {
		let mut tag = ApeTag::new();
		assert!(tag.set_publisher(String::from("Label")).is_none());
		assert_eq!(tag.set_publisher(String::from("Other label")).as_deref(), Some("Label"));
		assert_eq!(tag.publisher(), Some("Other label"));

		tag.set_record_date(String::from("2001-02-03"));
		assert_eq!(tag.year().as_deref(), Some("2001-02-03"));
		tag.set_year(String::from("2001"));
		assert_eq!(tag.year().as_deref(), Some("2001"));
	}

	#[test_log::test]
	fn duplicate_rule() {
		let mut tag = ApeTag::new();
		tag.insert_read(ApeItem::text("ARTIST", String::new()));
		tag.insert_read(ApeItem::text("ARTIST", String::from("First")));
		tag.insert_read(ApeItem::text("ARTIST", String::from("Second")));

		assert_eq!(tag.len(), 1);
		assert_eq!(tag.artist().as_deref(), Some("First"));
	}
}
