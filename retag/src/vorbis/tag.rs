use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::picture::{Picture, PictureInformation, PictureType};
use crate::tag::Accessor;

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

macro_rules! impl_accessor {
	($($name:ident => $key:literal;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.get($key).map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.insert(String::from($key), value)
				}

				fn [<remove_ $name>](&mut self) {
					let _ = self.remove($key);
				}
			)+
		}
	}
}

/// Vorbis comments
///
/// ## Pictures
///
/// Pictures stored in `METADATA_BLOCK_PICTURE` fields are decoded on read, and are kept
/// separately from the text fields. They are written back as `METADATA_BLOCK_PICTURE` fields.
/// FLAC `PICTURE` blocks are not part of the tag, see [`FlacFile::pictures`](crate::flac::FlacFile::pictures).
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct VorbisComments {
	/// An identifier for the encoding software
	pub(crate) vendor: String,
	/// A collection of key-value pairs
	pub(crate) items: Vec<(String, String)>,
	/// A collection of all pictures
	pub(crate) pictures: Vec<(Picture, PictureInformation)>,
}

impl VorbisComments {
	/// Create a new empty `VorbisComments`
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::vorbis::VorbisComments;
	///
	/// let vorbis_comments_tag = VorbisComments::new();
	/// assert!(vorbis_comments_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the vendor string
	pub fn vendor(&self) -> &str {
		&self.vendor
	}

	/// Sets the vendor string
	///
	/// NOTE: The vendor of a file's existing tag takes precedence when saving, this is only used
	/// for files without one.
	pub fn set_vendor(&mut self, vendor: String) {
		self.vendor = vendor
	}

	/// Returns the number of fields, pictures excluded
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether the tag has no fields and no pictures
	pub fn is_empty(&self) -> bool {
		self.items.is_empty() && self.pictures.is_empty()
	}

	/// Get all items
	///
	/// Returns an [`Iterator`] over the stored key/value pairs, in order.
	///
	/// ```rust
	/// use retag::vorbis::VorbisComments;
	///
	/// let mut vorbis_comments = VorbisComments::default();
	///
	/// vorbis_comments.push(String::from("ARTIST"), String::from("Foo artist"));
	/// vorbis_comments.push(String::from("TITLE"), String::from("Bar title"));
	///
	/// let mut items = vorbis_comments.items();
	///
	/// assert_eq!(items.next(), Some(("ARTIST", "Foo artist")));
	/// assert_eq!(items.next(), Some(("TITLE", "Bar title")));
	/// ```
	pub fn items(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + Clone {
		self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Gets the first item with `key`
	///
	/// There can be multiple items with the same key, this grabs whichever happens to be first.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::vorbis::VorbisComments;
	///
	/// let mut vorbis_comments = VorbisComments::default();
	///
	/// vorbis_comments.push(String::from("ARTIST"), String::from("Foo artist"));
	/// vorbis_comments.push(String::from("artist"), String::from("Bar artist"));
	///
	/// assert_eq!(vorbis_comments.get("Artist"), Some("Foo artist"));
	/// ```
	pub fn get(&self, key: &str) -> Option<&str> {
		if !verify_key(key) {
			return None;
		}

		self.items
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_str())
	}

	/// Gets all items with the key
	pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + Clone + 'a {
		self.items
			.iter()
			.filter_map(move |(k, v)| (k.eq_ignore_ascii_case(key)).then_some(v.as_str()))
	}

	/// Inserts an item, replacing every item with the same key
	///
	/// The new item takes the place of the first item it replaces, or is appended.
	///
	/// NOTE: This will do nothing if the key is invalid. Keys may only consist of ASCII 0x20
	/// through 0x7D, excluding `=`.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::vorbis::VorbisComments;
	///
	/// let mut tag = VorbisComments::default();
	/// tag.insert(String::from("TITLE"), String::from("Title 1"));
	/// tag.insert(String::from("ARTIST"), String::from("Artist"));
	/// tag.insert(String::from("title"), String::from("Title 2"));
	///
	/// let items = tag.items().collect::<Vec<_>>();
	/// assert_eq!(items, [("title", "Title 2"), ("ARTIST", "Artist")]);
	/// ```
	pub fn insert(&mut self, key: String, value: String) {
		if !verify_key(&key) {
			log::warn!("Vorbis comments: Refusing to insert an item with the key '{}'", key);
			return;
		}

		match self.items.iter().position(|(k, _)| k.eq_ignore_ascii_case(&key)) {
			Some(index) => {
				let mut current = index + 1;
				while current < self.items.len() {
					if self.items[current].0.eq_ignore_ascii_case(&key) {
						self.items.remove(current);
					} else {
						current += 1;
					}
				}

				self.items[index] = (key, value);
			},
			None => self.items.push((key, value)),
		}
	}

	/// Appends an item
	///
	/// NOTE: This will do nothing if the key is invalid, see [`VorbisComments::insert`].
	pub fn push(&mut self, key: String, value: String) {
		if !verify_key(&key) {
			log::warn!("Vorbis comments: Refusing to push an item with the key '{}'", key);
			return;
		}

		self.items.push((key, value))
	}

	/// Removes all items with a key, returning their values
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::vorbis::VorbisComments;
	///
	/// let mut tag = VorbisComments::default();
	/// tag.push(String::from("TITLE"), String::from("Title 1"));
	/// tag.push(String::from("Title"), String::from("Title 2"));
	///
	/// let removed = tag.remove("TITLE").collect::<Vec<_>>();
	/// assert_eq!(removed, ["Title 1", "Title 2"]);
	/// assert!(tag.is_empty());
	/// ```
	pub fn remove(&mut self, key: &str) -> impl Iterator<Item = String> + use<> {
		let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
			.into_iter()
			.partition(|(k, _)| k.eq_ignore_ascii_case(key));

		self.items = kept;
		removed.into_iter().map(|(_, v)| v)
	}

	/// Returns the pictures stored in `METADATA_BLOCK_PICTURE` fields
	pub fn pictures(&self) -> &[(Picture, PictureInformation)] {
		&self.pictures
	}

	/// Inserts a picture, replacing any picture of the same [`PictureType`]
	///
	/// Returns the replaced picture.
	pub fn insert_picture(
		&mut self,
		picture: Picture,
		information: Option<PictureInformation>,
	) -> Option<(Picture, PictureInformation)> {
		let information = information.unwrap_or_default();
		let existing = self
			.pictures
			.iter()
			.position(|(p, _)| p.pic_type() == picture.pic_type());

		match existing {
			Some(index) => Some(std::mem::replace(
				&mut self.pictures[index],
				(picture, information),
			)),
			None => {
				self.pictures.push((picture, information));
				None
			},
		}
	}

	/// Removes every picture of the given type
	pub fn remove_picture_type(&mut self, picture_type: PictureType) {
		self.pictures.retain(|(p, _)| p.pic_type() != picture_type);
	}

	/// The fields as they are written
	///
	/// * Empty items are dropped
	/// * `YEAR` items are dropped, the first one becomes `DATE` if there is no `DATE`
	pub(crate) fn items_to_write(&self) -> Vec<(&str, &str)> {
		let has_date = self
			.items
			.iter()
			.any(|(k, v)| k.eq_ignore_ascii_case("DATE") && !v.is_empty());

		let mut year_moved = has_date;
		let mut items = Vec::with_capacity(self.items.len());
		for (key, value) in &self.items {
			if value.is_empty() {
				log::trace!("Vorbis comments: Omitting empty item '{}'", key);
				continue;
			}

			if key.eq_ignore_ascii_case("YEAR") {
				if !year_moved {
					log::debug!("Vorbis comments: Writing YEAR as DATE");
					items.push(("DATE", value.as_str()));
					year_moved = true;
				}
				continue;
			}

			items.push((key.as_str(), value.as_str()));
		}

		items
	}

	/// Read the tag from the FLAC file at `path`
	///
	/// Returns `None` if the file has no Vorbis comment block.
	///
	/// # Errors
	///
	/// See [`FlacFile::read_from`](crate::flac::FlacFile::read_from)
	pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Option<Self>>
	where
		P: AsRef<Path>,
	{
		let file = crate::flac::FlacFile::read_from_path(path, parse_options)?;
		Ok(file.vorbis_comments)
	}

	/// Save the tag to the FLAC file at `path`
	///
	/// The comment block is rewritten in place when it fits in the existing metadata (taking
	/// any padding into account), otherwise the file is rewritten with fresh padding, see
	/// [`WriteOptions::preferred_padding`].
	///
	/// # Errors
	///
	/// * The file is not a FLAC file
	/// * The file has multiple `STREAMINFO` or `SEEKTABLE` blocks
	/// * The tag does not fit in a metadata block
	/// * The file cannot be rewritten
	pub fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		crate::flac::write::write_to_path(path.as_ref(), Some(self), write_options)?;
		Ok(())
	}

	/// Remove the Vorbis comment block from the FLAC file at `path`
	///
	/// The space is given to the padding block. Returns `false` if there was no block to remove.
	///
	/// # Errors
	///
	/// See [`VorbisComments::save_to_path`]
	pub fn remove_from_path<P>(path: P) -> Result<bool>
	where
		P: AsRef<Path>,
	{
		crate::flac::write::write_to_path(path.as_ref(), None, WriteOptions::default())
	}

	/// Write the comment block body to `writer`
	///
	/// # Errors
	///
	/// * The tag is too large
	/// * Failure to write to `writer`
	pub fn dump_to<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		let vendor = if self.vendor.is_empty() {
			super::DEFAULT_VENDOR
		} else {
			&self.vendor
		};

		let bytes = super::write::create_comments(vendor, &self.items_to_write(), &self.pictures)?;
		writer.write_all(&bytes)?;
		Ok(())
	}
}

// A case-insensitive field name that may consist of ASCII 0x20 through 0x7D, 0x3D ('=') excluded.
fn verify_key(key: &str) -> bool {
	if key.is_empty() {
		return false;
	}

	key.bytes()
		.all(|byte| (0x20..=0x7D).contains(&byte) && byte != 0x3D)
}

impl Accessor for VorbisComments {
	impl_accessor!(
		title   => "TITLE";
		artist  => "ARTIST";
		album   => "ALBUM";
		genre   => "GENRE";
		track   => "TRACKNUMBER";
		comment => "COMMENT";
	);

	fn year(&self) -> Option<Cow<'_, str>> {
		self.get("DATE")
			.filter(|date| !date.is_empty())
			.or_else(|| self.get("YEAR"))
			.map(Cow::Borrowed)
	}

	fn set_year(&mut self, value: String) {
		self.insert(String::from("DATE"), value)
	}

	fn remove_year(&mut self) {
		let _ = self.remove("DATE");
		let _ = self.remove("YEAR");
	}
}

impl IntoIterator for VorbisComments {
	type Item = (String, String);
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::picture::MimeType;

	#[test_log::test]
	fn year_falls_back() {
		let mut tag = VorbisComments::new();
		tag.push(String::from("YEAR"), String::from("1999"));
		assert_eq!(tag.year().as_deref(), Some("1999"));

		tag.push(String::from("DATE"), String::new());
		assert_eq!(tag.year().as_deref(), Some("1999"));

		tag.set_year(String::from("2001-05"));
		assert_eq!(tag.year().as_deref(), Some("2001-05"));
		assert_eq!(tag.get("YEAR"), Some("1999"));

		tag.remove_year();
		assert!(tag.year().is_none());
	}

	#[test_log::test]
	fn items_to_write() {
		let mut tag = VorbisComments::new();
		tag.push(String::from("TITLE"), String::from("Foo"));
		tag.push(String::from("Year"), String::from("1999"));
		tag.push(String::from("ALBUM"), String::new());
		tag.push(String::from("year"), String::from("2000"));
		assert_eq!(tag.items_to_write(), [("TITLE", "Foo"), ("DATE", "1999")]);

		tag.push(String::from("DATE"), String::from("2005"));
		assert_eq!(tag.items_to_write(), [("TITLE", "Foo"), ("DATE", "2005")]);
	}

	#[test_log::test]
	fn invalid_keys_ignored() {
		let mut tag = VorbisComments::new();
		tag.insert(String::from("A=B"), String::from("Foo"));
		tag.push(String::new(), String::from("Foo"));
		tag.push(String::from("TITLE\u{7E}"), String::from("Foo"));
		assert!(tag.is_empty());
		assert!(tag.get("A=B").is_none());
	}

	#[test_log::test]
	fn pictures_replaced_by_type() {
		let front = Picture::new(PictureType::CoverFront, Some(MimeType::Jpeg), None, vec![1]);
		let back = Picture::new(PictureType::CoverBack, Some(MimeType::Jpeg), None, vec![2]);
		let new_front = Picture::new(PictureType::CoverFront, Some(MimeType::Png), None, vec![3]);

		let mut tag = VorbisComments::new();
		assert!(tag.insert_picture(front.clone(), None).is_none());
		assert!(tag.insert_picture(back, None).is_none());
		assert_eq!(tag.insert_picture(new_front, None).map(|(p, _)| p), Some(front));
		assert_eq!(tag.pictures().len(), 2);

		tag.remove_picture_type(PictureType::CoverBack);
		assert_eq!(tag.pictures().len(), 1);
		assert_eq!(tag.pictures()[0].0.data(), &[3]);
	}
}
