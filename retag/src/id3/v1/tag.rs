use super::write::{encode, remove_id3v1, write_id3v1};
use crate::config::{ParsingMode, WriteOptions};
use crate::error::Result;
use crate::id3::find_id3v1;
use crate::id3::v1::constants::GENRES;
use crate::tag::{Accessor, parse_track_number};

use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

macro_rules! impl_accessor {
	($($name:ident,)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.$name.as_deref().map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.$name = Some(value)
				}

				fn [<remove_ $name>](&mut self) {
					self.$name = None
				}
			)+
		}
	}
}

/// The revision of an ID3v1 tag
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Id3v1Version {
	/// The original layout, with a 30 byte comment
	V1_0,
	/// The comment is shortened to 28 bytes to make room for a track number
	V1_1,
}

impl Display for Id3v1Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Id3v1Version::V1_0 => f.write_str("ID3v1.0"),
			Id3v1Version::V1_1 => f.write_str("ID3v1.1"),
		}
	}
}

/// ID3v1 is a severely limited format, with each field
/// being incredibly small in size. All fields have been
/// commented with their maximum sizes and any other additional
/// restrictions.
///
/// Attempting to write a field greater than the maximum size
/// will **not** error, it will just be shrunk.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year (max 9999)
	pub year: Option<u16>,
	/// A short comment
	///
	/// The number of bytes differs between versions, but not much.
	/// A V1 tag may have been read, which limits this field to 30 bytes.
	/// A V1.1 tag, however, only has 28 bytes available.
	///
	/// A V1.1 tag is *always* written.
	pub comment: Option<String>,
	/// The track number, 1 byte max
	///
	/// The track number **cannot** be 0. Readers look for a null byte at the end of the comment,
	/// followed by a non-zero byte, to tell V1 and V1.1 apart.
	pub track_number: Option<u8>,
	/// The track's genre, 1 byte max
	///
	/// ID3v1 has a predefined set of genres, see [`GENRES`](crate::id3::v1::GENRES).
	/// This byte should be an index to a genre.
	pub genre: Option<u8>,
}

impl Id3v1Tag {
	/// Create a new empty `Id3v1Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v1::Id3v1Tag;
	///
	/// let id3v1_tag = Id3v1Tag::new();
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// The revision this tag is (or would be read back as)
	///
	/// Only tags with a track number are ID3v1.1.
	pub fn version(&self) -> Id3v1Version {
		match self.track_number {
			Some(track) if track != 0 => Id3v1Version::V1_1,
			_ => Id3v1Version::V1_0,
		}
	}

	/// Whether every field is empty
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	/// Look up a genre index by name (case-insensitive)
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v1::Id3v1Tag;
	///
	/// assert_eq!(Id3v1Tag::genre_index("jazz"), Some(8));
	/// assert_eq!(Id3v1Tag::genre_index("Not a genre"), None);
	/// ```
	pub fn genre_index(name: &str) -> Option<u8> {
		GENRES
			.iter()
			.position(|genre| genre.eq_ignore_ascii_case(name))
			.map(|index| index as u8)
	}

	/// Look up a genre name by index
	pub fn genre_name(index: u8) -> Option<&'static str> {
		GENRES.get(usize::from(index)).copied()
	}

	/// Read a tag from the last 128 bytes of `reader`
	///
	/// # Errors
	///
	/// * Failure to read from `reader`
	/// * See [`Id3v1Tag::parse`]
	pub fn read_from<R>(reader: &mut R, parse_mode: ParsingMode) -> Result<Option<Self>>
	where
		R: Read + Seek,
	{
		match find_id3v1(reader)? {
			Some(bytes) => Ok(Some(Self::parse(bytes, parse_mode)?)),
			None => Ok(None),
		}
	}

	/// Read a tag from the file at `path`
	///
	/// # Errors
	///
	/// See [`Id3v1Tag::read_from`]
	pub fn read_from_path<P>(path: P, parse_mode: ParsingMode) -> Result<Option<Self>>
	where
		P: AsRef<Path>,
	{
		let mut reader = BufReader::new(File::open(path)?);
		Self::read_from(&mut reader, parse_mode)
	}

	/// Save the tag to the end of the file at `path`
	///
	/// An existing ID3v1 tag is overwritten, otherwise the tag is appended. Saving an empty tag
	/// removes the existing one.
	///
	/// # Errors
	///
	/// * A field contains characters outside of Latin-1, and
	///   [`WriteOptions::lossy_text_encoding`] is disabled
	/// * Failure to write to the file
	pub fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		write_id3v1(&mut file, self, write_options)
	}

	/// Remove an ID3v1 tag from the file at `path`
	///
	/// Returns `false` (leaving the file untouched) if there was no tag to remove.
	///
	/// # Errors
	///
	/// * Failure to read or truncate the file
	pub fn remove_from_path<P>(path: P) -> Result<bool>
	where
		P: AsRef<Path>,
	{
		remove_id3v1(path.as_ref())
	}

	/// Write the 128 byte tag to `writer`
	///
	/// # Errors
	///
	/// See [`Id3v1Tag::save_to_path`]
	pub fn dump_to<W>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()>
	where
		W: Write,
	{
		writer.write_all(&encode(self, write_options)?)?;
		Ok(())
	}
}

impl Accessor for Id3v1Tag {
	impl_accessor!(title, artist, album,);

	fn year(&self) -> Option<Cow<'_, str>> {
		self.year.map(|year| Cow::Owned(format!("{year:04}")))
	}

	fn set_year(&mut self, value: String) {
		// Only the year itself fits, "1984-05-01" is stored as 1984
		let digits = value.trim().get(..4).and_then(|year| year.parse::<u16>().ok());
		if digits.is_none() {
			log::warn!("Unable to store \"{}\" as an ID3v1 year, removing it", value);
		}

		self.year = digits;
	}

	fn remove_year(&mut self) {
		self.year = None;
	}

	fn genre(&self) -> Option<Cow<'_, str>> {
		self.genre.and_then(Self::genre_name).map(Cow::Borrowed)
	}

	fn set_genre(&mut self, genre: String) {
		// Either the name of a genre, or its index
		let index = Self::genre_index(&genre).or_else(|| {
			genre
				.parse::<u8>()
				.ok()
				.filter(|index| usize::from(*index) < GENRES.len())
		});

		if index.is_none() {
			log::warn!("\"{}\" is not an ID3v1 genre, removing it", genre);
		}

		self.genre = index;
	}

	fn remove_genre(&mut self) {
		self.genre = None
	}

	fn track(&self) -> Option<Cow<'_, str>> {
		self.track_number.map(|track| Cow::Owned(track.to_string()))
	}

	fn set_track(&mut self, value: String) {
		self.track_number = u8::try_from(parse_track_number(&value))
			.ok()
			.filter(|track| *track != 0);
	}

	fn remove_track(&mut self) {
		self.track_number = None;
	}

	fn comment(&self) -> Option<Cow<'_, str>> {
		self.comment.as_deref().map(Cow::Borrowed)
	}

	fn set_comment(&mut self, value: String) {
		let mut resized = String::with_capacity(28);
		for c in value.chars() {
			if resized.len() + c.len_utf8() > 28 {
				break;
			}

			resized.push(c);
		}

		self.comment = Some(resized);
	}

	fn remove_comment(&mut self) {
		self.comment = None;
	}
}
