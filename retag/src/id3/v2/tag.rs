use super::frame::read::PartialFrame;
use super::header::{Id3v2Header, Id3v2TagFlags, Id3v2Version};
use super::items::{AttachedPictureFrame, CommentFrame, ExtendedTextFrame, TextInformationFrame};
use super::util::registry::same_role;
use super::{Frame, read, write};
use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::id3::find_id3v2;
use crate::picture::{Picture, PictureType};
use crate::rewrite::replace_region;
use crate::tag::Accessor;
use crate::util::text::TextEncoding;

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

const V4_MULTI_VALUE_SEPARATOR: char = '\0';

const COMMENT_LANGUAGE: [u8; 3] = *b"eng";

// Used exclusively for `Accessor` convenience methods
fn remove_separators_from_frame_text(value: &str, version: Id3v2Version) -> Cow<'_, str> {
	if !value.contains(V4_MULTI_VALUE_SEPARATOR) || version != Id3v2Version::V4 {
		return Cow::Borrowed(value);
	}

	Cow::Owned(value.replace(V4_MULTI_VALUE_SEPARATOR, "/"))
}

macro_rules! impl_accessor {
	($($name:ident => $id:literal;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.get_text($id)
						.map(|value| remove_separators_from_frame_text(value, self.original_version))
				}

				fn [<set_ $name>](&mut self, value: String) {
					let _ = self.insert(Frame::text($id, value));
				}

				fn [<remove_ $name>](&mut self) {
					let _ = self.remove($id);
				}
			)+
		}
	}
}

/// An `ID3v2` tag
///
/// Frames are kept in the order they were read or inserted. Every frame is stored under its
/// canonical ID (see [`registry`](super::util::registry)), and is written with the ID of the
/// tag's target [`version`](Id3v2Tag::version) when saved.
///
/// ## Reading
///
/// Frames that fail to parse do not fail the tag. They are skipped and recorded in
/// [`Id3v2Tag::partial_frames`].
///
/// ## [`Accessor`] Methods
///
/// As ID3v2.4 allows for multiple values to exist in a single frame, the raw strings, as provided
/// by [`Id3v2Tag::get_text`] may contain null separators. In the [`Accessor`] methods, these
/// values have the separators (`\0`) replaced with `"/"` for convenience.
///
/// The year accessors use `TDRC`, which shares its slot with the ID3v2.3 `TYER`.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Id3v2Tag {
	flags: Id3v2TagFlags,
	pub(super) original_version: Id3v2Version,
	pub(super) version: Id3v2Version,
	pub(crate) frames: Vec<Frame>,
	pub(super) partial_frames: Vec<PartialFrame>,
	offset: Option<u64>,
	on_disk_len: u64,
}

impl IntoIterator for Id3v2Tag {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.into_iter()
	}
}

impl<'a> IntoIterator for &'a Id3v2Tag {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.iter()
	}
}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self {
			flags: Id3v2TagFlags::default(),
			original_version: Id3v2Version::V4,
			version: Id3v2Version::V4,
			frames: Vec::new(),
			partial_frames: Vec::new(),
			offset: None,
			on_disk_len: 0,
		}
	}
}

impl Id3v2Tag {
	/// Create a new empty `Id3v2Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::Id3v2Tag;
	///
	/// let id3v2_tag = Id3v2Tag::new();
	/// assert!(id3v2_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the [`Id3v2TagFlags`]
	pub fn flags(&self) -> &Id3v2TagFlags {
		&self.flags
	}

	/// Replace the tag's flags
	pub fn set_flags(&mut self, flags: Id3v2TagFlags) {
		self.flags = flags
	}

	/// The version of the tag when it was read
	///
	/// This is [`Id3v2Version::V4`] for tags created with [`Id3v2Tag::new`].
	pub fn original_version(&self) -> Id3v2Version {
		self.original_version
	}

	/// The version the tag is written as
	///
	/// This starts out as the version the tag was read as.
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// Change the version the tag is written as, returning the previous one
	///
	/// Frames with no representation in `version` are dropped when saving.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// let mut tag = Id3v2Tag::new();
	/// let previous = tag.set_version(Id3v2Version::V3);
	///
	/// assert_eq!(previous, Id3v2Version::V4);
	/// assert_eq!(tag.version(), Id3v2Version::V3);
	/// ```
	pub fn set_version(&mut self, version: Id3v2Version) -> Id3v2Version {
		std::mem::replace(&mut self.version, version)
	}

	/// The offset of the tag in the file it was read from
	///
	/// This is `None` for tags that were not read from a file.
	pub fn offset(&self) -> Option<u64> {
		self.offset
	}

	/// The size of the tag on disk, including its header, padding and footer
	pub fn on_disk_len(&self) -> u64 {
		self.on_disk_len
	}

	/// Frames that were found while reading, but could not be parsed
	pub fn partial_frames(&self) -> &[PartialFrame] {
		&self.partial_frames
	}

	/// Returns an iterator over the tag's frames
	pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
		self.frames.iter()
	}

	/// The number of frames in the tag
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether the tag contains no frames
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}
}

impl Id3v2Tag {
	/// Gets the first [`Frame`] for an ID
	///
	/// `id` may be any version specific ID for the frame's role, so `"TYER"`, `"TYE"` and `"TDRC"`
	/// all find the recording date.
	pub fn get(&self, id: &str) -> Option<&Frame> {
		self.frames.iter().find(|f| same_role(f.id_str(), id))
	}

	/// Gets the text for a frame
	///
	/// NOTE: If the tag is [`Id3v2Version::V4`], there could be multiple values separated by null characters (`'\0'`).
	///
	/// NOTE: This will not work for `TXXX` frames, use [`Id3v2Tag::get_user_text`] for that.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::Id3v2Tag;
	/// use retag::tag::Accessor;
	///
	/// let mut tag = Id3v2Tag::new();
	///
	/// tag.set_title(String::from("Foo"));
	///
	/// let title = tag.get_text("TIT2");
	/// assert_eq!(title, Some("Foo"));
	/// ```
	pub fn get_text(&self, id: &str) -> Option<&str> {
		if let Some(Frame::Text(TextInformationFrame { value, .. })) = self.get(id) {
			return Some(value);
		}

		None
	}

	/// Gets the text for a user-defined frame
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::Id3v2Tag;
	///
	/// let mut tag = Id3v2Tag::new();
	///
	/// // Add a new "TXXX" frame identified by "SOME_DESCRIPTION"
	/// let _ = tag.insert_user_text(String::from("SOME_DESCRIPTION"), String::from("Some value"));
	///
	/// // Now we can get the value back using the description
	/// let value = tag.get_user_text("SOME_DESCRIPTION");
	/// assert_eq!(value, Some("Some value"));
	/// ```
	pub fn get_user_text(&self, description: &str) -> Option<&str> {
		self.frames.iter().find_map(|frame| match frame {
			Frame::UserText(ExtendedTextFrame {
				description: desc,
				content,
				..
			}) if desc == description => Some(content.as_str()),
			_ => None,
		})
	}

	/// Inserts a new user-defined text frame (`TXXX`)
	///
	/// NOTE: The encoding will be UTF-8
	///
	/// This will replace any TXXX frame with the same description, see [`Id3v2Tag::insert`].
	pub fn insert_user_text(&mut self, description: String, content: String) -> Option<Frame> {
		self.insert(Frame::UserText(ExtendedTextFrame::new(
			TextEncoding::UTF8,
			description,
			content,
		)))
	}

	/// Inserts a [`Frame`], returning the frame it replaced
	///
	/// A frame replaces the existing frame in the same slot, keeping its position. See
	/// [`Frame::same_slot`].
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame};
	/// use retag::TextEncoding;
	///
	/// # fn main() -> retag::error::Result<()> {
	/// let mut tag = Id3v2Tag::new();
	///
	/// let mood = |value: &str| -> retag::error::Result<Frame> {
	/// 	Ok(TextInformationFrame::new(FrameId::new("TMOO")?, TextEncoding::UTF8, value).into())
	/// };
	///
	/// assert!(tag.insert(mood("Calm")?).is_none());
	///
	/// let replaced = tag.insert(mood("Excited")?);
	/// assert_eq!(replaced, Some(mood("Calm")?));
	/// assert_eq!(tag.len(), 1);
	/// # Ok(()) }
	/// ```
	pub fn insert(&mut self, frame: Frame) -> Option<Frame> {
		match self.frames.iter().position(|f| f.same_slot(&frame)) {
			Some(pos) => Some(std::mem::replace(&mut self.frames[pos], frame)),
			None => {
				self.frames.push(frame);
				None
			},
		}
	}

	// Duplicate frames are not allowed. But if this occurs we try to keep the frame with the
	// non-empty content. Superfluous, duplicate frames that follow the first frame are often empty.
	pub(super) fn insert_read(&mut self, frame: Frame) {
		let Some(existing) = self.frames.iter_mut().find(|f| f.same_slot(&frame)) else {
			self.frames.push(frame);
			return;
		};

		if existing.is_empty() == Some(true) && frame.is_empty() == Some(false) {
			log::warn!(
				"Replacing empty frame with ID \"{}\" by a later frame with the same ID",
				existing.id()
			);
			*existing = frame;
		} else {
			log::warn!("Discarding duplicate frame with ID \"{}\"", frame.id());
		}
	}

	/// Removes every [`Frame`] for an ID, returning them in tag order
	///
	/// Like [`Id3v2Tag::get`], `id` may be any version specific ID for the role.
	pub fn remove(&mut self, id: &str) -> Vec<Frame> {
		let (removed, kept) = std::mem::take(&mut self.frames)
			.into_iter()
			.partition(|f| same_role(f.id_str(), id));

		self.frames = kept;
		removed
	}

	/// Retains [`Frame`]s by evaluating the predicate
	pub fn retain<P>(&mut self, predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		self.frames.retain(predicate)
	}

	/// Returns all attached pictures
	pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
		self.frames.iter().filter_map(|f| match f {
			Frame::Picture(AttachedPictureFrame { picture, .. }) => Some(picture),
			_ => None,
		})
	}

	/// Inserts a [`Picture`], returning the frame it replaced
	///
	/// Pictures share a slot when their type and description match.
	pub fn insert_picture(&mut self, picture: Picture) -> Option<Frame> {
		self.insert(Frame::Picture(AttachedPictureFrame::new(
			TextEncoding::UTF8,
			picture,
		)))
	}

	/// Removes every picture of a [`PictureType`]
	pub fn remove_picture_type(&mut self, picture_type: PictureType) {
		self.frames.retain(|f| {
			!matches!(f, Frame::Picture(AttachedPictureFrame { picture, .. }) if picture.pic_type() == picture_type)
		})
	}

	/// Returns all `COMM` frames
	pub fn comments(&self) -> impl Iterator<Item = &CommentFrame> {
		self.frames.iter().filter_map(|f| match f {
			Frame::Comment(comment) => Some(comment),
			_ => None,
		})
	}
}

impl Id3v2Tag {
	/// Checks for an ID3v2 tag at the start of `reader`
	///
	/// The stream position is restored afterwards.
	///
	/// # Errors
	///
	/// * `reader` cannot be seeked
	pub fn exists<R>(reader: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		let position = reader.stream_position()?;
		reader.rewind()?;

		let mut header = [0; 10];
		let found = reader.read_exact(&mut header).is_ok() && Id3v2Header::parse(&mut &header[..]).is_ok();

		reader.seek(SeekFrom::Start(position))?;
		Ok(found)
	}

	/// Read a tag from the start of `reader`
	///
	/// Returns `None` if no tag is present.
	///
	/// # Errors
	///
	/// * The tag header is malformed
	/// * The extended header is malformed
	/// * Failure to read from `reader`
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Option<Self>>
	where
		R: Read + Seek,
	{
		reader.rewind()?;

		let Some(found) = find_id3v2(reader, true)? else {
			log::debug!("No ID3v2 tag found");
			return Ok(None);
		};

		let content = found.content.unwrap_or_default();
		let mut tag = read::parse_id3v2(&content, found.header, parse_options)?;
		tag.offset = Some(0);
		tag.on_disk_len = found.header.full_tag_size();

		Ok(Some(tag))
	}

	/// Read a tag from the file at `path`
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::read_from`]
	pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Option<Self>>
	where
		P: AsRef<Path>,
	{
		let mut reader = BufReader::new(File::open(path)?);
		Self::read_from(&mut reader, parse_options)
	}

	/// Save the tag to the file at `path`
	///
	/// An existing tag is overwritten in place when the new tag fits in its space, otherwise the
	/// file is rewritten (see [`rewrite`](crate::rewrite)). A tag without any writable frames
	/// removes the existing tag.
	///
	/// # Errors
	///
	/// * A frame cannot be written in the tag's [`version`](Id3v2Tag::version)
	/// * The tag is too large
	/// * The file cannot be rewritten
	pub fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let existing_len = existing_tag_len(path)?;

		let bytes = write::create_tag(self, existing_len, write_options)?;
		if bytes.is_empty() && existing_len == 0 {
			log::debug!("Nothing to write or remove");
			return Ok(());
		}

		replace_region(path, 0, existing_len, &bytes)
	}

	/// Remove an ID3v2 tag from the file at `path`
	///
	/// Returns `false` (leaving the file untouched) if there was no tag to remove.
	///
	/// # Errors
	///
	/// * The existing tag header is malformed
	/// * The file cannot be rewritten
	pub fn remove_from_path<P>(path: P) -> Result<bool>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();

		let existing_len = existing_tag_len(path)?;
		if existing_len == 0 {
			return Ok(false);
		}

		replace_region(path, 0, existing_len, &[])?;
		Ok(true)
	}

	/// Write the tag to `writer`, as it would appear at the start of a file
	///
	/// # Errors
	///
	/// * A frame cannot be written in the tag's [`version`](Id3v2Tag::version)
	/// * Failure to write to `writer`
	pub fn dump_to<W>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()>
	where
		W: Write,
	{
		let bytes = write::create_tag(self, 0, write_options)?;
		writer.write_all(&bytes)?;
		Ok(())
	}
}

fn existing_tag_len(path: &Path) -> Result<u64> {
	let mut file = File::open(path)?;
	Ok(find_id3v2(&mut file, false)?.map_or(0, |found| found.header.full_tag_size()))
}

impl Accessor for Id3v2Tag {
	impl_accessor!(
		title  => "TIT2";
		artist => "TPE1";
		album  => "TALB";
		year   => "TDRC";
		genre  => "TCON";
		track  => "TRCK";
	);

	fn comment(&self) -> Option<Cow<'_, str>> {
		self.comments()
			.next()
			.map(|comment| Cow::Borrowed(comment.content.as_str()))
	}

	fn set_comment(&mut self, value: String) {
		let _ = self.insert(Frame::Comment(CommentFrame::new(
			TextEncoding::UTF8,
			COMMENT_LANGUAGE,
			String::new(),
			value,
		)));
	}

	fn remove_comment(&mut self) {
		let _ = self.remove("COMM");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::id3::v2::{FrameId, UrlLinkFrame};

	#[test_log::test]
	fn accessors() {
		let mut tag = Id3v2Tag::new();
		tag.set_title(String::from("Title"));
		tag.set_artist(String::from("Foo\0Bar"));
		tag.set_year(String::from("2004"));
		tag.set_comment(String::from("Comment"));

		assert_eq!(tag.title().as_deref(), Some("Title"));
		assert_eq!(tag.artist().as_deref(), Some("Foo/Bar"));
		assert_eq!(tag.get_text("TYER"), Some("2004"));
		assert_eq!(tag.comment().as_deref(), Some("Comment"));

		tag.remove_artist();
		assert!(tag.artist().is_none());
		assert_eq!(tag.len(), 3);
	}

	#[test_log::test]
	fn insert_keeps_position() {
		let mut tag = Id3v2Tag::new();
		tag.set_title(String::from("Title"));
		tag.set_artist(String::from("Artist"));

		let replaced = tag.insert(Frame::text("TIT2", String::from("New title")));
		assert_eq!(replaced, Some(Frame::text("TIT2", String::from("Title"))));
		assert_eq!(tag.iter().next().unwrap().id_str(), "TIT2");
	}

	#[test_log::test]
	fn year_roles_share_a_slot() {
		let mut tag = Id3v2Tag::new();
		let _ = tag.insert(Frame::Text(TextInformationFrame::new(
			FrameId::new("TYER").unwrap(),
			TextEncoding::Latin1,
			"1984",
		)));

		tag.set_year(String::from("2004"));
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.year().as_deref(), Some("2004"));

		assert_eq!(tag.remove("TYE").len(), 1);
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn artist_urls_allow_duplicates() {
		let url = |content: &str| -> Frame {
			UrlLinkFrame::new(FrameId::new("WOAR").unwrap(), content.to_owned()).into()
		};

		let mut tag = Id3v2Tag::new();
		assert!(tag.insert(url("https://a.example")).is_none());
		assert!(tag.insert(url("https://b.example")).is_none());
		assert!(tag.insert(url("https://a.example")).is_some());
		assert_eq!(tag.len(), 2);
	}

	#[test_log::test]
	fn pictures() {
		let mut tag = Id3v2Tag::new();
		let front = Picture::new(PictureType::CoverFront, None, None, vec![1, 2, 3]);
		let back = Picture::new(PictureType::CoverBack, None, None, vec![4]);

		assert!(tag.insert_picture(front.clone()).is_none());
		assert!(tag.insert_picture(back).is_none());
		assert!(tag.insert_picture(front).is_some());
		assert_eq!(tag.pictures().count(), 2);

		tag.remove_picture_type(PictureType::CoverFront);
		assert_eq!(tag.pictures().next().unwrap().pic_type(), PictureType::CoverBack);
	}

	#[test_log::test]
	fn exists_keeps_position() {
		let mut tag = Id3v2Tag::new();
		tag.set_title(String::from("Title"));

		let mut bytes = Vec::new();
		tag.dump_to(&mut bytes, WriteOptions::default()).unwrap();

		let mut reader = std::io::Cursor::new(bytes);
		reader.set_position(5);
		assert!(Id3v2Tag::exists(&mut reader).unwrap());
		assert_eq!(reader.position(), 5);

		assert!(!Id3v2Tag::exists(&mut std::io::Cursor::new(b"fLaC")).unwrap());

		let read = Id3v2Tag::read_from(&mut reader, ParseOptions::new()).unwrap().unwrap();
		assert_eq!(read.title().as_deref(), Some("Title"));
		assert_eq!(read.offset(), Some(0));
		assert_eq!(read.on_disk_len(), reader.get_ref().len() as u64);
	}
}
