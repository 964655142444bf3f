//! Items for FLAC
//!
//! ## File notes
//!
//! * See [`FlacFile`]
//! * Metadata is rewritten through the padding block whenever possible, see
//!   [`VorbisComments::save_to_path`]

pub(crate) mod block;
mod read;
pub(crate) mod write;

use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::id3::find_id3v2;
use crate::id3::v2::Id3v2Tag;
use crate::picture::{Picture, PictureInformation};
use crate::vorbis::VorbisComments;

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// A FLAC file
///
/// ## Notes
///
/// * The ID3v2 tag is **read only**, and its use is discouraged. Saving a [`SimpleTag`](crate::simple::SimpleTag)
///   to a FLAC file removes it.
/// * Pictures stored in `PICTURE` blocks are kept in the `FlacFile` itself, rather than the tag.
///   They are carried over untouched when the tag is saved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlacFile {
	pub(crate) id3v2_tag: Option<Id3v2Tag>,
	pub(crate) vorbis_comments: Option<VorbisComments>,
	pub(crate) pictures: Vec<(Picture, PictureInformation)>,
}

impl FlacFile {
	/// Read a FLAC file from `reader`
	///
	/// # Errors
	///
	/// * The stream does not start with `fLaC` (after an optional ID3v2 tag)
	/// * The first block is not a valid `STREAMINFO` block
	/// * [`ParsingMode::Strict`](crate::config::ParsingMode::Strict) and the stream has
	///   duplicate `STREAMINFO`, `SEEKTABLE` or Vorbis comment blocks
	/// * A tag or picture is malformed
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		read::read_from(reader, parse_options)
	}

	/// Read the FLAC file at `path`
	///
	/// # Errors
	///
	/// See [`FlacFile::read_from`]
	pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let mut reader = BufReader::new(File::open(path)?);
		Self::read_from(&mut reader, parse_options)
	}

	/// Returns the ID3v2 tag found before the stream marker, if any
	pub fn id3v2(&self) -> Option<&Id3v2Tag> {
		self.id3v2_tag.as_ref()
	}

	/// Returns the Vorbis comments
	pub fn vorbis_comments(&self) -> Option<&VorbisComments> {
		self.vorbis_comments.as_ref()
	}

	/// Returns a mutable reference to the Vorbis comments
	pub fn vorbis_comments_mut(&mut self) -> Option<&mut VorbisComments> {
		self.vorbis_comments.as_mut()
	}

	/// Replaces the Vorbis comments, returning the previous tag
	pub fn set_vorbis_comments(&mut self, tag: VorbisComments) -> Option<VorbisComments> {
		self.vorbis_comments.replace(tag)
	}

	/// Removes the Vorbis comments, returning them
	pub fn remove_vorbis_comments(&mut self) -> Option<VorbisComments> {
		self.vorbis_comments.take()
	}

	/// Returns the pictures stored in `PICTURE` blocks
	pub fn pictures(&self) -> &[(Picture, PictureInformation)] {
		&self.pictures
	}

	/// Write the Vorbis comments to the file at `path`
	///
	/// Without Vorbis comments, the comment block is removed from the file. Other blocks,
	/// `PICTURE` blocks included, are left as they are on disk.
	///
	/// # Errors
	///
	/// See [`VorbisComments::save_to_path`]
	pub fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		write::write_to_path(path.as_ref(), self.vorbis_comments.as_ref(), write_options)?;
		Ok(())
	}
}

/// Whether `reader` holds a FLAC stream, possibly preceded by an ID3v2 tag
///
/// The stream position is restored afterwards.
pub(crate) fn is_flac<R>(reader: &mut R) -> Result<bool>
where
	R: Read + Seek,
{
	let position = reader.stream_position()?;
	reader.rewind()?;

	find_id3v2(reader, false)?;

	let mut marker = [0; 4];
	let found = reader.read_exact(&mut marker).is_ok() && &marker == b"fLaC";

	reader.seek(SeekFrom::Start(position))?;
	Ok(found)
}
