use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::from_static("WXXX");

/// An extended `ID3v2` URL frame
///
/// This is used in the `WXXX` frame, where the frames
/// are told apart by descriptions, rather than their [`FrameId`]s.
/// This means for each `ExtendedUrlFrame` in the tag, the description
/// must be unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedUrlFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The URL, always Latin-1
	pub content: String,
}

impl ExtendedUrlFrame {
	/// Create a new [`ExtendedUrlFrame`]
	pub fn new(encoding: TextEncoding, description: String, content: String) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			encoding,
			description,
			content,
		}
	}

	/// Get the flags for the frame
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Set the flags for the frame
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// Read an [`ExtendedUrlFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`]
	pub fn parse<R>(
		reader: &mut R,
		frame_flags: FrameFlags,
		version: Id3v2Version,
	) -> Result<Option<Self>>
	where
		R: Read,
	{
		let Ok(encoding_byte) = reader.read_u8() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;
		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?
		.content;
		let content = decode_text(
			reader,
			TextDecodeOptions::new().encoding(TextEncoding::Latin1),
		)?
		.content;

		Ok(Some(ExtendedUrlFrame {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			description,
			content,
		}))
	}

	/// Convert an [`ExtendedUrlFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for(self.encoding, version);
		let lossy = write_options.lossy_text_encoding;

		let mut bytes = vec![encoding as u8];
		bytes.extend(encoding.encode(&self.description, true, lossy)?);
		bytes.extend(TextEncoding::Latin1.encode(&self.content, false, lossy)?);

		Ok(bytes)
	}
}
