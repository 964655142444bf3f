use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::from_static("TXXX");

/// An extended `ID3v2` text frame
///
/// This is used in the `TXXX` frame, where the frames
/// are told apart by descriptions, rather than their [`FrameId`]s.
/// This means for each `ExtendedTextFrame` in the tag, the description
/// must be unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedTextFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description and comment text
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The actual frame content
	pub content: String,
}

impl ExtendedTextFrame {
	/// Create a new [`ExtendedTextFrame`]
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

	/// Read an [`ExtendedTextFrame`] from a slice
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
		)?;

		// Some writers only put a BOM on the description
		let content = decode_text(
			reader,
			TextDecodeOptions::new()
				.encoding(encoding)
				.bom(description.bom),
		)?
		.content;

		Ok(Some(ExtendedTextFrame {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			description: description.content,
			content,
		}))
	}

	/// Convert an [`ExtendedTextFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for(self.encoding, version);
		let lossy = write_options.lossy_text_encoding;

		let mut bytes = vec![encoding as u8];
		bytes.extend(encoding.encode(&self.description, true, lossy)?);
		bytes.extend(encoding.encode(&self.content, false, lossy)?);

		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn content_inherits_description_bom() {
		// "A" with a BOM, then "B" without one
		let content = [1, 0xFE, 0xFF, 0, b'A', 0, 0, 0, b'B'];
		let frame = ExtendedTextFrame::parse(&mut &content[..], FrameFlags::default(), Id3v2Version::V3)
			.unwrap()
			.unwrap();

		assert_eq!(frame.description, "A");
		assert_eq!(frame.content, "B");
	}

	#[test_log::test]
	fn encode_user_text() {
		let frame = ExtendedTextFrame::new(
			TextEncoding::Latin1,
			String::from("MusicBrainz Album Id"),
			String::from("abc"),
		);

		let bytes = frame
			.as_bytes(Id3v2Version::V4, WriteOptions::default())
			.unwrap();
		assert_eq!(bytes, b"\x00MusicBrainz Album Id\x00abc");
	}
}
