use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::ReadBytesExt;

// Timestamp frames that have a year-only counterpart before ID3v2.4 (TYER, TORY)
const TIMESTAMP_FRAMES: [&str; 2] = ["TDRC", "TDOR"];

/// An `ID3v2` text frame
///
/// ID3v2.4 allows several values in one frame, separated by a null character. These are
/// kept in `value` as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextInformationFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The text itself
	pub value: String,
}

impl TextInformationFrame {
	/// Create a new [`TextInformationFrame`]
	pub fn new(id: FrameId, encoding: TextEncoding, value: impl Into<String>) -> Self {
		let header = FrameHeader::new(id, FrameFlags::default());
		Self {
			header,
			encoding,
			value: value.into(),
		}
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Get the flags for the frame
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Set the flags for the frame
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// Read a [`TextInformationFrame`] from a slice
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
		id: FrameId,
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
		let value = decode_text(reader, TextDecodeOptions::new().encoding(encoding))?.content;

		Ok(Some(TextInformationFrame {
			header: FrameHeader::new(id, frame_flags),
			encoding,
			value,
		}))
	}

	/// Convert a [`TextInformationFrame`] to a byte vec
	///
	/// Before ID3v2.4, timestamps are cut down to their year, as `TYER` and `TORY` hold
	/// nothing else.
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for(self.encoding, version);

		let mut value = self.value.as_str();
		if version < Id3v2Version::V4 && TIMESTAMP_FRAMES.contains(&self.header.id.as_str()) {
			value = year_of(value);
		}

		let mut content = vec![encoding as u8];
		content.extend(encoding.encode(value, false, write_options.lossy_text_encoding)?);
		Ok(content)
	}
}

// The leading four digit year of an ID3v2.4 timestamp ("2004-07-12T10:00" -> "2004")
fn year_of(timestamp: &str) -> &str {
	match timestamp.get(..4) {
		Some(year) if year.bytes().all(|b| b.is_ascii_digit()) => year,
		_ => timestamp,
	}
}
