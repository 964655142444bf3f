use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::content::{encoding_for, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

const FRAME_ID: FrameId = FrameId::from_static("SYLT");

/// The unit used for [`SynchronizedTextFrame`] timestamps
#[derive(Copy, Clone, PartialEq, Debug, Eq, Hash)]
#[repr(u8)]
pub enum TimestampFormat {
	/// The unit is MPEG frames
	MPEG = 1,
	/// The unit is milliseconds
	MS = 2,
}

impl TimestampFormat {
	/// Get a `TimestampFormat` from a u8, must be 1-2 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			1 => Some(Self::MPEG),
			2 => Some(Self::MS),
			_ => None,
		}
	}
}

/// The type of text stored in a [`SynchronizedTextFrame`]
#[derive(Copy, Clone, PartialEq, Debug, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum SyncTextContentType {
	Other = 0,
	Lyrics = 1,
	TextTranscription = 2,
	PartName = 3,
	Events = 4,
	Chord = 5,
	Trivia = 6,
	WebpageURL = 7,
	ImageURL = 8,
}

impl SyncTextContentType {
	/// Get a `SyncTextContentType` from a u8, must be 0-8 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Other),
			1 => Some(Self::Lyrics),
			2 => Some(Self::TextTranscription),
			3 => Some(Self::PartName),
			4 => Some(Self::Events),
			5 => Some(Self::Chord),
			6 => Some(Self::Trivia),
			7 => Some(Self::WebpageURL),
			8 => Some(Self::ImageURL),
			_ => None,
		}
	}
}

/// Represents an ID3v2 synchronized text frame
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SynchronizedTextFrame {
	pub(crate) header: FrameHeader,
	/// The text encoding (description/text)
	pub encoding: TextEncoding,
	/// ISO-639-2 language code (3 bytes)
	pub language: [u8; 3],
	/// The format of the timestamps
	pub timestamp_format: TimestampFormat,
	/// The type of content stored
	pub content_type: SyncTextContentType,
	/// Unique content description
	pub description: Option<String>,
	/// Collection of timestamps and text
	pub content: Vec<(u32, String)>,
}

impl SynchronizedTextFrame {
	/// Create a new [`SynchronizedTextFrame`]
	pub fn new(
		encoding: TextEncoding,
		language: [u8; 3],
		timestamp_format: TimestampFormat,
		content_type: SyncTextContentType,
		description: Option<String>,
		content: Vec<(u32, String)>,
	) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			encoding,
			language,
			timestamp_format,
			content_type,
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

	/// Read a [`SynchronizedTextFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// This function will return [`BadSyncText`][Id3v2ErrorKind::BadSyncText] if at any point it's unable to parse the data
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

		let bad_sync_text = || Id3v2Error::new(Id3v2ErrorKind::BadSyncText);

		let encoding = verify_encoding(encoding_byte, version)?;

		let mut language = [0; 3];
		reader
			.read_exact(&mut language)
			.map_err(|_| bad_sync_text())?;

		let timestamp_format = reader
			.read_u8()
			.ok()
			.and_then(TimestampFormat::from_u8)
			.ok_or_else(bad_sync_text)?;
		let content_type = reader
			.read_u8()
			.ok()
			.and_then(SyncTextContentType::from_u8)
			.ok_or_else(bad_sync_text)?;

		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?;
		let bom = description.bom;
		let description = (!description.content.is_empty()).then_some(description.content);

		let mut content = Vec::new();
		loop {
			let text = decode_text(
				reader,
				TextDecodeOptions::new()
					.encoding(encoding)
					.terminated(true)
					.bom(bom),
			)?;
			if text.bytes_read == 0 {
				break;
			}

			let timestamp = reader
				.read_u32::<BigEndian>()
				.map_err(|_| bad_sync_text())?;
			content.push((timestamp, text.content));
		}

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			language,
			timestamp_format,
			content_type,
			description,
			content,
		}))
	}

	/// Convert a [`SynchronizedTextFrame`] to an ID3v2 SYLT frame byte Vec
	///
	/// NOTE: This does not include the frame header
	///
	/// # Errors
	///
	/// * `language` is not properly encoded (ascii alphabetic or all zeros)
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		if self.language != [0; 3] && !self.language.iter().all(u8::is_ascii_alphabetic) {
			return Err(Id3v2Error::new(Id3v2ErrorKind::InvalidLanguage(self.language)).into());
		}

		let encoding = encoding_for(self.encoding, version);
		let lossy = write_options.lossy_text_encoding;

		let mut data = vec![encoding as u8];
		data.extend(self.language);
		data.push(self.timestamp_format as u8);
		data.push(self.content_type as u8);
		data.extend(encoding.encode(
			self.description.as_deref().unwrap_or_default(),
			true,
			lossy,
		)?);

		for (time, text) in &self.content {
			data.extend(encoding.encode(text, true, lossy)?);
			data.extend(time.to_be_bytes());
		}

		Ok(data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn expected(encoding: TextEncoding) -> SynchronizedTextFrame {
		SynchronizedTextFrame::new(
			encoding,
			*b"eng",
			TimestampFormat::MS,
			SyncTextContentType::Lyrics,
			Some(String::from("Test Sync Text")),
			vec![
				(0, String::from("\nRetag")),
				(10000, String::from("\nIs")),
				(15000, String::from("\nReading")),
			],
		)
	}

	#[test_log::test]
	fn sylt_round_trip() {
		for encoding in [TextEncoding::Latin1, TextEncoding::UTF16] {
			let frame = expected(encoding);
			let bytes = frame
				.as_bytes(Id3v2Version::V3, WriteOptions::default())
				.unwrap();
			let parsed = SynchronizedTextFrame::parse(&mut &bytes[..], FrameFlags::default(), Id3v2Version::V3)
				.unwrap()
				.unwrap();

			assert_eq!(parsed, frame);
		}
	}

	#[test_log::test]
	fn truncated_timestamp() {
		let mut bytes = expected(TextEncoding::Latin1)
			.as_bytes(Id3v2Version::V3, WriteOptions::default())
			.unwrap();
		bytes.truncate(bytes.len() - 2);

		assert!(SynchronizedTextFrame::parse(&mut &bytes[..], FrameFlags::default(), Id3v2Version::V3).is_err());
	}
}
