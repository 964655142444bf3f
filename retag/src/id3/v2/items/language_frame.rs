use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::content::{encoding_for, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::ReadBytesExt;

// The shared layout of COMM and USLT:
//
// encoding | language(3) | description NUL | content
struct LanguageFrame {
	encoding: TextEncoding,
	language: [u8; 3],
	description: String,
	content: String,
}

impl LanguageFrame {
	fn parse<R>(reader: &mut R, version: Id3v2Version) -> Result<Option<Self>>
	where
		R: Read,
	{
		let Ok(encoding_byte) = reader.read_u8() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;

		let mut language = [0; 3];
		reader.read_exact(&mut language)?;

		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?;
		let content = decode_text(
			reader,
			TextDecodeOptions::new()
				.encoding(encoding)
				.bom(description.bom),
		)?
		.content;

		Ok(Some(Self {
			encoding,
			language,
			description: description.content,
			content,
		}))
	}

	fn create_bytes(
		encoding: TextEncoding,
		language: [u8; 3],
		description: &str,
		content: &str,
		version: Id3v2Version,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		// An all-zero language is common, and means "unknown"
		if language != [0; 3] && language.iter().any(|c| !c.is_ascii_alphabetic()) {
			return Err(Id3v2Error::new(Id3v2ErrorKind::InvalidLanguage(language)).into());
		}

		let encoding = encoding_for(encoding, version);
		let lossy = write_options.lossy_text_encoding;

		let mut bytes = vec![encoding as u8];
		bytes.extend(language);
		bytes.extend(encoding.encode(description, true, lossy)?);
		bytes.extend(encoding.encode(content, false, lossy)?);

		Ok(bytes)
	}
}

// Defines a frame with the `LanguageFrame` layout
macro_rules! language_frame {
	($(#[$meta:meta])* $name:ident, $id:literal) => {
		$(#[$meta])*
		#[derive(Clone, Debug, PartialEq, Eq, Hash)]
		pub struct $name {
			pub(crate) header: FrameHeader,
			/// The encoding of the description and content
			pub encoding: TextEncoding,
			/// ISO-639-2 language code (3 bytes)
			pub language: [u8; 3],
			/// Unique content description
			pub description: String,
			/// The actual frame content
			pub content: String,
		}

		impl $name {
			#[doc = concat!("Create a new [`", stringify!($name), "`]")]
			pub fn new(
				encoding: TextEncoding,
				language: [u8; 3],
				description: String,
				content: String,
			) -> Self {
				Self {
					header: FrameHeader::new(FrameId::from_static($id), FrameFlags::default()),
					encoding,
					language,
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

			#[doc = concat!("Read a [`", stringify!($name), "`] from a slice")]
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
				Ok(LanguageFrame::parse(reader, version)?.map(|frame| Self {
					header: FrameHeader::new(FrameId::from_static($id), frame_flags),
					encoding: frame.encoding,
					language: frame.language,
					description: frame.description,
					content: frame.content,
				}))
			}

			#[doc = concat!("Convert a [`", stringify!($name), "`] to a byte vec")]
			///
			/// NOTE: This does not include a frame header
			///
			/// # Errors
			///
			/// * `language` contains invalid characters (Only `'a'..='z'` and `'A'..='Z'` allowed, or all zeros)
			/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
			pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
				LanguageFrame::create_bytes(
					self.encoding,
					self.language,
					&self.description,
					&self.content,
					version,
					write_options,
				)
			}
		}
	};
}

language_frame! {
	/// An `ID3v2` comment frame
	///
	/// Similar to `TXXX` and `WXXX` frames, comments are told apart by their descriptions
	/// and languages.
	CommentFrame, "COMM"
}

language_frame! {
	/// An `ID3v2` unsynchronized lyrics/text frame
	///
	/// Similar to `TXXX` and `WXXX` frames, USLT frames are told apart by their descriptions
	/// and languages.
	UnsynchronizedTextFrame, "USLT"
}
