use crate::config::{ParsingMode, WriteOptions};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::parse_mode_choice;
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

const FRAME_ID: FrameId = FrameId::from_static("UFID");

/// An `ID3v2` unique file identifier frame (UFID).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniqueFileIdentifierFrame {
	pub(crate) header: FrameHeader,
	/// The non-empty owner of the identifier
	pub owner: String,
	/// The binary payload, up to 64 bytes
	pub identifier: Vec<u8>,
}

impl UniqueFileIdentifierFrame {
	/// Create a new [`UniqueFileIdentifierFrame`]
	pub fn new(owner: String, identifier: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			owner,
			identifier,
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

	/// Decode the frame contents from the reader
	///
	/// # Errors
	///
	/// * The owner is missing, and the parsing mode is [`ParsingMode::Strict`]
	pub fn parse<R>(
		reader: &mut R,
		frame_flags: FrameFlags,
		parse_mode: ParsingMode,
	) -> Result<Option<Self>>
	where
		R: Read,
	{
		let owner = decode_text(
			reader,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		)?;
		if owner.bytes_read == 0 {
			return Ok(None);
		}

		if owner.content.is_empty() {
			parse_mode_choice!(
				parse_mode,
				STRICT: return Err(Id3v2Error::new(Id3v2ErrorKind::MissingUfidOwner).into()),
				DEFAULT: log::warn!("UFID frame has an empty owner")
			);
		}

		let mut identifier = Vec::new();
		reader.read_to_end(&mut identifier)?;

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			owner: owner.content,
			identifier,
		}))
	}

	/// Encode the frame contents
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the owner is not Latin-1
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		let mut content = TextEncoding::Latin1.encode(
			&self.owner,
			true,
			write_options.lossy_text_encoding,
		)?;
		content.extend(&self.identifier);

		Ok(content)
	}
}
