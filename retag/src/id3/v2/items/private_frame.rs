use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

const FRAME_ID: FrameId = FrameId::from_static("PRIV");

/// An `ID3v2` private frame
///
/// This frame is used to store information from a software producer that
/// is not defined in the ID3v2 specification. A tag may hold several, but only one per owner.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrivateFrame {
	pub(crate) header: FrameHeader,
	/// A URL containing an email address, or a link to a location where an email can be found,
	/// that belongs to the organisation responsible for the frame
	pub owner: String,
	/// Binary data
	pub private_data: Vec<u8>,
}

impl PrivateFrame {
	/// Create a new [`PrivateFrame`]
	pub fn new(owner: String, private_data: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			owner,
			private_data,
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

	/// Read a [`PrivateFrame`]
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Failure to read from `reader`
	pub fn parse<R>(reader: &mut R, frame_flags: FrameFlags) -> Result<Option<Self>>
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

		let mut private_data = Vec::new();
		reader.read_to_end(&mut private_data)?;

		Ok(Some(PrivateFrame {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			owner: owner.content,
			private_data,
		}))
	}

	/// Convert a [`PrivateFrame`] to a byte vec
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
		content.extend(&self.private_data);

		Ok(content)
	}
}
