use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::unsupported;
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

const FRAME_ID: FrameId = FrameId::from_static("CRM");

/// An ID3v2.2 encrypted meta frame ("CRM")
///
/// ID3v2.3 replaced this frame with per-frame encryption, so it has no representation there and
/// is dropped when saving any later version. Writing it as ID3v2.2 is not implemented.
///
/// Frames read from a file are kept as [`BinaryFrame`](crate::id3::v2::BinaryFrame)s, see
/// [`EncryptedMetaFrame::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncryptedMetaFrame {
	pub(crate) header: FrameHeader,
	/// The owner of the encryption method
	pub owner_identifier: String,
	/// A short description of the encrypted content
	pub content_explanation: String,
	/// The encrypted frame(s)
	pub encrypted_data: Vec<u8>,
}

impl EncryptedMetaFrame {
	/// Create a new [`EncryptedMetaFrame`]
	pub fn new(owner_identifier: String, content_explanation: String, encrypted_data: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			owner_identifier,
			content_explanation,
			encrypted_data,
		}
	}

	/// Read an [`EncryptedMetaFrame`]
	///
	/// Tags keep this frame as a [`BinaryFrame`](crate::id3::v2::BinaryFrame), this decodes its
	/// `data`.
	///
	/// Layout: `owner NUL | explanation NUL | data`, both strings Latin-1
	///
	/// # Errors
	///
	/// * Failure to read from `reader`
	pub fn parse<R>(reader: &mut R) -> Result<Option<Self>>
	where
		R: Read,
	{
		let latin1 = TextDecodeOptions::new()
			.encoding(TextEncoding::Latin1)
			.terminated(true);

		let owner = decode_text(reader, latin1)?;
		if owner.bytes_read == 0 {
			return Ok(None);
		}

		let explanation = decode_text(reader, latin1)?;

		let mut encrypted_data = Vec::new();
		reader.read_to_end(&mut encrypted_data)?;

		Ok(Some(Self::new(
			owner.content,
			explanation.content,
			encrypted_data,
		)))
	}

	/// Serialize the frame body
	///
	/// # Errors
	///
	/// Always, the frame cannot be written in any version
	pub fn as_bytes(&self, version: Id3v2Version) -> Result<Vec<u8>> {
		let id = FRAME_ID.resolve(version).unwrap_or_default();
		Err(unsupported!(id, "Writing encrypted meta frames is not implemented"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn parse_and_refuse_write() {
		let content = b"owner\x00about\x00\x01\x02";
		let frame = EncryptedMetaFrame::parse(&mut &content[..]).unwrap().unwrap();
		assert_eq!(frame.owner_identifier, "owner");
		assert_eq!(frame.content_explanation, "about");
		assert_eq!(frame.encrypted_data, [1, 2]);

		assert!(frame.as_bytes(Id3v2Version::V2).unwrap_err().is_unsupported_operation());
	}
}
