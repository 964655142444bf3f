use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

/// An `ID3v2` URL frame
///
/// URLs are always Latin-1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlLinkFrame {
	pub(crate) header: FrameHeader,
	pub(crate) content: String,
}

impl UrlLinkFrame {
	/// Create a new [`UrlLinkFrame`]
	pub fn new(id: FrameId, content: String) -> Self {
		Self {
			header: FrameHeader::new(id, FrameFlags::default()),
			content,
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

	/// Get the URL of the frame
	pub fn url(&self) -> &str {
		&self.content
	}

	/// Change the URL of the frame
	///
	/// Returns the previous URL. Characters outside of Latin-1 are replaced on write, or fail the
	/// write when lossy encoding is disabled.
	pub fn set_url(&mut self, url: String) -> String {
		std::mem::replace(&mut self.content, url)
	}

	/// Read a [`UrlLinkFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text as Latin-1
	pub fn parse<R>(reader: &mut R, id: FrameId, frame_flags: FrameFlags) -> Result<Option<Self>>
	where
		R: Read,
	{
		let url = decode_text(
			reader,
			TextDecodeOptions::new().encoding(TextEncoding::Latin1),
		)?;
		if url.bytes_read == 0 {
			return Ok(None);
		}

		Ok(Some(UrlLinkFrame {
			header: FrameHeader::new(id, frame_flags),
			content: url.content,
		}))
	}

	/// Convert a [`UrlLinkFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the URL is not Latin-1
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		Ok(TextEncoding::Latin1.encode(&self.content, false, write_options.lossy_text_encoding)?)
	}
}
