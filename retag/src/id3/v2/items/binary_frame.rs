use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};

use std::io::Read;

/// A frame kept as raw bytes
///
/// This is used for frames without a typed representation, and for every encrypted frame.
/// Its body is written back exactly as it was read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryFrame {
	pub(crate) header: FrameHeader,
	/// The frame body
	pub data: Vec<u8>,
}

impl BinaryFrame {
	/// Create a new [`BinaryFrame`]
	pub fn new(id: FrameId, data: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(id, FrameFlags::default()),
			data,
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

	/// Read a [`BinaryFrame`]
	///
	/// # Errors
	///
	/// * Failure to read from `reader`
	pub fn parse<R>(reader: &mut R, id: FrameId, frame_flags: FrameFlags) -> Result<Option<Self>>
	where
		R: Read,
	{
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		if data.is_empty() {
			return Ok(None);
		}

		Ok(Some(BinaryFrame {
			header: FrameHeader::new(id, frame_flags),
			data,
		}))
	}

	/// Get the frame body
	pub fn as_bytes(&self) -> Vec<u8> {
		self.data.clone()
	}
}
