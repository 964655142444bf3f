use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::unsupported;

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

const FRAME_ID: FrameId = FrameId::from_static("RBUF");

/// A recommended buffer size ("RBUF", "BUF") frame
///
/// Tells a streaming client how big its buffer should be, and where the next tag can be found.
///
/// Frames read from a file are kept as [`BinaryFrame`](crate::id3::v2::BinaryFrame)s, so this
/// type is only produced by [`RecommendedBufferSizeFrame::parse`] and [`RecommendedBufferSizeFrame::new`].
/// Only an unset (zero) buffer size can be written, and such a frame is omitted from the tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecommendedBufferSizeFrame {
	pub(crate) header: FrameHeader,
	/// The buffer size (24 bits)
	pub buffer_size: u32,
	/// Whether the following data may be an embedded tag
	pub embedded_info: bool,
	/// Offset from the end of this tag to the next one
	pub offset_to_next_tag: Option<u32>,
}

impl RecommendedBufferSizeFrame {
	/// Create a new [`RecommendedBufferSizeFrame`]
	pub fn new(buffer_size: u32, embedded_info: bool, offset_to_next_tag: Option<u32>) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			buffer_size: buffer_size & 0x00FF_FFFF,
			embedded_info,
			offset_to_next_tag,
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

	/// Read a [`RecommendedBufferSizeFrame`]
	///
	/// Tags keep this frame as a [`BinaryFrame`](crate::id3::v2::BinaryFrame), this decodes its
	/// `data`.
	///
	/// Layout: `buffer size (3 BE) | flags (1, bit 0 = embedded info) | offset to next tag (4 BE, optional)`
	///
	/// # Errors
	///
	/// * The body is shorter than 4 bytes, or the offset is truncated
	pub fn parse<R>(reader: &mut R, frame_flags: FrameFlags) -> Result<Option<Self>>
	where
		R: Read,
	{
		let Ok(buffer_size) = reader.read_u24::<BigEndian>() else {
			return Ok(None);
		};

		let embedded_info = reader.read_u8()? & 1 == 1;

		let mut offset = Vec::new();
		reader.read_to_end(&mut offset)?;
		let offset_to_next_tag = match offset.len() {
			0 => None,
			_ => Some((&offset[..]).read_u32::<BigEndian>()?),
		};

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			buffer_size,
			embedded_info,
			offset_to_next_tag,
		}))
	}

	/// Serialize the frame body
	///
	/// An unset buffer size produces an empty body, which removes the frame from the tag.
	///
	/// # Errors
	///
	/// * The buffer size is set, this frame cannot be written
	pub fn as_bytes(&self, version: Id3v2Version) -> Result<Vec<u8>> {
		if self.buffer_size == 0 {
			return Ok(Vec::new());
		}

		let id = FRAME_ID.resolve(version).unwrap_or_default();
		Err(unsupported!(id, "Writing recommended buffer size frames is not implemented"))
	}
}
