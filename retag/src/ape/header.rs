use super::constants::{APE_HEADER_LEN, APE_PREAMBLE};
use crate::error::Result;
use crate::macros::{decode_err, err};

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

// Bit 31 set: tag contains a header
const CONTAINS_HEADER: u32 = 1 << 31;
// Bit 30 set: tag contains NO footer
const CONTAINS_NO_FOOTER: u32 = 1 << 30;
// Bit 29 set: this is the header
const IS_HEADER: u32 = 1 << 29;
// Bit 0 set: tag is read only
const READ_ONLY: u32 = 1;

/// An APE header or footer
///
/// `"APETAGEX" | version | size | item count | flags | reserved (8)`, all little endian
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApeHeader {
	pub(crate) version: u32,
	/// The size of the items and footer, **excluding** the header
	pub(crate) size: u32,
	pub(crate) item_count: u32,
	pub(crate) flags: u32,
}

impl ApeHeader {
	pub(crate) fn parse(bytes: &[u8; 32]) -> Result<Self> {
		if &bytes[..8] != APE_PREAMBLE {
			err!(FakeTag);
		}

		let mut reader = Cursor::new(&bytes[8..]);
		let version = reader.read_u32::<LittleEndian>()?;
		let size = reader.read_u32::<LittleEndian>()?;
		let item_count = reader.read_u32::<LittleEndian>()?;
		let flags = reader.read_u32::<LittleEndian>()?;

		let mut reserved = [0; 8];
		reader.read_exact(&mut reserved)?;

		if size < APE_HEADER_LEN {
			decode_err!(@BAIL Ape, "APE tag has an invalid size (< 32)");
		}

		log::trace!(
			"APE footer: version {}, size {}, {} items, flags {:#010X}",
			version,
			size,
			item_count,
			flags
		);

		Ok(Self {
			version,
			size,
			item_count,
			flags,
		})
	}

	/// Whether a 32 byte header precedes the items
	pub(crate) fn has_header(&self) -> bool {
		self.flags & CONTAINS_HEADER == CONTAINS_HEADER
	}

	pub(crate) fn read_only(&self) -> bool {
		self.flags & READ_ONLY == READ_ONLY
	}

	/// The full size of the tag, including the header if there is one
	pub(crate) fn tag_size(&self) -> u64 {
		u64::from(self.size) + if self.has_header() { u64::from(APE_HEADER_LEN) } else { 0 }
	}

	/// A header/footer pair for an APEv2 tag
	pub(crate) fn v2(size: u32, item_count: u32, read_only: bool) -> Self {
		let mut flags = CONTAINS_HEADER;
		if read_only {
			flags |= READ_ONLY;
		}

		Self {
			version: super::constants::APE_VERSION_2,
			size,
			item_count,
			flags,
		}
	}

	/// Encode as a header (`is_header`) or footer
	///
	/// The footer flag byte is `0x80`, the header's is `0xA0`.
	pub(crate) fn as_bytes(&self, is_header: bool) -> [u8; 32] {
		let mut flags = self.flags & !CONTAINS_NO_FOOTER;
		if is_header {
			flags |= IS_HEADER;
		} else {
			flags &= !IS_HEADER;
		}

		let mut bytes = [0; 32];
		bytes[..8].copy_from_slice(APE_PREAMBLE);
		bytes[8..12].copy_from_slice(&self.version.to_le_bytes());
		bytes[12..16].copy_from_slice(&self.size.to_le_bytes());
		bytes[16..20].copy_from_slice(&self.item_count.to_le_bytes());
		bytes[20..24].copy_from_slice(&flags.to_le_bytes());
		bytes
	}
}
