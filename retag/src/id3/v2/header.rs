use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::decode_syncsafe;
use crate::macros::err;

use std::fmt::{Display, Formatter};
use std::io::Read;

/// The ID3v2 version
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash, Default)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	#[default]
	V4,
}

impl Id3v2Version {
	/// The major version byte
	pub fn major(self) -> u8 {
		match self {
			Id3v2Version::V2 => 2,
			Id3v2Version::V3 => 3,
			Id3v2Version::V4 => 4,
		}
	}

	// The size of a frame header in this version
	pub(crate) fn frame_header_len(self) -> usize {
		match self {
			Id3v2Version::V2 => 6,
			Id3v2Version::V3 | Id3v2Version::V4 => 10,
		}
	}
}

impl Display for Id3v2Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2.{}", self.major())
	}
}

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	/// Whether or not all frames are unsynchronised
	///
	/// In ID3v2.2 and ID3v2.3 the scheme covers the whole tag body, in ID3v2.4 it is applied to
	/// every frame individually.
	pub unsynchronisation: bool,
	/// Whether the tag has an extended header
	///
	/// Extended headers are skipped while reading, and only written in ID3v2.4 when `crc` is set.
	pub extended_header: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag includes a footer (ID3v2.4 only)
	///
	/// A footer will be created if the tag is written, in place of padding
	pub footer: bool,
	/// Whether or not to include a CRC-32 in the extended header (ID3v2.4 only)
	///
	/// This is calculated if the tag is written
	pub crc: bool,
}

impl Id3v2TagFlags {
	/// Get the byte representation of the flags in `version`
	///
	/// Flags without a representation in `version` are left out. The extended header bit is
	/// set when a CRC will be written.
	pub fn as_byte(&self, version: Id3v2Version) -> u8 {
		let mut byte = 0;

		if self.unsynchronisation {
			byte |= 0x80;
		}

		if version == Id3v2Version::V2 {
			return byte;
		}

		if version == Id3v2Version::V4 && self.crc {
			byte |= 0x40;
		}

		if self.experimental {
			byte |= 0x20;
		}

		if version == Id3v2Version::V4 && self.footer {
			byte |= 0x10;
		}

		byte
	}
}

/// The 10 byte header at the start of every ID3v2 tag
///
/// `"ID3" | major | minor | flags | size (syncsafe)`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Id3v2Header {
	pub version: Id3v2Version,
	pub minor: u8,
	pub flags: Id3v2TagFlags,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub size: u32,
}

impl Id3v2Header {
	pub(crate) fn parse<R>(bytes: &mut R) -> Result<Self>
	where
		R: Read,
	{
		log::debug!("Parsing ID3v2 header");

		let mut header = [0; 10];
		bytes.read_exact(&mut header)?;

		if &header[..3] != b"ID3" {
			err!(FakeTag);
		}

		// Version is stored as [major, minor], but here we don't care about minor revisions unless there's an error.
		let version = match header[3] {
			2 => Id3v2Version::V2,
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			major => {
				return Err(
					Id3v2Error::new(Id3v2ErrorKind::BadId3v2Version(major, header[4])).into(),
				);
			},
		};

		let flags = header[5];

		// Compression was a flag only used in ID3v2.2 (bit 6).
		// At the time the ID3v2.2 specification was written, a compression scheme wasn't decided.
		// It recommends just ignoring the tag in this case.
		if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::V2Compression).into());
		}

		let not_v2 = version != Id3v2Version::V2;
		let flags_parsed = Id3v2TagFlags {
			unsynchronisation: flags & 0x80 == 0x80,
			extended_header: not_v2 && flags & 0x40 == 0x40,
			experimental: not_v2 && flags & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && flags & 0x10 == 0x10,
			crc: false, // Retrieved from the extended header, if present
		};

		let size = decode_syncsafe([header[6], header[7], header[8], header[9]]);

		let header = Id3v2Header {
			version,
			minor: header[4],
			flags: flags_parsed,
			size,
		};
		log::debug!(
			"Found {} tag, {} bytes, flags: {:?}",
			header.version,
			header.size,
			header.flags
		);

		Ok(header)
	}

	/// The total size of the tag, including the header and footer
	pub(crate) fn full_tag_size(&self) -> u64 {
		u64::from(self.size) + 10 + if self.flags.footer { 10 } else { 0 }
	}
}

/// Skip the extended header at the start of the (resynchronised) tag body
///
/// Returns the remaining body, and whether the extended header announced a CRC.
pub(crate) fn skip_extended_header(content: &[u8], version: Id3v2Version) -> Result<(&[u8], bool)> {
	let bad_size = || Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize);

	let Some(size_bytes) = content.get(..4) else {
		return Err(bad_size().into());
	};
	let size_bytes = [size_bytes[0], size_bytes[1], size_bytes[2], size_bytes[3]];

	let (extended_len, crc) = match version {
		// Size excludes itself: size(4) | flags(2) | padding size(4) | CRC(4, optional)
		Id3v2Version::V3 => {
			let size = u32::from_be_bytes(size_bytes) as usize;
			if size < 6 {
				return Err(bad_size().into());
			}

			let crc = content.get(4).is_some_and(|flags| flags & 0x80 == 0x80);
			(size + 4, crc)
		},
		// Size includes itself: size(4) | flag byte count(1) | flags(n) | flag data
		_ => {
			let size = decode_syncsafe(size_bytes) as usize;
			if size < 6 {
				return Err(bad_size().into());
			}

			let crc = content.get(5).is_some_and(|flags| flags & 0x20 == 0x20);
			(size, crc)
		},
	};

	match content.get(extended_len..) {
		Some(rest) => {
			log::trace!("Skipped an extended header of {} bytes", extended_len);
			Ok((rest, crc))
		},
		None => Err(bad_size().into()),
	}
}
