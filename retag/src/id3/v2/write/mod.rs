mod frame;

use super::tag::Id3v2Tag;
use super::util::synchsafe::{UnsynchronizationScheme, encode_syncsafe, unsynchronize};
use super::{Id3v2TagFlags, Id3v2Version};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::macros::try_vec;

use std::ops::Not;
use std::sync::OnceLock;

const HEADER_LEN: u64 = 10;
const FOOTER_LEN: u64 = 10;

// size(4) | flag byte count(1) | flags(1) | CRC data length(1) | CRC(5)
const CRC_EXTENDED_HEADER_LEN: usize = 12;

// In the very rare chance someone wants to write a CRC in their extended header
fn crc_32_table() -> &'static [u32; 256] {
	static INSTANCE: OnceLock<[u32; 256]> = OnceLock::new();
	INSTANCE.get_or_init(|| {
		let mut crc32_table = [0; 256];

		for (n, entry) in crc32_table.iter_mut().enumerate() {
			*entry = (0..8).fold(n as u32, |acc, _| match acc & 1 {
				1 => 0xEDB8_8320 ^ (acc >> 1),
				_ => acc >> 1,
			});
		}

		crc32_table
	})
}

/// Serialize `tag` for its target version
///
/// `existing_len` is the full size of the tag currently on disk (`0` if there is none). When the
/// new tag fits in that region, it is padded to fill it exactly so the file can be updated in
/// place. Otherwise [`WriteOptions::preferred_padding`] is used.
///
/// A tag without any writable frames serializes to nothing, meaning it should be stripped.
pub(crate) fn create_tag(
	tag: &Id3v2Tag,
	existing_len: u64,
	write_options: WriteOptions,
) -> Result<Vec<u8>> {
	let version = tag.version();
	let flags = *tag.flags();
	log::debug!("Creating {} tag, flags: {:?}", version, flags);

	let mut frames = Vec::new();
	frame::create_items(
		&mut frames,
		tag.frames.as_slice(),
		version,
		flags.unsynchronisation && version == Id3v2Version::V4,
		write_options,
	)?;

	// We are stripping the tag
	if frames.is_empty() {
		log::debug!("No frames to write, the tag will be removed");
		return Ok(Vec::new());
	}

	// ID3v2.2 and ID3v2.3 unsynchronise the whole tag body
	if flags.unsynchronisation && version != Id3v2Version::V4 {
		frames = unsynchronize(&frames, UnsynchronizationScheme::FalseSyncOnly);
	}

	let needs_crc = flags.crc && version == Id3v2Version::V4;
	let has_footer = flags.footer && version == Id3v2Version::V4;

	let extended_header_len = if needs_crc { CRC_EXTENDED_HEADER_LEN } else { 0 };
	let content_len = (extended_header_len + frames.len()) as u64;

	// https://mutagen-specs.readthedocs.io/en/latest/id3/id3v2.4.0-structure.html#padding:
	//
	// "[A tag] MUST NOT have any padding when a tag footer is added to the tag"
	let padding_len = if has_footer {
		log::trace!("Footer requested, not padding tag");
		0
	} else if existing_len >= HEADER_LEN + content_len {
		let padding = existing_len - HEADER_LEN - content_len;
		log::trace!("Tag fits the existing region, padding with {} bytes", padding);
		padding
	} else {
		u64::from(write_options.preferred_padding.unwrap_or(0))
	};

	let size = encode_syncsafe(u32::try_from(content_len + padding_len).unwrap_or(u32::MAX))?;

	let mut id3v2 = Vec::with_capacity((HEADER_LEN + content_len + padding_len + FOOTER_LEN) as usize);
	id3v2.extend_from_slice(b"ID3");
	id3v2.extend_from_slice(&[version.major(), 0, tag_flags_byte(flags, version)]);
	id3v2.extend_from_slice(&size);

	let crc_start = id3v2.len() + CRC_EXTENDED_HEADER_LEN - 5;
	if needs_crc {
		id3v2.extend_from_slice(&encode_syncsafe(CRC_EXTENDED_HEADER_LEN as u32)?);
		// One flag byte, with only the CRC flag set
		id3v2.extend_from_slice(&[1, 0x20, 5, 0, 0, 0, 0, 0]);
	}

	let content_start = id3v2.len();
	id3v2.extend_from_slice(&frames);
	id3v2.extend(try_vec![0; padding_len as usize]);

	if needs_crc {
		// The CRC is calculated on all the data between the extended header and footer
		let encoded_crc = calculate_crc(&id3v2[content_start..]);
		id3v2[crc_start..crc_start + 5].copy_from_slice(&encoded_crc);
	}

	if has_footer {
		// The footer is the same as the header, but with the identifier reversed
		let mut footer = [0; 10];
		footer[..3].copy_from_slice(b"3DI");
		footer[3..].copy_from_slice(&id3v2[3..10]);
		id3v2.extend_from_slice(&footer);
	}

	Ok(id3v2)
}

fn tag_flags_byte(flags: Id3v2TagFlags, version: Id3v2Version) -> u8 {
	let mut flags = flags;
	if version != Id3v2Version::V4 {
		flags.crc = false;
		flags.footer = false;
	}

	flags.as_byte(version)
}

// https://github.com/rstemmer/id3edit/blob/0246f3dc1a7a80a64461eeeb7b9ee88379003eb1/encoding/crc.c#L6:6
fn calculate_crc(content: &[u8]) -> [u8; 5] {
	let crc: u32 = content
		.iter()
		.fold(!0, |crc, octet| {
			(crc >> 8) ^ crc_32_table()[(((crc & 0xFF) ^ u32::from(*octet)) & 0xFF) as usize]
		})
		.not();

	// The CRC-32 is stored as a 35 bit synchsafe integer, leaving the upper
	// four bits always zeroed.
	let mut encoded_crc = [0; 5];
	for (i, byte) in encoded_crc.iter_mut().enumerate() {
		*byte = (crc >> ((4 - i) * 7)) as u8 & 0x7F;
	}

	encoded_crc
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ParseOptions;
	use crate::id3::v2::header::Id3v2Header;
	use crate::id3::v2::read::parse_id3v2;
	use crate::tag::Accessor;

	fn decode_crc(encoded: &[u8]) -> u32 {
		encoded
			.iter()
			.enumerate()
			.fold(0, |crc, (i, b)| crc | (u32::from(b & 0x7F) << ((4 - i) * 7)))
	}

	fn reparse(bytes: &[u8]) -> Id3v2Tag {
		let header = Id3v2Header::parse(&mut &bytes[..10]).unwrap();
		parse_id3v2(&bytes[10..], header, ParseOptions::new()).unwrap()
	}

	#[test_log::test]
	fn crc_check_value() {
		assert_eq!(decode_crc(&calculate_crc(b"123456789")), 0xCBF4_3926);
	}

	#[test_log::test]
	fn write_crc32() {
		let mut tag = Id3v2Tag::default();
		tag.set_artist(String::from("Foo artist"));
		tag.set_flags(Id3v2TagFlags {
			crc: true,
			..Id3v2TagFlags::default()
		});

		let bytes = create_tag(&tag, 0, WriteOptions::default()).unwrap();
		assert_eq!(bytes[5], 0x40);
		assert_eq!(&bytes[10..17], [0, 0, 0, 12, 1, 0x20, 5]);
		assert_eq!(decode_crc(&bytes[17..22]), {
			let encoded = calculate_crc(&bytes[22..]);
			decode_crc(&encoded)
		});

		let reparsed = reparse(&bytes);
		assert!(reparsed.flags().crc);
		assert_eq!(reparsed.artist().as_deref(), Some("Foo artist"));
	}

	#[test_log::test]
	fn padding_fills_existing_region() {
		let mut tag = Id3v2Tag::default();
		tag.set_title(String::from("Title"));

		let fresh = create_tag(&tag, 0, WriteOptions::default().preferred_padding(100)).unwrap();
		let frames_len = fresh.len() - 10 - 100;

		let in_place = create_tag(&tag, 500, WriteOptions::default()).unwrap();
		assert_eq!(in_place.len(), 500);
		assert_eq!(&in_place[10..10 + frames_len], &fresh[10..10 + frames_len]);

		// Too small, grow with the preferred padding
		let grown = create_tag(&tag, 12, WriteOptions::default().preferred_padding(0)).unwrap();
		assert_eq!(grown.len(), 10 + frames_len);
	}

	#[test_log::test]
	fn footer_replaces_padding() {
		let mut tag = Id3v2Tag::default();
		tag.set_title(String::from("Title"));
		tag.set_flags(Id3v2TagFlags {
			footer: true,
			..Id3v2TagFlags::default()
		});

		let bytes = create_tag(&tag, 0, WriteOptions::default()).unwrap();
		let (header, footer) = (&bytes[..10], &bytes[bytes.len() - 10..]);
		assert_eq!(&footer[..3], b"3DI");
		assert_eq!(header[3..], footer[3..]);
		assert_eq!(header[5], 0x10);

		// No footer before ID3v2.4
		tag.set_version(Id3v2Version::V3);
		let bytes = create_tag(&tag, 0, WriteOptions::default().preferred_padding(0)).unwrap();
		assert_eq!(bytes[5], 0);
		assert_ne!(&bytes[bytes.len() - 10..bytes.len() - 7], b"3DI");
	}

	#[test_log::test]
	fn v3_tag_unsynchronisation() {
		let mut tag = Id3v2Tag::default();
		tag.set_version(Id3v2Version::V3);
		tag.set_title(String::from("Title"));
		tag.set_flags(Id3v2TagFlags {
			unsynchronisation: true,
			..Id3v2TagFlags::default()
		});

		let bytes = create_tag(&tag, 0, WriteOptions::default().preferred_padding(0)).unwrap();
		assert_eq!(bytes[5], 0x80);
		// The UTF-16 BOM is a false sync
		assert_eq!(&bytes[20..24], [0x01, 0xFF, 0x00, 0xFE]);

		let reparsed = reparse(&bytes);
		assert_eq!(reparsed.title().as_deref(), Some("Title"));
	}

	#[test_log::test]
	fn empty_tag_is_stripped() {
		let tag = Id3v2Tag::default();
		assert!(create_tag(&tag, 100, WriteOptions::default()).unwrap().is_empty());
	}
}
