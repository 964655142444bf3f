use super::ApeTag;
use super::item::{ApeItem, ApeItemValue};
use crate::ape::constants::{APE_HEADER_LEN, APE_PREAMBLE, APE_VERSION_1, APE_VERSION_2};
use crate::ape::header::ApeHeader;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::macros::{decode_err, err, parse_mode_choice, try_vec};

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

// The smallest possible item: value size (4) | flags (4) | key (2) | NUL (1)
const MIN_ITEM_LEN: usize = 11;

/// Locate, and optionally read, the APE tag at the end of `reader`
///
/// The returned tag always carries its offset and on-disk size. Its items are only read with
/// `read_elements`.
pub(crate) fn read_ape_tag<R>(
	reader: &mut R,
	read_elements: bool,
	parse_options: ParseOptions,
) -> Result<Option<ApeTag>>
where
	R: Read + Seek,
{
	let file_len = reader.seek(SeekFrom::End(0))?;
	let Some((footer, footer_end)) = find_footer(reader, file_len, parse_options.parsing_mode)?
	else {
		log::debug!("No APE tag found");
		return Ok(None);
	};

	let tag_size = footer.tag_size();
	let Some(offset) = footer_end.checked_sub(tag_size) else {
		decode_err!(@BAIL Ape, "APE tag is larger than the file it is in");
	};

	log::debug!(
		"Found APE tag (version {}) at offset {}, {} bytes",
		footer.version,
		offset,
		tag_size
	);

	let mut tag = ApeTag {
		read_only: footer.read_only(),
		version: footer.version,
		items: Vec::new(),
		offset: Some(offset),
		size_on_disk: tag_size,
	};

	if !read_elements {
		return Ok(Some(tag));
	}

	let items_len = footer.size - APE_HEADER_LEN;
	reader.seek(SeekFrom::Start(footer_end - u64::from(footer.size)))?;

	let mut items = try_vec![0; items_len as usize];
	reader.read_exact(&mut items)?;

	read_items(&mut tag, &items, footer.item_count, parse_options.parsing_mode)?;
	Ok(Some(tag))
}

// The footer is either the last 32 bytes of the file, or directly precedes an ID3v1 tag
fn find_footer<R>(
	reader: &mut R,
	file_len: u64,
	parse_mode: ParsingMode,
) -> Result<Option<(ApeHeader, u64)>>
where
	R: Read + Seek,
{
	for trailing in [0_u64, 128] {
		let Some(footer_start) = file_len.checked_sub(trailing + u64::from(APE_HEADER_LEN)) else {
			continue;
		};

		reader.seek(SeekFrom::Start(footer_start))?;

		let mut footer = [0; 32];
		reader.read_exact(&mut footer)?;

		if &footer[..8] != APE_PREAMBLE {
			continue;
		}

		let header = ApeHeader::parse(&footer)?;
		if header.version != APE_VERSION_1 && header.version != APE_VERSION_2 {
			parse_mode_choice!(
				parse_mode,
				STRICT: decode_err!(@BAIL Ape, "APE tag has an unknown version"),
				DEFAULT: {
					log::warn!("APE: Ignoring tag with unknown version {}", header.version);
					return Ok(None);
				}
			);
		}

		return Ok(Some((header, footer_start + u64::from(APE_HEADER_LEN))));
	}

	Ok(None)
}

fn read_items(
	tag: &mut ApeTag,
	mut reader: &[u8],
	item_count: u32,
	parse_mode: ParsingMode,
) -> Result<()> {
	for _ in 0..item_count {
		if reader.len() < MIN_ITEM_LEN {
			log::warn!("APE: Item count exceeds the tag size, stopping");
			break;
		}

		let value_size = reader.read_u32::<LittleEndian>()? as usize;
		let flags = reader.read_u32::<LittleEndian>()?;

		let Some(key_len) = reader.iter().position(|b| *b == 0) else {
			decode_err!(@BAIL Ape, "APE tag item key is not terminated");
		};

		let key = std::str::from_utf8(&reader[..key_len])
			.map_err(|_| decode_err!(Ape, "APE tag item contains a non UTF-8 key"))?
			.to_uppercase();
		reader = &reader[key_len + 1..];

		if value_size > reader.len() {
			err!(SizeMismatch);
		}

		let (value, rest) = reader.split_at(value_size);
		reader = rest;

		let value = match (flags >> 1) & 3 {
			0 => ApeItemValue::Text(decode_text(value, parse_mode)?),
			1 => ApeItemValue::Binary(value.to_vec()),
			2 => ApeItemValue::Locator(decode_text(value, parse_mode)?),
			_ => decode_err!(@BAIL Ape, "APE tag item contains an invalid item type"),
		};

		let mut item = match ApeItem::new(key, value) {
			Ok(item) => item,
			Err(e) => {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(e),
					DEFAULT: {
						log::warn!("APE: Skipping item: {}", e);
						continue;
					}
				);
			},
		};

		item.read_only = flags & 1 == 1;

		log::trace!("APE: Read item '{}'", item.key());
		tag.insert_read(item);
	}

	Ok(())
}

fn decode_text(value: &[u8], parse_mode: ParsingMode) -> Result<String> {
	match std::str::from_utf8(value) {
		Ok(text) => Ok(text.to_owned()),
		Err(e) => {
			parse_mode_choice!(
				parse_mode,
				STRICT: return Err(e.into()),
				DEFAULT: {
					log::warn!("APE: Text item is not valid UTF-8, replacing invalid sequences");
					Ok(String::from_utf8_lossy(value).into_owned())
				}
			)
		},
	}
}
