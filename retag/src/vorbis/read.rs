use super::VorbisComments;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::macros::{err, parse_mode_choice, try_vec};
use crate::picture::Picture;

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

pub(crate) const PICTURE_FIELD: &str = "METADATA_BLOCK_PICTURE";

/// Read a Vorbis comment block body of `len` bytes
pub(crate) fn read_comments<R>(
	data: &mut R,
	mut len: u64,
	parse_options: ParseOptions,
) -> Result<VorbisComments>
where
	R: Read,
{
	let parse_mode = parse_options.parsing_mode;

	let vendor_len = data.read_u32::<LittleEndian>()?;
	if u64::from(vendor_len) + 4 > len {
		err!(SizeMismatch);
	}

	let mut vendor_bytes = try_vec![0; vendor_len as usize];
	data.read_exact(&mut vendor_bytes)?;
	len -= u64::from(vendor_len) + 4;

	let vendor = decode_field(vendor_bytes, parse_mode)?;

	let number_of_items = data.read_u32::<LittleEndian>()?;
	len = len.saturating_sub(4);

	// Every field needs at least its 4 byte length
	if u64::from(number_of_items) > len >> 2 {
		err!(SizeMismatch);
	}

	let mut tag = VorbisComments {
		vendor,
		items: Vec::with_capacity(number_of_items as usize),
		pictures: Vec::new(),
	};

	for _ in 0..number_of_items {
		let comment_len = data.read_u32::<LittleEndian>()?;
		if u64::from(comment_len) + 4 > len {
			err!(SizeMismatch);
		}

		let mut comment_bytes = try_vec![0; comment_len as usize];
		data.read_exact(&mut comment_bytes)?;
		len -= u64::from(comment_len) + 4;

		// NAME=value
		let mut comment_split = comment_bytes.splitn(2, |b| *b == b'=');

		let key = comment_split.next().unwrap_or_default();
		let Some(value) = comment_split.next() else {
			log::warn!("Vorbis comments: No separator found in field, discarding");
			continue;
		};

		if key.is_empty() {
			log::warn!("Vorbis comments: Field has an empty name, discarding");
			continue;
		}

		if key.eq_ignore_ascii_case(PICTURE_FIELD.as_bytes()) {
			if !parse_options.read_cover_art {
				continue;
			}

			match Picture::from_flac_bytes(value, true, parse_mode) {
				Ok(picture) => tag.pictures.push(picture),
				Err(e) => {
					if parse_mode == ParsingMode::Strict {
						return Err(e);
					}

					log::warn!("Vorbis comments: Failed to decode picture, discarding field");
				},
			}

			continue;
		}

		let Ok(key) = String::from_utf8(key.to_vec()) else {
			parse_mode_choice!(
				parse_mode,
				STRICT: err!(TextDecode("Vorbis comments: Field name is not valid UTF-8")),
				DEFAULT: {
					log::warn!("Vorbis comments: Field name is not valid UTF-8, discarding");
					continue;
				}
			);
		};

		let value = decode_field(value.to_vec(), parse_mode)?;

		log::trace!("Vorbis comments: Read field '{}'", key);
		tag.items.push((key, value));
	}

	Ok(tag)
}

fn decode_field(bytes: Vec<u8>, parse_mode: ParsingMode) -> Result<String> {
	match String::from_utf8(bytes) {
		Ok(text) => Ok(text),
		Err(e) => {
			if parse_mode == ParsingMode::Strict {
				return Err(e.into());
			}

			log::warn!("Vorbis comments: Invalid UTF-8, replacing invalid sequences");
			Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
		},
	}
}
