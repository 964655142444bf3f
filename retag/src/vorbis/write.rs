use super::read::PICTURE_FIELD;
use crate::error::Result;
use crate::macros::err;
use crate::picture::{Picture, PictureInformation};

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

/// Encode a Vorbis comment block body
///
/// Pictures are appended as `METADATA_BLOCK_PICTURE` fields.
pub(crate) fn create_comments(
	vendor: &str,
	items: &[(&str, &str)],
	pictures: &[(Picture, PictureInformation)],
) -> Result<Vec<u8>> {
	let mut body = Vec::new();
	write_len(&mut body, vendor.len())?;
	body.write_all(vendor.as_bytes())?;
	write_len(&mut body, items.len() + pictures.len())?;

	for (key, value) in items {
		write_len(&mut body, key.len() + 1 + value.len())?;
		body.write_all(key.as_bytes())?;
		body.write_u8(b'=')?;
		body.write_all(value.as_bytes())?;
	}

	for (picture, information) in pictures {
		let encoded = picture.as_flac_bytes(*information, true);

		write_len(&mut body, PICTURE_FIELD.len() + 1 + encoded.len())?;
		body.write_all(PICTURE_FIELD.as_bytes())?;
		body.write_u8(b'=')?;
		body.write_all(&encoded)?;
	}

	Ok(body)
}

fn write_len(body: &mut Vec<u8>, len: usize) -> Result<()> {
	let Ok(len) = u32::try_from(len) else {
		err!(TooMuchData);
	};

	body.write_u32::<LittleEndian>(len)?;
	Ok(())
}
