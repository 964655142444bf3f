use super::constants::ID3V1_TAG_MARKER;
use super::tag::Id3v1Tag;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::find_id3v1;
use crate::util::text::latin1_encode;

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

/// Write `tag` over the ID3v1 tag at the end of `file`, appending it if there is none
///
/// An empty tag removes the existing one instead.
pub(crate) fn write_id3v1(file: &mut File, tag: &Id3v1Tag, write_options: WriteOptions) -> Result<()> {
	let existing = find_id3v1(file)?.is_some();

	if tag.is_empty() {
		if existing {
			log::debug!("Removing empty ID3v1 tag");

			// An ID3v1 tag occupies the last 128 bytes of the file, so we can just
			// shrink it down.
			let new_length = file.metadata()?.len().saturating_sub(128);
			file.set_len(new_length)?;
		}

		return Ok(());
	}

	let bytes = encode(tag, write_options)?;

	if existing {
		file.seek(SeekFrom::End(-128))?;
	} else {
		file.seek(SeekFrom::End(0))?;
	}

	log::debug!("Writing {} bytes of ID3v1 (overwrite: {})", bytes.len(), existing);
	file.write_all(&bytes)?;
	file.flush()?;

	Ok(())
}

/// Truncate the ID3v1 tag off the end of the file at `path`
pub(crate) fn remove_id3v1(path: &Path) -> Result<bool> {
	let mut file = OpenOptions::new().read(true).write(true).open(path)?;
	if find_id3v1(&mut file)?.is_none() {
		return Ok(false);
	}

	let new_length = file.metadata()?.len() - 128;
	file.set_len(new_length)?;
	Ok(true)
}

/// Encode `tag` as ID3v1.1
pub(super) fn encode(tag: &Id3v1Tag, write_options: WriteOptions) -> Result<[u8; 128]> {
	fn resize_string(
		dst: &mut [u8],
		value: Option<&str>,
		write_options: WriteOptions,
	) -> Result<()> {
		if let Some(val) = value {
			let encoded = latin1_encode(val, write_options.lossy_text_encoding)?;
			let len = std::cmp::min(encoded.len(), dst.len());
			dst[..len].copy_from_slice(&encoded[..len]);
		}

		Ok(())
	}

	let mut writer = [0; 128];
	writer[..3].copy_from_slice(&ID3V1_TAG_MARKER);

	resize_string(&mut writer[3..33], tag.title.as_deref(), write_options)?;
	resize_string(&mut writer[33..63], tag.artist.as_deref(), write_options)?;
	resize_string(&mut writer[63..93], tag.album.as_deref(), write_options)?;

	if let Some(year) = tag.year {
		let year = std::cmp::min(year, 9999);
		writer[93..97].copy_from_slice(format!("{year:04}").as_bytes());
	}

	// Always ID3v1.1, the comment gives up its last two bytes for the track number
	resize_string(&mut writer[97..125], tag.comment.as_deref(), write_options)?;
	writer[125] = 0;
	writer[126] = tag.track_number.unwrap_or(0);
	writer[127] = tag.genre.unwrap_or(255);

	Ok(writer)
}
