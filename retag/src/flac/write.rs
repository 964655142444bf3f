//! Rewriting the FLAC metadata region
//!
//! The metadata blocks sit between the `fLaC` marker and the audio frames, so any change in their
//! total size would have to move the audio. The padding block exists to avoid that: it is resized
//! to absorb whatever the Vorbis comment block gains or loses. Only when the new blocks no longer
//! fit in the old region is the whole file rewritten, leaving a fresh padding reservoir behind.

use super::block::{
	BLOCK_ID_APPLICATION, BLOCK_ID_CUESHEET, BLOCK_ID_PADDING, BLOCK_ID_PICTURE,
	BLOCK_ID_SEEKTABLE, BLOCK_ID_STREAMINFO, BLOCK_ID_VORBIS_COMMENTS, BLOCK_HEADER_LEN,
	MAX_BLOCK_LEN, Block,
};
use super::read::verify_flac;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::find_id3v2;
use crate::macros::{decode_err, try_vec};
use crate::rewrite::rewrite_with;
use crate::util::io::copy_exact;
use crate::vorbis::write::create_comments;
use crate::vorbis::{DEFAULT_VENDOR, VorbisComments};

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

// The layout of the metadata region as found on disk
struct MetadataRegion {
	// Everything before the first block: an optional ID3v2 tag and the stream marker
	blocks_start: u64,
	// The start of the audio frames
	blocks_end: u64,
	// STREAMINFO, SEEKTABLE and the other blocks worth keeping, in write order
	kept: Vec<Block>,
	vendor: Option<String>,
	has_comments: bool,
}

/// Write `tag` as the file's only Vorbis comment block, or remove the block with `None`
///
/// Returns `false` if nothing had to be written.
pub(crate) fn write_to_path(
	path: &Path,
	tag: Option<&VorbisComments>,
	write_options: WriteOptions,
) -> Result<bool> {
	let region = {
		let mut reader = BufReader::new(File::open(path)?);
		read_region(&mut reader)?
	};

	if tag.is_none() && !region.has_comments {
		log::debug!("FLAC: No Vorbis comment block to remove");
		return Ok(false);
	}

	let mut blocks = region.kept;
	if let Some(tag) = tag {
		// The file's own vendor always wins
		let vendor = match region.vendor.as_deref() {
			Some(vendor) if !vendor.is_empty() => vendor,
			_ if !tag.vendor.is_empty() => tag.vendor.as_str(),
			_ => DEFAULT_VENDOR,
		};

		let comments = create_comments(vendor, &tag.items_to_write(), &tag.pictures)?;
		blocks.push(Block::new(BLOCK_ID_VORBIS_COMMENTS, comments));
	}

	let blocks_len = blocks.iter().map(Block::len).sum::<u64>();
	let available = region.blocks_end - region.blocks_start;

	// The padding block (and its header) has to fill the rest of the region exactly
	if let Some(padding_len) = available
		.checked_sub(blocks_len + BLOCK_HEADER_LEN)
		.filter(|len| *len <= MAX_BLOCK_LEN)
	{
		log::debug!(
			"FLAC: Metadata fits in place, padding is now {} bytes",
			padding_len
		);

		blocks.push(Block::new(BLOCK_ID_PADDING, try_vec![0; padding_len as usize]));
		let metadata = encode_blocks(blocks)?;

		let mut file = OpenOptions::new().write(true).open(path)?;
		file.seek(SeekFrom::Start(region.blocks_start))?;
		file.write_all(&metadata)?;
		file.flush()?;

		return Ok(true);
	}

	if let Some(padding_len) = write_options.preferred_padding {
		let padding_len = u64::from(padding_len).min(MAX_BLOCK_LEN);
		blocks.push(Block::new(BLOCK_ID_PADDING, try_vec![0; padding_len as usize]));
	}

	let metadata = encode_blocks(blocks)?;
	log::debug!(
		"FLAC: Metadata grows from {} to {} bytes, rewriting the file",
		available,
		metadata.len()
	);

	rewrite_with(path, |original, new| {
		// Any leading ID3v2 tag and the marker are kept as-is
		copy_exact(original, new, region.blocks_start)?;
		new.write_all(&metadata)?;

		original.seek(SeekFrom::Start(region.blocks_end))?;
		std::io::copy(original, new)?;
		Ok(())
	})?;

	Ok(true)
}

fn read_region<R>(reader: &mut R) -> Result<MetadataRegion>
where
	R: Read + Seek,
{
	// We don't need the ID3v2 tag, but this seeks past it if it exists
	find_id3v2(reader, false)?;

	let stream_info = verify_flac(reader)?;

	let mut region = MetadataRegion {
		blocks_start: stream_info.start,
		blocks_end: stream_info.end,
		kept: Vec::new(),
		vendor: None,
		has_comments: false,
	};

	let mut is_last_block = stream_info.last;
	let mut seek_table = None;
	let mut others = Vec::new();

	while !is_last_block {
		let block = Block::read(reader, |ty| ty != BLOCK_ID_PADDING)?;
		is_last_block = block.last;
		region.blocks_end = block.end;

		match block.ty {
			BLOCK_ID_STREAMINFO => {
				decode_err!(@BAIL "FLAC: Stream has multiple STREAMINFO blocks");
			},
			BLOCK_ID_SEEKTABLE => {
				if seek_table.is_some() {
					decode_err!(@BAIL "FLAC: Stream has multiple SEEKTABLE blocks");
				}

				seek_table = Some(block);
			},
			BLOCK_ID_VORBIS_COMMENTS => {
				if region.vendor.is_none() {
					region.vendor = read_vendor(&block.content);
				}

				region.has_comments = true;
			},
			BLOCK_ID_APPLICATION | BLOCK_ID_CUESHEET | BLOCK_ID_PICTURE => others.push(block),
			BLOCK_ID_PADDING => {
				log::trace!("FLAC: Absorbing {} bytes of padding", block.end - block.start);
			},
			ty => log::warn!("FLAC: Dropping block of unknown type {}", ty),
		}
	}

	// STREAMINFO must come first, followed by the seek table
	region.kept.push(stream_info);
	region.kept.extend(seek_table);
	region.kept.extend(others);

	Ok(region)
}

fn read_vendor(content: &[u8]) -> Option<String> {
	let reader = &mut &content[..];

	let vendor_len = reader.read_u32::<LittleEndian>().ok()? as usize;
	let vendor = reader.get(..vendor_len)?;

	match String::from_utf8(vendor.to_vec()) {
		Ok(vendor) => Some(vendor),
		Err(_) => {
			log::warn!("FLAC: Vendor string is not valid UTF-8, not re-using");
			None
		},
	}
}

// Only the final block carries the last-block flag
fn encode_blocks(mut blocks: Vec<Block>) -> Result<Vec<u8>> {
	let len = blocks.iter().map(Block::len).sum::<u64>();

	for block in &mut blocks {
		block.last = false;
	}

	if let Some(block) = blocks.last_mut() {
		block.last = true;
	}

	let mut encoded = Vec::with_capacity(len as usize);
	for block in &blocks {
		block.write_to(&mut encoded)?;
		log::trace!(
			"Wrote a block (ty: {}, size: {})",
			block.ty,
			block.content.len()
		);
	}

	Ok(encoded)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ParseOptions;
	use crate::flac::FlacFile;
	use crate::flac::tests::{comment_block, flac_file};
	use crate::tag::Accessor;

	const AUDIO: &[u8] = b"\xFF\xF8audio frames follow";

	fn file_with(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("audio.flac");
		std::fs::write(&path, content).unwrap();
		(dir, path)
	}

	fn read_region_of(path: &Path) -> MetadataRegion {
		read_region(&mut File::open(path).unwrap()).unwrap()
	}

	// The size of the padding block, which is always written last
	fn padding_len(content: &[u8]) -> usize {
		let audio_start = content.len() - AUDIO.len();
		let mut pos = 4;
		loop {
			let header = &content[pos..pos + 4];
			let len = u32::from_be_bytes([0, header[1], header[2], header[3]]) as usize;
			if header[0] & 0x80 != 0 {
				assert_eq!(header[0] & 0x7F, BLOCK_ID_PADDING);
				assert_eq!(pos + 4 + len, audio_start);
				return len;
			}
			pos += 4 + len;
		}
	}

	fn title_tag(title: &str) -> VorbisComments {
		let mut tag = VorbisComments::new();
		tag.set_title(title.to_owned());
		tag
	}

	#[test_log::test]
	fn shrink_grows_padding() {
		let content = flac_file(
			&[
				comment_block(&["TITLE=A rather long title"]),
				(BLOCK_ID_PADDING, vec![0; 100]),
			],
			AUDIO,
		);
		let (_dir, path) = file_with(&content);

		title_tag("Short")
			.save_to_path(&path, WriteOptions::default())
			.unwrap();

		let written = std::fs::read(&path).unwrap();
		assert_eq!(written.len(), content.len());
		assert_eq!(padding_len(&written), 100 + "A rather long title".len() - "Short".len());
		assert!(written.ends_with(AUDIO));

		let flac = FlacFile::read_from_path(&path, ParseOptions::new()).unwrap();
		let tag = flac.vorbis_comments().unwrap();
		assert_eq!(tag.title().as_deref(), Some("Short"));
		// The file's vendor is kept
		assert_eq!(tag.vendor(), "vendor");
	}

	#[test_log::test]
	fn growth_within_padding() {
		let content = flac_file(
			&[comment_block(&["TITLE=Foo"]), (BLOCK_ID_PADDING, vec![0; 100])],
			AUDIO,
		);
		let (_dir, path) = file_with(&content);

		title_tag("Foo, but longer")
			.save_to_path(&path, WriteOptions::default())
			.unwrap();

		let written = std::fs::read(&path).unwrap();
		assert_eq!(written.len(), content.len());
		assert_eq!(padding_len(&written), 100 - ", but longer".len());
	}

	#[test_log::test]
	fn growth_past_padding_rewrites() {
		let content = flac_file(
			&[comment_block(&["TITLE=Foo"]), (BLOCK_ID_PADDING, vec![0; 4])],
			AUDIO,
		);
		let (dir, path) = file_with(&content);
		let old_region = read_region_of(&path);

		let long_title = "x".repeat(64);
		title_tag(&long_title)
			.save_to_path(&path, WriteOptions::default().preferred_padding(512))
			.unwrap();

		let written = std::fs::read(&path).unwrap();
		let new_region = read_region_of(&path);

		let old_metadata_len = old_region.blocks_end - old_region.blocks_start;
		let new_metadata_len = new_region.blocks_end - new_region.blocks_start;
		assert_eq!(
			written.len() as u64,
			content.len() as u64 + new_metadata_len - old_metadata_len
		);
		assert_eq!(padding_len(&written), 512);
		assert!(written.ends_with(AUDIO));

		// No backup is left behind
		assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
	}

	#[test_log::test]
	fn missing_padding_is_created() {
		let content = flac_file(&[comment_block(&["TITLE=Foo"])], AUDIO);
		let (_dir, path) = file_with(&content);

		title_tag("Bar")
			.save_to_path(&path, WriteOptions::default())
			.unwrap();

		let written = std::fs::read(&path).unwrap();
		assert_eq!(padding_len(&written), WriteOptions::DEFAULT_PREFERRED_PADDING as usize);
		assert!(written.ends_with(AUDIO));
	}

	#[test_log::test]
	fn blocks_kept_in_order() {
		let content = flac_file(
			&[
				(BLOCK_ID_PADDING, vec![0; 10]),
				(BLOCK_ID_APPLICATION, b"appldata".to_vec()),
				(BLOCK_ID_SEEKTABLE, vec![0; 18]),
				(0x7E, vec![1; 3]),
				comment_block(&["TITLE=Foo"]),
			],
			AUDIO,
		);
		let (_dir, path) = file_with(&content);

		title_tag("Foo")
			.save_to_path(&path, WriteOptions::default())
			.unwrap();

		let region = read_region_of(&path);
		let kept = region.kept.iter().map(|block| block.ty).collect::<Vec<_>>();
		assert_eq!(kept, [BLOCK_ID_STREAMINFO, BLOCK_ID_SEEKTABLE, BLOCK_ID_APPLICATION]);
		assert!(region.has_comments);
	}

	#[test_log::test]
	fn duplicate_stream_info() {
		let content = flac_file(&[(BLOCK_ID_STREAMINFO, vec![0; 34])], AUDIO);
		let (_dir, path) = file_with(&content);

		let err = title_tag("Foo")
			.save_to_path(&path, WriteOptions::default())
			.unwrap_err();
		assert!(err.is_format_error());
		assert_eq!(std::fs::read(&path).unwrap(), content);
	}

	#[test_log::test]
	fn leading_id3v2_survives_rewrite() {
		let mut content = b"ID3\x03\x00\x00\x00\x00\x00\x0A".to_vec();
		content.extend(*b"TIT2\x00\x00\x00\x00\x00\x00");
		content.extend(flac_file(&[comment_block(&["TITLE=Foo"])], AUDIO));
		let (_dir, path) = file_with(&content);

		title_tag(&"y".repeat(100))
			.save_to_path(&path, WriteOptions::default())
			.unwrap();

		let written = std::fs::read(&path).unwrap();
		assert_eq!(&written[..24], &content[..24]);
		assert!(written.ends_with(AUDIO));
	}

	#[test_log::test]
	fn remove_comments() {
		let content = flac_file(
			&[comment_block(&["TITLE=Foo"]), (BLOCK_ID_PADDING, vec![0; 10])],
			AUDIO,
		);
		let (_dir, path) = file_with(&content);
		let comment_len = comment_block(&["TITLE=Foo"]).1.len();

		assert!(VorbisComments::remove_from_path(&path).unwrap());

		let written = std::fs::read(&path).unwrap();
		assert_eq!(written.len(), content.len());
		assert_eq!(padding_len(&written), 10 + 4 + comment_len);
		assert!(FlacFile::read_from_path(&path, ParseOptions::new())
			.unwrap()
			.vorbis_comments()
			.is_none());

		// Nothing left to remove, the file is untouched
		assert!(!VorbisComments::remove_from_path(&path).unwrap());
		assert_eq!(std::fs::read(&path).unwrap(), written);
	}
}
