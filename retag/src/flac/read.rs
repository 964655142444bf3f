use super::FlacFile;
use super::block::{
	BLOCK_ID_PICTURE, BLOCK_ID_SEEKTABLE, BLOCK_ID_STREAMINFO, BLOCK_ID_VORBIS_COMMENTS, Block,
};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::id3::v2::Id3v2Tag;
use crate::macros::{decode_err, parse_mode_choice};
use crate::picture::Picture;
use crate::vorbis::read::read_comments;

use std::io::{Read, Seek};

// STREAMINFO has a fixed size
const STREAMINFO_LEN: u64 = 34;

/// Check for the stream marker and the mandatory `STREAMINFO` block
pub(super) fn verify_flac<R>(data: &mut R) -> Result<Block>
where
	R: Read + Seek,
{
	let mut marker = [0; 4];
	data.read_exact(&mut marker)?;

	if &marker != b"fLaC" {
		decode_err!(@BAIL "FLAC: File missing \"fLaC\" stream marker");
	}

	let block = Block::read(data, |_| true)?;

	if block.ty != BLOCK_ID_STREAMINFO {
		decode_err!(@BAIL "FLAC: File missing mandatory STREAMINFO block");
	}

	if (block.content.len() as u64) < STREAMINFO_LEN {
		decode_err!(@BAIL "FLAC: File has an invalid STREAMINFO block size (< 34)");
	}

	log::debug!("File verified to be FLAC");
	Ok(block)
}

pub(super) fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<FlacFile>
where
	R: Read + Seek,
{
	let parse_mode = parse_options.parsing_mode;

	let mut flac_file = FlacFile {
		id3v2_tag: None,
		vorbis_comments: None,
		pictures: Vec::new(),
	};

	// It is possible for a FLAC file to contain an ID3v2 tag, this leaves us at its end
	if let Some(id3v2) = Id3v2Tag::read_from(data, parse_options)? {
		log::warn!("Encountered an ID3v2 tag in a FLAC file");
		flac_file.id3v2_tag = Some(id3v2);
	}

	let stream_info = verify_flac(data)?;

	let mut last_block = stream_info.last;
	let mut seen_seektable = false;

	while !last_block {
		let block = Block::read(data, |block_type| {
			block_type == BLOCK_ID_VORBIS_COMMENTS
				|| (block_type == BLOCK_ID_PICTURE && parse_options.read_cover_art)
		})?;

		last_block = block.last;

		match block.ty {
			BLOCK_ID_STREAMINFO => {
				parse_mode_choice!(
					parse_mode,
					STRICT: decode_err!(@BAIL "FLAC: Stream has multiple STREAMINFO blocks"),
					DEFAULT: log::warn!("FLAC: Stream has multiple STREAMINFO blocks")
				);
			},
			BLOCK_ID_SEEKTABLE => {
				if seen_seektable {
					parse_mode_choice!(
						parse_mode,
						STRICT: decode_err!(@BAIL "FLAC: Stream has multiple SEEKTABLE blocks"),
						DEFAULT: log::warn!("FLAC: Stream has multiple SEEKTABLE blocks")
					);
				}

				seen_seektable = true;
			},
			BLOCK_ID_VORBIS_COMMENTS => {
				log::debug!("Encountered a Vorbis Comments block, parsing");

				// There may only be one Vorbis comment block, though that isn't always the case.
				// The last one wins, writing replaces all of them.
				if flac_file.vorbis_comments.is_some() && parse_mode == ParsingMode::Strict {
					decode_err!(@BAIL "FLAC: Streams are only allowed one Vorbis Comments block per stream");
				}

				let vorbis_comments = read_comments(
					&mut &*block.content,
					block.content.len() as u64,
					parse_options,
				)?;

				flac_file.vorbis_comments = Some(vorbis_comments);
			},
			BLOCK_ID_PICTURE if parse_options.read_cover_art => {
				log::debug!("Encountered a FLAC picture block, parsing");

				match Picture::from_flac_bytes(&block.content, false, parse_mode) {
					Ok(picture) => flac_file.pictures.push(picture),
					Err(e) => {
						if parse_mode == ParsingMode::Strict {
							return Err(e);
						}

						log::warn!("Unable to read FLAC picture block, discarding");
					},
				}
			},
			_ => {},
		}
	}

	Ok(flac_file)
}
