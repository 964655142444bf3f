//! ID3 specific items
//!
//! ID3 does things differently than other tags, making working with them a little more effort than other formats.
//! Check the other modules for important notes and/or warnings.

pub mod v1;
pub mod v2;

use crate::error::Result;
use crate::macros::{err, try_vec};
use v1::constants::ID3V1_TAG_MARKER;
use v2::header::Id3v2Header;

use std::io::{Read, Seek, SeekFrom};

/// An ID3v2 tag found at the current stream position
pub(crate) struct Id3v2Find {
	pub(crate) header: Id3v2Header,
	/// The tag body, only present when it was requested
	pub(crate) content: Option<Vec<u8>>,
}

/// Look for an ID3v2 tag at the current position of `data`
///
/// When no tag is found, the stream position is left untouched. Otherwise the stream is
/// positioned directly after the tag (and its footer, if any).
///
/// Data that starts with `"ID3"` but has a malformed header is an error rather than "no tag".
pub(crate) fn find_id3v2<R>(data: &mut R, read: bool) -> Result<Option<Id3v2Find>>
where
	R: Read + Seek,
{
	let start = data.stream_position()?;
	log::debug!("Searching for an ID3v2 tag at offset: {}", start);

	let mut identifier = [0; 10];
	if data.read_exact(&mut identifier).is_err() || &identifier[..3] != b"ID3" {
		data.seek(SeekFrom::Start(start))?;
		return Ok(None);
	}

	let header = Id3v2Header::parse(&mut &identifier[..])?;
	log::debug!("Found an ID3v2 tag, parsing");

	let body_start = data.stream_position()?;
	let stream_len = data.seek(SeekFrom::End(0))?;
	data.seek(SeekFrom::Start(body_start))?;

	if u64::from(header.size) > stream_len - body_start {
		log::debug!(
			"ID3v2 tag claims {} bytes, only {} remain",
			header.size,
			stream_len - body_start
		);
		err!(SizeMismatch);
	}

	let mut content = None;
	if read {
		let mut tag = try_vec![0; header.size as usize];
		data.read_exact(&mut tag)?;

		content = Some(tag)
	} else {
		data.seek(SeekFrom::Current(i64::from(header.size)))?;
	}

	if header.flags.footer {
		data.seek(SeekFrom::Current(10))?;
	}

	Ok(Some(Id3v2Find { header, content }))
}

/// Look for an ID3v1 tag in the last 128 bytes of `data`
///
/// Returns the tag bytes if one is present. The stream position is undefined afterwards.
pub(crate) fn find_id3v1<R>(data: &mut R) -> Result<Option<[u8; 128]>>
where
	R: Read + Seek,
{
	log::debug!("Searching for an ID3v1 tag");

	// Reader is too small to contain an ID3v1 tag
	if data.seek(SeekFrom::End(-128)).is_err() {
		return Ok(None);
	}

	let mut id3v1 = [0; 128];
	data.read_exact(&mut id3v1)?;

	// No ID3v1 tag found
	if id3v1[..3] != ID3V1_TAG_MARKER {
		return Ok(None);
	}

	log::debug!("Found an ID3v1 tag");
	Ok(Some(id3v1))
}
