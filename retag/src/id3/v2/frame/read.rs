use super::Frame;
use super::content::parse_content;
use super::header::{FrameFlags, FrameId};
use crate::config::ParseOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, RetagError, Result};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::BinaryFrame;
use crate::id3::v2::util::registry::{upgrade_v2, upgrade_v3};
use crate::id3::v2::util::synchsafe::{decode_syncsafe, resynchronize};

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// A frame that was found in a tag, but could not be read
///
/// The frame is skipped, and the rest of the tag is read as usual.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialFrame {
	pub(crate) id: String,
	pub(crate) reason: String,
}

impl PartialFrame {
	fn new(id: impl Into<String>, reason: &RetagError) -> Self {
		Self {
			id: id.into(),
			reason: reason.to_string(),
		}
	}

	/// The frame ID, as found in the file
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Why the frame could not be read
	pub fn reason(&self) -> &str {
		&self.reason
	}
}

impl Display for PartialFrame {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.id, self.reason)
	}
}

pub(crate) enum ParsedFrame {
	Next(Frame),
	Partial(PartialFrame),
	Skip,
	Eof,
}

struct RawFrameHeader {
	id: String,
	size: usize,
	flags: FrameFlags,
}

impl ParsedFrame {
	/// Read the next frame from the remaining tag body
	///
	/// `content` is advanced past the frame, even if the frame body turns out to be unreadable.
	/// A declared size that runs past the end of the tag consumes the rest of it.
	pub(crate) fn read(
		content: &mut &[u8],
		version: Id3v2Version,
		tag_unsynchronised: bool,
		parse_options: ParseOptions,
	) -> Self {
		let header_len = version.frame_header_len();
		if content.len() < header_len || content[0] == 0 {
			// Assume we just started reading padding
			log::trace!("Reached the end of the frames, {} bytes remaining", content.len());
			*content = &[];
			return Self::Eof;
		}

		let (header_bytes, rest) = content.split_at(header_len);
		let RawFrameHeader { id, size, mut flags } = parse_raw_header(header_bytes, version);

		if size > rest.len() {
			*content = &[];
			let err = Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into();
			return Self::partial(id, &err);
		}

		let (body, rest) = rest.split_at(size);
		*content = rest;

		let id = match canonical_id(&id, version, header_bytes, parse_options) {
			Ok(id) => id,
			Err(err) => return Self::partial(id, &err),
		};

		if !parse_options.read_cover_art && id.as_str() == "APIC" {
			log::trace!("Skipping attached picture");
			return Self::Skip;
		}

		// ID3v2.4 applies the tag-level scheme to every frame
		if version == Id3v2Version::V4 && tag_unsynchronised {
			flags.unsynchronisation = true;
		}

		let body = match decode_body(body, version, &mut flags) {
			Ok(body) => body,
			Err(err) => return Self::partial(id.as_str(), &err),
		};

		if flags.encryption.is_some() {
			// Nothing further we can do with encrypted frames
			log::trace!("Keeping encrypted frame {} as binary", id);
			return match BinaryFrame::parse(&mut &*body, id, flags) {
				Ok(Some(frame)) => Self::Next(Frame::Binary(frame)),
				_ => Self::Skip,
			};
		}

		match parse_content(&body, id.clone(), flags, version, parse_options.parsing_mode) {
			Ok(Some(frame)) => Self::Next(frame),
			Ok(None) => {
				log::debug!("Encountered an empty {} frame, skipping", id);
				Self::Skip
			},
			Err(err) => Self::partial(id.as_str(), &err),
		}
	}

	fn partial(id: impl Into<String>, err: &RetagError) -> Self {
		let partial = PartialFrame::new(id, err);
		log::warn!("Failed to read frame, skipping: {}", partial);
		Self::Partial(partial)
	}
}

fn parse_raw_header(header: &[u8], version: Id3v2Version) -> RawFrameHeader {
	match version {
		Id3v2Version::V2 => RawFrameHeader {
			id: String::from_utf8_lossy(&header[..3]).into_owned(),
			size: u32::from_be_bytes([0, header[3], header[4], header[5]]) as usize,
			flags: FrameFlags::default(),
		},
		Id3v2Version::V3 | Id3v2Version::V4 => {
			let size_bytes = [header[4], header[5], header[6], header[7]];
			let flag_bits = u16::from_be_bytes([header[8], header[9]]);

			let (size, flags) = if version == Id3v2Version::V4 {
				(decode_syncsafe(size_bytes), FrameFlags::parse_id3v24(flag_bits))
			} else {
				(u32::from_be_bytes(size_bytes), FrameFlags::parse_id3v23(flag_bits))
			};

			// Some writers put ID3v2.2 IDs in an ID3v2.3 tag
			let id_len = if header[3] == 0 { 3 } else { 4 };
			RawFrameHeader {
				id: String::from_utf8_lossy(&header[..id_len]).into_owned(),
				size: size as usize,
				flags,
			}
		},
	}
}

// Frames are stored under the newest ID for their role
fn canonical_id(
	id: &str,
	version: Id3v2Version,
	header: &[u8],
	parse_options: ParseOptions,
) -> Result<FrameId> {
	let upgraded = if id.len() == 3 {
		if version != Id3v2Version::V2 {
			log::warn!("Found an ID3v2.2 frame ID in an {} tag, attempting to upgrade", version);
		}

		upgrade_v2(id)
	} else if version == Id3v2Version::V3 && parse_options.implicit_conversions {
		upgrade_v3(id)
	} else {
		None
	};

	match upgraded {
		Some(canonical) => Ok(FrameId::from_static(canonical)),
		None => FrameId::new_cow(Cow::Owned(id.to_owned())).map_err(|_| {
			let len = if version == Id3v2Version::V2 { 3 } else { 4 };
			Id3v2Error::new(Id3v2ErrorKind::BadFrameId(header[..len].to_vec())).into()
		}),
	}
}

// Strip the extra header data, and undo unsynchronisation and compression
//
// The flags are applied in the order: compression -> encryption -> unsynchronisation
fn decode_body<'a>(
	body: &'a [u8],
	version: Id3v2Version,
	flags: &mut FrameFlags,
) -> Result<Cow<'a, [u8]>> {
	let mut body = if flags.unsynchronisation {
		Cow::Owned(resynchronize(body))
	} else {
		Cow::Borrowed(body)
	};

	let mut extra: &[u8] = &body;
	match version {
		Id3v2Version::V2 => {},
		Id3v2Version::V3 => {
			if flags.compression {
				flags.data_length_indicator = Some(u32::from_be_bytes(take(&mut extra)?));
			}
			if let Some(method) = flags.encryption.as_mut() {
				*method = take::<1>(&mut extra)?[0];
			}
			if let Some(group) = flags.grouping_identity.as_mut() {
				*group = take::<1>(&mut extra)?[0];
			}
		},
		Id3v2Version::V4 => {
			if let Some(group) = flags.grouping_identity.as_mut() {
				*group = take::<1>(&mut extra)?[0];
			}
			if let Some(method) = flags.encryption.as_mut() {
				*method = take::<1>(&mut extra)?[0];
			}
			if let Some(len) = flags.data_length_indicator.as_mut() {
				*len = decode_syncsafe(take(&mut extra)?);
			} else if flags.compression || flags.encryption.is_some() {
				return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
			}
		},
	}

	let extra_len = body.len() - extra.len();
	body = match body {
		Cow::Borrowed(borrowed) => Cow::Borrowed(&borrowed[extra_len..]),
		Cow::Owned(mut owned) => {
			owned.drain(..extra_len);
			Cow::Owned(owned)
		},
	};

	flags.unsynchronisation = false;

	if flags.compression && flags.encryption.is_none() {
		body = Cow::Owned(decompress(&body, flags.data_length_indicator)?);
		flags.compression = false;
	}

	Ok(body)
}

fn take<const N: usize>(content: &mut &[u8]) -> Result<[u8; N]> {
	let Some((bytes, rest)) = content.split_first_chunk::<N>() else {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
	};

	*content = rest;
	Ok(*bytes)
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(body: &[u8], expected_len: Option<u32>) -> Result<Vec<u8>> {
	use std::io::Read;

	let mut decompressed = Vec::with_capacity(expected_len.unwrap_or_default() as usize);
	flate2::read::ZlibDecoder::new(body)
		.read_to_end(&mut decompressed)
		.map_err(|err| Id3v2Error::new(Id3v2ErrorKind::Decompression(err)))?;

	if let Some(expected) = expected_len {
		if decompressed.len() != expected as usize {
			log::warn!(
				"Decompressed frame is {} bytes, expected {}",
				decompressed.len(),
				expected
			);
		}
	}

	Ok(decompressed)
}

#[cfg(not(feature = "id3v2_compression_support"))]
fn decompress(_: &[u8], _: Option<u32>) -> Result<Vec<u8>> {
	Err(Id3v2Error::new(Id3v2ErrorKind::CompressedFrameEncountered).into())
}
