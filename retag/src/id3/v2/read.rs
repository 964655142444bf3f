use super::frame::read::ParsedFrame;
use super::header::{Id3v2Header, Id3v2Version, skip_extended_header};
use super::tag::Id3v2Tag;
use super::util::synchsafe::resynchronize;
use crate::config::ParseOptions;
use crate::error::Result;

use std::borrow::Cow;

/// Parse the frames of a tag
///
/// `content` is the tag body, `header.size` bytes directly following the header.
pub(crate) fn parse_id3v2(
	content: &[u8],
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag> {
	log::debug!(
		"Parsing ID3v2 tag, size: {}, version: {}",
		header.size,
		header.version
	);

	// ID3v2.2 and ID3v2.3 unsynchronise the entire body, ID3v2.4 does it per frame
	let content = if header.flags.unsynchronisation && header.version != Id3v2Version::V4 {
		Cow::Owned(resynchronize(content))
	} else {
		Cow::Borrowed(content)
	};

	let mut tag = Id3v2Tag::default();
	tag.original_version = header.version;
	tag.version = header.version;

	let mut flags = header.flags;
	let mut frames = &*content;
	if header.flags.extended_header {
		let (rest, crc) = skip_extended_header(frames, header.version)?;
		frames = rest;
		flags.crc = crc;
	}
	tag.set_flags(flags);

	loop {
		match ParsedFrame::read(
			&mut frames,
			header.version,
			header.flags.unsynchronisation,
			parse_options,
		) {
			ParsedFrame::Next(frame) => tag.insert_read(frame),
			ParsedFrame::Partial(partial) => tag.partial_frames.push(partial),
			ParsedFrame::Skip => {},
			ParsedFrame::Eof => break,
		}
	}

	Ok(tag)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ParsingMode;
	use crate::tag::Accessor;

	fn tag_from(bytes: &[u8], parse_options: ParseOptions) -> Id3v2Tag {
		let header = Id3v2Header::parse(&mut &bytes[..10]).unwrap();
		parse_id3v2(&bytes[10..], header, parse_options).unwrap()
	}

	fn v3_text(id: &str, value: &[u8]) -> Vec<u8> {
		let mut frame = id.as_bytes().to_vec();
		frame.extend((value.len() as u32 + 1).to_be_bytes());
		frame.extend([0, 0, 0]);
		frame.extend(value);
		frame
	}

	fn v3_tag(frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
		let body_len = frames.iter().map(Vec::len).sum::<usize>() + padding;

		let mut tag = b"ID3\x03\x00\x00".to_vec();
		tag.extend(crate::id3::v2::util::synchsafe::encode_syncsafe(body_len as u32).unwrap());
		for frame in frames {
			tag.extend(frame);
		}
		tag.extend(std::iter::repeat_n(0, padding));
		tag
	}

	#[test_log::test]
	fn zero_size_tag() {
		let tag = tag_from(
			b"ID3\x04\x00\x00\x00\x00\x00\x00",
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		);
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn bad_frame_otherwise_valid() {
		let tag = tag_from(
			&v3_tag(
				&[
					v3_text("TIT2", b"Foo title"),
					v3_text("T+T2", b"Bad"),
					v3_text("TPE1", b"Bar artist"),
				],
				16,
			),
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		);

		assert_eq!(tag.len(), 2);
		assert_eq!(tag.title().as_deref(), Some("Foo title"));
		assert_eq!(tag.artist().as_deref(), Some("Bar artist"));

		let [partial] = tag.partial_frames() else {
			panic!("Expected a single partial frame");
		};
		assert_eq!(partial.id(), "T+T2");
	}

	#[test_log::test]
	fn duplicates_keep_non_empty() {
		let tag = tag_from(
			&v3_tag(
				&[
					v3_text("TIT2", b""),
					v3_text("TIT2", b"Title"),
					v3_text("TIT2", b"Ignored"),
				],
				0,
			),
			ParseOptions::new(),
		);

		assert_eq!(tag.len(), 1);
		assert_eq!(tag.title().as_deref(), Some("Title"));
	}

	#[test_log::test]
	fn tag_level_unsynchronisation() {
		// TIT2 = "\u{FF}\u{E0}", the body holds a false sync
		let mut tag = b"ID3\x03\x00\x80\x00\x00\x00\x0F".to_vec();
		tag.extend(b"TIT2\x00\x00\x00\x03\x00\x00\x00\xFF\x00\xE0");
		tag.push(0);

		let tag = tag_from(&tag, ParseOptions::new());
		assert_eq!(tag.title().as_deref(), Some("\u{FF}\u{E0}"));
		assert!(tag.flags().unsynchronisation);
	}

	#[test_log::test]
	fn implicit_conversions() {
		let bytes = v3_tag(&[v3_text("TYER", b"1984")], 0);

		let converted = tag_from(&bytes, ParseOptions::new());
		assert_eq!(converted.iter().next().unwrap().id_str(), "TDRC");

		let kept = tag_from(&bytes, ParseOptions::new().implicit_conversions(false));
		assert_eq!(kept.iter().next().unwrap().id_str(), "TYER");

		// Either way, the year is found
		assert_eq!(converted.year().as_deref(), Some("1984"));
		assert_eq!(kept.year().as_deref(), Some("1984"));
	}
}
