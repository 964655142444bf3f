use crate::config::ParsingMode;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::{
	AttachedPictureFrame, BinaryFrame, CommentFrame, ExtendedTextFrame, ExtendedUrlFrame,
	PopularimeterFrame, PrivateFrame, SynchronizedTextFrame, TextInformationFrame,
	UniqueFileIdentifierFrame, UnsynchronizedTextFrame, UrlLinkFrame,
};
use crate::id3::v2::{Frame, FrameFlags, FrameId};
use crate::util::text::TextEncoding;

/// Dispatch a frame body to its parser
///
/// `id` is the canonical ID, while `version` is the version the body was written in. Frames
/// without a typed parser are kept as [`BinaryFrame`]s, byte for byte.
///
/// Returns `None` for an empty body.
#[rustfmt::skip]
pub(in crate::id3::v2) fn parse_content(
	content: &[u8],
	id: FrameId,
	flags: FrameFlags,
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<Option<Frame>> {
	log::trace!("Parsing frame content for ID: {}", id);

	let reader = &mut &*content;
	Ok(match id.as_str() {
		"APIC" => AttachedPictureFrame::parse(reader, flags, version)?.map(Frame::Picture),
		"TXXX" => ExtendedTextFrame::parse(reader, flags, version)?.map(Frame::UserText),
		"WXXX" => ExtendedUrlFrame::parse(reader, flags, version)?.map(Frame::UserUrl),
		"COMM" => CommentFrame::parse(reader, flags, version)?.map(Frame::Comment),
		"USLT" => UnsynchronizedTextFrame::parse(reader, flags, version)?.map(Frame::UnsynchronizedText),
		"SYLT" => SynchronizedTextFrame::parse(reader, flags, version)?.map(Frame::SynchronizedText),
		"UFID" => UniqueFileIdentifierFrame::parse(reader, flags, parse_mode)?.map(Frame::UniqueFileIdentifier),
		"PRIV" => PrivateFrame::parse(reader, flags)?.map(Frame::Private),
		"POPM" => PopularimeterFrame::parse(reader, flags)?.map(Frame::Popularimeter),
		i if i.starts_with('T') => TextInformationFrame::parse(reader, id, flags, version)?.map(Frame::Text),
		i if i.starts_with('W') => UrlLinkFrame::parse(reader, id, flags)?.map(Frame::Url),
		// RBUF, CRM, GEOB, and any unknown frames
		_ => BinaryFrame::parse(reader, id, flags)?.map(Frame::Binary),
	})
}

pub(in crate::id3::v2) fn verify_encoding(
	encoding: u8,
	version: Id3v2Version,
) -> Result<TextEncoding> {
	if version == Id3v2Version::V2 && (encoding != 0 && encoding != 1) {
		return Err(Id3v2Error::new(Id3v2ErrorKind::V2InvalidTextEncoding).into());
	}

	TextEncoding::from_u8(encoding)
		.ok_or_else(|| Id3v2Error::new(Id3v2ErrorKind::BadTextEncoding(encoding)).into())
}

/// The encoding a text field is written with in `version`
pub(in crate::id3::v2) fn encoding_for(encoding: TextEncoding, version: Id3v2Version) -> TextEncoding {
	match version {
		Id3v2Version::V4 => encoding,
		Id3v2Version::V2 | Id3v2Version::V3 => encoding.to_id3v23(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn v2_rejects_new_encodings() {
		assert!(verify_encoding(3, Id3v2Version::V2).is_err());
		assert_eq!(verify_encoding(3, Id3v2Version::V4).unwrap(), TextEncoding::UTF8);
		assert!(verify_encoding(4, Id3v2Version::V4).is_err());
	}

	#[test_log::test]
	fn unknown_frames_are_binary() {
		let id = FrameId::new("XYZW").unwrap();
		let frame = parse_content(
			b"\x01\x02\x03",
			id,
			FrameFlags::default(),
			Id3v2Version::V3,
			ParsingMode::Strict,
		)
		.unwrap()
		.unwrap();

		let Frame::Binary(binary) = frame else {
			panic!("Expected a binary frame");
		};
		assert_eq!(binary.data, [1, 2, 3]);
	}

	#[test_log::test]
	fn empty_body_yields_nothing() {
		let id = FrameId::new("TIT2").unwrap();
		let frame = parse_content(
			&[],
			id,
			FrameFlags::default(),
			Id3v2Version::V4,
			ParsingMode::BestAttempt,
		)
		.unwrap();
		assert!(frame.is_none());
	}
}
