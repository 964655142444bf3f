use retag::config::{ParseOptions, WriteOptions};
use retag::id3::v2::util::synchsafe::{decode_syncsafe, encode_syncsafe, resynchronize};
use retag::id3::v2::{
	BinaryFrame, Frame, FrameId, Id3v2Tag, Id3v2TagFlags, Id3v2Version,
};
use retag::tag::Accessor;

use std::io::Cursor;

fn dump(tag: &Id3v2Tag) -> Vec<u8> {
	let mut bytes = Vec::new();
	tag.dump_to(&mut bytes, WriteOptions::default().preferred_padding(0))
		.unwrap();
	bytes
}

fn read(bytes: &[u8]) -> Id3v2Tag {
	Id3v2Tag::read_from(&mut Cursor::new(bytes), ParseOptions::new())
		.unwrap()
		.unwrap()
}

#[test_log::test]
fn header_size_is_syncsafe() {
	let mut tag = Id3v2Tag::new();
	tag.set_comment("a".repeat(300));

	let bytes = dump(&tag);
	let size = decode_syncsafe([bytes[6], bytes[7], bytes[8], bytes[9]]);
	assert_eq!(size as usize, bytes.len() - 10);
	assert!(bytes[6..10].iter().all(|byte| byte & 0x80 == 0));

	assert_eq!(encode_syncsafe(size).unwrap(), [bytes[6], bytes[7], bytes[8], bytes[9]]);
	assert!(encode_syncsafe(1 << 28).is_err());
}

#[test_log::test]
fn unsynchronised_tags() {
	let data = vec![0xFF, 0xE0, 0xFF, 0x00, 0xFF, 0xFB, 0xFF];

	for version in [Id3v2Version::V3, Id3v2Version::V4] {
		let mut tag = Id3v2Tag::new();
		tag.set_version(version);
		tag.set_flags(Id3v2TagFlags {
			unsynchronisation: true,
			..Id3v2TagFlags::default()
		});
		tag.insert(BinaryFrame::new(FrameId::new("XDAT").unwrap(), data.clone()).into());

		let bytes = dump(&tag);
		assert_eq!(bytes[5] & 0x80, 0x80);

		// No false syncs may remain in the tag body
		assert!(
			bytes[10..]
				.windows(2)
				.all(|pair| !(pair[0] == 0xFF && pair[1] >= 0xE0))
		);

		let tag = read(&bytes);
		match tag.get("XDAT") {
			Some(Frame::Binary(frame)) => assert_eq!(frame.data, data),
			other => panic!("Expected a binary frame, got {other:?}"),
		}
	}
}

#[test_log::test]
fn tag_body_resynchronizes() {
	let mut tag = Id3v2Tag::new();
	tag.set_version(Id3v2Version::V3);
	tag.set_flags(Id3v2TagFlags {
		unsynchronisation: true,
		..Id3v2TagFlags::default()
	});
	tag.insert(BinaryFrame::new(FrameId::new("XDAT").unwrap(), vec![0xFF, 0xF0, 0x01]).into());

	let unsynchronised = dump(&tag);

	tag.set_flags(Id3v2TagFlags::default());
	let plain = dump(&tag);

	assert_eq!(resynchronize(&unsynchronised[10..]), plain[10..]);
}

#[test_log::test]
fn v4_footer() {
	let mut tag = Id3v2Tag::new();
	tag.set_title(String::from("Title"));
	tag.set_flags(Id3v2TagFlags {
		footer: true,
		..Id3v2TagFlags::default()
	});

	let bytes = dump(&tag);
	let footer = &bytes[bytes.len() - 10..];
	assert_eq!(&footer[..3], b"3DI");
	assert_eq!(footer[3..], bytes[3..10]);

	let read = read(&bytes);
	assert!(read.flags().footer);
	assert_eq!(read.title().as_deref(), Some("Title"));
}
