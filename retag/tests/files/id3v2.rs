use crate::util::{TestFile, audio, find, id3v23_frame, id3v2_tag};

use retag::TextEncoding;
use retag::config::{ParseOptions, WriteOptions};
use retag::id3::v2::{
	EncryptedMetaFrame, Frame, FrameId, Id3v2Tag, Id3v2Version, RecommendedBufferSizeFrame,
	TextInformationFrame,
};

use std::io::Cursor;
use retag::prelude::*;

fn read(file: &TestFile) -> Id3v2Tag {
	Id3v2Tag::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap()
}

#[test_log::test]
fn round_trip_common_fields() {
	let audio = audio(512);
	let file = TestFile::new("test.mp3", &audio);

	let mut tag = Id3v2Tag::new();
	tag.set_title(String::from("Foo title"));
	tag.set_artist(String::from("Bar artist"));
	tag.set_album(String::from("Baz album"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert!(content.ends_with(&audio));
	file.assert_no_leftovers();

	let tag = read(&file);
	assert_eq!(tag.original_version(), Id3v2Version::V4);
	assert_eq!(tag.title().as_deref(), Some("Foo title"));
	assert_eq!(tag.artist().as_deref(), Some("Bar artist"));
	assert_eq!(tag.album().as_deref(), Some("Baz album"));
	assert_eq!(tag.offset(), Some(0));
	assert_eq!(tag.on_disk_len(), (content.len() - audio.len()) as u64);
}

#[test_log::test]
fn unknown_frames_survive_edit() {
	let unknown = id3v23_frame(b"XYZW", &[1, 2, 3, 0xFF, 0xE0]);
	let tag = id3v2_tag(3, &[id3v23_frame(b"TIT2", b"\0Old"), unknown.clone()], 64);

	let mut content = tag;
	content.extend(audio(256));
	let file = TestFile::new("test.mp3", &content);

	let mut tag = read(&file);
	assert!(matches!(tag.get("XYZW"), Some(Frame::Binary(_))));

	tag.set_title(String::from("A much longer title than before"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert!(find(&content, &unknown).is_some());
	assert!(content.ends_with(&audio(256)));

	let tag = read(&file);
	assert_eq!(tag.version(), Id3v2Version::V3);
	assert_eq!(tag.title().as_deref(), Some("A much longer title than before"));
}

#[test_log::test]
fn save_as_v2_2() {
	let mut content = id3v2_tag(3, &[id3v23_frame(b"TIT2", b"\0Hello")], 0);
	content.extend(audio(64));
	let file = TestFile::new("test.mp3", &content);

	let mut tag = read(&file);
	tag.set_version(Id3v2Version::V2);
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert_eq!(&content[..5], b"ID3\x02\x00");
	assert!(find(&content, b"TT2\x00\x00\x06\x00Hello").is_some());
	assert!(find(&content, b"TIT2").is_none());

	let tag = read(&file);
	assert_eq!(tag.original_version(), Id3v2Version::V2);
	assert_eq!(tag.title().as_deref(), Some("Hello"));
}

#[test_log::test]
fn downgrade_drops_unmappable_frames() {
	let file = TestFile::new("test.mp3", &audio(64));

	let mut tag = Id3v2Tag::new();
	tag.set_title(String::from("Title"));
	tag.insert(
		TextInformationFrame::new(FrameId::new("TMOO").unwrap(), TextEncoding::UTF8, "Calm").into(),
	);
	tag.insert(
		TextInformationFrame::new(
			FrameId::new("TDRC").unwrap(),
			TextEncoding::UTF8,
			"2004-07-12",
		)
		.into(),
	);

	tag.set_version(Id3v2Version::V3);
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert!(find(&content, b"TMOO").is_none());
	assert!(find(&content, b"TYER").is_some());

	let tag = read(&file);
	assert!(tag.get("TMOO").is_none());
	assert_eq!(tag.title().as_deref(), Some("Title"));
	assert_eq!(tag.year().as_deref(), Some("2004"));
}

#[test_log::test]
fn shrinking_reuses_the_tag_region() {
	let file = TestFile::new("test.mp3", &audio(128));

	let mut tag = Id3v2Tag::new();
	tag.set_title(String::from("A fairly long title"));
	tag.save_to_path(file.path(), WriteOptions::default().preferred_padding(100))
		.unwrap();

	let len = file.read().len();

	tag.set_title(String::from("Short"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();
	assert_eq!(file.read().len(), len);

	// Still fits in the padding
	tag.set_title(String::from("A title that uses up some padding"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();
	assert_eq!(file.read().len(), len);

	// Past the padding, the file grows
	tag.set_title("Long".repeat(100));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert!(content.len() > len);
	assert!(content.ends_with(&audio(128)));
	assert_eq!(read(&file).title().as_deref(), Some("Long".repeat(100).as_str()));
	file.assert_no_leftovers();
}

#[test_log::test]
fn unwritable_frames() {
	let original = audio(64);
	let file = TestFile::new("test.mp3", &original);

	let mut tag = Id3v2Tag::new();
	tag.set_title(String::from("Title"));
	tag.insert(RecommendedBufferSizeFrame::new(4096, false, None).into());

	let err = tag
		.save_to_path(file.path(), WriteOptions::default())
		.unwrap_err();
	assert!(err.is_unsupported_operation());
	assert_eq!(file.read(), original);

	// An encrypted meta frame is only a problem in ID3v2.2, it has no ID in later versions
	let mut tag = Id3v2Tag::new();
	tag.set_title(String::from("Title"));
	tag.insert(EncryptedMetaFrame::new(String::from("owner"), String::new(), vec![1, 2]).into());
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();
	assert!(find(&file.read(), b"CRM").is_none());

	tag.set_version(Id3v2Version::V2);
	let err = tag
		.save_to_path(file.path(), WriteOptions::default())
		.unwrap_err();
	assert!(err.is_unsupported_operation());
}

#[test_log::test]
fn remove_untagged() {
	let original = audio(64);
	let file = TestFile::new("test.mp3", &original);

	assert!(!Id3v2Tag::remove_from_path(file.path()).unwrap());
	assert_eq!(file.read(), original);

	let mut tag = Id3v2Tag::new();
	tag.set_title(String::from("Title"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	assert!(Id3v2Tag::remove_from_path(file.path()).unwrap());
	assert_eq!(file.read(), original);
	file.assert_no_leftovers();
}

#[test_log::test]
fn partial_frames_are_skipped() {
	// The second frame claims more bytes than the tag holds
	let mut broken = id3v23_frame(b"TALB", b"\0Album");
	broken[7] = 0x7F;

	let mut content = id3v2_tag(3, &[id3v23_frame(b"TIT2", b"\0Title"), broken], 0);
	content.extend(audio(64));
	let file = TestFile::new("test.mp3", &content);

	let tag = read(&file);
	assert_eq!(tag.title().as_deref(), Some("Title"));
	assert!(tag.album().is_none());
	assert_eq!(tag.partial_frames().len(), 1);
	assert_eq!(tag.partial_frames()[0].id(), "TALB");
}

#[test_log::test]
fn encrypted_frame_cannot_be_upgraded() {
	// Encryption flag, followed by the method symbol
	let mut encrypted = b"TPE1\x00\x00\x00\x05\x00\x40".to_vec();
	encrypted.extend([0x81, 1, 2, 3, 4]);

	let mut content = id3v2_tag(3, &[id3v23_frame(b"TIT2", b"\0Title"), encrypted.clone()], 0);
	content.extend(audio(64));
	let file = TestFile::new("test.mp3", &content);

	let mut tag = read(&file);
	tag.set_title(String::from("New title"));
	tag.set_version(Id3v2Version::V4);

	let err = tag
		.save_to_path(file.path(), WriteOptions::default())
		.unwrap_err();
	assert!(err.is_unsupported_operation());
	assert!(!err.is_format_error());
	assert_eq!(file.read(), content);

	// The frame is kept as is in its own version
	tag.set_version(Id3v2Version::V3);
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();
	assert!(find(&file.read(), &encrypted).is_some());
	assert_eq!(read(&file).title().as_deref(), Some("New title"));
}

#[test_log::test]
fn declared_size_past_the_end() {
	let mut content = b"ID3\x03\x00\x00\x00\x00\x00\x64".to_vec();
	content.extend(b"TIT2\x00");

	let err = Id3v2Tag::read_from(&mut Cursor::new(content), ParseOptions::new())
		.unwrap_err();
	assert!(err.is_format_error());
}

#[test_log::test]
fn kept_binary_frames_decode() {
	// TT2 "Title", BUF (4096, embedded info), CRM
	let mut content = b"ID3\x02\x00\x00\x00\x00\x00\x29".to_vec();
	content.extend(b"TT2\x00\x00\x06\x00Title");
	content.extend(b"BUF\x00\x00\x04\x00\x10\x00\x01");
	content.extend(b"CRM\x00\x00\x0C");
	content.extend(b"owner\x00about\x00");
	content.extend(b"\x00"); // padding

	let tag = Id3v2Tag::read_from(&mut Cursor::new(content), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(tag.title().as_deref(), Some("Title"));

	let Some(Frame::Binary(buffer_size)) = tag.get("RBUF") else {
		panic!("Expected RBUF to be kept as binary");
	};
	let buffer_size =
		RecommendedBufferSizeFrame::parse(&mut &buffer_size.data[..], buffer_size.flags())
			.unwrap()
			.unwrap();
	assert_eq!(buffer_size.buffer_size, 4096);
	assert!(buffer_size.embedded_info);
	assert!(buffer_size.offset_to_next_tag.is_none());

	let Some(Frame::Binary(encrypted)) = tag.get("CRM") else {
		panic!("Expected CRM to be kept as binary");
	};
	let encrypted = EncryptedMetaFrame::parse(&mut &encrypted.data[..])
		.unwrap()
		.unwrap();
	assert_eq!(encrypted.owner_identifier, "owner");
	assert_eq!(encrypted.content_explanation, "about");
	assert!(encrypted.encrypted_data.is_empty());
}
