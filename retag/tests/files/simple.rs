use crate::util::{
	TestFile, audio, find, flac_file, id3v1_tag, id3v2_tag, id3v23_frame, vorbis_comments,
};

use retag::config::{ParseOptions, ParsingMode, WriteOptions};
use retag::id3::v1::Id3v1Tag;
use retag::id3::v2::{Id3v2Tag, Id3v2Version};
use retag::prelude::*;
use retag::vorbis::VorbisComments;

fn mp3_with_both_tags() -> TestFile {
	let mut content = id3v2_tag(
		3,
		&[
			id3v23_frame(b"TIT2", b"\0ID3v2 title"),
			id3v23_frame(b"TPE1", b"\0ID3v2 artist"),
		],
		32,
	);
	content.extend(audio(256));
	content.extend(id3v1_tag("ID3v1 title", 7, 17));

	TestFile::new("test.mp3", &content)
}

#[test_log::test]
fn id3v1_fills_blanks() {
	let file = mp3_with_both_tags();
	let tag = SimpleTag::read_from_path(file.path(), ParseOptions::new()).unwrap();

	assert_eq!(tag.tag_version(), Some("ID3v2.3, ID3v1.1"));
	assert_eq!(tag.path(), file.path());

	assert_eq!(tag.title(), Some("ID3v2 title"));
	assert_eq!(tag.artist(), Some("ID3v2 artist"));
	assert_eq!(tag.year(), Some("1999"));
	assert_eq!(tag.genre(), Some("Rock"));
	assert_eq!(tag.track(), Some("7"));
	assert_eq!(tag.track_number(), 7);
	assert!(tag.album().is_none());
}

#[test_log::test]
fn save_both_id3_tags() {
	let file = mp3_with_both_tags();
	let mut tag = SimpleTag::read_from_path(file.path(), ParseOptions::new()).unwrap();

	assert_eq!(
		tag.set_title(Some(String::from("New title"))).as_deref(),
		Some("ID3v2 title")
	);
	assert!(tag.set_album(Some(String::from("New album"))).is_none());
	tag.set_track(Some(String::from("3/12")));
	tag.set_artist(None);
	tag.save(WriteOptions::default()).unwrap();

	assert!(find(&file.read(), &audio(256)).is_some());
	assert_eq!(tag.title(), Some("New title"));
	assert_eq!(tag.album(), Some("New album"));
	assert_eq!(tag.track(), Some("3/12"));
	assert_eq!(tag.track_number(), 3);
	assert!(tag.artist().is_none());
	assert_eq!(tag.tag_version(), Some("ID3v2.3, ID3v1.1"));

	let id3v2 = Id3v2Tag::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(id3v2.original_version(), Id3v2Version::V3);
	assert_eq!(id3v2.get_text("TRCK"), Some("3/12"));
	assert!(id3v2.artist().is_none());

	let id3v1 = Id3v1Tag::read_from_path(file.path(), ParsingMode::BestAttempt)
		.unwrap()
		.unwrap();
	assert_eq!(id3v1.title().as_deref(), Some("New title"));
	assert_eq!(id3v1.track().as_deref(), Some("3"));
	assert!(id3v1.artist().is_none());
}

#[test_log::test]
fn untagged_file() {
	let file = TestFile::new("test.mp3", &audio(128));
	let mut tag = SimpleTag::read_from_path(file.path(), ParseOptions::new()).unwrap();

	assert!(tag.tag_version().is_none());
	assert!(tag.title().is_none());
	assert_eq!(tag.track_number(), 0);

	// Empty values are the same as no value
	assert!(tag.set_title(Some(String::new())).is_none());
	assert!(tag.title().is_none());

	tag.set_title(Some(String::from("Title")));
	tag.set_year(Some(String::from("2004")));
	tag.save(WriteOptions::default()).unwrap();

	assert_eq!(tag.tag_version(), Some("ID3v2.4, ID3v1.0"));
	assert_eq!(tag.title(), Some("Title"));
	assert_eq!(tag.year(), Some("2004"));
}

#[test_log::test]
fn vorbis_comments_override() {
	let id3v2 = id3v2_tag(
		3,
		&[
			id3v23_frame(b"TIT2", b"\0ID3v2 title"),
			id3v23_frame(b"TALB", b"\0ID3v2 album"),
		],
		0,
	);

	let mut content = id3v2;
	content.extend(flac_file(
		&[(
			4,
			vorbis_comments("vendor", &["TITLE=Vorbis title", "TRACKNUMBER=5/9"]),
		)],
		&audio(256),
	));
	let file = TestFile::new("test.flac", &content);

	let mut tag = SimpleTag::read_from_path(file.path(), ParseOptions::new()).unwrap();
	assert_eq!(tag.tag_version(), Some("ID3v2.3, Vorbis Comment"));
	assert_eq!(tag.title(), Some("Vorbis title"));
	assert_eq!(tag.track_number(), 5);

	// The Vorbis comments replace every field, even the ones they don't have
	assert!(tag.album().is_none());

	tag.set_artist(Some(String::from("Vorbis artist")));
	tag.save(WriteOptions::default()).unwrap();

	let content = file.read();
	assert!(content.starts_with(b"fLaC"));
	assert!(content.ends_with(&audio(256)));
	assert_eq!(tag.tag_version(), Some("Vorbis Comment"));

	let comments = VorbisComments::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(comments.vendor(), "vendor");
	assert_eq!(comments.get("TITLE"), Some("Vorbis title"));
	assert_eq!(comments.get("ARTIST"), Some("Vorbis artist"));
	assert_eq!(comments.get("TRACKNUMBER"), Some("5/9"));
}
