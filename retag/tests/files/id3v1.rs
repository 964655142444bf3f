use crate::util::{TestFile, audio, id3v1_tag};

use retag::config::{ParsingMode, WriteOptions};
use retag::id3::v1::{Id3v1Tag, Id3v1Version};
use retag::prelude::*;

#[test_log::test]
fn read_v1_1() {
	let mut content = audio(64);
	content.extend(id3v1_tag("Title", 7, 17));
	let file = TestFile::new("test.mp3", &content);

	let tag = Id3v1Tag::read_from_path(file.path(), ParsingMode::BestAttempt)
		.unwrap()
		.unwrap();
	assert_eq!(tag.version(), Id3v1Version::V1_1);
	assert_eq!(tag.version().to_string(), "ID3v1.1");
	assert_eq!(tag.title().as_deref(), Some("Title"));
	assert_eq!(tag.track().as_deref(), Some("7"));
	assert_eq!(tag.genre().as_deref(), Some("Rock"));
	assert_eq!(tag.year().as_deref(), Some("1999"));
}

#[test_log::test]
fn overwrite_and_remove() {
	let original = audio(64);
	let file = TestFile::new("test.mp3", &original);

	assert!(!Id3v1Tag::remove_from_path(file.path()).unwrap());
	assert_eq!(file.read(), original);

	let mut tag = Id3v1Tag::default();
	tag.set_title(String::from("First"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();
	assert_eq!(file.read().len(), original.len() + 128);

	tag.set_title(String::from("Second"));
	tag.set_genre(String::from("Jazz"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();
	assert_eq!(file.read().len(), original.len() + 128);

	let read = Id3v1Tag::read_from_path(file.path(), ParsingMode::BestAttempt)
		.unwrap()
		.unwrap();
	assert_eq!(read.title().as_deref(), Some("Second"));
	assert_eq!(read.genre().as_deref(), Some("Jazz"));

	assert!(Id3v1Tag::remove_from_path(file.path()).unwrap());
	assert_eq!(file.read(), original);
}
