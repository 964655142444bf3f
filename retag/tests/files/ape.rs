use crate::util::{TestFile, ape_footer_only, ape_item, audio, id3v1_tag};

use retag::ape::ApeTag;
use retag::config::{ParseOptions, WriteOptions};
use retag::prelude::*;

use std::fs::File;

#[test_log::test]
fn headerless_empty_tag() {
	let mut content = audio(64);
	content.extend(ape_footer_only(&[]));
	let file = TestFile::new("test.ape", &content);

	assert!(ApeTag::exists(&mut File::open(file.path()).unwrap()).unwrap());

	let tag = ApeTag::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert!(tag.is_empty());
	assert_eq!(tag.version(), 2000);
	assert_eq!(tag.offset(), Some(64));
	assert_eq!(tag.size_on_disk(), 32);
}

#[test_log::test]
fn duplicate_keys() {
	let mut content = audio(64);
	content.extend(ape_footer_only(&[
		ape_item("Title", b""),
		ape_item("TITLE", b"Second"),
		ape_item("title", b"Third"),
		ape_item("Artist", b"First"),
		ape_item("ARTIST", b"Second"),
	]));
	let file = TestFile::new("test.ape", &content);

	let tag = ApeTag::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();

	// An empty first value is replaced by the next one, otherwise the first one wins
	assert_eq!(tag.title().as_deref(), Some("Second"));
	assert_eq!(tag.artist().as_deref(), Some("First"));
	assert_eq!(tag.len(), 2);
}

#[test_log::test]
fn saved_before_id3v1() {
	let id3v1 = id3v1_tag("ID3v1 title", 3, 17);
	let mut content = audio(64);
	content.extend(&id3v1);
	let file = TestFile::new("test.ape", &content);

	let mut tag = ApeTag::new();
	tag.set_title(String::from("APE title"));
	tag.set_track(String::from("4/10"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert!(content.starts_with(&audio(64)));
	assert!(content.ends_with(&id3v1));

	let tag = ApeTag::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(tag.title().as_deref(), Some("APE title"));
	assert_eq!(tag.track().as_deref(), Some("4/10"));
	assert_eq!(tag.offset(), Some(64));

	// Replacing the tag with a smaller one leaves no trace of the old one
	let mut smaller = ApeTag::new();
	smaller.set_title(String::from("T"));
	smaller.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let tag = ApeTag::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(tag.len(), 1);
	assert!(file.read().ends_with(&id3v1));

	assert!(ApeTag::remove_from_path(file.path()).unwrap());
	let mut expected = audio(64);
	expected.extend(&id3v1);
	assert_eq!(file.read(), expected);
}

#[test_log::test]
fn remove_untagged() {
	let original = audio(64);
	let file = TestFile::new("test.ape", &original);

	assert!(!ApeTag::remove_from_path(file.path()).unwrap());
	assert_eq!(file.read(), original);
}
