use crate::util::{TestFile, audio, flac_file, id3v2_tag, id3v23_frame, vorbis_comments};

use retag::config::{ParseOptions, WriteOptions};
use retag::flac::FlacFile;
use retag::prelude::*;
use retag::vorbis::VorbisComments;

const PADDING: u8 = 1;
const COMMENTS: u8 = 4;

/// The type and body size of every block, and the offset the audio starts at
fn blocks(content: &[u8]) -> (Vec<(u8, usize)>, usize) {
	let mut pos = marker_offset(content) + 4;
	let mut blocks = Vec::new();

	loop {
		let header = &content[pos..pos + 4];
		let size = u32::from_be_bytes([0, header[1], header[2], header[3]]) as usize;
		blocks.push((header[0] & 0x7F, size));

		pos += 4 + size;
		if header[0] & 0x80 != 0 {
			return (blocks, pos);
		}
	}
}

fn marker_offset(content: &[u8]) -> usize {
	crate::util::find(content, b"fLaC").unwrap()
}

fn padding_len(content: &[u8]) -> usize {
	let (blocks, _) = blocks(content);
	blocks
		.iter()
		.find(|(ty, _)| *ty == PADDING)
		.map(|(_, size)| *size)
		.unwrap()
}

fn read(file: &TestFile) -> VorbisComments {
	VorbisComments::read_from_path(file.path(), ParseOptions::new())
		.unwrap()
		.unwrap()
}

fn tagged_file(padding: usize) -> (TestFile, Vec<u8>) {
	let audio = audio(1024);
	let content = flac_file(
		&[
			(
				COMMENTS,
				vorbis_comments("Some encoder", &["TITLE=A fairly long title", "ARTIST=Foo"]),
			),
			(PADDING, vec![0; padding]),
		],
		&audio,
	);

	(TestFile::new("test.flac", &content), audio)
}

#[test_log::test]
fn shrinking_grows_padding() {
	let (file, audio) = tagged_file(100);
	let original_len = file.read().len();

	let mut tag = read(&file);
	assert_eq!(tag.vendor(), "Some encoder");

	let k = "A fairly long title".len() - "Short".len();
	tag.set_title(String::from("Short"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert_eq!(content.len(), original_len);
	assert_eq!(padding_len(&content), 100 + k);
	assert!(content.ends_with(&audio));

	let tag = read(&file);
	assert_eq!(tag.title().as_deref(), Some("Short"));
	assert_eq!(tag.artist().as_deref(), Some("Foo"));
	assert_eq!(tag.vendor(), "Some encoder");
}

#[test_log::test]
fn growing_within_padding() {
	let (file, audio) = tagged_file(100);
	let original_len = file.read().len();

	let mut tag = read(&file);
	tag.set_album(String::from("Bar album"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert_eq!(content.len(), original_len);
	assert_eq!(padding_len(&content), 100 - "ALBUM=Bar album".len() - 4);
	assert!(content.ends_with(&audio));
}

#[test_log::test]
fn growing_past_padding() {
	let (file, audio) = tagged_file(10);
	let original = file.read();
	let (_, original_audio_start) = blocks(&original);

	let mut tag = read(&file);
	tag.set_comment("Comment ".repeat(64));
	tag.save_to_path(file.path(), WriteOptions::default().preferred_padding(0))
		.unwrap();

	let content = file.read();
	let (new_blocks, audio_start) = blocks(&content);

	// Without preferred padding, the block is dropped entirely
	assert!(new_blocks.iter().all(|(ty, _)| *ty != PADDING));
	assert_eq!(
		content.len() - original.len(),
		audio_start - original_audio_start
	);
	assert_eq!(&content[audio_start..], audio.as_slice());
	file.assert_no_leftovers();

	let tag = read(&file);
	assert_eq!(tag.comment().as_deref(), Some("Comment ".repeat(64).as_str()));
}

#[test_log::test]
fn fresh_padding_on_rewrite() {
	let audio = audio(256);
	let file = TestFile::new("test.flac", &flac_file(&[], &audio));

	let mut tag = VorbisComments::new();
	tag.set_title(String::from("Title"));
	tag.save_to_path(file.path(), WriteOptions::default().preferred_padding(500))
		.unwrap();

	let content = file.read();
	assert_eq!(padding_len(&content), 500);
	assert!(content.ends_with(&audio));

	let tag = read(&file);
	assert_eq!(tag.vendor(), retag::vorbis::DEFAULT_VENDOR);
	assert_eq!(tag.title().as_deref(), Some("Title"));
}

#[test_log::test]
fn leading_id3v2_kept_by_comment_writes() {
	let id3v2 = id3v2_tag(3, &[id3v23_frame(b"TIT2", b"\0ID3 title")], 0);
	let audio = audio(256);

	let mut content = id3v2.clone();
	content.extend(flac_file(&[], &audio));
	let file = TestFile::new("test.flac", &content);

	let mut tag = VorbisComments::new();
	tag.set_title(String::from("Vorbis title"));
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let content = file.read();
	assert!(content.starts_with(&id3v2));
	assert!(content.ends_with(&audio));

	let flac = FlacFile::read_from_path(file.path(), ParseOptions::new()).unwrap();
	assert_eq!(flac.id3v2().unwrap().title().as_deref(), Some("ID3 title"));
	assert_eq!(
		flac.vorbis_comments().unwrap().title().as_deref(),
		Some("Vorbis title")
	);
}

#[test_log::test]
fn remove_comments() {
	let audio = audio(256);
	let untagged = flac_file(&[(PADDING, vec![0; 20])], &audio);
	let file = TestFile::new("test.flac", &untagged);

	assert!(!VorbisComments::remove_from_path(file.path()).unwrap());
	assert_eq!(file.read(), untagged);

	let (file, audio) = tagged_file(100);
	let original_len = file.read().len();

	assert!(VorbisComments::remove_from_path(file.path()).unwrap());

	let content = file.read();
	assert_eq!(content.len(), original_len);
	assert!(content.ends_with(&audio));
	assert!(
		FlacFile::read_from_path(file.path(), ParseOptions::new())
			.unwrap()
			.vorbis_comments()
			.is_none()
	);
}

#[test_log::test]
fn year_saved_as_date() {
	let (file, _) = tagged_file(100);

	let mut tag = read(&file);
	tag.push(String::from("YEAR"), String::from("1999"));
	tag.insert(String::from("EMPTY"), String::new());
	tag.save_to_path(file.path(), WriteOptions::default()).unwrap();

	let tag = read(&file);
	assert_eq!(tag.get("DATE"), Some("1999"));
	assert!(tag.get("YEAR").is_none());
	assert!(tag.get("EMPTY").is_none());
	assert_eq!(tag.year().as_deref(), Some("1999"));
}
