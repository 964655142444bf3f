use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A file in its own temporary directory
///
/// Rewrites rename the original aside, so the directory is checked for leftovers as well.
pub struct TestFile {
	dir: TempDir,
	path: PathBuf,
}

impl TestFile {
	/// Create a file named `name` holding `content`
	pub fn new(name: &str, content: &[u8]) -> Self {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(name);
		fs::write(&path, content).unwrap();

		Self { dir, path }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn read(&self) -> Vec<u8> {
		fs::read(&self.path).unwrap()
	}

	/// Verify that no temporary file was left next to the file
	pub fn assert_no_leftovers(&self) {
		let entries = fs::read_dir(self.dir.path()).unwrap().count();
		assert_eq!(entries, 1, "Found leftover files next to {:?}", self.path);
	}
}

/// Fake audio, with enough `0xFF` bytes to resemble MPEG frame syncs
pub fn audio(len: usize) -> Vec<u8> {
	(0..len)
		.map(|i| if i % 7 == 0 { 0xFF } else { (i % 251) as u8 })
		.collect()
}

/// An ID3v2.3 frame
pub fn id3v23_frame(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
	let mut frame = id.to_vec();
	frame.extend((body.len() as u32).to_be_bytes());
	frame.extend([0, 0]);
	frame.extend(body);
	frame
}

/// An ID3v2 tag with the given frames and no flags
pub fn id3v2_tag(major: u8, frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
	let body = frames.concat();
	let size = (body.len() + padding) as u32;

	let mut tag = b"ID3".to_vec();
	tag.extend([major, 0, 0]);
	tag.extend(
		[21, 14, 7, 0]
			.iter()
			.map(|shift| ((size >> shift) & 0x7F) as u8),
	);
	tag.extend(body);
	tag.extend(vec![0; padding]);
	tag
}

/// An APE item
pub fn ape_item(key: &str, value: &[u8]) -> Vec<u8> {
	let mut item = (value.len() as u32).to_le_bytes().to_vec();
	item.extend(0_u32.to_le_bytes());
	item.extend(key.as_bytes());
	item.push(0);
	item.extend(value);
	item
}

/// An APE tag without a header
pub fn ape_footer_only(items: &[Vec<u8>]) -> Vec<u8> {
	let body = items.concat();

	let mut tag = body.clone();
	tag.extend(b"APETAGEX");
	tag.extend(2000_u32.to_le_bytes());
	tag.extend(((body.len() + 32) as u32).to_le_bytes());
	tag.extend((items.len() as u32).to_le_bytes());
	tag.extend(0_u32.to_le_bytes());
	tag.extend([0; 8]);
	tag
}

/// An ID3v1.1 tag
pub fn id3v1_tag(title: &str, track: u8, genre: u8) -> Vec<u8> {
	let mut tag = b"TAG".to_vec();

	let mut field = |value: &[u8], len: usize| {
		let mut bytes = value.to_vec();
		bytes.resize(len, 0);
		tag.extend(bytes);
	};

	field(title.as_bytes(), 30);
	field(b"", 30);
	field(b"", 30);
	field(b"1999", 4);
	field(b"", 28);

	tag.extend([0, track, genre]);
	tag
}

/// A FLAC metadata block
pub fn flac_block(ty: u8, last: bool, content: &[u8]) -> Vec<u8> {
	let mut block = vec![if last { ty | 0x80 } else { ty }];
	block.extend(&(content.len() as u32).to_be_bytes()[1..]);
	block.extend(content);
	block
}

/// `fLaC`, a STREAMINFO block, the given blocks and the audio
pub fn flac_file(blocks: &[(u8, Vec<u8>)], audio: &[u8]) -> Vec<u8> {
	let mut file = b"fLaC".to_vec();
	file.extend(flac_block(0, blocks.is_empty(), &[0x12; 34]));

	for (index, (ty, content)) in blocks.iter().enumerate() {
		file.extend(flac_block(*ty, index == blocks.len() - 1, content));
	}

	file.extend(audio);
	file
}

/// A Vorbis comment block body
pub fn vorbis_comments(vendor: &str, fields: &[&str]) -> Vec<u8> {
	let mut content = (vendor.len() as u32).to_le_bytes().to_vec();
	content.extend(vendor.as_bytes());
	content.extend((fields.len() as u32).to_le_bytes());

	for field in fields {
		content.extend((field.len() as u32).to_le_bytes());
		content.extend(field.as_bytes());
	}

	content
}

/// The offset of the first occurrence of `needle` in `haystack`
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	haystack
		.windows(needle.len())
		.position(|window| window == needle)
}
