use super::ApeTag;
use super::read::read_ape_tag;
use crate::ape::constants::APE_HEADER_LEN;
use crate::ape::header::ApeHeader;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::id3::find_id3v1;
use crate::macros::{err, try_vec, unsupported};

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

pub(super) fn write_to_path(tag: &ApeTag, path: &Path, write_options: WriteOptions) -> Result<()> {
	let mut file = OpenOptions::new().read(true).write(true).open(path)?;

	// The items of the existing tag are only needed to preserve read only items
	let existing = read_ape_tag(
		&mut file,
		write_options.respect_read_only,
		ParseOptions::new(),
	)?;

	let mut tag = Cow::Borrowed(tag);
	if let Some(existing) = &existing {
		if write_options.respect_read_only {
			if existing.read_only {
				unsupported!(@BAIL "APE", "the existing tag is read only");
			}

			for item in existing.items().filter(|item| item.read_only) {
				log::debug!("APE: Preserving read only item '{}'", item.key());
				tag.to_mut().insert(item.clone());
			}
		}
	}

	let bytes = create_ape_tag(&tag)?;

	let (start, old_len) = match &existing {
		Some(existing) => (existing.offset().unwrap_or_default(), existing.size_on_disk()),
		None => {
			let file_len = file.seek(SeekFrom::End(0))?;
			let id3v1_len = if find_id3v1(&mut file)?.is_some() { 128 } else { 0 };
			(file_len - id3v1_len, 0)
		},
	};

	if bytes.is_empty() && old_len == 0 {
		log::debug!("APE: Nothing to write or remove");
		return Ok(());
	}

	replace_trailing_region(&mut file, start, old_len, &bytes)
}

pub(super) fn remove_from_path(path: &Path) -> Result<bool> {
	let mut file = OpenOptions::new().read(true).write(true).open(path)?;

	let Some(existing) = read_ape_tag(&mut file, false, ParseOptions::new())? else {
		return Ok(false);
	};

	replace_trailing_region(
		&mut file,
		existing.offset().unwrap_or_default(),
		existing.size_on_disk(),
		&[],
	)?;
	Ok(true)
}

// APE tags are only ever followed by an ID3v1 tag, so the data after the region is small
// enough to buffer while the file is resized
fn replace_trailing_region(file: &mut File, start: u64, old_len: u64, new_bytes: &[u8]) -> Result<()> {
	let file_len = file.seek(SeekFrom::End(0))?;
	let trailing_len = file_len - (start + old_len);

	file.seek(SeekFrom::Start(start + old_len))?;
	let mut trailing = try_vec![0; trailing_len as usize];
	file.read_exact(&mut trailing)?;

	log::debug!(
		"APE: Replacing {} bytes at offset {} with {} bytes",
		old_len,
		start,
		new_bytes.len()
	);

	file.set_len(start)?;
	file.seek(SeekFrom::Start(start))?;
	file.write_all(new_bytes)?;
	file.write_all(&trailing)?;
	file.flush()?;

	Ok(())
}

pub(super) fn create_ape_tag(tag: &ApeTag) -> Result<Vec<u8>> {
	let mut items = Vec::<u8>::new();
	let mut item_count = 0_u32;

	for item in tag.items() {
		let value = item.value();
		if value.is_empty() {
			log::trace!("APE: Omitting empty item '{}'", item.key());
			continue;
		}

		let mut flags = value.type_flags();
		if item.read_only {
			flags |= 1_u32
		}

		let value = value.as_bytes();
		let Ok(value_len) = u32::try_from(value.len()) else {
			err!(TooMuchData);
		};

		items.write_u32::<LittleEndian>(value_len)?;
		items.write_u32::<LittleEndian>(flags)?;
		items.write_all(item.key().as_bytes())?;
		items.write_u8(0)?;
		items.write_all(value)?;

		item_count += 1;
	}

	// Unnecessary to write anything if there's no metadata
	if item_count == 0 {
		return Ok(Vec::new());
	}

	// The size includes the footer, but not the header
	let Ok(size) = u32::try_from(items.len() + APE_HEADER_LEN as usize) else {
		err!(TooMuchData);
	};

	let header = ApeHeader::v2(size, item_count, tag.read_only);

	let mut bytes = Vec::with_capacity(items.len() + 64);
	bytes.extend(header.as_bytes(true));
	bytes.extend(items);
	bytes.extend(header.as_bytes(false));

	Ok(bytes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ape::ApeItem;
	use crate::tag::Accessor;

	fn file_with(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("audio.mp3");
		std::fs::write(&path, content).unwrap();
		(dir, path)
	}

	fn id3v1() -> Vec<u8> {
		let mut id3v1 = b"TAG".to_vec();
		id3v1.extend([0; 125]);
		id3v1
	}

	#[test_log::test]
	fn get_bytes_layout() {
		let mut tag = ApeTag::new();
		tag.set_title(String::from("Foo"));
		tag.insert(ApeItem::text("EMPTY", String::new()));

		let bytes = tag.get_bytes().unwrap();
		// TITLE=Foo: 4 + 4 + 5 + 1 + 3
		assert_eq!(bytes.len(), 32 + 17 + 32);
		assert_eq!(&bytes[..8], b"APETAGEX");
		assert_eq!(&bytes[12..16], 49_u32.to_le_bytes());
		assert_eq!(&bytes[16..20], 1_u32.to_le_bytes());
		assert_eq!(bytes[23], 0xA0);
		assert_eq!(&bytes[32..49], b"\x03\0\0\0\0\0\0\0TITLE\0Foo");
		assert_eq!(bytes[bytes.len() - 9], 0x80);

		assert!(ApeTag::new().get_bytes().unwrap().is_empty());
	}

	#[test_log::test]
	fn placed_before_id3v1() {
		let mut content = b"audio".to_vec();
		content.extend(id3v1());
		let (_dir, path) = file_with(&content);

		let mut tag = ApeTag::new();
		tag.set_artist(String::from("Artist"));
		tag.save_to_path(&path, WriteOptions::default()).unwrap();

		let written = std::fs::read(&path).unwrap();
		assert!(written.starts_with(b"audioAPETAGEX"));
		assert_eq!(&written[written.len() - 128..], &id3v1()[..]);

		// Replacing keeps a single tag
		tag.set_artist(String::from("Another artist"));
		tag.save_to_path(&path, WriteOptions::default()).unwrap();

		let read = ApeTag::read_from_path(&path, ParseOptions::new())
			.unwrap()
			.unwrap();
		assert_eq!(read.artist().as_deref(), Some("Another artist"));
		assert_eq!(read.offset(), Some(5));

		assert!(ApeTag::remove_from_path(&path).unwrap());
		assert_eq!(std::fs::read(&path).unwrap(), content);
		assert!(!ApeTag::remove_from_path(&path).unwrap());
	}

	#[test_log::test]
	fn read_only_items_preserved() {
		let (_dir, path) = file_with(b"audio");

		let mut original = ApeTag::new();
		let mut locked = ApeItem::text("CATALOG", String::from("CAT-001"));
		locked.read_only = true;
		original.insert(locked);
		original.save_to_path(&path, WriteOptions::default()).unwrap();

		let mut new = ApeTag::new();
		new.set_catalog(String::from("Changed"));
		new.save_to_path(&path, WriteOptions::default()).unwrap();

		let read = ApeTag::read_from_path(&path, ParseOptions::new())
			.unwrap()
			.unwrap();
		assert_eq!(read.catalog(), Some("CAT-001"));

		// A read only tag cannot be replaced at all
		let mut read_only_tag = ApeTag::new();
		read_only_tag.read_only = true;
		read_only_tag.set_title(String::from("Title"));
		read_only_tag
			.save_to_path(&path, WriteOptions::default().respect_read_only(false))
			.unwrap();

		let err = new.save_to_path(&path, WriteOptions::default()).unwrap_err();
		assert!(err.is_unsupported_operation());
	}
}
