use crate::error::Result;
use crate::macros::{err, try_vec};

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

pub(crate) const BLOCK_ID_STREAMINFO: u8 = 0;
pub(crate) const BLOCK_ID_PADDING: u8 = 1;
pub(crate) const BLOCK_ID_APPLICATION: u8 = 2;
pub(crate) const BLOCK_ID_SEEKTABLE: u8 = 3;
pub(crate) const BLOCK_ID_VORBIS_COMMENTS: u8 = 4;
pub(crate) const BLOCK_ID_CUESHEET: u8 = 5;
pub(crate) const BLOCK_ID_PICTURE: u8 = 6;

/// The size of a block header: `last(1) | type(7) | size(24)`
pub(crate) const BLOCK_HEADER_LEN: u64 = 4;
/// The largest body a 24-bit size can describe
pub(crate) const MAX_BLOCK_LEN: u64 = 0xFF_FFFF;

pub(crate) struct Block {
	pub(crate) ty: u8,
	pub(crate) last: bool,
	pub(crate) content: Vec<u8>,
	pub(crate) start: u64,
	pub(crate) end: u64,
}

impl Block {
	/// Read a block, only keeping the content of the block types accepted by `predicate`
	pub(crate) fn read<R, P>(data: &mut R, mut predicate: P) -> Result<Self>
	where
		R: Read + Seek,
		P: FnMut(u8) -> bool,
	{
		let start = data.stream_position()?;

		let byte = data.read_u8()?;
		let last = (byte & 0x80) != 0;
		let ty = byte & 0x7F;

		let size = data.read_u24::<BigEndian>()?;
		log::trace!("Reading FLAC block, type: {ty}, size: {size}");

		let mut content;
		if predicate(ty) {
			content = try_vec![0; size as usize];
			data.read_exact(&mut content)?;
		} else {
			content = Vec::new();
			data.seek(SeekFrom::Current(i64::from(size)))?;
		}

		let end = data.stream_position()?;

		Ok(Self {
			ty,
			last,
			content,
			start,
			end,
		})
	}

	pub(crate) fn new(ty: u8, content: Vec<u8>) -> Self {
		Self {
			ty,
			last: false,
			content,
			start: 0,
			end: 0,
		}
	}

	/// The size of the block on disk, header included
	pub(crate) fn len(&self) -> u64 {
		BLOCK_HEADER_LEN + self.content.len() as u64
	}

	pub(crate) fn write_to<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		let size = self.content.len() as u64;
		if size > MAX_BLOCK_LEN {
			err!(TooMuchData);
		}

		let mut byte = self.ty & 0x7F;
		if self.last {
			byte |= 0x80;
		}

		writer.write_u8(byte)?;
		writer.write_u24::<BigEndian>(size as u32)?;
		writer.write_all(&self.content)?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::io::Cursor;

	#[test_log::test]
	fn header() {
		let mut block = Block::new(BLOCK_ID_PADDING, vec![0; 3]);
		block.last = true;

		let mut bytes = Vec::new();
		block.write_to(&mut bytes).unwrap();
		assert_eq!(bytes, [0x81, 0, 0, 3, 0, 0, 0]);

		let read = Block::read(&mut Cursor::new(&bytes), |_| false).unwrap();
		assert!(read.last);
		assert_eq!(read.ty, BLOCK_ID_PADDING);
		assert!(read.content.is_empty());
		assert_eq!((read.start, read.end), (0, 7));
	}

	#[test_log::test]
	fn oversized_block() {
		let block = Block::new(BLOCK_ID_APPLICATION, vec![0; MAX_BLOCK_LEN as usize + 1]);
		assert!(block.write_to(&mut Vec::new()).is_err());
	}
}
