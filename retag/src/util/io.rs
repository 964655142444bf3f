//! Stream helpers shared by every tag reader/writer

use std::io::{Read, Write};

const COPY_CHUNK_SIZE: usize = 32 * 1024;

/// Copy exactly `len` bytes from `reader` to `writer` in fixed size chunks
///
/// Audio payloads can be far larger than the allocation limit, so this never buffers more
/// than a single chunk.
pub(crate) fn copy_exact<R, W>(reader: &mut R, writer: &mut W, mut len: u64) -> std::io::Result<()>
where
	R: Read,
	W: Write,
{
	let mut buf = [0; COPY_CHUNK_SIZE];
	while len > 0 {
		let chunk = std::cmp::min(len, COPY_CHUNK_SIZE as u64) as usize;
		reader.read_exact(&mut buf[..chunk])?;
		writer.write_all(&buf[..chunk])?;
		len -= chunk as u64;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::copy_exact;

	use std::io::Cursor;

	#[test_log::test]
	fn copy_exact_spans_chunks() {
		let source = (0..100_000_u32).map(|i| i as u8).collect::<Vec<_>>();
		let mut reader = Cursor::new(&source);
		let mut out = Vec::new();

		copy_exact(&mut reader, &mut out, 70_000).unwrap();
		assert_eq!(out, source[..70_000]);
		assert_eq!(reader.position(), 70_000);

		// Not enough data left
		assert!(copy_exact(&mut reader, &mut out, 40_000).is_err());
	}
}
