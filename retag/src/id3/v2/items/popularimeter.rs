use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::from_static("POPM");

/// The contents of a popularimeter ("POPM") frame
///
/// A tag can contain multiple "POPM" frames, but there must only be
/// one with the same email address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PopularimeterFrame {
	pub(crate) header: FrameHeader,
	/// An email address of the user performing the rating
	pub email: String,
	/// A rating of 1-255, where 1 is the worst and 255 is the best.
	/// A rating of 0 is unknown.
	pub rating: u8,
	/// A play counter for the user. It is to be incremented each time the file is played.
	pub counter: u64,
}

impl PopularimeterFrame {
	/// Create a new [`PopularimeterFrame`]
	pub fn new(email: String, rating: u8, counter: u64) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			email,
			rating,
			counter,
		}
	}

	/// Get the flags for the frame
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Set the flags for the frame
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// Convert ID3v2 POPM frame bytes into a [`PopularimeterFrame`].
	///
	/// The counter is optional, and may be longer than 4 bytes. Counters that don't fit in a `u64`
	/// are clamped to `u64::MAX`.
	///
	/// # Errors
	///
	/// * `reader` ends before the rating
	pub fn parse<R>(reader: &mut R, frame_flags: FrameFlags) -> Result<Option<Self>>
	where
		R: Read,
	{
		let email = decode_text(
			reader,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		)?;
		if email.bytes_read == 0 {
			return Ok(None);
		}

		let rating = reader.read_u8()?;

		let mut counter_content = Vec::new();
		reader.read_to_end(&mut counter_content)?;

		let counter = match counter_content.len() {
			len if len > 8 => u64::MAX,
			len => {
				let mut counter_bytes = [0; 8];
				counter_bytes[8 - len..].copy_from_slice(&counter_content);
				u64::from_be_bytes(counter_bytes)
			},
		};

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			email: email.content,
			rating,
			counter,
		}))
	}

	/// Convert a [`PopularimeterFrame`] into an ID3v2 POPM frame byte Vec
	///
	/// NOTE: This does not include a frame header
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the email is not Latin-1
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		let mut content = TextEncoding::Latin1.encode(
			&self.email,
			true,
			write_options.lossy_text_encoding,
		)?;
		content.push(self.rating);

		// The counter is at least 4 bytes, and grows a byte at a time
		let counter_bytes = self.counter.to_be_bytes();
		let significant = counter_bytes
			.iter()
			.position(|b| *b != 0)
			.map_or(0, |first| 8 - first);
		content.extend(&counter_bytes[8 - significant.max(4)..]);

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn counter_widths() {
		for (counter, len) in [(0, 4), (u64::from(u32::MAX), 4), (u64::from(u32::MAX) + 1, 5), (u64::MAX, 8)] {
			let frame = PopularimeterFrame::new(String::from("a@b"), 196, counter);
			let bytes = frame.as_bytes(WriteOptions::default()).unwrap();
			assert_eq!(bytes.len(), 4 + 1 + len);

			let parsed = PopularimeterFrame::parse(&mut &bytes[..], FrameFlags::default())
				.unwrap()
				.unwrap();
			assert_eq!(parsed, frame);
		}
	}

	#[test_log::test]
	fn missing_counter() {
		let parsed = PopularimeterFrame::parse(&mut &b"a@b\x00\xFF"[..], FrameFlags::default())
			.unwrap()
			.unwrap();
		assert_eq!(parsed.rating, 255);
		assert_eq!(parsed.counter, 0);
	}
}
