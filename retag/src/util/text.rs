use crate::error::{ErrorKind, Result, RetagError};
use crate::macros::err;

use std::io::Read;

use byteorder::ReadBytesExt;

/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The character index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(
			f,
			"invalid {} sequence from index {}",
			self.encoding.name(),
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The text encoding used by ID3v2 text fields
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash, Default)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian (ID3v2.4 only)
	UTF16BE = 2,
	/// UTF-8 (ID3v2.4 only)
	#[default]
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	fn name(self) -> &'static str {
		match self {
			TextEncoding::Latin1 => "Latin-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF8 => "UTF-8",
			TextEncoding::UTF16BE => "UTF-16 BE",
		}
	}

	/// The size of this encoding's null terminator
	pub(crate) fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}

	/// ID3v2.2 and ID3v2.3 only know Latin-1 and UTF-16
	///
	/// The two encodings added in ID3v2.4 are written as UTF-16 instead.
	pub(crate) fn to_id3v23(self) -> Self {
		match self {
			Self::UTF8 | Self::UTF16BE => {
				log::warn!(
					"Text encoding {:?} is not supported before ID3v2.4, substituting with UTF-16",
					self
				);
				Self::UTF16
			},
			_ => self,
		}
	}

	pub(crate) fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		let mut out = match self {
			TextEncoding::Latin1 => latin1_encode(text, lossy)?,
			TextEncoding::UTF16 => utf16_encode(text, u16::to_le_bytes, true),
			TextEncoding::UTF16BE => utf16_encode(text, u16::to_be_bytes, false),
			TextEncoding::UTF8 => text.as_bytes().to_vec(),
		};

		if terminated {
			out.extend(std::iter::repeat_n(0, self.terminator_len()));
		}

		Ok(out)
	}
}

#[derive(Eq, PartialEq, Debug, Default)]
pub(crate) struct DecodeTextResult {
	pub(crate) content: String,
	pub(crate) bytes_read: usize,
	pub(crate) bom: [u8; 2],
}

/// Specify how to decode the provided text
///
/// By default, this will:
///
/// * Use [`TextEncoding::UTF8`] as the encoding
/// * Not expect the text to be null terminated
/// * Have no byte order mark
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct TextDecodeOptions {
	pub encoding: TextEncoding,
	pub terminated: bool,
	pub bom: [u8; 2],
}

impl TextDecodeOptions {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn encoding(mut self, encoding: TextEncoding) -> Self {
		self.encoding = encoding;
		self
	}

	pub(crate) fn terminated(mut self, terminated: bool) -> Self {
		self.terminated = terminated;
		self
	}

	/// Used for strings that follow a BOM-prefixed string in the same frame
	pub(crate) fn bom(mut self, bom: [u8; 2]) -> Self {
		self.bom = bom;
		self
	}
}

pub(crate) fn decode_text<R>(reader: &mut R, options: TextDecodeOptions) -> Result<DecodeTextResult>
where
	R: Read,
{
	let (raw_bytes, bytes_read) = if options.terminated {
		let (bytes, terminator_len) = read_to_terminator(reader, options.encoding);
		let bytes_read = bytes.len() + terminator_len;
		(bytes, bytes_read)
	} else {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		let bytes_read = bytes.len();
		(bytes, bytes_read)
	};

	if raw_bytes.is_empty() {
		return Ok(DecodeTextResult {
			bytes_read,
			..DecodeTextResult::default()
		});
	}

	let mut bom = [0, 0];
	let content = match options.encoding {
		TextEncoding::Latin1 => latin1_decode(&raw_bytes),
		TextEncoding::UTF16 => {
			if raw_bytes.len() % 2 != 0 {
				err!(TextDecode("UTF-16 string has an odd length"));
			}

			match (options.bom, &*raw_bytes) {
				(_, [0xFE, 0xFF, rest @ ..]) => {
					bom = [0xFE, 0xFF];
					utf16_decode_bytes(rest, u16::from_be_bytes)?
				},
				(_, [0xFF, 0xFE, rest @ ..]) => {
					bom = [0xFF, 0xFE];
					utf16_decode_bytes(rest, u16::from_le_bytes)?
				},
				([0xFE, 0xFF], _) => utf16_decode_bytes(&raw_bytes, u16::from_be_bytes)?,
				([0xFF, 0xFE], _) => utf16_decode_bytes(&raw_bytes, u16::from_le_bytes)?,
				_ => err!(TextDecode("UTF-16 string has an invalid byte order mark")),
			}
		},
		TextEncoding::UTF16BE => utf16_decode_bytes(&raw_bytes, u16::from_be_bytes)?,
		TextEncoding::UTF8 => utf8_decode(raw_bytes)
			.map_err(|_| RetagError::new(ErrorKind::TextDecode("Expected a UTF-8 string")))?,
	};

	Ok(DecodeTextResult {
		content,
		bytes_read,
		bom,
	})
}

/// Read until a null terminator of the encoding's width, returning the text and terminator size
///
/// Running out of data ends the string without a terminator.
pub(crate) fn read_to_terminator<R>(reader: &mut R, encoding: TextEncoding) -> (Vec<u8>, usize)
where
	R: Read,
{
	let mut text_bytes = Vec::new();

	match encoding.terminator_len() {
		1 => {
			while let Ok(byte) = reader.read_u8() {
				if byte == 0 {
					return (text_bytes, 1);
				}

				text_bytes.push(byte)
			}
		},
		_ => {
			while let (Ok(b1), Ok(b2)) = (reader.read_u8(), reader.read_u8()) {
				if b1 == 0 && b2 == 0 {
					return (text_bytes, 2);
				}

				text_bytes.extend([b1, b2]);
			}
		},
	}

	(text_bytes, 0)
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| char::from(*c)).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> std::result::Result<Vec<u8>, TextEncodingError> {
	s.chars()
		.enumerate()
		.map(|(index, c)| match u8::try_from(c) {
			Ok(byte) => Ok(byte),
			Err(_) if lossy => Ok(b'?'),
			Err(_) => Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index,
			}),
		})
		.collect()
}

pub(crate) fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
	let mut text = String::from_utf8(bytes)?;
	trim_end_nulls(&mut text);
	Ok(text)
}

pub(crate) fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	// Frames with several UTF-16 strings may repeat the BOM for every string
	let words = bytes
		.chunks_exact(2)
		.map(|c| endianness([c[0], c[1]]))
		.filter(|w| *w != 0xFEFF)
		.collect::<Vec<_>>();

	let mut text = String::from_utf16(&words)
		.map_err(|_| RetagError::new(ErrorKind::TextDecode("Given an invalid UTF-16 string")))?;
	trim_end_nulls(&mut text);
	Ok(text)
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	let new_len = text.trim_end_matches('\0').len();
	text.truncate(new_len);
}

fn utf16_encode(text: &str, endianness: fn(u16) -> [u8; 2], bom: bool) -> Vec<u8> {
	let mut encoded = Vec::new();

	if bom {
		encoded.extend_from_slice(&endianness(0xFEFF_u16));
	}

	for unit in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(unit));
	}

	encoded
}
