use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::picture::{MimeType, Picture, PictureType};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::io::Read;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::from_static("APIC");

/// An `ID3v2` attached picture frame
///
/// This is simply a wrapper around [`Picture`] to include a [`TextEncoding`]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedPictureFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The picture itself
	pub picture: Picture,
}

impl AttachedPictureFrame {
	/// Create a new [`AttachedPictureFrame`]
	pub fn new(encoding: TextEncoding, picture: Picture) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			encoding,
			picture,
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

	/// Get an [`AttachedPictureFrame`] from ID3v2 A/PIC bytes:
	///
	/// NOTE: This expects *only* the frame content
	///
	/// # Errors
	///
	/// * There isn't enough data present
	/// * The data isn't a picture
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`]
	pub fn parse<R>(
		reader: &mut R,
		frame_flags: FrameFlags,
		version: Id3v2Version,
	) -> Result<Option<Self>>
	where
		R: Read,
	{
		let Ok(encoding_byte) = reader.read_u8() else {
			return Ok(None);
		};
		let encoding = verify_encoding(encoding_byte, version)?;

		let mime_type = if version == Id3v2Version::V2 {
			let mut format = [0; 3];
			reader.read_exact(&mut format)?;
			Some(MimeType::from_v2_format(format))
		} else {
			let mime_type_str = decode_text(
				reader,
				TextDecodeOptions::new()
					.encoding(TextEncoding::Latin1)
					.terminated(true),
			)?
			.content;
			(!mime_type_str.is_empty()).then(|| MimeType::from_str(&mime_type_str))
		};

		let pic_type = PictureType::from_u8(reader.read_u8()?);

		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?
		.content;
		let description = (!description.is_empty()).then_some(description);

		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			picture: Picture {
				pic_type,
				mime_type,
				description,
				data,
			},
		}))
	}

	/// Convert an [`AttachedPictureFrame`] to a ID3v2 A/PIC byte Vec
	///
	/// NOTE: This does not include the frame header
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the description cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for(self.encoding, version);
		let lossy = write_options.lossy_text_encoding;

		let mut data = vec![encoding as u8];

		let mime_type = self.picture.mime_type.as_ref();
		if version == Id3v2Version::V2 {
			data.extend(mime_type.map_or(*b"   ", MimeType::as_v2_format));
		} else {
			let mime_str = mime_type.map_or("", MimeType::as_str);
			data.extend(TextEncoding::Latin1.encode(mime_str, true, lossy)?);
		}

		data.push(self.picture.pic_type.as_u8());

		let description = self.picture.description.as_deref().unwrap_or_default();
		data.extend(encoding.encode(description, true, lossy)?);
		data.extend(&self.picture.data);

		Ok(data)
	}
}
