//! Embedded pictures
//!
//! Pictures are shared between ID3v2 `APIC` frames, FLAC `PICTURE` blocks and the
//! `METADATA_BLOCK_PICTURE` Vorbis comment field. The two FLAC flavors share a single binary
//! layout, see [`Picture::from_flac_bytes`].

use crate::config::ParsingMode;
use crate::error::{ErrorKind, Result, RetagError};
use crate::macros::{err, try_vec};

use std::fmt::{Display, Formatter};
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use data_encoding::BASE64;

/// MIME types for pictures.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// PNG image
	Png,
	/// JPEG image
	Jpeg,
	/// TIFF image
	Tiff,
	/// BMP image
	Bmp,
	/// GIF image
	Gif,
	/// Some unknown MIME type
	Unknown(String),
}

impl MimeType {
	/// Get a `MimeType` from a string
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::picture::MimeType;
	///
	/// assert_eq!(MimeType::from_str("image/JPG"), MimeType::Jpeg);
	/// ```
	#[must_use]
	#[allow(clippy::should_implement_trait)] // Infallible in contrast to FromStr
	pub fn from_str(mime_type: &str) -> Self {
		match &*mime_type.to_ascii_lowercase() {
			"image/jpeg" | "image/jpg" => Self::Jpeg,
			"image/png" => Self::Png,
			"image/tiff" => Self::Tiff,
			"image/bmp" => Self::Bmp,
			"image/gif" => Self::Gif,
			_ => Self::Unknown(mime_type.to_owned()),
		}
	}

	/// Get a &str from a `MimeType`
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			MimeType::Jpeg => "image/jpeg",
			MimeType::Png => "image/png",
			MimeType::Tiff => "image/tiff",
			MimeType::Bmp => "image/bmp",
			MimeType::Gif => "image/gif",
			MimeType::Unknown(unknown) => unknown,
		}
	}

	/// Map an ID3v2.2 three character image format
	pub(crate) fn from_v2_format(format: [u8; 3]) -> Self {
		match &format.map(|b| b.to_ascii_uppercase()) {
			b"PNG" => Self::Png,
			b"JPG" => Self::Jpeg,
			b"TIF" => Self::Tiff,
			b"BMP" => Self::Bmp,
			b"GIF" => Self::Gif,
			_ => Self::Unknown(format.iter().map(|b| char::from(*b)).collect()),
		}
	}

	/// The ID3v2.2 three character image format
	///
	/// Unknown types use the first three characters of their subtype.
	pub(crate) fn as_v2_format(&self) -> [u8; 3] {
		match self {
			MimeType::Png => *b"PNG",
			MimeType::Jpeg => *b"JPG",
			MimeType::Tiff => *b"TIF",
			MimeType::Bmp => *b"BMP",
			MimeType::Gif => *b"GIF",
			MimeType::Unknown(unknown) => {
				let subtype = unknown.rsplit('/').next().unwrap_or_default();
				let mut format = *b"   ";
				for (dst, src) in format.iter_mut().zip(subtype.bytes()) {
					*dst = src.to_ascii_uppercase();
				}
				format
			},
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The picture type, according to ID3v2 APIC
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum PictureType {
	#[default]
	Other,
	FileIcon32x32Png,
	OtherFileIcon,
	CoverFront,
	CoverBack,
	LeafletPage,
	MediaLabelSideOfCD,
	LeadArtistPerformer,
	ArtistPerformer,
	Conductor,
	BandOrchestra,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	MovieVideoScreenCapture,
	BrightColoredFish,
	Illustration,
	BandArtistLogo,
	PublisherStudioLogo,
	Undefined(u8),
}

/// Every defined picture type with its display name, ordered by type byte
pub static PICTURE_TYPE_NAMES: [(PictureType, &str); 21] = [
	(PictureType::Other, "Other"),
	(PictureType::FileIcon32x32Png, "32x32 pixels file icon (PNG only)"),
	(PictureType::OtherFileIcon, "Other file icon"),
	(PictureType::CoverFront, "Cover (front)"),
	(PictureType::CoverBack, "Cover (back)"),
	(PictureType::LeafletPage, "Leaflet page"),
	(PictureType::MediaLabelSideOfCD, "Media (e.g. label side of CD)"),
	(PictureType::LeadArtistPerformer, "Lead artist/lead performer/soloist"),
	(PictureType::ArtistPerformer, "Artist/performer"),
	(PictureType::Conductor, "Conductor"),
	(PictureType::BandOrchestra, "Band/Orchestra"),
	(PictureType::Composer, "Composer"),
	(PictureType::Lyricist, "Lyricist/text writer"),
	(PictureType::RecordingLocation, "Recording Location"),
	(PictureType::DuringRecording, "During recording"),
	(PictureType::DuringPerformance, "During performance"),
	(PictureType::MovieVideoScreenCapture, "Movie/video screen capture"),
	(PictureType::BrightColoredFish, "A bright coloured fish"),
	(PictureType::Illustration, "Illustration"),
	(PictureType::BandArtistLogo, "Band/artist logotype"),
	(PictureType::PublisherStudioLogo, "Publisher/Studio logotype"),
];

impl PictureType {
	/// Get a `u8` from a `PictureType` according to ID3v2 APIC
	pub fn as_u8(&self) -> u8 {
		match self {
			Self::Undefined(byte) => *byte,
			defined => PICTURE_TYPE_NAMES
				.iter()
				.position(|(ty, _)| ty == defined)
				.map_or(0, |index| index as u8),
		}
	}

	/// Get a `PictureType` from a u8 according to ID3v2 APIC
	pub fn from_u8(byte: u8) -> Self {
		PICTURE_TYPE_NAMES
			.get(usize::from(byte))
			.map_or(Self::Undefined(byte), |(ty, _)| *ty)
	}

	/// The display name of the picture type
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::picture::PictureType;
	///
	/// assert_eq!(PictureType::CoverFront.name(), "Cover (front)");
	/// assert_eq!(PictureType::Undefined(0x50).name(), "Other");
	/// ```
	pub fn name(&self) -> &'static str {
		PICTURE_TYPE_NAMES
			.iter()
			.find(|(ty, _)| ty == self)
			.map_or("Other", |(_, name)| name)
	}

	/// Find a picture type by its display name, falling back to [`PictureType::Other`]
	pub fn from_name(name: &str) -> Self {
		PICTURE_TYPE_NAMES
			.iter()
			.find(|(_, n)| n.eq_ignore_ascii_case(name))
			.map_or(Self::Other, |(ty, _)| *ty)
	}
}

/// Image dimensions stored alongside FLAC pictures
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PictureInformation {
	/// The picture's width in pixels
	pub width: u32,
	/// The picture's height in pixels
	pub height: u32,
	/// The picture's color depth in bits per pixel
	pub color_depth: u32,
	/// The number of colors used, 0 for non-indexed images
	pub num_colors: u32,
}

/// An embedded picture
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Picture {
	pub(crate) pic_type: PictureType,
	pub(crate) mime_type: Option<MimeType>,
	pub(crate) description: Option<String>,
	pub(crate) data: Vec<u8>,
}

impl Picture {
	/// Create a new `Picture`
	pub fn new(
		pic_type: PictureType,
		mime_type: Option<MimeType>,
		description: Option<String>,
		data: Vec<u8>,
	) -> Self {
		Self {
			pic_type,
			mime_type,
			description,
			data,
		}
	}

	/// Returns the [`PictureType`]
	pub fn pic_type(&self) -> PictureType {
		self.pic_type
	}

	/// Sets the [`PictureType`]
	pub fn set_pic_type(&mut self, pic_type: PictureType) {
		self.pic_type = pic_type
	}

	/// Returns the [`MimeType`], if known
	pub fn mime_type(&self) -> Option<&MimeType> {
		self.mime_type.as_ref()
	}

	/// Returns the description
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// Sets the description
	pub fn set_description(&mut self, description: Option<String>) {
		self.description = description;
	}

	/// Returns the picture data
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Consumes the `Picture`, returning its data
	pub fn into_data(self) -> Vec<u8> {
		self.data
	}

	/// Convert a [`Picture`] to a FLAC `PICTURE` block body
	///
	/// With `encode`, the body is base64 encoded for use in a `METADATA_BLOCK_PICTURE` field.
	pub fn as_flac_bytes(&self, information: PictureInformation, encode: bool) -> Vec<u8> {
		let mime = self.mime_type.as_ref().map_or("", MimeType::as_str);
		let description = self.description.as_deref().unwrap_or_default();

		let mut data = Vec::with_capacity(32 + mime.len() + description.len() + self.data.len());
		data.extend(u32::from(self.pic_type.as_u8()).to_be_bytes());
		data.extend((mime.len() as u32).to_be_bytes());
		data.extend(mime.as_bytes());
		data.extend((description.len() as u32).to_be_bytes());
		data.extend(description.as_bytes());

		for field in [
			information.width,
			information.height,
			information.color_depth,
			information.num_colors,
		] {
			data.extend(field.to_be_bytes());
		}

		data.extend((self.data.len() as u32).to_be_bytes());
		data.extend(&self.data);

		if encode {
			BASE64.encode(&data).into_bytes()
		} else {
			data
		}
	}

	/// Read a [`Picture`] from a FLAC `PICTURE` block body
	///
	/// With `encoded`, `bytes` is expected to be base64, as stored in a `METADATA_BLOCK_PICTURE` field.
	///
	/// # Errors
	///
	/// * The data is not valid base64 (`encoded` only)
	/// * A length field points past the end of the data
	/// * [`ParsingMode::Strict`] and the picture type does not fit in a byte
	pub fn from_flac_bytes(
		bytes: &[u8],
		encoded: bool,
		parse_mode: ParsingMode,
	) -> Result<(Self, PictureInformation)> {
		if encoded {
			let data = BASE64
				.decode(bytes)
				.map_err(|_| RetagError::new(ErrorKind::NotAPicture))?;
			return Self::read_flac_body(&data, parse_mode);
		}

		Self::read_flac_body(bytes, parse_mode)
	}

	fn read_flac_body(content: &[u8], parse_mode: ParsingMode) -> Result<(Self, PictureInformation)> {
		if content.len() < 32 {
			err!(NotAPicture);
		}

		let mut reader = Cursor::new(content);

		let pic_ty = reader.read_u32::<BigEndian>()?;
		if pic_ty > 255 && parse_mode == ParsingMode::Strict {
			err!(NotAPicture);
		}

		let mime_type = read_flac_string(&mut reader)?.map(|mime| MimeType::from_str(&mime));
		let description = read_flac_string(&mut reader)?;

		let information = PictureInformation {
			width: reader.read_u32::<BigEndian>()?,
			height: reader.read_u32::<BigEndian>()?,
			color_depth: reader.read_u32::<BigEndian>()?,
			num_colors: reader.read_u32::<BigEndian>()?,
		};

		let data_len = reader.read_u32::<BigEndian>()? as usize;
		let remaining = content.len() - reader.position() as usize;
		if data_len > remaining {
			err!(SizeMismatch);
		}

		let mut data = try_vec![0; data_len];
		reader.read_exact(&mut data)?;

		Ok((
			Self {
				pic_type: PictureType::from_u8(pic_ty as u8),
				mime_type,
				description,
				data,
			},
			information,
		))
	}
}

// A u32 BE length followed by UTF-8 text, empty strings are `None`
fn read_flac_string(reader: &mut Cursor<&[u8]>) -> Result<Option<String>> {
	let len = reader.read_u32::<BigEndian>()? as usize;
	let remaining = reader.get_ref().len() - reader.position() as usize;
	if len > remaining {
		err!(SizeMismatch);
	}

	let mut raw = try_vec![0; len];
	reader.read_exact(&mut raw)?;

	if raw.is_empty() {
		return Ok(None);
	}

	Ok(Some(String::from_utf8(raw)?))
}
