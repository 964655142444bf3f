use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::Id3v2Version;
use crate::id3::v2::util::registry;

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// An `ID3v2` frame ID
///
/// Frame IDs are 3 (ID3v2.2) or 4 (ID3v2.3/4) characters in `'A'..='Z'` and `'0'..='9'`.
#[derive(PartialEq, Clone, Debug, Eq, Hash)]
pub struct FrameId(Cow<'static, str>);

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// NOTE: This will not upgrade IDs.
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is an invalid length (must be 3 or 4)
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::FrameId;
	///
	/// # fn main() -> retag::error::Result<()> {
	/// let title = FrameId::new("TIT2")?;
	/// assert_eq!(title.as_str(), "TIT2");
	///
	/// assert!(FrameId::new("tit2").is_err());
	/// assert!(FrameId::new("TITLE").is_err());
	/// # Ok(()) }
	/// ```
	pub fn new<I>(id: I) -> Result<Self>
	where
		I: Into<Cow<'static, str>>,
	{
		Self::new_cow(id.into())
	}

	pub(crate) fn new_cow(id: Cow<'static, str>) -> Result<Self> {
		let valid_len = matches!(id.len(), 3 | 4);
		let valid_chars = id
			.bytes()
			.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

		if !valid_len || !valid_chars {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.into_owned().into_bytes())).into());
		}

		Ok(Self(id))
	}

	// For the known IDs used by the frame constructors
	pub(crate) const fn from_static(id: &'static str) -> Self {
		Self(Cow::Borrowed(id))
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Whether this is a 3 character ID3v2.2 ID
	///
	/// Only IDs without a newer counterpart are kept in this form.
	pub fn is_v2(&self) -> bool {
		self.0.len() == 3
	}

	/// The ID this frame is written with in `version`
	///
	/// Returns `None` when the frame has no representation in `version`.
	pub fn resolve(&self, version: Id3v2Version) -> Option<Cow<'static, str>> {
		registry::resolve_identifier(&self.0, version)
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<&str> for FrameId {
	type Error = crate::error::RetagError;

	fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
		Self::new(value.to_owned())
	}
}

/// An ID3v2 frame header
///
/// These are rarely constructed by hand. Usually they are created in the background
/// when making a new [`Frame`](crate::id3::v2::Frame).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHeader {
	pub(crate) id: FrameId,
	/// The frame's flags
	pub flags: FrameFlags,
}

impl FrameHeader {
	/// Create a new [`FrameHeader`]
	pub const fn new(id: FrameId, flags: FrameFlags) -> Self {
		Self { id, flags }
	}

	/// Get the ID of the frame
	pub fn id(&self) -> &FrameId {
		&self.id
	}
}

/// Various flags to describe the content of a frame
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Discard the frame if the tag is altered by an unaware application
	pub tag_alter_preservation: bool,
	/// Discard the frame if the audio is altered by an unaware application
	pub file_alter_preservation: bool,
	/// The frame is meant to be read only
	pub read_only: bool,
	/// The group identifier the frame belongs to
	///
	/// All frames with the same group identifier byte belong to the same group.
	pub grouping_identity: Option<u8>,
	/// Frame is zlib compressed
	///
	/// Frame bodies are written uncompressed, so this is only kept for encrypted frames.
	pub compression: bool,
	/// Frame encryption method symbol
	///
	/// Encrypted frames are kept as [`BinaryFrame`](crate::id3::v2::BinaryFrame)s and written back
	/// untouched, flags included.
	pub encryption: Option<u8>,
	/// Frame is unsynchronised (ID3v2.4 only)
	///
	/// Frame bodies are always written synchronised, so this only has meaning while reading.
	pub unsynchronisation: bool,
	/// Frame has a data length indicator
	///
	/// The size of the frame body with every flag removed. ID3v2.3 has no such flag, but stores
	/// the decompressed size of compressed frames, which is kept here.
	pub data_length_indicator: Option<u32>,
}

impl FrameFlags {
	/// Parse the flags from an ID3v2.4 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	/// * `data_length_indicator`
	pub fn parse_id3v24(flags: u16) -> Self {
		FrameFlags {
			tag_alter_preservation: flags & 0x4000 == 0x4000,
			file_alter_preservation: flags & 0x2000 == 0x2000,
			read_only: flags & 0x1000 == 0x1000,
			grouping_identity: (flags & 0x0040 == 0x0040).then_some(0),
			compression: flags & 0x0008 == 0x0008,
			encryption: (flags & 0x0004 == 0x0004).then_some(0),
			unsynchronisation: flags & 0x0002 == 0x0002,
			data_length_indicator: (flags & 0x0001 == 0x0001).then_some(0),
		}
	}

	/// Parse the flags from an ID3v2.3 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	pub fn parse_id3v23(flags: u16) -> Self {
		FrameFlags {
			tag_alter_preservation: flags & 0x8000 == 0x8000,
			file_alter_preservation: flags & 0x4000 == 0x4000,
			read_only: flags & 0x2000 == 0x2000,
			grouping_identity: (flags & 0x0020 == 0x0020).then_some(0),
			compression: flags & 0x0080 == 0x0080,
			encryption: (flags & 0x0040 == 0x0040).then_some(0),
			unsynchronisation: false,
			data_length_indicator: None,
		}
	}

	/// Get the ID3v2.4 byte representation of the flags
	pub fn as_id3v24_bytes(&self) -> u16 {
		let mut flags = 0;

		for (set, bit) in [
			(self.tag_alter_preservation, 0x4000),
			(self.file_alter_preservation, 0x2000),
			(self.read_only, 0x1000),
			(self.grouping_identity.is_some(), 0x0040),
			(self.compression, 0x0008),
			(self.encryption.is_some(), 0x0004),
			(self.unsynchronisation, 0x0002),
			(self.data_length_indicator.is_some(), 0x0001),
		] {
			if set {
				flags |= bit;
			}
		}

		flags
	}

	/// Get the ID3v2.3 byte representation of the flags
	pub fn as_id3v23_bytes(&self) -> u16 {
		let mut flags = 0;

		for (set, bit) in [
			(self.tag_alter_preservation, 0x8000),
			(self.file_alter_preservation, 0x4000),
			(self.read_only, 0x2000),
			(self.grouping_identity.is_some(), 0x0020),
			(self.compression, 0x0080),
			(self.encryption.is_some(), 0x0040),
		] {
			if set {
				flags |= bit;
			}
		}

		flags
	}

	/// The flags a frame body is written with
	///
	/// Bodies are written plain, so the compression and unsynchronisation flags are dropped along
	/// with the data length indicator. Encrypted bodies are opaque and keep their compression
	/// flag and data length indicator.
	pub(crate) fn for_write(self) -> Self {
		if self.encryption.is_some() {
			return Self {
				unsynchronisation: false,
				..self
			};
		}

		Self {
			compression: false,
			unsynchronisation: false,
			data_length_indicator: None,
			..self
		}
	}
}
