pub(super) mod content;
pub(super) mod header;
pub(super) mod read;

use super::items::{
	AttachedPictureFrame, BinaryFrame, CommentFrame, EncryptedMetaFrame, ExtendedTextFrame,
	ExtendedUrlFrame, PopularimeterFrame, PrivateFrame, RecommendedBufferSizeFrame,
	SynchronizedTextFrame, TextInformationFrame, UniqueFileIdentifierFrame,
	UnsynchronizedTextFrame, UrlLinkFrame,
};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::Id3v2Version;
use crate::id3::v2::util::registry::same_role;
use crate::util::text::TextEncoding;
use header::{FrameFlags, FrameId};

use std::borrow::Cow;

macro_rules! define_frames {
	(
		$(#[$meta:meta])*
		pub enum Frame {
			$(
				$(#[$field_meta:meta])+
				$variant:ident($type:ty),
			)*
		}
	) => {
		$(#[$meta])*
		pub enum Frame {
			$(
				$(#[$field_meta])+
				$variant($type),
			)*
		}

		impl Frame {
			/// Get the ID of the frame
			pub fn id(&self) -> &FrameId {
				match self {
					$(
						Frame::$variant(frame) => &frame.header.id,
					)*
				}
			}

			/// Get the flags for the frame
			pub fn flags(&self) -> FrameFlags {
				match self {
					$(
						Frame::$variant(frame) => frame.header.flags,
					)*
				}
			}

			/// Set the flags for the frame
			pub fn set_flags(&mut self, flags: FrameFlags) {
				match self {
					$(
						Frame::$variant(frame) => frame.header.flags = flags,
					)*
				}
			}

			/// Used for logging and errors
			pub(crate) fn name(&self) -> &'static str {
				match self {
					$(
						Frame::$variant(_) => stringify!($variant),
					)*
				}
			}
		}

		$(
			impl From<$type> for Frame {
				fn from(value: $type) -> Self {
					Frame::$variant(value)
				}
			}
		)*
	}
}

define_frames! {
	/// Represents an `ID3v2` frame
	///
	/// Frames are stored under their canonical ID, the newest ID for their role, regardless of
	/// the version they were read from. See [`registry`](crate::id3::v2::util::registry).
	///
	/// ## Unknown frames
	///
	/// Frames without a typed representation are kept as [`Frame::Binary`], and are written back
	/// untouched in any version their ID is valid for.
	#[non_exhaustive]
	#[derive(Clone, Debug, PartialEq, Eq, Hash)]
	pub enum Frame {
		/// Represents a "COMM" frame
		Comment(CommentFrame),
		/// Represents a "USLT" frame
		UnsynchronizedText(UnsynchronizedTextFrame),
		/// Represents a "T..." (excluding TXXX) frame
		Text(TextInformationFrame),
		/// Represents a "TXXX" frame
		UserText(ExtendedTextFrame),
		/// Represents a "W..." (excluding WXXX) frame
		Url(UrlLinkFrame),
		/// Represents a "WXXX" frame
		UserUrl(ExtendedUrlFrame),
		/// Represents an "APIC" or "PIC" frame
		Picture(AttachedPictureFrame),
		/// Represents a "POPM" frame
		Popularimeter(PopularimeterFrame),
		/// Represents a "UFID" frame
		UniqueFileIdentifier(UniqueFileIdentifierFrame),
		/// Represents a "PRIV" frame
		Private(PrivateFrame),
		/// Represents a "SYLT" frame
		SynchronizedText(SynchronizedTextFrame),
		/// Represents an "RBUF" frame
		RecommendedBufferSize(RecommendedBufferSizeFrame),
		/// Represents an ID3v2.2 "CRM" frame
		EncryptedMeta(EncryptedMetaFrame),
		/// Binary data
		///
		/// This is used for unknown frames, frames without a typed representation, and
		/// encrypted frames.
		Binary(BinaryFrame),
	}
}

impl Frame {
	/// Extract the string from the [`FrameId`]
	pub fn id_str(&self) -> &str {
		self.id().as_str()
	}

	/// The ID this frame is written with in `version`
	///
	/// Returns `None` if the frame cannot be represented in `version`, in which case it is
	/// dropped when saving.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::{Frame, FrameId, Id3v2Version, TextInformationFrame};
	/// use retag::TextEncoding;
	///
	/// # fn main() -> retag::error::Result<()> {
	/// let year: Frame =
	/// 	TextInformationFrame::new(FrameId::new("TDRC")?, TextEncoding::UTF8, "2004").into();
	///
	/// assert_eq!(year.resolve_id(Id3v2Version::V2).as_deref(), Some("TYE"));
	/// assert_eq!(year.resolve_id(Id3v2Version::V3).as_deref(), Some("TYER"));
	/// assert_eq!(year.resolve_id(Id3v2Version::V4).as_deref(), Some("TDRC"));
	/// # Ok(()) }
	/// ```
	pub fn resolve_id(&self, version: Id3v2Version) -> Option<Cow<'static, str>> {
		self.id().resolve(version)
	}

	// Used internally, has no correctness checks
	pub(crate) fn text(id: &'static str, content: String) -> Self {
		Frame::Text(TextInformationFrame::new(
			FrameId::from_static(id),
			TextEncoding::UTF8,
			content,
		))
	}

	/// Check for empty content
	///
	/// Returns `None` if the frame type has no notion of emptiness.
	pub fn is_empty(&self) -> Option<bool> {
		let is_empty = match self {
			Frame::Text(text) => text.value.is_empty(),
			Frame::UserText(extended_text) => extended_text.content.is_empty(),
			Frame::Url(link) => link.content.is_empty(),
			Frame::UserUrl(extended_url) => extended_url.content.is_empty(),
			Frame::Comment(comment) => comment.content.is_empty(),
			Frame::UnsynchronizedText(unsync_text) => unsync_text.content.is_empty(),
			Frame::SynchronizedText(sync_text) => sync_text.content.is_empty(),
			Frame::Picture(picture) => picture.picture.data.is_empty(),
			Frame::UniqueFileIdentifier(ufid) => ufid.identifier.is_empty(),
			Frame::Private(private) => private.private_data.is_empty(),
			Frame::EncryptedMeta(meta) => meta.encrypted_data.is_empty(),
			Frame::Binary(binary) => binary.data.is_empty(),
			Frame::Popularimeter(_) | Frame::RecommendedBufferSize(_) => return None,
		};

		Some(is_empty)
	}

	/// Whether `self` and `other` occupy the same slot in a tag
	///
	/// A tag holds at most one frame per slot. Most frames are identified by their role alone
	/// (`TYER` and `TDRC` share a slot), others by their ID and a content descriptor:
	///
	/// * `TXXX`, `WXXX`: description
	/// * `COMM`, `USLT`, `SYLT`: language and description
	/// * `APIC`: picture type and description
	/// * `POPM`: email
	/// * `UFID`, `PRIV`: owner
	///
	/// Binary frames never share a slot, since their content is unknown.
	pub fn same_slot(&self, other: &Frame) -> bool {
		match (self, other) {
			(Frame::Text(a), Frame::Text(b)) => same_role(a.header.id.as_str(), b.header.id.as_str()),
			(Frame::Url(a), Frame::Url(b)) => {
				// Commercial and artist URLs may appear once per URL
				same_role(a.header.id.as_str(), b.header.id.as_str())
					&& (!matches!(a.header.id.as_str(), "WCOM" | "WOAR") || a.content == b.content)
			},
			(Frame::UserText(a), Frame::UserText(b)) => a.description == b.description,
			(Frame::UserUrl(a), Frame::UserUrl(b)) => a.description == b.description,
			(Frame::Comment(a), Frame::Comment(b)) => {
				a.language == b.language && a.description == b.description
			},
			(Frame::UnsynchronizedText(a), Frame::UnsynchronizedText(b)) => {
				a.language == b.language && a.description == b.description
			},
			(Frame::SynchronizedText(a), Frame::SynchronizedText(b)) => {
				a.language == b.language && a.description == b.description
			},
			(Frame::Picture(a), Frame::Picture(b)) => {
				a.picture.pic_type == b.picture.pic_type
					&& a.picture.description == b.picture.description
			},
			(Frame::Popularimeter(a), Frame::Popularimeter(b)) => a.email == b.email,
			(Frame::UniqueFileIdentifier(a), Frame::UniqueFileIdentifier(b)) => a.owner == b.owner,
			(Frame::Private(a), Frame::Private(b)) => a.owner == b.owner,
			(Frame::RecommendedBufferSize(_), Frame::RecommendedBufferSize(_)) => true,
			(Frame::EncryptedMeta(a), Frame::EncryptedMeta(b)) => {
				a.owner_identifier == b.owner_identifier
			},
			_ => false,
		}
	}

	/// Serialize the frame body for `version`
	///
	/// NOTE: This does not include a frame header
	///
	/// # Errors
	///
	/// * Text cannot be encoded, see [`WriteOptions::lossy_text_encoding()`]
	/// * The frame cannot be written ([`ErrorKind::UnsupportedOperation`](crate::error::ErrorKind::UnsupportedOperation))
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		Ok(match self {
			Frame::Comment(comment) => comment.as_bytes(version, write_options)?,
			Frame::UnsynchronizedText(lf) => lf.as_bytes(version, write_options)?,
			Frame::Text(tif) => tif.as_bytes(version, write_options)?,
			Frame::UserText(content) => content.as_bytes(version, write_options)?,
			Frame::Url(link) => link.as_bytes(write_options)?,
			Frame::UserUrl(content) => content.as_bytes(version, write_options)?,
			Frame::Picture(attached_picture) => attached_picture.as_bytes(version, write_options)?,
			Frame::Popularimeter(popularimeter) => popularimeter.as_bytes(write_options)?,
			Frame::UniqueFileIdentifier(frame) => frame.as_bytes(write_options)?,
			Frame::Private(frame) => frame.as_bytes(write_options)?,
			Frame::SynchronizedText(frame) => frame.as_bytes(version, write_options)?,
			Frame::RecommendedBufferSize(frame) => frame.as_bytes(version)?,
			Frame::EncryptedMeta(frame) => frame.as_bytes(version)?,
			Frame::Binary(frame) => frame.as_bytes(),
		})
	}
}
