//! Errors raised while reading or rewriting tags
//!
//! Every fallible operation returns [`RetagError`], whose [`ErrorKind`] decides how a caller
//! should react. The kinds fall into four groups:
//!
//! * Format errors: the data on disk is malformed ([`RetagError::is_format_error`])
//! * Unsupported operations: a frame or tag cannot be written in the requested form
//!   ([`RetagError::is_unsupported_operation`])
//! * I/O errors, passed through unchanged
//! * [`ErrorKind::InterruptedRewrite`], a file rewrite that failed after the original was moved aside
//!
//! Frames that fail to parse inside an otherwise valid ID3v2 tag never surface as errors, see
//! [`PartialFrame`](crate::id3::v2::PartialFrame).

use crate::tag::TagType;
pub use crate::util::text::TextEncodingError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

/// Alias for `Result<T, RetagError>`
pub type Result<T> = std::result::Result<T, RetagError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// File data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// An item declared a size that is too big or too small to be valid in its context
	SizeMismatch,
	/// Errors that occur while decoding a tag or its host file
	FileDecoding(FileDecodingError),
	/// Errors that occur while encoding a tag or its host file
	FileEncoding(FileEncodingError),

	// Picture related errors
	/// Provided an invalid picture
	NotAPicture,

	// Tag related errors
	/// A tag signature was found, but the data following it is not a tag
	FakeTag,
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Errors that arise while encoding text
	TextEncode(TextEncodingError),
	/// Errors that arise while reading/writing ID3v2 tags
	Id3v2(Id3v2Error),
	/// A frame or tag cannot be written in the requested form
	UnsupportedOperation(UnsupportedOperationError),

	// Rewriting
	/// A rewrite failed after the original file was moved aside
	InterruptedRewrite(InterruptedRewriteError),

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Unable to convert bytes to a str
	StrFromUtf8(std::str::Utf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// The types of errors that can occur while interacting with ID3v2 tags
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	// Header
	/// Arises when an invalid ID3v2 version is found
	BadId3v2Version(u8, u8),
	/// Arises when a compressed ID3v2.2 tag is encountered
	///
	/// No compression scheme was ever defined for ID3v2.2, so these tags cannot be read.
	V2Compression,
	/// Arises when an extended header has an invalid size
	BadExtendedHeaderSize,
	/// Arises when a size does not fit in a syncsafe integer (2^28 - 1)
	SyncsafeOverflow(u64),

	// Frame
	/// Arises when a frame ID contains invalid characters (must be within `'A'..'Z'` or `'0'..'9'`)
	/// or if the ID is too short/long.
	BadFrameId(Vec<u8>),
	/// Arises when a frame doesn't have enough data
	BadFrameLength,
	/// Arises when reading a compressed or encrypted ID3v2.4 frame with no data length indicator
	MissingDataLengthIndicator,
	/// Arises when a text encoding other than Latin-1 or UTF-16 appears in an ID3v2.2 tag
	V2InvalidTextEncoding,
	/// Arises when an unknown text encoding byte is encountered
	BadTextEncoding(u8),
	/// Arises when invalid data is encountered while reading a synchronized text frame
	BadSyncText,
	/// Arises when decoding a unique file identifier frame with no owner
	MissingUfidOwner,

	// Compression
	#[cfg(feature = "id3v2_compression_support")]
	/// Arises when a compressed frame is unable to be decompressed
	Decompression(std::io::Error),
	#[cfg(not(feature = "id3v2_compression_support"))]
	/// Arises when a compressed frame is encountered, but support is disabled
	CompressedFrameEncountered,

	// Writing
	/// Arises when attempting to write an encrypted frame with an invalid encryption method symbol (must be >= 0x80, lower values are reserved)
	InvalidEncryptionMethodSymbol(u8),
	/// Arises when attempting to write a comment or lyrics frame with an invalid language
	InvalidLanguage([u8; 3]),
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			// Header
			Self::BadId3v2Version(major, minor) => write!(
				f,
				"Found an invalid version (v{major}.{minor}), expected any major revision in: (2, \
				 3, 4)"
			),
			Self::V2Compression => write!(f, "Encountered a compressed ID3v2.2 tag"),
			Self::BadExtendedHeaderSize => {
				write!(f, "Found an extended header with an invalid size")
			},
			Self::SyncsafeOverflow(value) => {
				write!(f, "{value} does not fit in a syncsafe integer")
			},

			// Frame
			Self::BadFrameId(frame_id) => write!(f, "Failed to parse a frame ID: 0x{frame_id:x?}"),
			Self::BadFrameLength => write!(
				f,
				"Frame isn't long enough to extract the necessary information"
			),
			Self::MissingDataLengthIndicator => write!(
				f,
				"Encountered a compressed or encrypted frame without a data length indicator"
			),
			Self::V2InvalidTextEncoding => {
				write!(f, "ID3v2.2 only supports Latin-1 and UTF-16 encodings")
			},
			Self::BadTextEncoding(byte) => write!(f, "Found an invalid text encoding: {byte}"),
			Self::BadSyncText => write!(f, "Encountered invalid data in SYLT frame"),
			Self::MissingUfidOwner => write!(f, "Missing owner in UFID frame"),

			// Compression
			#[cfg(feature = "id3v2_compression_support")]
			Self::Decompression(err) => write!(f, "Failed to decompress frame: {err}"),
			#[cfg(not(feature = "id3v2_compression_support"))]
			Self::CompressedFrameEncountered => write!(
				f,
				"Encountered a compressed ID3v2 frame, support is disabled"
			),

			// Writing
			Self::InvalidEncryptionMethodSymbol(symbol) => write!(
				f,
				"Attempted to write an encrypted frame with an invalid method symbol ({symbol})"
			),
			Self::InvalidLanguage(lang) => write!(
				f,
				"Invalid frame language found: {lang:?} (expected 3 ascii characters)"
			),
		}
	}
}

/// An error that arises while interacting with an ID3v2 tag
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Create a new `Id3v2Error` from an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`Id3v2ErrorKind`]
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {:?}", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

/// An error that arises while decoding a tag or its host file
pub struct FileDecodingError {
	format: Option<TagType>,
	description: &'static str,
}

impl FileDecodingError {
	/// Create a `FileDecodingError` from a [`TagType`] and description
	#[must_use]
	pub const fn new(format: TagType, description: &'static str) -> Self {
		Self {
			format: Some(format),
			description,
		}
	}

	/// Create a `FileDecodingError` without binding it to a [`TagType`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			format: None,
			description,
		}
	}

	/// Returns the associated [`TagType`], if one exists
	pub fn format(&self) -> Option<TagType> {
		self.format
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.format {
			Some(format) => write!(f, "{:?}: {:?}", format, self.description),
			None => write!(f, "{:?}", self.description),
		}
	}
}

impl Display for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.format {
			Some(format) => write!(f, "{:?}: {}", format, self.description),
			None => write!(f, "{}", self.description),
		}
	}
}

/// An error that arises while encoding a tag or its host file
pub struct FileEncodingError {
	format: Option<TagType>,
	description: &'static str,
}

impl FileEncodingError {
	/// Create a `FileEncodingError` from a [`TagType`] and description
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::error::FileEncodingError;
	/// use retag::tag::TagType;
	///
	/// let ape_error = FileEncodingError::new(TagType::Ape, "Something went wrong in the APE tag!");
	/// assert_eq!(ape_error.format(), Some(TagType::Ape));
	/// ```
	#[must_use]
	pub const fn new(format: TagType, description: &'static str) -> Self {
		Self {
			format: Some(format),
			description,
		}
	}

	/// Create a `FileEncodingError` without binding it to a [`TagType`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			format: None,
			description,
		}
	}

	/// Returns the associated [`TagType`], if one exists
	pub fn format(&self) -> Option<TagType> {
		self.format
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileEncodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.format {
			Some(format) => write!(f, "{:?}: {:?}", format, self.description),
			None => write!(f, "{:?}", self.description),
		}
	}
}

impl Display for FileEncodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.format {
			Some(format) => write!(f, "{:?}: {}", format, self.description),
			None => write!(f, "{}", self.description),
		}
	}
}

/// A frame or tag that cannot be serialized in the requested form
///
/// This is distinct from a frame being *omitted*: frames with no identifier in the target
/// version are silently dropped, while this error is raised for roles that exist in the
/// target version but whose writer is not implemented.
pub struct UnsupportedOperationError {
	id: String,
	reason: &'static str,
}

impl UnsupportedOperationError {
	/// Create an `UnsupportedOperationError` for the item identified by `id`
	#[must_use]
	pub fn new(id: impl Into<String>, reason: &'static str) -> Self {
		Self {
			id: id.into(),
			reason,
		}
	}

	/// The identifier of the offending frame or item
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Why the operation is unsupported
	pub fn reason(&self) -> &str {
		self.reason
	}
}

impl Debug for UnsupportedOperationError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}: {:?}", self.id, self.reason)
	}
}

impl Display for UnsupportedOperationError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "\"{}\": {}", self.id, self.reason)
	}
}

/// A file rewrite that failed after the original file was renamed aside
///
/// The original contents are intact at [`InterruptedRewriteError::backup`]. The path that was
/// being rewritten may hold a partially written file.
pub struct InterruptedRewriteError {
	backup: PathBuf,
	source: std::io::Error,
}

impl InterruptedRewriteError {
	pub(crate) fn new(backup: PathBuf, source: std::io::Error) -> Self {
		Self { backup, source }
	}

	/// The location of the untouched original file
	pub fn backup(&self) -> &Path {
		&self.backup
	}

	/// The I/O error that interrupted the rewrite
	pub fn source(&self) -> &std::io::Error {
		&self.source
	}
}

impl Debug for InterruptedRewriteError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?} (original kept at {:?})", self.source, self.backup)
	}
}

impl Display for InterruptedRewriteError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Rewrite interrupted: {} (original kept at \"{}\")",
			self.source,
			self.backup.display()
		)
	}
}

/// Errors that could occur within retag
pub struct RetagError {
	pub(crate) kind: ErrorKind,
}

impl RetagError {
	/// Create a `RetagError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::error::{ErrorKind, RetagError};
	///
	/// let fake_tag = RetagError::new(ErrorKind::FakeTag);
	/// assert!(fake_tag.is_format_error());
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether this error was caused by malformed data
	pub fn is_format_error(&self) -> bool {
		matches!(
			self.kind,
			ErrorKind::TooMuchData
				| ErrorKind::SizeMismatch
				| ErrorKind::FileDecoding(_)
				| ErrorKind::NotAPicture
				| ErrorKind::FakeTag
				| ErrorKind::TextDecode(_)
				| ErrorKind::Id3v2(_)
				| ErrorKind::StringFromUtf8(_)
				| ErrorKind::StrFromUtf8(_)
		)
	}

	/// Whether this error was raised for an operation that cannot be performed
	pub fn is_unsupported_operation(&self) -> bool {
		matches!(self.kind, ErrorKind::UnsupportedOperation(_))
	}
}

impl std::error::Error for RetagError {}

impl Debug for RetagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<Id3v2Error> for RetagError {
	fn from(input: Id3v2Error) -> Self {
		Self {
			kind: ErrorKind::Id3v2(input),
		}
	}
}

impl From<FileDecodingError> for RetagError {
	fn from(input: FileDecodingError) -> Self {
		Self {
			kind: ErrorKind::FileDecoding(input),
		}
	}
}

impl From<FileEncodingError> for RetagError {
	fn from(input: FileEncodingError) -> Self {
		Self {
			kind: ErrorKind::FileEncoding(input),
		}
	}
}

impl From<UnsupportedOperationError> for RetagError {
	fn from(input: UnsupportedOperationError) -> Self {
		Self {
			kind: ErrorKind::UnsupportedOperation(input),
		}
	}
}

impl From<InterruptedRewriteError> for RetagError {
	fn from(input: InterruptedRewriteError) -> Self {
		Self {
			kind: ErrorKind::InterruptedRewrite(input),
		}
	}
}

impl From<TextEncodingError> for RetagError {
	fn from(input: TextEncodingError) -> Self {
		Self {
			kind: ErrorKind::TextEncode(input),
		}
	}
}

impl From<std::io::Error> for RetagError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for RetagError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::str::Utf8Error> for RetagError {
	fn from(input: std::str::Utf8Error) -> Self {
		Self {
			kind: ErrorKind::StrFromUtf8(input),
		}
	}
}

impl From<TryReserveError> for RetagError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for RetagError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for RetagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::StrFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::NotAPicture => write!(f, "Picture: Encountered invalid data"),
			ErrorKind::FakeTag => write!(f, "Reading: Expected a tag, found invalid data"),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(message) => write!(f, "Text encoding: {message}"),
			ErrorKind::Id3v2(ref id3v2_err) => write!(f, "{id3v2_err}"),
			ErrorKind::UnsupportedOperation(ref err) => write!(f, "Unsupported operation: {err}"),
			ErrorKind::InterruptedRewrite(ref err) => write!(f, "{err}"),

			// Files
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
			ErrorKind::FileDecoding(ref file_decode_err) => write!(f, "{file_decode_err}"),
			ErrorKind::FileEncoding(ref file_encode_err) => write!(f, "{file_encode_err}"),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}
