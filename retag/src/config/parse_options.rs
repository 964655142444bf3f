/// Options to control how tags are parsed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) read_cover_art: bool,
	pub(crate) implicit_conversions: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	read_cover_art: true,
	/// 	implicit_conversions: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			read_cover_art: true,
			implicit_conversions: true,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::config::{ParseOptions, ParsingMode};
	///
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether or not to read attached pictures
	///
	/// When disabled, picture frames and blocks are skipped entirely.
	pub fn read_cover_art(&mut self, read_cover_art: bool) -> Self {
		self.read_cover_art = read_cover_art;
		*self
	}

	/// Whether or not to upgrade ID3v2.3-only frames that have an ID3v2.4 equivalent
	///
	/// With this enabled, `TORY` is read as `TDOR` and `IPLS` as `TIPL`. The year frame `TYER`
	/// is always mapped to `TDRC`, since it is required for the year accessors.
	pub fn implicit_conversions(&mut self, implicit_conversions: bool) -> Self {
		self.implicit_conversions = implicit_conversions;
		*self
	}
}

/// The parsing strictness mode
///
/// This can be set with [`ParseOptions::parsing_mode`].
///
/// # Examples
///
/// ```rust,no_run
/// use retag::config::{ParseOptions, ParsingMode};
/// use retag::id3::v2::Id3v2Tag;
///
/// # fn main() -> retag::error::Result<()> {
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// let tag = Id3v2Tag::read_from_path("foo.mp3", parsing_options)?;
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// Headers that are inconsistent with the data following them are errors, as are frame
	/// identifiers containing invalid characters. Frames whose *content* cannot be decoded are
	/// still skipped, since a single damaged frame never invalidates a tag.
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// Invalid frame identifiers end frame parsing, and the frames read so far are kept.
	#[default]
	BestAttempt,
	/// Least eager to error, may produce invalid/partial output
	///
	/// Frame identifiers with invalid characters are skipped instead of ending the frame list.
	Relaxed,
}
