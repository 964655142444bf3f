/// Options to control how tags are written
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) lossy_text_encoding: bool,
	pub(crate) respect_read_only: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 2000;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			lossy_text_encoding: true,
			respect_read_only: true,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// This is the size of the padding reservoir left behind whenever a tag region has to grow,
	/// so that later edits can be written in place. A value of `0` disables padding.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::config::WriteOptions;
	///
	/// // Leave plenty of room for future edits
	/// let options = WriteOptions::new().preferred_padding(8192);
	///
	/// // ...Or no padding at all
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to replace characters that cannot be represented in the target text encoding
	///
	/// When enabled, unrepresentable characters become `?`. Otherwise the write fails with
	/// [`ErrorKind::TextEncode`](crate::error::ErrorKind::TextEncode).
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}

	/// Whether to respect read-only flags on an existing tag
	///
	/// APEv2 tags can be marked read-only as a whole, or per item. When this is set, attempting to
	/// overwrite a read-only tag fails with [`ErrorKind::UnsupportedOperation`](crate::error::ErrorKind::UnsupportedOperation),
	/// and read-only items keep their existing values.
	pub fn respect_read_only(mut self, respect_read_only: bool) -> Self {
		self.respect_read_only = respect_read_only;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     preferred_padding: 2000,
	///     lossy_text_encoding: true,
	///     respect_read_only: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
