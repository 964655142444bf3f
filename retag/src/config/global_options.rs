use std::cell::Cell;

thread_local! {
	static GLOBAL_OPTIONS: Cell<GlobalOptions> = const { Cell::new(GlobalOptions::new()) };
}

pub(crate) fn global_options() -> GlobalOptions {
	GLOBAL_OPTIONS.with(Cell::get)
}

/// Options that apply to every read and write on the current thread
///
/// # Examples
///
/// ```rust
/// use retag::config::{GlobalOptions, apply_global_options};
///
/// // Cover art in these files is huge, allow twice the usual allocation
/// let global_options =
/// 	GlobalOptions::new().allocation_limit(GlobalOptions::DEFAULT_ALLOCATION_LIMIT * 2);
/// apply_global_options(global_options);
/// ```
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
#[non_exhaustive]
pub struct GlobalOptions {
	pub(crate) allocation_limit: usize,
}

impl GlobalOptions {
	/// Default allocation limit for any single tag item
	pub const DEFAULT_ALLOCATION_LIMIT: usize = 16 * 1024 * 1024;

	/// Creates a new `GlobalOptions`, alias for `Default` implementation
	#[must_use]
	pub const fn new() -> Self {
		Self {
			allocation_limit: Self::DEFAULT_ALLOCATION_LIMIT,
		}
	}

	/// The maximum number of bytes to allocate for any single tag item
	///
	/// Declared sizes are attacker controlled. Anything above this limit is rejected with
	/// [`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData) before allocating.
	pub fn allocation_limit(&mut self, allocation_limit: usize) -> Self {
		self.allocation_limit = allocation_limit;
		*self
	}
}

impl Default for GlobalOptions {
	/// The default implementation for `GlobalOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// GlobalOptions {
	/// 	allocation_limit: Self::DEFAULT_ALLOCATION_LIMIT,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

/// Applies the given `GlobalOptions` to the current thread
pub fn apply_global_options(options: GlobalOptions) {
	GLOBAL_OPTIONS.with(|global_options| global_options.set(options));
}
