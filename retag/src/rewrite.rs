//! Crash-safe file rewriting
//!
//! Tags that change size at a fixed offset (ID3v2 at the start of a file, FLAC metadata blocks)
//! cannot be updated without shifting the audio that follows them. Rather than shifting bytes
//! in place, the original file is renamed aside, a new file is written under the original path,
//! and the renamed original is deleted once the new file is complete.
//!
//! If the rewrite fails after the rename, the original is left untouched under its temporary
//! name and an [`ErrorKind::InterruptedRewrite`](crate::error::ErrorKind::InterruptedRewrite) is
//! returned, carrying that name.

use crate::error::{InterruptedRewriteError, Result};
use crate::util::io::copy_exact;

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMPORARY_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Build an unused temporary path next to `path`
///
/// The name is made of the original path, the process ID, a nanosecond timestamp and a
/// process-wide counter, so two rewrites never pick the same name. It lives in the same
/// directory as `path`, keeping the rename on a single filesystem.
///
/// # Errors
///
/// Every candidate name is already taken
///
/// # Examples
///
/// ```rust
/// use retag::rewrite::temporary_path_for;
/// use std::path::Path;
///
/// # fn main() -> retag::error::Result<()> {
/// let temp = temporary_path_for(Path::new("music/song.flac"))?;
/// assert_eq!(temp.parent(), Some(Path::new("music")));
/// assert!(temp.to_string_lossy().starts_with("music/song.flac."));
/// # Ok(()) }
/// ```
pub fn temporary_path_for(path: &Path) -> Result<PathBuf> {
	const ATTEMPTS: usize = 100;

	let pid = std::process::id();
	for _ in 0..ATTEMPTS {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|elapsed| elapsed.as_nanos())
			.unwrap_or_default();
		let counter = TEMPORARY_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);

		let mut name = OsString::from(path.as_os_str());
		name.push(format!(".{pid}-{nanos}-{counter}.tmp"));

		let candidate = PathBuf::from(name);
		if !candidate.exists() {
			return Ok(candidate);
		}
	}

	Err(std::io::Error::new(
		std::io::ErrorKind::AlreadyExists,
		"unable to find an unused temporary file name",
	)
	.into())
}

/// Rewrite the file at `path` through `write`
///
/// `write` receives the original file (positioned at its start) and the new, empty file that
/// replaces it.
pub(crate) fn rewrite_with<F>(path: &Path, write: F) -> Result<()>
where
	F: FnOnce(&mut File, &mut File) -> std::io::Result<()>,
{
	let backup = temporary_path_for(path)?;

	log::debug!(
		"Rewriting \"{}\", original moved to \"{}\"",
		path.display(),
		backup.display()
	);
	std::fs::rename(path, &backup)?;

	let result = (|| -> std::io::Result<()> {
		let mut original = File::open(&backup)?;
		let permissions = original.metadata()?.permissions();

		let mut new = OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(path)?;
		new.set_permissions(permissions)?;

		write(&mut original, &mut new)?;
		new.flush()?;
		new.sync_all()
	})();

	if let Err(err) = result {
		log::error!(
			"Failed to rewrite \"{}\", the original is kept at \"{}\": {}",
			path.display(),
			backup.display(),
			err
		);
		return Err(InterruptedRewriteError::new(backup, err).into());
	}

	if let Err(err) = std::fs::remove_file(&backup) {
		log::warn!(
			"Rewrote \"{}\", but failed to remove \"{}\": {}",
			path.display(),
			backup.display(),
			err
		);
	}

	Ok(())
}

/// Replace `old_len` bytes at `start` in the file at `path` with `new_bytes`
///
/// Regions of equal size are overwritten in place. Anything else rewrites the whole file,
/// copying the bytes around the region untouched.
pub(crate) fn replace_region(path: &Path, start: u64, old_len: u64, new_bytes: &[u8]) -> Result<()> {
	if new_bytes.len() as u64 == old_len {
		log::debug!("Replacing {} bytes at offset {} in place", old_len, start);

		let mut file = OpenOptions::new().write(true).open(path)?;
		file.seek(SeekFrom::Start(start))?;
		file.write_all(new_bytes)?;
		file.flush()?;
		return Ok(());
	}

	log::debug!(
		"Region at offset {} changes size ({} -> {}), rewriting the file",
		start,
		old_len,
		new_bytes.len()
	);

	rewrite_with(path, |original, new| {
		copy_exact(original, new, start)?;
		new.write_all(new_bytes)?;

		original.seek(SeekFrom::Start(start + old_len))?;
		std::io::copy(original, new)?;
		Ok(())
	})
}
