//! Syncsafe integers and the unsynchronization scheme
//!
//! An MPEG frame sync is 11 set bits, so a stray `0xFF 0xE0..` pair inside a tag could be
//! mistaken for audio by naive players. ID3v2 avoids this in two ways:
//!
//! * Sizes are stored as "syncsafe" integers, using only the lower 7 bits of every byte
//! * Frame content may be *unsynchronized*, inserting a `0x00` after `0xFF` bytes that would
//!   otherwise form a false sync
//!
//! # Examples
//!
//! ```rust
//! use retag::id3::v2::util::synchsafe::{resynchronize, unsynchronize, UnsynchronizationScheme};
//!
//! let content = [0xFF, 0xE2, 0x01, 0xFF, 0x00];
//! let unsynchronized = unsynchronize(&content, UnsynchronizationScheme::FalseSyncOnly);
//! assert_eq!(unsynchronized, [0xFF, 0x00, 0xE2, 0x01, 0xFF, 0x00, 0x00]);
//!
//! assert_eq!(resynchronize(&unsynchronized), content);
//! ```

use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};

/// The largest value a 4 byte syncsafe integer can hold (2^28 - 1)
pub const MAX_SYNCHSAFE_U32: u32 = 0x0FFF_FFFF;

/// An integer that can be converted to and from its syncsafe form
pub trait SynchsafeInteger: Sized {
	/// Convert `self` to its syncsafe form
	///
	/// # Errors
	///
	/// `self` needs more than 7 bits per byte of the integer type.
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> retag::error::Result<()> {
	/// let synch_number = 0xFFF_FFFF_u32.synch()?;
	/// assert_eq!(synch_number, 0x7F7F_7F7F);
	///
	/// assert!(0x1000_0000_u32.synch().is_err());
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Convert a syncsafe integer back to its plain value
	///
	/// The most significant bit of every byte is ignored.
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		if self > MAX_SYNCHSAFE_U32 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::SyncsafeOverflow(u64::from(self))).into());
		}

		Ok((self & 0x7F)
			| ((self & (0x7F << 7)) << 1)
			| ((self & (0x7F << 14)) << 2)
			| ((self & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3) | ((self & 0x7F_0000) >> 2) | ((self & 0x7F00) >> 1) | (self & 0x7F)
	}
}

/// Decode a 4 byte big endian syncsafe integer
pub fn decode_syncsafe(bytes: [u8; 4]) -> u32 {
	u32::from_be_bytes(bytes).unsynch()
}

/// Encode `value` as a 4 byte big endian syncsafe integer
///
/// # Errors
///
/// `value` is larger than [`MAX_SYNCHSAFE_U32`]
pub fn encode_syncsafe(value: u32) -> Result<[u8; 4]> {
	value.synch().map(u32::to_be_bytes)
}

/// Which `0xFF` bytes [`unsynchronize`] protects
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnsynchronizationScheme {
	/// Only `0xFF` bytes followed by a byte `>= 0xE0` or `0x00`, or at the end of the data
	///
	/// This is what ID3v2.2 and ID3v2.3 writers produce.
	FalseSyncOnly,
	/// A `0x00` is inserted after every `0xFF`
	Every,
}

/// Apply the unsynchronization scheme to `content`
///
/// The `0x00` that follows an existing `0xFF 0x00` pair is always inserted, otherwise the pair
/// would be indistinguishable from an inserted byte.
pub fn unsynchronize(content: &[u8], scheme: UnsynchronizationScheme) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len() + content.len() / 16);

	let mut bytes = content.iter().copied().peekable();
	while let Some(byte) = bytes.next() {
		out.push(byte);
		if byte != 0xFF {
			continue;
		}

		let needs_padding = match (scheme, bytes.peek()) {
			(UnsynchronizationScheme::Every, _) | (_, None) => true,
			(UnsynchronizationScheme::FalseSyncOnly, Some(&next)) => next >= 0xE0 || next == 0x00,
		};

		if needs_padding {
			out.push(0x00);
		}
	}

	out
}

/// Remove the unsynchronization scheme from `content`
///
/// Every `0x00` directly following a `0xFF` is dropped. A `0xFF 0x00 0x00` sequence decodes
/// to `0xFF 0x00`, since the second zero follows a removed byte.
pub fn resynchronize(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());

	let mut previous_ff = false;
	for &byte in content {
		if previous_ff && byte == 0x00 {
			previous_ff = false;
			continue;
		}

		previous_ff = byte == 0xFF;
		out.push(byte);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	// Small deterministic xorshift, enough to cover awkward byte patterns
	fn pseudo_random_bytes(seed: u32, len: usize) -> Vec<u8> {
		let mut state = seed | 1;
		(0..len)
			.map(|_| {
				state ^= state << 13;
				state ^= state >> 17;
				state ^= state << 5;
				// Bias towards the bytes that matter
				match state % 4 {
					0 => 0xFF,
					1 => 0x00,
					2 => 0xE0 | (state >> 8) as u8,
					_ => (state >> 16) as u8,
				}
			})
			.collect()
	}

	#[test_log::test]
	fn resynchronize_known_content() {
		let content = [0xFF, 0x00, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00, 0x00];
		assert_eq!(
			resynchronize(&content),
			[0xFF, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00]
		);
	}

	#[test_log::test]
	fn unsynchronize_only_false_syncs() {
		let content = [0xFF, 0x12, 0xFF, 0xFB, 0xFF];
		assert_eq!(
			unsynchronize(&content, UnsynchronizationScheme::FalseSyncOnly),
			[0xFF, 0x12, 0xFF, 0x00, 0xFB, 0xFF, 0x00]
		);
		assert_eq!(
			unsynchronize(&content, UnsynchronizationScheme::Every),
			[0xFF, 0x00, 0x12, 0xFF, 0x00, 0xFB, 0xFF, 0x00]
		);
	}

	#[test_log::test]
	fn unsynchronized_content_has_no_false_sync() {
		for seed in 0..64 {
			let content = pseudo_random_bytes(seed, 257);
			let unsynchronized = unsynchronize(&content, UnsynchronizationScheme::FalseSyncOnly);

			assert!(
				unsynchronized
					.windows(2)
					.all(|pair| !(pair[0] == 0xFF && pair[1] >= 0xE0))
			);
		}
	}

	#[test_log::test]
	fn resynchronize_inverts_unsynchronize() {
		let edge_cases: [&[u8]; 6] = [
			&[],
			&[0xFF],
			&[0xFF, 0x00],
			&[0xFF, 0x00, 0x00],
			&[0xFF, 0xFF, 0xFF],
			&[0x00, 0xFF, 0xE0, 0xFF, 0x00, 0xFF],
		];

		let generated = (0..256).map(|seed| pseudo_random_bytes(seed, (seed as usize * 7) % 300));

		for content in edge_cases.iter().map(|c| c.to_vec()).chain(generated) {
			for scheme in [
				UnsynchronizationScheme::FalseSyncOnly,
				UnsynchronizationScheme::Every,
			] {
				assert_eq!(resynchronize(&unsynchronize(&content, scheme)), content);
			}
		}
	}

	#[test_log::test]
	fn syncsafe_bounds() {
		for value in [0, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x0123_4567, MAX_SYNCHSAFE_U32] {
			let encoded = encode_syncsafe(value).unwrap();
			assert!(encoded.iter().all(|b| b & 0x80 == 0));
			assert_eq!(decode_syncsafe(encoded), value);
		}

		assert_eq!(encode_syncsafe(257).unwrap(), [0x00, 0x00, 0x02, 0x01]);
		assert!(encode_syncsafe(MAX_SYNCHSAFE_U32 + 1).is_err());
		assert!(encode_syncsafe(u32::MAX).is_err());
	}

	#[test_log::test]
	fn syncsafe_exhaustive_low_range() {
		for value in (0..=MAX_SYNCHSAFE_U32).step_by(4093) {
			assert_eq!(decode_syncsafe(encode_syncsafe(value).unwrap()), value);
		}
	}
}
