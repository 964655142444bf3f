//! Items shared by every tag format

mod accessor;

pub use accessor::Accessor;

/// The tag formats handled by this crate
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TagType {
	/// The legacy 128 byte tag at the end of a file
	Id3v1,
	/// Any ID3v2 version (2.2, 2.3, 2.4)
	Id3v2,
	/// APEv1 and APEv2
	Ape,
	/// Vorbis comments, as embedded in FLAC files
	VorbisComments,
}

/// Read the track number out of a `"N"` or `"N/M"` value
///
/// Anything that is not a number is treated as track `0`.
pub(crate) fn parse_track_number(value: &str) -> u32 {
	let number = value.split('/').next().unwrap_or_default();
	number.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use super::parse_track_number;

	#[test_log::test]
	fn track_numbers() {
		assert_eq!(parse_track_number("5"), 5);
		assert_eq!(parse_track_number(" 5/12"), 5);
		assert_eq!(parse_track_number("/12"), 0);
		assert_eq!(parse_track_number("five"), 0);
		assert_eq!(parse_track_number(""), 0);
	}
}
