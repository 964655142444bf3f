//! Loudness normalization items
//!
//! ReplayGain and MP3Gain store their results as plain text items, grouped by key prefix.

use super::{ApeItem, ApeTag};

// Generates a struct with one optional text field per item key, along with the code to
// collect it from a tag and to store it back
macro_rules! gain_items {
	(
		$(#[$meta:meta])*
		$name:ident {
			$($(#[$field_meta:meta])* $field:ident => $key:literal),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Default, Clone, PartialEq, Eq)]
		pub struct $name {
			$(
				$(#[$field_meta])*
				pub $field: Option<String>,
			)+
		}

		impl $name {
			/// The keys handled by this collection, in order
			pub const KEYS: &'static [&'static str] = &[$($key),+];

			/// Whether no item is set
			pub fn is_empty(&self) -> bool {
				true $(&& self.$field.is_none())+
			}

			pub(super) fn from_tag(tag: &ApeTag) -> Self {
				Self {
					$($field: tag.get_text($key).map(str::to_owned),)+
				}
			}

			pub(super) fn store(self, tag: &mut ApeTag) {
				tag.items.retain(|item| {
					!Self::KEYS.iter().any(|key| item.key().eq_ignore_ascii_case(key))
				});

				$(
					if let Some(value) = self.$field {
						tag.insert(ApeItem::text($key, value));
					}
				)+
			}
		}
	};
}

gain_items! {
	/// The ReplayGain items of a tag (`REPLAYGAIN_*`)
	ReplayGainItems {
		/// The track gain, e.g. "-7.03 dB"
		track_gain => "REPLAYGAIN_TRACK_GAIN",
		/// The track peak, e.g. "1.000000"
		track_peak => "REPLAYGAIN_TRACK_PEAK",
		/// The album gain
		album_gain => "REPLAYGAIN_ALBUM_GAIN",
		/// The album peak
		album_peak => "REPLAYGAIN_ALBUM_PEAK",
	}
}

gain_items! {
	/// The MP3Gain items of a tag (`MP3GAIN_*`)
	Mp3GainItems {
		/// The minimum and maximum global gain of the track, e.g. "101,183"
		min_max => "MP3GAIN_MINMAX",
		/// The minimum and maximum global gain of the album
		album_min_max => "MP3GAIN_ALBUM_MINMAX",
		/// The information needed to undo the gain change, e.g. "+002,+002,N"
		undo => "MP3GAIN_UNDO",
	}
}
