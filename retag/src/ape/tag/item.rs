use crate::ape::constants::INVALID_KEYS;
use crate::error::Result;
use crate::macros::decode_err;

/// The value of an [`ApeItem`]
///
/// The item type is stored in bits 1-2 of the item flags.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum ApeItemValue {
	/// UTF-8 text (type 0)
	Text(String),
	/// Arbitrary binary data (type 1)
	Binary(Vec<u8>),
	/// A UTF-8 link to external data (type 2)
	Locator(String),
}

impl ApeItemValue {
	/// The text of a text item
	pub fn text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Whether the value holds no data
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Text(text) | Self::Locator(text) => text.is_empty(),
			Self::Binary(data) => data.is_empty(),
		}
	}

	pub(crate) fn as_bytes(&self) -> &[u8] {
		match self {
			Self::Text(text) | Self::Locator(text) => text.as_bytes(),
			Self::Binary(data) => data,
		}
	}

	pub(crate) fn type_flags(&self) -> u32 {
		match self {
			Self::Text(_) => 0,
			Self::Binary(_) => 1 << 1,
			Self::Locator(_) => 2 << 1,
		}
	}
}

/// Represents an `APE` tag item
///
/// The restrictions for `APE` lie in the key rather than the value,
/// so these are still able to use [`ApeItemValue`]s
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct ApeItem {
	/// Whether or not to mark the item as read only
	pub read_only: bool,
	pub(crate) key: String,
	pub(crate) value: ApeItemValue,
}

impl ApeItem {
	/// Create an [`ApeItem`]
	///
	/// # Errors
	///
	/// * `key` is illegal ("ID3", "TAG", "OGGS", "MP+")
	/// * `key` has a bad length (must be 2 to 255, inclusive)
	/// * `key` contains invalid characters (must be in the range 0x20 to 0x7E, inclusive)
	///
	/// # Examples
	///
	/// ```rust
	/// use retag::ape::{ApeItem, ApeItemValue};
	///
	/// # fn main() -> retag::error::Result<()> {
	/// let item = ApeItem::new(String::from("Title"), ApeItemValue::Text(String::from("Foo")))?;
	/// assert_eq!(item.key(), "Title");
	///
	/// assert!(ApeItem::new(String::from("TAG"), ApeItemValue::Text(String::new())).is_err());
	/// # Ok(()) }
	/// ```
	pub fn new(key: String, value: ApeItemValue) -> Result<Self> {
		if INVALID_KEYS.contains(&&*key.to_uppercase()) {
			decode_err!(@BAIL Ape, "APE tag item contains an illegal key");
		}

		if !(2..=255).contains(&key.len()) {
			decode_err!(@BAIL Ape, "APE tag item key has an invalid length (< 2 || > 255)");
		}

		if key.chars().any(|c| !(0x20..=0x7E).contains(&u32::from(c))) {
			decode_err!(@BAIL Ape, "APE tag item key contains invalid characters");
		}

		Ok(Self {
			read_only: false,
			key,
			value,
		})
	}

	/// Create a text item, the key is assumed to be valid
	pub(crate) fn text(key: &str, value: String) -> Self {
		Self {
			read_only: false,
			key: key.to_owned(),
			value: ApeItemValue::Text(value),
		}
	}

	/// Returns the item key
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the item value
	pub fn value(&self) -> &ApeItemValue {
		&self.value
	}

	/// Consumes the item, returning its value
	pub fn into_value(self) -> ApeItemValue {
		self.value
	}
}
