//! APE specific items
//!
//! ## Tag placement
//!
//! APEv1 and APEv2 tags live at the end of a file, before an optional ID3v1 tag. A tag is
//! located through its 32 byte footer, searched for at `EOF - 32`, then at `EOF - 160` (skipping
//! an ID3v1 tag). APEv1 tags (version 1000) are read, but an APEv2 tag (version 2000, with a
//! header) is always written.
pub(crate) mod constants;
pub(crate) mod header;
pub(crate) mod tag;

// Exports

pub use tag::ApeTag;
pub use tag::gain::{Mp3GainItems, ReplayGainItems};
pub use tag::item::{ApeItem, ApeItemValue};
