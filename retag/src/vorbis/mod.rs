//! Vorbis comments
//!
//! A Vorbis comment block is a vendor string followed by an ordered list of `NAME=value` fields.
//! Field names are case-insensitive, and may appear any number of times.
//!
//! ## File notes
//!
//! The only host format handled here is FLAC, see [`crate::flac`].

pub(crate) mod read;
mod tag;
pub(crate) mod write;

pub use tag::VorbisComments;

/// The vendor string written when neither the file nor the tag provides one
pub const DEFAULT_VENDOR: &str = "retag";
