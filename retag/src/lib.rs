//! Read and rewrite audio metadata without disturbing the audio.
//!
//! # Supported tags
//!
//! | Tag              | Read | Write | Notes                                          |
//! |------------------|------|-------|------------------------------------------------|
//! | ID3v2            | X    | X     | Versions 2.2, 2.3 and 2.4, see [`id3::v2`]     |
//! | ID3v1            | X    | X     | ID3v1.0 and ID3v1.1, see [`id3::v1`]           |
//! | APE              | X    | X     | APEv1 is read, APEv2 is written, see [`ape`]   |
//! | Vorbis comments  | X    | X     | Embedded in FLAC, see [`flac`] and [`vorbis`]  |
//!
//! # Examples
//!
//! ## Reading the common fields of any file
//!
//! ```rust,no_run
//! # fn main() -> retag::error::Result<()> {
//! use retag::config::ParseOptions;
//! use retag::simple::SimpleTag;
//!
//! let tag = SimpleTag::read_from_path("test.mp3", ParseOptions::new())?;
//!
//! println!("Title: {:?}", tag.title());
//! println!("Track: {}", tag.track_number());
//! # Ok(())
//! # }
//! ```
//!
//! ## Using a concrete tag
//!
//! ```rust,no_run
//! # fn main() -> retag::error::Result<()> {
//! use retag::config::{ParseOptions, WriteOptions};
//! use retag::id3::v2::{Id3v2Tag, Id3v2Version};
//! use retag::tag::Accessor;
//!
//! let path = "test.mp3";
//! let mut tag = Id3v2Tag::read_from_path(path, ParseOptions::new())?.unwrap_or_default();
//!
//! tag.set_artist(String::from("Foo artist"));
//!
//! // Tags are written in their current version, regardless of the version that was read
//! tag.set_version(Id3v2Version::V3);
//! tag.save_to_path(path, WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Rewriting files
//!
//! Tags at the end of a file are written in place. Tags at the start of a file are written in
//! place when they fit in the space (padding included) of the existing tag, otherwise the file is
//! rewritten through a temporary file. See [`rewrite`] for what happens when that goes wrong.
//!
//! # Important format-specific notes
//!
//! All formats have their own quirks. Be sure to read the module documentation of each format.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub(crate) mod macros;
pub mod picture;
pub mod rewrite;
pub mod simple;
pub mod tag;
mod util;

pub mod ape;
pub mod flac;
pub mod id3;
pub mod vorbis;

pub use util::text::TextEncoding;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use retag::prelude::*;
	//! ```

	pub use crate::simple::SimpleTag;
	pub use crate::tag::{Accessor, TagType};
}
