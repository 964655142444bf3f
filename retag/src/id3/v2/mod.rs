//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]
//!
//! Frames are written for the tag's [`Id3v2Version`], which may differ from the version that was
//! read. Frames with no identifier in the target version are dropped on save, see
//! [`Frame::resolve_id`].

mod frame;
pub(crate) mod header;
mod items;
pub(crate) mod read;
pub(crate) mod tag;
pub mod util;
pub(crate) mod write;

// Exports

pub use header::{Id3v2TagFlags, Id3v2Version};

pub use tag::Id3v2Tag;

pub use items::*;

pub use frame::Frame;
pub use frame::header::{FrameFlags, FrameHeader, FrameId};
pub use frame::read::PartialFrame;
