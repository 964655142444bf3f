#![allow(missing_docs)]

mod accessors;
mod id3v2;
