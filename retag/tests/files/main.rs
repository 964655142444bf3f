#![allow(missing_docs)]

mod ape;
mod flac;
mod id3v1;
mod id3v2;
mod simple;
mod util;
