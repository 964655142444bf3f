//! A format independent view of a file's tags
//!
//! [`SimpleTag`] merges the tags of a file into a single set of common fields:
//!
//! * An ID3v2 tag provides the baseline
//! * An ID3v1 tag fills in the fields the ID3v2 tag left blank
//! * In FLAC files, the Vorbis comments override everything else
//!
//! Saving writes the fields back in the representation each format expects. FLAC files get
//! Vorbis comments only (any ID3 tags are stripped), every other file gets an ID3v2 and an ID3v1 tag.

use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::flac::{FlacFile, is_flac};
use crate::id3::v1::Id3v1Tag;
use crate::id3::v2::Id3v2Tag;
use crate::tag::{Accessor, parse_track_number};
use crate::vorbis::VorbisComments;

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

// Generates the getters and setters of the merged fields, along with the code to copy them
// from and to any `Accessor`
macro_rules! simple_fields {
	($($name:ident),+ $(,)?) => {
		paste::paste! {
			impl SimpleTag {
				$(
					#[doc = "Returns the " $name]
					pub fn $name(&self) -> Option<&str> {
						self.$name.as_deref()
					}

					#[doc = "Sets the " $name ", returning the previous value"]
					///
					/// An empty value is the same as `None`.
					pub fn [<set_ $name>](&mut self, value: Option<String>) -> Option<String> {
						std::mem::replace(&mut self.$name, value.filter(|value| !value.is_empty()))
					}
				)+

				// Take every field `tag` has, keeping the current value where it has none
				fn fill_blanks_from(&mut self, tag: &impl Accessor) {
					$(
						if self.$name.is_none() {
							self.$name = non_empty(tag.$name());
						}
					)+
				}

				// Take every field from `tag`, even the ones it doesn't have
				fn override_from(&mut self, tag: &impl Accessor) {
					$(
						self.$name = non_empty(tag.$name());
					)+
				}

				fn apply_to(&self, tag: &mut impl Accessor) {
					$(
						match &self.$name {
							Some(value) => tag.[<set_ $name>](value.clone()),
							None => tag.[<remove_ $name>](),
						}
					)+
				}
			}
		}
	};
}

/// The merged tags of a file
///
/// # Examples
///
/// ```rust,no_run
/// use retag::config::{ParseOptions, WriteOptions};
/// use retag::simple::SimpleTag;
///
/// # fn main() -> retag::error::Result<()> {
/// let mut tag = SimpleTag::read_from_path("song.mp3", ParseOptions::new())?;
/// println!("Found: {}", tag.tag_version().unwrap_or("no tags"));
///
/// let previous = tag.set_title(Some(String::from("New title")));
/// println!("Replacing {previous:?}");
///
/// tag.save(WriteOptions::default())?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleTag {
	path: PathBuf,
	parse_options: ParseOptions,
	title: Option<String>,
	artist: Option<String>,
	album: Option<String>,
	year: Option<String>,
	genre: Option<String>,
	track: Option<String>,
	comment: Option<String>,
	tag_version: Option<String>,
}

simple_fields!(title, artist, album, year, genre, track, comment);

impl SimpleTag {
	/// Read and merge the tags of the file at `path`
	///
	/// # Errors
	///
	/// * The file cannot be read
	/// * A tag is malformed, see [`Id3v2Tag::read_from`], [`Id3v1Tag::read_from`] and
	///   [`FlacFile::read_from`]
	pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let mut reader = BufReader::new(File::open(path)?);

		let mut tag = Self {
			path: path.to_path_buf(),
			parse_options,
			title: None,
			artist: None,
			album: None,
			year: None,
			genre: None,
			track: None,
			comment: None,
			tag_version: None,
		};

		tag.read_from(&mut reader)?;
		Ok(tag)
	}

	fn read_from<R>(&mut self, reader: &mut R) -> Result<()>
	where
		R: Read + Seek,
	{
		let mut versions = Vec::new();

		if let Some(id3v2) = Id3v2Tag::read_from(reader, self.parse_options)? {
			log::debug!("SimpleTag: Using {} as the baseline", id3v2.original_version());
			self.fill_blanks_from(&id3v2);
			versions.push(id3v2.original_version().to_string());
		}

		if let Some(id3v1) = Id3v1Tag::read_from(reader, self.parse_options.parsing_mode)? {
			self.fill_blanks_from(&id3v1);
			versions.push(id3v1.version().to_string());
		}

		if is_flac(reader)? {
			reader.rewind()?;
			let flac = FlacFile::read_from(reader, self.parse_options)?;
			if let Some(vorbis_comments) = flac.vorbis_comments() {
				log::debug!("SimpleTag: Vorbis comments override all other tags");
				self.override_from(vorbis_comments);
				versions.push(String::from("Vorbis Comment"));
			}
		}

		self.tag_version = (!versions.is_empty()).then(|| versions.join(", "));
		Ok(())
	}

	/// Returns the path of the file the tag was read from
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Describes the tags found in the file, e.g. `"ID3v2.3, ID3v1.1"`
	///
	/// Returns `None` if the file had no tags.
	pub fn tag_version(&self) -> Option<&str> {
		self.tag_version.as_deref()
	}

	/// The track as a number
	///
	/// A `"N/M"` track is track `N`. Anything that is not a number is track `0`.
	pub fn track_number(&self) -> u32 {
		self.track.as_deref().map_or(0, parse_track_number)
	}

	/// Save the fields to the file, and re-read it
	///
	/// * FLAC files get the fields as Vorbis comments, and any ID3v2 and ID3v1 tags are removed
	/// * Any other file gets both an ID3v2 and an ID3v1 tag. Fields that don't fit in ID3v1
	///   (non Latin-1 text, unknown genres, years that aren't numbers) are lost in that tag.
	///
	/// Existing tags are updated, so their other fields are kept.
	///
	/// # Errors
	///
	/// * The file cannot be read or rewritten
	/// * A tag could not be written, see [`VorbisComments::save_to_path`],
	///   [`Id3v2Tag::save_to_path`] and [`Id3v1Tag::save_to_path`]
	pub fn save(&mut self, write_options: WriteOptions) -> Result<()> {
		let path = self.path.clone();
		let flac = {
			let mut reader = BufReader::new(File::open(&path)?);
			is_flac(&mut reader)?
		};

		if flac {
			log::debug!("SimpleTag: Saving as Vorbis comments");

			let mut vorbis_comments = FlacFile::read_from_path(&path, self.parse_options)?
				.vorbis_comments
				.unwrap_or_else(VorbisComments::new);
			self.apply_to(&mut vorbis_comments);
			vorbis_comments.save_to_path(&path, write_options)?;

			if Id3v2Tag::remove_from_path(&path)? {
				log::debug!("SimpleTag: Removed the ID3v2 tag from a FLAC file");
			}
			if Id3v1Tag::remove_from_path(&path)? {
				log::debug!("SimpleTag: Removed the ID3v1 tag from a FLAC file");
			}
		} else {
			log::debug!("SimpleTag: Saving as ID3v2 and ID3v1");

			let mut id3v2 = Id3v2Tag::read_from_path(&path, self.parse_options)?.unwrap_or_default();
			self.apply_to(&mut id3v2);

			let mut id3v1 = Id3v1Tag::read_from_path(&path, self.parse_options.parsing_mode)?
				.unwrap_or_default();
			self.apply_to(&mut id3v1);

			id3v2.save_to_path(&path, write_options)?;
			id3v1.save_to_path(&path, write_options)?;
		}

		*self = Self::read_from_path(&path, self.parse_options)?;
		Ok(())
	}
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
	value.filter(|value| !value.is_empty()).map(Cow::into_owned)
}
