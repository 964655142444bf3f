// Every tag type is expected to handle the common fields the same way

use retag::ape::ApeTag;
use retag::id3::v1::Id3v1Tag;
use retag::id3::v2::Id3v2Tag;
use retag::tag::Accessor;
use retag::vorbis::VorbisComments;

macro_rules! accessor_tests {
	($($tag:ident => [$($field:ident = $value:literal),+ $(,)?];)+) => {
		paste::paste! {
			$(
				$(
					#[test_log::test]
					fn [<$tag:snake _ $field>]() {
						let mut tag = $tag::default();
						assert!(tag.$field().is_none());

						tag.[<set_ $field>](String::from($value));
						assert_eq!(tag.$field().as_deref(), Some($value));

						tag.[<remove_ $field>]();
						assert!(tag.$field().is_none());
					}
				)+
			)+
		}
	};
}

accessor_tests! {
	Id3v2Tag => [
		title = "Foo title",
		artist = "Bar artist",
		album = "Baz album",
		year = "2004",
		genre = "Electronic",
		track = "4/12",
		comment = "Qux comment",
	];
	ApeTag => [
		title = "Foo title",
		artist = "Bar artist",
		album = "Baz album",
		year = "2004",
		genre = "Electronic",
		track = "4/12",
		comment = "Qux comment",
	];
	VorbisComments => [
		title = "Foo title",
		artist = "Bar artist",
		album = "Baz album",
		year = "2004",
		genre = "Electronic",
		track = "4/12",
		comment = "Qux comment",
	];
	Id3v1Tag => [
		title = "Foo title",
		artist = "Bar artist",
		album = "Baz album",
		year = "2004",
		genre = "Jazz",
		track = "4",
		comment = "Qux comment",
	];
}

#[test_log::test]
fn id3v1_limits() {
	let mut tag = Id3v1Tag::default();

	tag.set_track(String::from("4/12"));
	assert_eq!(tag.track().as_deref(), Some("4"));

	tag.set_track(String::from("300"));
	assert!(tag.track().is_none());

	tag.set_genre(String::from("8"));
	assert_eq!(tag.genre().as_deref(), Some("Jazz"));

	tag.set_genre(String::from("Not a genre"));
	assert!(tag.genre().is_none());
}
