use std::borrow::Cow;

// Defines the `Accessor` trait: unified, string based getters/setters/removers for the fields
// every supported format can hold.
//
// Usage:
//
// accessor_trait! {
//     [field_name], [other_field], ...
// }
//
// Multi-word names are written with spaces, so [track number] becomes `track_number()`,
// `set_track_number()` and `remove_track_number()`.
macro_rules! accessor_trait {
	($([$($name:tt)+]),+ $(,)?) => {
		/// Provides accessors for common items
		///
		/// Every value is exposed as text, since the supported formats disagree on how numbers and
		/// dates are stored. Setters **overwrite** any existing value.
		pub trait Accessor {
			$(
				accessor_trait! { @METHODS [$($name)+] }
			)+
		}
	};
	(@METHODS [$name:tt $($other:tt)*]) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* "."]
			///
			/// Formats that allow several values for an item return the first one.
			fn [<$name $(_ $other)*>] (&self) -> Option<Cow<'_, str>> { None }

			#[doc = "Sets the " $name $(" " $other)* ", replacing every existing value."]
			fn [<set_ $name $(_ $other)*>] (&mut self, _value: String) {}

			#[doc = "Removes the " $name $(" " $other)* "."]
			fn [<remove_ $name $(_ $other)*>] (&mut self) {}
		}
	};
}

accessor_trait! {
	[title], [artist], [album], [year], [genre], [track], [comment],
}
