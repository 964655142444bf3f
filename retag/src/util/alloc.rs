use crate::config::global_options;
use crate::error::Result;
use crate::macros::err;

/// **DO NOT USE DIRECTLY**
///
/// Creates a `Vec` of the specified length, containing copies of `element`.
///
/// This should be used through [`try_vec!`](crate::macros::try_vec)
pub(crate) fn fallible_vec_from_element<T>(element: T, expected_size: usize) -> Result<Vec<T>>
where
	T: Clone,
{
	let mut v = Vec::<T>::try_with_capacity_stable(expected_size)?;
	v.resize(expected_size, element);
	Ok(v)
}

/// Provides the `try_with_capacity_stable` method on `Vec`
pub(crate) trait VecFallibleCapacity<T>: Sized {
	/// Same as `Vec::with_capacity`, but takes `GlobalOptions::allocation_limit` into account.
	fn try_with_capacity_stable(capacity: usize) -> Result<Self>;
}

impl<T> VecFallibleCapacity<T> for Vec<T> {
	fn try_with_capacity_stable(capacity: usize) -> Result<Self> {
		if capacity > global_options().allocation_limit {
			err!(TooMuchData);
		}

		let mut v = Vec::new();
		v.try_reserve(capacity)?;

		Ok(v)
	}
}
