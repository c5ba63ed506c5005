/// The outcome of an operation that completes even when some of its parts fail.
/// The `Vec<E>` holds the failures that were handled along the way.
pub type PartialSuccess<T, E> = ( T, Vec<E> );
