//! Module and firmware version numbers.
//!
//! A [`Version`] is a `(major, minor)` pair ordered lexicographically. The same
//! type is used for graftlet versions, dependency requirements and the host
//! firmware version, so all three compare against each other directly.

use std::str::FromStr ;
use serde::{ Deserialize, Serialize };
use thiserror::Error ;



/// A `(major, minor)` version pair.
///
/// Ordering is lexicographic: major first, then minor. The default `0.0` is the
/// lowest possible version and is satisfied by any present module.
///
/// ```
/// use graftlets::Version ;
///
/// assert!( Version::new( 1, 2 ) > Version::new( 1, 1 ));
/// assert!( Version::new( 2, 0 ) > Version::new( 1, 99 ));
/// assert!( Version::new( 3, 1 ).satisfies( Version::new( 3, 0 )));
/// assert_eq!( "4.2".parse::<Version>().unwrap(), Version::new( 4, 2 ));
/// ```
#[derive( Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize )]
#[serde( try_from = "String", into = "String" )]
pub struct Version {
	major: u16,
	minor: u16,
}

impl Version {

	/// The lowest version, required by dependency entries that omit one.
	pub const ZERO: Self = Self::new( 0, 0 );

	/// Creates a version from its components.
	#[inline] pub const fn new( major: u16, minor: u16 ) -> Self { Self { major, minor }}

	#[inline] pub const fn major( &self ) -> u16 { self.major }
	#[inline] pub const fn minor( &self ) -> u16 { self.minor }

	/// Packs the pair into a single integer whose order matches the pair order.
	#[inline] pub const fn encode( self ) -> u32 { ( self.major as u32 ) << 16 | self.minor as u32 }

	/// Inverse of [`encode`]( Self::encode ).
	#[inline] pub const fn decode( encoded: u32 ) -> Self {
		Self { major: ( encoded >> 16 ) as u16, minor: ( encoded & 0xFFFF ) as u16 }
	}

	/// Returns `true` when `self` is at least `required`.
	#[inline] pub fn satisfies( self, required: Version ) -> bool { self >= required }

}

impl std::fmt::Display for Version {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "{}.{}", self.major, self.minor )
	}
}

/// Failure to read a `major[.minor]` string.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
pub enum VersionParseError {
	#[error( "Empty version" )] Empty,
	#[error( "Invalid version component '{0}'" )] InvalidComponent( String ),
	#[error( "Too many version components in '{0}'" )] TooManyComponents( String ),
}

impl FromStr for Version {
	type Err = VersionParseError ;

	/// Parses `major` or `major.minor`, ignoring whitespace around either part.
	fn from_str( s: &str ) -> Result<Self, Self::Err> {

		let s = s.trim();
		if s.is_empty() { return Err( VersionParseError::Empty ) }

		let mut parts = s.split( '.' ).map( str::trim );
		let major = parse_component( parts.next().unwrap_or_default() )?;
		let minor = match parts.next() {
			Some( part ) => parse_component( part )?,
			None => 0,
		};
		if parts.next().is_some() { return Err( VersionParseError::TooManyComponents( s.to_string() )) }

		Ok( Self::new( major, minor ))

	}
}

fn parse_component( part: &str ) -> Result<u16, VersionParseError> {
	part.parse().map_err(| _ | VersionParseError::InvalidComponent( part.to_string() ))
}

impl TryFrom<String> for Version {
	type Error = VersionParseError ;
	fn try_from( value: String ) -> Result<Self, Self::Error> { value.parse() }
}

impl From<Version> for String {
	fn from( version: Version ) -> Self { version.to_string() }
}

impl From<( u16, u16 )> for Version {
	fn from(( major, minor ): ( u16, u16 )) -> Self { Self::new( major, minor ) }
}

/// An inclusive `[min, max]` range of versions.
///
/// Used for the firmware versions a graftlet declares support for, and for the
/// override ranges of the exception list.
#[derive( Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize )]
pub struct VersionRange {
	pub min: Version,
	pub max: Version,
}

impl VersionRange {

	#[inline] pub const fn new( min: Version, max: Version ) -> Self { Self { min, max }}

	/// A range accepting every version.
	pub const ANY: Self = Self::new( Version::ZERO, Version::new( u16::MAX, u16::MAX ));

	/// Returns `true` if `version` lies within the range, both ends inclusive.
	#[inline] pub fn contains( &self, version: Version ) -> bool {
		self.min <= version && version <= self.max
	}

}

impl std::fmt::Display for VersionRange {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "[{}, {}]", self.min, self.max )
	}
}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn satisfies_matches_lexicographic_order() {
		let versions = [( 0, 0 ), ( 0, 5 ), ( 1, 0 ), ( 1, 2 ), ( 3, 0 ), ( 3, 3 ), ( 7, 0 )];
		for &( a, b ) in &versions {
			for &( c, d ) in &versions {
				let expected = ( a, b ) >= ( c, d );
				assert_eq!( Version::new( a, b ).satisfies( Version::new( c, d )), expected, "{a}.{b} vs {c}.{d}" );
			}
		}
	}

	#[test]
	fn encoding_preserves_order() {
		assert!( Version::new( 1, 65535 ).encode() < Version::new( 2, 0 ).encode() );
		assert_eq!( Version::decode( Version::new( 4, 2 ).encode() ), Version::new( 4, 2 ));
	}

	#[test]
	fn parse_tolerates_whitespace_and_missing_minor() {
		assert_eq!( " 1 . 2 ".parse(), Ok( Version::new( 1, 2 )));
		assert_eq!( "3".parse(), Ok( Version::new( 3, 0 )));
		assert_eq!( "".parse::<Version>(), Err( VersionParseError::Empty ));
		assert!( "1.x".parse::<Version>().is_err() );
		assert!( "1.2.3".parse::<Version>().is_err() );
	}

	#[test]
	fn range_is_inclusive() {
		let range = VersionRange::new( Version::new( 1, 0 ), Version::new( 1, 1 ));
		assert!( range.contains( Version::new( 1, 0 )));
		assert!( range.contains( Version::new( 1, 1 )));
		assert!( !range.contains( Version::new( 1, 2 )));
		assert!( !range.contains( Version::new( 0, 9 )));
	}

}
