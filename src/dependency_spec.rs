//! Parsing of dependency declarations.
//!
//! A graftlet declares the peers it needs as a single free-form string:
//!
//! ```text
//! spec    := entry ( ',' entry )*
//! entry   := name ( ':' version )?
//! version := major ( '.' minor )?
//! ```
//!
//! Whitespace around any token is ignored. An entry without a version requires
//! `0.0`, which any present module satisfies.

use thiserror::Error ;

use crate::version::{ Version, VersionParseError };



/// A single declared dependency: the required module and its minimum version.
#[derive( Clone, Debug, PartialEq, Eq, Hash )]
pub struct Dependency {
	pub name: String,
	pub min_version: Version,
}

impl Dependency {
	pub fn new( name: impl Into<String>, min_version: Version ) -> Self {
		Self { name: name.into(), min_version }
	}
}

impl std::fmt::Display for Dependency {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "{}:{}", self.name, self.min_version )
	}
}

/// A dependency declaration that could not be read.
///
/// Any of these invalidates the whole declaration of the module that owns it,
/// not only the offending entry.
#[derive( Clone, Debug, PartialEq, Eq, Error )]
pub enum DependencySpecError {
	/// The entry has a colon but nothing after it, e.g. `"D:"`.
	#[error( "Empty version in dependency entry '{entry}'" )]
	EmptyVersion { entry: String },
	/// The entry has no module name, e.g. `":1.0"` or the gap in `"A,,B"`.
	#[error( "Missing module name in dependency entry '{entry}'" )]
	EmptyName { entry: String },
	/// The version is not `major[.minor]` with numeric parts.
	#[error( "Invalid version in dependency entry '{entry}': {source}" )]
	InvalidVersion { entry: String, #[source] source: VersionParseError },
}

/// Parses a dependency declaration into its entries, in declaration order.
///
/// ```
/// use graftlets::{ parse_dependencies, Dependency, Version };
///
/// let deps = parse_dependencies( " B : 1 . 2 , C: 3, D " ).unwrap();
/// assert_eq!( deps, vec![
/// 	Dependency::new( "B", Version::new( 1, 2 )),
/// 	Dependency::new( "C", Version::new( 3, 0 )),
/// 	Dependency::new( "D", Version::ZERO ),
/// ]);
/// ```
///
/// # Errors
/// Returns the first malformed entry found. A blank declaration is not an error
/// and yields no dependencies.
pub fn parse_dependencies( spec: &str ) -> Result<Vec<Dependency>, DependencySpecError> {
	if spec.trim().is_empty() { return Ok( Vec::with_capacity( 0 )) }
	spec.split( ',' ).map( parse_entry ).collect()
}

fn parse_entry( raw: &str ) -> Result<Dependency, DependencySpecError> {

	let entry = raw.trim();
	let ( name, version ) = match entry.split_once( ':' ) {
		Some(( name, version )) => ( name.trim(), Some( version.trim() )),
		None => ( entry, None ),
	};

	if name.is_empty() { return Err( DependencySpecError::EmptyName { entry: entry.to_string() }) }

	let min_version = match version {
		None => Version::ZERO,
		Some( "" ) => return Err( DependencySpecError::EmptyVersion { entry: entry.to_string() }),
		Some( version ) => version.parse()
			.map_err(| source | DependencySpecError::InvalidVersion { entry: entry.to_string(), source })?,
	};

	Ok( Dependency::new( name, min_version ))

}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn preserves_declaration_order() {
		let deps = parse_dependencies( "C:4.5, D: 7" ).unwrap();
		assert_eq!( deps, vec![ Dependency::new( "C", Version::new( 4, 5 )), Dependency::new( "D", Version::new( 7, 0 )) ]);
	}

	#[test]
	fn blank_declaration_has_no_dependencies() {
		assert_eq!( parse_dependencies( "" ), Ok( vec![] ));
		assert_eq!( parse_dependencies( "   " ), Ok( vec![] ));
	}

	#[test]
	fn colon_without_version_is_malformed() {
		assert_eq!(
			parse_dependencies( "D:, B" ),
			Err( DependencySpecError::EmptyVersion { entry: "D:".to_string() }),
		);
	}

	#[test]
	fn empty_entries_and_bad_numbers_are_malformed() {
		assert!( matches!( parse_dependencies( "A,,B" ), Err( DependencySpecError::EmptyName { .. } )));
		assert!( matches!( parse_dependencies( ": 1.0" ), Err( DependencySpecError::EmptyName { .. } )));
		assert_eq!( parse_dependencies( "A: one" ), Err( DependencySpecError::InvalidVersion {
			entry: "A: one".to_string(),
			source: VersionParseError::InvalidComponent( "one".to_string() ),
		}));
		assert!( matches!(
			parse_dependencies( "A: 1.2.3" ),
			Err( DependencySpecError::InvalidVersion { source: VersionParseError::TooManyComponents( _ ), .. }),
		));
	}

}
