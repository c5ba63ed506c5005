use std::collections::HashMap ;

use crate::version::{ Version, VersionRange };
use crate::graftlet::GraftletInfo ;
use crate::exclusion::Exclusion ;



/// Additional firmware ranges accepted per graftlet name, on top of the range
/// the graftlet declares itself.
pub type ExceptionList = HashMap<String, Vec<VersionRange>>;

/// Decides whether a graftlet can run on the current host firmware.
#[derive( Clone, Copy, Debug )]
pub struct FirmwareFilter<'a> {
	firmware: Version,
	exceptions: &'a ExceptionList,
}

impl<'a> FirmwareFilter<'a> {

	pub fn new( firmware: Version, exceptions: &'a ExceptionList ) -> Self { Self { firmware, exceptions }}

	/// Accepts the graftlet when the firmware lies within its declared range or
	/// within any exception range listed under its exact name.
	///
	/// ```
	/// use std::collections::HashMap ;
	/// use graftlets::{ FirmwareFilter, GraftletInfo, Version, VersionRange };
	///
	/// let legacy = GraftletInfo::new( "legacy", Version::new( 1, 0 ))
	/// 	.with_firmware( Version::new( 0, 1 ), Version::new( 0, 9 ));
	///
	/// let none = HashMap::new();
	/// assert!( FirmwareFilter::new( Version::new( 1, 2 ), &none ).check( &legacy ).is_err() );
	///
	/// let exceptions = HashMap::from([( "legacy".to_string(), vec![
	/// 	VersionRange::new( Version::new( 1, 0 ), Version::new( 1, 5 )),
	/// ])]);
	/// assert!( FirmwareFilter::new( Version::new( 1, 2 ), &exceptions ).check( &legacy ).is_ok() );
	/// ```
	///
	/// # Errors
	/// [`Exclusion::FirmwareIncompatible`] when no range matches.
	pub fn check( &self, info: &GraftletInfo ) -> Result<(), Exclusion> {
		match self.accepts( info ) {
			true => Ok(()),
			false => Err( Exclusion::FirmwareIncompatible { firmware: self.firmware, supported: info.firmware }),
		}
	}

	pub fn accepts( &self, info: &GraftletInfo ) -> bool {
		info.firmware.contains( self.firmware )
			|| self.exceptions.get( &info.name )
				.is_some_and(| ranges | ranges.iter().any(| range | range.contains( self.firmware )))
	}

}

#[cfg( test )]
mod tests {

	use super::* ;

	fn info( min: ( u16, u16 ), max: ( u16, u16 )) -> GraftletInfo {
		GraftletInfo::new( "g", Version::new( 1, 0 )).with_firmware( min.into(), max.into() )
	}

	#[test]
	fn bounds_are_inclusive() {
		let none = ExceptionList::new();
		let graftlet = info(( 0, 5 ), ( 1, 2 ));
		assert!( FirmwareFilter::new( Version::new( 0, 5 ), &none ).accepts( &graftlet ));
		assert!( FirmwareFilter::new( Version::new( 1, 2 ), &none ).accepts( &graftlet ));
		assert!( !FirmwareFilter::new( Version::new( 0, 4 ), &none ).accepts( &graftlet ));
		assert!( !FirmwareFilter::new( Version::new( 1, 3 ), &none ).accepts( &graftlet ));
	}

	#[test]
	fn exceptions_apply_to_exact_name_only() {
		let exceptions = ExceptionList::from([( "other".to_string(), vec![ VersionRange::ANY ])]);
		let filter = FirmwareFilter::new( Version::new( 3, 0 ), &exceptions );
		assert_eq!(
			filter.check( &info(( 0, 1 ), ( 0, 2 ))),
			Err( Exclusion::FirmwareIncompatible {
				firmware: Version::new( 3, 0 ),
				supported: VersionRange::new( Version::new( 0, 1 ), Version::new( 0, 2 )),
			}),
		);
	}

}
