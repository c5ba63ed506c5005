use std::env::consts::DLL_EXTENSION ;
use graftlets::{ DylibGraftlet, GraftletState, LoadError, GRAFTLET_ABI_VERSION, INFO_SYMBOL };
use crate::fixture_graftlets::loader ;
use crate::fixture_libraries::{ directory_with, library };

#[test]
fn dylib_test_rejected_libraries() {

	match DylibGraftlet::open( library( "stale_graftlet" )) {
		Err( LoadError::AbiMismatch { expected, found: 0, .. }) => assert_eq!( expected, GRAFTLET_ABI_VERSION ),
		value => panic!( "Expected Err( AbiMismatch ), found: {:?}", value ),
	}
	match DylibGraftlet::open( library( "headless_graftlet" )) {
		Err( LoadError::MissingSymbol { symbol, .. }) => assert_eq!( symbol, INFO_SYMBOL ),
		value => panic!( "Expected Err( MissingSymbol ), found: {:?}", value ),
	}

	// A scan skips both and keeps the good library.
	let dir = directory_with( &[ "stale_graftlet", "headless_graftlet", "echo_graftlet" ]);
	let mut loader = loader(( 1, 0 ));
	let ( found, errors ) = loader.find_graftlets_in_directory( dir.path(), DLL_EXTENSION );
	assert_eq!( found, 1 );
	assert_eq!( errors.len(), 2, "{:?}", errors );
	assert!( errors.iter().any(| err | matches!( err, LoadError::AbiMismatch { .. })), "{:?}", errors );
	assert!( errors.iter().any(| err | matches!( err, LoadError::MissingSymbol { .. })), "{:?}", errors );

	// Without the host graftlet it needs, echo is discovered but never activated.
	loader.resolve();
	assert_eq!( loader.states().collect::<Vec<_>>(), [( "echo", GraftletState::DependencyFailed )]);
	assert!( loader.get_endpoints().is_empty() );

}
