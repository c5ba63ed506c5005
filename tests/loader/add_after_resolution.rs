use graftlets::LoadError ;
use crate::fixture_graftlets::{ Fixture, loader_with };

#[test]
fn loader_test_add_after_resolution() {

	let mut loader = loader_with(( 1, 0 ), [ Fixture::new( "early", ( 1, 0 ))]);
	assert!( !loader.is_resolved() );
	assert_eq!( loader.get_endpoints().len(), 1 );
	assert!( loader.is_resolved() );

	match loader.add_graftlet( Fixture::new( "late", ( 1, 0 ))) {
		Err( LoadError::ScanAfterResolution ) => {}
		value => panic!( "Expected Err( ScanAfterResolution ), found: {:?}", value ),
	}

	let dir = tempfile::tempdir().unwrap();
	match loader.find_graftlets_in_directory( dir.path(), "so" ) {
		( 0, errors ) if matches!( errors.as_slice(), [ LoadError::ScanAfterResolution ]) => {}
		value => panic!( "Expected ( 0, [ ScanAfterResolution ]), found: {:?}", value ),
	}

	assert_eq!( loader.state( "late" ), None );
	assert_eq!( loader.get_endpoints().len(), 1 );

}
