use graftlets::{ GraftletState, LoadError, Version };
use crate::fixture_graftlets::{ Fixture, loader };

#[test]
fn loader_test_duplicate_names() {

	let mut loader = loader(( 1, 0 ));
	loader.add_graftlet( Fixture::new( "dup", ( 1, 0 ))).unwrap();

	match loader.add_graftlet( Fixture::new( "dup", ( 2, 0 ))) {
		Err( LoadError::DuplicateName { name, origin: None }) => assert_eq!( name, "dup" ),
		value => panic!( "Expected Err( DuplicateName ), found: {:?}", value ),
	}

	loader.resolve();
	assert_eq!( loader.states().count(), 1 );
	assert_eq!( loader.state( "dup" ), Some( GraftletState::Active ));
	assert_eq!( loader.info( "dup" ).map(| info | info.version ), Some( Version::new( 1, 0 )));

}
