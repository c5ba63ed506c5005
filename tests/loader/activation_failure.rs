use std::sync::{ Arc, Mutex };
use graftlets::{ Exclusion, GraftletError, GraftletState };
use crate::fixture_graftlets::{ Fixture, loader_with };

#[test]
fn loader_test_activation_failure() {

	let log = Arc::new( Mutex::new( Vec::new() ));
	let mut loader = loader_with(( 1, 0 ), [
		Fixture::new( "driver", ( 1, 0 )).failing( "device not present" ).logging_to( &log ),
		Fixture::new( "service", ( 1, 0 )).depends_on( "driver" ).logging_to( &log ),
		Fixture::new( "api", ( 1, 0 )).depends_on( "service" ).logging_to( &log ),
		Fixture::new( "other", ( 1, 0 )).logging_to( &log ),
	]);

	let endpoints = loader.get_endpoints();
	assert_eq!( endpoints.iter().map(| endpoint | endpoint.name() ).collect::<Vec<_>>(), [ "other.ping" ]);

	// Dependants never ran their activation routine.
	assert_eq!( *log.lock().unwrap(), [ "driver", "other" ]);

	assert_eq!(
		loader.exclusion( "driver" ),
		Some( &Exclusion::ActivationFailed( GraftletError::new( "device not present" ))),
	);
	assert_eq!( loader.state( "driver" ), Some( GraftletState::DependencyFailed ));
	assert_eq!( loader.state( "service" ), Some( GraftletState::DependencyFailed ));
	assert_eq!( loader.state( "api" ), Some( GraftletState::DependencyFailed ));
	assert!( !loader.build_and_resolve_graftlet( "api" ).is_valid() );

}
