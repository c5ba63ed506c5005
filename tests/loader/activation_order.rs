use std::sync::{ Arc, Mutex };
use crate::fixture_graftlets::{ Fixture, loader_with };

#[test]
fn loader_test_activation_order() {

	let log = Arc::new( Mutex::new( Vec::new() ));
	let mut loader = loader_with(( 1, 0 ), [
		Fixture::new( "app", ( 1, 0 )).depends_on( "session, db" ).logging_to( &log ),
		Fixture::new( "standalone", ( 1, 0 )).logging_to( &log ),
		Fixture::new( "session", ( 1, 0 )).depends_on( "db: 1.1" ).logging_to( &log ),
		Fixture::new( "db", ( 1, 1 )).logging_to( &log ),
	]);

	let endpoints = loader.get_endpoints();
	assert_eq!( *log.lock().unwrap(), [ "db", "session", "app", "standalone" ]);
	assert_eq!( loader.activation_order(), [ "db", "session", "app", "standalone" ]);

	// Endpoints come grouped by graftlet, in activation order.
	let names = endpoints.iter().map(| endpoint | endpoint.name() ).collect::<Vec<_>>();
	assert_eq!( names, [ "db.ping", "session.ping", "app.ping", "standalone.ping" ]);

}
