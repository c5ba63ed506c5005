use std::sync::Arc ;
use std::sync::atomic::{ AtomicU64, Ordering };
use graftlets::signature ;
use crate::fixture_graftlets::{ Fixture, loader_with };

#[test]
fn invocation_test_shared_across_threads() {

	let counter = Arc::new( AtomicU64::new( 0 ));
	let shared = Arc::clone( &counter );
	let mut loader = loader_with(( 1, 0 ), [ Fixture::new( "counter", ( 1, 0 )).exporting( move | exports | {
		let shared = Arc::clone( &shared );
		let add: Arc<signature!( fn( u64 ) -> u64 )> = Arc::new( move | by: u64 | shared.fetch_add( by, Ordering::SeqCst ) + by );
		exports.function( "add", add );
		Ok(())
	})]);
	let handle = loader.build_and_resolve_graftlet( "counter" );
	drop( loader );

	std::thread::scope(| scope | {
		for _ in 0..8 {
			let handle = handle.clone();
			scope.spawn( move || for _ in 0..100 {
				handle.invoke::<signature!( fn( u64 ) -> u64 ), _>( "counter.add", ( 1, )).unwrap();
			});
		}
	});

	assert_eq!( counter.load( Ordering::SeqCst ), 800 );

}
