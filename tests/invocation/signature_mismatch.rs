use std::sync::Arc ;
use std::sync::atomic::{ AtomicUsize, Ordering };
use graftlets::{ InvokeError, signature };
use crate::fixture_graftlets::{ Fixture, loader_with };

static CALLS: AtomicUsize = AtomicUsize::new( 0 );

#[test]
fn invocation_test_signature_mismatch() {

	let mut loader = loader_with(( 1, 0 ), [ Fixture::new( "strict", ( 1, 0 )).exporting(| exports | {
		let count: Arc<signature!( fn( &mut i32, i32 ) -> i32 )> = Arc::new(| total: &mut i32, by: i32 | {
			CALLS.fetch_add( 1, Ordering::SeqCst );
			*total += by ;
			*total
		});
		exports.function( "count", count );
		Ok(())
	})]);
	let handle = loader.build_and_resolve_graftlet( "strict" );
	let mut total = 0 ;

	// Argument count.
	match handle.invoke::<signature!( fn( &mut i32 ) -> i32 ), _>( "strict.count", ( &mut total, )) {
		Err( InvokeError::SignatureMismatch { name, expected, found }) => {
			assert_eq!( name, "strict.count" );
			assert_ne!( expected, found );
		},
		value => panic!( "Expected Err( SignatureMismatch ), found: {:?}", value ),
	}

	// Argument type, by value instead of by reference.
	assert!( matches!(
		handle.invoke::<signature!( fn( i32, i32 ) -> i32 ), _>( "strict.count", ( 1, 2 )),
		Err( InvokeError::SignatureMismatch { .. }),
	));

	// Return type.
	assert!( matches!(
		handle.invoke::<signature!( fn( &mut i32, i32 ) -> i64 ), _>( "strict.count", ( &mut total, 2 )),
		Err( InvokeError::SignatureMismatch { .. }),
	));

	assert!( matches!(
		handle.function::<signature!( fn( &mut i32, i32 ))>( "strict.count" ),
		Err( InvokeError::SignatureMismatch { .. }),
	));

	assert_eq!( total, 0 );
	assert_eq!( CALLS.load( Ordering::SeqCst ), 0 );

	// The registered signature still works.
	assert_eq!( handle.invoke::<signature!( fn( &mut i32, i32 ) -> i32 ), _>( "strict.count", ( &mut total, 2 )), Ok( 2 ));
	assert_eq!( total, 2 );
	assert_eq!( CALLS.load( Ordering::SeqCst ), 1 );

}
