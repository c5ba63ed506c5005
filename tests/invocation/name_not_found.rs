use graftlets::{ GraftletHandle, InvokeError, signature };
use crate::fixture_graftlets::{ Fixture, loader_with };

#[test]
fn invocation_test_name_not_found() {

	let mut loader = loader_with(( 1, 0 ), [
		Fixture::new( "here", ( 1, 0 )),
		Fixture::new( "excluded", ( 1, 0 )).depends_on( "nowhere" ),
	]);

	let here = loader.build_and_resolve_graftlet( "here" );
	for name in [ "here.pong", "ping", "here", "" ] {
		assert_eq!(
			here.invoke::<signature!( fn() -> String ), _>( name, ()),
			Err( InvokeError::NameNotFound( name.to_string() )),
		);
	}

	// Names are qualified with the graftlet that exported them.
	assert!( here.invoke::<signature!( fn() -> String ), _>( "here.ping", ()).is_ok() );

	let excluded = loader.build_and_resolve_graftlet( "excluded" );
	assert!( !excluded.is_valid() );
	assert_eq!( excluded.graftlet(), None );
	assert!( matches!(
		excluded.invoke::<signature!( fn() -> String ), _>( "excluded.ping", ()),
		Err( InvokeError::NameNotFound( _ )),
	));

	let invalid = GraftletHandle::invalid();
	assert_eq!( invalid.endpoints().count(), 0 );
	assert!( invalid.function::<signature!( fn() -> String )>( "here.ping" ).is_err() );

}
