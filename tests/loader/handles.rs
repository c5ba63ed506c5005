use graftlets::{ InvokeError, signature };
use crate::fixture_graftlets::{ Fixture, loader_with };

#[test]
fn loader_test_handles() {

	let mut loader = loader_with(( 1, 0 ), [
		Fixture::new( "core", ( 1, 0 )),
		Fixture::new( "storage", ( 1, 0 )).depends_on( "core" ),
		Fixture::new( "web", ( 1, 0 )).depends_on( "storage" ),
		Fixture::new( "unrelated", ( 1, 0 )),
		Fixture::new( "too_new", ( 1, 0 )).firmware(( 9, 0 ), ( 9, 9 )),
	]);

	let web = loader.build_and_resolve_graftlet( "web" );
	assert!( web.is_valid() );
	assert_eq!( web.graftlet(), Some( "web" ));
	assert_eq!( web.graftlets().collect::<Vec<_>>(), [ "web", "storage", "core" ]);

	// Reaches transitive dependencies, not unrelated graftlets.
	let ping = | name: &str | web.invoke::<signature!( fn() -> String ), _>( name, ());
	assert_eq!( ping( "web.ping" ), Ok( "web".to_string() ));
	assert_eq!( ping( "core.ping" ), Ok( "core".to_string() ));
	assert_eq!( ping( "unrelated.ping" ), Err( InvokeError::NameNotFound( "unrelated.ping".to_string() )));

	let storage = loader.build_and_resolve_graftlet( "storage" );
	assert!( storage.contains( "core.ping" ));
	assert!( !storage.contains( "web.ping" ));

	for name in [ "too_new", "ghost" ] {
		let handle = loader.build_and_resolve_graftlet( name );
		assert!( !handle.is_valid() );
		assert_eq!( handle.endpoints().count(), 0 );
		assert_eq!(
			handle.invoke::<signature!( fn() -> String ), _>( &format!( "{}.ping", name ), ()),
			Err( InvokeError::NameNotFound( format!( "{}.ping", name ))),
		);
	}

}
