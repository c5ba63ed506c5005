use std::collections::HashMap ;
use graftlets::{ config, GraftletLoader, GraftletState, LoaderConfig, Version, VersionRange, DEFAULT_FIRMWARE_VERSION };
use crate::fixture_graftlets::Fixture ;

#[test]
fn config_test_global_snapshot() {

	let _guard = crate::GLOBAL_CONFIG.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
	let previous = config::replace( LoaderConfig::default() );
	assert_eq!( config::firmware_version(), DEFAULT_FIRMWARE_VERSION );

	config::set_firmware_version( Version::new( 0, 5 ));
	let mut before = GraftletLoader::new();

	config::set_firmware_version( Version::new( 2, 0 ));
	config::set_exception_list( HashMap::from([
		( "modern".to_string(), vec![ VersionRange::new( Version::new( 2, 0 ), Version::new( 2, 0 ))]),
	]));
	let mut after = GraftletLoader::new();

	assert_eq!( before.config().firmware_version, Version::new( 0, 5 ));
	assert!( before.config().exceptions.is_empty() );
	assert_eq!( after.config().firmware_version, Version::new( 2, 0 ));
	assert_eq!( config::exception_list().len(), 1 );

	for loader in [ &mut before, &mut after ] {
		loader.add_graftlet( Fixture::new( "modern", ( 1, 0 )).firmware(( 1, 0 ), ( 1, 9 ))).unwrap();
		loader.resolve();
	}
	assert_eq!( before.state( "modern" ), Some( GraftletState::FirmwareRejected ));
	assert_eq!( after.state( "modern" ), Some( GraftletState::Active ));

	// Changing the global configuration later leaves existing loaders alone.
	config::set_firmware_version( Version::new( 9, 9 ));
	assert_eq!( after.config().firmware_version, Version::new( 2, 0 ));

	config::replace( previous );

}
