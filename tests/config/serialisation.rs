use graftlets::{ LoaderConfig, Version, VersionRange, DEFAULT_FIRMWARE_VERSION };

#[test]
fn config_test_serialisation() {

	let config: LoaderConfig = serde_json::from_str( r#"{
		"firmware_version": "1.2",
		"exceptions": {
			"legacy": [ { "min": "0.1", "max": "0.9" }, { "min": "1.2", "max": "1.2" } ]
		}
	}"# ).unwrap();

	assert_eq!( config.firmware_version, Version::new( 1, 2 ));
	assert_eq!( config.exceptions[ "legacy" ], [
		VersionRange::new( Version::new( 0, 1 ), Version::new( 0, 9 )),
		VersionRange::new( Version::new( 1, 2 ), Version::new( 1, 2 )),
	]);

	let json = serde_json::to_value( &config ).unwrap();
	assert_eq!( json[ "firmware_version" ], "1.2" );
	assert_eq!( serde_json::from_value::<LoaderConfig>( json ).unwrap(), config );

	// Missing fields take their defaults.
	let empty: LoaderConfig = serde_json::from_str( "{}" ).unwrap();
	assert_eq!( empty, LoaderConfig::default() );
	assert_eq!( empty.firmware_version, DEFAULT_FIRMWARE_VERSION );

	assert!( serde_json::from_str::<LoaderConfig>( r#"{ "firmware_version": "one" }"# ).is_err() );
	assert!( serde_json::from_str::<LoaderConfig>( r#"{ "firmware_version": 3 }"# ).is_err() );

}
