use std::ffi::OsStr ;
use crate::inspect ;

#[test]
fn inspect_test_report() {

	let dir = tempfile::tempdir().unwrap();
	std::fs::write( dir.path().join( "config.json" ), br#"{ "firmware_version": "2.3" }"# ).unwrap();

	let output = inspect( &[ dir.path().as_os_str() ]);
	assert!( output.status.success(), "{:?}", output );
	let stdout = String::from_utf8_lossy( &output.stdout );
	assert!( stdout.starts_with( "firmware 1.0\n" ), "{}", stdout );
	assert!( stdout.contains( "activation order: \n" ), "{}", stdout );

	let config = dir.path().join( "config.json" );
	let output = inspect( &[ dir.path().as_os_str(), OsStr::new( "--config" ), config.as_os_str() ]);
	assert!( output.status.success(), "{:?}", output );
	assert!( String::from_utf8_lossy( &output.stdout ).starts_with( "firmware 2.3\n" ));

	// The command line wins over the file.
	let output = inspect( &[ dir.path().as_os_str(), OsStr::new( "--config" ), config.as_os_str(), OsStr::new( "--firmware" ), OsStr::new( "4.1" ) ]);
	assert!( String::from_utf8_lossy( &output.stdout ).starts_with( "firmware 4.1\n" ));

}
