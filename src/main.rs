//! Scans graftlet directories, resolves them and reports the outcome.

use std::path::PathBuf ;
use std::process::ExitCode ;
use clap::Parser ;
use thiserror::Error ;

use graftlets::{ GraftletLoader, LoaderConfig, Version };



/// Resolve a set of graftlet directories the way the server would at startup.
#[derive( Parser, Debug )]
#[command( name = "graftlets-inspect" )]
#[command( author, version, about, long_about = None )]
struct Args {
	/// Directories to scan. Subdirectories are not searched.
	#[arg( required = true )]
	directories: Vec<PathBuf>,

	/// Host firmware version, overriding the one from `--config`.
	#[arg( short, long )]
	firmware: Option<Version>,

	/// File extension of graftlet libraries.
	#[arg( short, long, default_value = std::env::consts::DLL_EXTENSION )]
	extension: String,

	/// JSON file holding the firmware version and the exception list.
	#[arg( short, long )]
	config: Option<PathBuf>,

	/// Also list every endpoint of the active graftlets.
	#[arg( long )]
	endpoints: bool,
}

#[derive( Debug, Error )]
enum InspectError {
	#[error( "Failed to Read Config {}: {source}", .path.display() )]
	ReadConfig { path: PathBuf, #[source] source: std::io::Error },
	#[error( "Failed to Parse Config {}: {source}", .path.display() )]
	ParseConfig { path: PathBuf, #[source] source: serde_json::Error },
}

fn load_config( args: &Args ) -> Result<LoaderConfig, InspectError> {
	let mut config = match &args.config {
		Some( path ) => {
			let text = std::fs::read_to_string( path )
				.map_err(| source | InspectError::ReadConfig { path: path.clone(), source })?;
			serde_json::from_str::<LoaderConfig>( &text )
				.map_err(| source | InspectError::ParseConfig { path: path.clone(), source })?
		},
		None => LoaderConfig::default(),
	};
	if let Some( firmware ) = args.firmware { config.firmware_version = firmware }
	Ok( config )
}

fn main() -> ExitCode {

	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(| _ | tracing_subscriber::EnvFilter::new( "info" ));
	tracing_subscriber::fmt()
		.with_env_filter( env_filter )
		.with_target( false )
		.with_writer( std::io::stderr )
		.compact()
		.init();

	let args = Args::parse();
	let config = match load_config( &args ) {
		Ok( config ) => config,
		Err( err ) => {
			tracing::error!( "{}", err );
			return ExitCode::FAILURE ;
		},
	};

	let mut loader = GraftletLoader::with_config( config );
	let mut failures = 0 ;
	for directory in &args.directories {
		let ( _, errors ) = loader.find_graftlets_in_directory( directory, &args.extension );
		failures += errors.len();
	}
	let endpoints = loader.get_endpoints();

	println!( "firmware {}", loader.config().firmware_version );
	for ( name, state ) in loader.states() {
		let version = loader.info( name ).map(| info | info.version.to_string() ).unwrap_or_default();
		match loader.exclusion( name ) {
			Some( reason ) => println!( "  {:<24} {:<8} {:<16} {}", name, version, state.to_string(), reason ),
			None => println!( "  {:<24} {:<8} {}", name, version, state ),
		}
	}

	println!( "activation order: {}", loader.activation_order().join( ", " ));
	let trace = loader.cycle_trace();
	if !trace.is_empty() { println!( "cycles:\n{}", trace ) }

	if args.endpoints {
		println!( "endpoints:" );
		for endpoint in &endpoints {
			match endpoint.route() {
				Some( route ) => println!( "  {:<32} {:?} {}", endpoint.name(), route.methods, route.path ),
				None => println!( "  {:<32} {}", endpoint.name(), endpoint.signature() ),
			}
		}
	}

	match failures {
		0 => ExitCode::SUCCESS,
		_ => ExitCode::FAILURE,
	}

}
