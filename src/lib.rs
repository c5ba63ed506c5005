//! A dependency-resolving runtime for dynamically loaded server extensions.
//!
//! Graftlets are small modules that add callables to a host process. Each one
//! declares a name, a version, the firmware versions it runs on and the other
//! graftlets it needs. `graftlets` finds them, works out which ones can safely
//! be activated, activates those in dependency order and lets the host call
//! into them by name with the argument types checked at the call.
//!
//! # Core Concepts
//!
//! - [`Graftlet`]: The module side. Describes itself with a [`GraftletInfo`] and
//! 	registers its endpoints into [`Exports`] when activated. Shared libraries
//! 	export one with [`declare_graftlet!`]; hosts can also register graftlets
//! 	compiled into them.
//!
//! - [`GraftletLoader`]: Scans directories, resolves the candidates and owns the
//! 	result. A candidate is excluded when:
//! 	- the host firmware is outside its supported range and the exception list
//! 		has no matching override for it ([`Exclusion::FirmwareIncompatible`])
//! 	- its dependency declaration is malformed, or a dependency is missing, too old
//! 		or itself excluded ([`Exclusion::MalformedDependencySpec`],
//! 		[`Exclusion::DependencyUnsatisfied`])
//! 	- it takes part in a dependency cycle ([`Exclusion::DependencyCycle`])
//! 	- its activation routine fails ([`Exclusion::ActivationFailed`])
//!
//! - [`DependencyGraph`]: The resolution engine, usable on its own over plain
//! 	`( name, version, declaration )` triples.
//!
//! - [`Endpoint`]: A callable exported by an active graftlet, named
//! 	`"<graftlet>.<symbol>"`. Endpoints carrying a [`Route`] are request handlers
//! 	for the host's routing layer.
//!
//! - [`GraftletHandle`]: Name-based access to the endpoints of one graftlet and of
//! 	everything it depends on. Calls are checked against the exact callable type
//! 	each endpoint was registered under, spelled with [`signature!`].
//!
//! Dependency declarations are comma separated `name[: major[.minor]]` entries,
//! e.g. `"storage: 1.2, auth"`. An entry without a version accepts any version.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc ;
//! use graftlets::{
//! 	Graftlet, GraftletInfo, GraftletError, GraftletLoader, GraftletState,
//! 	Exports, LoaderConfig, Version, signature,
//! };
//!
//! struct Math ;
//! impl Graftlet for Math {
//! 	fn info( &self ) -> GraftletInfo { GraftletInfo::new( "math", Version::new( 2, 1 )) }
//! 	fn init( &self, exports: &mut Exports ) -> Result<(), GraftletError> {
//! 		let add: Arc<signature!( fn( i32, i32 ) -> i32 )> = Arc::new(| a: i32, b: i32 | a + b );
//! 		exports.function( "add", add );
//! 		Ok(())
//! 	}
//! }
//!
//! // Needs math 2.0 or newer.
//! struct Stats ;
//! impl Graftlet for Stats {
//! 	fn info( &self ) -> GraftletInfo {
//! 		GraftletInfo::new( "stats", Version::new( 1, 0 )).with_dependencies( "math: 2.0" )
//! 	}
//! 	fn init( &self, exports: &mut Exports ) -> Result<(), GraftletError> {
//! 		let mean: Arc<signature!( fn( &[i32] ) -> f64 )> =
//! 			Arc::new(| values: &[i32] | values.iter().sum::<i32>() as f64 / values.len() as f64 );
//! 		exports.function( "mean", mean );
//! 		Ok(())
//! 	}
//! }
//!
//! // Only runs on firmware 0.x.
//! struct Legacy ;
//! impl Graftlet for Legacy {
//! 	fn info( &self ) -> GraftletInfo {
//! 		GraftletInfo::new( "legacy", Version::new( 1, 0 ))
//! 			.with_firmware( Version::new( 0, 1 ), Version::new( 0, 9 ))
//! 	}
//! 	fn init( &self, _: &mut Exports ) -> Result<(), GraftletError> { Ok(()) }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut loader = GraftletLoader::with_config( LoaderConfig::new( Version::new( 1, 4 ), Default::default() ));
//! loader.add_graftlet( Stats )?;
//! loader.add_graftlet( Math )?;
//! loader.add_graftlet( Legacy )?;
//!
//! // Real hosts would also scan for shared libraries:
//! // loader.find_graftlets_in_directory( "/usr/lib/server/graftlets", "so" );
//!
//! // Dependencies activate first.
//! assert_eq!( loader.get_endpoints().len(), 2 );
//! assert_eq!( loader.activation_order(), [ "math", "stats" ]);
//! assert_eq!( loader.state( "legacy" ), Some( GraftletState::FirmwareRejected ));
//!
//! // A handle reaches the graftlet's own endpoints and those of its dependencies.
//! let stats = loader.build_and_resolve_graftlet( "stats" );
//! let sum = stats.invoke::<signature!( fn( i32, i32 ) -> i32 ), _>( "math.add", ( 2, 3 ))?;
//! let mean = stats.invoke::<signature!( fn( &[i32] ) -> f64 ), _>( "stats.mean", ( &[ 1, 2, 3 ][..], ))?;
//! assert_eq!(( sum, mean ), ( 5, 2.0 ));
//!
//! // The wrong signature is caught before the callee runs.
//! assert!( stats.invoke::<signature!( fn( i64, i64 ) -> i64 ), _>( "math.add", ( 2, 3 )).is_err() );
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The firmware version and the exception list are process-wide settings in
//! [`config`]. [`GraftletLoader::new`] snapshots them; use
//! [`GraftletLoader::with_config`] to pass a [`LoaderConfig`] explicitly.
//!
//! # Logging
//!
//! Discovery, exclusions and activation are reported through [`tracing`]. No
//! subscriber is installed by the library.

mod version ;
mod dependency_spec ;
mod dependency_graph ;
mod exclusion ;
mod firmware ;
mod graftlet ;
mod endpoint ;
mod exports ;
mod handle ;
mod dylib ;
mod loader ;
mod utils ;
pub mod config ;

#[doc( no_inline )]
pub use libloading::Library ;

pub use version::{ Version, VersionRange, VersionParseError };
pub use dependency_spec::{ Dependency, DependencySpecError, parse_dependencies };
pub use dependency_graph::DependencyGraph ;
pub use exclusion::{ Exclusion, GraftletState };
pub use firmware::{ FirmwareFilter, ExceptionList };
pub use graftlet::{ Graftlet, GraftletInfo, GraftletError, GraftletSource, StaticGraftlet, Instance };
pub use endpoint::{ Endpoint, ErasedCallable, Route, Methods };
pub use exports::{ Exports, ExportTable };
pub use handle::{ GraftletHandle, InvokeError, Call };
pub use dylib::{ DylibGraftlet, GRAFTLET_ABI_VERSION, ABI_VERSION_SYMBOL, INFO_SYMBOL, CREATE_SYMBOL };
pub use loader::{ GraftletLoader, LoadError };
pub use config::{ LoaderConfig, DEFAULT_FIRMWARE_VERSION };
pub use utils::PartialSuccess ;
