//! The module side of the runtime.
//!
//! A graftlet is a unit that contributes callables to the host. It describes
//! itself through a [`GraftletInfo`] that the loader reads before deciding
//! whether to activate it, and registers its exports in [`Graftlet::init`] once
//! all of its dependencies have been activated.

use std::path::Path ;
use std::sync::Arc ;
use libloading::Library ;
use thiserror::Error ;

use crate::version::{ Version, VersionRange };
use crate::exports::Exports ;



/// Identity of a graftlet, readable without activating it.
#[derive( Clone, Debug, PartialEq, Eq )]
pub struct GraftletInfo {
	/// Unique name; also the prefix of every endpoint the graftlet exports.
	pub name: String,
	pub version: Version,
	/// Raw dependency declaration, e.g. `"storage: 1.2, auth"`.
	pub dependencies: String,
	/// Host firmware versions this graftlet supports, both ends inclusive.
	pub firmware: VersionRange,
}

impl GraftletInfo {

	/// A graftlet with no dependencies that supports every firmware version.
	pub fn new( name: impl Into<String>, version: Version ) -> Self {
		Self {
			name: name.into(),
			version,
			dependencies: String::new(),
			firmware: VersionRange::ANY,
		}
	}

	/// Sets the raw dependency declaration.
	pub fn with_dependencies( mut self, dependencies: impl Into<String> ) -> Self {
		self.dependencies = dependencies.into();
		self
	}

	/// Sets the supported firmware range.
	pub fn with_firmware( mut self, min: Version, max: Version ) -> Self {
		self.firmware = VersionRange::new( min, max );
		self
	}

}

/// Error reported by a graftlet while it is being created or activated.
#[derive( Clone, Debug, PartialEq, Eq, Error )]
#[error( "{0}" )]
pub struct GraftletError( String );

impl GraftletError {
	pub fn new( message: impl Into<String> ) -> Self { Self( message.into() ) }
}

/// A loadable module contributing callables to the host.
///
/// # Example
///
/// ```
/// use std::sync::Arc ;
/// use graftlets::{ Graftlet, GraftletInfo, GraftletError, Exports, Version };
///
/// struct Greeter ;
///
/// impl Graftlet for Greeter {
/// 	fn info( &self ) -> GraftletInfo {
/// 		GraftletInfo::new( "greeter", Version::new( 1, 0 ))
/// 	}
/// 	fn init( &self, exports: &mut Exports ) -> Result<(), GraftletError> {
/// 		let greet: Arc<graftlets::signature!( fn( &str ) -> String )> =
/// 			Arc::new(| name: &str | format!( "Hello, {}", name ));
/// 		exports.function( "greet", greet );
/// 		Ok(())
/// 	}
/// }
/// ```
pub trait Graftlet: Send + Sync {

	/// Identity metadata. Must not depend on [`init`]( Self::init ) having run.
	fn info( &self ) -> GraftletInfo ;

	/// Activation routine: registers the graftlet's endpoints.
	///
	/// Runs at most once per loader, after every dependency has been activated.
	///
	/// # Errors
	/// An error excludes the graftlet and, in turn, every graftlet depending on it.
	fn init( &self, exports: &mut Exports ) -> Result<(), GraftletError> ;

}

/// A created graftlet, together with the library its code lives in.
///
/// Field order matters: the graftlet is dropped before the library is released.
pub struct Instance {
	pub(crate) graftlet: Box<dyn Graftlet>,
	pub(crate) library: Option<Arc<Library>>,
}

impl Instance {

	/// Wraps a graftlet compiled into the host.
	pub fn new( graftlet: Box<dyn Graftlet> ) -> Self { Self { graftlet, library: None }}

	/// Wraps a graftlet created from a dynamically loaded library.
	pub fn from_library( graftlet: Box<dyn Graftlet>, library: Arc<Library> ) -> Self {
		Self { graftlet, library: Some( library )}
	}

}

impl std::fmt::Debug for Instance {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Instance" )
			.field( "graftlet", &self.graftlet.info().name )
			.field( "library", &self.library.as_ref().map(| _ | "<Library>" ))
			.finish()
	}
}

/// Where candidate graftlets come from.
///
/// Implemented for shared libraries by [`DylibGraftlet`]( crate::DylibGraftlet )
/// and for graftlets compiled into the host by [`StaticGraftlet`]. The loader
/// reads [`info`]( Self::info ) for every candidate but only calls
/// [`create`]( Self::create ) for the ones it activates.
pub trait GraftletSource: Send {

	/// Identity metadata, available without creating the graftlet.
	fn info( &self ) -> &GraftletInfo ;

	/// File the graftlet was loaded from, if any.
	fn origin( &self ) -> Option<&Path> { None }

	/// Creates the graftlet so it can be activated.
	///
	/// # Errors
	/// Implementations fail when the module cannot be instantiated.
	fn create( self: Box<Self> ) -> Result<Instance, GraftletError> ;

}

/// A graftlet compiled into the host, registered without going through a library.
pub struct StaticGraftlet {
	info: GraftletInfo,
	graftlet: Box<dyn Graftlet>,
}

impl StaticGraftlet {
	pub fn new( graftlet: impl Graftlet + 'static ) -> Self {
		Self { info: graftlet.info(), graftlet: Box::new( graftlet ) }
	}
}

impl GraftletSource for StaticGraftlet {
	fn info( &self ) -> &GraftletInfo { &self.info }
	fn create( self: Box<Self> ) -> Result<Instance, GraftletError> { Ok( Instance::new( self.graftlet )) }
}
