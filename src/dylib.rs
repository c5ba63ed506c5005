//! Graftlets shipped as shared libraries.
//!
//! A library exposes three unmangled symbols, normally generated by
//! [`declare_graftlet!`]( crate::declare_graftlet ):
//!
//! | symbol                 | type                                        |
//! |------------------------|---------------------------------------------|
//! | `graftlet_abi_version` | `extern "C" fn() -> u32`                    |
//! | `graftlet_info`        | `extern "C" fn() -> GraftletInfo`           |
//! | `graftlet_create`      | `extern "C" fn() -> Box<dyn Graftlet>`      |
//!
//! The last two pass Rust types across the boundary, so host and graftlet must
//! be built with the same compiler and the same version of this crate. The ABI
//! version is checked before anything else is read from the library. Libraries
//! that open successfully stay loaded for the rest of the process.

use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Mutex, PoisonError };
use libloading::Library ;
use once_cell::sync::Lazy ;

use crate::graftlet::{ Graftlet, GraftletError, GraftletInfo, GraftletSource, Instance };
use crate::loader::LoadError ;



/// Bumped whenever the layout of anything crossing the library boundary changes.
pub const GRAFTLET_ABI_VERSION: u32 = 1 ;

pub const ABI_VERSION_SYMBOL: &str = "graftlet_abi_version" ;
pub const INFO_SYMBOL: &str = "graftlet_info" ;
pub const CREATE_SYMBOL: &str = "graftlet_create" ;

type AbiVersionFn = unsafe extern "C" fn() -> u32 ;
#[allow( improper_ctypes_definitions )]
type InfoFn = unsafe extern "C" fn() -> GraftletInfo ;
#[allow( improper_ctypes_definitions )]
type CreateFn = unsafe extern "C" fn() -> Box<dyn Graftlet> ;

/// Every library that passed [`DylibGraftlet::open`]. Graftlet libraries are
/// never unloaded: callables and type names handed out from them stay valid
/// until the process exits.
static RESIDENT: Lazy<Mutex<Vec<Arc<Library>>>> = Lazy::new(|| Mutex::new( Vec::new() ));

/// A graftlet library that has been opened and identified but not yet created.
pub struct DylibGraftlet {
	path: PathBuf,
	info: GraftletInfo,
	library: Arc<Library>,
}

impl DylibGraftlet {

	/// Opens the library and reads its identity. The graftlet itself is not
	/// created and none of its code besides the two metadata symbols runs.
	///
	/// # Errors
	/// Fails when the file is not a loadable library, a symbol is missing, or
	/// the library was built against another ABI version.
	pub fn open( path: impl AsRef<Path> ) -> Result<Self, LoadError> {

		let path = path.as_ref();

		// SAFETY: loading a library runs its initialisers. Only files placed in
		// the scanned directories are opened, and those are trusted.
		let library = unsafe { Library::new( path ) }
			.map_err(| source | LoadError::LibraryLoad { path: path.to_path_buf(), source })?;

		let found = {
			// SAFETY: the symbol is declared with this signature by `declare_graftlet!`.
			let abi_version = unsafe { library.get::<AbiVersionFn>( ABI_VERSION_SYMBOL.as_bytes() ) }
				.map_err(| source | missing_symbol( path, ABI_VERSION_SYMBOL, source ))?;
			unsafe { abi_version() }
		};
		if found != GRAFTLET_ABI_VERSION {
			return Err( LoadError::AbiMismatch { path: path.to_path_buf(), expected: GRAFTLET_ABI_VERSION, found })
		}

		let info = {
			// SAFETY: the ABI version matches, so the symbol has this signature.
			let info = unsafe { library.get::<InfoFn>( INFO_SYMBOL.as_bytes() ) }
				.map_err(| source | missing_symbol( path, INFO_SYMBOL, source ))?;
			unsafe { info() }
		};

		// SAFETY: as above. Checked now so a broken library fails the scan
		// rather than its activation.
		unsafe { library.get::<CreateFn>( CREATE_SYMBOL.as_bytes() ) }
			.map_err(| source | missing_symbol( path, CREATE_SYMBOL, source ))?;

		let library = Arc::new( library );
		RESIDENT.lock().unwrap_or_else( PoisonError::into_inner ).push( Arc::clone( &library ));
		Ok( Self { path: path.to_path_buf(), info, library })

	}

	#[inline] pub fn path( &self ) -> &Path { &self.path }

}

fn missing_symbol( path: &Path, symbol: &'static str, source: libloading::Error ) -> LoadError {
	LoadError::MissingSymbol { path: path.to_path_buf(), symbol, source }
}

impl GraftletSource for DylibGraftlet {

	fn info( &self ) -> &GraftletInfo { &self.info }

	fn origin( &self ) -> Option<&Path> { Some( &self.path ) }

	fn create( self: Box<Self> ) -> Result<Instance, GraftletError> {
		let graftlet = {
			// SAFETY: presence and ABI were verified in `open`.
			let create = unsafe { self.library.get::<CreateFn>( CREATE_SYMBOL.as_bytes() ) }
				.map_err(| err | GraftletError::new( format!( "{}: {}", self.path.display(), err )))?;
			unsafe { create() }
		};
		Ok( Instance::from_library( graftlet, Arc::clone( &self.library )))
	}

}

impl std::fmt::Debug for DylibGraftlet {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "DylibGraftlet" )
			.field( "path", &self.path )
			.field( "info", &self.info )
			.finish_non_exhaustive()
	}
}

/// Exports a [`Graftlet`] from a `cdylib` crate.
///
/// Takes an expression building the graftlet. It is evaluated once when the
/// host reads the library's identity and once more when the graftlet is created.
///
/// ```ignore
/// struct Storage ;
/// impl graftlets::Graftlet for Storage { /* .. */ }
///
/// graftlets::declare_graftlet!( Storage );
/// ```
#[macro_export]
macro_rules! declare_graftlet {
	( $constructor:expr ) => {
		#[no_mangle]
		pub extern "C" fn graftlet_abi_version() -> u32 { $crate::GRAFTLET_ABI_VERSION }

		#[no_mangle]
		#[allow( improper_ctypes_definitions )]
		pub extern "C" fn graftlet_info() -> $crate::GraftletInfo {
			$crate::Graftlet::info( &$constructor )
		}

		#[no_mangle]
		#[allow( improper_ctypes_definitions )]
		pub extern "C" fn graftlet_create() -> ::std::boxed::Box<dyn $crate::Graftlet> {
			::std::boxed::Box::new( $constructor )
		}
	};
}
