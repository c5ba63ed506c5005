//! Per-graftlet endpoint registration.

use std::collections::HashMap ;
use std::sync::Arc ;
use libloading::Library ;

use crate::endpoint::{ Endpoint, ErasedCallable, Route };



/// Collects the endpoints a graftlet registers while it is being activated.
///
/// Symbols are qualified with the graftlet's name, so `exports.function( "add", .. )`
/// inside graftlet `math` becomes the endpoint `math.add`. Registering the same
/// symbol twice keeps the later callable.
pub struct Exports {
	graftlet: String,
	library: Option<Arc<Library>>,
	endpoints: HashMap<String, Endpoint>,
	order: Vec<String>,
}

impl Exports {

	/// An empty registry for the graftlet `graftlet`.
	///
	/// The loader creates one per activation; building one by hand is mostly
	/// useful to exercise a graftlet's activation routine in isolation.
	pub fn new( graftlet: impl Into<String> ) -> Self { Self::with_library( graftlet, None ) }

	pub(crate) fn with_library( graftlet: impl Into<String>, library: Option<Arc<Library>> ) -> Self {
		Self { graftlet: graftlet.into(), library, endpoints: HashMap::new(), order: Vec::new() }
	}

	/// Name of the graftlet being activated.
	#[inline] pub fn graftlet( &self ) -> &str { &self.graftlet }

	/// Registers a plain function, callable through
	/// [`GraftletHandle::invoke`]( crate::GraftletHandle::invoke ).
	///
	/// `F` is the exact type callers have to name to reach the callable,
	/// usually written with [`signature!`]( crate::signature ).
	pub fn function<F>( &mut self, symbol: &str, callable: Arc<F> ) -> &mut Self
	where
		F: ?Sized + Send + Sync + 'static,
	{
		self.insert( symbol, None, ErasedCallable::new( callable ))
	}

	/// Registers a request handler to be mounted by the host's routing layer.
	pub fn route<F>( &mut self, symbol: &str, route: Route, handler: Arc<F> ) -> &mut Self
	where
		F: ?Sized + Send + Sync + 'static,
	{
		self.insert( symbol, Some( route ), ErasedCallable::new( handler ))
	}

	#[inline] pub fn len( &self ) -> usize { self.order.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.order.is_empty() }

	fn insert( &mut self, symbol: &str, route: Option<Route>, callable: ErasedCallable ) -> &mut Self {
		let name = format!( "{}.{}", self.graftlet, symbol );
		let endpoint = Endpoint::new( name.clone(), route, callable, self.library.clone() );
		match self.endpoints.insert( name.clone(), endpoint ) {
			Some( _ ) => tracing::warn!( endpoint = %name, "Endpoint registered twice, keeping the later one" ),
			None => self.order.push( name ),
		}
		self
	}

	pub(crate) fn into_table( self ) -> ExportTable {
		ExportTable { graftlet: self.graftlet, endpoints: self.endpoints, order: self.order }
	}

}

impl std::fmt::Debug for Exports {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Exports" )
			.field( "graftlet", &self.graftlet )
			.field( "endpoints", &self.order )
			.finish_non_exhaustive()
	}
}

/// The frozen endpoint table of one active graftlet, shared by every handle over it.
#[derive( Debug )]
pub struct ExportTable {
	graftlet: String,
	endpoints: HashMap<String, Endpoint>,
	order: Vec<String>,
}

impl ExportTable {

	#[inline] pub fn graftlet( &self ) -> &str { &self.graftlet }

	#[inline] pub fn get( &self, name: &str ) -> Option<&Endpoint> { self.endpoints.get( name ) }

	/// Endpoints in registration order.
	pub fn endpoints( &self ) -> impl Iterator<Item = &Endpoint> {
		self.order.iter().filter_map(| name | self.endpoints.get( name ))
	}

	#[inline] pub fn len( &self ) -> usize { self.order.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.order.is_empty() }

}
