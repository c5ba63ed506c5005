//! Exported callables and their type-erased storage.
//!
//! This is the only place where callables lose and regain their static type.
//! A callable is stored as an `Arc<F>` for some unsized function type `F`
//! (usually `dyn Fn( .. ) -> R + Send + Sync`) behind `dyn Any`, and can only be
//! recovered by asking for that exact `F` again.

use std::any::{ Any, type_name };
use std::sync::Arc ;
use libloading::Library ;



/// A callable with its concrete function type erased.
#[derive( Clone )]
pub struct ErasedCallable {
	/// Always an `Arc<F>` for the `F` named by `signature`.
	callable: Arc<dyn Any + Send + Sync>,
	signature: &'static str,
}

impl ErasedCallable {

	pub fn new<F>( callable: Arc<F> ) -> Self
	where
		F: ?Sized + Send + Sync + 'static,
	{
		Self { callable: Arc::new( callable ), signature: type_name::<F>() }
	}

	/// Recovers the callable if it was registered as exactly `F`.
	pub fn downcast<F>( &self ) -> Option<Arc<F>>
	where
		F: ?Sized + Send + Sync + 'static,
	{
		self.callable.downcast_ref::<Arc<F>>().cloned()
	}

	/// Name of the function type the callable was registered as.
	#[inline] pub fn signature( &self ) -> &'static str { self.signature }

}

impl std::fmt::Debug for ErasedCallable {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ErasedCallable" ).field( "signature", &self.signature ).finish_non_exhaustive()
	}
}

/// HTTP methods a routed endpoint answers to.
#[derive( Copy, Clone, PartialEq, Eq, Hash, Default )]
pub struct Methods( u8 );

impl Methods {
	pub const GET: Self = Self( 1 );
	pub const POST: Self = Self( 1 << 1 );
	pub const PUT: Self = Self( 1 << 2 );
	pub const DELETE: Self = Self( 1 << 3 );
	pub const PATCH: Self = Self( 1 << 4 );
	pub const HEAD: Self = Self( 1 << 5 );
	pub const OPTIONS: Self = Self( 1 << 6 );

	const NAMES: [( Self, &'static str ); 7] = [
		( Self::GET, "GET" ), ( Self::POST, "POST" ), ( Self::PUT, "PUT" ), ( Self::DELETE, "DELETE" ),
		( Self::PATCH, "PATCH" ), ( Self::HEAD, "HEAD" ), ( Self::OPTIONS, "OPTIONS" ),
	];

	#[inline] pub const fn contains( self, other: Self ) -> bool { self.0 & other.0 == other.0 }
	#[inline] pub const fn is_empty( self ) -> bool { self.0 == 0 }
}

impl std::ops::BitOr for Methods {
	type Output = Self ;
	fn bitor( self, rhs: Self ) -> Self { Self( self.0 | rhs.0 ) }
}

impl std::fmt::Debug for Methods {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		let names = Self::NAMES.iter()
			.filter(|( method, _ )| self.contains( *method ))
			.map(|( _, name )| *name )
			.collect::<Vec<_>>();
		write!( f, "{}", names.join( "|" ))
	}
}

/// Where the routing layer should mount an endpoint.
#[derive( Clone, Debug, PartialEq, Eq, Hash )]
pub struct Route {
	pub path: String,
	pub methods: Methods,
}

impl Route {
	pub fn new( path: impl Into<String>, methods: Methods ) -> Self { Self { path: path.into(), methods }}
}

/// A named callable exported by an active graftlet.
///
/// The name is qualified as `"<graftlet>.<symbol>"`. Endpoints with a [`Route`]
/// are request handlers meant for the host's routing table; the rest are plain
/// functions reachable through [`GraftletHandle::invoke`]( crate::GraftletHandle::invoke ).
///
/// An endpoint keeps the library it came from loaded for as long as it exists.
#[derive( Clone )]
pub struct Endpoint {
	name: String,
	route: Option<Route>,
	callable: ErasedCallable,
	/// Declared last so the callable is released before the library.
	library: Option<Arc<Library>>,
}

impl Endpoint {

	pub(crate) fn new( name: String, route: Option<Route>, callable: ErasedCallable, library: Option<Arc<Library>> ) -> Self {
		Self { name, route, callable, library }
	}

	/// Qualified name, `"<graftlet>.<symbol>"`.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Name of the graftlet that exported this endpoint.
	pub fn graftlet( &self ) -> &str { self.name.split_once( '.' ).map_or( self.name.as_str(), |( graftlet, _ )| graftlet ) }

	/// The exported symbol, without the graftlet prefix.
	pub fn symbol( &self ) -> &str { self.name.split_once( '.' ).map_or( "", |( _, symbol )| symbol ) }

	#[inline] pub fn route( &self ) -> Option<&Route> { self.route.as_ref() }

	/// Name of the function type the callable was registered as.
	#[inline] pub fn signature( &self ) -> &'static str { self.callable.signature() }

	/// Recovers the callable if it was registered as exactly `F`.
	pub fn callable<F>( &self ) -> Option<Arc<F>>
	where
		F: ?Sized + Send + Sync + 'static,
	{
		self.callable.downcast::<F>()
	}

	/// Whether the endpoint's code lives in a dynamically loaded library.
	#[inline] pub fn is_dynamic( &self ) -> bool { self.library.is_some() }

}

impl std::fmt::Debug for Endpoint {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Endpoint" )
			.field( "name", &self.name )
			.field( "route", &self.route )
			.field( "signature", &self.callable.signature )
			.field( "library", &self.library.as_ref().map(| _ | "<Library>" ))
			.finish()
	}
}
