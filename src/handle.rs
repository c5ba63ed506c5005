use std::any::type_name ;
use std::sync::Arc ;
use thiserror::Error ;

use crate::endpoint::Endpoint ;
use crate::exports::ExportTable ;



/// Spells out the callable type an endpoint is registered and looked up under.
///
/// `signature!( fn( i32, &mut String ) -> bool )` expands to
/// `dyn Fn( i32, &mut String ) -> bool + Send + Sync + 'static`. Both sides of a
/// call must name the same type; reference arguments stay higher-ranked, so the
/// caller can lend locals for the duration of the call.
#[macro_export]
macro_rules! signature {
	( fn( $( $arg:ty ),* $(,)? ) -> $ret:ty ) => { dyn Fn( $( $arg ),* ) -> $ret + Send + Sync + 'static };
	( fn( $( $arg:ty ),* $(,)? ) ) => { dyn Fn( $( $arg ),* ) + Send + Sync + 'static };
}

/// Calls a function-like value with its arguments packed in a tuple.
///
/// Implemented for every `Fn` with up to eight arguments, including unsized
/// `dyn Fn` types.
pub trait Call<Args> {
	type Output ;
	fn call_with( &self, args: Args ) -> Self::Output ;
}

macro_rules! impl_call {
	( $( $arg:ident ),* ) => {
		impl<Func, Ret, $( $arg ),*> Call<( $( $arg, )* )> for Func
		where
			Func: ?Sized + Fn( $( $arg ),* ) -> Ret,
		{
			type Output = Ret ;
			#[allow( non_snake_case )]
			#[inline] fn call_with( &self, ( $( $arg, )* ): ( $( $arg, )* )) -> Ret { ( self )( $( $arg ),* ) }
		}
	};
}

impl_call!();
impl_call!( A1 );
impl_call!( A1, A2 );
impl_call!( A1, A2, A3 );
impl_call!( A1, A2, A3, A4 );
impl_call!( A1, A2, A3, A4, A5 );
impl_call!( A1, A2, A3, A4, A5, A6 );
impl_call!( A1, A2, A3, A4, A5, A6, A7 );
impl_call!( A1, A2, A3, A4, A5, A6, A7, A8 );

/// Failure to reach an endpoint through a [`GraftletHandle`]. The callee never runs.
#[derive( Clone, Debug, PartialEq, Eq, Error )]
pub enum InvokeError {
	/// The name is not in the handle's merged table. Always the case for invalid handles.
	#[error( "Endpoint Not Found: {0}" )]
	NameNotFound( String ),
	/// The endpoint exists but was registered under a different callable type.
	#[error( "Signature Mismatch: {name} is {found}, requested as {expected}" )]
	SignatureMismatch { name: String, expected: &'static str, found: &'static str },
}

/// Name-addressed access to the endpoints of one active graftlet and of every
/// graftlet it transitively depends on.
///
/// Handles are cheap to clone and can be shared across threads. A handle
/// requested for a graftlet that did not make it into the active set is
/// invalid: it holds no endpoints and every lookup fails with
/// [`InvokeError::NameNotFound`].
///
/// ```
/// use std::sync::Arc ;
/// use graftlets::{ Graftlet, GraftletInfo, GraftletError, GraftletLoader, Exports, Version, signature };
///
/// struct Counter ;
///
/// impl Graftlet for Counter {
/// 	fn info( &self ) -> GraftletInfo { GraftletInfo::new( "counter", Version::new( 1, 0 )) }
/// 	fn init( &self, exports: &mut Exports ) -> Result<(), GraftletError> {
/// 		let bump: Arc<signature!( fn( &mut u32, u32 ))> = Arc::new(| total: &mut u32, by: u32 | *total += by );
/// 		exports.function( "bump", bump );
/// 		Ok(())
/// 	}
/// }
///
/// let mut loader = GraftletLoader::default();
/// loader.add_graftlet( Counter ).unwrap();
/// let handle = loader.build_and_resolve_graftlet( "counter" );
///
/// let mut total = 40 ;
/// handle.invoke::<signature!( fn( &mut u32, u32 )), _>( "counter.bump", ( &mut total, 2 )).unwrap();
/// assert_eq!( total, 42 );
///
/// assert!( handle.invoke::<signature!( fn( u32 ) -> u32 ), _>( "counter.bump", ( 2, )).is_err() );
/// ```
#[derive( Clone, Debug, Default )]
pub struct GraftletHandle {
	graftlet: Option<String>,
	tables: Vec<Arc<ExportTable>>,
}

impl GraftletHandle {

	pub(crate) fn new( graftlet: impl Into<String>, tables: Vec<Arc<ExportTable>> ) -> Self {
		Self { graftlet: Some( graftlet.into() ), tables }
	}

	/// A handle with no endpoints.
	pub fn invalid() -> Self { Self::default() }

	#[inline] pub fn is_valid( &self ) -> bool { self.graftlet.is_some() }

	/// The graftlet the handle was requested for, if it is active.
	#[inline] pub fn graftlet( &self ) -> Option<&str> { self.graftlet.as_deref() }

	/// Graftlets whose tables are merged into this handle, the requested one first.
	pub fn graftlets( &self ) -> impl Iterator<Item = &str> { self.tables.iter().map(| table | table.graftlet() ) }

	pub fn endpoints( &self ) -> impl Iterator<Item = &Endpoint> { self.tables.iter().flat_map(| table | table.endpoints() ) }

	pub fn endpoint( &self, name: &str ) -> Option<&Endpoint> {
		self.tables.iter().find_map(| table | table.get( name ))
	}

	#[inline] pub fn contains( &self, name: &str ) -> bool { self.endpoint( name ).is_some() }

	/// Looks up a callable registered under exactly the type `Sig`.
	///
	/// # Errors
	/// [`InvokeError::NameNotFound`] or [`InvokeError::SignatureMismatch`].
	pub fn function<Sig>( &self, name: &str ) -> Result<Arc<Sig>, InvokeError>
	where
		Sig: ?Sized + Send + Sync + 'static,
	{
		let endpoint = self.endpoint( name ).ok_or_else(|| InvokeError::NameNotFound( name.to_string() ))?;
		endpoint.callable::<Sig>().ok_or_else(|| InvokeError::SignatureMismatch {
			name: name.to_string(),
			expected: type_name::<Sig>(),
			found: endpoint.signature(),
		})
	}

	/// Calls the endpoint `name` as `Sig`, with the arguments packed in a tuple.
	///
	/// Arguments are passed exactly as `Sig` declares them: by value (moved in),
	/// `&T`, or `&mut T`, in which case the callee's writes are visible to the
	/// caller afterwards.
	///
	/// # Errors
	/// [`InvokeError::NameNotFound`] or [`InvokeError::SignatureMismatch`]; the
	/// callee is not run in either case.
	pub fn invoke<Sig, Args>( &self, name: &str, args: Args ) -> Result<<Sig as Call<Args>>::Output, InvokeError>
	where
		Sig: ?Sized + Call<Args> + Send + Sync + 'static,
	{
		let callable = self.function::<Sig>( name )?;
		Ok( <Sig as Call<Args>>::call_with( &*callable, args ))
	}

}
