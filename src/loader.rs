//! Discovery, resolution and activation of graftlets.
//!
//! A [`GraftletLoader`] collects candidates (from directory scans or explicit
//! registration) and resolves them exactly once, the first time their endpoints
//! are asked for:
//!
//! 1. candidates whose firmware range does not match the host are rejected;
//! 2. the survivors form a [`DependencyGraph`]; graftlets with malformed, missing
//! 	or outdated dependencies are removed, cascading to their dependants;
//! 3. graftlets on a dependency cycle are removed, and in turn whatever depends on them;
//! 4. the rest are created and activated leaves first. A failed activation
//! 	removes the graftlet and everything depending on it before those activate.
//!
//! Nothing in this sequence aborts resolution. Every candidate ends up either
//! [`Active`]( GraftletState::Active ) or excluded with a recorded [`Exclusion`].

use std::collections::HashMap ;
use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use itertools::Itertools ;
use pipe_trait::Pipe ;
use thiserror::Error ;
use tracing::{ debug, info, warn };

use crate::config::{ self, LoaderConfig };
use crate::dependency_graph::DependencyGraph ;
use crate::dylib::DylibGraftlet ;
use crate::endpoint::Endpoint ;
use crate::exclusion::{ Exclusion, GraftletState };
use crate::exports::{ Exports, ExportTable };
use crate::firmware::FirmwareFilter ;
use crate::graftlet::{ Graftlet, GraftletInfo, GraftletError, GraftletSource, Instance, StaticGraftlet };
use crate::handle::GraftletHandle ;
use crate::utils::PartialSuccess ;



/// A candidate that could not be added to a loader.
///
/// These never affect the other candidates; a scan reports them next to the
/// number of graftlets it did add.
#[derive( Debug, Error )]
pub enum LoadError {
	#[error( "Failed to Read Directory {}: {source}", .path.display() )]
	ReadDirectory { path: PathBuf, #[source] source: std::io::Error },
	#[error( "Failed to Load Library {}: {source}", .path.display() )]
	LibraryLoad { path: PathBuf, #[source] source: libloading::Error },
	#[error( "Missing Symbol {symbol} in {}: {source}", .path.display() )]
	MissingSymbol { path: PathBuf, symbol: &'static str, #[source] source: libloading::Error },
	#[error( "ABI Mismatch in {}: expected {expected}, found {found}", .path.display() )]
	AbiMismatch { path: PathBuf, expected: u32, found: u32 },
	#[error( "Duplicate Graftlet Name {name}{}", origin_suffix( .origin ))]
	DuplicateName { name: String, origin: Option<PathBuf> },
	#[error( "Graftlets Already Resolved" )]
	ScanAfterResolution,
}

fn origin_suffix( origin: &Option<PathBuf> ) -> String {
	origin.as_ref().map(| path | format!( " in {}", path.display() )).unwrap_or_default()
}

struct Candidate {
	info: GraftletInfo,
	origin: Option<PathBuf>,
	/// Taken when the graftlet is created.
	source: Option<Box<dyn GraftletSource>>,
	state: GraftletState,
	exclusion: Option<Exclusion>,
	instance: Option<Instance>,
}

impl Candidate {

	fn new( source: Box<dyn GraftletSource> ) -> Self {
		Self {
			info: source.info().clone(),
			origin: source.origin().map( Path::to_path_buf ),
			source: Some( source ),
			state: GraftletState::Discovered,
			exclusion: None,
			instance: None,
		}
	}

	fn exclude( &mut self, reason: Exclusion ) {
		warn!( graftlet = %self.info.name, %reason, "Graftlet excluded" );
		self.state = reason.state();
		self.exclusion = Some( reason );
	}

}

/// Finds, resolves and activates graftlets.
///
/// Resolution happens at most once per loader, on the first call to
/// [`resolve`]( Self::resolve ), [`get_endpoints`]( Self::get_endpoints ) or
/// [`build_and_resolve_graftlet`]( Self::build_and_resolve_graftlet ); every later
/// call reuses its outcome. Candidates can only be added before that.
///
/// ```
/// use graftlets::{ GraftletLoader, LoaderConfig, Version };
///
/// let mut loader = GraftletLoader::with_config( LoaderConfig::new( Version::new( 2, 1 ), Default::default() ));
/// let ( found, errors ) = loader.find_graftlets_in_directory( "/nonexistent", "so" );
/// assert_eq!( found, 0 );
/// assert_eq!( errors.len(), 1 );
/// assert!( loader.get_endpoints().is_empty() );
/// ```
pub struct GraftletLoader {
	config: LoaderConfig,
	candidates: Vec<Candidate>,
	index: HashMap<String, usize>,
	graph: DependencyGraph,
	tables: HashMap<String, Arc<ExportTable>>,
	activated: Vec<String>,
	resolved: bool,
}

impl Default for GraftletLoader {
	fn default() -> Self { Self::new() }
}

impl GraftletLoader {

	/// A loader using a snapshot of the process-wide [`config`]( crate::config ).
	pub fn new() -> Self { Self::with_config( config::current() ) }

	/// A loader using `config` instead of the process-wide configuration.
	pub fn with_config( config: LoaderConfig ) -> Self {
		Self {
			config,
			candidates: Vec::new(),
			index: HashMap::new(),
			graph: DependencyGraph::default(),
			tables: HashMap::new(),
			activated: Vec::new(),
			resolved: false,
		}
	}

	#[inline] pub fn config( &self ) -> &LoaderConfig { &self.config }

	#[inline] pub fn is_resolved( &self ) -> bool { self.resolved }

	/// Adds every library with the given extension found directly in `dir`.
	///
	/// Subdirectories are not searched and files are visited in path order. The
	/// extension may be given with or without its leading dot. Each library is
	/// opened and identified without being created.
	///
	/// Returns how many graftlets were added, along with the files that could not
	/// be; a file that fails does not stop the scan.
	pub fn find_graftlets_in_directory( &mut self, dir: impl AsRef<Path>, extension: &str ) -> PartialSuccess<usize, LoadError> {

		let dir = dir.as_ref();
		if self.resolved { return ( 0, vec![ LoadError::ScanAfterResolution ]) }

		let entries = match std::fs::read_dir( dir ) {
			Ok( entries ) => entries,
			Err( source ) => {
				warn!( directory = %dir.display(), %source, "Cannot scan for graftlets" );
				return ( 0, vec![ LoadError::ReadDirectory { path: dir.to_path_buf(), source }]);
			},
		};

		let extension = extension.trim_start_matches( '.' );
		let ( paths, mut errors ): ( Vec<_>, Vec<_> ) = entries
			.map(| entry | entry
				.map(| entry | entry.path() )
				.map_err(| source | LoadError::ReadDirectory { path: dir.to_path_buf(), source })
			)
			.partition_result();

		let libraries = paths.into_iter()
			.filter(| path | path.is_file() && path.extension().is_some_and(| ext | ext == extension ))
			.sorted()
			.collect::<Vec<_>>();
		debug!( directory = %dir.display(), count = libraries.len(), "Scanning for graftlets" );

		let mut added = 0 ;
		for path in libraries {
			match DylibGraftlet::open( &path ).and_then(| graftlet | self.add_source( Box::new( graftlet ))) {
				Ok(()) => added += 1,
				Err( err ) => {
					warn!( file = %path.display(), %err, "Skipping graftlet library" );
					errors.push( err );
				},
			}
		}

		( added, errors )

	}

	/// Registers a graftlet compiled into the host. It goes through the same
	/// resolution as graftlets loaded from libraries.
	///
	/// # Errors
	/// [`LoadError::DuplicateName`] if a graftlet with the same name is already
	/// known, [`LoadError::ScanAfterResolution`] once the loader has resolved.
	pub fn add_graftlet( &mut self, graftlet: impl Graftlet + 'static ) -> Result<(), LoadError> {
		self.add_source( Box::new( StaticGraftlet::new( graftlet )))
	}

	/// Registers a candidate from any source. The first candidate with a given
	/// name wins.
	///
	/// # Errors
	/// As for [`add_graftlet`]( Self::add_graftlet ).
	pub fn add_source( &mut self, source: Box<dyn GraftletSource> ) -> Result<(), LoadError> {

		if self.resolved { return Err( LoadError::ScanAfterResolution ) }

		let candidate = Candidate::new( source );
		if self.index.contains_key( &candidate.info.name ) {
			return Err( LoadError::DuplicateName { name: candidate.info.name, origin: candidate.origin });
		}

		debug!(
			graftlet = %candidate.info.name,
			version = %candidate.info.version,
			dependencies = %candidate.info.dependencies,
			firmware = %candidate.info.firmware,
			"Discovered graftlet",
		);
		self.index.insert( candidate.info.name.clone(), self.candidates.len() );
		self.candidates.push( candidate );
		Ok(())

	}

	/// Resolves and activates the candidates, unless that already happened.
	pub fn resolve( &mut self ) {

		if self.resolved { return }
		self.resolved = true ;

		let filter = FirmwareFilter::new( self.config.firmware_version, &self.config.exceptions );
		for candidate in &mut self.candidates {
			if let Err( reason ) = filter.check( &candidate.info ) { candidate.exclude( reason ) }
		}

		self.graph.initialize( self.candidates.iter()
			.filter(| candidate | candidate.state == GraftletState::Discovered )
			.map(| candidate | ( candidate.info.name.clone(), candidate.info.version, candidate.info.dependencies.as_str() ))
		);

		self.graph.remove_failed_dependants();
		let trace = self.graph.find_cycles( true );
		if !trace.is_empty() { warn!( "Dependency cycles detected:\n{}", trace ) }
		self.graph.remove_failed_dependants();

		for name in self.graph.activation_order() {
			if !self.graph.is_surviving( &name ) { continue }
			if let Err( reason ) = self.activate( &name ) {
				self.graph.exclude( &name, reason );
				self.graph.remove_failed_dependants();
			}
		}

		for candidate in &mut self.candidates {
			if candidate.exclusion.is_some() { continue }
			if let Some( reason ) = self.graph.exclusion( &candidate.info.name ) { candidate.exclude( reason.clone() ) }
		}

		info!(
			candidates = self.candidates.len(),
			active = self.activated.len(),
			excluded = self.candidates.len() - self.activated.len(),
			"Graftlets resolved",
		);

	}

	fn activate( &mut self, name: &str ) -> Result<(), Exclusion> {

		let Some( candidate ) = self.index.get( name ).and_then(| &index | self.candidates.get_mut( index )) else {
			return Err( Exclusion::ActivationFailed( GraftletError::new( "Unknown graftlet" )));
		};
		let source = candidate.source.take()
			.ok_or_else(|| Exclusion::ActivationFailed( GraftletError::new( "Graftlet already activated" )))?;

		debug!( graftlet = %name, "Activating graftlet" );
		candidate.state = GraftletState::Activating ;

		let instance = source.create().map_err( Exclusion::ActivationFailed )?;
		let mut exports = Exports::with_library( name, instance.library.clone() );
		instance.graftlet.init( &mut exports ).map_err( Exclusion::ActivationFailed )?;

		debug!( graftlet = %name, endpoints = exports.len(), "Graftlet active" );
		candidate.state = GraftletState::Active ;
		candidate.instance = Some( instance );
		self.tables.insert( name.to_string(), exports.into_table().pipe( Arc::new ));
		self.activated.push( name.to_string() );
		Ok(())

	}

	/// Every endpoint of every active graftlet, grouped by graftlet in activation
	/// order. Resolves first if needed; repeated calls return the same endpoints.
	pub fn get_endpoints( &mut self ) -> Vec<Endpoint> {
		self.resolve();
		self.activated.iter()
			.filter_map(| name | self.tables.get( name ))
			.flat_map(| table | table.endpoints().cloned() )
			.collect()
	}

	/// A handle over the endpoints of `name` and of every graftlet it transitively
	/// depends on. Resolves first if needed.
	///
	/// If `name` is not active the handle is invalid and every invocation through
	/// it fails.
	pub fn build_and_resolve_graftlet( &mut self, name: &str ) -> GraftletHandle {

		self.resolve();
		let Some( table ) = self.tables.get( name ) else {
			debug!( graftlet = %name, reason = ?self.exclusion( name ), "Handle requested for inactive graftlet" );
			return GraftletHandle::invalid();
		};

		let tables = std::iter::once( Arc::clone( table ))
			.chain( self.graph.transitive_dependencies( name ).iter().filter_map(| dependency | self.tables.get( dependency ).cloned() ))
			.collect();
		GraftletHandle::new( name, tables )

	}

	/// Lifecycle state of a known graftlet.
	pub fn state( &self, name: &str ) -> Option<GraftletState> {
		self.candidate( name ).map(| candidate | candidate.state )
	}

	/// Every known graftlet and its state, in discovery order.
	pub fn states( &self ) -> impl Iterator<Item = ( &str, GraftletState )> {
		self.candidates.iter().map(| candidate | ( candidate.info.name.as_str(), candidate.state ))
	}

	/// Identity of a known graftlet.
	pub fn info( &self, name: &str ) -> Option<&GraftletInfo> {
		self.candidate( name ).map(| candidate | &candidate.info )
	}

	/// File a known graftlet was loaded from, if it came from a library.
	pub fn origin( &self, name: &str ) -> Option<&Path> {
		self.candidate( name ).and_then(| candidate | candidate.origin.as_deref() )
	}

	/// Why a graftlet was excluded, if it was.
	pub fn exclusion( &self, name: &str ) -> Option<&Exclusion> {
		self.candidate( name ).and_then(| candidate | candidate.exclusion.as_ref() )
	}

	/// Every excluded graftlet with its reason, in discovery order.
	pub fn exclusions( &self ) -> impl Iterator<Item = ( &str, &Exclusion )> {
		self.candidates.iter()
			.filter_map(| candidate | candidate.exclusion.as_ref().map(| reason | ( candidate.info.name.as_str(), reason )))
	}

	/// Names of the active graftlets in the order they were activated.
	#[inline] pub fn activation_order( &self ) -> &[String] { &self.activated }

	/// One line per dependency cycle found during resolution, empty if none.
	pub fn cycle_trace( &self ) -> String { self.graph.cycle_trace() }

	fn candidate( &self, name: &str ) -> Option<&Candidate> {
		self.index.get( name ).and_then(| &index | self.candidates.get( index ))
	}

}

impl std::fmt::Debug for GraftletLoader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "GraftletLoader" )
			.field( "config", &self.config )
			.field( "candidates", &self.states().collect::<Vec<_>>() )
			.field( "resolved", &self.resolved )
			.finish_non_exhaustive()
	}
}
