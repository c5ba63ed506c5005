//! The dependency graph of one resolution pass.
//!
//! Every node is a candidate graftlet keyed by name, holding its declared
//! version and its parsed dependency list. Resolution runs in two phases:
//!
//! 1. [`remove_failed_dependants`]( DependencyGraph::remove_failed_dependants )
//! 	excludes graftlets whose declaration is malformed or whose dependencies are
//! 	missing or too old, cascading until a fixpoint is reached.
//! 2. [`find_cycles`]( DependencyGraph::find_cycles ) excludes every surviving
//! 	graftlet that takes part in a cycle, found as the strongly connected
//! 	components of the survivors.
//!
//! No node is ever created for a dependency name without a matching candidate;
//! an edge to such a name is simply unsatisfiable.

use std::collections::{ HashMap, HashSet, VecDeque };
use itertools::Itertools ;

use crate::version::Version ;
use crate::dependency_spec::{ Dependency, DependencySpecError, parse_dependencies };
use crate::exclusion::Exclusion ;



#[derive( Debug )]
struct Node {
	version: Version,
	dependencies: Result<Vec<Dependency>, DependencySpecError>,
}

#[derive( Copy, Clone, PartialEq, Eq )]
enum Colour { White, Grey, Black }

/// Graftlet name to declared version and ordered dependency list.
///
/// ```
/// use graftlets::{ DependencyGraph, Version };
///
/// let mut graph = DependencyGraph::default();
/// graph.initialize([
/// 	( "A", Version::new( 1, 0 ), "B:1.2, C:3, D" ),
/// 	( "B", Version::new( 1, 2 ), "C:0.5, D:7" ),
/// 	( "C", Version::new( 3, 1 ), "D:3.3" ),
/// 	( "D", Version::new( 3, 3 ), "" ),
/// ]);
///
/// // B needs D >= 7 but D is 3.3, and A needs B.
/// let mut removed = graph.remove_failed_dependants();
/// removed.sort();
/// assert_eq!( removed, vec![ "A", "B" ]);
/// assert!( graph.find_cycles( true ).is_empty() );
/// assert_eq!( graph.activation_order(), vec![ "D", "C" ]);
/// ```
#[derive( Debug, Default )]
pub struct DependencyGraph {
	/// Node names in the order they were supplied.
	order: Vec<String>,
	nodes: HashMap<String, Node>,
	excluded: HashMap<String, Exclusion>,
	cycles: Vec<Vec<String>>,
}

impl DependencyGraph {

	/// Replaces the graph with the given `( name, version, dependency declaration )`
	/// candidates, keeping their order.
	///
	/// Declarations are parsed here; a malformed one is kept on the node and
	/// excludes it on the next call to
	/// [`remove_failed_dependants`]( Self::remove_failed_dependants ).
	/// If a name is supplied twice, the first occurrence is kept.
	pub fn initialize<N, S>( &mut self, candidates: impl IntoIterator<Item = ( N, Version, S )> )
	where
		N: Into<String>,
		S: AsRef<str>,
	{
		self.order.clear();
		self.nodes.clear();
		self.excluded.clear();
		self.cycles.clear();

		candidates.into_iter().for_each(|( name, version, spec )| {
			let name = name.into();
			if self.nodes.contains_key( &name ) {
				tracing::debug!( graftlet = %name, "Ignoring repeated graph node" );
				return ;
			}
			let dependencies = parse_dependencies( spec.as_ref() );
			self.order.push( name.clone() );
			self.nodes.insert( name, Node { version, dependencies });
		});
	}

	/// Names of all nodes, in the order supplied.
	pub fn nodes( &self ) -> impl Iterator<Item = &str> { self.order.iter().map( String::as_str ) }

	/// Declared version of a node.
	pub fn version( &self, name: &str ) -> Option<Version> { self.nodes.get( name ).map(| node | node.version ) }

	/// The parsed dependency list of a node, or the error its declaration produced.
	pub fn dependencies( &self, name: &str ) -> Option<Result<&[Dependency], &DependencySpecError>> {
		self.nodes.get( name ).map(| node | node.dependencies.as_deref() )
	}

	/// Returns `true` if the node exists and has not been excluded.
	pub fn is_surviving( &self, name: &str ) -> bool {
		self.nodes.contains_key( name ) && !self.excluded.contains_key( name )
	}

	/// Surviving nodes, in the order supplied.
	pub fn survivors( &self ) -> impl Iterator<Item = &str> {
		self.nodes().filter( move | name | !self.excluded.contains_key( *name ))
	}

	/// Why a node was excluded, if it was.
	pub fn exclusion( &self, name: &str ) -> Option<&Exclusion> { self.excluded.get( name ) }

	/// Every exclusion recorded so far, in the order nodes were supplied.
	pub fn exclusions( &self ) -> impl Iterator<Item = ( &str, &Exclusion )> {
		self.nodes().filter_map( move | name | self.excluded.get( name ).map(| reason | ( name, reason )))
	}

	/// Excludes a node for an external reason, such as a failed activation.
	///
	/// Dependants are not touched; call
	/// [`remove_failed_dependants`]( Self::remove_failed_dependants ) afterwards to
	/// cascade. Returns `false` if the node is unknown or already excluded.
	pub fn exclude( &mut self, name: &str, reason: Exclusion ) -> bool {
		if !self.is_surviving( name ) { return false }
		self.excluded.insert( name.to_string(), reason );
		true
	}

	/// Excludes every node whose declaration is malformed or whose dependencies
	/// are missing, excluded or too old, repeating until nothing changes.
	///
	/// Returns the names excluded by this call. Exclusion cascades: once a node is
	/// excluded, each node depending on it is checked again.
	pub fn remove_failed_dependants( &mut self ) -> Vec<String> {

		let dependants = self.dependants();
		let mut worklist = self.survivors().map( str::to_string ).collect::<VecDeque<_>>();
		let mut removed = Vec::new();

		while let Some( name ) = worklist.pop_front() {

			if !self.is_surviving( &name ) { continue }
			let Some( reason ) = self.failure( &name ) else { continue };

			tracing::debug!( graftlet = %name, %reason, "Dependency resolution failed" );
			self.excluded.insert( name.clone(), reason );

			if let Some( affected ) = dependants.get( &name ) {
				worklist.extend( affected.iter().filter(| dependant | self.is_surviving( dependant )).cloned() );
			}
			removed.push( name );

		}

		removed

	}

	/// Detects every cycle among the surviving nodes and excludes the nodes on them.
	///
	/// With `verbose` set, returns one line per cycle found, e.g. `A -> B -> C -> A`,
	/// or an empty string when the graph is acyclic. Without it, detection and
	/// exclusion still happen but the returned string is always empty; use
	/// [`has_cycles`]( Self::has_cycles ) or [`cycle_trace`]( Self::cycle_trace )
	/// to inspect the outcome later.
	///
	/// Nodes that merely depend on a cycle are not excluded here; a following call
	/// to [`remove_failed_dependants`]( Self::remove_failed_dependants ) cascades to them.
	pub fn find_cycles( &mut self, verbose: bool ) -> String {

		let cycles = self.detect_cycles();

		for component in self.cyclic_components() {
			let members = component.iter().map( String::as_str ).collect::<HashSet<_>>();
			for name in &component {
				let cycle = cycles.iter()
					.find(| cycle | cycle[ ..cycle.len() - 1 ].contains( name ))
					.cloned()
					.or_else(|| self.cycle_through( name, &members ))
					.unwrap_or_else(|| component.clone() );
				tracing::debug!( graftlet = %name, "Graftlet is part of a dependency cycle" );
				self.excluded.insert( name.clone(), Exclusion::DependencyCycle { cycle });
			}
		}
		self.cycles.extend( cycles );

		match verbose {
			true => self.cycle_trace(),
			false => String::new(),
		}

	}

	/// Returns `true` if any call to [`find_cycles`]( Self::find_cycles ) found a cycle.
	pub fn has_cycles( &self ) -> bool { !self.cycles.is_empty() }

	/// Human-readable description of every cycle found so far, one per line.
	pub fn cycle_trace( &self ) -> String {
		self.cycles.iter().map(| cycle | cycle.join( " -> " )).join( "\n" )
	}

	/// Surviving nodes ordered so that every node comes after all of its dependencies.
	///
	/// Ties keep the order nodes were supplied in. Meant to be called once cycles
	/// have been removed; a remaining cycle is broken arbitrarily.
	pub fn activation_order( &self ) -> Vec<String> {

		let mut colour = HashMap::<&str, Colour>::new();
		let mut order = Vec::new();

		for root in self.survivors() {
			if colour.contains_key( root ) { continue }
			colour.insert( root, Colour::Grey );
			let mut stack = vec![( root, 0_usize )];

			while let Some(( node, next_edge )) = stack.last_mut() {
				let node = *node ;
				match self.surviving_edges( node ).get( *next_edge ) {
					Some( &dependency ) => {
						*next_edge += 1 ;
						if let std::collections::hash_map::Entry::Vacant( entry ) = colour.entry( dependency ) {
							entry.insert( Colour::Grey );
							stack.push(( dependency, 0 ));
						}
					},
					None => {
						colour.insert( node, Colour::Black );
						order.push( node.to_string() );
						stack.pop();
					},
				}
			}
		}

		order

	}

	/// All surviving nodes `name` depends on, directly or indirectly, in
	/// breadth-first order. Does not include `name` itself.
	pub fn transitive_dependencies( &self, name: &str ) -> Vec<String> {

		let mut seen = HashSet::from([ name ]);
		let mut queue = VecDeque::from([ name ]);
		let mut found = Vec::new();

		while let Some( node ) = queue.pop_front() {
			for dependency in self.surviving_edges( node ) {
				if seen.insert( dependency ) {
					found.push( dependency.to_string() );
					queue.push_back( dependency );
				}
			}
		}

		found

	}

	/// Why `name` cannot be resolved against the current survivors, if it cannot.
	fn failure( &self, name: &str ) -> Option<Exclusion> {
		let node = self.nodes.get( name )?;
		let dependencies = match &node.dependencies {
			Ok( dependencies ) => dependencies,
			Err( err ) => return Some( Exclusion::MalformedDependencySpec( err.clone() )),
		};
		dependencies.iter().find_map(| dependency | {
			let found = match self.is_surviving( &dependency.name ) {
				true => self.nodes.get( &dependency.name ).map(| node | node.version ),
				false => None,
			};
			match found {
				Some( version ) if version.satisfies( dependency.min_version ) => None,
				found => Some( Exclusion::DependencyUnsatisfied {
					dependency: dependency.name.clone(),
					required: dependency.min_version,
					found,
				}),
			}
		})
	}

	/// Reverse adjacency: dependency name to the nodes that declare it.
	fn dependants( &self ) -> HashMap<String, Vec<String>> {
		self.nodes.iter()
			.filter_map(|( name, node )| node.dependencies.as_ref().ok().map(| deps | ( name, deps )))
			.flat_map(|( name, deps )| deps.iter().map( move | dependency | ( dependency.name.clone(), name.clone() )))
			.into_group_map()
	}

	/// Dependency names of a surviving node that are themselves surviving, in
	/// declaration order.
	fn surviving_edges( &self, name: &str ) -> Vec<&str> {
		match self.nodes.get( name ).map(| node | &node.dependencies ) {
			Some( Ok( dependencies )) => dependencies.iter()
				.map(| dependency | dependency.name.as_str() )
				.filter(| dependency | self.is_surviving( dependency ))
				.collect(),
			_ => Vec::with_capacity( 0 ),
		}
	}

	/// White/grey/black depth-first search over the survivors.
	///
	/// A grey node reached again is an ancestor on the current path, so the edge
	/// closes a cycle; the cycle is rebuilt by following parent pointers from the
	/// edge's source back to that ancestor. Each returned cycle starts and ends
	/// with the same node.
	fn detect_cycles( &self ) -> Vec<Vec<String>> {

		let mut colour = self.survivors().map(| name | ( name, Colour::White )).collect::<HashMap<_, _>>();
		let mut parent = HashMap::<&str, &str>::new();
		let mut back_edges = Vec::<( &str, &str )>::new();

		for root in self.survivors() {
			if colour.get( root ) != Some( &Colour::White ) { continue }
			colour.insert( root, Colour::Grey );
			let mut stack = vec![( root, self.surviving_edges( root ), 0_usize )];

			while let Some(( node, edges, next_edge )) = stack.last_mut() {
				let node = *node ;
				let Some( &dependency ) = edges.get( *next_edge ) else {
					colour.insert( node, Colour::Black );
					stack.pop();
					continue ;
				};
				*next_edge += 1 ;
				match colour.get( dependency ).copied() {
					Some( Colour::White ) => {
						colour.insert( dependency, Colour::Grey );
						parent.insert( dependency, node );
						let edges = self.surviving_edges( dependency );
						stack.push(( dependency, edges, 0 ));
					},
					Some( Colour::Grey ) => back_edges.push(( node, dependency )),
					Some( Colour::Black ) | None => {},
				}
			}
		}

		back_edges.into_iter().map(|( from, to )| {
			let mut path = vec![ from ];
			let mut current = from ;
			while current != to {
				match parent.get( current ) {
					Some( &up ) => { path.push( up ); current = up ; },
					None => break,
				}
			}
			path.reverse();
			path.push( to );
			path.into_iter().map( str::to_string ).collect()
		}).collect()

	}

	/// Strongly connected components of the survivors that contain a cycle: those
	/// with more than one node, and single nodes depending on themselves.
	///
	/// Tarjan's algorithm with an explicit call stack. Unlike the traced search this
	/// catches nodes whose only way back into a cycle runs through a node that was
	/// already finished.
	fn cyclic_components( &self ) -> Vec<Vec<String>> {

		let names = self.survivors().collect::<Vec<_>>();
		let ids = names.iter().enumerate().map(|( id, name )| ( *name, id )).collect::<HashMap<_, _>>();
		let edges = names.iter()
			.map(| name | self.surviving_edges( name ).into_iter().filter_map(| dependency | ids.get( dependency ).copied() ).collect::<Vec<_>>() )
			.collect::<Vec<_>>();

		let mut index = vec![ None::<usize> ; names.len() ];
		let mut lowlink = vec![ 0_usize ; names.len() ];
		let mut on_stack = vec![ false ; names.len() ];
		let mut stack = Vec::new();
		let mut counter = 0_usize ;
		let mut components = Vec::new();

		for root in 0..names.len() {
			if index[ root ].is_some() { continue }
			index[ root ] = Some( counter );
			lowlink[ root ] = counter ;
			counter += 1 ;
			stack.push( root );
			on_stack[ root ] = true ;
			let mut call = vec![( root, 0_usize )];

			while let Some(( node, next_edge )) = call.last_mut() {
				let node = *node ;
				match edges[ node ].get( *next_edge ).copied() {
					Some( dependency ) => {
						*next_edge += 1 ;
						match index[ dependency ] {
							None => {
								index[ dependency ] = Some( counter );
								lowlink[ dependency ] = counter ;
								counter += 1 ;
								stack.push( dependency );
								on_stack[ dependency ] = true ;
								call.push(( dependency, 0 ));
							},
							Some( visited ) if on_stack[ dependency ] => lowlink[ node ] = lowlink[ node ].min( visited ),
							Some( _ ) => {},
						}
					},
					None => {
						call.pop();
						if let Some( &( parent, _ )) = call.last() {
							lowlink[ parent ] = lowlink[ parent ].min( lowlink[ node ] );
						}
						if index[ node ] != Some( lowlink[ node ] ) { continue }
						let mut component = Vec::new();
						while let Some( member ) = stack.pop() {
							on_stack[ member ] = false ;
							component.push( member );
							if member == node { break }
						}
						if component.len() > 1 || edges[ node ].contains( &node ) {
							components.push( component.into_iter().map(| id | names[ id ].to_string() ).collect() );
						}
					},
				}
			}
		}

		components

	}

	/// Shortest cycle from `start` back to itself that stays within `members`,
	/// starting and ending with `start`.
	fn cycle_through( &self, start: &str, members: &HashSet<&str> ) -> Option<Vec<String>> {

		let mut parent = HashMap::<&str, &str>::new();
		let mut queue = VecDeque::from([ start ]);

		while let Some( node ) = queue.pop_front() {
			for dependency in self.surviving_edges( node ) {
				if dependency == start {
					let mut path = vec![ node ];
					let mut current = node ;
					while let Some( &up ) = parent.get( current ) {
						path.push( up );
						current = up ;
					}
					path.reverse();
					path.push( start );
					return Some( path.into_iter().map( str::to_string ).collect() );
				}
				if members.contains( dependency ) && !parent.contains_key( dependency ) {
					parent.insert( dependency, node );
					queue.push_back( dependency );
				}
			}
		}

		None

	}

}
