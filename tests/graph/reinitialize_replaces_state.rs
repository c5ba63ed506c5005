use graftlets::Version ;
use crate::build_graph ;

#[test]
fn graph_test_reinitialize_replaces_state() {

	let mut graph = build_graph( &[
		( "A", ( 1, 0 ), "A" ),
		( "B", ( 1, 0 ), "missing" ),
	]);
	graph.remove_failed_dependants();
	graph.find_cycles( false );
	assert_eq!( graph.survivors().count(), 0 );

	graph.initialize([
		( "A", Version::new( 2, 0 ), "" ),
		( "A", Version::new( 9, 9 ), "" ),
		( "C", Version::new( 1, 0 ), "A: 2" ),
	]);

	assert!( !graph.has_cycles() );
	assert_eq!( graph.exclusions().count(), 0 );
	assert_eq!( graph.nodes().collect::<Vec<_>>(), [ "A", "C" ]);
	assert_eq!( graph.version( "A" ), Some( Version::new( 2, 0 )));
	assert!( graph.remove_failed_dependants().is_empty() );

}
