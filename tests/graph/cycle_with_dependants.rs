use crate::{ build_graph, sorted };

#[test]
fn graph_test_cycle_with_dependants() {

	let mut graph = build_graph( &[
		( "A", ( 1, 0 ), "D" ),
		( "B", ( 1, 0 ), "B" ),
		( "C", ( 1, 0 ), "B" ),
		( "D", ( 1, 0 ), "C" ),
	]);

	assert!( graph.remove_failed_dependants().is_empty() );
	assert_eq!( graph.find_cycles( true ), "B -> B" );
	assert_eq!( graph.survivors().count(), 3 );

	assert_eq!( sorted( graph.remove_failed_dependants() ), [ "A", "C", "D" ]);
	assert_eq!( graph.survivors().count(), 0 );

}
