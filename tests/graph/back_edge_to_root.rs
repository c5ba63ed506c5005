use crate::build_graph ;

#[test]
fn graph_test_back_edge_to_root() {

	let mut graph = build_graph( &[
		( "A", ( 1, 0 ), "C, D" ),
		( "B", ( 1, 0 ), "" ),
		( "C", ( 1, 0 ), "B" ),
		( "D", ( 1, 0 ), "B, C, A" ),
	]);

	assert!( graph.remove_failed_dependants().is_empty() );
	assert_eq!( graph.find_cycles( true ), "A -> D -> A" );
	assert_eq!( graph.survivors().collect::<Vec<_>>(), [ "B", "C" ]);
	assert!( graph.remove_failed_dependants().is_empty() );
	assert_eq!( graph.activation_order(), [ "B", "C" ]);

}
