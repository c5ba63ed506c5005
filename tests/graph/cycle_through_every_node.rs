use crate::build_graph ;

#[test]
fn graph_test_cycle_through_every_node() {

	let mut graph = build_graph( &[
		( "A", ( 1, 0 ), "B, C, D" ),
		( "B", ( 1, 0 ), "C, D" ),
		( "C", ( 1, 0 ), "D" ),
		( "D", ( 1, 0 ), "A" ),
	]);

	assert!( graph.remove_failed_dependants().is_empty() );
	let trace = graph.find_cycles( true );
	assert!( !trace.is_empty() );
	assert!( trace.lines().all(| line | line.starts_with( "A -> " ) && line.ends_with( " -> A" )), "{}", trace );

	assert_eq!( graph.survivors().count(), 0 );
	assert!( graph.activation_order().is_empty() );

}
