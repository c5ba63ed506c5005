use crate::build_graph ;

#[test]
fn graph_test_all_dependencies_satisfied() {

	let mut graph = build_graph( &[
		( "A", ( 1, 0 ), "B:1.2, C:3, D" ),
		( "B", ( 1, 2 ), "C:0.5, D:7" ),
		( "C", ( 3, 1 ), "D:3.3" ),
		( "D", ( 7, 0 ), "" ),
	]);

	assert!( graph.remove_failed_dependants().is_empty() );
	assert_eq!( graph.find_cycles( true ), "" );
	assert!( !graph.has_cycles() );
	assert_eq!( graph.survivors().count(), 4 );
	assert_eq!( graph.exclusions().count(), 0 );

}
