use graftlets::{ Exclusion, GraftletState };
use crate::fixture_graftlets::{ Fixture, loader_with };

#[test]
fn loader_test_cycle_members() {

	let mut loader = loader_with(( 1, 0 ), [
		Fixture::new( "hub", ( 1, 0 )).depends_on( "relay, tail" ),
		Fixture::new( "relay", ( 1, 0 )).depends_on( "hub" ),
		Fixture::new( "tail", ( 1, 0 )).depends_on( "relay" ),
		Fixture::new( "outside", ( 1, 0 )).depends_on( "tail" ),
		Fixture::new( "standalone", ( 1, 0 )),
	]);

	loader.resolve();

	let states = loader.states().collect::<Vec<_>>();
	assert_eq!( states, [
		( "hub", GraftletState::InCycle ),
		( "relay", GraftletState::InCycle ),
		( "tail", GraftletState::InCycle ),
		( "outside", GraftletState::DependencyFailed ),
		( "standalone", GraftletState::Active ),
	]);

	match loader.exclusion( "tail" ) {
		Some( Exclusion::DependencyCycle { cycle }) => assert_eq!( cycle, &[ "tail", "relay", "hub", "tail" ]),
		value => panic!( "Expected Some( DependencyCycle ), found: {:?}", value ),
	}
	assert_eq!( loader.activation_order(), [ "standalone" ]);

}
