use pretty_assertions::assert_eq ;
use depender::{ DependencyMap, DependerOptions, LoadState, ResourceName, transitive_closure };
use crate::harness::{ self, Events, MemoryFetch, RecordingActivator };

const CHAIN: &[( &str, &[&str] )] = &[
    ( "A", &[ "B" ]),
    ( "B", &[ "C" ]),
    ( "C", &[ "None" ]),
];

#[test]
fn closure_lists_dependencies_before_dependants() {

    let mut map = DependencyMap::new();
    map.ingest( harness::manifest( CHAIN ));

    let ( order, problems ) = transitive_closure( &map, &ResourceName::new( "A" ));
    assert_no_warnings!( problems );
    assert_eq!( order, [ "C", "B", "A" ]);

}

#[tokio::test]
async fn require_activates_chain_in_dependency_order() {

    let fetch = MemoryFetch::with_scripts( &[ "A", "B", "C" ]);
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), CHAIN, &fetch, &activator );
    let mut events = Events::subscribe( &depender );

    depender.require([ "A" ]);
    let loaded = events.requirement_loaded().await ;

    assert_eq!( activator.activated(), [ "C", "B", "A" ]);
    assert_eq!( loaded, [ "C", "B", "A" ]);
    assert_eq!( fetch.requests(), [
        harness::script_path( "C" ),
        harness::script_path( "B" ),
        harness::script_path( "A" ),
    ]);
    assert_eq!( depender.state_of( &ResourceName::new( "A" )), LoadState::Loaded );

}
