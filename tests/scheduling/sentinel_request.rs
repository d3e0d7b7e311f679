use pretty_assertions::assert_eq ;
use depender::DependerOptions ;
use crate::harness::{ self, Event, Events, MemoryFetch, RecordingActivator };

const SINGLE: &[( &str, &[&str] )] = &[
    ( "A", &[]),
];

#[tokio::test]
async fn no_dependency_marker_is_not_requested() {

    let fetch = MemoryFetch::with_scripts( &[ "A" ]);
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), SINGLE, &fetch, &activator );
    let mut events = Events::subscribe( &depender );

    depender.require([ "None", "A" ]);
    events.requirement_loaded().await ;
    harness::settle( &depender ).await ;

    assert_eq!( fetch.requests(), [ harness::script_path( "A" )]);
    assert!( depender.pending().is_empty() );
    assert_eq!( events.drain(), [
        Event::Require( vec![ "A".to_string() ]),
        Event::ScriptLoaded { script: "A".to_string(), percent_of_total: 100.0, percent_of_batch: 100.0 },
        Event::Ready( vec![ "A".to_string() ]),
        Event::RequirementLoaded( vec![ "A".to_string() ]),
    ]);

}

#[tokio::test]
async fn blank_names_leave_later_requests_unblocked() {

    let fetch = MemoryFetch::with_scripts( &[ "A" ]);
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), SINGLE, &fetch, &activator );
    let mut events = Events::subscribe( &depender );

    depender.require([ "", "  ", "None" ]);

    assert_eq!( events.drain(), [
        Event::Require( Vec::new() ),
        Event::Ready( Vec::new() ),
        Event::RequirementLoaded( Vec::new() ),
    ]);

    depender.require([ "A" ]);
    assert_eq!( events.requirement_loaded().await, [ "A" ]);
    assert!( fetch.requests().iter().all(| locator | locator == &harness::script_path( "A" )));

}

#[tokio::test]
async fn assuming_the_marker_loaded_changes_nothing() {

    let fetch = MemoryFetch::new();
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), SINGLE, &fetch, &activator );

    depender.assume_loaded([ "None" ]);

    assert!( depender.loaded().is_empty() );

}
