use pretty_assertions::assert_eq ;
use depender::DependerOptions ;
use crate::harness::{ self, Event, Events, MemoryFetch, RecordingActivator };

const CHAIN: &[( &str, &[&str] )] = &[
    ( "A", &[ "B" ]),
    ( "B", &[]),
];

#[tokio::test]
async fn requiring_loaded_names_is_satisfied_immediately() {

    let fetch = MemoryFetch::with_scripts( &[ "A", "B" ]);
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), CHAIN, &fetch, &activator );
    let mut events = Events::subscribe( &depender );

    depender.require([ "A" ]);
    events.requirement_loaded().await ;
    harness::settle( &depender ).await ;
    events.drain();

    depender.require([ "A" ]);

    assert!( !depender.is_loading() );
    assert_eq!( events.drain(), [
        Event::Require( vec![ "A".to_string() ]),
        Event::Ready( vec![ "B".to_string(), "A".to_string() ]),
        Event::RequirementLoaded( vec![ "B".to_string(), "A".to_string() ]),
    ]);
    assert_eq!( activator.activated(), [ "B", "A" ]);
    assert_eq!( fetch.requests().len(), 2 );

}

#[tokio::test]
async fn empty_require_is_satisfied_immediately() {

    let fetch = MemoryFetch::new();
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), CHAIN, &fetch, &activator );
    let mut events = Events::subscribe( &depender );

    depender.require( Vec::<String>::new() );

    assert_eq!( events.drain(), [
        Event::Require( Vec::new() ),
        Event::Ready( Vec::new() ),
        Event::RequirementLoaded( Vec::new() ),
    ]);
    assert!( fetch.requests().is_empty() );

}
