use pretty_assertions::assert_eq ;
use depender::{ DependerOptions, LoadState, ResourceName };
use crate::harness::{ self, Events, MemoryFetch, RecordingActivator };

#[tokio::test]
async fn panic_is_treated_as_a_failed_load() {

    let fetch = MemoryFetch::with_scripts( &[ "Boom", "X" ]);
    let activator = RecordingActivator::panicking( &[ "Boom" ]);
    let depender = harness::loader( DependerOptions::new(), &[( "Boom", &[]), ( "X", &[])], &fetch, &activator );
    let mut events = Events::subscribe( &depender );

    depender.require([ "Boom" ]).require([ "X" ]);

    assert_eq!( events.requirement_loaded().await, [ "X" ]);
    harness::settle( &depender ).await ;
    assert_eq!( depender.state_of( &ResourceName::new( "Boom" )), LoadState::Pending );

}
