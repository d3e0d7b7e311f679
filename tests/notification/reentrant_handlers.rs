use pretty_assertions::assert_eq ;
use depender::DependerOptions ;
use crate::harness::{ self, Events, MemoryFetch, RecordingActivator };

#[tokio::test]
async fn handler_may_require_more() {

    let fetch = MemoryFetch::with_scripts( &[ "A", "B" ]);
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), &[( "A", &[]), ( "B", &[])], &fetch, &activator );

    let chained = depender.clone();
    depender.on_script_loaded( move | progress | if progress.script == "A" { chained.require([ "B" ]); });
    let mut events = Events::subscribe( &depender );

    depender.require([ "A" ]);
    events.requirement_loaded().await ;
    events.requirement_loaded().await ;

    assert_eq!( activator.activated(), [ "A", "B" ]);

}
