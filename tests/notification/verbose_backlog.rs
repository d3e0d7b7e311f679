use depender::{ Diagnostics, DependerOptions };
use crate::harness::{ self, MemoryFetch, RecordingActivator };

#[test]
fn quiet_messages_are_kept_until_enabled() {

    let diagnostics = Diagnostics::new( false );
    diagnostics.log( "loading script: A" );
    diagnostics.log( "loaded script: A" );

    assert!( !diagnostics.is_verbose() );
    assert_eq!( diagnostics.backlog(), [ "loading script: A", "loaded script: A" ]);

    diagnostics.enable();
    assert!( diagnostics.is_verbose() );
    assert!( diagnostics.backlog().is_empty() );

    diagnostics.log( "shown right away" );
    assert!( diagnostics.backlog().is_empty() );

    diagnostics.disable();
    diagnostics.log( "held back" );
    assert_eq!( diagnostics.backlog(), [ "held back" ]);

}

#[tokio::test]
async fn loader_messages_are_replayed_when_log_is_enabled() {

    let fetch = MemoryFetch::with_scripts( &[ "A" ]);
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), &[( "A", &[])], &fetch, &activator );

    depender.require([ "A" ]);
    harness::settle( &depender ).await ;

    let backlog = depender.diagnostics().backlog();
    assert!( backlog.iter().any(| message | message == "loading script: A" ), "{:?}", backlog );
    assert!( backlog.iter().any(| message | message == "loaded script: A" ), "{:?}", backlog );

    depender.enable_log();
    assert!( depender.diagnostics().backlog().is_empty() );

}
