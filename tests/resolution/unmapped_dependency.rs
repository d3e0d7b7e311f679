use pretty_assertions::assert_eq ;
use depender::{ DependencyMap, DependerOptions, LoadState, ResolveError, ResourceName, transitive_closure };
use crate::harness::{ self, MemoryFetch, RecordingActivator };
use crate::captured_logs::CapturedLogs ;

const DANGLING: &[( &str, &[&str] )] = &[
    ( "A", &[ "Ghost" ]),
];

#[test]
fn unmapped_dependency_is_reported_and_kept() {

    let ( logs, _guard ) = CapturedLogs::start();
    let mut map = DependencyMap::new();
    map.ingest( harness::manifest( DANGLING ));

    let ( order, problems ) = transitive_closure( &map, &ResourceName::new( "A" ));

    assert_eq!( logs.warnings_with( &[ "dependencies not mapped", "script=Ghost" ]).len(), 1, "{:#?}", logs.lines() );
    assert_eq!( order, [ "Ghost", "A" ]);
    assert_eq!( problems, [ ResolveError::UnmappedDependency( ResourceName::new( "Ghost" ))]);
    assert_eq!( map.path_of( &ResourceName::new( "Ghost" )), "Ghost" );

}

#[tokio::test]
async fn unmapped_dependency_is_fetched_by_name() {

    let fetch = MemoryFetch::with_scripts( &[ "A" ]);
    let activator = RecordingActivator::new();
    let depender = harness::loader( DependerOptions::new(), DANGLING, &fetch, &activator );

    depender.require([ "A" ]);
    harness::settle( &depender ).await ;

    assert_eq!( fetch.requests(), [ "Ghost".to_string(), harness::script_path( "A" )]);
    assert_eq!( activator.activated(), [ "A" ]);
    assert_eq!( depender.state_of( &ResourceName::new( "Ghost" )), LoadState::Pending );

}
