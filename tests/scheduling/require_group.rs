use std::collections::BTreeMap ;
use std::sync::Arc ;
use pretty_assertions::assert_eq ;
use depender::{ Depender, DependerOptions, LoadState, ResourceName };
use crate::harness::{ self, Events, MemoryFetch, RecordingActivator };

fn two_groups() -> depender::LibraryManifest {
    BTreeMap::from([
        ( "Core".to_string(), harness::group( "/core", &[( "Core", &[]), ( "Array", &[ "Core" ])])),
        ( "More".to_string(), harness::group( "/more", &[( "Fx", &[ "Array" ])])),
    ])
}

fn served() -> Arc<MemoryFetch> {
    let fetch = MemoryFetch::new();
    for path in [ "/core/Main/Core.wasm", "/core/Main/Array.wasm", "/more/Main/Fx.wasm" ] { fetch.serve( path, path ) }
    fetch
}

#[tokio::test]
async fn group_requires_every_script_it_declares() {

    let fetch = served();
    let activator = RecordingActivator::new();
    let depender = Depender::new( DependerOptions::new(), Arc::clone( &fetch ), Arc::clone( &activator ));
    depender.fetch_libs( two_groups() );
    let mut events = Events::subscribe( &depender );

    depender.require_group([ "Core" ]);
    events.requirement_loaded().await ;

    assert_eq!( activator.activated(), [ "Core", "Array" ]);
    assert_eq!( depender.state_of( &ResourceName::new( "Fx" )), LoadState::Unknown );

}

#[tokio::test]
async fn unknown_group_is_skipped() {

    let fetch = served();
    let activator = RecordingActivator::new();
    let depender = Depender::new( DependerOptions::new(), Arc::clone( &fetch ), Arc::clone( &activator ));
    depender.fetch_libs( two_groups() );
    let mut events = Events::subscribe( &depender );

    depender.require_group([ "Nope", "More" ]);
    events.requirement_loaded().await ;

    assert_eq!( activator.activated(), [ "Core", "Array", "Fx" ]);

}

#[tokio::test]
async fn loaded_groups_are_seeded_once_the_map_completes() {

    let fetch = served();
    let activator = RecordingActivator::new();
    let options = DependerOptions::new().with_initially_loaded_groups([ "Core" ]);
    let depender = Depender::new( options, Arc::clone( &fetch ), Arc::clone( &activator ));
    let mut events = Events::subscribe( &depender );

    depender.require([ "Fx" ]);
    depender.fetch_libs( two_groups() );
    events.requirement_loaded().await ;

    assert_eq!( activator.activated(), [ "Fx" ]);
    assert_eq!( depender.loaded(), [ "Array", "Core", "Fx" ]);

}
