use std::collections::BTreeMap ;
use std::sync::Arc ;
use pretty_assertions::assert_eq ;
use depender::{ Activate, ActivationError, Depender, DependerOptions, FsFetch, Library, LoadState, ResourceName, WasmActivator };
use crate::harness::{ self, Events };
use crate::fixture_root::fixture_root ;

#[tokio::test]
async fn broken_component_stays_pending() {

    let activator = Arc::new( WasmActivator::default() );
    let depender = Depender::new( DependerOptions::new(), FsFetch::new( fixture_root( file!() )), Arc::clone( &activator ));
    depender.fetch_libs( BTreeMap::from([( "Root".to_string(), Library::new( "" ).with_files( BTreeMap::from([
        ( "".to_string(), BTreeMap::from([
            ( "Broken".to_string(), Default::default() ),
            ( "Fine".to_string(), Default::default() ),
        ])),
    ])))]));
    let mut events = Events::subscribe( &depender );

    depender.require([ "Broken" ]).require([ "Fine" ]);
    events.requirement_loaded().await ;
    harness::settle( &depender ).await ;

    assert_eq!( depender.path_of( &ResourceName::new( "Fine" )), "/Fine.wasm" );
    assert_eq!( activator.activated(), [ "Fine" ]);
    assert_eq!( depender.state_of( &ResourceName::new( "Broken" )), LoadState::Pending );

}

#[tokio::test]
async fn unsatisfied_import_fails_instantiation() {

    let activator = WasmActivator::default();
    let source = br#"(component (import "host:missing/api" (instance (export "ping" (func)))))"#.to_vec();

    let result = activator.activate( &ResourceName::new( "Needy" ), source ).await ;

    assert!( matches!( result, Err( ActivationError::FailedToInstantiate( _ ))), "{:?}", result );
    assert!( activator.activated().is_empty() );

}

#[tokio::test]
async fn garbage_fails_compilation() {

    let activator = WasmActivator::default();
    let result = activator.activate( &ResourceName::new( "Garbage" ), b"\0asm garbage".to_vec() ).await ;
    assert!( matches!( result, Err( ActivationError::FailedToCompile( _ ))), "{:?}", result );

}
