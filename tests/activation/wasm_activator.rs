use std::sync::Arc ;
use std::sync::atomic::{ AtomicUsize, Ordering };
use pretty_assertions::assert_eq ;
use wasmtime::{ Engine, StoreContextMut };
use wasmtime::component::Linker ;
use depender::{ Activate, ResourceName, ScriptContext, WasmActivator };

#[tokio::test]
async fn runtime_keeps_running_while_a_component_compiles() {

    let activator = WasmActivator::default();
    let ticks = Arc::new( AtomicUsize::new( 0 ));
    let ticker = tokio::spawn({
        let ticks = Arc::clone( &ticks );
        async move { loop {
            ticks.fetch_add( 1, Ordering::SeqCst );
            tokio::task::yield_now().await ;
        }}
    });

    activator.activate( &ResourceName::new( "Core" ), b"(component)".to_vec() ).await.unwrap();
    ticker.abort();

    assert!( ticks.load( Ordering::SeqCst ) > 0 );
    assert_eq!( activator.activated(), [ "Core" ]);

}

#[tokio::test]
async fn host_functions_come_from_the_supplied_linker() {

    let engine = Engine::default();
    let mut linker = Linker::<ScriptContext>::new( &engine );
    linker.root().func_wrap( "answer", | _store: StoreContextMut<'_, ScriptContext>, (): () | Ok(( 42u32, ))).unwrap();
    let activator = WasmActivator::new( engine, linker );
    let source = br#"(component (import "answer" (func (result u32))))"#.to_vec();

    activator.activate( &ResourceName::new( "Asker" ), source ).await.unwrap();

    assert_eq!( activator.activated(), [ "Asker" ]);

}

#[test]
fn context_tracks_host_resources() {

    let mut context = ScriptContext::default();
    let entry = context.resource_table.push( String::from( "handle" )).unwrap();
    assert_eq!( context.resource_table.get( &entry ).unwrap(), "handle" );

}
