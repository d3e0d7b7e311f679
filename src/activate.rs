//! Activation capability.
//!
//! Activating a resource runs its fetched contents in the host so that later
//! resources can rely on whatever it set up. The loader only needs to know
//! whether activation succeeded; [`Activate`] is implemented by the host.
//!
//! [`WasmActivator`] is the bundled implementation: every resource is a
//! WebAssembly component that gets compiled, instantiated against a shared
//! [`Linker`] and kept alive for the rest of the process.

use std::sync::{ Arc, Mutex, PoisonError };
use async_trait::async_trait ;
use thiserror::Error ;
use wasmtime::{ Engine, Store };
use wasmtime::component::{ Component, Instance, Linker, ResourceTable };

use crate::resource::ResourceName ;



/// Errors produced while activating a resource.
#[derive( Error )]
pub enum ActivationError {
    /// Wasmtime failed to compile the component (invalid binary or unsupported features).
    #[error( "Failed to compile component: {0}" )]
    FailedToCompile( wasmtime::Error ),
    /// Wasmtime failed to instantiate the component (missing imports, start trap).
    #[error( "Failed to instantiate component: {0}" )]
    FailedToInstantiate( wasmtime::Error ),
    /// The compile job was lost before it produced a component.
    #[error( "Compilation did not complete: {0}" )]
    Interrupted( String ),
    /// A host-specific activation refused the resource.
    #[error( "Activation rejected: {0}" )]
    Rejected( String ),
}

impl std::fmt::Debug for ActivationError {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        match self {
            Self::FailedToCompile( e ) => f.debug_tuple( "FailedToCompile" ).field( e ).finish(),
            Self::FailedToInstantiate( e ) => f.debug_tuple( "FailedToInstantiate" ).field( e ).finish(),
            Self::Interrupted( reason ) => f.debug_tuple( "Interrupted" ).field( reason ).finish(),
            Self::Rejected( reason ) => f.debug_tuple( "Rejected" ).field( reason ).finish(),
        }
    }
}

/// Runs a fetched resource in the host environment.
#[async_trait]
pub trait Activate: Send + Sync {
    /// Activates `source` as the contents of `name`.
    async fn activate( &self, name: &ResourceName, source: Vec<u8> ) -> Result<(), ActivationError> ;
}

#[async_trait]
impl<T: Activate + ?Sized> Activate for Arc<T> {
    async fn activate( &self, name: &ResourceName, source: Vec<u8> ) -> Result<(), ActivationError> {
        ( **self ).activate( name, source ).await
    }
}

/// Store data for activated components.
///
/// Host functions added to the linker reach it through the store, and track
/// resources that cross component boundaries in `resource_table`.
pub struct ScriptContext {
    pub resource_table: ResourceTable,
}

impl ScriptContext {
    /// Creates a context with an empty resource table.
    pub fn new() -> Self { Self { resource_table: ResourceTable::new() }}
}

impl Default for ScriptContext {
    fn default() -> Self { Self::new() }
}

struct ActiveScript {
    name: ResourceName,
    _store: Store<ScriptContext>,
    _instance: Instance,
}

/// Activates resources as WebAssembly components.
///
/// Accepts binary components as well as the text format. Host functions made
/// available to every component are added to the linker before it is handed in.
///
/// ```
/// # async fn example() -> Result<(), depender::ActivationError> {
/// use depender::{ Activate, ResourceName, WasmActivator };
///
/// let activator = WasmActivator::default();
/// activator.activate( &ResourceName::new( "Core" ), b"(component)".to_vec() ).await?;
/// assert_eq!( activator.activated(), [ "Core" ]);
/// # Ok(())
/// # }
/// ```
pub struct WasmActivator {
    engine: Engine,
    linker: Linker<ScriptContext>,
    active: Mutex<Vec<ActiveScript>>,
}

impl WasmActivator {

    /// Creates an activator on `engine`, linking components through `linker`.
    pub fn new( engine: Engine, linker: Linker<ScriptContext> ) -> Self {
        Self { engine, linker, active: Mutex::new( Vec::new() )}
    }

    /// Engine components are compiled with.
    pub fn engine( &self ) -> &Engine { &self.engine }

    /// Names of activated resources, in activation order.
    pub fn activated( &self ) -> Vec<ResourceName> {
        self.active.lock().unwrap_or_else( PoisonError::into_inner )
            .iter()
            .map(| script | script.name.clone() )
            .collect()
    }

}

impl Default for WasmActivator {
    fn default() -> Self {
        let engine = Engine::default();
        let linker = Linker::new( &engine );
        Self::new( engine, linker )
    }
}

impl std::fmt::Debug for WasmActivator {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "WasmActivator" )
            .field( "engine", &"<Engine>" )
            .field( "linker", &"<Linker>" )
            .field( "activated", &self.activated() )
            .finish()
    }
}

#[async_trait]
impl Activate for WasmActivator {
    async fn activate( &self, name: &ResourceName, source: Vec<u8> ) -> Result<(), ActivationError> {
        let engine = self.engine.clone();
        let component = tokio::task::spawn_blocking( move || Component::new( &engine, &source ))
            .await
            .map_err(| err | ActivationError::Interrupted( err.to_string() ))?
            .map_err( ActivationError::FailedToCompile )?;
        let mut store = Store::new( &self.engine, ScriptContext::new() );
        let instance = self.linker.instantiate( &mut store, &component ).map_err( ActivationError::FailedToInstantiate )?;
        self.active.lock().unwrap_or_else( PoisonError::into_inner )
            .push( ActiveScript { name: name.clone(), _store: store, _instance: instance });
        Ok(())
    }
}
