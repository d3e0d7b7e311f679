//! Process-wide loader instances.
//!
//! Every part of an application that loads resources has to go through the
//! same [`Depender`], otherwise the same resource could be activated twice.
//! The [`Registry`] keeps one instance per handle; [`Registry::global`] is the
//! registry shared by the whole process.

use std::collections::HashMap ;
use std::sync::{ LazyLock, Mutex, MutexGuard, PoisonError };

use crate::depender::Depender ;
use crate::manifest::ManifestSource ;
use crate::options::DependerOptions ;
use crate::fetch::Fetch ;
use crate::activate::Activate ;



/// Handle the process-wide loader is registered under by convention.
pub const DEFAULT_HANDLE: &str = "Depender" ;

static GLOBAL: LazyLock<Registry> = LazyLock::new( Registry::new );

/// Named [`Depender`] instances.
#[derive( Debug, Default )]
pub struct Registry {
    instances: Mutex<HashMap<String, Depender>>,
}

impl Registry {

    /// Creates an empty registry.
    pub fn new() -> Self { Self::default() }

    /// The registry shared by the whole process.
    pub fn global() -> &'static Self { &GLOBAL }

    /// Returns the loader registered under `handle`, creating it on first use,
    /// and feeds it the manifest at `source`.
    ///
    /// Later calls with the same handle return the existing loader: `options`,
    /// `fetch` and `activate` are dropped and only the manifest is merged in.
    ///
    /// # Panics
    /// Panics outside a Tokio runtime when `source` has to be retrieved.
    pub fn initialise(
        &self,
        handle: &str,
        source: impl Into<ManifestSource>,
        options: DependerOptions,
        fetch: impl Fetch + 'static,
        activate: impl Activate + 'static,
    ) -> Depender {
        let depender = self.lock()
            .entry( handle.to_string() )
            .or_insert_with(|| Depender::new( options, fetch, activate ))
            .clone();
        depender.fetch_libs( source );
        depender
    }

    /// Loader registered under `handle`, if any.
    pub fn get( &self, handle: &str ) -> Option<Depender> { self.lock().get( handle ).cloned() }

    /// Unregisters the loader under `handle`. Clones already handed out keep working.
    pub fn remove( &self, handle: &str ) -> Option<Depender> { self.lock().remove( handle )}

    /// Registered handles, sorted.
    pub fn handles( &self ) -> Vec<String> {
        let mut handles = self.lock().keys().cloned().collect::<Vec<_>>();
        handles.sort();
        handles
    }

    fn lock( &self ) -> MutexGuard<'_, HashMap<String, Depender>> {
        self.instances.lock().unwrap_or_else( PoisonError::into_inner )
    }

}
