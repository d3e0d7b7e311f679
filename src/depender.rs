//! The loader service.
//!
//! A [`Depender`] ties the pieces together: it assembles the
//! [`DependencyMap`] from manifests, resolves every `require` into a load
//! order, and drains the resulting queue one resource at a time through the
//! host's [`Fetch`] and [`Activate`] capabilities, notifying subscribers as it
//! goes.
//!
//! # Lifecycle
//!
//! ```text
//! AwaitingMap ──map complete──▶ MapReady ──▶ Idle ⇄ Loading
//! ```
//!
//! While the map is incomplete, requests are buffered and replayed once, in
//! order, as soon as it completes. Afterwards every `require` either finds its
//! resources loaded (and is satisfied immediately) or queues what is missing,
//! waking the worker if it is idle. There is no terminal state.
//!
//! # Concurrency
//!
//! All mutable state lives behind one mutex which is never held across an
//! `.await` nor while subscriber handlers run. Exactly one worker task drains
//! the queue, so activations are strictly sequential and in dependency order
//! even though the calls that feed the queue may come from anywhere.

use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };
use thiserror::Error ;
use pipe_trait::Pipe ;

use crate::resource::ResourceName ;
use crate::manifest::{ ManifestError, ManifestSource, LibraryManifest, parse_libraries, parse_script_tree };
use crate::dependency_map::DependencyMap ;
use crate::closure::closure_of_all ;
use crate::tracker::{ LoadState, LoadTracker };
use crate::queue::LoadQueue ;
use crate::notifier::{ CompletionNotifier, Notification, ScriptLoaded, Subscribers, SubscriptionId };
use crate::options::DependerOptions ;
use crate::diagnostics::Diagnostics ;
use crate::fetch::{ Fetch, FetchError };
use crate::activate::{ Activate, ActivationError };



/// Why a resource could not be loaded.
///
/// A failed resource stays pending: the worker moves on to the next queued
/// resource, but nothing waiting on the failed one is ever satisfied.
#[derive( Debug, Error )]
pub enum LoadError {
    /// The resource's contents could not be retrieved.
    #[error( "Fetch failed: {0}" )]
    Fetch( #[from] FetchError ),
    /// The resource's contents could not be run.
    #[error( "Activation failed: {0}" )]
    Activation( #[from] ActivationError ),
    /// The fetch or activation panicked.
    #[error( "Loading panicked: {0}" )]
    Panicked( String ),
}

/// A request received before the dependency map was complete.
#[derive( Debug )]
enum Request {
    Names( Vec<ResourceName> ),
    Groups( Vec<String> ),
}

#[derive( Debug )]
enum Phase {
    AwaitingMap( Vec<Request> ),
    MapReady,
}

#[derive( Debug )]
struct LoaderState {
    phase: Phase,
    map: DependencyMap,
    tracker: LoadTracker,
    queue: LoadQueue,
    notifier: CompletionNotifier,
}

impl LoaderState {

    /// Resolves `names`, marks what is missing as pending and queues what is
    /// not already on its way. Returns the signals to deliver and whether a
    /// worker has to be started.
    fn schedule( &mut self, names: &[ResourceName] ) -> ( Vec<Notification>, bool ) {
        let ( closure, _ ) = closure_of_all( &self.map, names );
        let unloaded = self.tracker.filter_unloaded( &closure );
        let to_fetch = self.tracker.mark_pending( &unloaded );
        let notifications = self.notifier.open_batch( unloaded, &self.tracker );
        let start_worker = self.queue.enqueue( to_fetch );
        ( notifications, start_worker )
    }

    fn complete( &mut self, name: &ResourceName ) -> Vec<Notification> {
        match self.tracker.mark_loaded( name ) {
            true => self.notifier.script_loaded( name, &self.tracker ),
            false => Vec::with_capacity( 0 ),
        }
    }

    fn group_files( &self, group: &str ) -> Result<Vec<ResourceName>, ManifestError> {
        self.map.group_files( group ).ok_or_else(|| ManifestError::UnknownGroup( group.to_string() ))
    }

}

struct Shared {
    state: Mutex<LoaderState>,
    subscribers: Subscribers,
    diagnostics: Diagnostics,
    options: DependerOptions,
    fetch: Arc<dyn Fetch>,
    activate: Arc<dyn Activate>,
}

/// On-demand dependency loader.
///
/// Cheap to clone; clones share the same state. Obtain a process-wide
/// instance through [`Registry`]( crate::Registry ) so that every caller talks
/// to the same loader.
///
/// Methods that may start work ([`require`]( Self::require ),
/// [`require_group`]( Self::require_group ), [`fetch_libs`]( Self::fetch_libs ))
/// spawn Tokio tasks and never block the caller.
///
/// # Panics
/// Those methods panic when called outside a Tokio runtime and work has to be
/// spawned.
#[derive( Clone )]
pub struct Depender {
    shared: Arc<Shared>,
}

impl Depender {

    /// Creates a loader with nothing mapped. Names in
    /// [`DependerOptions::initially_loaded`] are loaded from the start.
    pub fn new( options: DependerOptions, fetch: impl Fetch + 'static, activate: impl Activate + 'static ) -> Self {
        let diagnostics = Diagnostics::new( options.verbose_logging );
        let state = LoaderState {
            phase: Phase::AwaitingMap( Vec::new() ),
            map: DependencyMap::new(),
            tracker: LoadTracker::seeded( options.seed_names() ),
            queue: LoadQueue::new(),
            notifier: CompletionNotifier::new(),
        };
        Self { shared: Arc::new( Shared {
            state: Mutex::new( state ),
            subscribers: Subscribers::new(),
            diagnostics,
            options,
            fetch: Arc::new( fetch ),
            activate: Arc::new( activate ),
        })}
    }

    /// Options the loader was created with.
    pub fn options( &self ) -> &DependerOptions { &self.shared.options }

    /// Merges a manifest into the dependency map.
    ///
    /// Inline documents are merged immediately; locators and missing group
    /// script lists are retrieved in the background. Retrieval failures are
    /// logged and leave the map incomplete, so buffered requests keep waiting.
    pub fn fetch_libs( &self, source: impl Into<ManifestSource> ) -> &Self {
        match source.into() {
            ManifestSource::Inline( manifest ) => {
                let missing = self.ingest( manifest );
                if !missing.is_empty() {
                    let depender = self.clone();
                    tokio::spawn( async move { depender.load_script_lists( missing ).await });
                }
            },
            source @ ManifestSource::Locator( _ ) => {
                let depender = self.clone();
                tokio::spawn( async move { depender.load_libs( source ).await });
            },
        }
        self
    }

    /// Merges a manifest into the dependency map, waiting for every retrieval.
    ///
    /// Returns the problems met on the way; the map is complete once this
    /// returns no problem.
    pub async fn load_libs( &self, source: impl Into<ManifestSource> ) -> Vec<ManifestError> {
        let manifest = match source.into() {
            ManifestSource::Inline( manifest ) => manifest,
            ManifestSource::Locator( locator ) => {
                self.shared.diagnostics.log( format!( "fetching libs {}", locator ));
                match self.fetch_document( &locator ).await.and_then(| bytes | parse_libraries( &locator, &bytes )) {
                    Ok( manifest ) => manifest,
                    Err( err ) => {
                        tracing::warn!( error = %err, "could not load dependency manifest" );
                        return vec![ err ]
                    },
                }
            },
        };
        self.ingest( manifest ).pipe(| missing | self.load_script_lists( missing )).await
    }

    /// Requests that `names` and everything they depend on become loaded.
    ///
    /// Idempotent: already loaded resources are not loaded again, and
    /// resources already on their way are waited on rather than queued twice.
    /// Before the dependency map is complete the request is buffered. Blank
    /// names and [`NO_DEPENDENCY`](crate::NO_DEPENDENCY) are dropped from the request.
    pub fn require<N: Into<ResourceName>>( &self, names: impl IntoIterator<Item = N> ) -> &Self {
        let names = names.into_iter()
            .map( Into::into )
            .filter_map(| name: ResourceName | ResourceName::dependency( name.as_str() ))
            .collect::<Vec<ResourceName>>();
        self.shared.subscribers.dispatch([ Notification::Require( names.clone() )]);
        self.submit( Request::Names( names ));
        self
    }

    /// Requests every script declared under `groups`.
    ///
    /// Each group is required separately, as if its files were passed to
    /// [`require`]( Self::require ). Unknown groups are reported and skipped.
    pub fn require_group<G: Into<String>>( &self, groups: impl IntoIterator<Item = G> ) -> &Self {
        let groups = groups.into_iter().map( Into::into ).collect::<Vec<String>>();
        self.submit( Request::Groups( groups ));
        self
    }

    /// Marks `names` as loaded without fetching them.
    ///
    /// Lets the host resolve a resource whose load failed, releasing every
    /// request that was waiting on it. Progress is reported as for a normal load.
    pub fn assume_loaded<N: Into<ResourceName>>( &self, names: impl IntoIterator<Item = N> ) -> &Self {
        let notifications = {
            let mut state = self.lock();
            names.into_iter()
                .map( Into::into )
                .filter_map(| name: ResourceName | ResourceName::dependency( name.as_str() ))
                .flat_map(| name | state.complete( &name ))
                .collect::<Vec<_>>()
        };
        self.shared.subscribers.dispatch( notifications );
        self
    }

    /// Load state of `name`.
    pub fn state_of( &self, name: &ResourceName ) -> LoadState { self.lock().tracker.state( name )}

    /// Loaded resources, in load order.
    pub fn loaded( &self ) -> Vec<ResourceName> { self.lock().tracker.loaded_names().to_vec() }

    /// Resources requested but not loaded, sorted.
    pub fn pending( &self ) -> Vec<ResourceName> { self.lock().tracker.pending_names() }

    /// Whether the dependency map is complete.
    pub fn is_map_loaded( &self ) -> bool { matches!( self.lock().phase, Phase::MapReady )}

    /// Whether the worker is draining the queue.
    pub fn is_loading( &self ) -> bool { self.lock().queue.is_busy() }

    /// Fetchable location of `name`, or the name itself if unmapped.
    pub fn path_of( &self, name: &ResourceName ) -> String { self.lock().map.path_of( name )}

    /// Snapshot of the dependency map.
    pub fn dependency_map( &self ) -> DependencyMap { self.lock().map.clone() }

    /// Verbose logging gate of this loader.
    pub fn diagnostics( &self ) -> &Diagnostics { &self.shared.diagnostics }

    /// Turns verbose logging on, replaying what was held back.
    pub fn enable_log( &self ) -> &Self {
        self.shared.diagnostics.enable();
        self
    }

    /// Turns verbose logging off.
    pub fn disable_log( &self ) -> &Self {
        self.shared.diagnostics.disable();
        self
    }

    /// Calls `handler` with the names of every `require` call.
    pub fn on_require( &self, handler: impl Fn( &[ResourceName] ) + Send + Sync + 'static ) -> SubscriptionId {
        self.shared.subscribers.on_require( handler )
    }

    /// Calls `handler` with every loaded name whenever nothing is pending any more.
    pub fn on_ready( &self, handler: impl Fn( &[ResourceName] ) + Send + Sync + 'static ) -> SubscriptionId {
        self.shared.subscribers.on_ready( handler )
    }

    /// Calls `handler` with every loaded name each time a `require` call is satisfied.
    pub fn on_requirement_loaded( &self, handler: impl Fn( &[ResourceName] ) + Send + Sync + 'static ) -> SubscriptionId {
        self.shared.subscribers.on_requirement_loaded( handler )
    }

    /// Calls `handler` after each resource finishes loading.
    pub fn on_script_loaded( &self, handler: impl Fn( &ScriptLoaded ) + Send + Sync + 'static ) -> SubscriptionId {
        self.shared.subscribers.on_script_loaded( handler )
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe( &self, id: SubscriptionId ) -> bool { self.shared.subscribers.unsubscribe( id )}

    fn lock( &self ) -> MutexGuard<'_, LoaderState> {
        self.shared.state.lock().unwrap_or_else( PoisonError::into_inner )
    }

    fn submit( &self, request: Request ) {

        let ( notifications, start_worker ) = {
            let mut state = self.lock();
            if let Phase::AwaitingMap( buffered ) = &mut state.phase {
                self.shared.diagnostics.log( "dependency map not loaded yet, request buffered" );
                buffered.push( request );
                return
            }
            Self::schedule_locked( &mut state, request )
        };

        self.shared.subscribers.dispatch( notifications );
        if start_worker { self.spawn_worker() }

    }

    fn schedule_locked( state: &mut LoaderState, request: Request ) -> ( Vec<Notification>, bool ) {
        match request {
            Request::Names( names ) => state.schedule( &names ),
            Request::Groups( groups ) => {
                let mut notifications = Vec::new();
                let mut start_worker = false ;
                for group in groups {
                    match state.group_files( &group ) {
                        Ok( files ) => {
                            let ( scheduled, start ) = state.schedule( &files );
                            notifications.extend( scheduled );
                            start_worker |= start ;
                        },
                        Err( err ) => tracing::warn!( error = %err, "cannot require group" ),
                    }
                }
                ( notifications, start_worker )
            },
        }
    }

    /// Merges `manifest` and returns the groups whose script lists still have
    /// to be retrieved.
    fn ingest( &self, manifest: LibraryManifest ) -> Vec<( String, String )> {
        let missing = {
            let mut state = self.lock();
            state.map.ingest( manifest );
            state.map.missing_script_lists()
        };
        self.map_updated();
        missing
    }

    async fn load_script_lists( &self, missing: Vec<( String, String )> ) -> Vec<ManifestError> {
        let mut problems = Vec::new();
        for ( group, locator ) in missing {
            self.shared.diagnostics.log( format!( "loading source: {}", locator ));
            match self.fetch_document( &locator ).await.and_then(| bytes | parse_script_tree( &locator, &bytes )) {
                Ok( files ) => {
                    self.lock().map.set_files( &group, files );
                    self.map_updated();
                },
                Err( err ) => {
                    tracing::warn!( group = %group, error = %err, "could not load group script list" );
                    problems.push( err );
                },
            }
        }
        problems
    }

    async fn fetch_document( &self, locator: &str ) -> Result<Vec<u8>, ManifestError> {
        self.shared.fetch.fetch( locator, self.shared.options.no_cache ).await
            .map_err(| source | ManifestError::Fetch { locator: locator.to_string(), source })
    }

    /// Leaves the awaiting phase once the map is complete, seeding loaded
    /// groups and replaying buffered requests.
    fn map_updated( &self ) {

        let replay = {
            let mut state = self.lock();
            if !state.map.is_complete() { return }
            match std::mem::replace( &mut state.phase, Phase::MapReady ) {
                Phase::MapReady => return,
                Phase::AwaitingMap( buffered ) => {
                    self.shared.diagnostics.log( format!( "dependencies mapped: {} scripts", state.map.len() ));
                    for group in &self.shared.options.initially_loaded_groups {
                        match state.group_files( group ) {
                            Ok( files ) => state.tracker.seed( files ),
                            Err( err ) => tracing::warn!( error = %err, "cannot seed loaded group" ),
                        }
                    }
                    buffered
                },
            }
        };

        replay.into_iter().for_each(| request | self.submit( request ));

    }

    fn spawn_worker( &self ) {
        let depender = self.clone();
        tokio::spawn( async move { depender.drain().await });
    }

    /// Worker loop. Exactly one runs at a time; it exits when the queue is
    /// empty and the next enqueue starts a new one.
    async fn drain( &self ) {

        loop {

            let next = {
                let mut guard = self.lock();
                let state = &mut *guard ;
                match state.queue.next() {
                    None => None,
                    Some( name ) if state.tracker.is_loaded( &name ) => {
                        state.queue.settle();
                        continue
                    },
                    Some( name ) => {
                        let path = state.map.path_of( &name );
                        Some(( name, path ))
                    },
                }
            };
            let Some(( name, path )) = next else { break };

            self.shared.diagnostics.log( format!( "loading script: {}", name ));
            let outcome = self.fetch_and_activate( &name, path ).await ;

            let notifications = {
                let mut state = self.lock();
                state.queue.settle();
                match outcome {
                    Ok(()) => {
                        self.shared.diagnostics.log( format!( "loaded script: {}", name ));
                        state.complete( &name )
                    },
                    Err( err ) => {
                        tracing::warn!( script = %name, error = %err, "could not load" );
                        Vec::with_capacity( 0 )
                    },
                }
            };
            self.shared.subscribers.dispatch( notifications );

        }

    }

    /// Fetches and activates one resource on its own task, so that a panic in
    /// either capability surfaces as a load failure instead of killing the worker.
    async fn fetch_and_activate( &self, name: &ResourceName, path: String ) -> Result<(), LoadError> {
        let fetch = Arc::clone( &self.shared.fetch );
        let activate = Arc::clone( &self.shared.activate );
        let no_cache = self.shared.options.no_cache ;
        let name = name.clone();
        tokio::spawn( async move {
            let source = fetch.fetch( &path, no_cache ).await?;
            activate.activate( &name, source ).await?;
            Ok::<_, LoadError>(())
        }).await
            .map_err(| err | LoadError::Panicked( err.to_string() ))?
    }

}

impl std::fmt::Debug for Depender {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct( "Depender" )
            .field( "map_loaded", &matches!( state.phase, Phase::MapReady ))
            .field( "mapped", &state.map.len() )
            .field( "loaded", &state.tracker.loaded_count() )
            .field( "pending", &state.tracker.pending_names() )
            .field( "in_flight", &state.queue.in_flight() )
            .field( "subscribers", &self.shared.subscribers )
            .finish_non_exhaustive()
    }
}
