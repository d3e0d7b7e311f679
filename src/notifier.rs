//! Completion notification.
//!
//! The notifier turns tracker transitions into the four observable signals:
//!
//! - **require** - a `require` call was made, with the names it asked for.
//! - **script loaded** - one resource finished loading ([`ScriptLoaded`]).
//! - **ready** - no tracked resource is pending any more.
//! - **requirement loaded** - everything one `require` call needed is loaded.
//!
//! Signals are computed while the loader state is locked but delivered after
//! the lock is released (see [`Subscribers::dispatch`]), so handlers are free
//! to call back into the loader.

use std::collections::HashSet ;
use std::sync::{ Arc, Mutex, PoisonError };

use crate::resource::ResourceName ;
use crate::tracker::LoadTracker ;



/// Progress payload emitted after each resource finishes loading.
#[derive( Debug, Clone, PartialEq )]
pub struct ScriptLoaded {
    /// The resource that just loaded.
    pub script: ResourceName,
    /// Loaded share of every tracked resource, in percent.
    pub percent_of_total: f64,
    /// Loaded share of what was requested since the last ready signal, in percent.
    pub percent_of_batch: f64,
    /// Every loaded resource, in load order.
    pub loaded: Vec<ResourceName>,
}

/// A signal waiting to be delivered to subscribers.
#[derive( Debug, Clone, PartialEq )]
pub enum Notification {
    Require( Vec<ResourceName> ),
    ScriptLoaded( ScriptLoaded ),
    Ready( Vec<ResourceName> ),
    RequirementLoaded( Vec<ResourceName> ),
}

/// Resources one `require` call is waiting on.
#[derive( Debug )]
struct Batch {
    waiting: HashSet<ResourceName>,
}

/// Tracks open batches and the ready checkpoint.
#[derive( Debug, Default )]
pub struct CompletionNotifier {
    batches: Vec<Batch>,
    /// Loaded count at the last ready signal.
    checkpoint: usize,
}

impl CompletionNotifier {

    /// Creates a notifier with no open batch.
    pub fn new() -> Self { Self::default() }

    /// Opens a batch for one `require` call waiting on `unloaded`.
    ///
    /// When nothing is left to wait for the requirement is satisfied on the
    /// spot, and the loader is ready as well if nothing else is pending.
    pub fn open_batch( &mut self, unloaded: Vec<ResourceName>, tracker: &LoadTracker ) -> Vec<Notification> {
        if !unloaded.is_empty() {
            self.batches.push( Batch { waiting: unloaded.into_iter().collect() });
            return Vec::with_capacity( 0 )
        }
        let mut notifications = Vec::with_capacity( 2 );
        if tracker.all_loaded() { notifications.push( self.ready( tracker )) }
        notifications.push( Notification::RequirementLoaded( tracker.loaded_names().to_vec() ));
        notifications
    }

    /// Reports that `script` became loaded.
    ///
    /// Emits progress, then ready if nothing is pending any more, then one
    /// requirement-loaded signal per batch this completion satisfied.
    pub fn script_loaded( &mut self, script: &ResourceName, tracker: &LoadTracker ) -> Vec<Notification> {

        let mut notifications = vec![ Notification::ScriptLoaded( self.progress( script, tracker ))];

        self.batches.iter_mut().for_each(| batch | { batch.waiting.remove( script ); });
        let satisfied = self.batches.iter().filter(| batch | batch.waiting.is_empty() ).count();
        self.batches.retain(| batch | !batch.waiting.is_empty() );

        if tracker.all_loaded() { notifications.push( self.ready( tracker )) }
        notifications.extend(( 0..satisfied ).map(| _ | Notification::RequirementLoaded( tracker.loaded_names().to_vec() )));

        notifications

    }

    /// Number of `require` calls still waiting.
    pub fn open_batches( &self ) -> usize { self.batches.len() }

    #[allow( clippy::cast_precision_loss )]
    fn progress( &self, script: &ResourceName, tracker: &LoadTracker ) -> ScriptLoaded {
        let tracked = tracker.tracked_count();
        let loaded = tracker.loaded_count();
        let percent = | part: usize, whole: usize | match whole {
            0 => 100.0,
            whole => part as f64 / whole as f64 * 100.0,
        };
        ScriptLoaded {
            script: script.clone(),
            percent_of_total: percent( loaded, tracked ),
            percent_of_batch: percent( loaded.saturating_sub( self.checkpoint ), tracked.saturating_sub( self.checkpoint )),
            loaded: tracker.loaded_names().to_vec(),
        }
    }

    fn ready( &mut self, tracker: &LoadTracker ) -> Notification {
        self.checkpoint = tracker.loaded_count();
        Notification::Ready( tracker.loaded_names().to_vec() )
    }

}



/// Handle returned by the `on_*` subscription methods.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct SubscriptionId( u64 );

/// Handler receiving a list of resource names.
pub type NamesHandler = Arc<dyn Fn( &[ResourceName] ) + Send + Sync>;

/// Handler receiving progress for one resource.
pub type ProgressHandler = Arc<dyn Fn( &ScriptLoaded ) + Send + Sync>;

#[derive( Default )]
struct Handlers {
    next_id: u64,
    require: Vec<( SubscriptionId, NamesHandler )>,
    ready: Vec<( SubscriptionId, NamesHandler )>,
    requirement_loaded: Vec<( SubscriptionId, NamesHandler )>,
    script_loaded: Vec<( SubscriptionId, ProgressHandler )>,
}

impl Handlers {
    fn next_id( &mut self ) -> SubscriptionId {
        self.next_id += 1 ;
        SubscriptionId( self.next_id )
    }
}

/// Typed publish/subscribe registry for loader signals.
#[derive( Default )]
pub struct Subscribers {
    handlers: Mutex<Handlers>,
}

impl Subscribers {

    /// Creates a registry with no subscriber.
    pub fn new() -> Self { Self::default() }

    /// Subscribes to `require` calls.
    pub fn on_require( &self, handler: impl Fn( &[ResourceName] ) + Send + Sync + 'static ) -> SubscriptionId {
        let handler: NamesHandler = Arc::new( handler );
        let mut handlers = self.lock();
        let id = handlers.next_id();
        handlers.require.push(( id, handler ));
        id
    }

    /// Subscribes to the ready signal.
    pub fn on_ready( &self, handler: impl Fn( &[ResourceName] ) + Send + Sync + 'static ) -> SubscriptionId {
        let handler: NamesHandler = Arc::new( handler );
        let mut handlers = self.lock();
        let id = handlers.next_id();
        handlers.ready.push(( id, handler ));
        id
    }

    /// Subscribes to requirement-loaded signals.
    pub fn on_requirement_loaded( &self, handler: impl Fn( &[ResourceName] ) + Send + Sync + 'static ) -> SubscriptionId {
        let handler: NamesHandler = Arc::new( handler );
        let mut handlers = self.lock();
        let id = handlers.next_id();
        handlers.requirement_loaded.push(( id, handler ));
        id
    }

    /// Subscribes to per-resource progress.
    pub fn on_script_loaded( &self, handler: impl Fn( &ScriptLoaded ) + Send + Sync + 'static ) -> SubscriptionId {
        let handler: ProgressHandler = Arc::new( handler );
        let mut handlers = self.lock();
        let id = handlers.next_id();
        handlers.script_loaded.push(( id, handler ));
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe( &self, id: SubscriptionId ) -> bool {
        let mut handlers = self.lock();
        let before = handlers.require.len() + handlers.ready.len() + handlers.requirement_loaded.len() + handlers.script_loaded.len();
        handlers.require.retain(|( entry, _ )| *entry != id );
        handlers.ready.retain(|( entry, _ )| *entry != id );
        handlers.requirement_loaded.retain(|( entry, _ )| *entry != id );
        handlers.script_loaded.retain(|( entry, _ )| *entry != id );
        before != handlers.require.len() + handlers.ready.len() + handlers.requirement_loaded.len() + handlers.script_loaded.len()
    }

    /// Delivers `notifications` in order.
    ///
    /// Must not be called while loader state is locked. Handlers are
    /// snapshotted per notification, so a handler may subscribe or
    /// unsubscribe without deadlocking.
    pub fn dispatch( &self, notifications: impl IntoIterator<Item = Notification> ) {
        notifications.into_iter().for_each(| notification | match notification {
            Notification::Require( names ) => Self::call_all( self.snapshot(| h | &h.require ), &names ),
            Notification::Ready( names ) => Self::call_all( self.snapshot(| h | &h.ready ), &names ),
            Notification::RequirementLoaded( names ) => Self::call_all( self.snapshot(| h | &h.requirement_loaded ), &names ),
            Notification::ScriptLoaded( progress ) => self.snapshot(| h | &h.script_loaded )
                .into_iter()
                .for_each(| handler | handler( &progress )),
        });
    }

    fn call_all( handlers: Vec<NamesHandler>, names: &[ResourceName] ) {
        handlers.into_iter().for_each(| handler | handler( names ));
    }

    fn snapshot<H: Clone>( &self, select: impl FnOnce( &Handlers ) -> &Vec<( SubscriptionId, H )> ) -> Vec<H> {
        let handlers = self.lock();
        select( &handlers ).iter().map(|( _, handler )| handler.clone() ).collect()
    }

    fn lock( &self ) -> std::sync::MutexGuard<'_, Handlers> {
        self.handlers.lock().unwrap_or_else( PoisonError::into_inner )
    }

}

impl std::fmt::Debug for Subscribers {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        let handlers = self.lock();
        f.debug_struct( "Subscribers" )
            .field( "require", &handlers.require.len() )
            .field( "ready", &handlers.ready.len() )
            .field( "requirement_loaded", &handlers.requirement_loaded.len() )
            .field( "script_loaded", &handlers.script_loaded.len() )
            .finish()
    }
}
