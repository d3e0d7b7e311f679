//! Single-flight load queue.
//!
//! Activation is strictly sequential: at most one resource is in flight and the
//! rest wait in FIFO order. The queue also owns the worker slot, so that
//! "is a worker running" and "is there more work" are decided under the same
//! lock and a wake-up can never be lost between the two.

use std::collections::VecDeque ;

use crate::resource::ResourceName ;



/// FIFO of resources awaiting activation plus the single worker slot.
#[derive( Debug, Default )]
pub struct LoadQueue {
    waiting: VecDeque<ResourceName>,
    in_flight: Option<ResourceName>,
    worker_running: bool,
}

impl LoadQueue {

    /// Creates an idle, empty queue.
    pub fn new() -> Self { Self::default() }

    /// Appends `names` to the queue.
    ///
    /// Returns `true` when the caller must start the worker, i.e. no worker was
    /// running. The worker slot is claimed before returning, so concurrent
    /// callers never both get `true`.
    pub fn enqueue( &mut self, names: impl IntoIterator<Item = ResourceName> ) -> bool {
        self.waiting.extend( names );
        match self.worker_running || self.waiting.is_empty() {
            true => false,
            false => {
                self.worker_running = true ;
                true
            },
        }
    }

    /// Hands the next resource to the worker.
    ///
    /// Returns `None` and releases the worker slot when the queue is drained.
    pub fn next( &mut self ) -> Option<ResourceName> {
        self.in_flight = self.waiting.pop_front();
        if self.in_flight.is_none() { self.worker_running = false }
        self.in_flight.clone()
    }

    /// Clears the in-flight marker once its activation has settled.
    pub fn settle( &mut self ) { self.in_flight = None }

    /// Resource currently being fetched or activated.
    pub fn in_flight( &self ) -> Option<&ResourceName> { self.in_flight.as_ref() }

    /// Resources waiting behind the in-flight one.
    pub fn waiting( &self ) -> impl Iterator<Item = &ResourceName> { self.waiting.iter() }

    /// Whether a worker currently owns the queue.
    pub fn is_busy( &self ) -> bool { self.worker_running }

}
