//! Load state tracking.
//!
//! The [`LoadTracker`] is the single authority on which resources are loaded.
//! Every name it has ever seen is part of its *universe*; names it has never
//! seen are [`LoadState::Unknown`]. States only move forward:
//! `Unknown → Pending → Loaded`, or straight to `Loaded` for seeded names.

use std::collections::HashMap ;

use crate::resource::ResourceName ;



/// Where a resource stands in the load lifecycle.
#[derive( Debug, Default, Clone, Copy, PartialEq, Eq, Hash )]
pub enum LoadState {
    /// Never requested nor seeded.
    #[default] Unknown,
    /// Requested and waiting for (or undergoing) activation.
    Pending,
    /// Activated, or asserted present by the environment.
    Loaded,
}

impl std::fmt::Display for LoadState {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

/// Tri-state record of every tracked resource.
#[derive( Debug, Default, Clone )]
pub struct LoadTracker {
    states: HashMap<ResourceName, LoadState>,
    /// Loaded names in the order they became loaded.
    loaded: Vec<ResourceName>,
}

impl LoadTracker {

    /// Creates an empty tracker.
    pub fn new() -> Self { Self::default() }

    /// Creates a tracker with `names` already loaded.
    pub fn seeded( names: impl IntoIterator<Item = ResourceName> ) -> Self {
        let mut tracker = Self::new();
        tracker.seed( names );
        tracker
    }

    /// Marks `names` as loaded without them ever being pending.
    pub fn seed( &mut self, names: impl IntoIterator<Item = ResourceName> ) {
        names.into_iter().for_each(| name | { self.mark_loaded( &name ); });
    }

    /// State of `name`.
    pub fn state( &self, name: &ResourceName ) -> LoadState {
        self.states.get( name ).copied().unwrap_or_default()
    }

    /// Whether `name` is loaded.
    pub fn is_loaded( &self, name: &ResourceName ) -> bool { self.state( name ) == LoadState::Loaded }

    /// The subset of `names` that is not loaded, order preserved.
    pub fn filter_unloaded<'a>( &self, names: impl IntoIterator<Item = &'a ResourceName> ) -> Vec<ResourceName> {
        names.into_iter()
            .filter(| name | !self.is_loaded( name ))
            .cloned()
            .collect()
    }

    /// Moves every `Unknown` name in `names` to `Pending`.
    ///
    /// Returns the names that changed state, in order; those are the ones that
    /// still have to be scheduled. Pending and loaded names are left alone.
    pub fn mark_pending<'a>( &mut self, names: impl IntoIterator<Item = &'a ResourceName> ) -> Vec<ResourceName> {
        names.into_iter()
            .filter(| name | match self.states.get( *name ) {
                None | Some( LoadState::Unknown ) => {
                    self.states.insert(( *name ).clone(), LoadState::Pending );
                    true
                },
                Some( LoadState::Pending | LoadState::Loaded ) => false,
            })
            .cloned()
            .collect()
    }

    /// Marks `name` as loaded. Returns `false` if it already was.
    pub fn mark_loaded( &mut self, name: &ResourceName ) -> bool {
        match self.states.insert( name.clone(), LoadState::Loaded ) {
            Some( LoadState::Loaded ) => false,
            _ => {
                self.loaded.push( name.clone() );
                true
            },
        }
    }

    /// Whether no tracked name is pending.
    pub fn all_loaded( &self ) -> bool {
        self.states.values().all(| state | *state == LoadState::Loaded )
    }

    /// Whether every one of `names` is loaded.
    pub fn all_loaded_among<'a>( &self, names: impl IntoIterator<Item = &'a ResourceName> ) -> bool {
        names.into_iter().all(| name | self.is_loaded( name ))
    }

    /// Loaded names in the order they became loaded.
    pub fn loaded_names( &self ) -> &[ResourceName] { &self.loaded }

    /// Pending names, sorted.
    pub fn pending_names( &self ) -> Vec<ResourceName> {
        let mut pending = self.states.iter()
            .filter(|( _, state )| **state == LoadState::Pending )
            .map(|( name, _ )| name.clone() )
            .collect::<Vec<_>>();
        pending.sort();
        pending
    }

    /// Number of tracked names.
    pub fn tracked_count( &self ) -> usize { self.states.len() }

    /// Number of loaded names.
    pub fn loaded_count( &self ) -> usize { self.loaded.len() }

}
