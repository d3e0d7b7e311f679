//! Transitive dependency resolution.
//!
//! [`transitive_closure`] walks the [`DependencyMap`] depth-first and returns a
//! resource's dependencies in load order (every dependency before its
//! dependents), followed by the resource itself. Names appear once.
//!
//! Resolution never fails outright. Problems in the map are reported alongside
//! the result:
//!
//! - a name with no entry is treated as having no dependencies
//! 	([`ResolveError::UnmappedDependency`]);
//! - a dependency that is already being expanded further up the walk closes a
//! 	cycle; the back edge is dropped ([`ResolveError::CyclicDependency`]).

use std::collections::HashSet ;
use thiserror::Error ;
use itertools::Itertools ;

use crate::resource::ResourceName ;
use crate::dependency_map::DependencyMap ;
use crate::utils::PartialSuccess ;



/// Problems found in the dependency map while resolving a closure.
#[derive( Debug, Clone, PartialEq, Eq, Hash, Error )]
pub enum ResolveError {
    /// A referenced name has no entry in the dependency map.
    #[error( "Dependencies not mapped for '{0}'" )]
    UnmappedDependency( ResourceName ),
    /// Following dependencies led back to a name that is still being expanded.
    /// The path starts and ends with that name.
    #[error( "Circular dependency: {}", .0.iter().join( " -> " ))]
    CyclicDependency( Vec<ResourceName> ),
}

/// Computes the load order for `name`: its transitive dependencies, dependencies
/// first, then `name` itself.
///
/// Self references are ignored. Cycles terminate: when a dependency is already on
/// the expansion stack, the edge is reported and skipped, so every member of the
/// cycle is still included exactly once.
///
/// ```
/// use depender::{ DependencyMap, Library, ResourceName, ScriptDetails, transitive_closure };
/// use std::collections::BTreeMap ;
///
/// let mut map = DependencyMap::new();
/// map.ingest( BTreeMap::from([( "Lib".to_string(), Library::new( "lib" ).with_files( BTreeMap::from([
/// 	( "Core".to_string(), BTreeMap::from([
/// 		( "A".to_string(), ScriptDetails::new([ "B" ])),
/// 		( "B".to_string(), ScriptDetails::new([ "C" ])),
/// 		( "C".to_string(), ScriptDetails::new([ "None" ])),
/// 	])),
/// ])))]));
///
/// let ( order, problems ) = transitive_closure( &map, &ResourceName::new( "A" ));
/// assert!( problems.is_empty() );
/// assert_eq!( order, [ "C", "B", "A" ]);
/// ```
pub fn transitive_closure( map: &DependencyMap, name: &ResourceName ) -> PartialSuccess<Vec<ResourceName>, ResolveError> {

    let mut walk = Walk { map, order: Vec::new(), included: HashSet::new(), stack: Vec::new(), problems: Vec::new() };
    walk.expand( name );
    walk.include( name );

    ( walk.order, walk.problems )

}

/// Computes the combined load order for several names, each name's closure
/// appended in request order without repeating names already present.
pub fn closure_of_all<'a>(
    map: &DependencyMap,
    names: impl IntoIterator<Item = &'a ResourceName>,
) -> PartialSuccess<Vec<ResourceName>, ResolveError> {
    names.into_iter()
        .map(| name | transitive_closure( map, name ))
        .fold(( Vec::new(), Vec::new() ), |( order, problems ), ( closure, new_problems )| (
            order.into_iter().chain( closure ).unique().collect(),
            problems.into_iter().chain( new_problems ).unique().collect(),
        ))
}

struct Walk<'a> {
    map: &'a DependencyMap,
    order: Vec<ResourceName>,
    included: HashSet<ResourceName>,
    stack: Vec<ResourceName>,
    problems: Vec<ResolveError>,
}

impl Walk<'_> {

    fn expand( &mut self, name: &ResourceName ) {

        let map = self.map ;
        let Some( dependencies ) = map.dependencies_of( name ) else {
            tracing::warn!(
                script = %name,
                mapped = ?map.names(),
                "dependencies not mapped"
            );
            self.problems.push( ResolveError::UnmappedDependency( name.clone() ));
            return
        };

        self.stack.push( name.clone() );

        for dependency in dependencies {
            if dependency == name || self.included.contains( dependency ) { continue }
            if let Some( start ) = self.stack.iter().position(| entry | entry == dependency ) {
                let cycle = self.stack[ start.. ].iter().cloned().chain([ dependency.clone() ]).collect::<Vec<_>>();
                tracing::warn!( cycle = %cycle.iter().join( " -> " ), "circular dependency" );
                self.problems.push( ResolveError::CyclicDependency( cycle ));
                continue
            }
            self.expand( dependency );
            self.include( dependency );
        }

        self.stack.pop();

    }

    fn include( &mut self, name: &ResourceName ) {
        if self.included.insert( name.clone() ) { self.order.push( name.clone() )}
    }

}
