//! Dependency map store.
//!
//! The [`DependencyMap`] holds, per resource name, its declared direct
//! dependencies and the location it can be fetched from. It is assembled from
//! one or more manifest fragments and only answers questions once every
//! declared group has its script tree ([`is_complete`]( DependencyMap::is_complete )).
//!
//! The store never fetches anything itself. Retrieval of missing script trees
//! is driven by the owner, which asks for [`missing_script_lists`]( DependencyMap::missing_script_lists )
//! and hands the results back through [`set_files`]( DependencyMap::set_files ).

use std::collections::HashMap ;
use itertools::Itertools ;

use crate::resource::ResourceName ;
use crate::manifest::{ Library, LibraryManifest, ScriptTree };
use crate::path::join_locator ;



/// Position of a script within the declared groups.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ScriptLocation {
    /// Group that declares the script.
    pub group: String,
    /// Folder inside the group.
    pub folder: String,
}

#[derive( Debug, Clone )]
struct MappedScript {
    location: ScriptLocation,
    dependencies: Vec<ResourceName>,
}

/// Per-resource dependency lists and paths, built from manifest fragments.
#[derive( Debug, Default, Clone )]
pub struct DependencyMap {
    libraries: LibraryManifest,
    scripts: HashMap<ResourceName, MappedScript>,
}

impl DependencyMap {

    /// Creates an empty store.
    pub fn new() -> Self { Self::default() }

    /// Merges a manifest fragment into the store.
    ///
    /// A group already present keeps its script tree unless the fragment
    /// brings one; its base location and extension are updated. The
    /// per-script index is rebuilt if the store is complete afterwards.
    pub fn ingest( &mut self, fragment: LibraryManifest ) {
        fragment.into_iter().for_each(|( group, incoming )| match self.libraries.get_mut( &group ) {
            Some( existing ) => {
                existing.scripts = incoming.scripts ;
                existing.extension = incoming.extension ;
                if incoming.files.is_some() { existing.files = incoming.files }
            },
            None => { self.libraries.insert( group, incoming ); },
        });
        if self.is_complete() { self.map_tree() }
    }

    /// Records the script tree fetched for `group`.
    ///
    /// Returns `false` if the group was never declared.
    pub fn set_files( &mut self, group: &str, files: ScriptTree ) -> bool {
        let Some( library ) = self.libraries.get_mut( group ) else { return false };
        library.files = Some( files );
        if self.is_complete() { self.map_tree() }
        true
    }

    /// Whether every declared group has its script tree.
    pub fn is_complete( &self ) -> bool {
        self.libraries.values().all(| library | library.files.is_some() )
    }

    /// Groups still lacking a script tree, with the locator of their `scripts.json`.
    pub fn missing_script_lists( &self ) -> Vec<( String, String )> {
        self.libraries.iter()
            .filter(|( _, library )| library.files.is_none() )
            .map(|( group, library )| ( group.clone(), library.script_list_locator() ))
            .collect()
    }

    /// Declared groups.
    pub fn groups( &self ) -> impl Iterator<Item = ( &str, &Library )> {
        self.libraries.iter().map(|( name, library )| ( name.as_str(), library ))
    }

    /// Every script declared under `group`, or `None` if the group is unknown.
    pub fn group_files( &self, group: &str ) -> Option<Vec<ResourceName>> {
        self.libraries.get( group ).map(| library | library.script_names().collect() )
    }

    /// Whether `name` has an entry in the store.
    pub fn contains( &self, name: &ResourceName ) -> bool { self.scripts.contains_key( name )}

    /// Number of mapped scripts.
    pub fn len( &self ) -> usize { self.scripts.len() }

    /// Whether no script is mapped.
    pub fn is_empty( &self ) -> bool { self.scripts.is_empty() }

    /// Mapped script names, sorted.
    pub fn names( &self ) -> Vec<&ResourceName> { self.scripts.keys().sorted().collect() }

    /// Declared direct dependencies of `name`.
    ///
    /// Returns `None` if `name` has no entry in the store. The "no dependency"
    /// sentinel never appears in the returned list.
    pub fn dependencies_of( &self, name: &ResourceName ) -> Option<&[ResourceName]> {
        self.scripts.get( name ).map(| script | script.dependencies.as_slice() )
    }

    /// Where `name` lives within the declared groups.
    pub fn location_of( &self, name: &ResourceName ) -> Option<&ScriptLocation> {
        self.scripts.get( name ).map(| script | &script.location )
    }

    /// Fetchable location of `name`: `<scripts>/<folder>/<name>.<extension>`.
    ///
    /// Falls back to the name itself when it cannot be resolved, so a direct
    /// fetch can still be attempted.
    pub fn path_of( &self, name: &ResourceName ) -> String {
        self.scripts.get( name )
            .and_then(| script | self.libraries.get( &script.location.group ).map(| library | ( script, library )))
            .map(|( script, library )| {
                let file = format!( "{}.{}", name, library.extension );
                join_locator([ library.scripts.as_str(), script.location.folder.as_str(), file.as_str() ])
            })
            .unwrap_or_else(|| name.to_string() )
    }

    // Groups are visited in lexical order, so a script declared by two groups
    // resolves to the later one.
    fn map_tree( &mut self ) {
        self.scripts = self.libraries.iter()
            .filter_map(|( group, library )| library.files.as_ref().map(| files | ( group, files )))
            .flat_map(|( group, files )| files.iter().map( move |( folder, scripts )| ( group, folder, scripts )))
            .flat_map(|( group, folder, scripts )| scripts.iter().map( move |( script, details )| (
                ResourceName::from( script ),
                MappedScript {
                    location: ScriptLocation { group: group.clone(), folder: folder.clone() },
                    dependencies: details.dependencies().collect(),
                },
            )))
            .collect();
    }

}
