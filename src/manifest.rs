//! Manifest document types.
//!
//! A manifest declares resource **groups** (libraries). Each group has a base
//! location for its scripts and, once known, a tree of `folder → script →
//! details` entries carrying the script's direct dependencies:
//!
//! ```json
//! {
//!     "More": {
//!         "scripts": "libs/more",
//!         "files": {
//!             "Fx": {
//!                 "Fx.Slide": { "deps": [ "Fx", "Element.Style" ] }
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! `files` may be left out, in which case the group's script tree is fetched
//! separately from `<scripts>/scripts.json`.

use std::collections::BTreeMap ;
use serde::Deserialize ;
use thiserror::Error ;

use crate::resource::ResourceName ;
use crate::path::join_locator ;
use crate::fetch::FetchError ;



/// File extension used when a group does not declare one.
pub const DEFAULT_EXTENSION: &str = "wasm" ;

/// Name of the per-group script list fetched when `files` is missing.
pub const SCRIPT_LIST: &str = "scripts.json" ;

/// Errors raised while retrieving or parsing manifest documents.
#[derive( Debug, Error )]
pub enum ManifestError {
    /// The document could not be retrieved.
    #[error( "Failed to fetch manifest '{locator}': {source}" )]
    Fetch { locator: String, #[source] source: FetchError },
    /// The document is not valid manifest JSON.
    #[error( "Malformed manifest '{locator}': {source}" )]
    Malformed { locator: String, #[source] source: serde_json::Error },
    /// A group named by the caller is not declared in any manifest.
    #[error( "Unknown group '{0}'" )]
    UnknownGroup( String ),
}

/// Groups keyed by name.
pub type LibraryManifest = BTreeMap<String, Library>;

/// Scripts of one group keyed by folder, then by script name.
pub type ScriptTree = BTreeMap<String, BTreeMap<String, ScriptDetails>>;

/// Declaration of one resource group.
#[derive( Debug, Clone, Deserialize )]
pub struct Library {
    /// Base location of the group's scripts.
    pub scripts: String,
    /// The group's script tree, when already known.
    #[serde( default )]
    pub files: Option<ScriptTree>,
    /// Extension appended to script names when deriving their path.
    #[serde( default = "default_extension" )]
    pub extension: String,
}

fn default_extension() -> String { DEFAULT_EXTENSION.to_string() }

impl Library {

    /// Declares a group whose script tree still has to be fetched.
    pub fn new( scripts: impl Into<String> ) -> Self {
        Self { scripts: scripts.into(), files: None, extension: default_extension() }
    }

    /// Sets the group's script tree.
    pub fn with_files( mut self, files: ScriptTree ) -> Self {
        self.files = Some( files );
        self
    }

    /// Sets the extension used when deriving script paths.
    pub fn with_extension( mut self, extension: impl Into<String> ) -> Self {
        self.extension = extension.into();
        self
    }

    /// Location of the group's `scripts.json`.
    pub fn script_list_locator( &self ) -> String {
        join_locator([ self.scripts.as_str(), SCRIPT_LIST ])
    }

    /// Every script declared by the group, in folder then script order.
    ///
    /// Empty while the script tree is unknown.
    pub fn script_names( &self ) -> impl Iterator<Item = ResourceName> + '_ {
        self.files.iter()
            .flat_map(| tree | tree.values() )
            .flat_map(| folder | folder.keys() )
            .map( ResourceName::from )
    }

}

/// Details recorded for one script.
#[derive( Debug, Clone, Default, Deserialize )]
pub struct ScriptDetails {
    /// Raw dependency entries, possibly containing the "no dependency" sentinel.
    #[serde( default )]
    pub deps: Vec<String>,
}

impl ScriptDetails {

    /// Builds details from a list of dependency entries.
    pub fn new( deps: impl IntoIterator<Item = impl Into<String>> ) -> Self {
        Self { deps: deps.into_iter().map( Into::into ).collect() }
    }

    /// Direct dependencies with the sentinel filtered out.
    pub fn dependencies( &self ) -> impl Iterator<Item = ResourceName> + '_ {
        self.deps.iter().filter_map(| entry | ResourceName::dependency( entry ))
    }

}

/// Where a manifest comes from.
#[derive( Debug, Clone )]
pub enum ManifestSource {
    /// An already parsed document.
    Inline( LibraryManifest ),
    /// A locator handed to the [`Fetch`]( crate::Fetch ) capability.
    Locator( String ),
}

impl From<LibraryManifest> for ManifestSource {
    fn from( manifest: LibraryManifest ) -> Self { Self::Inline( manifest )}
}

impl From<&str> for ManifestSource {
    fn from( locator: &str ) -> Self { Self::Locator( locator.to_string() )}
}

impl From<String> for ManifestSource {
    fn from( locator: String ) -> Self { Self::Locator( locator )}
}

/// Parses a library document.
///
/// # Errors
/// Returns [`ManifestError::Malformed`] when `bytes` is not a valid document.
pub fn parse_libraries( locator: &str, bytes: &[u8] ) -> Result<LibraryManifest, ManifestError> {
    serde_json::from_slice( bytes )
        .map_err(| source | ManifestError::Malformed { locator: locator.to_string(), source })
}

/// Parses a group's `scripts.json`.
///
/// # Errors
/// Returns [`ManifestError::Malformed`] when `bytes` is not a valid script tree.
pub fn parse_script_tree( locator: &str, bytes: &[u8] ) -> Result<ScriptTree, ManifestError> {
    serde_json::from_slice( bytes )
        .map_err(| source | ManifestError::Malformed { locator: locator.to_string(), source })
}
