//! Loader configuration.

use serde::Deserialize ;

use crate::resource::ResourceName ;



/// Options recognized by [`Depender`]( crate::Depender ).
///
/// Deserializes from either snake_case or the camelCase spelling used by
/// browser-side configs:
///
/// ```
/// use depender::DependerOptions ;
///
/// let options = DependerOptions::from_json( r#"{
/// 	"initiallyLoaded": [ "Core" ],
/// 	"initiallyLoadedGroups": [ "Runtime" ],
/// 	"noCache": true
/// }"# ).unwrap();
///
/// assert_eq!( options.initially_loaded, [ "Core" ]);
/// assert!( options.no_cache );
/// assert!( !options.verbose_logging );
/// ```
#[derive( Debug, Clone, Default, PartialEq, Eq, Deserialize )]
#[serde( default )]
pub struct DependerOptions {
    /// Names the environment asserts are already present.
    #[serde( alias = "initiallyLoaded", alias = "loadedScripts" )]
    pub initially_loaded: Vec<String>,
    /// Groups whose every script is already present. Expanded once the
    /// dependency map is complete.
    #[serde( alias = "initiallyLoadedGroups", alias = "loadedSources" )]
    pub initially_loaded_groups: Vec<String>,
    /// Asks the fetch capability to bypass any cache it keeps.
    #[serde( alias = "noCache" )]
    pub no_cache: bool,
    /// Emits informational messages instead of holding them back.
    #[serde( alias = "verboseLogging", alias = "log" )]
    pub verbose_logging: bool,
}

impl DependerOptions {

    /// Default options: nothing seeded, caching allowed, quiet.
    pub fn new() -> Self { Self::default() }

    /// Parses options from JSON.
    ///
    /// # Errors
    /// Returns the parser error if `json` is not a valid options object.
    pub fn from_json( json: &str ) -> Result<Self, serde_json::Error> { serde_json::from_str( json )}

    /// Seeds `names` as already loaded.
    pub fn with_initially_loaded( mut self, names: impl IntoIterator<Item = impl Into<String>> ) -> Self {
        self.initially_loaded.extend( names.into_iter().map( Into::into ));
        self
    }

    /// Seeds every script of `groups` as already loaded.
    pub fn with_initially_loaded_groups( mut self, groups: impl IntoIterator<Item = impl Into<String>> ) -> Self {
        self.initially_loaded_groups.extend( groups.into_iter().map( Into::into ));
        self
    }

    /// Bypasses fetch caches.
    pub fn with_no_cache( mut self, no_cache: bool ) -> Self {
        self.no_cache = no_cache ;
        self
    }

    /// Toggles verbose logging.
    pub fn with_verbose_logging( mut self, verbose: bool ) -> Self {
        self.verbose_logging = verbose ;
        self
    }

    /// Seed names, with the "no dependency" sentinel dropped.
    pub fn seed_names( &self ) -> impl Iterator<Item = ResourceName> + '_ {
        self.initially_loaded.iter().filter_map(| name | ResourceName::dependency( name ))
    }

}
