//! Resource naming.
//!
//! A resource is a named, independently loadable unit of executable content.
//! Names are opaque and unique within a [`DependencyMap`]( crate::DependencyMap ).
//!
//! Manifests historically spell "no dependency" as the string `"None"` or as an
//! empty entry. That sentinel never becomes a [`ResourceName`]; it is turned into
//! `None` by [`ResourceName::dependency`] at the edge, so nothing downstream has
//! to compare against magic strings.

use std::sync::Arc ;



/// Manifest spelling of "no dependency".
pub const NO_DEPENDENCY: &str = "None" ;

/// Opaque identifier of a loadable resource.
///
/// Cloning is cheap; the name is shared behind an `Arc`.
#[derive( Clone, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct ResourceName( Arc<str> );

impl ResourceName {

    /// Creates a resource name.
    ///
    /// Does not reject the sentinel; use [`ResourceName::dependency`] when
    /// reading dependency lists.
    pub fn new( name: impl AsRef<str> ) -> Self { Self( Arc::from( name.as_ref() ))}

    /// Interprets a dependency entry, mapping the "no dependency" sentinel
    /// (`"None"`, empty or whitespace-only) to `None`.
    pub fn dependency( entry: &str ) -> Option<Self> {
        let entry = entry.trim();
        match entry.is_empty() || entry == NO_DEPENDENCY {
            true => None,
            false => Some( Self::new( entry )),
        }
    }

    /// The name as a string slice.
    #[inline] pub fn as_str( &self ) -> &str { &self.0 }

}

impl std::fmt::Display for ResourceName {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.0 )}
}

impl std::fmt::Debug for ResourceName {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { write!( f, "{:?}", &*self.0 )}
}

impl AsRef<str> for ResourceName {
    fn as_ref( &self ) -> &str { &self.0 }
}

impl std::borrow::Borrow<str> for ResourceName {
    fn borrow( &self ) -> &str { &self.0 }
}

impl From<&str> for ResourceName {
    fn from( name: &str ) -> Self { Self::new( name )}
}

impl From<String> for ResourceName {
    fn from( name: String ) -> Self { Self( Arc::from( name ))}
}

impl From<&String> for ResourceName {
    fn from( name: &String ) -> Self { Self::new( name )}
}

impl PartialEq<str> for ResourceName {
    fn eq( &self, other: &str ) -> bool { &*self.0 == other }
}

impl PartialEq<&str> for ResourceName {
    fn eq( &self, other: &&str ) -> bool { &*self.0 == *other }
}
