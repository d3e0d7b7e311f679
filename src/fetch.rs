//! Retrieval capability.
//!
//! The loader never performs I/O itself. Manifests and resource contents are
//! retrieved through a [`Fetch`] implementation supplied by the host. Timeouts
//! are the implementation's business; the loader treats them like any other
//! failure.

use std::collections::HashMap ;
use std::path::{ Component, Path, PathBuf };
use std::sync::{ Arc, Mutex, PoisonError };
use std::time::Duration ;
use async_trait::async_trait ;
use thiserror::Error ;



/// Errors produced while retrieving a locator.
#[derive( Debug, Error )]
pub enum FetchError {
    /// Reading the locator failed.
    #[error( "Failed to read '{locator}': {source}" )]
    Io { locator: String, #[source] source: std::io::Error },
    /// The retrieval did not finish in time.
    #[error( "Timed out fetching '{locator}' after {elapsed:?}" )]
    Timeout { locator: String, elapsed: Duration },
    /// The implementation refused or could not serve the locator.
    #[error( "Could not fetch '{locator}': {reason}" )]
    Rejected { locator: String, reason: String },
}

/// Asynchronous retrieval of manifests and resource contents.
///
/// `no_cache` asks the implementation to bypass any cache it keeps.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Retrieves the raw bytes behind `locator`.
    async fn fetch( &self, locator: &str, no_cache: bool ) -> Result<Vec<u8>, FetchError> ;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    async fn fetch( &self, locator: &str, no_cache: bool ) -> Result<Vec<u8>, FetchError> {
        ( **self ).fetch( locator, no_cache ).await
    }
}

/// Fetches locators as paths relative to a root directory.
///
/// Absolute locators are joined onto the root as well. Locators stepping out
/// of the root through `..` are rejected.
#[derive( Debug )]
pub struct FsFetch {
    root: PathBuf,
    timeout: Option<Duration>,
    cache: Option<Mutex<HashMap<String, Arc<[u8]>>>>,
}

impl FsFetch {

    /// Serves files under `root`, without caching and without a timeout.
    pub fn new( root: impl Into<PathBuf> ) -> Self {
        Self { root: root.into(), timeout: None, cache: None }
    }

    /// Fails reads that take longer than `timeout`.
    pub fn with_timeout( mut self, timeout: Duration ) -> Self {
        self.timeout = Some( timeout );
        self
    }

    /// Keeps the contents of every file read, unless a fetch asks for `no_cache`.
    pub fn with_cache( mut self ) -> Self {
        self.cache = Some( Mutex::new( HashMap::new() ));
        self
    }

    /// Directory locators are resolved against.
    pub fn root( &self ) -> &Path { &self.root }

    fn resolve( &self, locator: &str ) -> Result<PathBuf, FetchError> {
        let relative = Path::new( locator.trim_start_matches( '/' ));
        match relative.components().all(| part | matches!( part, Component::Normal( _ ) | Component::CurDir )) {
            true => Ok( self.root.join( relative )),
            false => Err( FetchError::Rejected { locator: locator.to_string(), reason: "escapes the root directory".to_string() }),
        }
    }

    fn cached( &self, locator: &str ) -> Option<Vec<u8>> {
        self.cache.as_ref()?
            .lock().unwrap_or_else( PoisonError::into_inner )
            .get( locator )
            .map(| bytes | bytes.to_vec() )
    }

    fn remember( &self, locator: &str, bytes: &[u8] ) {
        if let Some( cache ) = &self.cache {
            cache.lock().unwrap_or_else( PoisonError::into_inner ).insert( locator.to_string(), Arc::from( bytes ));
        }
    }

}

#[async_trait]
impl Fetch for FsFetch {
    async fn fetch( &self, locator: &str, no_cache: bool ) -> Result<Vec<u8>, FetchError> {

        if !no_cache {
            if let Some( bytes ) = self.cached( locator ) { return Ok( bytes )}
        }

        let path = self.resolve( locator )?;
        let read = tokio::fs::read( &path );
        let bytes = match self.timeout {
            None => read.await,
            Some( timeout ) => tokio::time::timeout( timeout, read ).await
                .map_err(| _ | FetchError::Timeout { locator: locator.to_string(), elapsed: timeout })?,
        }.map_err(| source | FetchError::Io { locator: locator.to_string(), source })?;

        self.remember( locator, &bytes );
        Ok( bytes )

    }
}
