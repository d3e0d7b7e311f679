//! An on-demand dependency loader.
//!
//! Applications made of many small resources rarely want to load all of them
//! up front. `depender` lets callers ask for the resources they need by name;
//! it works out everything those depend on, loads what is missing in
//! dependency order, and activates each resource exactly once per process no
//! matter how many callers ask for it.
//!
//! # Core Concepts
//!
//! - **Resource**: A named unit of code identified by a [`ResourceName`]. Names
//! 	are unique across the whole dependency map.
//!
//! - **Group**: A named collection of resources sharing a base locator, declared
//! 	in a [`LibraryManifest`]. Each group's files are listed in a [`ScriptTree`],
//! 	either inline or in a `scripts.json` next to the group's resources.
//!
//! - [`DependencyMap`]: Every known resource with its declared dependencies and
//! 	where to fetch it from. Assembled from one or more manifests.
//!
//! - [`Depender`]: The loader. Requests made before the map is complete are
//! 	buffered; afterwards each request is resolved with [`transitive_closure`],
//! 	filtered against the [`LoadTracker`] and queued on a single-flight
//! 	[`LoadQueue`].
//!
//! - [`Fetch`] and [`Activate`]: Capabilities supplied by the host. [`FsFetch`]
//! 	reads from a directory and [`WasmActivator`] instantiates each resource as a
//! 	WebAssembly component.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap ;
//! use depender::{ Depender, DependerOptions, FsFetch, Library, ScriptDetails, WasmActivator };
//!
//! # #[tokio::main( flavor = "current_thread" )]
//! # async fn main() {
//! let depender = Depender::new( DependerOptions::new(), FsFetch::new( "assets" ), WasmActivator::default() );
//!
//! // A group without inline `files` has them fetched from `<scripts>/scripts.json`.
//! depender.fetch_libs( BTreeMap::from([( "Core".to_string(), Library::new( "/core" ).with_files(
//! 	BTreeMap::from([( "Lang".to_string(), BTreeMap::from([
//! 		( "Core".to_string(), ScriptDetails::new([ "None" ])),
//! 		( "Array".to_string(), ScriptDetails::new([ "Core" ])),
//! 	]))]),
//! ))]));
//! assert!( depender.is_map_loaded() );
//!
//! depender.on_requirement_loaded(| loaded | println!( "loaded: {:?}", loaded ));
//! depender.require([ "Array" ]);
//! # }
//! ```
//!
//! # Process-wide Instance
//!
//! Two independent loaders would each activate shared resources. Use
//! [`Registry::global`] with [`DEFAULT_HANDLE`] so that every caller in the
//! process shares one loader.

mod resource ;
mod path ;
mod manifest ;
mod dependency_map ;
mod closure ;
mod tracker ;
mod queue ;
mod notifier ;
mod options ;
mod diagnostics ;
mod fetch ;
mod activate ;
mod depender ;
mod registry ;
mod utils ;

pub use resource::{ ResourceName, NO_DEPENDENCY };
pub use path::{ clean_double_slash, join_locator };
pub use manifest::{
	Library, ScriptDetails, LibraryManifest, ScriptTree, ManifestSource, ManifestError,
	DEFAULT_EXTENSION, SCRIPT_LIST, parse_libraries, parse_script_tree,
};
pub use dependency_map::{ DependencyMap, ScriptLocation };
pub use closure::{ transitive_closure, closure_of_all, ResolveError };
pub use tracker::{ LoadState, LoadTracker };
pub use queue::LoadQueue ;
pub use notifier::{ ScriptLoaded, Notification, CompletionNotifier, Subscribers, SubscriptionId, NamesHandler, ProgressHandler };
pub use options::DependerOptions ;
pub use diagnostics::Diagnostics ;
pub use fetch::{ Fetch, FsFetch, FetchError };
pub use activate::{ Activate, ActivationError, WasmActivator, ScriptContext };
pub use depender::{ Depender, LoadError };
pub use registry::{ Registry, DEFAULT_HANDLE };
pub use utils::PartialSuccess ;
