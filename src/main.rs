//! Command line front end: loads the requested resources from a directory and
//! reports the order they were activated in.
//!
//! ```text
//! depender --root assets --manifest libs.json Fx.Slide Request
//! ```

use std::path::PathBuf ;
use std::sync::Arc ;
use std::time::Duration ;
use clap::Parser ;
use itertools::Itertools ;
use thiserror::Error ;
use tracing_subscriber::EnvFilter ;

use depender::{ Depender, DependerOptions, FsFetch, ManifestError, ResourceName, WasmActivator };



#[derive( Parser )]
#[command( name = "depender" )]
#[command( about = "Resolve, fetch and activate WebAssembly resources in dependency order" )]
struct Cli {
    /// Directory locators are resolved against
    #[arg( long, default_value = "." )]
    root: PathBuf,

    /// Locator of the library manifest, relative to the root
    #[arg( short, long )]
    manifest: String,

    /// Resource already present in the host (repeatable)
    #[arg( long = "loaded" )]
    loaded: Vec<String>,

    /// Group whose resources are already present in the host (repeatable)
    #[arg( long = "loaded-group" )]
    loaded_groups: Vec<String>,

    /// Bypass the fetch cache
    #[arg( long )]
    no_cache: bool,

    /// Emit informational loader messages
    #[arg( short, long )]
    verbose: bool,

    /// Give up waiting after this many seconds
    #[arg( long, default_value_t = 30 )]
    timeout_secs: u64,

    /// Resources to load
    names: Vec<String>,
}

#[derive( Debug, Error )]
enum CliError {
    #[error( "{}", .0.iter().join( "\n" ))]
    Manifest( Vec<ManifestError> ),
    #[error( "Timed out after {}s; still pending: {}", .0.as_secs(), .1.iter().join( ", " ))]
    Timeout( Duration, Vec<ResourceName> ),
    #[error( "Loader stopped before the requirement was satisfied" )]
    Disconnected,
}

#[tokio::main]
async fn main() {

    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        true => "info,depender=debug",
        false => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(| _ | default_filter.into() ))
        .with_writer( std::io::stderr )
        .init();

    match run( cli ).await {
        Ok( activated ) => activated.iter().for_each(| name | println!( "{}", name )),
        Err( err ) => {
            eprintln!( "{}", err );
            std::process::exit( 1 );
        },
    }

}

async fn run( cli: Cli ) -> Result<Vec<ResourceName>, CliError> {

    let options = DependerOptions::new()
        .with_initially_loaded( cli.loaded )
        .with_initially_loaded_groups( cli.loaded_groups )
        .with_no_cache( cli.no_cache )
        .with_verbose_logging( cli.verbose );
    let activator = Arc::new( WasmActivator::default() );
    let depender = Depender::new( options, FsFetch::new( cli.root ).with_cache(), Arc::clone( &activator ));

    depender.on_script_loaded(| progress | tracing::info!(
        script = %progress.script,
        percent = progress.percent_of_total,
        "loaded"
    ));

    let problems = depender.load_libs( cli.manifest ).await ;
    if !problems.is_empty() { return Err( CliError::Manifest( problems ))}

    let ( sender, mut receiver ) = tokio::sync::mpsc::unbounded_channel();
    depender.on_requirement_loaded( move | _ | { let _ = sender.send(()); });
    depender.require( cli.names );

    // Seeded resources were never activated here and are left out.
    let timeout = Duration::from_secs( cli.timeout_secs );
    match tokio::time::timeout( timeout, receiver.recv() ).await {
        Ok( Some(())) => Ok( activator.activated() ),
        Ok( None ) => Err( CliError::Disconnected ),
        Err( _ ) => Err( CliError::Timeout( timeout, depender.pending() )),
    }

}
