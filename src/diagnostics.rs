//! Verbose logging gate.
//!
//! Informational messages ("loading script", "dependencies mapped", ...) are
//! only worth emitting when verbose logging is on. While it is off they are
//! kept in a backlog, so turning it on later still shows what already happened.
//! Warnings bypass the gate and go straight to `tracing`.

use std::sync::Mutex ;
use std::sync::PoisonError ;
use std::sync::atomic::{ AtomicBool, Ordering };



/// Gate for verbose loader messages.
#[derive( Debug, Default )]
pub struct Diagnostics {
    verbose: AtomicBool,
    backlog: Mutex<Vec<String>>,
}

impl Diagnostics {

    /// Creates a gate, open if `verbose` is set.
    pub fn new( verbose: bool ) -> Self {
        Self { verbose: AtomicBool::new( verbose ), backlog: Mutex::new( Vec::new() )}
    }

    /// Emits `message` at debug level, or keeps it for later if verbose logging is off.
    pub fn log( &self, message: impl Into<String> ) {
        let message = message.into();
        match self.verbose.load( Ordering::Acquire ) {
            true => tracing::debug!( target: "depender", "{}", message ),
            false => self.backlog.lock().unwrap_or_else( PoisonError::into_inner ).push( message ),
        }
    }

    /// Turns verbose logging on and replays the backlog.
    pub fn enable( &self ) {
        let backlog = {
            let mut backlog = self.backlog.lock().unwrap_or_else( PoisonError::into_inner );
            self.verbose.store( true, Ordering::Release );
            std::mem::take( &mut *backlog )
        };
        tracing::debug!( target: "depender", "enabling depender log" );
        backlog.into_iter().for_each(| message | tracing::debug!( target: "depender", "{}", message ));
    }

    /// Turns verbose logging off; later messages go to the backlog.
    pub fn disable( &self ) { self.verbose.store( false, Ordering::Release )}

    /// Whether verbose logging is on.
    pub fn is_verbose( &self ) -> bool { self.verbose.load( Ordering::Acquire )}

    /// Messages held back while verbose logging was off.
    pub fn backlog( &self ) -> Vec<String> {
        self.backlog.lock().unwrap_or_else( PoisonError::into_inner ).clone()
    }

}
