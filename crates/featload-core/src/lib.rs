pub mod config;
pub mod logging;

pub mod discovery;
pub mod error;
pub mod injector;
pub mod loader;
pub mod navbar;
pub mod plugins;
pub mod registry;
pub mod retry;
pub mod session;
pub mod transport;
pub mod url_model;

pub use error::{DiscoveryError, ExecutionError, Fault, FetchError, LoadError, ValidationError};
pub use session::Session;
