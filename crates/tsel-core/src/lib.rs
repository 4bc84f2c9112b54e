//! # tsel-core - Core Domain Types
//!
//! Foundation crate for Target Select. Provides the target model, discovery
//! event definitions, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Targets (`target`)
//! - [`Target`] - A discoverable JVM, keyed by its connect URL
//! - [`NO_TARGET`] - The sentinel selection
//! - [`TargetList`] - Ordered collection of targets, unique by connect URL
//! - [`Annotations`] - Platform/cryostat metadata published with a target
//!
//! ### Discovery (`discovery`)
//! - [`DiscoveryEvent`] - A FOUND/LOST/CHANGED push notification payload
//! - [`EventKind`] - The event tag, including unrecognized values
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use tsel_core::prelude::*;
//! ```

pub mod discovery;
pub mod error;
pub mod logging;
pub mod target;

/// Prelude for common imports used throughout all Target Select crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use discovery::{DiscoveryEvent, EventKind, DISCOVERY_CATEGORY};
pub use error::{Error, Result};
pub use target::{Annotations, Target, TargetList, NO_TARGET};
