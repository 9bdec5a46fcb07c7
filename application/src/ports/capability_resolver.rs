//! Capability Resolver port
//!
//! Maps a caller-supplied parser name onto a [`ParserCapability`].
//! Implementations (the builtin table plus external executables) live in the
//! infrastructure layer.

use panel_domain::parser::{CapabilityError, ParserCapability};
use std::sync::Arc;

/// Port for resolving parser capabilities by name
pub trait CapabilityResolverPort {
    /// Namespace prefix joined with every name before lookup
    fn namespace(&self) -> &str;

    /// Resolve `name` (unqualified) to a capability.
    ///
    /// Must not read any payload; failures here are resolution errors.
    fn resolve(&self, name: &str) -> Result<Arc<dyn ParserCapability>, CapabilityError>;
}
