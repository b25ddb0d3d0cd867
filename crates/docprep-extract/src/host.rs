//! Host-application automation capability for legacy Office formats.
//!
//! `.doc`, `.ppt`, and `.xls` predate the Open XML container and need the
//! installed office suite to read reliably. Automation only exists on
//! hosts with that suite, so it is modeled as an injectable capability;
//! [`NoHostAutomation`] is the default and the registry degrades those
//! extensions to "unsupported" when it is in place.

use docprep_core::{PageRecord, PrepError, Result};
use std::path::Path;

/// Legacy-document extraction through an installed office application.
pub trait HostAutomation: Send + Sync {
    /// Automation backend name for logs
    fn name(&self) -> &'static str;

    /// Whether the host application can be driven on this machine
    fn is_available(&self) -> bool;

    /// Extract text from a legacy Office file.
    ///
    /// # Errors
    /// Returns `BackendError` when the host application is missing or the
    /// automation call fails.
    fn extract(&self, path: &Path) -> Result<Vec<PageRecord>>;
}

/// Default capability: no office suite available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHostAutomation;

impl HostAutomation for NoHostAutomation {
    #[inline]
    fn name(&self) -> &'static str {
        "none"
    }

    #[inline]
    fn is_available(&self) -> bool {
        false
    }

    fn extract(&self, _path: &Path) -> Result<Vec<PageRecord>> {
        Err(PrepError::BackendError(
            "no host application automation available".to_string(),
        ))
    }
}
