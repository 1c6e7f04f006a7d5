//! Optional display-name lookup for screened structures.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Name lookup timed out")]
    Timeout,

    #[error("Name lookup request failed: {0}")]
    Request(String),

    #[error("Name lookup returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Maps a structure string to a human-readable compound name.
///
/// `Ok(None)` means the lookup succeeded but found nothing. Every failure is absorbed by
/// the screening workflow, which then falls back to the structure string itself.
pub trait NameResolver {
    fn lookup(&self, structure: &str) -> Result<Option<String>, ResolverError>;
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> Result<Option<String>, ResolverError>,
{
    fn lookup(&self, structure: &str) -> Result<Option<String>, ResolverError> {
        self(structure)
    }
}

/// Outcome of resolving one structure, with the fallback already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedName {
    pub name: String,
    pub failed: bool,
}

pub(crate) fn resolve_or_fallback(
    resolver: Option<&dyn NameResolver>,
    structure: &str,
) -> ResolvedName {
    let fallback = || structure.to_string();
    match resolver.map(|r| r.lookup(structure)) {
        None => ResolvedName {
            name: fallback(),
            failed: false,
        },
        Some(Ok(name)) => ResolvedName {
            name: name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(fallback),
            failed: false,
        },
        Some(Err(e)) => {
            tracing::debug!(structure, error = %e, "Name lookup failed; using structure string.");
            ResolvedName {
                name: fallback(),
                failed: true,
            }
        }
    }
}
