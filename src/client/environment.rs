//! Environment resolution from the client identifier.

use crate::models::{ClientId, Environment};
use crate::{Error, Result};

/// Separator between the environment tag and the key of a client identifier.
const TAG_SEPARATOR: char = '_';

/// Derives the [`Environment`] a client identifier belongs to.
///
/// Identifiers have the form `<environment-tag>_<key>`, for example
/// `test_4f0c2a` or `prod_77e1b9`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentResolver;

impl EnvironmentResolver {
    /// Resolve the environment of a client identifier.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidClientId`] if the identifier is not `<tag>_<key>`.
    /// - [`Error::UnknownEnvironment`] if the tag is not `test` or `prod`.
    pub fn resolve(client_id: &ClientId) -> Result<Environment> {
        Self::resolve_str(client_id.expose())
    }

    /// Resolve from a raw identifier string.
    pub fn resolve_str(client_id: &str) -> Result<Environment> {
        let (tag, key) = client_id.split_once(TAG_SEPARATOR).ok_or_else(|| {
            Error::InvalidClientId(format!(
                "client id has no environment tag (expected `<env>{}<key>`)",
                TAG_SEPARATOR
            ))
        })?;

        if tag.is_empty() || key.is_empty() {
            return Err(Error::InvalidClientId(
                "client id has an empty environment tag or key".to_string(),
            ));
        }

        tag.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_tags() {
        assert_eq!(
            EnvironmentResolver::resolve_str("test_4f0c2a").unwrap(),
            Environment::Test
        );
        assert_eq!(
            EnvironmentResolver::resolve_str("prod_77e1b9").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn test_key_may_contain_separator() {
        assert_eq!(
            EnvironmentResolver::resolve_str("prod_a_b_c").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn test_resolve_malformed() {
        for id in ["abcdef", "_abcdef", "test_", ""] {
            assert!(
                matches!(
                    EnvironmentResolver::resolve_str(id),
                    Err(Error::InvalidClientId(_))
                ),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_unknown_environment() {
        let err = EnvironmentResolver::resolve_str("staging_abc").unwrap_err();
        assert!(matches!(err, Error::UnknownEnvironment(tag) if tag == "staging"));
    }

    #[test]
    fn test_resolve_client_id() {
        let id = ClientId::new("test_abc").unwrap();
        assert_eq!(EnvironmentResolver::resolve(&id).unwrap(), Environment::Test);
    }
}
