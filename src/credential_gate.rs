//! Credential gate
//!
//! Decides whether a submitted (email, code) pair belongs to one of the
//! operators allowed to use the console. The identity set is fixed at
//! construction and never mutated.

use crate::error::OperatorError;
use log::debug;

/// A single authorized operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub code: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
        }
    }

    fn matches(&self, email: &str, code: &str) -> bool {
        self.code == code && self.email.to_lowercase() == email.to_lowercase()
    }
}

/// Identities shipped with the console
pub fn default_identities() -> Vec<Identity> {
    (1..=5)
        .map(|n| Identity::new(format!("admin{n}@nuerovent.com"), n.to_string().repeat(4)))
        .collect()
}

#[derive(Clone, Debug)]
pub struct CredentialGate {
    identities: Vec<Identity>,
}

impl CredentialGate {
    /// Create a gate over an ordered identity set
    ///
    /// Duplicate emails are not rejected; the first matching record wins.
    pub fn new(identities: Vec<Identity>) -> Self {
        Self { identities }
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Look up the identity for an already trimmed (email, code) pair
    ///
    /// Email comparison ignores case, code comparison is exact. Empty input
    /// never matches, even if an identity carries an empty field.
    pub fn authenticate(&self, email: &str, code: &str) -> Option<&Identity> {
        if email.is_empty() || code.is_empty() {
            return None;
        }

        self.identities.iter().find(|id| id.matches(email, code))
    }

    /// Trim raw operator input and authenticate it
    ///
    /// # Returns
    /// * `Ok(identity)` - on a match
    /// * `Err(OperatorError::MissingInput)` - if a field is blank
    /// * `Err(OperatorError::AuthenticationMismatch)` - if nothing matches
    pub fn login(&self, email: &str, code: &str) -> Result<&Identity, OperatorError> {
        let (email, code) = (email.trim(), code.trim());

        if email.is_empty() || code.is_empty() {
            return Err(OperatorError::MissingInput);
        }

        let identity = self
            .authenticate(email, code)
            .ok_or(OperatorError::AuthenticationMismatch)?;

        debug!("login() matched an identity");
        Ok(identity)
    }
}

impl Default for CredentialGate {
    fn default() -> Self {
        Self::new(default_identities())
    }
}
