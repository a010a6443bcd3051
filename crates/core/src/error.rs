// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleet_domain::DomainError;

/// Infrastructure failures reported by a store.
///
/// These are never business-rule failures. A coordinator that receives
/// one aborts its transaction and hands the error to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed (connection loss, lock timeout, I/O).
    Backend(String),
    /// A uniqueness or check constraint rejected a write.
    Conflict(String),
    /// A stored row could not be decoded into a domain value.
    Corrupt(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "Store backend error: {msg}"),
            Self::Conflict(msg) => write!(f, "Store constraint conflict: {msg}"),
            Self::Corrupt(msg) => write!(f, "Corrupt stored data: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors that can occur during a coordinator operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated. Nothing was written.
    DomainViolation(DomainError),
    /// The store failed. Nothing was written.
    Storage(StoreError),
}

impl CoreError {
    /// Returns the domain error, if this is a business-rule failure.
    #[must_use]
    pub const fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::DomainViolation(err) => Some(err),
            Self::Storage(_) => None,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Storage(err) => write!(f, "Storage failure: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err)
    }
}
