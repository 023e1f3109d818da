//! Privilege probing for namespace entry.

use nix::unistd::Uid;

use crate::error::LaunchError;

/// Capability token proving the process may join network namespaces.
///
/// Joining another network namespace needs `CAP_SYS_ADMIN`, which in practice
/// means an effective uid of 0. Holding a value of this type is the executor's
/// precondition: the check runs once, up front, and its failure is a
/// [`LaunchError`], never mistaken for a resolution failure.
///
/// The token is deliberately not `Clone` into long-lived state; acquire it
/// per invocation.
#[derive(Debug)]
pub struct ElevatedPrivileges {
    _private: (),
}

impl ElevatedPrivileges {
    /// Probes the effective uid and returns the token if the process is root.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::PrivilegeRequired`] with the offending euid.
    pub fn acquire() -> Result<Self, LaunchError> {
        let euid = Uid::effective();
        if !euid.is_root() {
            return Err(LaunchError::PrivilegeRequired {
                euid: euid.as_raw(),
            });
        }
        Ok(Self { _private: () })
    }

    /// Unchecked token for exercising error paths in tests.
    #[cfg(test)]
    pub(crate) fn for_testing() -> Self {
        Self { _private: () }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_matches_effective_uid() {
        let result = ElevatedPrivileges::acquire();
        if Uid::effective().is_root() {
            assert!(result.is_ok());
        } else {
            assert!(matches!(
                result,
                Err(LaunchError::PrivilegeRequired { euid }) if euid != 0
            ));
        }
    }
}
