use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Proof that the caller passed the access gate. Handed to the UI boundary
/// instead of living in process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSession {
    authenticated: bool,
}

impl AuthSession {
    /// A session for ledgers without a configured password.
    pub fn open() -> Self {
        Self {
            authenticated: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
        }
    }

    /// Establishes a session when `attempt` matches `expected`. With no
    /// expected password the gate is open.
    pub fn login(expected: Option<&str>, attempt: &str) -> Result<Self, AuthError> {
        match expected {
            None => Ok(Self::open()),
            Some(expected) if constant_time_eq(expected.as_bytes(), attempt.as_bytes()) => {
                Ok(Self::open())
            }
            Some(_) => Err(AuthError::IncorrectPassword),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn require(&self) -> Result<(), AuthError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
