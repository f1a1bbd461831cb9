//! Field-level validation.
//!
//! Pure functions, no I/O. Each check either passes or yields its
//! human-readable message; operations run every check that applies and
//! accumulate the failures through [`Validator`] — the client gets the
//! whole list in one reply, never one problem at a time. The message
//! strings are API surface: clients match on them.

use tallyboard_protocol::FieldMessage;

use crate::ResolverError;

/// Passes iff non-empty and every character is ASCII alphanumeric or a
/// space (the `^[A-Za-z0-9 ]+$` rule).
pub fn validate_name(name: &str) -> Result<(), FieldMessage> {
    let ok = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ');
    if ok {
        Ok(())
    } else {
        Err(FieldMessage::new("Invalid Name."))
    }
}

/// Passes iff the score is non-negative.
pub fn validate_score(score: i64) -> Result<(), FieldMessage> {
    if score >= 0 {
        Ok(())
    } else {
        Err(FieldMessage::new("Invalid score."))
    }
}

/// Passes iff the string is a plausible email address: exactly one `@`,
/// a non-empty local part, a dotted domain, and no whitespace. A
/// syntactic gate, not deliverability proof.
pub fn validate_email(email: &str) -> Result<(), FieldMessage> {
    let err = || FieldMessage::new("Invalid email.");

    if email.chars().any(char::is_whitespace) {
        return Err(err());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(err());
    };
    let ok = !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if ok {
        Ok(())
    } else {
        Err(err())
    }
}

/// Passes iff the password has at least 5 characters.
pub fn validate_password(password: &str) -> Result<(), FieldMessage> {
    if password.chars().count() >= 5 {
        Ok(())
    } else {
        Err(FieldMessage::new("Password too short."))
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Accumulates check results for one operation.
///
/// ```ignore
/// let mut v = Validator::default();
/// v.check(validate_name(&name));
/// v.check(validate_score(score));
/// v.finish()?; // Err carries BOTH messages if both failed
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldMessage>,
}

impl Validator {
    /// Records a failure; passes are ignored.
    pub fn check(&mut self, result: Result<(), FieldMessage>) {
        if let Err(message) = result {
            self.errors.push(message);
        }
    }

    /// Ok if every check passed, otherwise the aggregated
    /// `ValidationFailed` error, messages in check order.
    pub fn finish(self) -> Result<(), ResolverError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ResolverError::invalid_input(self.errors))
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
