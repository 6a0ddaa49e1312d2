//! OAuth credential set for the marketing platform API

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access token, refresh token and absolute expiry, always replaced together.
///
/// `expires_at` is derived from the issue time plus the lifetime the provider
/// declared. A set whose `expires_at <= now` must not be used.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CredentialSet {
    /// Build a credential set issued at `issued_at` with a lifetime of
    /// `expires_in` seconds.
    ///
    /// Returns `None` when the lifetime does not yield a representable
    /// timestamp.
    #[must_use]
    pub fn issued(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))?;
        Some(Self { access_token, refresh_token, expires_at })
    }

    /// `true` once the wall clock has reached `expires_at`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// Tokens never reach logs.
impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn expiry_is_issue_time_plus_lifetime() {
        let set = CredentialSet::issued("a".into(), "r".into(), 86_400, issued_at()).unwrap();
        assert_eq!(set.expires_at, Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap());
    }

    #[test]
    fn expired_exactly_at_boundary() {
        let set = CredentialSet::issued("a".into(), "r".into(), 60, issued_at()).unwrap();

        assert!(!set.is_expired_at(issued_at() + Duration::seconds(59)));
        assert!(set.is_expired_at(issued_at() + Duration::seconds(60)));
    }

    #[test]
    fn out_of_range_lifetime_is_rejected() {
        assert!(CredentialSet::issued("a".into(), "r".into(), i64::MAX, issued_at()).is_none());
        assert!(CredentialSet::issued("a".into(), "r".into(), i64::MIN, issued_at()).is_none());
        // Fits a TimeDelta but overflows the calendar.
        let far = 10_000_000_000_000_i64;
        assert!(CredentialSet::issued("a".into(), "r".into(), far, issued_at()).is_none());
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let set =
            CredentialSet::issued("secret-access".into(), "secret-refresh".into(), 60, issued_at())
                .unwrap();
        let rendered = format!("{set:?}");

        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
        assert!(rendered.contains("expires_at"));
    }
}
