//! Cache Entry Module
//!
//! Defines a single cached record: the serialized value and its absolute deadline.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// Represents a single cache entry holding an opaque serialized value.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored representation (JSON text)
    pub serialized_value: String,
    /// Absolute expiration timestamp
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    ///
    /// A ttl too large to represent saturates to the maximum timestamp.
    pub fn new(serialized_value: String, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            serialized_value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`, so a
    /// zero ttl is expired immediately.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("\"value\"".to_string(), Duration::from_secs(60));

        assert_eq!(entry.serialized_value, "\"value\"");
        assert!(entry.expires_at > Utc::now());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new("1".to_string(), Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("1".to_string(), Duration::from_millis(50));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(100));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_deadline_is_ttl_from_now() {
        let before = Utc::now();
        let entry = CacheEntry::new("1".to_string(), Duration::from_secs(10));
        let after = Utc::now();

        assert!(entry.expires_at >= before + chrono::Duration::seconds(10));
        assert!(entry.expires_at <= after + chrono::Duration::seconds(10));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("1".to_string(), Duration::MAX);
        assert_eq!(entry.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("1".to_string(), Duration::from_secs(5));
        assert!(!entry.is_expired_at(entry.expires_at - chrono::Duration::milliseconds(1)));
        assert!(entry.is_expired_at(entry.expires_at), "Entry should be expired at boundary");
    }
}
