use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::Utc;

/// Identifier shared by every event in the store.
///
/// Ids are compared in canonical form: a purely numeric id loses its leading
/// zeros, so `"007"` and `7` name the same event.
#[derive(Debug, Clone, Eq)]
pub struct EventId(String);

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn canonical(&self) -> &str {
        let s = self.0.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let trimmed = s.trim_start_matches('0');
            if trimmed.is_empty() {
                "0"
            } else {
                trimmed
            }
        } else {
            s
        }
    }
}

impl PartialEq for EventId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Hash for EventId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<u64> for EventId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Issues strictly increasing millisecond-timestamp tokens.
///
/// Two ids requested within the same millisecond still differ: the second
/// one is bumped past the first.
#[derive(Debug, Default)]
pub struct IdIssuer {
    last: u64,
}

impl IdIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> EventId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.issue_at(now)
    }

    fn issue_at(&mut self, now_ms: u64) -> EventId {
        let next = now_ms.max(self.last + 1);
        self.last = next;
        EventId::from(next)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn numeric_ids_compare_canonically() {
        assert_eq!(EventId::from("007"), EventId::from(7));
        assert_eq!(EventId::from(" 42 "), EventId::from(42));
        assert_eq!(EventId::from("000"), EventId::from(0));
        assert_ne!(EventId::from("7a"), EventId::from(7));
    }

    #[test]
    fn canonical_form_drives_hashing() {
        let mut set = HashSet::new();
        set.insert(EventId::from("0012"));
        assert!(set.contains(&EventId::from(12)));
    }

    #[test]
    fn issuer_is_strictly_increasing_within_one_millisecond() {
        let mut issuer = IdIssuer::new();
        let a = issuer.issue_at(1_000);
        let b = issuer.issue_at(1_000);
        let c = issuer.issue_at(999);
        assert_eq!(a.as_str(), "1000");
        assert_eq!(b.as_str(), "1001");
        assert_eq!(c.as_str(), "1002");
    }

    #[test]
    fn issuer_follows_the_clock_when_it_moves_ahead() {
        let mut issuer = IdIssuer::new();
        issuer.issue_at(10);
        assert_eq!(issuer.issue_at(500).as_str(), "500");
    }

    #[test]
    fn live_ids_are_unique() {
        let mut issuer = IdIssuer::new();
        let ids: HashSet<_> = (0..100).map(|_| issuer.issue()).collect();
        assert_eq!(ids.len(), 100);
    }
}
