//! Recipient list parsing.
//!
//! Recipients are configured as `#`-delimited lists of Telegram chat IDs,
//! e.g. `"123456#-1001234567890"`. Two lists feed every dispatch: the global
//! list from the settings and the per-job receivers. Both are merged into a
//! single [`RecipientSet`] so each chat gets exactly one message.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Delimiter between chat IDs in a recipient list.
pub const RECIPIENT_DELIMITER: char = '#';

/// Which configured list a recipient came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientSource {
    /// The global notify-user list from the settings.
    GlobalNotifyUsers,
    /// The per-job receivers list.
    Receivers,
}

impl fmt::Display for RecipientSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientSource::GlobalNotifyUsers => f.write_str("global notify users"),
            RecipientSource::Receivers => f.write_str("receivers"),
        }
    }
}

/// A token in a recipient list is not a valid chat ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid recipient ID {token:?} in {list}")]
pub struct InvalidRecipientId {
    /// The list the token came from.
    pub list: RecipientSource,
    /// The offending token.
    pub token: String,
}

/// Split a raw recipient list into chat IDs.
///
/// Empty input yields no IDs. Tokens are trimmed and empty tokens are
/// skipped; any other token that is not an `i64` is an error.
pub fn parse_recipients(
    raw: &str,
    list: RecipientSource,
) -> Result<Vec<i64>, InvalidRecipientId> {
    raw.split(RECIPIENT_DELIMITER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<i64>().map_err(|_| InvalidRecipientId {
                list,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Deduplicated set of chat IDs to notify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet {
    ids: BTreeSet<i64>,
}

impl RecipientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the global and per-job lists into one set.
    ///
    /// Both lists are fully validated before anything is returned, so a bad
    /// token in either list means no recipients at all.
    pub fn from_lists(
        global_notify_users: &str,
        receivers: &str,
    ) -> Result<Self, InvalidRecipientId> {
        let mut set = Self::new();
        set.extend(parse_recipients(
            global_notify_users,
            RecipientSource::GlobalNotifyUsers,
        )?);
        set.extend(parse_recipients(receivers, RecipientSource::Receivers)?);
        Ok(set)
    }

    /// Add a chat ID. Returns false if it was already present.
    pub fn insert(&mut self, id: i64) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }
}

impl Extend<i64> for RecipientSet {
    fn extend<T: IntoIterator<Item = i64>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

impl IntoIterator for RecipientSet {
    type Item = i64;
    type IntoIter = std::collections::btree_set::IntoIter<i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(parse_recipients("", RecipientSource::Receivers)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let ids = parse_recipients("1#2#1", RecipientSource::GlobalNotifyUsers).unwrap();
        assert_eq!(ids, vec![1, 2, 1]);
    }

    #[test]
    fn test_parse_negative_group_ids() {
        let ids = parse_recipients("-1001234567890#42", RecipientSource::Receivers).unwrap();
        assert_eq!(ids, vec![-1001234567890, 42]);
    }

    #[test]
    fn test_parse_skips_blank_tokens() {
        let ids = parse_recipients(" 1 ##2#", RecipientSource::Receivers).unwrap();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_parse_invalid_token() {
        let err = parse_recipients("1#abc#3", RecipientSource::Receivers).unwrap_err();
        assert_eq!(err.list, RecipientSource::Receivers);
        assert_eq!(err.token, "abc");
        assert_eq!(err.to_string(), "Invalid recipient ID \"abc\" in receivers");
    }

    #[test]
    fn test_parse_out_of_range() {
        let err = parse_recipients("99999999999999999999", RecipientSource::GlobalNotifyUsers)
            .unwrap_err();
        assert_eq!(err.list, RecipientSource::GlobalNotifyUsers);
    }

    #[test]
    fn test_from_lists_dedups_across_sources() {
        let set = RecipientSet::from_lists("1#2#1", "3#2").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_from_lists_invalid_in_either() {
        let err = RecipientSet::from_lists("abc", "1").unwrap_err();
        assert_eq!(err.list, RecipientSource::GlobalNotifyUsers);

        let err = RecipientSet::from_lists("1", "2#x").unwrap_err();
        assert_eq!(err.list, RecipientSource::Receivers);
        assert_eq!(err.token, "x");
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut set = RecipientSet::new();
        assert!(set.insert(7));
        assert!(!set.insert(7));
        assert!(set.contains(7));
        assert_eq!(set.len(), 1);
    }
}
