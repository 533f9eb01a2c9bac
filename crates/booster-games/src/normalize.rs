//! Turning raw app id strings into an active set.

use std::collections::HashSet;

use booster_presence::AppId;

/// The outcome of [`normalize_app_ids`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Accepted ids: unique, in first-occurrence order, at most `max_games`.
    pub app_ids: Vec<AppId>,
    /// Raw entries that failed to parse.
    pub rejected: Vec<String>,
    /// Number of unique ids before truncation, if truncation happened.
    pub truncated_from: Option<usize>,
}

/// Parses, deduplicates, and truncates raw app ids.
///
/// Each entry is parsed independently; a malformed entry is logged and
/// skipped without affecting the others. Duplicates keep their first
/// position. If more than `max_games` unique ids remain, only the first
/// `max_games` are kept.
pub fn normalize_app_ids<S: AsRef<str>>(raw: &[S], max_games: usize) -> Normalized {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut out = Normalized::default();

    for entry in raw {
        let entry = entry.as_ref();
        match entry.parse::<AppId>() {
            Ok(app_id) => {
                if seen.insert(app_id) {
                    out.app_ids.push(app_id);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping invalid app id");
                out.rejected.push(entry.to_string());
            }
        }
    }

    if out.app_ids.len() > max_games {
        tracing::info!(
            from = out.app_ids.len(),
            to = max_games,
            "truncating app id list"
        );
        out.truncated_from = Some(out.app_ids.len());
        out.app_ids.truncate(max_games);
    }

    out
}
