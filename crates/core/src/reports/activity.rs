//! Recent-activity feed.

use crate::reports::types::ActivityItem;

/// Merges per-table feeds into one list, newest first, capped at `limit`.
///
/// Each input only needs its own newest `limit` rows; ties on the timestamp
/// are broken by id so the order is stable.
#[must_use]
pub fn merge_recent<I>(feeds: I, limit: usize) -> Vec<ActivityItem>
where
    I: IntoIterator<Item = Vec<ActivityItem>>,
{
    let mut merged: Vec<ActivityItem> = feeds.into_iter().flatten().collect();
    merged.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::types::ActivityKind;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn entry(kind: ActivityKind, minutes: i64) -> ActivityItem {
        let base = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        ActivityItem {
            kind,
            id: Uuid::new_v4(),
            description: format!("{kind:?} at +{minutes}m"),
            amount: None,
            occurred_at: base + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_merge_orders_newest_first_and_truncates() {
        let sales = vec![entry(ActivityKind::Sale, 50), entry(ActivityKind::Sale, 10)];
        let eggs = vec![entry(ActivityKind::EggCollection, 40)];
        let health = vec![
            entry(ActivityKind::HealthEvent, 60),
            entry(ActivityKind::HealthEvent, 5),
        ];

        let merged = merge_recent([sales, eggs, health], 3);

        let kinds: Vec<_> = merged.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::HealthEvent,
                ActivityKind::Sale,
                ActivityKind::EggCollection
            ]
        );
    }

    #[test]
    fn test_merge_with_short_feeds() {
        let merged = merge_recent([Vec::new(), vec![entry(ActivityKind::Sale, 1)]], 20);
        assert_eq!(merged.len(), 1);
    }
}
