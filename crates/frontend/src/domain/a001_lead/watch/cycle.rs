//! Pure half of the lead watcher: baseline persistence and the decision of
//! what one poll result means. The timer, fetch, and signal plumbing live in
//! the parent module; everything here runs under native `cargo test`.

use contracts::domain::a001_lead::LeadsPage;

use crate::shared::storage::KeyValueStore;

pub const LEAD_BASELINE_KEY: &str = "crm_last_lead_count";

/// Last lead count this browser acknowledged, if any.
pub fn read_baseline(store: &impl KeyValueStore) -> Option<u32> {
    store.get(LEAD_BASELINE_KEY)?.trim().parse().ok()
}

pub fn write_baseline(store: &impl KeyValueStore, total: u32) {
    store.set(LEAD_BASELINE_KEY, &total.to_string());
}

/// Everything one poll cycle asks the caller to do.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleEffects {
    /// Fresh total to expose and persist as the new baseline. `None` when
    /// the poll failed — a failure never moves the baseline.
    pub accepted_total: Option<u32>,
    /// How many leads arrived since the baseline; `None` when nothing new
    /// (including the very first observation, which only establishes the
    /// baseline).
    pub announce_delta: Option<u32>,
    /// Human-readable failure for the caller to render inline.
    pub error: Option<String>,
}

pub fn evaluate_cycle(baseline: Option<u32>, fetched: Result<&LeadsPage, &str>) -> CycleEffects {
    match fetched {
        Err(e) => CycleEffects {
            accepted_total: None,
            announce_delta: None,
            error: Some(e.to_string()),
        },
        Ok(page) => CycleEffects {
            accepted_total: Some(page.total),
            announce_delta: baseline
                .and_then(|base| (page.total > base).then(|| page.total - base)),
            error: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStore;
    use contracts::domain::a001_lead::LeadSummary;

    fn page(total: u32, ids: &[i64]) -> LeadsPage {
        LeadsPage {
            total,
            items: ids
                .iter()
                .map(|id| LeadSummary {
                    id: *id,
                    name: format!("Lead {id}"),
                    phone: None,
                    city: None,
                    created_at: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_growth_announces_the_delta_once() {
        let store = MemoryStore::default();
        write_baseline(&store, 10);

        let page = page(13, &[101, 99, 98]);
        let effects = evaluate_cycle(read_baseline(&store), Ok(&page));
        assert_eq!(effects.accepted_total, Some(13));
        assert_eq!(effects.announce_delta, Some(3));
        assert_eq!(effects.error, None);
        assert_eq!(page.newest().map(|l| l.id), Some(101));

        write_baseline(&store, 13);
        assert_eq!(read_baseline(&store), Some(13));

        // Re-running against the updated baseline reports nothing: the same
        // growth is never announced twice.
        let effects = evaluate_cycle(read_baseline(&store), Ok(&page));
        assert_eq!(effects.announce_delta, None);
    }

    #[test]
    fn test_unchanged_total_is_silent() {
        let store = MemoryStore::default();
        write_baseline(&store, 10);
        let effects = evaluate_cycle(read_baseline(&store), Ok(&page(10, &[55])));
        assert_eq!(effects.accepted_total, Some(10));
        assert_eq!(effects.announce_delta, None);
        assert_eq!(read_baseline(&store), Some(10));
    }

    #[test]
    fn test_shrunken_total_still_moves_the_baseline_quietly() {
        let effects = evaluate_cycle(Some(10), Ok(&page(8, &[])));
        assert_eq!(effects.accepted_total, Some(8));
        assert_eq!(effects.announce_delta, None);
    }

    #[test]
    fn test_first_observation_establishes_baseline_without_noise() {
        let store = MemoryStore::default();
        let effects = evaluate_cycle(read_baseline(&store), Ok(&page(42, &[7])));
        assert_eq!(effects.accepted_total, Some(42));
        assert_eq!(effects.announce_delta, None);
    }

    #[test]
    fn test_failed_poll_leaves_baseline_and_sets_error() {
        let store = MemoryStore::default();
        write_baseline(&store, 10);
        let effects = evaluate_cycle(read_baseline(&store), Err("Request failed: timeout"));
        assert_eq!(effects.accepted_total, None);
        assert_eq!(effects.announce_delta, None);
        assert_eq!(effects.error.as_deref(), Some("Request failed: timeout"));
        assert_eq!(read_baseline(&store), Some(10));
    }

    #[test]
    fn test_unparseable_baseline_reads_as_absent() {
        let store = MemoryStore::default();
        store.set(LEAD_BASELINE_KEY, "not-a-number");
        assert_eq!(read_baseline(&store), None);
    }
}
