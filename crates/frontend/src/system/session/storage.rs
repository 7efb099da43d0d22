//! Cached agent profile, used only as an offline fallback when
//! `/api/auth/me` is unreachable at startup.

use contracts::system::session::AgentProfile;

use crate::shared::storage::KeyValueStore;

pub const CACHED_PROFILE_KEY: &str = "crm_cached_profile";

pub fn save_cached_profile(store: &impl KeyValueStore, profile: &AgentProfile) {
    if let Ok(json) = serde_json::to_string(profile) {
        store.set(CACHED_PROFILE_KEY, &json);
    }
}

pub fn load_cached_profile(store: &impl KeyValueStore) -> Option<AgentProfile> {
    let raw = store.get(CACHED_PROFILE_KEY)?;
    serde_json::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStore;

    #[test]
    fn test_profile_round_trip() {
        let store = MemoryStore::default();
        let profile = AgentProfile {
            id: 17,
            username: "rami".into(),
            full_name: Some("Rami Khoury".into()),
            is_manager: false,
        };
        save_cached_profile(&store, &profile);
        assert_eq!(load_cached_profile(&store), Some(profile));
    }

    #[test]
    fn test_corrupt_cache_reads_as_absent() {
        let store = MemoryStore::default();
        store.set(CACHED_PROFILE_KEY, "{not json");
        assert_eq!(load_cached_profile(&store), None);
    }
}
