use super::KvStore;
use crate::error::StoreError;
use serde_json::{Value, json};
use std::sync::Arc;

/// Store key for the cached remote feature flag.
const FEATURE_STATE_KEY: &str = "countState";
/// Store key for the destination URL saved after the first resolution.
const SAVED_DESTINATION_KEY: &str = "count";

/// Typed facade over the two launch-resolution keys.
///
/// Both are absent on a genuinely first run. The flag is rewritten after
/// every flag fetch; the destination is written exactly once and never
/// invalidated by the resolution chain (only an explicit reset clears it).
#[derive(Clone)]
pub struct LaunchStateStore {
    kv: Arc<dyn KvStore>,
}

impl LaunchStateStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn feature_enabled(&self) -> Option<bool> {
        self.kv.get(FEATURE_STATE_KEY).and_then(|v| v.as_bool())
    }

    pub fn set_feature_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.kv.set(FEATURE_STATE_KEY, Value::Bool(enabled))
    }

    pub fn saved_destination(&self) -> Option<String> {
        self.kv
            .get(SAVED_DESTINATION_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn set_saved_destination(&self, url: &str) -> Result<(), StoreError> {
        self.kv.set(SAVED_DESTINATION_KEY, json!(url))
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove(FEATURE_STATE_KEY)?;
        self.kv.remove(SAVED_DESTINATION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> LaunchStateStore {
        LaunchStateStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn first_run_has_no_state() {
        let state = store();
        assert_eq!(state.feature_enabled(), None);
        assert_eq!(state.saved_destination(), None);
    }

    #[test]
    fn flag_and_destination_round_trip() {
        let state = store();
        state.set_feature_enabled(true).expect("set flag");
        state
            .set_saved_destination("https://x.test/go/42?bundle=com.test.app")
            .expect("set url");

        assert_eq!(state.feature_enabled(), Some(true));
        assert_eq!(
            state.saved_destination().as_deref(),
            Some("https://x.test/go/42?bundle=com.test.app")
        );
    }

    #[test]
    fn non_boolean_flag_value_reads_as_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(FEATURE_STATE_KEY, json!("yes")).expect("set");
        let state = LaunchStateStore::new(kv);
        assert_eq!(state.feature_enabled(), None);
    }

    #[test]
    fn clear_removes_both_keys() {
        let state = store();
        state.set_feature_enabled(false).expect("set flag");
        state.set_saved_destination("https://x.test").expect("set url");
        state.clear().expect("clear");
        assert_eq!(state.feature_enabled(), None);
        assert_eq!(state.saved_destination(), None);
    }
}
