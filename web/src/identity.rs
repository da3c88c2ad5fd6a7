use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{LocalPersist, StorageKey, js_random_seed};

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap()
}

/// Opaque per-browser player identity, attached to every service request.
///
/// Owned here; read-only everywhere else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Identity(String);

impl StorageKey for Identity {
    const KEY: &'static str = "sapper:player";
}

impl Identity {
    /// Returns the persisted identity, or mints and persists a fresh one.
    ///
    /// A failing storage write is logged and tolerated; the player then gets
    /// a new identity on the next load instead of a crash.
    pub(crate) fn get_or_create() -> Self {
        if let Some(identity) = Self::local_load() {
            return identity;
        }
        let identity = Self::mint();
        identity.local_save();
        log::debug!("minted player identity");
        identity
    }

    fn mint() -> Self {
        Self(compose(utc_now().timestamp_millis(), js_random_seed()))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Timestamp plus nonce, hex-packed. Unique enough to keep concurrent
/// anonymous players on one deployment apart.
fn compose(ts_millis: i64, nonce: u64) -> String {
    format!("anon-{:x}-{:016x}", ts_millis.max(0), nonce)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_is_deterministic() {
        assert_eq!(compose(0x10, 0x20), compose(0x10, 0x20));
        assert_eq!(compose(255, 1), "anon-ff-0000000000000001");
    }

    #[test]
    fn distinct_nonces_give_distinct_identities() {
        assert_ne!(compose(1_700_000_000_000, 1), compose(1_700_000_000_000, 2));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use gloo::storage::{LocalStorage, Storage};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn identity_is_stable_within_one_storage_context() {
        let first = Identity::get_or_create();
        let second = Identity::get_or_create();
        assert_eq!(first, second);
    }

    #[wasm_bindgen_test]
    fn cleared_storage_mints_a_fresh_identity() {
        let first = Identity::get_or_create();
        LocalStorage::delete(Identity::KEY);
        let second = Identity::get_or_create();
        assert_ne!(first, second);
    }
}
