use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fixed local-storage key for a persisted value.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalPersist: StorageKey + Serialize + DeserializeOwned + Sized {
    fn local_load() -> Option<Self> {
        LocalStorage::get(Self::KEY).ok()
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(Self::KEY, self) {
            log::error!("could not save {} to local storage: {:?}", Self::KEY, err);
        }
    }
}

impl<T: StorageKey + Serialize + DeserializeOwned> LocalPersist for T {}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn format_for_counter(num: i32) -> String {
    match num {
        ..-99 => "-99".to_string(),
        // Some places do 0-1 for -1, I've also seen -01, which I'm leaning more to
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_pads_and_clamps() {
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(10), "010");
        assert_eq!(format_for_counter(-3), "-03");
        assert_eq!(format_for_counter(-250), "-99");
        assert_eq!(format_for_counter(1234), "999");
    }
}
