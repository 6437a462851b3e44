//! Persistence bridge between scenarios.
//!
//! A [`JsonSlot`] is a single JSON file holding one value. Saving overwrites
//! the slot atomically (temp file + rename), so a reader never sees a half
//! written record. The slot is not locked: running two writers at once is
//! last-writer-wins.

use crate::fixture::PersistedUser;
use crate::result::{FlowError, FlowResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One JSON value stored at a fixed path
#[derive(Debug, Clone)]
pub struct JsonSlot<T> {
    path: PathBuf,
    _value: PhantomData<fn() -> T>,
}

/// Slot holding the most recently registered user
pub type UserBridge = JsonSlot<PersistedUser>;

/// Slot holding the scraped test-team names
pub type TeamListSlot = JsonSlot<Vec<String>>;

impl<T> JsonSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Slot backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _value: PhantomData,
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a value has been saved
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the slot
    pub fn save(&self, value: &T) -> FlowResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "slot saved");
        Ok(())
    }

    /// Read the slot
    pub fn load(&self) -> FlowResult<T> {
        let json = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FlowError::NoFixtureAvailable {
                path: self.path.display().to_string(),
            },
            _ => FlowError::Io(e),
        })?;
        serde_json::from_str(&json).map_err(|e| FlowError::Fixture {
            message: format!("corrupt slot {}: {e}", self.path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> PersistedUser {
        PersistedUser {
            username: "aarav4821".into(),
            password: "Password_1!".into(),
            first_name: "Aarav".into(),
            last_name: "Nair".into(),
            phone_number: "+919812345678".into(),
            country: "India".into(),
            city: "Thrissur".into(),
            address: "7 Temple Lane".into(),
            state: "Kerala".into(),
            postal_code: "680004".into(),
        }
    }

    mod user_bridge_tests {
        use super::*;
        use crate::result::FailureCategory;

        #[test]
        fn test_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let bridge = UserBridge::new(dir.path().join("test-data").join("latestUser.json"));
            assert!(!bridge.exists());
            bridge.save(&user()).unwrap();
            assert!(bridge.exists());
            assert_eq!(bridge.load().unwrap(), user());
        }

        #[test]
        fn test_load_without_save() {
            let dir = tempfile::tempdir().unwrap();
            let bridge = UserBridge::new(dir.path().join("latestUser.json"));
            let err = bridge.load().unwrap_err();
            assert!(matches!(err, FlowError::NoFixtureAvailable { .. }));
            assert_eq!(err.category(), FailureCategory::Setup);
        }

        #[test]
        fn test_save_overwrites() {
            let dir = tempfile::tempdir().unwrap();
            let bridge = UserBridge::new(dir.path().join("latestUser.json"));
            bridge.save(&user()).unwrap();
            let mut second = user();
            second.username = "diya77".into();
            bridge.save(&second).unwrap();
            assert_eq!(bridge.load().unwrap().username, "diya77");
            assert!(!dir.path().join("latestUser.json.tmp").exists());
        }

        #[test]
        fn test_camel_case_file() {
            let dir = tempfile::tempdir().unwrap();
            let bridge = UserBridge::new(dir.path().join("latestUser.json"));
            bridge.save(&user()).unwrap();
            let raw = fs::read_to_string(bridge.path()).unwrap();
            assert!(raw.contains("\"postalCode\""));
            assert!(raw.contains("\"firstName\""));
        }

        #[test]
        fn test_corrupt_slot_is_fixture_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("latestUser.json");
            fs::write(&path, "{ not json").unwrap();
            let err = UserBridge::new(path).load().unwrap_err();
            assert!(matches!(err, FlowError::Fixture { .. }));
        }
    }

    mod team_slot_tests {
        use super::*;

        #[test]
        fn test_team_list_is_json_array() {
            let dir = tempfile::tempdir().unwrap();
            let slot = TeamListSlot::new(dir.path().join("testTeams.json"));
            slot.save(&vec!["India".to_string(), "Australia".to_string()]).unwrap();
            let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(slot.path()).unwrap()).unwrap();
            assert!(raw.is_array());
            assert_eq!(slot.load().unwrap(), vec!["India", "Australia"]);
        }
    }
}
