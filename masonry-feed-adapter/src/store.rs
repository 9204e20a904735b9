use masonry_feed::FeedSnapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{FeedError, Result, SessionStorage};

/// Configuration for [`StateStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// The well-known storage key holding the single live snapshot.
    pub key: String,
}

impl StoreOptions {
    pub const DEFAULT_KEY: &'static str = "feed:snapshot";

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: Self::DEFAULT_KEY.to_owned(),
        }
    }
}

/// Persists and restores [`FeedSnapshot`]s through a [`SessionStorage`].
///
/// There is at most one live snapshot per key: [`StateStore::persist`] overwrites it and
/// [`StateStore::take`] consumes it. Reads never fail; a missing, unreadable, corrupt or
/// foreign-route snapshot reads as `None`.
#[derive(Clone, Debug)]
pub struct StateStore<S> {
    storage: S,
    options: StoreOptions,
}

impl<S: SessionStorage> StateStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, StoreOptions::default())
    }

    pub fn with_options(storage: S, options: StoreOptions) -> Self {
        Self { storage, options }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Serializes `snapshot` under the store key, replacing any previous snapshot.
    ///
    /// A non-finite `scroll_y` is rejected: JSON has no encoding for it, so the snapshot could
    /// never be read back.
    pub fn persist<P: Serialize>(&mut self, snapshot: &FeedSnapshot<P>) -> Result<()> {
        if !snapshot.scroll_y.is_finite() {
            return Err(FeedError::Persistence(format!(
                "scroll offset {} cannot be stored",
                snapshot.scroll_y
            )));
        }
        let json = serde_json::to_string(snapshot)
            .map_err(|err| FeedError::Persistence(err.to_string()))?;
        self.storage.set_item(&self.options.key, &json)?;
        fdebug!(
            route = %snapshot.route,
            items = snapshot.items.len(),
            bytes = json.len(),
            "StateStore: snapshot persisted"
        );
        Ok(())
    }

    /// Takes the snapshot for `route`, deleting it from storage.
    ///
    /// A snapshot saved for a different route is left in place. A corrupt snapshot is removed.
    pub fn take<P: DeserializeOwned>(&mut self, route: &str) -> Option<FeedSnapshot<P>> {
        let key = self.options.key.as_str();
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(_err) => {
                fwarn!(error = %_err, "StateStore: storage unavailable, starting cold");
                return None;
            }
        };

        let snapshot: FeedSnapshot<P> = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(_err) => {
                fwarn!(error = %_err, "StateStore: corrupt snapshot discarded");
                let _ = self.storage.remove_item(key);
                return None;
            }
        };

        if snapshot.route != route {
            fdebug!(
                saved = %snapshot.route,
                route,
                "StateStore: snapshot belongs to another route"
            );
            return None;
        }

        if let Err(_err) = self.storage.remove_item(key) {
            fwarn!(error = %_err, "StateStore: failed to delete consumed snapshot");
        }
        fdebug!(
            route,
            items = snapshot.items.len(),
            "StateStore: snapshot restored"
        );
        Some(snapshot)
    }

    /// Deletes the live snapshot, if any.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove_item(&self.options.key)
    }
}
