use anyhow::anyhow;
use gloo::storage::{
  LocalStorage,
  Storage
};
use taskpad_shared::storage::KeyValueStore;

/// The browser's local storage seen as
/// a string key-value store.
#[derive(Debug, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    LocalStorage::raw()
      .get_item(key)
      .map_err(|error| {
        anyhow!(
          "failed reading {key} from \
           local storage: {error:?}"
        )
      })
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    LocalStorage::raw()
      .set_item(key, value)
      .map_err(|error| {
        anyhow!(
          "failed writing {key} to \
           local storage: {error:?}"
        )
      })
  }
}
