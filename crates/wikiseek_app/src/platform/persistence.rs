use wikiseek_engine::{LocalStore, PreferenceStore, ProfileStore, StorageTier};
use wikiseek_logging::seek_info;

use super::config::AppConfig;

/// Profile file first, then the local file beside the working directory.
pub(crate) fn open_store(config: &AppConfig) -> PreferenceStore {
    let primary = config.profile_store_path().map(|path| {
        seek_info!("Profile preferences at {:?}", path);
        Box::new(ProfileStore::new(path)) as Box<dyn StorageTier>
    });
    let local: Box<dyn StorageTier> = Box::new(LocalStore::new(config.local_store_path()));
    PreferenceStore::new(primary, Some(local))
}
