//! Command implementations for the spotkit CLI.

mod init;
mod mask;
mod preset;
mod spots;

pub use init::cmd_init;
pub use mask::{cmd_mask, MaskTarget};
pub use preset::{cmd_preset_apply, cmd_preset_list, cmd_preset_save};
pub use spots::{cmd_add, cmd_clear, cmd_list, cmd_remove, describe_spot, AddSpotArgs};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spotkit_core::config::SpotkitConfig;
use spotkit_core::verbose_println;
use spotkit_core::{ConfigCatalog, IniSettings, SpotList};

/// A settings file opened together with the spot list stored in it.
pub(crate) struct SpotFile {
    path: PathBuf,
    pub ini: IniSettings,
    pub list: SpotList,
    pub catalog: Arc<ConfigCatalog>,
}

impl SpotFile {
    /// Load the list named `prefix + "Spot"` (prefix defaults to the config's
    /// `ini_prefix`). A missing file opens as an empty list.
    pub fn open(path: &Path, prefix: Option<&str>, config: &SpotkitConfig) -> Result<Self, String> {
        let mut ini = IniSettings::load(path)?;
        let catalog = Arc::new(config.tuning_catalog());
        let prefix = prefix.unwrap_or(&config.defaults.ini_prefix);

        let mut list = SpotList::new(prefix);
        list.load_from_ini(&mut ini, &catalog);
        verbose_println!(
            "[spotkit] {} spot(s) in '{}' from {}",
            list.len(),
            list.name(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            ini,
            list,
            catalog,
        })
    }

    /// Write the list back into the settings and save the file.
    pub fn save(&mut self) -> Result<(), String> {
        self.list.write_to_ini(&mut self.ini);
        self.ini.save(&self.path)
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), String> {
        if index >= self.list.len() {
            return Err(format!(
                "Spot index {} out of range ({} spot(s) in '{}')",
                index,
                self.list.len(),
                self.list.name()
            ));
        }
        Ok(())
    }
}
