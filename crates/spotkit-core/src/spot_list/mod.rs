//! Ordered, owning collection of spots with settings persistence.
//!
//! The list is the only owner of its spots. Removal drops the spot; the
//! `take_*` family hands ownership back to the caller instead.

use std::sync::Arc;

use crate::models::{ConfigCatalog, PipeSize};
use crate::settings::IniSettings;
use crate::spot::{spot_from_ini, Spot};
use crate::verbose_println;


/// Suffix appended to the filter's ini prefix to name the list.
pub const LIST_NAME_SUFFIX: &str = "Spot";

#[derive(Debug, Default)]
pub struct SpotList {
    name: String,
    pipe_size: PipeSize,
    spots: Vec<Box<dyn Spot>>,
}

impl SpotList {
    /// Create an empty list named `ini_prefix + "Spot"`.
    pub fn new(ini_prefix: &str) -> Self {
        Self {
            name: format!("{}{}", ini_prefix, LIST_NAME_SUFFIX),
            pipe_size: PipeSize::FULL,
            spots: Vec::new(),
        }
    }

    /// Group and array name used for persistence.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipe_size(&self) -> PipeSize {
        self.pipe_size
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&(dyn Spot + 'static)> {
        self.spots.get(index).map(|spot| spot.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Spot + 'static)> {
        self.spots.get_mut(index).map(|spot| spot.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Spot + 'static)> + '_ {
        self.spots.iter().map(|spot| spot.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Spot + 'static)> + '_ {
        self.spots.iter_mut().map(|spot| spot.as_mut())
    }

    /// Spots that take part in rendering.
    pub fn enabled(&self) -> impl Iterator<Item = &(dyn Spot + 'static)> + '_ {
        self.iter().filter(|spot| spot.base().is_enabled())
    }

    /// Append a spot. It is switched to the list's pipe size.
    pub fn push(&mut self, mut spot: Box<dyn Spot>) {
        spot.set_pipe_size(self.pipe_size);
        self.spots.push(spot);
    }

    /// Insert at `index`, or append when `index` is past the end.
    pub fn insert(&mut self, index: usize, mut spot: Box<dyn Spot>) {
        spot.set_pipe_size(self.pipe_size);
        let index = index.min(self.spots.len());
        self.spots.insert(index, spot);
    }

    /// Replace the spot at `index`, dropping the previous one. An
    /// out-of-range index hands the new spot back.
    pub fn replace(&mut self, index: usize, mut spot: Box<dyn Spot>) -> Result<(), Box<dyn Spot>> {
        match self.spots.get_mut(index) {
            Some(slot) => {
                spot.set_pipe_size(self.pipe_size);
                *slot = spot;
                Ok(())
            }
            None => Err(spot),
        }
    }

    /// Drop the spot at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) {
        drop(self.take_at(index));
    }

    pub fn remove_first(&mut self) {
        drop(self.take_first());
    }

    pub fn remove_last(&mut self) {
        drop(self.take_last());
    }

    /// Drop every spot.
    pub fn clear(&mut self) {
        self.spots.clear();
    }

    /// Remove the spot at `index` and return ownership to the caller.
    pub fn take_at(&mut self, index: usize) -> Option<Box<dyn Spot>> {
        (index < self.spots.len()).then(|| self.spots.remove(index))
    }

    pub fn take_first(&mut self) -> Option<Box<dyn Spot>> {
        self.take_at(0)
    }

    pub fn take_last(&mut self) -> Option<Box<dyn Spot>> {
        self.spots.pop()
    }

    /// Switch every spot (and future additions) to `pipe_size`.
    pub fn set_pipe_size(&mut self, pipe_size: PipeSize) {
        self.pipe_size = pipe_size;
        for spot in &mut self.spots {
            spot.set_pipe_size(pipe_size);
        }
    }

    /// Persist the list under its name.
    ///
    /// The whole group is cleared first so that entries from a previously
    /// longer list do not survive. Each entry records its kind, then the
    /// spot writes its own keys.
    pub fn write_to_ini(&self, ini: &mut IniSettings) {
        ini.begin_group(&self.name);
        ini.remove("");
        ini.end_group();

        ini.begin_write_array(&self.name);
        for (index, spot) in self.spots.iter().enumerate() {
            ini.set_array_index(index);
            ini.set_value(crate::spot::KEY_KIND, spot.kind().as_str());
            spot.write_to_ini(ini);
        }
        ini.end_array();

        verbose_println!("[spots] wrote {} spot(s) to '{}'", self.spots.len(), self.name);
    }

    /// Replace the content with the spots stored under the list's name.
    /// `factory` builds one spot from the currently selected entry.
    pub fn read_from_ini<F>(&mut self, ini: &mut IniSettings, mut factory: F)
    where
        F: FnMut(&IniSettings) -> Box<dyn Spot>,
    {
        self.spots.clear();

        let count = ini.begin_read_array(&self.name);
        for index in 0..count {
            ini.set_array_index(index);
            let spot = factory(ini);
            self.push(spot);
        }
        ini.end_array();

        verbose_println!("[spots] read {} spot(s) from '{}'", count, self.name);
    }

    /// `read_from_ini` with spots rebuilt by their persisted kind.
    pub fn load_from_ini(&mut self, ini: &mut IniSettings, catalog: &Arc<ConfigCatalog>) {
        self.read_from_ini(ini, |entry| spot_from_ini(entry, catalog));
    }
}
