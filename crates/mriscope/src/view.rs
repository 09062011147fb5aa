use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

use crate::preview::Preview;
use crate::surface::{Class, Display, Offset, Region, Surface};

/// A played audio cue, rendered as a short visual pulse.
#[derive(Debug, Clone, Copy)]
pub struct Cue {
    pub volume: f32,
    pub at: Instant,
}

/// Retained state of every page region, written by controllers through
/// [`Surface`] and read back by the renderer each frame.
#[derive(Debug, Default)]
pub struct PageView {
    pub texts: HashMap<Region, String>,
    pub links: HashMap<Region, String>,
    pub images: HashMap<Region, Preview>,
    /// Bumped on every image change so cached textures can be refreshed.
    pub image_generation: u64,
    pub displays: HashMap<Region, Display>,
    pub classes: HashSet<(Region, Class)>,
    pub offsets: HashMap<Region, Offset>,
    pub alerts: VecDeque<String>,
    pub cue: Option<Cue>,
}

impl PageView {
    pub fn display(&self, region: Region) -> Display {
        self.displays.get(&region).copied().unwrap_or_default()
    }

    pub fn has(&self, region: Region, class: Class) -> bool {
        self.classes.contains(&(region, class))
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.texts.get(&region).map(String::as_str)
    }

    pub fn link(&self, region: Region) -> Option<&str> {
        self.links.get(&region).map(String::as_str)
    }

    pub fn image(&self, region: Region) -> Option<&Preview> {
        self.images.get(&region)
    }

    pub fn offset(&self, region: Region) -> Offset {
        self.offsets.get(&region).copied().unwrap_or_default()
    }

    /// Oldest alert still waiting to be dismissed.
    pub fn pending_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }
}

impl Surface for PageView {
    fn set_text(&mut self, region: Region, text: &str) {
        self.links.remove(&region);
        if self.images.remove(&region).is_some() {
            self.image_generation += 1;
        }
        self.texts.insert(region, text.to_string());
    }

    fn set_link(&mut self, region: Region, label: &str) {
        self.texts.remove(&region);
        self.links.insert(region, label.to_string());
    }

    fn set_image(&mut self, region: Region, image: &Preview) {
        self.texts.remove(&region);
        self.images.insert(region, image.clone());
        self.image_generation += 1;
    }

    fn set_display(&mut self, region: Region, display: Display) {
        self.displays.insert(region, display);
    }

    fn set_class(&mut self, region: Region, class: Class, on: bool) {
        if on {
            self.classes.insert((region, class));
        } else {
            self.classes.remove(&(region, class));
        }
    }

    fn set_offset(&mut self, region: Region, offset: Offset) {
        self.offsets.insert(region, offset);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push_back(message.to_string());
    }

    fn play_cue(&mut self, volume: f32) {
        self.cue = Some(Cue {
            volume,
            at: Instant::now(),
        });
    }
}
