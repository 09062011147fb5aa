use tracing::{error, info};

use crate::backend::TumorInfo;
use crate::error::Result;
use crate::surface::{Display, Region, Surface};

pub const INFO_FAILED_MESSAGE: &str = "An error occurred while fetching tumor information";
pub const CUE_VOLUME: f32 = 0.3;

/// Description lookup for a classification label.
#[derive(Debug, Default)]
pub struct InfoFetch {
    pending: Option<String>,
}

impl InfoFetch {
    /// Label of the most recent request that has not been answered yet.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn request(&mut self, label: &str) -> String {
        let label = label.trim().to_string();
        self.pending = Some(label.clone());
        label
    }

    pub fn on_reply(&mut self, label: &str, reply: Result<TumorInfo>, surface: &mut dyn Surface) {
        if self.pending.as_deref() == Some(label) {
            self.pending = None;
        }
        match reply {
            Ok(TumorInfo { info: text }) => {
                info!(label, "tumor info received");
                surface.set_text(Region::InfoText, &text);
                surface.set_display(Region::InfoPanel, Display::Flex);
                surface.play_cue(CUE_VOLUME);
            }
            Err(e) => {
                error!(label, "tumor info failed: {e}");
                surface.set_text(Region::InfoText, INFO_FAILED_MESSAGE);
                surface.set_display(Region::InfoPanel, Display::Block);
            }
        }
    }
}
