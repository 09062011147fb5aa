use tracing::{error, info, warn};

use crate::backend::UploadReply;
use crate::error::Result;
use crate::preview::{Preview, SelectedFile};
use crate::surface::{Display, Region, Surface};

pub const NO_FILE_MESSAGE: &str = "Please select a file first.";
pub const UPLOAD_FAILED_MESSAGE: &str = "An error occurred";

/// What the classifier said about an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Label(String),
    Rejected(String),
}

impl Classification {
    /// `None` when the reply carries neither field.
    pub fn from_reply(reply: UploadReply) -> Option<Self> {
        match reply {
            UploadReply {
                error: Some(message),
                ..
            } if !message.is_empty() => Some(Self::Rejected(message)),
            UploadReply {
                result: Some(label),
                ..
            } => Some(Self::Label(label.to_uppercase())),
            _ => None,
        }
    }
}

/// Holds the picked file until it is submitted.
#[derive(Debug, Default)]
pub struct UploadFlow {
    selected: Option<SelectedFile>,
}

impl UploadFlow {
    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Record a freshly read file and show it in the upload label. Files
    /// that fail to decode are still uploadable; the label shows their name.
    pub fn select_file(
        &mut self,
        file: SelectedFile,
        preview: Option<&Preview>,
        surface: &mut dyn Surface,
    ) {
        match preview {
            Some(preview) => surface.set_image(Region::UploadLabel, preview),
            None => {
                warn!(file = %file.name, "no preview available");
                surface.set_text(Region::UploadLabel, &file.name);
            }
        }
        self.selected = Some(file);
    }

    /// Copy of the selected file for upload, or the missing-file alert when
    /// there is none. The selection stays until another file is picked.
    pub fn submit(&self, surface: &mut dyn Surface) -> Option<SelectedFile> {
        let file = self.selected.clone();
        if file.is_none() {
            surface.alert(NO_FILE_MESSAGE);
        }
        file
    }

    pub fn on_reply(&self, reply: Result<UploadReply>, surface: &mut dyn Surface) {
        let classification = match reply {
            Ok(reply) => Classification::from_reply(reply),
            Err(e) => {
                error!("upload failed: {e}");
                None
            }
        };

        match classification {
            Some(Classification::Label(label)) => {
                info!(%label, "image classified");
                surface.set_link(Region::ResultText, &label);
                surface.set_display(Region::ResultPanel, Display::Flex);
            }
            Some(Classification::Rejected(message)) => {
                info!(%message, "upload rejected");
                surface.set_text(Region::ResultText, &message);
                surface.set_display(Region::ResultPanel, Display::Block);
            }
            None => {
                surface.set_text(Region::ResultText, UPLOAD_FAILED_MESSAGE);
                surface.set_display(Region::ResultPanel, Display::Block);
            }
        }
    }
}
