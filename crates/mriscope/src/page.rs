//! Owns one controller per page concern and routes events and worker
//! results to them.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, error};

use crate::auth::{AssumeRegistered, AuthOverlay, ClickTarget};
use crate::backend::{AuthForm, Credentials};
use crate::config::Settings;
use crate::error::Result;
use crate::info::InfoFetch;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::navbar::NavDrawer;
use crate::parallax::ParallaxMapper;
use crate::scroll::ScrollObserver;
use crate::slider::{Direction, SlideController};
use crate::surface::{Class, Region, Surface};
use crate::upload::UploadFlow;

pub struct Page {
    pub slider: SlideController,
    pub scroll: ScrollObserver,
    pub parallax: ParallaxMapper,
    pub nav: NavDrawer,
    pub upload: UploadFlow,
    pub info: InfoFetch,
    pub auth: AuthOverlay,
    controls_hovered: bool,
    loaded: bool,
}

impl Page {
    pub fn new(settings: &Settings, slide_count: usize, speeds: Vec<f32>) -> Result<Self> {
        Ok(Self {
            slider: SlideController::new(slide_count, settings.slide_interval)?,
            scroll: ScrollObserver::default(),
            parallax: ParallaxMapper::new(settings.parallax, speeds),
            nav: NavDrawer::default(),
            upload: UploadFlow::default(),
            info: InfoFetch::default(),
            auth: AuthOverlay::new(
                Box::new(AssumeRegistered(settings.assume_registered)),
                settings.welcome_duration,
            ),
            controls_hovered: false,
            loaded: false,
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// First frame laid out: drop the preloader and start the slider.
    pub fn on_load(&mut self, now: Instant, surface: &mut dyn Surface) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        surface.set_class(Region::Preloader, Class::Loaded, true);
        surface.set_class(Region::Page, Class::Loaded, true);
        self.slider.render(surface);
        self.slider.resume(now);
    }

    pub fn tick(&mut self, now: Instant, surface: &mut dyn Surface) {
        self.slider.tick(now, surface);
        self.auth.tick(now, surface);
    }

    /// Earliest moment a timer wants to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.slider.next_due(), self.auth.welcome_until()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn click_slider(&mut self, direction: Direction, surface: &mut dyn Surface) {
        self.slider.advance(direction, surface);
    }

    /// Pointer is (or is no longer) over a slider control.
    pub fn hover_slider_controls(&mut self, hovered: bool, now: Instant) {
        if hovered == self.controls_hovered {
            return;
        }
        self.controls_hovered = hovered;
        if hovered {
            self.slider.pause();
        } else {
            self.slider.resume(now);
        }
    }

    pub fn pick_file(&self, path: PathBuf) -> WorkerCommand {
        WorkerCommand::LoadFile { path }
    }

    pub fn submit_upload(&mut self, surface: &mut dyn Surface) -> Option<WorkerCommand> {
        self.upload
            .submit(surface)
            .map(|file| WorkerCommand::Classify { file })
    }

    pub fn request_info(&mut self, label: &str) -> WorkerCommand {
        WorkerCommand::FetchInfo {
            label: self.info.request(label),
        }
    }

    pub fn submit_auth(
        &mut self,
        form: AuthForm,
        credentials: Credentials,
        surface: &mut dyn Surface,
    ) -> Option<WorkerCommand> {
        self.auth
            .submit(credentials, surface)
            .map(|credentials| WorkerCommand::Authenticate { form, credentials })
    }

    pub fn click_auth_overlay(&mut self, target: ClickTarget, surface: &mut dyn Surface) {
        self.auth.click_overlay(target, surface);
    }

    pub fn apply(&mut self, result: WorkerResult, now: Instant, surface: &mut dyn Surface) {
        match result {
            WorkerResult::FileLoaded { file, preview } => {
                debug!(file = %file.name, "file ready");
                self.upload.select_file(file, preview.as_ref(), surface);
            }
            WorkerResult::FileFailed { path, message } => {
                error!(path = %path.display(), "could not read file: {message}");
                surface.alert(&format!("Could not read {}: {message}", path.display()));
            }
            WorkerResult::Classified(reply) => self.upload.on_reply(reply, surface),
            WorkerResult::Info { label, reply } => self.info.on_reply(&label, reply, surface),
            WorkerResult::Authenticated {
                form,
                username,
                reply,
            } => self.auth.on_reply(form, &username, reply, now, surface),
        }
    }
}
