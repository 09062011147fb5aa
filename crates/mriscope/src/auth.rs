//! Login/signup overlay.
//!
//! The overlay dims and blurs the page and shows exactly one of the two
//! forms. Submitting a form yields the request to send; the reply decides
//! whether the overlay flips to the login form (after signup) or closes and
//! greets the user (after login).

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::backend::{AuthForm, AuthReply, Credentials};
use crate::error::Result;
use crate::surface::{Class, Display, Region, Surface};

pub const WELCOME_DURATION: Duration = Duration::from_secs(10);
pub const AUTH_FAILED_MESSAGE: &str = "An error occurred";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please enter a username and password.";

/// Decides which form the overlay opens to.
pub trait RegistrationPolicy {
    fn is_registered(&self) -> bool;
}

/// Fixed answer, taken from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeRegistered(pub bool);

impl RegistrationPolicy for AssumeRegistered {
    fn is_registered(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Login,
    Signup,
}

/// Where a click on the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Background,
    Form,
}

pub struct AuthOverlay {
    policy: Box<dyn RegistrationPolicy>,
    open: bool,
    panel: Option<Panel>,
    welcome_duration: Duration,
    welcome_until: Option<Instant>,
}

impl AuthOverlay {
    pub fn new(policy: Box<dyn RegistrationPolicy>, welcome_duration: Duration) -> Self {
        Self {
            policy,
            open: false,
            panel: None,
            welcome_duration,
            welcome_until: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn panel(&self) -> Option<Panel> {
        self.panel
    }

    pub fn welcome_until(&self) -> Option<Instant> {
        self.welcome_until
    }

    pub fn open_overlay(&mut self, surface: &mut dyn Surface) {
        surface.set_class(Region::Page, Class::Blur, true);
        self.toggle_forms(self.policy.is_registered(), surface);
        surface.set_display(Region::AuthOverlay, Display::Block);
        self.open = true;
    }

    pub fn toggle_forms(&mut self, show_login: bool, surface: &mut dyn Surface) {
        surface.set_class(Region::LoginForm, Class::Hidden, !show_login);
        surface.set_class(Region::SignupForm, Class::Hidden, show_login);
        self.panel = Some(if show_login { Panel::Login } else { Panel::Signup });
    }

    pub fn close(&mut self, surface: &mut dyn Surface) {
        surface.set_class(Region::LoginForm, Class::Hidden, true);
        surface.set_class(Region::SignupForm, Class::Hidden, true);
        surface.set_display(Region::AuthOverlay, Display::None);
        surface.set_class(Region::Page, Class::Blur, false);
        self.open = false;
        self.panel = None;
    }

    pub fn click_overlay(&mut self, target: ClickTarget, surface: &mut dyn Surface) {
        if self.open && target == ClickTarget::Background {
            self.close(surface);
        }
    }

    /// Credentials to send, or `None` after alerting about empty fields.
    pub fn submit(
        &self,
        credentials: Credentials,
        surface: &mut dyn Surface,
    ) -> Option<Credentials> {
        if credentials.is_complete() {
            Some(credentials)
        } else {
            surface.alert(MISSING_CREDENTIALS_MESSAGE);
            None
        }
    }

    /// Apply the service's answer. `username` is what was submitted and
    /// stands in when a login reply omits it.
    pub fn on_reply(
        &mut self,
        form: AuthForm,
        username: &str,
        reply: Result<AuthReply>,
        now: Instant,
        surface: &mut dyn Surface,
    ) {
        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                error!(endpoint = form.endpoint(), "auth request failed: {e}");
                surface.alert(AUTH_FAILED_MESSAGE);
                return;
            }
        };

        if let Some(message) = &reply.message {
            surface.alert(message);
        }
        if !reply.ok {
            info!(endpoint = form.endpoint(), "credentials refused");
            return;
        }

        match form {
            AuthForm::Signup => {
                info!(username, "account created");
                self.toggle_forms(true, surface);
            }
            AuthForm::Login => {
                let name = reply.username.as_deref().unwrap_or(username);
                info!(username = name, "logged in");
                self.close(surface);
                surface.set_text(Region::WelcomeBanner, &format!("Welcome, {name}!"));
                surface.set_display(Region::WelcomeBanner, Display::Block);
                self.welcome_until = Some(now + self.welcome_duration);
            }
        }
    }

    /// Hide the welcome banner once its time is up.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn Surface) {
        if self.welcome_until.is_some_and(|until| now >= until) {
            surface.set_display(Region::WelcomeBanner, Display::None);
            self.welcome_until = None;
        }
    }
}
