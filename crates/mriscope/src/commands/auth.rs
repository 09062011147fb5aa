use std::time::Instant;

use colored::Colorize;

use crate::auth::{AssumeRegistered, AuthOverlay};
use crate::backend::{AuthForm, Backend, Credentials, HttpBackend};
use crate::commands::terminal::TerminalSurface;
use crate::config::Settings;

pub fn run(
    settings: &Settings,
    form: AuthForm,
    username: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let username = match username {
        Some(name) => name,
        None => inquire::Text::new("Username:").prompt()?,
    };
    let password = inquire::Password::new("Password:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()?;

    let backend = HttpBackend::new(&settings.base_url, settings.timeout);
    let mut surface = TerminalSurface::new(quiet);
    authenticate(
        &backend,
        settings,
        form,
        Credentials::new(username, password),
        &mut surface,
    )?;

    if form == AuthForm::Signup && !quiet {
        println!(
            "{} Run {} to sign in.",
            "Account created.".green(),
            "mriscope login".bold()
        );
    }
    Ok(())
}

fn authenticate(
    backend: &dyn Backend,
    settings: &Settings,
    form: AuthForm,
    credentials: Credentials,
    surface: &mut TerminalSurface,
) -> anyhow::Result<()> {
    let mut overlay = AuthOverlay::new(
        Box::new(AssumeRegistered(form == AuthForm::Login)),
        settings.welcome_duration,
    );
    overlay.open_overlay(surface);

    let Some(credentials) = overlay.submit(credentials, surface) else {
        anyhow::bail!("Username and password are required");
    };
    let reply = backend.authenticate(form, &credentials);
    let accepted = matches!(&reply, Ok(r) if r.ok);
    overlay.on_reply(form, &credentials.username, reply, Instant::now(), surface);

    if !accepted {
        anyhow::bail!("{} was not accepted", form.endpoint().trim_start_matches('/'));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AuthReply;
    use crate::config::Config;
    use crate::surface::Region;
    use crate::worker::testing::ScriptedBackend;

    #[test]
    fn test_login_greets_user() {
        let backend = ScriptedBackend {
            auth: Some(AuthReply {
                ok: true,
                message: None,
                username: Some("bob".into()),
            }),
            ..Default::default()
        };
        let mut surface = TerminalSurface::new(true);
        authenticate(
            &backend,
            &Config::default().settings(),
            AuthForm::Login,
            Credentials::new("bob", "pw"),
            &mut surface,
        )
        .unwrap();
        assert_eq!(surface.text(Region::WelcomeBanner), Some("Welcome, bob!"));
        assert_eq!(backend.calls(), vec!["/login bob"]);
    }

    #[test]
    fn test_refused_signup_is_an_error() {
        let backend = ScriptedBackend {
            auth: Some(AuthReply {
                ok: false,
                message: Some("Username already exists".into()),
                username: None,
            }),
            ..Default::default()
        };
        let mut surface = TerminalSurface::new(true);
        let err = authenticate(
            &backend,
            &Config::default().settings(),
            AuthForm::Signup,
            Credentials::new("bob", "pw"),
            &mut surface,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "signup was not accepted");
    }

    #[test]
    fn test_empty_password_never_reaches_backend() {
        let backend = ScriptedBackend::default();
        let mut surface = TerminalSurface::new(true);
        let result = authenticate(
            &backend,
            &Config::default().settings(),
            AuthForm::Login,
            Credentials::new("bob", ""),
            &mut surface,
        );
        assert!(result.is_err());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_username_is_sent_as_typed() {
        let backend = ScriptedBackend {
            auth: Some(AuthReply {
                ok: true,
                message: None,
                username: None,
            }),
            ..Default::default()
        };
        let mut surface = TerminalSurface::new(true);
        authenticate(
            &backend,
            &Config::default().settings(),
            AuthForm::Login,
            Credentials::new(" bob", "pw"),
            &mut surface,
        )
        .unwrap();
        assert_eq!(backend.calls(), vec!["/login  bob"]);
        assert_eq!(surface.text(Region::WelcomeBanner), Some("Welcome,  bob!"));
    }
}
