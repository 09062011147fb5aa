use std::collections::HashMap;
use std::io::{IsTerminal, Write};

use colored::Colorize;
use tracing::debug;

use crate::preview::Preview;
use crate::surface::{Class, Display, Offset, Region, Surface};

/// Prints page updates as they become visible.
///
/// Texts are held until their panel is shown, the same way the page only
/// reveals a result once its container is displayed.
pub struct TerminalSurface {
    quiet: bool,
    texts: HashMap<Region, String>,
    links: HashMap<Region, String>,
}

impl TerminalSurface {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            texts: HashMap::new(),
            links: HashMap::new(),
        }
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.texts.get(&region).map(String::as_str)
    }

    pub fn link(&self, region: Region) -> Option<&str> {
        self.links.get(&region).map(String::as_str)
    }

    fn reveal(&self, region: Region) {
        match region {
            Region::ResultPanel => {
                if let Some(label) = self.link(Region::ResultText) {
                    println!("{} {}", "Result:".bold(), label.green().bold());
                } else if let Some(message) = self.text(Region::ResultText) {
                    println!("{} {}", "Result:".bold(), message.red());
                }
            }
            Region::InfoPanel => {
                if let Some(info) = self.text(Region::InfoText) {
                    println!();
                    println!("{info}");
                }
            }
            Region::WelcomeBanner => {
                if let Some(greeting) = self.text(Region::WelcomeBanner) {
                    println!("{}", greeting.green().bold());
                }
            }
            _ => {}
        }
    }
}

impl Surface for TerminalSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.links.remove(&region);
        self.texts.insert(region, text.to_string());
        if region == Region::UploadLabel && !self.quiet {
            println!("{} {}", "Selected".dimmed(), text);
        }
    }

    fn set_link(&mut self, region: Region, label: &str) {
        self.texts.remove(&region);
        self.links.insert(region, label.to_string());
    }

    fn set_image(&mut self, region: Region, image: &Preview) {
        if region == Region::UploadLabel && !self.quiet {
            println!(
                "{}",
                format!("Selected image ({}x{} preview)", image.width, image.height).dimmed()
            );
        }
    }

    fn set_display(&mut self, region: Region, mode: Display) {
        debug!(?region, %mode, "display");
        if mode.is_visible() {
            self.reveal(region);
        }
    }

    fn set_class(&mut self, region: Region, class: Class, on: bool) {
        debug!(?region, ?class, on, "class");
    }

    fn set_offset(&mut self, _region: Region, _offset: Offset) {}

    fn alert(&mut self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn play_cue(&mut self, volume: f32) {
        let mut stdout = std::io::stdout();
        if volume > 0.0 && !self.quiet && stdout.is_terminal() {
            let _ = write!(stdout, "\x07");
            let _ = stdout.flush();
        }
    }
}
