//! The capability set controllers use to change what the user sees.
//!
//! Controllers decide *what* happens and in which order; a [`Surface`]
//! decides how it looks. The desktop page and the terminal commands each
//! provide their own implementation.

use std::fmt;

use crate::preview::Preview;

/// A named region of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Preloader,
    Page,
    Header,
    BackToTop,
    Navbar,
    NavOverlay,
    Slide(usize),
    Decoration(usize),
    UploadLabel,
    ResultText,
    ResultPanel,
    InfoText,
    InfoPanel,
    LoginForm,
    SignupForm,
    AuthOverlay,
    WelcomeBanner,
}

/// Layout mode of a region that can be shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    None,
    Block,
    Flex,
}

impl Display {
    pub fn is_visible(self) -> bool {
        self != Display::None
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Display::None => "none",
            Display::Block => "block",
            Display::Flex => "flex",
        };
        f.write_str(name)
    }
}

/// Boolean state flags attached to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Active,
    Hide,
    Hidden,
    Blur,
    Loaded,
    NavActive,
}

/// A 2D translation applied to a decorative element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

pub trait Surface {
    fn set_text(&mut self, region: Region, text: &str);

    /// Render `label` as a clickable element that requests its description.
    fn set_link(&mut self, region: Region, label: &str);

    fn set_image(&mut self, region: Region, image: &Preview);

    fn set_display(&mut self, region: Region, display: Display);

    fn set_class(&mut self, region: Region, class: Class, on: bool);

    fn set_offset(&mut self, region: Region, offset: Offset);

    /// Blocking notice the user has to dismiss.
    fn alert(&mut self, message: &str);

    fn play_cue(&mut self, volume: f32);
}
