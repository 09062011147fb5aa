use crate::surface::{Class, Region, Surface};

/// Collapsible navigation drawer used on narrow windows.
#[derive(Debug, Default)]
pub struct NavDrawer {
    open: bool,
}

impl NavDrawer {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self, surface: &mut dyn Surface) {
        self.open = !self.open;
        surface.set_class(Region::Navbar, Class::Active, self.open);
        surface.set_class(Region::NavOverlay, Class::Active, self.open);
        surface.set_class(Region::Page, Class::NavActive, self.open);
    }
}
