use crate::surface::{Class, Region, Surface};

/// Offset at which the header collapses and the back-to-top control appears.
pub const HEADER_THRESHOLD: f32 = 50.0;

/// Remembers the previous scroll offset to tell which way the page moved.
#[derive(Debug, Default)]
pub struct ScrollObserver {
    last_offset: f32,
}

impl ScrollObserver {
    pub fn last_offset(&self) -> f32 {
        self.last_offset
    }

    pub fn on_scroll(&mut self, offset: f32, surface: &mut dyn Surface) {
        let offset = offset.max(0.0);
        if offset >= HEADER_THRESHOLD {
            surface.set_class(Region::Header, Class::Active, true);
            surface.set_class(Region::BackToTop, Class::Active, true);
            let toward_bottom = self.last_offset < offset;
            surface.set_class(Region::Header, Class::Hide, toward_bottom);
        } else {
            surface.set_class(Region::Header, Class::Active, false);
            surface.set_class(Region::BackToTop, Class::Active, false);
        }
        self.last_offset = offset;
    }
}
