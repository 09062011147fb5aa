use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub surface: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub muted: Color32,
    pub error: Color32,
    pub decoration: Color32,
    pub heading_size: f32,
    pub body_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x12, 0x16, 0x1F),
            surface: Color32::from_rgb(0x1E, 0x24, 0x31),
            foreground: Color32::from_rgb(0xC8, 0xCE, 0xD8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x3D, 0xB8, 0xB0),
            muted: Color32::from_rgb(0x7A, 0x84, 0x94),
            error: Color32::from_rgb(0xF0, 0x6E, 0x6E),
            decoration: Color32::from_rgb(0x2B, 0x6C, 0x8A),
            heading_size: 44.0,
            body_size: 17.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            surface: Color32::from_rgb(0xF3, 0xF6, 0xF9),
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x17, 0x8F, 0x88),
            muted: Color32::from_rgb(0x6B, 0x72, 0x80),
            error: Color32::from_rgb(0xC7, 0x3E, 0x1D),
            decoration: Color32::from_rgb(0xA6, 0xD8, 0xE6),
            heading_size: 44.0,
            body_size: 17.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "dark"
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
    }
}
