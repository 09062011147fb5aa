/// One hero slide on the landing section.
pub struct HeroSlide {
    pub kicker: &'static str,
    pub heading: &'static str,
    pub body: &'static str,
}

pub const HERO_SLIDES: [HeroSlide; 3] = [
    HeroSlide {
        kicker: "Early detection",
        heading: "Read an MRI in seconds",
        body: "Upload a brain MRI slice and get a classification from a trained \
               convolutional model before your next appointment.",
    },
    HeroSlide {
        kicker: "Four categories",
        heading: "Glioma, meningioma, pituitary",
        body: "The classifier separates the three most common tumor types from \
               healthy scans, and tells you when an image is not an MRI at all.",
    },
    HeroSlide {
        kicker: "Know more",
        heading: "Understand the result",
        body: "Click any result to read what that tumor type is, where it grows \
               and what usually comes next.",
    },
];

/// A decorative shape that drifts with the pointer.
pub struct Decoration {
    /// Anchor as a fraction of the hero area.
    pub anchor: [f32; 2],
    pub radius: f32,
    pub speed: f32,
}

pub const DECORATIONS: [Decoration; 5] = [
    Decoration {
        anchor: [0.08, 0.22],
        radius: 46.0,
        speed: 1.75,
    },
    Decoration {
        anchor: [0.86, 0.18],
        radius: 30.0,
        speed: 3.5,
    },
    Decoration {
        anchor: [0.78, 0.78],
        radius: 60.0,
        speed: 1.0,
    },
    Decoration {
        anchor: [0.18, 0.84],
        radius: 22.0,
        speed: 2.5,
    },
    Decoration {
        anchor: [0.52, 0.08],
        radius: 14.0,
        speed: 0.75,
    },
];

pub fn decoration_speeds() -> Vec<f32> {
    DECORATIONS.iter().map(|d| d.speed).collect()
}
