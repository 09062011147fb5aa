use serde::{Deserialize, Serialize};

use crate::surface::{Offset, Region, Surface};

/// Half-range of the normalized pointer offset on each axis.
const RANGE: f32 = 5.0;

/// How per-element speed factors combine within one pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParallaxMode {
    /// Each element moves by `base * speed`.
    #[default]
    Independent,
    /// The running offset is multiplied by each speed in turn, so later
    /// elements inherit the factors of earlier ones.
    Compounding,
}

impl ParallaxMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Independent => "independent",
            Self::Compounding => "compounding",
        }
    }
}

#[derive(Debug)]
pub struct ParallaxMapper {
    mode: ParallaxMode,
    speeds: Vec<f32>,
}

impl ParallaxMapper {
    pub fn new(mode: ParallaxMode, speeds: Vec<f32>) -> Self {
        Self { mode, speeds }
    }

    /// Pointer position mapped to `-5..=5` per axis, sign inverted so
    /// decorations drift away from the cursor. `None` for an empty viewport.
    pub fn base_offset(pointer: [f32; 2], viewport: [f32; 2]) -> Option<Offset> {
        let [width, height] = viewport;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let x = pointer[0] / width * RANGE * 2.0 - RANGE;
        let y = pointer[1] / height * RANGE * 2.0 - RANGE;
        Some(Offset { x: -x, y: -y })
    }

    pub fn offsets(&self, base: Offset) -> Vec<Offset> {
        match self.mode {
            ParallaxMode::Independent => self
                .speeds
                .iter()
                .map(|&speed| Offset {
                    x: base.x * speed,
                    y: base.y * speed,
                })
                .collect(),
            ParallaxMode::Compounding => {
                let mut running = base;
                self.speeds
                    .iter()
                    .map(|&speed| {
                        running.x *= speed;
                        running.y *= speed;
                        running
                    })
                    .collect()
            }
        }
    }

    pub fn on_pointer_move(&self, pointer: [f32; 2], viewport: [f32; 2], surface: &mut dyn Surface) {
        let Some(base) = Self::base_offset(pointer, viewport) else {
            return;
        };
        for (index, offset) in self.offsets(base).into_iter().enumerate() {
            surface.set_offset(Region::Decoration(index), offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PageView;

    fn close(a: Offset, x: f32, y: f32) -> bool {
        (a.x - x).abs() < 1e-4 && (a.y - y).abs() < 1e-4
    }

    #[test]
    fn test_center_is_still() {
        let base = ParallaxMapper::base_offset([500.0, 300.0], [1000.0, 600.0]).unwrap();
        assert!(close(base, 0.0, 0.0));
    }

    #[test]
    fn test_corners_are_inverted() {
        let top_left = ParallaxMapper::base_offset([0.0, 0.0], [1000.0, 600.0]).unwrap();
        assert!(close(top_left, 5.0, 5.0));
        let bottom_right = ParallaxMapper::base_offset([1000.0, 600.0], [1000.0, 600.0]).unwrap();
        assert!(close(bottom_right, -5.0, -5.0));
    }

    #[test]
    fn test_empty_viewport_ignored() {
        assert!(ParallaxMapper::base_offset([1.0, 1.0], [0.0, 600.0]).is_none());
        let mut surface = PageView::default();
        ParallaxMapper::new(ParallaxMode::Independent, vec![1.0])
            .on_pointer_move([1.0, 1.0], [0.0, 0.0], &mut surface);
        assert!(surface.offsets.is_empty());
    }

    #[test]
    fn test_independent_scales_from_base() {
        let mapper = ParallaxMapper::new(ParallaxMode::Independent, vec![2.0, 3.0, 0.5]);
        let offsets = mapper.offsets(Offset { x: 1.0, y: -2.0 });
        assert!(close(offsets[0], 2.0, -4.0));
        assert!(close(offsets[1], 3.0, -6.0));
        assert!(close(offsets[2], 0.5, -1.0));
    }

    #[test]
    fn test_compounding_multiplies_running_offset() {
        let mapper = ParallaxMapper::new(ParallaxMode::Compounding, vec![2.0, 3.0, 0.5]);
        let offsets = mapper.offsets(Offset { x: 1.0, y: -2.0 });
        assert!(close(offsets[0], 2.0, -4.0));
        assert!(close(offsets[1], 6.0, -12.0));
        assert!(close(offsets[2], 3.0, -6.0));
    }

    #[test]
    fn test_modes_agree_only_on_first_element() {
        let speeds = vec![1.5, 1.5, 1.5];
        let base = Offset { x: 2.0, y: 2.0 };
        let independent = ParallaxMapper::new(ParallaxMode::Independent, speeds.clone()).offsets(base);
        let compounding = ParallaxMapper::new(ParallaxMode::Compounding, speeds).offsets(base);
        assert_eq!(independent[0], compounding[0]);
        assert_ne!(independent[1], compounding[1]);
        assert_ne!(independent[2], compounding[2]);
    }

    #[test]
    fn test_pointer_move_writes_each_decoration() {
        let mut surface = PageView::default();
        ParallaxMapper::new(ParallaxMode::Independent, vec![1.0, 2.0])
            .on_pointer_move([0.0, 0.0], [100.0, 100.0], &mut surface);
        assert!(close(surface.offsets[&Region::Decoration(0)], 5.0, 5.0));
        assert!(close(surface.offsets[&Region::Decoration(1)], 10.0, 10.0));
    }
}
