//! Brush tool - selected substance and paint radius

use serde::{Deserialize, Serialize};

use crate::simulation::{SubstanceId, Substances};

/// Largest brush radius
pub const MAX_BRUSH_RADIUS: u32 = 20;

/// Square brush painting the selected substance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brush {
    /// Never air; erasing is a separate action
    pub selected: u16,
    pub radius: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            selected: SubstanceId::WATER,
            radius: 1,
        }
    }
}

impl Brush {
    /// Select a substance directly. Air and unknown ids are ignored.
    pub fn select(&mut self, id: u16, substances: &Substances) -> bool {
        if id == SubstanceId::AIR || !substances.contains(id) {
            log::warn!("Ignoring selection of substance {}", id);
            return false;
        }

        self.selected = id;
        true
    }

    /// Move the selection `steps` entries through the registry, wrapping
    /// around and skipping air
    pub fn cycle(&mut self, steps: i32, substance_count: usize) {
        // Only air (or nothing) to choose from
        if substance_count < 2 {
            return;
        }

        // Index among the non-air ids 1..substance_count
        let span = substance_count as i64 - 1;
        let position = (self.selected as i64 - 1 + steps as i64).rem_euclid(span);
        self.selected = u16::try_from(position + 1).unwrap_or(SubstanceId::WATER);
    }

    /// Grow or shrink the brush, clamped to `0..=MAX_BRUSH_RADIUS`
    pub fn resize(&mut self, delta: i32) {
        let radius = self.radius as i64 + delta as i64;
        self.radius = radius.clamp(0, MAX_BRUSH_RADIUS as i64) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_brush() {
        let brush = Brush::default();
        assert_eq!(brush.selected, SubstanceId::WATER);
        assert_eq!(brush.radius, 1);
    }

    #[test]
    fn test_select_valid() {
        let substances = Substances::new();
        let mut brush = Brush::default();
        assert!(brush.select(SubstanceId::MAGNESIUM, &substances));
        assert_eq!(brush.selected, SubstanceId::MAGNESIUM);
    }

    #[test]
    fn test_select_rejects_air_and_unknown() {
        let substances = Substances::new();
        let mut brush = Brush::default();
        assert!(!brush.select(SubstanceId::AIR, &substances));
        assert!(!brush.select(99, &substances));
        assert_eq!(brush.selected, SubstanceId::WATER);
    }

    #[test]
    fn test_cycle_wraps_and_skips_air() {
        let count = Substances::new().len();
        let last = count as u16 - 1;
        let mut brush = Brush::default();

        brush.cycle(-1, count);
        assert_eq!(brush.selected, last);

        brush.cycle(1, count);
        assert_eq!(brush.selected, 1);

        brush.cycle(3, count);
        assert_eq!(brush.selected, 4);

        brush.cycle(-4, count);
        assert_eq!(brush.selected, last);
    }

    #[test]
    fn test_cycle_full_loop_never_selects_air() {
        let count = Substances::new().len();
        let mut brush = Brush::default();

        for _ in 0..count * 2 {
            brush.cycle(1, count);
            assert_ne!(brush.selected, SubstanceId::AIR);
        }
    }

    #[test]
    fn test_cycle_large_steps() {
        let count = Substances::new().len();
        let mut brush = Brush::default();

        // 15 non-air substances: 2^31 - 1 and -2^31 both land 7 past water
        brush.cycle(i32::MAX, count);
        assert_eq!(brush.selected, 8);

        brush.selected = SubstanceId::WATER;
        brush.cycle(i32::MIN, count);
        assert_eq!(brush.selected, 8);

        brush.cycle(15 * 1000, count);
        assert_eq!(brush.selected, 8);
    }

    #[test]
    fn test_cycle_from_unregistered_selection() {
        let mut brush = Brush::default();
        brush.cycle(1, 2);
        assert_eq!(brush.selected, 1);

        brush.selected = 40;
        brush.cycle(1, 4);
        assert_ne!(brush.selected, SubstanceId::AIR);
        assert!(brush.selected < 4);
    }

    #[test]
    fn test_cycle_with_single_substance() {
        let mut brush = Brush::default();
        brush.cycle(1, 1);
        assert_eq!(brush.selected, SubstanceId::WATER);
    }

    #[test]
    fn test_resize_clamps() {
        let mut brush = Brush::default();
        brush.resize(-5);
        assert_eq!(brush.radius, 0);

        brush.resize(7);
        assert_eq!(brush.radius, 7);

        brush.resize(100);
        assert_eq!(brush.radius, MAX_BRUSH_RADIUS);

        brush.resize(i32::MIN);
        assert_eq!(brush.radius, 0);
    }
}
