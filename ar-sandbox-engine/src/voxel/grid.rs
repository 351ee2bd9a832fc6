use bevy::prelude::*;

/// Integer lattice cell key. Two world points map to the same coordinate
/// iff they round to the same cell, and equality/hashing is exact; raw
/// float positions are never used as map keys.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// One-time vertical anchor for the lattice, in lattice units.
///
/// Computed on the first placement as the fractional offset between the
/// raw hit's scaled y and its rounded value, then held for the whole
/// session so later cubes stack level with the first surface touched.
/// `None` means "not yet calibrated"; a computed shift of exactly zero
/// is legitimate and still counts as set.
#[derive(Debug, Default, Clone, Copy)]
pub struct GridCalibration {
    vertical_shift: Option<f32>,
}

impl GridCalibration {
    pub fn is_set(&self) -> bool {
        self.vertical_shift.is_some()
    }

    /// Stored shift in lattice units, zero while uncalibrated.
    pub fn shift(&self) -> f32 {
        self.vertical_shift.unwrap_or(0.0)
    }

    /// Anchor to the given scaled y if no anchor exists yet.
    fn observe(&mut self, scaled_y: f32) {
        if self.vertical_shift.is_none() {
            self.vertical_shift = Some(scaled_y - scaled_y.round());
        }
    }

    /// Forget the anchor; the next placement re-calibrates.
    pub fn clear(&mut self) {
        self.vertical_shift = None;
    }
}

/// Canonicalize a world point to its lattice cell.
///
/// Scales by `1 / edge` and rounds each axis to the nearest integer;
/// `f32::round` breaks ties away from zero, which is the grid's
/// tie-break rule. The first call anchors the vertical calibration. The
/// shift is deliberately not baked into the integer key; it is applied
/// when converting back to world space, so keys stay exact.
pub fn snap_to_lattice(point: Vec3, edge: f32, calibration: &mut GridCalibration) -> VoxelCoord {
    let scaled = point / edge;
    calibration.observe(scaled.y);

    VoxelCoord::new(
        scaled.x.round() as i32,
        scaled.y.round() as i32,
        scaled.z.round() as i32,
    )
}

/// World-space centre of a lattice cell, with the vertical anchor applied.
pub fn lattice_to_world(coord: VoxelCoord, edge: f32, calibration: &GridCalibration) -> Vec3 {
    Vec3::new(
        coord.x as f32,
        coord.y as f32 + calibration.shift(),
        coord.z as f32,
    ) * edge
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_ties_away_from_zero() {
        let mut cal = GridCalibration::default();
        let coord = snap_to_lattice(Vec3::new(0.5, 1.5, -0.5), 1.0, &mut cal);
        assert_eq!(coord, VoxelCoord::new(1, 2, -1));
    }

    #[test]
    fn test_round_trip_stability_under_half_edge() {
        let edge = 0.25;
        let mut cal = GridCalibration::default();
        let centre = Vec3::new(3.0, 1.0, -2.0) * edge;
        let base = snap_to_lattice(centre, edge, &mut cal);

        for eps in [-0.4, -0.2, 0.2, 0.4] {
            let jitter = Vec3::splat(eps * edge);
            assert_eq!(snap_to_lattice(centre + jitter, edge, &mut cal), base);
        }
    }

    #[test]
    fn test_vertical_shift_anchors_to_first_hit() {
        let mut cal = GridCalibration::default();

        let first = snap_to_lattice(Vec3::new(0.0, 1.37, 0.0), 1.0, &mut cal);
        assert_eq!(first.y, 1);
        assert!((cal.shift() - 0.37).abs() < 1e-6);

        let second = snap_to_lattice(Vec3::new(0.0, 2.10, 0.0), 1.0, &mut cal);
        assert_eq!(second.y, 2);
        let world = lattice_to_world(second, 1.0, &cal);
        assert!((world.y - 2.37).abs() < 1e-6);
    }

    #[test]
    fn test_shift_is_never_recalculated() {
        let mut cal = GridCalibration::default();
        snap_to_lattice(Vec3::new(0.0, 1.37, 0.0), 1.0, &mut cal);
        snap_to_lattice(Vec3::new(0.0, 5.91, 0.0), 1.0, &mut cal);
        assert!((cal.shift() - 0.37).abs() < 1e-6);
    }

    #[test]
    fn test_zero_shift_still_counts_as_calibrated() {
        let mut cal = GridCalibration::default();
        snap_to_lattice(Vec3::new(0.5, 2.0, 0.0), 1.0, &mut cal);
        assert!(cal.is_set());
        assert_eq!(cal.shift(), 0.0);
    }

    #[test]
    fn test_end_to_end_half_metre_grid() {
        // Spawn point after the half-edge surface offset, on a 0.5 grid.
        let edge = 0.5;
        let mut cal = GridCalibration::default();
        let spawn = Vec3::new(1.24, 0.27, -0.3);

        let coord = snap_to_lattice(spawn, edge, &mut cal);
        assert_eq!(coord, VoxelCoord::new(2, 1, -1));

        // 0.54 scaled y rounds to 1, so the anchor is -0.46 lattice units
        // and the cube lands back on the surface height it was aimed at.
        let world = lattice_to_world(coord, edge, &cal);
        assert!((world.x - 1.0).abs() < 1e-6);
        assert!((world.y - 0.27).abs() < 1e-5);
        assert!((world.z - -0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clear_rearms_calibration() {
        let mut cal = GridCalibration::default();
        snap_to_lattice(Vec3::new(0.0, 1.37, 0.0), 1.0, &mut cal);
        cal.clear();
        assert!(!cal.is_set());
        snap_to_lattice(Vec3::new(0.0, 0.25, 0.0), 1.0, &mut cal);
        assert!((cal.shift() - 0.25).abs() < 1e-6);
    }
}
