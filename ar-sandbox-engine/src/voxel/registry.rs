use bevy::prelude::*;
use std::collections::HashMap;

use super::grid::{GridCalibration, VoxelCoord};

/// Sparse voxel map: at most one occupant entity per lattice cell.
///
/// Owns the vertical calibration alongside the map so a scene reset can
/// drop both together. All mutation happens through `ResMut` on the
/// frame-driven schedule, so no further synchronisation is needed.
#[derive(Resource, Default)]
pub struct VoxelRegistry {
    blocks: HashMap<VoxelCoord, Entity>,
    pub calibration: GridCalibration,
}

impl VoxelRegistry {
    pub fn is_occupied(&self, coord: VoxelCoord) -> bool {
        self.blocks.contains_key(&coord)
    }

    pub fn occupant(&self, coord: VoxelCoord) -> Option<Entity> {
        self.blocks.get(&coord).copied()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Idempotent placement: an occupied cell is left untouched and the
    /// spawn closure is not invoked. Returns the newly placed entity.
    pub fn try_place(
        &mut self,
        coord: VoxelCoord,
        spawn: impl FnOnce() -> Entity,
    ) -> Option<Entity> {
        if self.is_occupied(coord) {
            return None;
        }

        let entity = spawn();
        self.blocks.insert(coord, entity);
        Some(entity)
    }

    /// Remove the occupant of a cell, yielding it for despawning.
    /// Removing from an empty cell is a silent no-op.
    pub fn try_remove(&mut self, coord: VoxelCoord) -> Option<Entity> {
        self.blocks.remove(&coord)
    }

    /// Drop every entry and the vertical calibration, returning the former
    /// occupants so the caller can despawn them. Scene-reset support.
    pub fn drain_all(&mut self) -> Vec<Entity> {
        self.calibration.clear();
        self.blocks.drain().map(|(_, entity)| entity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_placement_is_idempotent() {
        let mut registry = VoxelRegistry::default();
        let coord = VoxelCoord::new(1, 0, -2);

        let mut spawned = 0;
        let first = registry.try_place(coord, || {
            spawned += 1;
            entity(1)
        });
        let second = registry.try_place(coord, || {
            spawned += 1;
            entity(2)
        });

        assert_eq!(first, Some(entity(1)));
        assert_eq!(second, None);
        assert_eq!(spawned, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_removal_requires_prior_placement() {
        let mut registry = VoxelRegistry::default();
        assert_eq!(registry.try_remove(VoxelCoord::new(0, 0, 0)), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_frees_the_cell() {
        let mut registry = VoxelRegistry::default();
        let coord = VoxelCoord::new(4, 1, 4);

        registry.try_place(coord, || entity(7));
        assert_eq!(registry.occupant(coord), Some(entity(7)));
        assert_eq!(registry.try_remove(coord), Some(entity(7)));
        assert!(!registry.is_occupied(coord));
        assert_eq!(registry.occupant(coord), None);

        // The cell accepts a new occupant afterwards.
        assert_eq!(registry.try_place(coord, || entity(8)), Some(entity(8)));
    }

    #[test]
    fn test_drain_all_clears_map_and_calibration() {
        let mut registry = VoxelRegistry::default();
        registry.try_place(VoxelCoord::new(0, 0, 0), || entity(1));
        registry.try_place(VoxelCoord::new(1, 0, 0), || entity(2));
        crate::voxel::grid::snap_to_lattice(
            Vec3::new(0.0, 1.37, 0.0),
            1.0,
            &mut registry.calibration,
        );

        let drained = registry.drain_all();
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());
        assert!(!registry.calibration.is_set());
    }
}
