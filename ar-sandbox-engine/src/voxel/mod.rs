//! Voxel placement and registration.
//!
//! Converts raw world-space aim hits into stable, grid-aligned block
//! positions and tracks one occupant entity per occupied lattice cell.
//!
//! ## Canonicalization Flow
//!
//! ```text
//! world point
//!   └─> snap_to_lattice()        scale by 1/edge, round half-away-from-zero
//!       └─> VoxelCoord           exact integer map key
//!           └─> lattice_to_world()   key * edge, + vertical calibration on y
//! ```
//!
//! The vertical calibration is computed exactly once, from the fractional
//! offset of the very first placement, so the whole lattice anchors to the
//! first detected surface height instead of world-origin integer
//! boundaries. Both placement and removal go through the same shifted
//! canonicalization, which keeps a removal aimed at a placed cube landing
//! on the cube's own cell.

pub mod grid;
pub mod registry;
