use bevy::prelude::*;
use bitflags::bitflags;

use constants::session::FEATURE_POINT_HIT_RADIUS;

use crate::engine::planes::TrackedPlane;

bitflags! {
    /// Filter for tracked-surface raycasts: which kinds of trackable
    /// geometry a hit may come from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HitFlags: u32 {
        /// Hit inside a tracked plane's detected extents.
        const PLANE_WITHIN_POLYGON = 1 << 0;
        /// Hit on a tracked plane's infinite extension.
        const PLANE_WITHIN_INFINITY = 1 << 1;
        /// Hit on an individual feature point.
        const FEATURE_POINT = 1 << 2;
        /// Hit on a feature point whose surface normal is known.
        const FEATURE_POINT_WITH_SURFACE_NORMAL = 1 << 3;
    }
}

/// Hit against spawned scene geometry (a placed block).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Hit against tracked-surface geometry: a pose (position + up vector)
/// plus the flags the hit matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub up: Vec3,
    pub flags: HitFlags,
}

/// The two ways a crosshair aim can land. Hit-or-miss is carried by
/// `Option<AimHit>`; there is no magic miss sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimHit {
    Scene(SceneHit),
    Surface(SurfaceHit),
}

/// Scene geometry wins; the surface caster is only consulted when the
/// scene raycast misses.
pub fn resolve_aim(
    scene: impl FnOnce() -> Option<SceneHit>,
    surface: impl FnOnce() -> Option<SurfaceHit>,
) -> Option<AimHit> {
    if let Some(hit) = scene() {
        return Some(AimHit::Scene(hit));
    }
    surface().map(AimHit::Surface)
}

// Slab-method ray–AABB intersection, returns Some(t) or None. A ray
// starting inside the box reports the exit distance.
pub fn ray_aabb_hit_t(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        if dir[axis].abs() < f32::EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir[axis];
        let t0 = (min[axis] - origin[axis]) * inv;
        let t1 = (max[axis] - origin[axis]) * inv;
        let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };

        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

/// Face normal of an axis-aligned block for a surface point: the axis
/// where the point sits furthest from the centre, signed.
pub fn block_face_normal(point: Vec3, center: Vec3) -> Vec3 {
    let d = point - center;
    let abs = d.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::X * d.x.signum()
    } else if abs.y >= abs.z {
        Vec3::Y * d.y.signum()
    } else {
        Vec3::Z * d.z.signum()
    }
}

/// Generic scene raycast: nearest placed block along the ray, with the
/// hit point and face normal.
pub fn raycast_blocks(
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    edge: f32,
    blocks: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<SceneHit> {
    let half = Vec3::splat(edge * 0.5);

    let mut best: Option<(Entity, Vec3, f32)> = None;
    for (entity, center) in blocks {
        if let Some(t) = ray_aabb_hit_t(origin, dir, center - half, center + half) {
            if t > 0.0 && t <= max_distance && best.is_none_or(|(_, _, best_t)| t < best_t) {
                best = Some((entity, center, t));
            }
        }
    }

    best.map(|(entity, center, t)| {
        let point = origin + dir * t;
        SceneHit {
            entity,
            point,
            normal: block_face_normal(point, center),
        }
    })
}

fn ray_plane_hit(origin: Vec3, dir: Vec3, plane: &TrackedPlane) -> Option<(f32, Vec3, HitFlags)> {
    // Scenario planes are horizontal: intersect with y = plane height.
    if dir.y.abs() < 1e-6 {
        return None;
    }
    let t = (plane.center.y - origin.y) / dir.y;
    if t <= 0.0 {
        return None;
    }

    let point = origin + dir * t;
    let local = Quat::from_rotation_y(-plane.yaw) * (point - plane.center);
    let flag = if local.x.abs() <= plane.half_extents.x && local.z.abs() <= plane.half_extents.y {
        HitFlags::PLANE_WITHIN_POLYGON
    } else {
        HitFlags::PLANE_WITHIN_INFINITY
    };
    Some((t, point, flag))
}

/// Tracked-surface raycast: nearest hit over tracked planes and feature
/// points whose kind passes the filter.
pub fn raycast_surfaces<'a>(
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    filter: HitFlags,
    planes: impl IntoIterator<Item = &'a TrackedPlane>,
    feature_points: impl IntoIterator<Item = Vec3>,
) -> Option<SurfaceHit> {
    let mut best: Option<(SurfaceHit, f32)> = None;
    let consider = |hit: SurfaceHit, t: f32, best: &mut Option<(SurfaceHit, f32)>| {
        if t > 0.0 && t <= max_distance && best.is_none_or(|(_, best_t)| t < best_t) {
            *best = Some((hit, t));
        }
    };

    for plane in planes {
        let Some((t, point, flag)) = ray_plane_hit(origin, dir, plane) else {
            continue;
        };
        if !filter.intersects(flag) {
            continue;
        }
        consider(
            SurfaceHit {
                point,
                up: Vec3::Y,
                flags: flag,
            },
            t,
            &mut best,
        );
    }

    let point_flags =
        HitFlags::FEATURE_POINT.union(HitFlags::FEATURE_POINT_WITH_SURFACE_NORMAL);
    if filter.intersects(point_flags) {
        for feature_point in feature_points {
            let t = (feature_point - origin).dot(dir);
            if t <= 0.0 || t > max_distance {
                continue;
            }
            let closest = origin + dir * t;
            if closest.distance_squared(feature_point)
                <= FEATURE_POINT_HIT_RADIUS * FEATURE_POINT_HIT_RADIUS
            {
                // Scenario feature points all lie on planes, so their
                // surface normal is known.
                consider(
                    SurfaceHit {
                        point: feature_point,
                        up: Vec3::Y,
                        flags: point_flags.intersection(filter),
                    },
                    t,
                    &mut best,
                );
            }
        }
    }

    best.map(|(hit, _)| hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::planes::PlaneTrackingState;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn plane_at(center: Vec3, yaw: f32, half_extents: Vec2) -> TrackedPlane {
        TrackedPlane {
            index: 0,
            center,
            yaw,
            half_extents,
            detect_after: 0.0,
            state: PlaneTrackingState::Tracking,
        }
    }

    #[test]
    fn test_slab_hit_reports_entry_distance() {
        let t = ray_aabb_hit_t(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::NEG_Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        )
        .unwrap();
        assert!((t - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_slab_miss_off_axis() {
        assert!(
            ray_aabb_hit_t(
                Vec3::new(3.0, 0.0, 5.0),
                Vec3::NEG_Z,
                Vec3::splat(-1.0),
                Vec3::splat(1.0),
            )
            .is_none()
        );
    }

    #[test]
    fn test_slab_from_inside_reports_exit() {
        let t = ray_aabb_hit_t(Vec3::ZERO, Vec3::NEG_Z, Vec3::splat(-1.0), Vec3::splat(1.0))
            .unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_block_wins() {
        let blocks = [
            (entity(1), Vec3::new(0.0, 0.0, -4.0)),
            (entity(2), Vec3::new(0.0, 0.0, -2.0)),
        ];
        let hit = raycast_blocks(Vec3::ZERO, Vec3::NEG_Z, 100.0, 1.0, blocks).unwrap();
        assert_eq!(hit.entity, entity(2));
        assert_eq!(hit.normal, Vec3::Z);
        assert!((hit.point.z - -1.5).abs() < 1e-6);
    }

    #[test]
    fn test_blocks_beyond_reach_are_ignored() {
        let blocks = [(entity(1), Vec3::new(0.0, 0.0, -50.0))];
        assert!(raycast_blocks(Vec3::ZERO, Vec3::NEG_Z, 10.0, 1.0, blocks).is_none());
    }

    #[test]
    fn test_plane_hit_classifies_polygon_vs_infinity() {
        let plane = plane_at(Vec3::ZERO, 0.0, Vec2::new(1.0, 1.0));

        let inside = raycast_surfaces(
            Vec3::new(0.5, 2.0, 0.0),
            Vec3::NEG_Y,
            100.0,
            HitFlags::all(),
            [&plane],
            [],
        )
        .unwrap();
        assert_eq!(inside.flags, HitFlags::PLANE_WITHIN_POLYGON);

        let outside = raycast_surfaces(
            Vec3::new(5.0, 2.0, 0.0),
            Vec3::NEG_Y,
            100.0,
            HitFlags::all(),
            [&plane],
            [],
        )
        .unwrap();
        assert_eq!(outside.flags, HitFlags::PLANE_WITHIN_INFINITY);
    }

    #[test]
    fn test_filter_excludes_infinite_plane_hits() {
        let plane = plane_at(Vec3::ZERO, 0.0, Vec2::new(1.0, 1.0));
        let hit = raycast_surfaces(
            Vec3::new(5.0, 2.0, 0.0),
            Vec3::NEG_Y,
            100.0,
            HitFlags::PLANE_WITHIN_POLYGON,
            [&plane],
            [],
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_yawed_plane_extents_follow_rotation() {
        // Quarter turn swaps the extents axes.
        let plane = plane_at(
            Vec3::ZERO,
            std::f32::consts::FRAC_PI_2,
            Vec2::new(2.0, 0.5),
        );
        let hit = raycast_surfaces(
            Vec3::new(0.0, 2.0, 1.5),
            Vec3::NEG_Y,
            100.0,
            HitFlags::all(),
            [&plane],
            [],
        )
        .unwrap();
        assert_eq!(hit.flags, HitFlags::PLANE_WITHIN_POLYGON);
    }

    #[test]
    fn test_feature_point_hit_respects_filter() {
        let feature = Vec3::new(0.0, 0.0, -1.0);

        let hit = raycast_surfaces(
            Vec3::ZERO,
            Vec3::NEG_Z,
            100.0,
            HitFlags::FEATURE_POINT,
            [],
            [feature],
        )
        .unwrap();
        assert_eq!(hit.point, feature);
        assert_eq!(hit.flags, HitFlags::FEATURE_POINT);

        let filtered = raycast_surfaces(
            Vec3::ZERO,
            Vec3::NEG_Z,
            100.0,
            HitFlags::PLANE_WITHIN_POLYGON,
            [],
            [feature],
        );
        assert!(filtered.is_none());
    }

    #[test]
    fn test_scene_hit_suppresses_surface_raycast() {
        let scene_hit = SceneHit {
            entity: entity(1),
            point: Vec3::ZERO,
            normal: Vec3::Y,
        };

        let mut surface_attempted = false;
        let resolved = resolve_aim(
            || Some(scene_hit),
            || {
                surface_attempted = true;
                None
            },
        );

        assert!(matches!(resolved, Some(AimHit::Scene(_))));
        assert!(!surface_attempted);
    }

    #[test]
    fn test_miss_everywhere_is_none() {
        assert!(resolve_aim(|| None, || None).is_none());
    }
}
