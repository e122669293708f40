//! View frustum construction and sphere-vs-frustum culling
//!
//! A frustum is six half-space planes whose normals all point into the
//! visible volume, so a point is on the visible side of a plane when its
//! signed distance is non-negative.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FOV_DEGREES, DEFAULT_Z_FAR, DEFAULT_Z_NEAR};

/// Below this squared length the forward/up cross product is unusable
const PARALLEL_EPSILON: f32 = 1.0e-6;

/// Fixed projection constants of a camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Full vertical field of view (radians)
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            aspect: 1.0,
            near: DEFAULT_Z_NEAR,
            far: DEFAULT_Z_FAR,
        }
    }
}

impl Projection {
    /// Half width / half height of the view rectangle at `distance`
    //      /| B
    //   c / | a
    //    /__| C
    //   A  b
    // tan(A) = a / b, with A = fov / 2 and b = distance
    pub fn half_extents_at(&self, distance: f32) -> Vec2 {
        let half_v = distance * self.fov_scale();
        Vec2::new(half_v * self.aspect, half_v)
    }

    /// tan(fov_y / 2). The raymarcher is compiled with this value so its rays
    /// and the culling planes span the same volume.
    #[inline]
    pub fn fov_scale(&self) -> f32 {
        (self.fov_y * 0.5).tan()
    }
}

/// Half-space plane: unit normal plus signed distance from the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    /// Plane through `point` facing `normal`.
    ///
    /// A zero normal yields a plane that never rejects anything.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Plane through three points; the normal is `(p1 - p0) x (p2 - p0)`, so
    /// counter-clockwise points (seen from the inside) face the viewer.
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self::from_point_normal(p0, (p1 - p0).cross(p2 - p0))
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// Identifies one of the six frustum planes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneSide {
    Top,
    Bottom,
    Left,
    Right,
    Near,
    Far,
}

impl PlaneSide {
    pub const ALL: [PlaneSide; 6] = [
        PlaneSide::Top,
        PlaneSide::Bottom,
        PlaneSide::Left,
        PlaneSide::Right,
        PlaneSide::Near,
        PlaneSide::Far,
    ];
}

/// Orthonormal camera basis (right-handed)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl ViewBasis {
    /// Basis from a view direction and `Vec3::Y` as world up.
    ///
    /// Looking straight up or down makes the world-up reference useless, so a
    /// horizontal fallback is picked instead of producing NaN axes.
    pub fn from_direction(direction: Vec3) -> Self {
        let forward = direction.try_normalize().unwrap_or_else(|| {
            log::warn!("Camera direction {:?} is not normalizable, using -Z", direction);
            Vec3::NEG_Z
        });

        let mut right = forward.cross(Vec3::Y);
        if right.length_squared() < PARALLEL_EPSILON {
            // Pitching past vertical tilts screen-up toward where forward came from
            let fallback_up = if forward.y > 0.0 { Vec3::Z } else { Vec3::NEG_Z };
            log::warn!(
                "Camera direction {:?} is parallel to world up, using {:?}",
                forward,
                fallback_up
            );
            right = forward.cross(fallback_up);
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();

        Self { forward, right, up }
    }
}

/// Six inward-facing planes of a perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub top: Plane,
    pub bottom: Plane,
    pub left: Plane,
    pub right: Plane,
    pub near: Plane,
    pub far: Plane,
}

impl Frustum {
    /// Build the frustum of a camera at `position` looking along `direction`.
    ///
    /// Side planes pass through the camera position, so the camera sits on
    /// them. The near plane lies `near` ahead of it.
    pub fn new(position: Vec3, direction: Vec3, projection: &Projection) -> Self {
        let ViewBasis { forward, right, up } = ViewBasis::from_direction(direction);

        let half = projection.half_extents_at(projection.far);
        let far_center = position + forward * projection.far;
        let far_right = right * half.x;
        let far_up = up * half.y;

        let top_left = far_center - far_right + far_up;
        let top_right = far_center + far_right + far_up;
        let bottom_left = far_center - far_right - far_up;
        let bottom_right = far_center + far_right - far_up;

        Self {
            near: Plane::from_point_normal(position + forward * projection.near, forward),
            far: Plane::from_point_normal(far_center, -forward),
            right: Plane::from_points(position, top_right, bottom_right),
            left: Plane::from_points(position, bottom_left, top_left),
            top: Plane::from_points(position, top_left, top_right),
            bottom: Plane::from_points(position, bottom_right, bottom_left),
        }
    }

    pub fn plane(&self, side: PlaneSide) -> &Plane {
        match side {
            PlaneSide::Top => &self.top,
            PlaneSide::Bottom => &self.bottom,
            PlaneSide::Left => &self.left,
            PlaneSide::Right => &self.right,
            PlaneSide::Near => &self.near,
            PlaneSide::Far => &self.far,
        }
    }

    /// First plane that fully excludes the sphere, if any
    pub fn rejecting_plane(&self, center: Vec3, radius: f32) -> Option<PlaneSide> {
        PlaneSide::ALL
            .into_iter()
            .find(|side| self.plane(*side).signed_distance(center) < -radius)
    }

    /// Conservative sphere test: visible unless one plane puts the whole
    /// sphere behind it. Touching a plane counts as visible.
    #[inline]
    pub fn contains_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.rejecting_plane(center, radius).is_none()
    }

    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.contains_sphere(point, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1.0e-4;

    fn looking_down_neg_z() -> Frustum {
        Frustum::new(Vec3::ZERO, Vec3::NEG_Z, &Projection::default())
    }

    fn direction_from(yaw_deg: f32, pitch_deg: f32) -> Vec3 {
        let (yaw, pitch) = (yaw_deg.to_radians(), pitch_deg.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
    }

    fn assert_finite(frustum: &Frustum) {
        for side in PlaneSide::ALL {
            let plane = frustum.plane(side);
            assert!(plane.normal().is_finite(), "{:?} normal is not finite", side);
            assert!(plane.distance().is_finite(), "{:?} distance is not finite", side);
            assert!((plane.normal().length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_plane_from_points_orientation() {
        let plane = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert!((plane.normal() - Vec3::Z).length() < EPS);
        assert!((plane.signed_distance(Vec3::new(3.0, 4.0, 2.0)) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_plane_from_collinear_points_never_rejects() {
        let plane = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(plane.normal(), Vec3::ZERO);
        assert_eq!(plane.signed_distance(Vec3::new(-5.0, 1.0, 9.0)), 0.0);
    }

    #[test]
    fn test_camera_inside_own_frustum() {
        let projection = Projection::default();
        let frustum = looking_down_neg_z();

        // Side planes pass through the camera
        for side in [PlaneSide::Top, PlaneSide::Bottom, PlaneSide::Left, PlaneSide::Right] {
            assert!(frustum.plane(side).signed_distance(Vec3::ZERO).abs() < EPS);
        }
        assert!((frustum.far.signed_distance(Vec3::ZERO) - projection.far).abs() < EPS);
        // The near plane is `near` ahead of the camera
        assert!((frustum.near.signed_distance(Vec3::ZERO) + projection.near).abs() < EPS);
        assert!(frustum.contains_sphere(Vec3::ZERO, projection.near));

        // The near-plane center is inside all six
        let near_center = Vec3::NEG_Z * projection.near;
        for side in PlaneSide::ALL {
            assert!(frustum.plane(side).signed_distance(near_center) >= -EPS);
        }
    }

    #[test]
    fn test_behind_far_plane_is_culled() {
        let frustum = looking_down_neg_z();
        let beyond = Vec3::new(0.0, 0.0, -(DEFAULT_Z_FAR + 0.01));
        assert_eq!(frustum.rejecting_plane(beyond, 0.0), Some(PlaneSide::Far));
        assert!(!frustum.contains_point(beyond));
    }

    #[test]
    fn test_view_axis_between_near_and_far_is_visible() {
        let frustum = looking_down_neg_z();
        for d in [DEFAULT_Z_NEAR, 1.0, 10.0, 50.0, DEFAULT_Z_FAR] {
            assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -d)), "d = {}", d);
        }
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let frustum = looking_down_neg_z();
        // Exactly 0.5 beyond the far plane
        let point = Vec3::new(0.0, 0.0, -(DEFAULT_Z_FAR + 0.5));
        assert_eq!(frustum.far.signed_distance(point), -0.5);
        assert!(frustum.contains_sphere(point, 0.5));
        assert!(!frustum.contains_sphere(point, 0.25));
    }

    #[test]
    fn test_each_side_rejects_its_own_half_space() {
        // fov 90, aspect 1: the view rectangle at distance 10 is 20 x 20
        let frustum = looking_down_neg_z();
        let cases = [
            (Vec3::new(50.0, 0.0, -10.0), PlaneSide::Right),
            (Vec3::new(-50.0, 0.0, -10.0), PlaneSide::Left),
            (Vec3::new(0.0, 50.0, -10.0), PlaneSide::Top),
            (Vec3::new(0.0, -50.0, -10.0), PlaneSide::Bottom),
            // Between the camera and the near plane
            (Vec3::new(0.0, 0.0, -0.05), PlaneSide::Near),
        ];
        for (point, expected) in cases {
            assert_eq!(frustum.rejecting_plane(point, 0.0), Some(expected));
        }
        // Just inside the right edge
        assert!(frustum.contains_point(Vec3::new(9.9, 0.0, -10.0)));
    }

    #[test]
    fn test_aspect_widens_horizontal_planes_only() {
        let projection = Projection {
            aspect: 2.0,
            ..Default::default()
        };
        let frustum = Frustum::new(Vec3::ZERO, Vec3::NEG_Z, &projection);
        assert!(frustum.contains_point(Vec3::new(19.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 11.0, -10.0)));
    }

    #[test]
    fn test_vertical_direction_uses_fallback_up() {
        for direction in [Vec3::Y, Vec3::NEG_Y] {
            let basis = ViewBasis::from_direction(direction);
            assert!(basis.right.is_finite() && basis.up.is_finite());
            assert!(basis.right.dot(basis.forward).abs() < EPS);
            assert!(basis.up.dot(basis.forward).abs() < EPS);

            let position = Vec3::new(1.0, 2.0, 3.0);
            let frustum = Frustum::new(position, direction, &Projection::default());
            assert_finite(&frustum);
            assert!(frustum.contains_point(position + direction * 10.0));
            assert!(!frustum.contains_point(position - direction * 10.0));
        }
    }

    #[test]
    fn test_zero_direction_falls_back() {
        let frustum = Frustum::new(Vec3::ZERO, Vec3::ZERO, &Projection::default());
        assert_finite(&frustum);
        assert_eq!(frustum, looking_down_neg_z());
    }

    #[test]
    fn test_side_planes_follow_fov_scale() {
        for fov in [30.0f32, 60.0, 90.0, 120.0] {
            let projection = Projection {
                fov_y: fov.to_radians(),
                aspect: 16.0 / 9.0,
                ..Default::default()
            };
            let frustum = Frustum::new(Vec3::ZERO, Vec3::NEG_Z, &projection);
            let scale = projection.fov_scale();
            let depth = 10.0;

            // Edge rays of the raymarcher lie on the side planes
            let top = Vec3::new(0.0, scale * depth, -depth);
            let right = Vec3::new(scale * projection.aspect * depth, 0.0, -depth);
            assert!(frustum.top.signed_distance(top).abs() < EPS, "fov {}", fov);
            assert!(frustum.bottom.signed_distance(top * Vec3::new(1.0, -1.0, 1.0)).abs() < EPS);
            assert!(frustum.right.signed_distance(right).abs() < EPS, "fov {}", fov);
            assert!(frustum.left.signed_distance(right * Vec3::new(-1.0, 1.0, 1.0)).abs() < EPS);
        }
    }

    #[test]
    fn test_narrow_fov_culls_only_off_screen() {
        let projection = Projection {
            fov_y: 60.0f32.to_radians(),
            aspect: 16.0 / 9.0,
            ..Default::default()
        };
        let frustum = Frustum::new(Vec3::ZERO, Vec3::NEG_Z, &projection);
        // Screen half height at depth 10 is 10 * tan(30) ~= 5.77
        assert_eq!(frustum.rejecting_plane(Vec3::new(0.0, 7.0, -10.0), 0.5), Some(PlaneSide::Top));
        assert!(frustum.contains_sphere(Vec3::new(0.0, 5.5, -10.0), 0.5));
        assert!(frustum.contains_sphere(Vec3::new(0.0, 6.0, -10.0), 0.5));
    }

    #[test]
    fn test_basis_is_right_handed() {
        let basis = ViewBasis::from_direction(Vec3::NEG_Z);
        assert!((basis.right - Vec3::X).length() < EPS);
        assert!((basis.up - Vec3::Y).length() < EPS);
    }

    proptest! {
        #[test]
        fn prop_view_axis_is_visible(
            yaw in 0.0f32..360.0,
            pitch in -90.0f32..=90.0,
            px in -50.0f32..50.0,
            py in -50.0f32..50.0,
            pz in -50.0f32..50.0,
            t in 0.0f32..=1.0,
        ) {
            let projection = Projection::default();
            let position = Vec3::new(px, py, pz);
            let direction = direction_from(yaw, pitch);
            let frustum = Frustum::new(position, direction, &projection);

            let near = projection.near + 0.01;
            let far = projection.far - 0.01;
            let point = position + direction.normalize() * (near + t * (far - near));
            prop_assert!(frustum.contains_point(point));
            prop_assert!(frustum.contains_sphere(position, projection.near + 0.001));
        }

        #[test]
        fn prop_beyond_far_is_culled(
            yaw in 0.0f32..360.0,
            pitch in -90.0f32..=90.0,
            extra in 0.01f32..100.0,
        ) {
            let projection = Projection::default();
            let direction = direction_from(yaw, pitch);
            let frustum = Frustum::new(Vec3::ZERO, direction, &projection);
            let point = direction.normalize() * (projection.far + extra);
            prop_assert!(!frustum.contains_point(point));
        }

        #[test]
        fn prop_points_inside_view_rectangle_are_visible(
            aspect in 0.5f32..3.0,
            fov in 20.0f32..150.0,
            t in 0.0f32..=1.0,
            u in -0.99f32..=0.99,
            v in -0.99f32..=0.99,
        ) {
            let projection = Projection {
                fov_y: fov.to_radians(),
                aspect,
                ..Default::default()
            };
            let frustum = Frustum::new(Vec3::ZERO, Vec3::NEG_Z, &projection);

            let near = projection.near + 0.01;
            let far = projection.far - 0.01;
            let depth = near + t * (far - near);
            let half = projection.half_extents_at(depth);
            let point = Vec3::new(u * half.x, v * half.y, -depth);
            prop_assert!(frustum.contains_point(point), "{:?} should be visible", point);
        }

        #[test]
        fn prop_planes_are_finite(yaw in 0.0f32..360.0, pitch in -90.0f32..=90.0) {
            let frustum = Frustum::new(Vec3::ZERO, direction_from(yaw, pitch), &Projection::default());
            for side in PlaneSide::ALL {
                prop_assert!(frustum.plane(side).normal().is_finite());
            }
        }
    }
}
