//! Box overlap test used for blocking and hit gating.
//!
//! The three axes are not treated alike. `x` spans `[x - w, x + w]` around
//! the centre, `y` spans `[y - w, y]` (objects stand on their y coordinate)
//! and `z` spans `[z, z + w]` upwards from the feet. Each axis compares box
//! corners: either the other box's near corner lies inside this box, or this
//! box's near corner lies inside the other. Movement tuning relies on these
//! one-sided spans, so they must not be recentred.

use bevy::math::Vec3;

/// Solid objects further apart than this are never tested.
pub const COLLISION_CUTOFF: f32 = 30.0;

/// Collision footprint of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub position: Vec3,
    /// `(xWidth, yWidth, zWidth)`.
    pub half_extents: Vec3,
}

impl Bounds {
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            half_extents,
        }
    }

    /// Whether `self` collides with `other`.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let (a, aw) = (self.position, self.half_extents);
        let (b, bw) = (other.position, other.half_extents);

        let x = (a.x + aw.x >= b.x - bw.x && b.x - bw.x >= a.x - aw.x)
            || (a.x - aw.x >= b.x - bw.x && b.x + bw.x >= a.x - aw.x);
        let y = (a.y >= b.y - bw.y && b.y - bw.y >= a.y - aw.y)
            || (a.y - aw.y >= b.y - bw.y && b.y >= a.y - aw.y);
        let z = (a.z <= b.z + bw.z && b.z + bw.z <= a.z + aw.z)
            || (a.z + aw.z >= b.z && b.z + bw.z >= a.z + aw.z);

        x && y && z
    }

    /// Close enough for [`Bounds::overlaps`] to be worth evaluating.
    pub fn within_cutoff(&self, other: &Bounds) -> bool {
        self.position.distance(other.position) <= COLLISION_CUTOFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, z: f32) -> Bounds {
        Bounds::new(Vec3::new(x, y, z), Vec3::new(10.0, 5.0, 2.0))
    }

    #[test]
    fn identical_boxes_overlap() {
        assert!(body(0.0, 0.0, 0.0).overlaps(&body(0.0, 0.0, 0.0)));
    }

    #[test]
    fn separated_on_any_axis_means_no_overlap() {
        let a = body(0.0, 0.0, 0.0);
        assert!(!a.overlaps(&body(21.0, 0.0, 0.0)));
        assert!(!a.overlaps(&body(0.0, 6.0, 0.0)));
        assert!(!a.overlaps(&body(0.0, 0.0, 3.0)));
    }

    #[test]
    fn touching_edges_overlap() {
        let a = body(0.0, 0.0, 0.0);
        assert!(a.overlaps(&body(20.0, 0.0, 0.0)));
        assert!(a.overlaps(&body(0.0, 5.0, 0.0)));
    }

    #[test]
    fn height_spans_upward_from_the_feet() {
        let a = body(0.0, 0.0, 0.0);
        assert!(a.overlaps(&body(0.0, 0.0, 2.0)));
        assert!(a.overlaps(&body(0.0, 0.0, -2.0)));
        // A centred box of the same size would still reach these.
        assert!(!a.overlaps(&body(0.0, 0.0, 2.1)));
        assert!(!a.overlaps(&body(0.0, 0.0, -2.1)));
    }

    #[test]
    fn depth_spans_behind_the_feet() {
        let a = body(0.0, 0.0, 0.0);
        assert!(a.overlaps(&body(0.0, -5.0, 0.0)));
        assert!(!a.overlaps(&body(0.0, -5.5, 0.0)));
        assert!(!a.overlaps(&body(0.0, 5.5, 0.0)));
    }

    #[test]
    fn pillar_contains_short_box_from_both_sides() {
        let short = Bounds::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(10.0, 5.0, 1.0));
        let tall = Bounds::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 5.0, 4.0));
        assert!(short.overlaps(&tall));
        assert!(tall.overlaps(&short));
    }

    #[test]
    fn cutoff_is_euclidean() {
        let a = body(0.0, 0.0, 0.0);
        assert!(a.within_cutoff(&body(18.0, 24.0, 0.0)));
        assert!(!a.within_cutoff(&body(18.0, 24.1, 0.0)));
    }
}
