//! Axis-aligned integer regions of voxel space.

use std::fmt;

use glam::IVec3;

/// An inclusive, axis-aligned box of voxel coordinates.
///
/// Both corners belong to the region, so a region whose corners coincide
/// spans exactly one voxel. The distinguished [`Region::INVALID`] has
/// `mins > maxs` on every axis and reports zero voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    mins: IVec3,
    maxs: IVec3,
}

impl Region {
    /// The invalid region. Used wherever a delta carries no region.
    pub const INVALID: Region = Region {
        mins: IVec3::MAX,
        maxs: IVec3::MIN,
    };

    pub const fn new(mins: IVec3, maxs: IVec3) -> Self {
        Self { mins, maxs }
    }

    /// A cubic region with the given lower corner and edge length.
    pub fn cube(lower: IVec3, edge: i32) -> Self {
        Self::new(lower, lower + IVec3::splat(edge - 1))
    }

    pub fn mins(&self) -> IVec3 {
        self.mins
    }

    pub fn maxs(&self) -> IVec3 {
        self.maxs
    }

    pub fn is_valid(&self) -> bool {
        self.mins.x <= self.maxs.x && self.mins.y <= self.maxs.y && self.mins.z <= self.maxs.z
    }

    pub fn width_in_voxels(&self) -> i32 {
        self.maxs.x - self.mins.x + 1
    }

    pub fn height_in_voxels(&self) -> i32 {
        self.maxs.y - self.mins.y + 1
    }

    pub fn depth_in_voxels(&self) -> i32 {
        self.maxs.z - self.mins.z + 1
    }

    /// Total number of voxels in the region; zero for an invalid region.
    pub fn voxels(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        self.width_in_voxels() as usize
            * self.height_in_voxels() as usize
            * self.depth_in_voxels() as usize
    }

    pub fn contains_point(&self, p: IVec3) -> bool {
        self.is_valid()
            && p.x >= self.mins.x
            && p.x <= self.maxs.x
            && p.y >= self.mins.y
            && p.y <= self.maxs.y
            && p.z >= self.mins.z
            && p.z <= self.maxs.z
    }

    pub fn contains_region(&self, other: &Region) -> bool {
        self.contains_point(other.mins) && self.contains_point(other.maxs)
    }

    /// The overlap of two regions, or [`Region::INVALID`] if they are
    /// disjoint or either input is invalid.
    pub fn intersection(&self, other: &Region) -> Region {
        if !self.is_valid() || !other.is_valid() {
            return Region::INVALID;
        }
        let r = Region::new(self.mins.max(other.mins), self.maxs.min(other.maxs));
        if r.is_valid() {
            r
        } else {
            Region::INVALID
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mins({}:{}:{})/maxs({}:{}:{})",
            self.mins.x, self.mins.y, self.mins.z, self.maxs.x, self.maxs.y, self.maxs.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_voxel_region() {
        let r = Region::new(IVec3::ZERO, IVec3::ZERO);
        assert!(r.is_valid());
        assert_eq!(r.voxels(), 1);
        assert_eq!(r.width_in_voxels(), 1);
    }

    #[test]
    fn cube_edge_length() {
        let r = Region::cube(IVec3::ZERO, 4);
        assert_eq!(r.maxs(), IVec3::splat(3));
        assert_eq!(r.voxels(), 64);
    }

    #[test]
    fn invalid_region_has_no_voxels() {
        assert!(!Region::INVALID.is_valid());
        assert_eq!(Region::INVALID.voxels(), 0);
    }

    #[test]
    fn containment() {
        let outer = Region::cube(IVec3::ZERO, 8);
        let inner = Region::new(IVec3::splat(2), IVec3::splat(5));
        assert!(outer.contains_region(&inner));
        assert!(!inner.contains_region(&outer));
        assert!(outer.contains_point(IVec3::new(7, 0, 3)));
        assert!(!outer.contains_point(IVec3::new(8, 0, 3)));
    }

    #[test]
    fn intersection_of_overlapping_regions() {
        let a = Region::cube(IVec3::ZERO, 4);
        let b = Region::new(IVec3::splat(2), IVec3::splat(6));
        let i = a.intersection(&b);
        assert_eq!(i, Region::new(IVec3::splat(2), IVec3::splat(3)));
    }

    #[test]
    fn intersection_of_disjoint_regions_is_invalid() {
        let a = Region::cube(IVec3::ZERO, 2);
        let b = Region::cube(IVec3::splat(10), 2);
        assert!(!a.intersection(&b).is_valid());
        assert!(!a.intersection(&Region::INVALID).is_valid());
    }
}
