//! Dense voxel volumes bound to a region.

use bytemuck::{Pod, Zeroable};
use glam::IVec3;

use crate::region::Region;

/// One voxel cell: a material kind and a palette color index.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Voxel {
    kind: u8,
    color: u8,
}

/// Byte width of one voxel in a raw buffer.
pub const VOXEL_STRIDE: usize = std::mem::size_of::<Voxel>();

impl Voxel {
    pub const AIR: Voxel = Voxel { kind: 0, color: 0 };

    /// A solid voxel referencing the given palette entry.
    pub fn solid(color: u8) -> Voxel {
        Voxel { kind: 1, color }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.kind == 0
    }

    #[inline]
    pub fn color(self) -> u8 {
        self.color
    }
}

/// A dense voxel buffer covering every cell of a valid region.
///
/// Voxels are addressed by absolute world coordinates inside the region.
/// Storage order is x-fastest, then y, then z.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVolume {
    region: Region,
    data: Vec<Voxel>,
}

impl RawVolume {
    /// Creates a volume filled with air.
    ///
    /// # Panics
    ///
    /// Panics if `region` is invalid.
    pub fn new(region: Region) -> Self {
        assert!(region.is_valid(), "volume requires a valid region");
        Self {
            data: vec![Voxel::AIR; region.voxels()],
            region,
        }
    }

    /// Wraps an existing voxel buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer length does not match `region.voxels()`.
    pub fn from_raw(data: Vec<Voxel>, region: Region) -> Self {
        assert_eq!(
            data.len(),
            region.voxels(),
            "voxel buffer does not match region {region}"
        );
        Self { region, data }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn data(&self) -> &[Voxel] {
        &self.data
    }

    /// The whole voxel buffer as raw bytes, `VOXEL_STRIDE` bytes per cell.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    fn index(&self, p: IVec3) -> usize {
        let rel = p - self.region.mins();
        let w = self.region.width_in_voxels() as usize;
        let h = self.region.height_in_voxels() as usize;
        rel.z as usize * w * h + rel.y as usize * w + rel.x as usize
    }

    /// # Panics
    ///
    /// Panics if `p` lies outside the volume's region.
    pub fn voxel(&self, p: IVec3) -> Voxel {
        assert!(self.region.contains_point(p), "{p} outside {}", self.region);
        self.data[self.index(p)]
    }

    /// # Panics
    ///
    /// Panics if `p` lies outside the volume's region.
    pub fn set_voxel(&mut self, p: IVec3, voxel: Voxel) {
        assert!(self.region.contains_point(p), "{p} outside {}", self.region);
        let idx = self.index(p);
        self.data[idx] = voxel;
    }

    /// Copies the voxels of `region` from `src` into this volume, clipped
    /// to the area all three regions share. Cells outside the overlap are
    /// left untouched.
    pub fn copy_region_from(&mut self, src: &RawVolume, region: Region) {
        let overlap = region
            .intersection(&self.region)
            .intersection(&src.region());
        if !overlap.is_valid() {
            return;
        }
        for z in overlap.mins().z..=overlap.maxs().z {
            for y in overlap.mins().y..=overlap.maxs().y {
                for x in overlap.mins().x..=overlap.maxs().x {
                    let p = IVec3::new(x, y, z);
                    let idx = self.index(p);
                    self.data[idx] = src.voxel(p);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_volume_is_air() {
        let v = RawVolume::new(Region::cube(IVec3::ZERO, 2));
        assert_eq!(v.data().len(), 8);
        assert!(v.data().iter().all(|v| v.is_air()));
    }

    #[test]
    fn set_and_get_roundtrip() {
        let mut v = RawVolume::new(Region::cube(IVec3::ZERO, 3));
        let p = IVec3::new(2, 1, 0);
        v.set_voxel(p, Voxel::solid(7));
        assert_eq!(v.voxel(p).color(), 7);
        assert!(!v.voxel(p).is_air());
        assert!(v.voxel(IVec3::ZERO).is_air());
    }

    #[test]
    fn byte_view_matches_stride() {
        let v = RawVolume::new(Region::cube(IVec3::ZERO, 2));
        assert_eq!(v.as_bytes().len(), 8 * VOXEL_STRIDE);
    }

    #[test]
    fn copy_region_is_clipped() {
        let mut dst = RawVolume::new(Region::cube(IVec3::ZERO, 2));
        let mut src = RawVolume::new(Region::cube(IVec3::ZERO, 4));
        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    src.set_voxel(IVec3::new(x, y, z), Voxel::solid(9));
                }
            }
        }
        dst.copy_region_from(&src, src.region());
        assert!(dst.data().iter().all(|v| v.color() == 9));
    }

    #[test]
    fn copy_with_disjoint_region_is_a_noop() {
        let mut dst = RawVolume::new(Region::cube(IVec3::ZERO, 2));
        let src = RawVolume::new(Region::cube(IVec3::splat(5), 2));
        dst.copy_region_from(&src, src.region());
        assert!(dst.data().iter().all(|v| v.is_air()));
    }

    #[test]
    #[should_panic(expected = "voxel buffer does not match region")]
    fn from_raw_rejects_wrong_length() {
        RawVolume::from_raw(vec![Voxel::AIR; 3], Region::cube(IVec3::ZERO, 2));
    }
}
