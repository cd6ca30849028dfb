//! Owned compressed voxel snapshots.

use vox_scene::{RawVolume, Region, Voxel, VOXEL_STRIDE};

use crate::codec;

/// A compressed snapshot of one node's voxel buffer, bound to the region
/// the buffer covered.
///
/// The byte buffer is owned exclusively; `Clone` deep-copies it. An empty
/// buffer means no volume was captured, in which case the region is
/// invalid too. Equality is deliberately not defined: two snapshots of
/// identical content may still compress differently.
#[derive(Debug, Clone)]
pub struct MementoData {
    buffer: Vec<u8>,
    region: Region,
}

impl MementoData {
    /// A snapshot that captures nothing.
    pub fn empty() -> Self {
        Self {
            buffer: Vec::new(),
            region: Region::INVALID,
        }
    }

    pub(crate) fn from_compressed(buffer: Vec<u8>, region: Region) -> Self {
        Self { buffer, region }
    }

    /// Captures the volume's voxel buffer, or an empty snapshot when the
    /// node has no volume.
    ///
    /// Partial snapshots are disabled: the full volume is captured and the
    /// stored region is the volume's own region. `_modified_region` is the
    /// reserved argument for capturing only the touched sub-region.
    pub fn from_volume(volume: Option<&RawVolume>, _modified_region: Region) -> Self {
        // TODO: capture the intersected sub-region instead of the full
        // volume once replay reconstruction stores both regions.
        let Some(volume) = volume else {
            return Self::empty();
        };
        match codec::compress(volume.as_bytes(), volume.region()) {
            Ok(data) => {
                log::debug!(
                    "captured snapshot: {} voxels, {} compressed bytes",
                    volume.region().voxels(),
                    data.size()
                );
                data
            }
            Err(err) => {
                log::warn!("failed to capture volume snapshot: {err}");
                Self::empty()
            }
        }
    }

    /// Restores the snapshot into `volume`, clipped to the snapshot's
    /// region. Returns `false` when there is nothing to restore or the
    /// compressed stream cannot be inflated; `volume` is untouched then.
    pub fn to_volume(data: &MementoData, volume: &mut RawVolume) -> bool {
        if !data.has_volume() {
            return false;
        }
        let mut voxels = vec![Voxel::AIR; data.region.voxels()];
        if let Err(err) = codec::decompress(data, bytemuck::cast_slice_mut(&mut voxels)) {
            log::warn!("failed to restore volume snapshot: {err}");
            return false;
        }
        let snapshot = RawVolume::from_raw(voxels, data.region);
        volume.copy_region_from(&snapshot, data.region);
        true
    }

    /// The region the captured buffer covers; invalid when empty.
    pub fn region(&self) -> Region {
        self.region
    }

    /// The compressed bytes; empty when no volume was captured.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Compressed size in bytes.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Size of the buffer this snapshot inflates to.
    pub fn uncompressed_size(&self) -> usize {
        self.region.voxels() * VOXEL_STRIDE
    }

    pub fn has_volume(&self) -> bool {
        !self.buffer.is_empty()
    }
}
