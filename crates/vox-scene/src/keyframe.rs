//! Key-frame value types for node animations.

use std::collections::BTreeMap;

use glam::Mat4;

/// How a key frame interpolates toward the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InterpolationType {
    Instant,
    #[default]
    Linear,
    QuadEaseIn,
    QuadEaseOut,
    QuadEaseInOut,
    CubicEaseIn,
    CubicEaseOut,
    CubicEaseInOut,
}

impl InterpolationType {
    pub fn as_str(self) -> &'static str {
        match self {
            InterpolationType::Instant => "Instant",
            InterpolationType::Linear => "Linear",
            InterpolationType::QuadEaseIn => "QuadEaseIn",
            InterpolationType::QuadEaseOut => "QuadEaseOut",
            InterpolationType::QuadEaseInOut => "QuadEaseInOut",
            InterpolationType::CubicEaseIn => "CubicEaseIn",
            InterpolationType::CubicEaseOut => "CubicEaseOut",
            InterpolationType::CubicEaseInOut => "CubicEaseInOut",
        }
    }
}

/// One key frame of one animation: a local transform at a frame index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFrame {
    pub frame_idx: i32,
    pub interpolation: InterpolationType,
    pub long_rotation: bool,
    pub transform: Mat4,
}

impl Default for KeyFrame {
    fn default() -> Self {
        Self {
            frame_idx: 0,
            interpolation: InterpolationType::default(),
            long_rotation: false,
            transform: Mat4::IDENTITY,
        }
    }
}

impl KeyFrame {
    pub fn local_matrix(&self) -> Mat4 {
        self.transform
    }
}

/// Key frames of one animation, ordered by frame index.
pub type KeyFrames = Vec<KeyFrame>;

/// All animations of a node, keyed by animation name.
pub type KeyFramesMap = BTreeMap<String, KeyFrames>;
