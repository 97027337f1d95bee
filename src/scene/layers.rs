use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Render layers a camera considers, or the layer(s) a renderable lives on.
    ///
    /// 32 layers; bit `n` is layer `n`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CullingMask: u32 {
        const DEFAULT = 1 << 0;
        const ALL = u32::MAX;
    }
}

impl CullingMask {
    /// Maximum layer index.
    pub const MAX_LAYER: u8 = 31;

    /// Mask containing a single layer. Indices above [`Self::MAX_LAYER`] wrap.
    #[inline]
    #[must_use]
    pub const fn from_layer(layer: u8) -> Self {
        Self::from_bits_retain(1 << (layer & Self::MAX_LAYER))
    }

    #[inline]
    #[must_use]
    pub const fn has_layer(self, layer: u8) -> bool {
        self.intersects(Self::from_layer(layer))
    }
}

impl Default for CullingMask {
    fn default() -> Self {
        Self::ALL
    }
}
