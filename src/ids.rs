//! Dense integer indices into per-container SoA buffers.
//!
//! Every cross-reference in the mesh (spring endpoints, triangle corners,
//! frontier edge neighbours, gadget attachment point) is a plain index, never
//! a pointer or a shared handle. `NoneIndex` stands in for "absent" the way
//! the original engine uses a sentinel rather than `Option` at the storage
//! layer, so arrays of indices stay `Pod` and can be cast straight into a
//! render buffer.

/// Sentinel index meaning "no entity". Matches `ElementIndex::max()`-style
/// sentinels rather than a tagged `Option<u32>`, keeping index arrays plain
/// `u32` for `bytemuck` casts.
pub const NONE_INDEX: u32 = u32::MAX;

/// Returns `true` if `index` is the sentinel.
#[inline]
pub fn is_none(index: u32) -> bool {
    index == NONE_INDEX
}

macro_rules! dense_index {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const NONE: $name = $name(crate::ids::NONE_INDEX);

            #[inline]
            pub fn is_none(&self) -> bool {
                self.0 == crate::ids::NONE_INDEX
            }

            #[inline]
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(v: u32) -> Self {
                $name(v)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(v: usize) -> Self {
                $name(v as u32)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::NONE
            }
        }
    };
}

dense_index!(PointIndex);
dense_index!(SpringIndex);
dense_index!(TriangleIndex);
dense_index!(FrontierId);
dense_index!(ElectricalElementIndex);
dense_index!(GadgetId);

/// An integer draw-order layer; also used for z-sorting flames and
/// ephemerals (GLOSSARY "Plane id").
pub type PlaneId = i32;

/// Plane id meaning "no plane assigned".
pub const NONE_PLANE_ID: PlaneId = i32::MIN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_index_roundtrip() {
        let p = PointIndex::NONE;
        assert!(p.is_none());
        let q = PointIndex::from(3u32);
        assert!(!q.is_none());
        assert_eq!(q.index(), 3);
    }

    #[test]
    fn default_is_none() {
        assert_eq!(SpringIndex::default(), SpringIndex::NONE);
    }
}
