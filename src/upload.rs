//! The Upload interface (spec §6 / SPEC_FULL §4.14).
//!
//! The core does not fix a binary layout for renderable records; it only
//! guarantees that the records produced by one `drain_dirty` call are
//! consistent with the most recently completed integration pass. `UploadRecord`
//! is plain data, never a GPU handle — a real renderer maps these to whatever
//! vertex/texture representation it likes.

use crate::ids::{FrontierId, GadgetId, PlaneId, PointIndex};
use glam::Vec2;

#[derive(Debug, Clone, Copy)]
pub enum UploadRecord {
    /// A frontier edge changed shape/kind and needs its colour channel
    /// regenerated (spec §4.4 `dirtyForRendering`).
    FrontierEdge {
        frontier: FrontierId,
        from: PointIndex,
        to: PointIndex,
        is_external: bool,
    },
    /// An ephemeral particle's visual state (position/alpha/plane) changed.
    Ephemeral {
        point: PointIndex,
        position: Vec2,
        alpha: f32,
        plane: PlaneId,
    },
    /// A gadget's render state changed (ping on/off, explosion fade step).
    Gadget {
        gadget: GadgetId,
        position: Vec2,
        plane: PlaneId,
        frame: u32,
        alpha: f32,
    },
    /// A point is on fire; flame sprite placement.
    Flame {
        point: PointIndex,
        position: Vec2,
        plane: PlaneId,
        development: f32,
    },
}

/// Double-buffered upload queue: the host drains `front` while the
/// simulation fills `back`; `swap` is called once per tick after the whole
/// pipeline (including the tool dispatch pass) has run, per spec §5's
/// "render context reads immutable snapshots".
#[derive(Debug, Default)]
pub struct UploadBuffer {
    back: Vec<UploadRecord>,
    front: Vec<UploadRecord>,
}

impl UploadBuffer {
    pub fn push(&mut self, record: UploadRecord) {
        self.back.push(record);
    }

    /// Moves this tick's accumulated records to the front buffer for the
    /// host to read, and clears the back buffer for the next tick.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.back, &mut self.front);
        self.back.clear();
    }

    pub fn records(&self) -> &[UploadRecord] {
        &self.front
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_moves_back_to_front() {
        let mut buf = UploadBuffer::default();
        buf.push(UploadRecord::Ephemeral {
            point: PointIndex(0),
            position: Vec2::ZERO,
            alpha: 1.0,
            plane: 0,
        });
        assert!(buf.records().is_empty());
        buf.swap();
        assert_eq!(buf.records().len(), 1);
        buf.swap();
        assert!(buf.records().is_empty());
    }
}
