//! Triangle store (spec §4.3, component C3).
//!
//! Destroy/restore here only flips the `deleted` flag and reports back to
//! the caller which edges changed frontier membership; the frontier-tracker
//! callbacks themselves live in [`crate::mesh::frontier`] so the cusp/BFS
//! algorithm stays in one place.

use crate::ids::{PointIndex, SpringIndex, TriangleIndex};

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub point_a: PointIndex,
    pub point_b: PointIndex,
    pub point_c: PointIndex,
    /// Sub-spring triple in the same CCW winding as the points: AB, BC, CA.
    pub sub_springs: [SpringIndex; 3],
    pub deleted: bool,
}

pub struct TriangleStore {
    pub triangles: Vec<Triangle>,
}

impl TriangleStore {
    pub fn new() -> Self {
        Self { triangles: Vec::new() }
    }

    pub fn add(&mut self, a: PointIndex, b: PointIndex, c: PointIndex, sub_springs: [SpringIndex; 3]) -> TriangleIndex {
        self.triangles.push(Triangle {
            point_a: a,
            point_b: b,
            point_c: c,
            sub_springs,
            deleted: false,
        });
        TriangleIndex::from(self.triangles.len() - 1)
    }

    pub fn destroy(&mut self, index: TriangleIndex) {
        let t = &mut self.triangles[index.index()];
        debug_assert!(!t.deleted, "destroying an already-deleted triangle");
        t.deleted = true;
    }

    pub fn restore(&mut self, index: TriangleIndex) {
        let t = &mut self.triangles[index.index()];
        debug_assert!(t.deleted, "restoring a non-deleted triangle");
        t.deleted = false;
    }

    pub fn get(&self, index: TriangleIndex) -> &Triangle {
        &self.triangles[index.index()]
    }
}

impl Default for TriangleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_destroy_then_restore() {
        let mut t = TriangleStore::new();
        let idx = t.add(
            PointIndex(0),
            PointIndex(1),
            PointIndex(2),
            [SpringIndex(0), SpringIndex(1), SpringIndex(2)],
        );
        assert!(!t.get(idx).deleted);
        t.destroy(idx);
        assert!(t.get(idx).deleted);
        t.restore(idx);
        assert!(!t.get(idx).deleted);
    }
}
