mod quadtree;

use std::cmp::Ordering;

use eframe::egui::Vec2;

use crate::error::{GalaxyError, Result};
use crate::universe::Note;

pub use quadtree::QuadtreeCell;
use quadtree::{QuadNode, collect_quadtree_cells};

/// Neighbour count used by the deep-dive view.
pub const DEEP_DIVE_NEIGHBORS: usize = 15;

fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

fn rank(a: (f32, usize), b: (f32, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Returns up to `k` candidates closest to `target`, each annotated with its
/// distance, ascending. Equal distances keep input order and the target
/// itself (matched by id) is never part of the result.
pub fn nearest(target: &Note, candidates: &[Note], k: usize) -> Result<Vec<Note>> {
    if k == 0 {
        return Err(GalaxyError::InvalidNeighborCount);
    }

    let mut ranked = candidates
        .iter()
        .filter(|candidate| candidate.id != target.id)
        .map(|candidate| (candidate, distance(target.position, candidate.position)))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(k);

    Ok(ranked
        .into_iter()
        .map(|(note, distance)| note.with_distance(distance))
        .collect())
}

/// Quadtree over note positions.
///
/// Answers the same contract as [`nearest`] without scanning every note and
/// doubles as a pointer hit-tester. Indices refer to the slice it was built
/// from; rebuild it whenever that slice changes.
pub struct SpatialIndex {
    root: Option<QuadNode>,
    positions: Vec<Vec2>,
    ids: Vec<String>,
}

impl SpatialIndex {
    pub fn build(notes: &[Note]) -> Self {
        let positions = notes.iter().map(|note| note.position).collect::<Vec<_>>();
        let ids = notes.iter().map(|note| note.id.clone()).collect();
        Self {
            root: QuadNode::build(&positions),
            positions,
            ids,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `(index, distance)` pairs ordered by distance then index.
    pub fn nearest_indices(
        &self,
        point: Vec2,
        k: usize,
        exclude_id: Option<&str>,
    ) -> Vec<(usize, f32)> {
        if k == 0 {
            return Vec::new();
        }

        let mut best: Vec<(f32, usize)> = Vec::with_capacity(k.min(self.positions.len()));
        if let Some(root) = &self.root {
            self.search(root, point, k, exclude_id, &mut best);
        }

        best.into_iter()
            .map(|(distance, index)| (index, distance))
            .collect()
    }

    fn search(
        &self,
        node: &QuadNode,
        point: Vec2,
        k: usize,
        exclude_id: Option<&str>,
        best: &mut Vec<(f32, usize)>,
    ) {
        if best.len() == k
            && let Some(&(worst, _)) = best.last()
            && node.bounds.distance_to(point) > worst
        {
            return;
        }

        if node.is_leaf() {
            for &index in &node.indices {
                if exclude_id.is_some_and(|id| self.ids[index] == id) {
                    continue;
                }
                offer(best, k, (distance(point, self.positions[index]), index));
            }
            return;
        }

        let mut children = node.children.iter().flatten().collect::<Vec<_>>();
        children.sort_by(|a, b| {
            a.bounds
                .distance_to(point)
                .total_cmp(&b.bounds.distance_to(point))
        });
        for child in children {
            self.search(child, point, k, exclude_id, best);
        }
    }

    /// Index-backed equivalent of [`nearest`]. `notes` must be the slice the
    /// index was built from; a length mismatch falls back to the linear scan.
    pub fn nearest(&self, notes: &[Note], target: &Note, k: usize) -> Result<Vec<Note>> {
        if k == 0 {
            return Err(GalaxyError::InvalidNeighborCount);
        }
        if notes.len() != self.positions.len() {
            tracing::warn!(
                indexed = self.positions.len(),
                given = notes.len(),
                "spatial index is stale, scanning linearly"
            );
            return nearest(target, notes, k);
        }

        Ok(self
            .nearest_indices(target.position, k, Some(&target.id))
            .into_iter()
            .map(|(index, distance)| notes[index].with_distance(distance))
            .collect())
    }

    /// Closest indexed point within `max_distance` of `point`.
    pub fn hit_test(&self, point: Vec2, max_distance: f32) -> Option<usize> {
        self.nearest_indices(point, 1, None)
            .first()
            .filter(|(_, distance)| *distance <= max_distance)
            .map(|(index, _)| *index)
    }

    pub fn cells(&self) -> Vec<QuadtreeCell> {
        let mut cells = Vec::new();
        if let Some(root) = &self.root {
            collect_quadtree_cells(root, 0, &mut cells);
        }
        cells
    }
}

fn offer(best: &mut Vec<(f32, usize)>, k: usize, candidate: (f32, usize)) {
    if best.len() == k {
        match best.last() {
            Some(&worst) if rank(candidate, worst) == Ordering::Less => {
                best.pop();
            }
            _ => return,
        }
    }

    let at = best.partition_point(|entry| rank(*entry, candidate) == Ordering::Less);
    best.insert(at, candidate);
}
