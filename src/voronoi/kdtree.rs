//! Static, packed 2D k-d tree for nearest-neighbour queries.
//!
//! Points are stored in a flat array ordered so that every sub-range `[start, end)`
//! has its median at `start + (end - start) / 2`, splitting alternately on x and y.
//! Nothing is allocated per node.

use glam::DVec2;

const DEFAULT_NODE_SIZE: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Entry {
    id: u32,
    pos: DVec2,
}

#[derive(Clone, Debug, Default)]
pub struct KdTree {
    entries: Vec<Entry>,
    node_size: usize,
}

/// Closest candidate found so far, compared on (distance, id).
struct Best {
    id: u32,
    dist_sq: f64,
}

impl KdTree {
    /// Builds the tree in O(n log n). Ids are opaque to the tree and break distance ties.
    pub fn new(points: impl IntoIterator<Item = (u32, DVec2)>) -> Self {
        Self::with_node_size(points, DEFAULT_NODE_SIZE)
    }

    pub fn with_node_size(
        points: impl IntoIterator<Item = (u32, DVec2)>,
        node_size: usize,
    ) -> Self {
        let mut entries: Vec<Entry> = points
            .into_iter()
            .map(|(id, pos)| Entry { id, pos })
            .collect();
        let node_size = node_size.max(1);
        sort_range(&mut entries, node_size, 0);
        Self { entries, node_size }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest point to `query` under the distance
    /// `sqrt((dx * weights.x)^2 + (dy * weights.y)^2)`, at most `max_dist` away,
    /// among the ids accepted by `filter`. Equal distances resolve to the smallest id.
    pub fn nearest<F>(
        &self,
        query: DVec2,
        weights: DVec2,
        max_dist: f64,
        filter: F,
    ) -> Option<(u32, f64)>
    where
        F: Fn(u32) -> bool,
    {
        if self.entries.is_empty() || max_dist.is_nan() || max_dist < 0.0 {
            return None;
        }
        let max_dist_sq = max_dist * max_dist;
        let mut best: Option<Best> = None;
        self.search(&self.entries, 0, query, weights, max_dist_sq, &filter, &mut best);
        best.map(|b| (b.id, b.dist_sq.sqrt()))
    }

    #[allow(clippy::too_many_arguments)]
    fn search<F>(
        &self,
        entries: &[Entry],
        axis: usize,
        query: DVec2,
        weights: DVec2,
        max_dist_sq: f64,
        filter: &F,
        best: &mut Option<Best>,
    ) where
        F: Fn(u32) -> bool,
    {
        if entries.len() <= self.node_size {
            for e in entries {
                consider(e, query, weights, max_dist_sq, filter, best);
            }
            return;
        }

        let m = entries.len() / 2;
        let median = &entries[m];
        consider(median, query, weights, max_dist_sq, filter, best);

        let diff = (query[axis] - median.pos[axis]) * weights[axis];
        let (near, far) = if diff <= 0.0 {
            (&entries[..m], &entries[m + 1..])
        } else {
            (&entries[m + 1..], &entries[..m])
        };

        self.search(near, 1 - axis, query, weights, max_dist_sq, filter, best);

        // `<=` keeps equally distant candidates reachable for the id tie-break.
        let bound = best.as_ref().map_or(max_dist_sq, |b| b.dist_sq.min(max_dist_sq));
        if diff * diff <= bound {
            self.search(far, 1 - axis, query, weights, max_dist_sq, filter, best);
        }
    }
}

fn consider<F>(
    e: &Entry,
    query: DVec2,
    weights: DVec2,
    max_dist_sq: f64,
    filter: &F,
    best: &mut Option<Best>,
)
where
    F: Fn(u32) -> bool,
{
    let d = (e.pos - query) * weights;
    let dist_sq = d.length_squared();
    if dist_sq.is_nan() || dist_sq > max_dist_sq {
        return;
    }
    let better = match best {
        None => true,
        Some(b) => dist_sq < b.dist_sq || (dist_sq == b.dist_sq && e.id < b.id),
    };
    if better && filter(e.id) {
        *best = Some(Best {
            id: e.id,
            dist_sq,
        });
    }
}

fn sort_range(entries: &mut [Entry], node_size: usize, axis: usize) {
    if entries.len() <= node_size {
        return;
    }
    let m = entries.len() / 2;
    entries.select_nth_unstable_by(m, |a, b| a.pos[axis].total_cmp(&b.pos[axis]));
    let (left, rest) = entries.split_at_mut(m);
    sort_range(left, node_size, 1 - axis);
    sort_range(&mut rest[1..], node_size, 1 - axis);
}
