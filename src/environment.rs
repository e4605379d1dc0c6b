use std::collections::HashMap;
use std::fmt;

/// Opaque handle identifying one agent within an [`Environment`].
///
/// Allocated by the environment's monotonic counter; agents hold the handle
/// only, never a reference into the registry's storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An agent's committed perimeter: equal-length x- and y-point sequences.
#[derive(Debug, Clone, Default)]
pub struct Footprint {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
}

impl Footprint {
    fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Coarse 1-D occupancy test: do the bounding intervals of the two point
/// sequences overlap? Used independently on x- and y-coordinates to
/// approximate polygon overlap. Empty sequences overlap nothing.
pub fn range_overlap(seq_a: &[f32], seq_b: &[f32]) -> bool {
    let bounds = |seq: &[f32]| {
        seq.iter()
            .fold(None, |acc: Option<(f32, f32)>, &v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
    };
    match (bounds(seq_a), bounds(seq_b)) {
        (Some((a_lo, a_hi)), Some((b_lo, b_hi))) => a_lo <= b_hi && b_lo <= a_hi,
        _ => false,
    }
}

/// The rectangular arena and its spatial-occupancy registry.
///
/// Owns, per registered agent, the perimeter last accepted for it. Answers
/// whether a candidate footprint stays inside the arena and clear of every
/// other agent's committed footprint. Validation (`valid_move`) and commit
/// are deliberately separate steps: the registry never validates on commit.
pub struct Environment {
    width: f32,
    height: f32,
    occupants: HashMap<AgentId, Footprint>,
    next_id: u32,
}

impl Environment {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            occupants: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Hands out the next unused id. Monotonic, unique within this arena.
    pub fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds `id` with an empty footprint. Returns whether it was newly
    /// added; `false` means the caller must pick a different id.
    pub fn register(&mut self, id: AgentId) -> bool {
        if self.occupants.contains_key(&id) {
            false
        } else {
            self.occupants.insert(id, Footprint::default());
            true
        }
    }

    /// Unconditionally overwrites the stored perimeter for `id`.
    pub fn commit(&mut self, id: AgentId, xs: &[f32], ys: &[f32]) {
        self.occupants.insert(
            id,
            Footprint {
                xs: xs.to_vec(),
                ys: ys.to_vec(),
            },
        );
    }

    /// True iff every point lies strictly inside the arena. A point exactly
    /// on a boundary is out of bounds.
    pub fn in_bounds(&self, xs: &[f32], ys: &[f32]) -> bool {
        xs.iter().all(|&x| x > 0.0 && x < self.width)
            && ys.iter().all(|&y| y > 0.0 && y < self.height)
    }

    /// True iff some *other* occupant's committed footprint overlaps the
    /// candidate's coordinate ranges on both axes.
    pub fn is_occupied(&self, id: AgentId, xs: &[f32], ys: &[f32]) -> bool {
        self.occupants.iter().any(|(&other_id, footprint)| {
            other_id != id
                && !footprint.is_empty()
                && range_overlap(xs, &footprint.xs)
                && range_overlap(ys, &footprint.ys)
        })
    }

    /// The validity gate for a candidate move: in bounds and unoccupied.
    pub fn valid_move(&self, id: AgentId, xs: &[f32], ys: &[f32]) -> bool {
        self.in_bounds(xs, ys) && !self.is_occupied(id, xs, ys)
    }

    /// The committed footprint for `id`, if registered.
    pub fn footprint(&self, id: AgentId) -> Option<&Footprint> {
        self.occupants.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Environment {
        Environment::new(250.0, 180.0)
    }

    #[test]
    fn register_is_idempotent_per_id() {
        let mut env = arena();
        let id = env.allocate_id();
        assert!(env.register(id));
        assert!(!env.register(id));
    }

    #[test]
    fn allocated_ids_are_unique() {
        let mut env = arena();
        let a = env.allocate_id();
        let b = env.allocate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn interior_points_are_in_bounds() {
        let env = arena();
        assert!(env.in_bounds(&[0.1, 125.0, 249.9], &[0.1, 90.0, 179.9]));
    }

    #[test]
    fn boundary_exact_points_are_out_of_bounds() {
        let env = arena();
        assert!(!env.in_bounds(&[0.0, 125.0], &[90.0, 90.0]));
        assert!(!env.in_bounds(&[250.0, 125.0], &[90.0, 90.0]));
        assert!(!env.in_bounds(&[125.0, 125.0], &[0.0, 90.0]));
        assert!(!env.in_bounds(&[125.0, 125.0], &[180.0, 90.0]));
    }

    #[test]
    fn range_overlap_is_interval_intersection() {
        assert!(range_overlap(&[1.0, 5.0], &[4.0, 9.0]));
        assert!(range_overlap(&[4.0, 9.0], &[1.0, 5.0]));
        assert!(!range_overlap(&[1.0, 2.0], &[3.0, 4.0]));
        // touching intervals count as overlapping
        assert!(range_overlap(&[1.0, 3.0], &[3.0, 5.0]));
        assert!(!range_overlap(&[], &[1.0, 2.0]));
    }

    #[test]
    fn occupancy_requires_overlap_on_both_axes() {
        let mut env = arena();
        let resident = env.allocate_id();
        env.register(resident);
        env.commit(resident, &[100.0, 120.0], &[100.0, 120.0]);

        let candidate = env.allocate_id();
        env.register(candidate);

        // overlapping on both axes
        assert!(env.is_occupied(candidate, &[110.0, 130.0], &[110.0, 130.0]));
        // x-ranges overlap, y-ranges disjoint: NOT occupied. This pins the
        // per-axis interval rule against the reference implementation's
        // accidental reuse of the x list in its y-axis check.
        assert!(!env.is_occupied(candidate, &[110.0, 130.0], &[140.0, 160.0]));
        // y-ranges overlap, x-ranges disjoint
        assert!(!env.is_occupied(candidate, &[140.0, 160.0], &[110.0, 130.0]));
    }

    #[test]
    fn own_footprint_does_not_occupy() {
        let mut env = arena();
        let id = env.allocate_id();
        env.register(id);
        env.commit(id, &[100.0, 120.0], &[100.0, 120.0]);
        assert!(!env.is_occupied(id, &[100.0, 120.0], &[100.0, 120.0]));
    }

    #[test]
    fn registered_but_uncommitted_footprints_never_occupy() {
        let mut env = arena();
        let empty = env.allocate_id();
        env.register(empty);
        let mover = env.allocate_id();
        env.register(mover);
        assert!(!env.is_occupied(mover, &[100.0, 120.0], &[100.0, 120.0]));
    }

    #[test]
    fn valid_move_rejects_boundary_touch_regardless_of_occupancy() {
        let mut env = arena();
        let id = env.allocate_id();
        env.register(id);
        // empty arena, candidate pokes past the left wall
        assert!(!env.valid_move(id, &[0.0, 10.0], &[50.0, 60.0]));
        assert!(!env.valid_move(id, &[10.0, 20.0], &[175.0, 180.0]));
        // fully interior candidate is fine
        assert!(env.valid_move(id, &[10.0, 20.0], &[50.0, 60.0]));
    }

    #[test]
    fn commit_overwrites_previous_footprint() {
        let mut env = arena();
        let id = env.allocate_id();
        env.register(id);
        env.commit(id, &[10.0], &[10.0]);
        env.commit(id, &[20.0], &[20.0]);
        let footprint = env.footprint(id).expect("registered");
        assert_eq!(footprint.xs, vec![20.0]);
        assert_eq!(footprint.ys, vec![20.0]);
    }
}
