//! Arena-backed label storage for the Pareto Dijkstra search (spec §4.3/§9).
//!
//! Labels are appended to a single `Vec<Label>` for the lifetime of one
//! search call; a label references its predecessor by arena index rather
//! than by pointer or `Rc`, so path reconstruction walks indices and
//! cloning a label handle is a `Copy` of a few integers.

use ordered_float::OrderedFloat;

/// Bitmask over the required-cities subset; bit `i` set means required
/// city `i` (by index into the request's `required_cities` list) has been
/// visited. Supports up to 64 required cities, which comfortably covers any
/// realistic multi-city itinerary.
pub type VisitedMask = u64;

/// Index of a [`Label`] within a [`LabelArena`].
pub type LabelId = usize;

/// A single state in the Dijkstra search space: a city, an arrival time,
/// the subset of required cities visited so far, and the accumulated cost.
#[derive(Debug, Clone)]
pub struct Label {
    /// Airport this label arrives at.
    pub city: String,
    /// Arrival time, in minutes since the fixed epoch.
    pub time: f64,
    /// Bitmask of required cities visited so far.
    pub visited: VisitedMask,
    /// Accumulated price.
    pub cost: f64,
    /// Predecessor label, or `None` for the seed label.
    pub prev: Option<LabelId>,
    /// Index of the flight row that produced this label from its
    /// predecessor, or `None` for the seed label.
    pub flight_row: Option<usize>,
    /// Monotonic insertion counter, used only to break priority-queue ties
    /// (spec §4.3: "labels are never compared structurally").
    pub seq: u64,
}

impl Label {
    /// Sort/hash key for `(cost, time)` used by the priority queue.
    pub fn priority_key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (OrderedFloat(self.cost), OrderedFloat(self.time))
    }
}

/// Owns every label produced during one search call.
#[derive(Debug, Default)]
pub struct LabelArena {
    labels: Vec<Label>,
    next_seq: u64,
}

impl LabelArena {
    /// An empty arena.
    pub fn new() -> Self {
        LabelArena {
            labels: Vec::new(),
            next_seq: 0,
        }
    }

    /// Insert a label, stamping it with the next insertion counter, and
    /// return its arena index.
    pub fn push(&mut self, mut label: Label) -> LabelId {
        label.seq = self.next_seq;
        self.next_seq += 1;
        self.labels.push(label);
        self.labels.len() - 1
    }

    /// Look up a label by arena index.
    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id]
    }

    /// Walk the `prev` chain from `id` back to the seed label, returning
    /// the chain of flight-row indices in travel order (oldest first).
    pub fn reconstruct_flight_rows(&self, id: LabelId) -> Vec<usize> {
        let mut rows = Vec::new();
        let mut current = Some(id);
        while let Some(idx) = current {
            let label = self.get(idx);
            if let Some(row) = label.flight_row {
                rows.push(row);
            }
            current = label.prev;
        }
        rows.reverse();
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(city: &str) -> Label {
        Label {
            city: city.to_string(),
            time: 0.0,
            visited: 0,
            cost: 0.0,
            prev: None,
            flight_row: None,
            seq: 0,
        }
    }

    #[test]
    fn push_assigns_monotonic_sequence_numbers() {
        let mut arena = LabelArena::new();
        let a = arena.push(seed("JFK"));
        let b = arena.push(seed("ORD"));
        assert!(arena.get(a).seq < arena.get(b).seq);
    }

    #[test]
    fn reconstruct_flight_rows_walks_prev_chain_in_travel_order() {
        let mut arena = LabelArena::new();
        let seed_id = arena.push(seed("JFK"));

        let mut hop1 = seed("ORD");
        hop1.prev = Some(seed_id);
        hop1.flight_row = Some(10);
        let hop1_id = arena.push(hop1);

        let mut hop2 = seed("SFO");
        hop2.prev = Some(hop1_id);
        hop2.flight_row = Some(42);
        let hop2_id = arena.push(hop2);

        assert_eq!(arena.reconstruct_flight_rows(hop2_id), vec![10, 42]);
    }

    #[test]
    fn priority_key_orders_by_cost_then_time() {
        let mut cheap_slow = seed("A");
        cheap_slow.cost = 100.0;
        cheap_slow.time = 500.0;

        let mut expensive_fast = seed("A");
        expensive_fast.cost = 200.0;
        expensive_fast.time = 100.0;

        assert!(cheap_slow.priority_key() < expensive_fast.priority_key());
    }
}
