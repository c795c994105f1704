//! Dominance relation and Pareto filtering over `(cost, time)` (spec §4.3).

use std::collections::HashMap;

use crate::search::label::{Label, LabelArena, LabelId};

/// True if `a` dominates `b`: same city and visited set, no worse in either
/// criterion, and strictly better in at least one.
pub fn dominates(a: &Label, b: &Label) -> bool {
    a.city == b.city
        && a.visited == b.visited
        && a.time <= b.time
        && a.cost <= b.cost
        && (a.time < b.time || a.cost < b.cost)
}

/// Try to insert `candidate` into the non-dominated frontier for one
/// `(city, visited)` state. Returns `false` (candidate discarded) if any
/// existing label already dominates it; otherwise removes every label the
/// candidate dominates, appends it, and returns `true`.
pub fn try_insert(frontier: &mut Vec<LabelId>, candidate_id: LabelId, arena: &LabelArena) -> bool {
    let candidate = arena.get(candidate_id);

    if frontier
        .iter()
        .any(|&existing_id| dominates(arena.get(existing_id), candidate))
    {
        return false;
    }

    frontier.retain(|&existing_id| !dominates(candidate, arena.get(existing_id)));
    frontier.push(candidate_id);
    true
}

/// Keep only Pareto-optimal labels out of a batch of candidate solutions.
///
/// Groups by `(city, visited)`, sorts each group by `(cost, time)`
/// ascending, and keeps labels whose `time` strictly decreases as `cost`
/// increases — the standard O(n log n) 2-D skyline pass.
pub fn pareto_filter(candidates: &[LabelId], arena: &LabelArena) -> Vec<LabelId> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut groups: HashMap<(String, u64), Vec<LabelId>> = HashMap::new();
    for &id in candidates {
        let label = arena.get(id);
        groups
            .entry((label.city.clone(), label.visited))
            .or_default()
            .push(id);
    }

    let mut result = Vec::new();
    for mut group in groups.into_values() {
        group.sort_by(|&a, &b| {
            let la = arena.get(a);
            let lb = arena.get(b);
            la.cost
                .partial_cmp(&lb.cost)
                .unwrap()
                .then(la.time.partial_cmp(&lb.time).unwrap())
        });

        let mut min_time = f64::INFINITY;
        for id in group {
            let time = arena.get(id).time;
            if time < min_time {
                result.push(id);
                min_time = time;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(city: &str, time: f64, cost: f64, visited: u64) -> Label {
        Label {
            city: city.to_string(),
            time,
            visited,
            cost,
            prev: None,
            flight_row: None,
            seq: 0,
        }
    }

    #[test]
    fn dominates_requires_same_city_and_visited() {
        let a = label("JFK", 100.0, 50.0, 0);
        let b = label("ORD", 100.0, 50.0, 0);
        assert!(!dominates(&a, &b));
    }

    #[test]
    fn dominates_requires_strict_improvement_in_one_dimension() {
        let a = label("JFK", 100.0, 50.0, 0);
        let equal = label("JFK", 100.0, 50.0, 0);
        assert!(!dominates(&a, &equal));

        let better_cost = label("JFK", 100.0, 49.0, 0);
        assert!(dominates(&better_cost, &a));
    }

    #[test]
    fn try_insert_discards_dominated_candidate() {
        let mut arena = LabelArena::new();
        let cheap = arena.push(label("JFK", 100.0, 50.0, 0));
        let mut frontier = vec![cheap];

        let worse = arena.push(label("JFK", 150.0, 60.0, 0));
        assert!(!try_insert(&mut frontier, worse, &arena));
        assert_eq!(frontier, vec![cheap]);
    }

    #[test]
    fn try_insert_evicts_labels_the_candidate_dominates() {
        let mut arena = LabelArena::new();
        let worse = arena.push(label("JFK", 150.0, 60.0, 0));
        let mut frontier = vec![worse];

        let better = arena.push(label("JFK", 100.0, 50.0, 0));
        assert!(try_insert(&mut frontier, better, &arena));
        assert_eq!(frontier, vec![better]);
    }

    #[test]
    fn pareto_filter_keeps_only_skyline_labels() {
        let mut arena = LabelArena::new();
        // (cost, time): (50, 300) dominated by (40, 200); (60, 100) is non-dominated (faster).
        let a = arena.push(label("JFK", 300.0, 50.0, 0));
        let b = arena.push(label("JFK", 200.0, 40.0, 0));
        let c = arena.push(label("JFK", 100.0, 60.0, 0));

        let kept = pareto_filter(&[a, b, c], &arena);
        assert_eq!(kept.len(), 2);
        assert!(kept.contains(&b));
        assert!(kept.contains(&c));
        assert!(!kept.contains(&a));
    }
}
