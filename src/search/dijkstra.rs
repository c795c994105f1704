//! Label-setting multi-criteria Dijkstra over a temporal flight graph (spec
//! §4.3). Finds every Pareto-optimal closed walk from the origin that visits
//! every required airport, minimizing `(total_price, end_time)`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;

use crate::graph::city_index::CityIndex;
use crate::schema::FlightTable;
use crate::search::constraints::TravelConstraints;
use crate::search::dominance::{pareto_filter, try_insert};
use crate::search::label::{Label, LabelArena, LabelId, VisitedMask};
use crate::search_debug;

/// Priority-queue entry: `(cost, time, insertion sequence, label)`. The
/// sequence number breaks ties deterministically without ever comparing
/// labels structurally (spec §9 "do not compare labels structurally").
type QueueEntry = Reverse<(OrderedFloat<f64>, OrderedFloat<f64>, u64, LabelId)>;

/// Everything a caller needs to turn search results into route results: the
/// arena that owns every label produced, and the Pareto-optimal terminal
/// labels found.
pub struct SearchOutcome {
    /// Owns every label created during the search.
    pub arena: LabelArena,
    /// Pareto-optimal goal-state labels (spec §4.3 step 3 + the skyline
    /// filter).
    pub solutions: Vec<LabelId>,
}

/// Run the label-setting search described in spec §4.3 over `table`, using
/// `city_index` to look up outbound flights for each city in O(1).
pub fn search(
    table: &FlightTable,
    city_index: &CityIndex,
    constraints: &TravelConstraints,
) -> SearchOutcome {
    let required: Vec<&str> = constraints
        .required_cities
        .iter()
        .map(String::as_str)
        .collect();
    let bit_for = |city: &str| -> Option<u32> {
        required.iter().position(|&c| c == city).map(|p| p as u32)
    };
    let full_mask: VisitedMask = if required.is_empty() {
        0
    } else {
        (1u64 << required.len()) - 1
    };
    let min_stay = constraints.min_stay_minutes();

    let mut arena = LabelArena::new();
    let mut frontiers: HashMap<(String, VisitedMask), Vec<LabelId>> = HashMap::new();
    let mut heap: BinaryHeap<QueueEntry> = BinaryHeap::new();

    let seed_id = arena.push(Label {
        city: constraints.start_city.clone(),
        time: constraints.t_min,
        visited: 0,
        cost: 0.0,
        prev: None,
        flight_row: None,
        seq: 0,
    });
    frontiers
        .entry((constraints.start_city.clone(), 0))
        .or_default()
        .push(seed_id);
    push_entry(&mut heap, arena.get(seed_id), seed_id);

    let mut raw_solutions = Vec::new();
    let mut expansions = 0u64;

    while let Some(Reverse((_, _, _, label_id))) = heap.pop() {
        let (city, time, visited, cost) = {
            let label = arena.get(label_id);
            (label.city.clone(), label.time, label.visited, label.cost)
        };

        if time > constraints.t_max {
            continue;
        }

        if city == constraints.start_city && visited == full_mask {
            raw_solutions.push(label_id);
            continue;
        }

        let stay_minutes = if city == constraints.start_city || bit_for(&city).is_none() {
            0.0
        } else {
            min_stay
        };

        for row in city_index.rows_for(&city) {
            let dep_time = table.dep_time(row);
            let arr_time = table.arr_time(row);

            if dep_time < time + stay_minutes {
                continue;
            }
            if arr_time > constraints.t_max {
                continue;
            }

            let dest = table.arrival_airport(row).to_string();
            let mut new_visited = visited;
            if let Some(bit) = bit_for(&dest) {
                new_visited |= 1 << bit;
            }

            let candidate_id = arena.push(Label {
                city: dest.clone(),
                time: arr_time,
                visited: new_visited,
                cost: cost + table.price(row),
                prev: Some(label_id),
                flight_row: Some(row),
                seq: 0,
            });

            let frontier = frontiers.entry((dest, new_visited)).or_default();
            if try_insert(frontier, candidate_id, &arena) {
                push_entry(&mut heap, arena.get(candidate_id), candidate_id);
            }
            expansions += 1;
        }
    }

    search_debug!(
        "search from {} finished: {} expansions, {} raw goal labels",
        constraints.start_city,
        expansions,
        raw_solutions.len()
    );

    let solutions = pareto_filter(&raw_solutions, &arena);
    search_debug!("{} solutions survive the Pareto filter", solutions.len());

    SearchOutcome { arena, solutions }
}

fn push_entry(heap: &mut BinaryHeap<QueueEntry>, label: &Label, id: LabelId) {
    heap.push(Reverse((
        OrderedFloat(label.cost),
        OrderedFloat(label.time),
        label.seq,
        id,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FlightRow, FlightTable};
    use std::collections::{BTreeSet, HashMap as StdHashMap};

    fn flight(from: &str, to: &str, dep: f64, arr: f64, price: f64) -> FlightRow {
        FlightRow {
            departure_airport: from.to_string(),
            arrival_airport: to.to_string(),
            dep_time: dep,
            arr_time: arr,
            price,
            carrier_code: None,
            carrier_name: None,
            terminal_origin: None,
            terminal_dest: None,
            transfer_time_mins: None,
            baggage_included: None,
            scheduled_departure: None,
            scheduled_arrival: None,
            co2_grams: None,
            extra: StdHashMap::new(),
        }
    }

    fn constraints(
        start: &str,
        required: &[&str],
        t_min: f64,
        t_max: f64,
        min_stay_hours: Option<f64>,
    ) -> TravelConstraints {
        TravelConstraints::new(
            start.to_string(),
            required.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            t_min,
            t_max,
            None,
            None,
            min_stay_hours,
        )
        .unwrap()
    }

    fn outcome_costs_and_times(outcome: &SearchOutcome) -> Vec<(f64, f64)> {
        let mut pairs: Vec<(f64, f64)> = outcome
            .solutions
            .iter()
            .map(|&id| {
                let l = outcome.arena.get(id);
                (l.cost, l.time)
            })
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        pairs
    }

    /// Spec §8 scenario 1: two Pareto-optimal solutions at opposite extremes.
    #[test]
    fn two_pareto_solutions_opposite_extremes() {
        let table = FlightTable::from_rows(vec![
            flight("A", "B", 10.0, 20.0, 1.0),
            flight("B", "D", 20.0, 50.0, 1.0),
            flight("D", "A", 50.0, 80.0, 1.0),
            flight("A", "C", 1.0, 2.0, 100.0),
            flight("C", "D", 3.0, 4.0, 100.0),
            flight("D", "A", 5.0, 6.0, 100.0),
        ])
        .unwrap();
        let index = CityIndex::build(&table);
        let c = constraints("A", &["D"], 0.0, 100.0, None);

        let outcome = search(&table, &index, &c);
        assert_eq!(outcome_costs_and_times(&outcome), vec![(3.0, 80.0), (300.0, 6.0)]);
    }

    /// Spec §8 scenario 2: one solution dominates all alternative paths.
    #[test]
    fn single_dominating_solution() {
        let table = FlightTable::from_rows(vec![
            flight("A", "B", 1.0, 2.0, 1.0),
            flight("B", "D", 3.0, 4.0, 1.0),
            flight("D", "A", 5.0, 6.0, 1.0),
            flight("A", "C", 10.0, 20.0, 100.0),
            flight("C", "D", 20.0, 50.0, 100.0),
            flight("D", "A", 50.0, 80.0, 100.0),
        ])
        .unwrap();
        let index = CityIndex::build(&table);
        let c = constraints("A", &["D"], 0.0, 100.0, None);

        let outcome = search(&table, &index, &c);
        assert_eq!(outcome_costs_and_times(&outcome), vec![(3.0, 6.0)]);
    }

    /// Spec §8 scenario 3: the only return flight departs before the
    /// outbound arrives, so no itinerary is feasible.
    #[test]
    fn infeasible_due_to_early_return() {
        let table = FlightTable::from_rows(vec![
            flight("A", "B", 1.0, 3.0, 1.0),
            flight("B", "A", 2.0, 4.0, 1.0),
        ])
        .unwrap();
        let index = CityIndex::build(&table);
        let c = constraints("A", &["B"], 0.0, 100.0, None);

        let outcome = search(&table, &index, &c);
        assert!(outcome.solutions.is_empty());
    }

    /// Spec §8 scenario 4: minimum-stay enforcement at a required city.
    #[test]
    fn min_stay_enforcement() {
        let table = FlightTable::from_rows(vec![
            flight("WAW", "BCN", 480.0, 660.0, 100.0),
            flight("BCN", "WAW", 780.0, 960.0, 100.0),
            flight("BCN", "WAW", 2280.0, 2460.0, 120.0),
        ])
        .unwrap();
        let index = CityIndex::build(&table);

        // With no minimum stay both return flights are individually feasible,
        // but the same-day return is cheaper AND earlier, so it dominates the
        // next-day return and is the only Pareto-optimal solution.
        let no_min_stay = constraints("WAW", &["BCN"], 0.0, 3000.0, Some(0.0));
        let outcome = search(&table, &index, &no_min_stay);
        assert_eq!(outcome.solutions.len(), 1);
        assert_eq!(outcome.arena.get(outcome.solutions[0]).cost, 200.0);

        // A 12-hour minimum stay rules out the same-day return (2-hour
        // layover), leaving only the next-day return feasible.
        let twelve_hour_min_stay = constraints("WAW", &["BCN"], 0.0, 3000.0, Some(12.0));
        let outcome = search(&table, &index, &twelve_hour_min_stay);
        assert_eq!(outcome.solutions.len(), 1);
        let only = outcome.arena.get(outcome.solutions[0]);
        assert_eq!(only.cost, 220.0);
    }

    #[test]
    fn empty_required_yields_a_single_zero_segment_solution() {
        let table = FlightTable::from_rows(vec![flight("A", "B", 1.0, 2.0, 10.0)]).unwrap();
        let index = CityIndex::build(&table);
        let c = constraints("A", &[], 0.0, 100.0, None);

        let outcome = search(&table, &index, &c);
        assert_eq!(outcome.solutions.len(), 1);
        let only = outcome.arena.get(outcome.solutions[0]);
        assert_eq!(only.cost, 0.0);
        assert!(outcome.arena.reconstruct_flight_rows(outcome.solutions[0]).is_empty());
    }

    #[test]
    fn single_flight_arriving_after_t_max_is_infeasible() {
        let table = FlightTable::from_rows(vec![flight("A", "B", 1.0, 200.0, 10.0)]).unwrap();
        let index = CityIndex::build(&table);
        let c = constraints("A", &["B"], 0.0, 100.0, None);

        let outcome = search(&table, &index, &c);
        assert!(outcome.solutions.is_empty());
    }
}
