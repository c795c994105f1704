//! Reachability prune (spec §4.4 step 4): a pure optimization that drops
//! flights whose endpoints can't plausibly be on a feasible route, shrinking
//! the table the search algorithm has to scan.

use std::collections::{BTreeSet, HashSet};

use crate::schema::FlightTable;

/// Airports reachable from `sources` within `max_hops` undirected hops over
/// the table's `(departure_airport, arrival_airport)` pairs. A vectorized
/// BFS: each round scans every row once rather than following per-airport
/// adjacency lists.
pub fn reachable_airports(
    table: &FlightTable,
    sources: &BTreeSet<String>,
    max_hops: usize,
) -> HashSet<String> {
    let mut reachable: HashSet<String> = sources.iter().cloned().collect();
    let mut frontier = reachable.clone();

    for _ in 0..max_hops {
        if frontier.is_empty() {
            break;
        }

        let mut neighbors = HashSet::new();
        for (dep, arr) in table.endpoint_pairs() {
            if frontier.contains(dep) && !reachable.contains(arr) {
                neighbors.insert(arr.to_string());
            }
            if frontier.contains(arr) && !reachable.contains(dep) {
                neighbors.insert(dep.to_string());
            }
        }

        if neighbors.is_empty() {
            break;
        }

        reachable.extend(neighbors.iter().cloned());
        frontier = neighbors;
    }

    reachable
}

/// Keep only flights whose both endpoints lie within `max_hops` of
/// `sources`. Does not re-sort the table.
pub fn prune(table: &FlightTable, sources: &BTreeSet<String>, max_hops: usize) -> FlightTable {
    let reachable = reachable_airports(table, sources, max_hops);

    let indices: Vec<usize> = (0..table.len())
        .filter(|&i| {
            reachable.contains(table.departure_airport(i))
                && reachable.contains(table.arrival_airport(i))
        })
        .collect();

    table.select(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FlightRow;
    use std::collections::HashMap;

    fn row(from: &str, to: &str) -> FlightRow {
        FlightRow {
            departure_airport: from.to_string(),
            arrival_airport: to.to_string(),
            dep_time: 0.0,
            arr_time: 100.0,
            price: 10.0,
            carrier_code: None,
            carrier_name: None,
            terminal_origin: None,
            terminal_dest: None,
            transfer_time_mins: None,
            baggage_included: None,
            scheduled_departure: None,
            scheduled_arrival: None,
            co2_grams: None,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn reachable_airports_expands_one_hop_at_a_time() {
        let table = FlightTable::from_rows(vec![
            row("A", "B"),
            row("B", "C"),
            row("C", "D"),
        ])
        .unwrap();
        let sources: BTreeSet<String> = ["A".to_string()].into_iter().collect();

        let one_hop = reachable_airports(&table, &sources, 1);
        assert_eq!(one_hop, ["A", "B"].into_iter().map(String::from).collect());

        let two_hop = reachable_airports(&table, &sources, 2);
        assert_eq!(
            two_hop,
            ["A", "B", "C"].into_iter().map(String::from).collect()
        );
    }

    #[test]
    fn prune_drops_flights_with_an_unreachable_endpoint() {
        let table = FlightTable::from_rows(vec![
            row("A", "B"),
            row("B", "C"),
            row("X", "Y"),
        ])
        .unwrap();
        let sources: BTreeSet<String> = ["A".to_string()].into_iter().collect();

        let pruned = prune(&table, &sources, 1);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned.departure_airport(0), "A");
        assert_eq!(pruned.arrival_airport(0), "B");
    }

    #[test]
    fn zero_hop_prune_keeps_only_flights_entirely_within_sources() {
        let table = FlightTable::from_rows(vec![row("A", "B"), row("B", "A")]).unwrap();
        let sources: BTreeSet<String> = ["A".to_string()].into_iter().collect();

        let pruned = prune(&table, &sources, 0);
        assert!(pruned.is_empty());
    }
}
