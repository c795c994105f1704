//! Weekly-periodicity data expander (spec §4.2).
//!
//! The cached dataset covers one canonical base week. For a request window
//! that strays outside it, this synthesizes the missing weeks by translating
//! every flight's times by a whole number of days, `7 * k`.

use crate::schema::FlightTable;
use crate::{expander_debug, expander_info};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const MINUTES_PER_WEEK: f64 = 7.0 * MINUTES_PER_DAY;

/// Expands a base-week [`FlightTable`] across an arbitrary date window.
#[derive(Debug, Clone)]
pub struct FlightDataExpander {
    base_week_start: f64,
    base_week_end: f64,
}

impl FlightDataExpander {
    /// Build an expander for a base week `[base_week_start, base_week_end]`,
    /// both in minutes since the crate's fixed epoch.
    pub fn new(base_week_start: f64, base_week_end: f64) -> Self {
        FlightDataExpander {
            base_week_start,
            base_week_end,
        }
    }

    /// Day offsets (each a multiple of 7) whose translated base week
    /// intersects `[t_min, t_max]`, sorted ascending. Always includes `0` if
    /// the base week itself overlaps the range (spec §4.2 contract).
    pub fn get_week_offsets(&self, t_min: f64, t_max: f64) -> Vec<i64> {
        let weeks_before = if t_min < self.base_week_start {
            ((self.base_week_start - t_min) / MINUTES_PER_WEEK).floor() as i64 + 1
        } else {
            0
        };

        let weeks_after = if t_max > self.base_week_end {
            ((t_max - self.base_week_end) / MINUTES_PER_WEEK).floor() as i64 + 1
        } else {
            0
        };

        let mut offsets = Vec::new();
        for w in -weeks_before..=weeks_after {
            let offset_days = w * 7;
            let offset_minutes = offset_days as f64 * MINUTES_PER_DAY;
            let week_start = self.base_week_start + offset_minutes;
            let week_end = self.base_week_end + offset_minutes;

            if week_end >= t_min && week_start <= t_max {
                offsets.push(offset_days);
            }
        }

        offsets.sort_unstable();
        offsets
    }

    /// Expand `table` to cover `[t_min, t_max]`, concatenating one shifted
    /// copy per needed week offset. Fast path: if only offset `0` is needed,
    /// returns the input unchanged.
    pub fn expand(&self, table: &FlightTable, t_min: f64, t_max: f64) -> FlightTable {
        if table.is_empty() {
            expander_debug!("expand called on an empty table, nothing to do");
            return table.clone();
        }

        let offsets = self.get_week_offsets(t_min, t_max);

        if offsets == [0] {
            expander_debug!("range within base week, no expansion needed");
            return table.clone();
        }

        expander_info!(
            "expanding flight data for {} weeks (offsets: {:?})",
            offsets.len(),
            offsets
        );

        let mut result = FlightTable::default();
        for &offset_days in &offsets {
            if offset_days == 0 {
                result.extend_from(table);
            } else {
                let offset_minutes = offset_days as f64 * MINUTES_PER_DAY;
                let shifted = table.shifted(offset_days, offset_minutes);
                result.extend_from(&shifted);
            }
        }

        expander_info!(
            "expanded from {} to {} flights ({} weeks)",
            table.len(),
            result.len(),
            offsets.len()
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FlightRow;
    use std::collections::HashMap;

    fn row(from: &str, to: &str, dep: f64, arr: f64) -> FlightRow {
        FlightRow {
            departure_airport: from.to_string(),
            arrival_airport: to.to_string(),
            dep_time: dep,
            arr_time: arr,
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

    fn expander() -> FlightDataExpander {
        // Base week: day 0 through day 7 (exclusive-ish), matching the
        // crate's canonical 2026-07-13..2026-07-19 base week in minutes.
        FlightDataExpander::new(0.0, 7.0 * MINUTES_PER_DAY - 1.0)
    }

    #[test]
    fn offsets_include_zero_when_range_within_base_week() {
        let offsets = expander().get_week_offsets(100.0, 200.0);
        assert_eq!(offsets, vec![0]);
    }

    #[test]
    fn offsets_extend_forward_for_a_future_range() {
        let e = expander();
        let t_min = 10.0 * MINUTES_PER_DAY;
        let t_max = 12.0 * MINUTES_PER_DAY;
        let offsets = e.get_week_offsets(t_min, t_max);
        assert_eq!(offsets, vec![7]);
    }

    #[test]
    fn offsets_extend_backward_for_a_past_range() {
        let e = expander();
        let t_min = -10.0 * MINUTES_PER_DAY;
        let t_max = -8.0 * MINUTES_PER_DAY;
        let offsets = e.get_week_offsets(t_min, t_max);
        assert_eq!(offsets, vec![-14]);
    }

    #[test]
    fn expand_is_a_no_op_on_the_fast_path() {
        let table = FlightTable::from_rows(vec![row("JFK", "ORD", 100.0, 200.0)]).unwrap();
        let expanded = expander().expand(&table, 100.0, 200.0);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded.dep_time(0), 100.0);
    }

    #[test]
    fn expand_concatenates_shifted_weeks_without_resorting() {
        let table = FlightTable::from_rows(vec![row("JFK", "ORD", 100.0, 200.0)]).unwrap();
        let t_min = 0.0;
        let t_max = 10.0 * MINUTES_PER_DAY;
        let expanded = expander().expand(&table, t_min, t_max);

        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded.dep_time(0), 100.0);
        assert_eq!(expanded.dep_time(1), 100.0 + MINUTES_PER_WEEK);
        assert_eq!(expanded.arr_time(1), 200.0 + MINUTES_PER_WEEK);
        assert_eq!(expanded.departure_airport(1), "JFK");
    }

    #[test]
    fn expand_on_empty_table_is_harmless() {
        let empty = FlightTable::default();
        let expanded = expander().expand(&empty, 0.0, 100.0);
        assert!(expanded.is_empty());
    }
}
