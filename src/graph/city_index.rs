//! City index: a zero-copy `departure_airport -> row range` lookup over a
//! sorted [`crate::schema::FlightTable`] (spec §3 "City index", §4.1 step 3).

use std::collections::HashMap;

use crate::schema::FlightTable;

/// Maps each departure airport to its half-open row range `[start, end)`
/// into a [`FlightTable`] sorted ascending by `departure_airport`. Ranges are
/// disjoint, sorted, and their union covers `[0, row_count)`.
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    ranges: HashMap<String, (usize, usize)>,
}

impl CityIndex {
    /// Build the index with a single linear scan over the `departure_airport`
    /// column, comparing each element against its predecessor (a shifted
    /// self-comparison) to find run boundaries — bulk, cache-linear, and
    /// requires no coarse lock over the table (spec §4.1 step 3).
    pub fn build(table: &FlightTable) -> Self {
        let col = table.departure_airport_column();
        let mut ranges = HashMap::new();

        if col.is_empty() {
            return CityIndex { ranges };
        }

        let mut run_start = 0usize;
        for i in 1..col.len() {
            if col[i] != col[i - 1] {
                ranges.insert(col[run_start].clone(), (run_start, i));
                run_start = i;
            }
        }
        ranges.insert(col[run_start].clone(), (run_start, col.len()));

        CityIndex { ranges }
    }

    /// The `[start, end)` row range for `city`, or `(0, 0)` if the city never
    /// departs a flight in this table — an empty range, not an allocation.
    pub fn range(&self, city: &str) -> (usize, usize) {
        self.ranges.get(city).copied().unwrap_or((0, 0))
    }

    /// Row indices departing `city`, as a plain `Range` over the table.
    pub fn rows_for(&self, city: &str) -> std::ops::Range<usize> {
        let (start, end) = self.range(city);
        start..end
    }

    /// A [`FlightView`] over every flight departing `city`.
    pub fn view_for_city(&self, city: &str) -> FlightView {
        FlightView::single(self.range(city))
    }

    /// A [`FlightView`] over the union of flights departing any city in
    /// `cities` (spec §4.1 "Get-flights-for-cities").
    pub fn view_for_cities<'a>(&self, cities: impl Iterator<Item = &'a str>) -> FlightView {
        let ranges: Vec<(usize, usize)> = cities
            .map(|c| self.range(c))
            .filter(|&(s, e)| s != e)
            .collect();
        FlightView { ranges }
    }

    /// Every departure airport known to this index.
    pub fn cities(&self) -> impl Iterator<Item = &String> {
        self.ranges.keys()
    }
}

/// A zero-copy slice over a [`FlightTable`]: one or more row ranges, with no
/// row data duplicated. Looking up an unknown city yields the empty view,
/// which owns no heap allocation (an empty `Vec` never allocates).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightView {
    ranges: Vec<(usize, usize)>,
}

impl FlightView {
    /// The shared empty view (spec §4.1: "return a shared empty view — never
    /// allocate per miss").
    pub fn empty() -> Self {
        FlightView { ranges: Vec::new() }
    }

    /// A view over a single `[start, end)` range, collapsing an empty range
    /// to the canonical empty view.
    pub fn single(range: (usize, usize)) -> Self {
        if range.0 == range.1 {
            Self::empty()
        } else {
            FlightView {
                ranges: vec![range],
            }
        }
    }

    /// Iterate every row index covered by this view, in range order.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().flat_map(|&(s, e)| s..e)
    }

    /// Total number of rows covered.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|&(s, e)| e - s).sum()
    }

    /// True if this view covers no rows.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
