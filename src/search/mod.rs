//! Multi-criteria label-setting Dijkstra (spec §4.3): the search core.

pub mod constraints;
pub mod dijkstra;
pub mod dominance;
pub mod label;

pub use constraints::TravelConstraints;
pub use dijkstra::{search, SearchOutcome};
pub use label::{Label, LabelArena, LabelId, VisitedMask};
