//! Core domain traits for the delivery planner.
//!
//! These are intentionally minimal and domain-agnostic. Concrete apps should
//! implement them for their own data models.

use std::fmt;
use std::hash::Hash;

/// Unique identifier for planner entities.
///
/// `Debug` is required so contract violations can name the offending id.
pub trait Id: Clone + Eq + Hash + fmt::Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + fmt::Debug {}

/// A delivery is a single weighted drop-off to be batched and routed.
pub trait Delivery {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Weight in the same unit as the batch capacity.
    fn weight(&self) -> f64;

    /// Location coordinates (lat, lng), degrees.
    fn location(&self) -> (f64, f64);
}

/// Provides point-to-point distance between two locations.
///
/// The planner only asks for single legs, so implementations are free to
/// compute on demand rather than precompute a matrix.
pub trait DistanceProvider {
    /// Distance in kilometers from one (lat, lng) point to another.
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64;
}
