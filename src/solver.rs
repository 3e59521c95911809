//! Delivery batching and routing pipeline.
//!
//! Three stages: greedy capacity batching in input order, nearest-neighbor
//! route construction anchored at the depot, and round-trip distance
//! evaluation. Each batch is routed independently of the others.

use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;
use thiserror::Error;
use tracing::warn;

use crate::traits::{Delivery, DistanceProvider, Id};

/// Planner configuration.
///
/// Depot and capacity are inputs, not constants, so the planner can be run
/// with varying parameters.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Depot location (lat, lng); every route starts and ends here.
    pub depot: (f64, f64),
    /// Maximum total weight per batch.
    pub capacity: f64,
}

/// A capacity-bounded batch of delivery ids, in input order.
///
/// Total weight never exceeds the capacity the batch was built under; the
/// fields are private so the invariant holds after construction.
#[derive(Debug, Clone)]
pub struct Batch<I: Id> {
    ids: Vec<I>,
    total_weight: f64,
}

impl<I: Id> Batch<I> {
    /// Delivery ids in the order they were assigned.
    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A delivery dropped during batching because its weight alone exceeds the
/// batch capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDelivery<I> {
    pub id: I,
    pub weight: f64,
}

/// Output of the batching stage.
#[derive(Debug, Clone)]
pub struct Grouping<I: Id> {
    pub batches: Vec<Batch<I>>,
    pub skipped: Vec<SkippedDelivery<I>>,
}

/// One planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecord<I> {
    /// 1-based, assigned in batch emission order.
    pub route_id: usize,
    /// Delivery ids in visiting order.
    pub route: Vec<I>,
    /// Round-trip distance depot -> stops -> depot, kilometers.
    pub total_distance_km: f64,
}

/// Full result of a planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome<I: Id> {
    pub records: Vec<PlanRecord<I>>,
    pub skipped: Vec<SkippedDelivery<I>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum PlanError<I: fmt::Debug> {
    /// A batch referenced an id missing from the delivery index. Batches are
    /// built from the same deliveries the index is, so this is a contract
    /// violation and is propagated rather than recovered from.
    #[error("delivery {0:?} is referenced by a batch but missing from the index")]
    UnknownDelivery(I),
}

/// Greedy single-pass batching in input order.
///
/// A delivery heavier than the capacity itself joins no batch: it is
/// recorded as skipped, logged, and the pass continues. A delivery that no
/// longer fits the open batch closes it and starts the next one.
/// Exact-capacity totals are admissible.
///
/// This makes no attempt to minimize batch count or balance weights, and
/// never revisits a closed batch.
pub fn group_by_capacity<D: Delivery>(deliveries: &[D], capacity: f64) -> Grouping<D::Id> {
    let mut batches = Vec::new();
    let mut skipped = Vec::new();
    let mut current: Vec<D::Id> = Vec::new();
    let mut current_weight = 0.0;

    for delivery in deliveries {
        let weight = delivery.weight();
        if weight > capacity {
            warn!(
                id = ?delivery.id(),
                weight,
                capacity,
                "delivery exceeds batch capacity, skipping"
            );
            skipped.push(SkippedDelivery {
                id: delivery.id().clone(),
                weight,
            });
            continue;
        }

        if current_weight + weight <= capacity {
            current.push(delivery.id().clone());
            current_weight += weight;
        } else {
            batches.push(Batch {
                ids: std::mem::take(&mut current),
                total_weight: current_weight,
            });
            current.push(delivery.id().clone());
            current_weight = weight;
        }
    }

    if !current.is_empty() {
        batches.push(Batch {
            ids: current,
            total_weight: current_weight,
        });
    }

    Grouping { batches, skipped }
}

/// Index deliveries by id for route construction and evaluation.
pub fn index_by_id<D: Delivery>(deliveries: &[D]) -> HashMap<&D::Id, &D> {
    deliveries.iter().map(|d| (d.id(), d)).collect()
}

/// Nearest-neighbor visiting order for one batch, anchored at the depot.
///
/// Candidates are scanned in the batch's insertion order, so ties resolve
/// to the earlier delivery and the result is reproducible across runs.
/// Quadratic in batch size, which capacity keeps small.
pub fn nearest_neighbor_route<'a, D, M>(
    batch: &Batch<D::Id>,
    index: &HashMap<&'a D::Id, &'a D>,
    depot: (f64, f64),
    distances: &M,
) -> Result<Vec<D::Id>, PlanError<D::Id>>
where
    D: Delivery,
    M: DistanceProvider,
{
    let mut route = Vec::with_capacity(batch.len());
    let mut remaining: Vec<&D::Id> = batch.ids().iter().collect();
    let mut position = depot;

    while !remaining.is_empty() {
        let mut nearest = 0;
        let mut nearest_location = position;
        let mut min_distance = f64::INFINITY;

        for (slot, id) in remaining.iter().enumerate() {
            let location = lookup(index, *id)?.location();
            let distance = distances.distance_km(position, location);
            if distance < min_distance {
                min_distance = distance;
                nearest = slot;
                nearest_location = location;
            }
        }

        route.push(remaining.remove(nearest).clone());
        position = nearest_location;
    }

    Ok(route)
}

/// Round-trip distance for a visiting order: depot -> stops -> depot.
///
/// An empty route is zero by definition rather than a depot self-leg.
pub fn route_distance<'a, D, M>(
    route: &[D::Id],
    index: &HashMap<&'a D::Id, &'a D>,
    depot: (f64, f64),
    distances: &M,
) -> Result<f64, PlanError<D::Id>>
where
    D: Delivery,
    M: DistanceProvider,
{
    if route.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    let mut position = depot;
    for id in route {
        let next = lookup(index, id)?.location();
        total += distances.distance_km(position, next);
        position = next;
    }
    total += distances.distance_km(position, depot);

    Ok(total)
}

/// Run the full pipeline: batch, route, evaluate.
///
/// Batches share no state, so the route/evaluate stage fans out across
/// them; the indexed collect keeps record order identical to a sequential
/// pass. Route ids are 1-based in batch emission order.
pub fn plan<D, M>(
    deliveries: &[D],
    config: &PlanConfig,
    distances: &M,
) -> Result<PlanOutcome<D::Id>, PlanError<D::Id>>
where
    D: Delivery + Sync,
    D::Id: Send + Sync,
    M: DistanceProvider + Sync,
{
    let Grouping { batches, skipped } = group_by_capacity(deliveries, config.capacity);
    let index = index_by_id(deliveries);

    let records = batches
        .par_iter()
        .enumerate()
        .map(|(slot, batch)| {
            let route = nearest_neighbor_route(batch, &index, config.depot, distances)?;
            let total_distance_km = route_distance(&route, &index, config.depot, distances)?;
            Ok(PlanRecord {
                route_id: slot + 1,
                route,
                total_distance_km,
            })
        })
        .collect::<Result<Vec<_>, PlanError<D::Id>>>()?;

    Ok(PlanOutcome { records, skipped })
}

fn lookup<'a, D: Delivery>(
    index: &HashMap<&'a D::Id, &'a D>,
    id: &D::Id,
) -> Result<&'a D, PlanError<D::Id>> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| PlanError::UnknownDelivery(id.clone()))
}
