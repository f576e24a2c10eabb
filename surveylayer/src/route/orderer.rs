//! Greedy nearest-neighbour ordering of a zone's legs.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::leg::{LegDescriptor, LegId, ZoneId};
use super::matrix::DistanceMatrix;

/// One leg's place in a computed route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteStep {
    /// Leg identifier.
    pub leg_id: LegId,
    /// 1-based visiting order.
    pub order: u32,
    /// Whether the leg is run from its end to its start.
    pub inverted: bool,
    /// Transit from the previous leg's exit to this leg's entry, in metres.
    /// Zero for the seed.
    pub transit_m: f64,
}

/// Result of ordering one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Zone that was ordered.
    pub zone_id: ZoneId,
    /// Steps in visiting order; the seed is first.
    pub steps: Vec<RouteStep>,
}

impl RoutePlan {
    /// Leg identifiers in visiting order.
    pub fn leg_ids(&self) -> Vec<LegId> {
        self.steps.iter().map(|s| s.leg_id).collect()
    }

    /// Total transit distance between consecutive legs in metres.
    pub fn total_transit_m(&self) -> f64 {
        self.steps.iter().map(|s| s.transit_m).sum()
    }

    /// Write the order and inversion flags back onto `legs`.
    ///
    /// Legs outside this plan's zone are left untouched.
    pub fn apply(&self, legs: &mut [LegDescriptor]) {
        let by_id: HashMap<LegId, &RouteStep> = self.steps.iter().map(|s| (s.leg_id, s)).collect();

        for leg in legs.iter_mut().filter(|l| l.zone_id == self.zone_id) {
            if let Some(step) = by_id.get(&leg.id) {
                leg.order = Some(step.order);
                leg.inverted = step.inverted;
            }
        }
    }
}

/// Nearest-neighbour route construction over the legs of one zone.
///
/// Starting from a seed leg, repeatedly moves to the unvisited leg whose
/// nearer endpoint is closest to the current leg's exit, running that leg
/// backwards when its end is strictly closer than its start. This is a
/// heuristic; it does not search for the globally shortest route. Exact
/// ties go to the candidate that appears first in the input.
///
/// # Example
///
/// ```
/// use surveylayer::geo::GeodeticPoint;
/// use surveylayer::route::{LegDescriptor, RouteOrderer};
///
/// let legs = vec![
///     LegDescriptor::new(1, 7, GeodeticPoint::new(0.0, 0.0), GeodeticPoint::new(0.0, 1.0)),
///     LegDescriptor::new(2, 7, GeodeticPoint::new(0.0, 2.0), GeodeticPoint::new(0.0, 1.1)),
/// ];
///
/// let plan = RouteOrderer::new(&legs, 1).unwrap().plan();
/// assert_eq!(plan.leg_ids(), vec![1, 2]);
/// assert!(plan.steps[1].inverted);
/// ```
#[derive(Debug)]
pub struct RouteOrderer<'a> {
    zone_id: ZoneId,
    members: Vec<&'a LegDescriptor>,
    seed: usize,
    matrix: DistanceMatrix,
}

impl<'a> RouteOrderer<'a> {
    /// Prepare ordering for the zone containing `seed`.
    ///
    /// Returns `None` when no leg in `legs` has the seed's id, or when two
    /// legs of the seed's zone share an id.
    pub fn new(legs: &'a [LegDescriptor], seed: LegId) -> Option<Self> {
        let zone_id = legs.iter().find(|l| l.id == seed)?.zone_id;

        let members: Vec<&LegDescriptor> = legs.iter().filter(|l| l.zone_id == zone_id).collect();
        if let Some(id) = first_duplicate_id(members.iter().map(|l| l.id)) {
            debug!(zone_id, leg_id = id, "Duplicate leg id in zone, not ordering");
            return None;
        }
        let seed = members.iter().position(|l| l.id == seed)?;
        let matrix = DistanceMatrix::new(&members);

        Some(Self {
            zone_id,
            members,
            seed,
            matrix,
        })
    }

    /// Zone being ordered.
    pub fn zone_id(&self) -> ZoneId {
        self.zone_id
    }

    /// Endpoint distances between the zone's legs, in input order.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Compute the visiting order without touching the input records.
    pub fn plan(&self) -> RoutePlan {
        let count = self.members.len();
        let mut visited = vec![false; count];
        let mut steps = Vec::with_capacity(count);

        let mut current = self.seed;
        // The seed keeps whatever orientation the caller gave it
        let mut current_inverted = self.members[current].inverted;
        visited[current] = true;
        steps.push(RouteStep {
            leg_id: self.members[current].id,
            order: 1,
            inverted: current_inverted,
            transit_m: 0.0,
        });

        for order in 2..=count as u32 {
            let exit_at_end = !current_inverted;
            let mut best: Option<(usize, f64, bool)> = None;

            for candidate in (0..count).filter(|&c| !visited[c]) {
                let (via_start, via_end) = self
                    .matrix
                    .endpoints(current, candidate)
                    .from_exit(exit_at_end);
                let inverted = via_end < via_start;
                let distance = if inverted { via_end } else { via_start };

                if best.map_or(true, |(_, shortest, _)| distance < shortest) {
                    best = Some((candidate, distance, inverted));
                }
            }

            let Some((next, transit_m, inverted)) = best else {
                break;
            };

            visited[next] = true;
            steps.push(RouteStep {
                leg_id: self.members[next].id,
                order,
                inverted,
                transit_m,
            });
            current = next;
            current_inverted = inverted;
        }

        RoutePlan {
            zone_id: self.zone_id,
            steps,
        }
    }
}

/// First leg id that appears more than once in `ids`.
pub fn first_duplicate_id(ids: impl IntoIterator<Item = LegId>) -> Option<LegId> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

/// Order the legs sharing the seed's zone, updating them in place.
///
/// Every leg in the seed's zone receives a 1-based `order` and an `inverted`
/// flag; legs of other zones are untouched. The caller persists the result.
///
/// Returns `None`, leaving `legs` unchanged, when the seed is not present or
/// leg ids within its zone are not unique.
pub fn assign_order(legs: &mut [LegDescriptor], seed: LegId) -> Option<RoutePlan> {
    let plan = RouteOrderer::new(legs, seed)?.plan();
    plan.apply(legs);

    debug!(
        zone_id = plan.zone_id,
        seed,
        legs = plan.steps.len(),
        transit_m = plan.total_transit_m(),
        "Assigned route order"
    );

    Some(plan)
}
