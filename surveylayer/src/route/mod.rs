//! Survey route ordering
//!
//! Computes a visiting order over the planned legs of a zone so the vessel
//! spends as little time as possible in transit between legs. Each leg can
//! be run in either direction; the orderer decides which endpoint to enter
//! from.
//!
//! # Example
//!
//! ```
//! use surveylayer::geo::GeodeticPoint;
//! use surveylayer::route::{assign_order, LegDescriptor};
//!
//! let mut legs = vec![
//!     LegDescriptor::new(1, 1, GeodeticPoint::new(0.0, 0.0), GeodeticPoint::new(0.0, 1.0)),
//!     LegDescriptor::new(2, 1, GeodeticPoint::new(0.0, 4.0), GeodeticPoint::new(0.0, 5.0)),
//!     LegDescriptor::new(3, 1, GeodeticPoint::new(0.0, 2.0), GeodeticPoint::new(0.0, 3.0)),
//! ];
//!
//! let plan = assign_order(&mut legs, 1).expect("seed is present");
//! assert_eq!(plan.leg_ids(), vec![1, 3, 2]);
//! assert_eq!(legs[2].order, Some(2));
//! ```

mod leg;
mod matrix;
mod orderer;

pub use leg::{LegDescriptor, LegId, ZoneId};
pub use matrix::{DistanceMatrix, EndpointDistances};
pub use orderer::{assign_order, first_duplicate_id, RouteOrderer, RoutePlan, RouteStep};
