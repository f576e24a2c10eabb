//! Endpoint distance matrix for a set of legs.

use rayon::prelude::*;

use super::leg::LegDescriptor;
use crate::geo::distance_m;

/// The four great-circle distances between the endpoints of two legs.
///
/// Field names read "from endpoint of the row leg" _ "to endpoint of the
/// column leg".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointDistances {
    pub start_start: f64,
    pub start_end: f64,
    pub end_start: f64,
    pub end_end: f64,
}

impl EndpointDistances {
    const UNREACHABLE: Self = Self {
        start_start: f64::INFINITY,
        start_end: f64::INFINITY,
        end_start: f64::INFINITY,
        end_end: f64::INFINITY,
    };

    fn between(from: &LegDescriptor, to: &LegDescriptor) -> Self {
        Self {
            start_start: distance_m(&from.start, &to.start),
            start_end: distance_m(&from.start, &to.end),
            end_start: distance_m(&from.end, &to.start),
            end_end: distance_m(&from.end, &to.end),
        }
    }

    /// Shortest of the four combinations.
    pub fn min(&self) -> f64 {
        self.start_start
            .min(self.start_end)
            .min(self.end_start)
            .min(self.end_end)
    }

    /// Distances from the row leg's exit to the column leg's `(start, end)`.
    ///
    /// `exit_at_end` is true when the row leg was run forwards.
    #[inline]
    pub fn from_exit(&self, exit_at_end: bool) -> (f64, f64) {
        if exit_at_end {
            (self.end_start, self.end_end)
        } else {
            (self.start_start, self.start_end)
        }
    }
}

/// Square matrix of endpoint distances between every pair of legs.
///
/// The diagonal is unreachable (+infinity) so a leg is never its own
/// nearest neighbour.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<EndpointDistances>,
}

impl DistanceMatrix {
    /// Build the matrix for `legs`, indexed in slice order.
    pub fn new(legs: &[&LegDescriptor]) -> Self {
        let size = legs.len();
        let rows: Vec<Vec<EndpointDistances>> = (0..size)
            .into_par_iter()
            .map(|i| {
                (0..size)
                    .map(|j| {
                        if i == j {
                            EndpointDistances::UNREACHABLE
                        } else {
                            EndpointDistances::between(legs[i], legs[j])
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            size,
            cells: rows.concat(),
        }
    }

    /// Number of legs covered.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the matrix covers no legs.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// All four endpoint distances from leg `i` to leg `j`.
    #[inline]
    pub fn endpoints(&self, i: usize, j: usize) -> &EndpointDistances {
        &self.cells[i * self.size + j]
    }

    /// Leg-to-leg distance: the closest pair of endpoints.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.endpoints(i, j).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeodeticPoint;

    fn leg(id: u64, start: (f64, f64), end: (f64, f64)) -> LegDescriptor {
        LegDescriptor::new(
            id,
            1,
            GeodeticPoint::new(start.0, start.1),
            GeodeticPoint::new(end.0, end.1),
        )
    }

    #[test]
    fn test_diagonal_is_infinite() {
        let legs = [leg(1, (0.0, 0.0), (0.0, 1.0)), leg(2, (0.0, 2.0), (0.0, 3.0))];
        let refs: Vec<&LegDescriptor> = legs.iter().collect();
        let matrix = DistanceMatrix::new(&refs);

        assert_eq!(matrix.len(), 2);
        assert!(matrix.distance(0, 0).is_infinite());
        assert!(matrix.distance(1, 1).is_infinite());
    }

    #[test]
    fn test_distance_is_closest_endpoint_pair() {
        let legs = [leg(1, (0.0, 0.0), (0.0, 1.0)), leg(2, (0.0, 3.0), (0.0, 1.5))];
        let refs: Vec<&LegDescriptor> = legs.iter().collect();
        let matrix = DistanceMatrix::new(&refs);

        let expected = distance_m(&legs[0].end, &legs[1].end);
        assert_eq!(matrix.distance(0, 1), expected);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let legs = [
            leg(1, (10.0, 10.0), (10.2, 10.1)),
            leg(2, (10.5, 9.8), (10.4, 10.3)),
            leg(3, (9.7, 10.6), (9.9, 10.9)),
        ];
        let refs: Vec<&LegDescriptor> = legs.iter().collect();
        let matrix = DistanceMatrix::new(&refs);

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix.distance(i, j), matrix.distance(j, i));
            }
        }
    }

    #[test]
    fn test_from_exit_selects_row_endpoint() {
        let d = EndpointDistances {
            start_start: 1.0,
            start_end: 2.0,
            end_start: 3.0,
            end_end: 4.0,
        };
        assert_eq!(d.from_exit(true), (3.0, 4.0));
        assert_eq!(d.from_exit(false), (1.0, 2.0));
        assert_eq!(d.min(), 1.0);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = DistanceMatrix::new(&[]);
        assert!(matrix.is_empty());
    }
}
