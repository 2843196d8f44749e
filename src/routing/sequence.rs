//! Nearest-neighbor visiting order.

use super::haversine::haversine_km;
use crate::model::DeliveryPoint;

/// Orders a cluster greedily: start at the first point, then always move
/// to the closest unvisited one.
///
/// Returns a permutation of the input. Ties go to the earlier point, so
/// the result only depends on the input order. Quadratic, which is fine
/// for route-sized clusters.
pub fn nearest_neighbor(points: Vec<DeliveryPoint>) -> Vec<DeliveryPoint> {
    if points.len() <= 1 {
        return points;
    }

    let n = points.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[0] = true;
    order.push(0);

    while order.len() < n {
        let here = points[current].coordinates;
        let mut best: Option<(usize, f64)> = None;
        for (i, candidate) in points.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let km = haversine_km(here, candidate.coordinates);
            if best.map_or(true, |(_, best_km)| km < best_km) {
                best = Some((i, km));
            }
        }
        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    let mut slots: Vec<Option<DeliveryPoint>> = points.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
