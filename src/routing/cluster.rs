//! Splits delivery points into route-sized groups.
//!
//! k-means over (longitude, latitude) with deterministic farthest-point
//! seeding, followed by an optional rebalancing pass that makes the
//! capacity a hard bound.

use crate::model::DeliveryPoint;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterParams {
    /// Maximum points per cluster.
    pub capacity: usize,
    pub max_iterations: usize,
    pub enforce_capacity: bool,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            capacity: 20,
            max_iterations: 50,
            enforce_capacity: true,
        }
    }
}

/// Number of clusters for `point_count` points: ceil(n / capacity), 0 for no points.
pub fn target_cluster_count(point_count: usize, capacity: usize) -> usize {
    point_count.div_ceil(capacity.max(1))
}

/// Partitions `points` into at most `target_cluster_count` non-empty clusters.
///
/// Points are tracked by index, so two addresses that geocode to the same
/// coordinates are both kept. Each cluster lists its points in input order.
pub fn cluster_points(points: Vec<DeliveryPoint>, params: &ClusterParams) -> Vec<Vec<DeliveryPoint>> {
    let k = target_cluster_count(points.len(), params.capacity);
    if k == 0 {
        return Vec::new();
    }
    if k == 1 {
        return vec![points];
    }

    let coords: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [p.coordinates.longitude, p.coordinates.latitude])
        .collect();

    let (mut assignments, centers) = kmeans(&coords, k, params.max_iterations);
    if params.enforce_capacity {
        rebalance(&coords, &mut assignments, &centers, params.capacity);
    }

    let mut clusters: Vec<Vec<DeliveryPoint>> = (0..k).map(|_| Vec::new()).collect();
    for (point, cluster) in points.into_iter().zip(assignments) {
        clusters[cluster].push(point);
    }
    clusters.retain(|c| !c.is_empty());

    debug!(
        k,
        clusters = clusters.len(),
        largest = clusters.iter().map(Vec::len).max().unwrap_or(0),
        "Clustered points"
    );
    clusters
}

fn distance_sq(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

fn nearest_center(point: &[f64; 2], centers: &[[f64; 2]]) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (j, center) in centers.iter().enumerate() {
        let dist = distance_sq(point, center);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = j;
        }
    }
    best_cluster
}

/// Lloyd iterations from farthest-point seeds. Returns the assignment of
/// every point and the final centers.
fn kmeans(coords: &[[f64; 2]], k: usize, max_iterations: usize) -> (Vec<usize>, Vec<[f64; 2]>) {
    let mut centers: Vec<[f64; 2]> = Vec::with_capacity(k);
    centers.push(coords[0]);

    for _ in 1..k {
        let mut best_idx = 0;
        let mut best_dist = -1.0;
        for (i, c) in coords.iter().enumerate() {
            let min_dist = centers
                .iter()
                .map(|center| distance_sq(c, center))
                .fold(f64::INFINITY, f64::min);
            if min_dist > best_dist {
                best_dist = min_dist;
                best_idx = i;
            }
        }
        centers.push(coords[best_idx]);
    }

    let mut assignments = vec![usize::MAX; coords.len()];

    for _ in 0..max_iterations.max(1) {
        let mut changed = false;
        for (i, c) in coords.iter().enumerate() {
            let cluster = nearest_center(c, &centers);
            if assignments[i] != cluster {
                assignments[i] = cluster;
                changed = true;
            }
        }

        if !changed {
            break;
        }

        let mut sums = vec![[0.0, 0.0]; k];
        let mut counts = vec![0usize; k];
        for (c, &cluster) in coords.iter().zip(&assignments) {
            sums[cluster][0] += c[0];
            sums[cluster][1] += c[1];
            counts[cluster] += 1;
        }
        for j in 0..k {
            if counts[j] > 0 {
                centers[j] = [sums[j][0] / counts[j] as f64, sums[j][1] / counts[j] as f64];
            }
        }
    }

    (assignments, centers)
}

/// Moves points out of overfull clusters until every cluster holds at most
/// `capacity` points.
///
/// An overfull cluster gives up its points farthest from its center first,
/// each to the closest cluster that still has room.
fn rebalance(coords: &[[f64; 2]], assignments: &mut [usize], centers: &[[f64; 2]], capacity: usize) {
    let capacity = capacity.max(1);
    let mut sizes = vec![0usize; centers.len()];
    for &cluster in assignments.iter() {
        sizes[cluster] += 1;
    }

    for cluster in 0..centers.len() {
        if sizes[cluster] <= capacity {
            continue;
        }

        let mut members: Vec<usize> = (0..coords.len())
            .filter(|&i| assignments[i] == cluster)
            .collect();
        members.sort_by(|&a, &b| {
            distance_sq(&coords[b], &centers[cluster])
                .total_cmp(&distance_sq(&coords[a], &centers[cluster]))
                .then(a.cmp(&b))
        });

        for i in members {
            if sizes[cluster] <= capacity {
                break;
            }
            let target = (0..centers.len())
                .filter(|&j| j != cluster && sizes[j] < capacity)
                .min_by(|&a, &b| {
                    distance_sq(&coords[i], &centers[a]).total_cmp(&distance_sq(&coords[i], &centers[b]))
                });
            let Some(target) = target else { break };

            assignments[i] = target;
            sizes[cluster] -= 1;
            sizes[target] += 1;
        }
    }
}
