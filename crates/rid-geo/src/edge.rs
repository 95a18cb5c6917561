/// Returns whether a ray cast from `(px, py)` towards increasing `x` crosses the segment
/// `(x1, y1)`-`(x2, y2)`.
///
/// The lower `y` bound is exclusive and the upper one inclusive, so a ray passing exactly
/// through a shared vertex is counted once. Summing hits over a closed boundary and taking the
/// parity gives the even-odd containment rule.
pub fn ray_hits_edge(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
    if py > y1.min(y2) && py <= y1.max(y2) && px <= x1.max(x2) && y1 != y2 {
        let x_intersect = (py - y1) * (x2 - x1) / (y2 - y1) + x1;
        return x1 == x2 || px <= x_intersect;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosses_vertical_edge_ahead() {
        assert!(ray_hits_edge(0.0, 0.0, 1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn misses_edge_behind() {
        assert!(!ray_hits_edge(2.0, 0.0, 1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn ignores_edges_parallel_to_ray() {
        assert!(!ray_hits_edge(0.0, 1.0, 1.0, 1.0, 3.0, 1.0));
    }

    #[test]
    fn shared_vertex_counts_once() {
        // both edges meet at (1, 0); only the edge whose upper end is the vertex counts
        let lower = ray_hits_edge(0.0, 0.0, 1.0, -1.0, 1.0, 0.0);
        let upper = ray_hits_edge(0.0, 0.0, 1.0, 0.0, 1.0, 1.0);
        assert!(lower ^ upper);
    }

    #[test]
    fn slanted_edge_uses_intersection() {
        // edge from (0, 0) to (4, 4) crosses y = 2 at x = 2
        assert!(ray_hits_edge(1.5, 2.0, 0.0, 0.0, 4.0, 4.0));
        assert!(!ray_hits_edge(2.5, 2.0, 0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn outside_y_range() {
        assert!(!ray_hits_edge(0.0, 5.0, 1.0, -1.0, 1.0, 1.0));
        assert!(!ray_hits_edge(0.0, -1.0, 1.0, -1.0, 1.0, 1.0));
    }
}
