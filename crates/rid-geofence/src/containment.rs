use rid_geo::{Coordinate, ray_hits_edge};

/// Even-odd containment test over a vertex buffer holding one or more polygons separated by
/// [`Coordinate::ZERO`].
///
/// Scanning starts at `offset` and runs to the end of the buffer, so a caller can test one
/// polygon (the last one) or every polygon at once. Each run is closed back to its own first
/// vertex; a trailing run without a separator is closed as well. Buffers with fewer than three
/// vertices never contain anything.
pub fn is_inside_polygon(vertices: &[Coordinate], point: Coordinate, offset: usize) -> bool {
    if vertices.len() < 3 || offset >= vertices.len() {
        return false;
    }

    let hits_edge = |a: Coordinate, b: Coordinate| {
        ray_hits_edge(
            point.latitude,
            point.longitude,
            a.latitude,
            a.longitude,
            b.latitude,
            b.longitude,
        )
    };

    let mut hits = 0usize;
    let mut first: Option<Coordinate> = None;

    for pair in vertices[offset..].windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if current.is_zero() {
            first = None;
            continue;
        }
        if next.is_zero() {
            if let Some(first) = first {
                hits += hits_edge(current, first) as usize;
            }
        } else {
            first.get_or_insert(current);
            hits += hits_edge(current, next) as usize;
        }
    }

    if let (Some(first), Some(last)) = (first, vertices.last().copied()) {
        if !last.is_zero() {
            hits += hits_edge(last, first) as usize;
        }
    }

    hits % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, -1.0),
            Coordinate::new(-1.0, -1.0),
            Coordinate::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn center_of_square_is_inside() {
        assert!(is_inside_polygon(&square(), Coordinate::new(0.0, 0.0), 0));
        assert!(is_inside_polygon(&square(), Coordinate::new(0.5, -0.25), 0));
    }

    #[test]
    fn far_point_is_outside() {
        assert!(!is_inside_polygon(&square(), Coordinate::new(5.0, 5.0), 0));
        assert!(!is_inside_polygon(&square(), Coordinate::new(-3.0, 0.0), 0));
        assert!(!is_inside_polygon(&square(), Coordinate::new(0.0, 3.0), 0));
    }

    #[test]
    fn separator_terminated_polygon() {
        let mut vertices = square();
        vertices.push(Coordinate::new(1.0, 1.0));
        vertices.push(Coordinate::ZERO);
        assert!(is_inside_polygon(&vertices, Coordinate::new(0.2, 0.2), 0));
        assert!(!is_inside_polygon(&vertices, Coordinate::new(2.0, 0.2), 0));
    }

    #[test]
    fn several_polygons_share_one_buffer() {
        let mut vertices = square();
        vertices.push(Coordinate::ZERO);
        let offset = vertices.len();
        vertices.extend([
            Coordinate::new(11.0, 11.0),
            Coordinate::new(11.0, 9.0),
            Coordinate::new(9.0, 9.0),
            Coordinate::new(9.0, 11.0),
            Coordinate::ZERO,
        ]);

        let in_second = Coordinate::new(10.0, 10.0);
        let in_first = Coordinate::new(0.5, 0.5);
        assert!(is_inside_polygon(&vertices, in_second, 0));
        assert!(is_inside_polygon(&vertices, in_first, 0));
        assert!(is_inside_polygon(&vertices, in_second, offset));
        assert!(!is_inside_polygon(&vertices, in_first, offset));
        assert!(!is_inside_polygon(&vertices, Coordinate::new(5.0, 5.0), 0));
    }

    #[test]
    fn degenerate_buffers() {
        let two = [Coordinate::new(1.0, 1.0), Coordinate::new(-1.0, -1.0)];
        assert!(!is_inside_polygon(&two, Coordinate::new(0.0, 0.0), 0));
        assert!(!is_inside_polygon(&square(), Coordinate::new(0.0, 0.0), 10));
    }
}
