use crate::containment::is_inside_polygon;
use crate::error::StoreError;
use crate::store::CoordinateStore;
use rid_geo::{Coordinate, distance_to_segment_km, ray_hits_edge};
use rid_storage::BorderRecord;

/// Vertices appended when a pruned polygon is closed synthetically.
pub const CLOSING_VERTICES: usize = 5;

/// Position of the replaceable closing vertex, counted back from the end of the buffer.
const CLOSING_PIVOT_FROM_END: usize = 4;

/// What a single border record means for the polygon being walked.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Nothing,
    Edge(Coordinate, Coordinate),
    /// The current polygon ended; carries the implicit edge back to its first vertex if the
    /// raw data did not repeat it.
    Closed(Option<(Coordinate, Coordinate)>),
}

/// Splits a border stream into polygons and edges. Polygons are numbered from 1 in the order
/// they appear; delimiters without vertices in between do not count.
#[derive(Debug, Default)]
struct BorderWalker {
    polygon: usize,
    first: Option<Coordinate>,
    previous: Option<Coordinate>,
}

impl BorderWalker {
    fn push(&mut self, record: BorderRecord) -> Step {
        match record {
            BorderRecord::Delimiter => self.close(),
            BorderRecord::Vertex(vertex) => match self.previous.replace(vertex) {
                Some(previous) => Step::Edge(previous, vertex),
                None => {
                    self.polygon += 1;
                    self.first = Some(vertex);
                    Step::Nothing
                }
            },
        }
    }

    fn close(&mut self) -> Step {
        match (self.first.take(), self.previous.take()) {
            (Some(first), Some(last)) if first != last => Step::Closed(Some((last, first))),
            (Some(_), Some(_)) => Step::Closed(None),
            _ => Step::Nothing,
        }
    }

    fn polygon(&self) -> usize {
        self.polygon
    }
}

/// Finds which polygon of the full, unpruned border stream contains `origin`.
#[derive(Debug)]
pub struct ReferenceScan {
    origin: Coordinate,
    walker: BorderWalker,
    inside: bool,
    found: Option<usize>,
}

impl ReferenceScan {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            walker: BorderWalker::default(),
            inside: false,
            found: None,
        }
    }

    pub fn push(&mut self, record: BorderRecord) {
        if self.found.is_some() {
            return;
        }
        match self.walker.push(record) {
            Step::Nothing => {}
            Step::Edge(a, b) => self.inside ^= self.hits(a, b),
            Step::Closed(closing) => self.finish_polygon(closing),
        }
    }

    /// 1-based index of the containing polygon, once known.
    pub fn found(&self) -> Option<usize> {
        self.found
    }

    /// Ends the stream and returns the containing polygon index, or 0 for none.
    pub fn finish(mut self) -> usize {
        if self.found.is_none() {
            if let Step::Closed(closing) = self.walker.close() {
                self.finish_polygon(closing);
            }
        }
        self.found.unwrap_or(0)
    }

    fn finish_polygon(&mut self, closing: Option<(Coordinate, Coordinate)>) {
        if let Some((a, b)) = closing {
            self.inside ^= self.hits(a, b);
        }
        if self.inside {
            self.found = Some(self.walker.polygon());
        }
        self.inside = false;
    }

    fn hits(&self, a: Coordinate, b: Coordinate) -> bool {
        ray_hits_edge(
            self.origin.latitude,
            self.origin.longitude,
            a.latitude,
            a.longitude,
            b.latitude,
            b.longitude,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildLimits {
    /// Edges farther than this from the origin are dropped.
    pub max_distance_km: f64,
    /// Projection distance for synthetic closing vertices.
    pub closing_line_km: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub polygons_seen: usize,
    pub polygons_retained: usize,
    pub polygons_closed: usize,
    pub parity_flips: usize,
    /// Closed polygons whose parity still disagrees with the reference after the flip.
    pub parity_unresolved: usize,
}

/// Streams border records into a pruned vertex buffer.
///
/// Only edges within reach of the origin are kept. Each retained polygon ends with exactly one
/// [`Coordinate::ZERO`]: a lone separator when the retained arc already loops back to its first
/// vertex, otherwise the last vertex of a synthetic closing block whose side is chosen so that
/// containment of the origin agrees with `reference_polygon`.
pub struct PolygonBuilder<'a> {
    store: &'a mut CoordinateStore<Coordinate>,
    origin: Coordinate,
    limits: BuildLimits,
    reference_polygon: usize,
    walker: BorderWalker,
    first_retained: Option<Coordinate>,
    last_retained: Option<Coordinate>,
    offset: usize,
    summary: BuildSummary,
}

impl<'a> PolygonBuilder<'a> {
    pub fn new(
        store: &'a mut CoordinateStore<Coordinate>,
        origin: Coordinate,
        limits: BuildLimits,
        reference_polygon: usize,
    ) -> Self {
        let offset = store.len();
        Self {
            store,
            origin,
            limits,
            reference_polygon,
            walker: BorderWalker::default(),
            first_retained: None,
            last_retained: None,
            offset,
            summary: BuildSummary::default(),
        }
    }

    pub fn push(&mut self, record: BorderRecord) -> Result<(), StoreError> {
        match self.walker.push(record) {
            Step::Nothing => Ok(()),
            Step::Edge(a, b) => self.consider_edge(a, b),
            Step::Closed(closing) => self.finish_polygon(closing),
        }
    }

    pub fn finish(mut self) -> Result<BuildSummary, StoreError> {
        if let Step::Closed(closing) = self.walker.close() {
            self.finish_polygon(closing)?;
        }
        self.summary.polygons_seen = self.walker.polygon();
        Ok(self.summary)
    }

    fn consider_edge(&mut self, a: Coordinate, b: Coordinate) -> Result<(), StoreError> {
        if a == b || distance_to_segment_km(self.origin, a, b) >= self.limits.max_distance_km {
            return Ok(());
        }

        self.store.reserve(2)?;
        if self.last_retained != Some(a) {
            self.store.push(a)?;
        }
        self.store.push(b)?;

        self.first_retained.get_or_insert(a);
        self.last_retained = Some(b);
        Ok(())
    }

    fn finish_polygon(&mut self, closing: Option<(Coordinate, Coordinate)>) -> Result<(), StoreError> {
        if let Some((a, b)) = closing {
            self.consider_edge(a, b)?;
        }

        match (self.first_retained.take(), self.last_retained.take()) {
            (Some(first), Some(last)) if first != last => {
                self.close_polygon(first, last)?;
                self.summary.polygons_retained += 1;
                self.summary.polygons_closed += 1;
            }
            (Some(_), Some(_)) => {
                self.store.push(Coordinate::ZERO)?;
                self.summary.polygons_retained += 1;
            }
            _ => {}
        }

        self.offset = self.store.len();
        Ok(())
    }

    /// Closes the open arc `first ..= last` with a path that stays outside the reachable radius:
    /// both ends are pushed outwards along their bearing from the origin and joined through a
    /// pivot projected from the origin towards their midpoint.
    fn close_polygon(&mut self, first: Coordinate, last: Coordinate) -> Result<(), StoreError> {
        self.store.reserve(CLOSING_VERTICES)?;

        let line_km = self.limits.closing_line_km;
        let projected_first = first.project(line_km, self.origin.bearing_to(first));
        let projected_last = last.project(line_km, self.origin.bearing_to(last));

        let midpoint = Coordinate::new(
            (projected_first.latitude + projected_last.latitude) / 2.0,
            (projected_first.longitude + projected_last.longitude) / 2.0,
        );
        let midpoint_bearing = self.origin.bearing_to(midpoint);
        let pivot = self.origin.project(line_km, midpoint_bearing);

        for vertex in [projected_last, pivot, projected_first, first, Coordinate::ZERO] {
            self.store.push(vertex)?;
        }

        self.correct_parity(midpoint_bearing);
        Ok(())
    }

    /// Moves the pivot to the opposite side of the origin if the closed polygon disagrees with
    /// the reference containment.
    fn correct_parity(&mut self, midpoint_bearing: f64) {
        let polygon = self.walker.polygon();
        let expected = self.reference_polygon == polygon;
        let inside = is_inside_polygon(self.store.as_slice(), self.origin, self.offset);
        if inside == expected {
            return;
        }

        let pivot = self
            .origin
            .project(-self.limits.closing_line_km, midpoint_bearing);
        let index = self.store.len() - CLOSING_PIVOT_FROM_END;
        if self.store.replace(index, pivot) {
            self.summary.parity_flips += 1;
            tracing::debug!(polygon, inside, expected, "closing pivot moved across origin");
        }

        // both pivots can fail when the origin sits almost on the retained edge
        if is_inside_polygon(self.store.as_slice(), self.origin, self.offset) != expected {
            self.summary.parity_unresolved += 1;
            tracing::warn!(
                polygon,
                expected,
                origin = %self.origin,
                "closing arc parity disagrees with reference"
            );
        }
    }
}
