//! GeoJSON adapter: parsing, measuring and conversion into kernel types.

use serde::{Deserialize, Serialize};

use crate::bounds::Box2;
use crate::error::{GeoJsonError, Result};
use crate::line_string::{LineString2, LineString3};
use crate::polygon::Polygon2;
use crate::vec::{angle_abc, vec2_from_slice, vec3_from_slice, Vec2, Vec3};

/// A GeoJSON position: `[x, y]` or `[x, y, z]` (extra components are
/// carried through untouched).
pub type Position = Vec<f64>;

/// Any GeoJSON value, geometry or container. The wire `type` field picks
/// the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJson>,
    },
    Feature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<serde_json::Value>,
        geometry: Box<GeoJson>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<serde_json::Value>,
    },
    FeatureCollection {
        features: Vec<GeoJson>,
    },
}

/// Planar and spatial length of the same line work, side by side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lengths {
    pub two_d: f64,
    pub three_d: f64,
}

impl GeoJson {
    /// Parses a GeoJSON document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or an unknown `type`.
    pub fn from_str(s: &str) -> Result<Self> {
        let parsed = serde_json::from_str(s).map_err(GeoJsonError::Parse)?;
        Ok(parsed)
    }

    /// Serializes back to a GeoJSON document.
    ///
    /// # Errors
    ///
    /// Fails when serialization fails (non-finite numbers).
    pub fn to_json(&self) -> Result<String> {
        let out = serde_json::to_string(self).map_err(GeoJsonError::Parse)?;
        Ok(out)
    }

    /// Leaf geometries in document order, descending through features,
    /// feature collections and geometry collections.
    #[must_use]
    pub fn geometries(&self) -> Vec<&GeoJson> {
        let mut out = Vec::new();
        self.collect_geometries(&mut out);
        out
    }

    fn collect_geometries<'a>(&'a self, out: &mut Vec<&'a GeoJson>) {
        match self {
            GeoJson::Feature { geometry, .. } => geometry.collect_geometries(out),
            GeoJson::FeatureCollection { features } => {
                for f in features {
                    f.collect_geometries(out);
                }
            }
            GeoJson::GeometryCollection { geometries } => {
                for g in geometries {
                    g.collect_geometries(out);
                }
            }
            _ => out.push(self),
        }
    }

    /// Every position in the document, in order.
    #[must_use]
    pub fn positions(&self) -> Vec<&Position> {
        let mut out = Vec::new();
        for geom in self.geometries() {
            match geom {
                GeoJson::Point { coordinates } => out.push(coordinates),
                GeoJson::MultiPoint { coordinates } | GeoJson::LineString { coordinates } => {
                    out.extend(coordinates.iter());
                }
                GeoJson::MultiLineString { coordinates } | GeoJson::Polygon { coordinates } => {
                    for line in coordinates {
                        out.extend(line.iter());
                    }
                }
                GeoJson::MultiPolygon { coordinates } => {
                    for polygon in coordinates {
                        for ring in polygon {
                            out.extend(ring.iter());
                        }
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Planar bounding box over every position. Positions with fewer
    /// than 2 components are skipped.
    #[must_use]
    pub fn bounding_box(&self) -> Box2 {
        let mut b = Box2::empty();
        for p in self.positions() {
            if p.len() >= 2 {
                b.expand_point(&Vec2::new(p[0], p[1]));
            }
        }
        b
    }

    /// Summed polyline length over the first `max_component` axes, taken
    /// from line strings and polygon outer rings.
    #[must_use]
    pub fn length(&self, max_component: usize) -> f64 {
        let mut length = 0.0;
        for coords in self.measurable_lines() {
            for pair in coords.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let mut step = 0.0;
                for i in 0..a.len().min(b.len()).min(max_component) {
                    step += (a[i] - b[i]) * (a[i] - b[i]);
                }
                length += step.sqrt();
            }
        }
        length
    }

    /// Planar length, ignoring any z component.
    #[must_use]
    pub fn length_xy(&self) -> f64 {
        self.length(2)
    }

    /// Planar and spatial lengths in one pass. Positions without z
    /// contribute their planar length to both.
    #[must_use]
    pub fn lengths(&self) -> Lengths {
        let mut out = Lengths::default();
        for coords in self.measurable_lines() {
            for pair in coords.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                if a.len() < 2 || b.len() < 2 {
                    continue;
                }
                let step = ((a[0] - b[0]) * (a[0] - b[0]) + (a[1] - b[1]) * (a[1] - b[1])).sqrt();
                out.two_d += step;
                if a.len() >= 3 && b.len() >= 3 {
                    let dz = a[2] - b[2];
                    out.three_d += (step * step + dz * dz).sqrt();
                } else {
                    out.three_d += step;
                }
            }
        }
        out
    }

    /// Interior angle at each intermediate vertex of measurable lines, in
    /// radians. Degenerate arms are skipped.
    #[must_use]
    pub fn angles(&self) -> Vec<f64> {
        let mut out = Vec::new();
        for coords in self.measurable_lines() {
            if coords.len() < 3 {
                continue;
            }
            for w in coords.windows(3) {
                let (Ok(a), Ok(b), Ok(c)) = (
                    vec2_from_slice(&w[0]),
                    vec2_from_slice(&w[1]),
                    vec2_from_slice(&w[2]),
                ) else {
                    continue;
                };
                if let Some(angle) = angle_abc(&a, &b, &c) {
                    out.push(angle);
                }
            }
        }
        out
    }

    fn measurable_lines(&self) -> Vec<&Vec<Position>> {
        let mut out = Vec::new();
        for geom in self.geometries() {
            match geom {
                GeoJson::LineString { coordinates } => out.push(coordinates),
                GeoJson::Polygon { coordinates } => {
                    if let Some(outer) = coordinates.first() {
                        out.push(outer);
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Rewrites every position in place.
    pub fn transform(&mut self, f: &mut dyn FnMut(&mut Position)) {
        match self {
            GeoJson::Feature { geometry, .. } => geometry.transform(f),
            GeoJson::FeatureCollection { features } => {
                for feature in features {
                    feature.transform(f);
                }
            }
            GeoJson::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.transform(f);
                }
            }
            GeoJson::Point { coordinates } => f(coordinates),
            GeoJson::MultiPoint { coordinates } | GeoJson::LineString { coordinates } => {
                for p in coordinates {
                    f(p);
                }
            }
            GeoJson::MultiLineString { coordinates } | GeoJson::Polygon { coordinates } => {
                for line in coordinates {
                    for p in line {
                        f(p);
                    }
                }
            }
            GeoJson::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    for ring in polygon {
                        for p in ring {
                            f(p);
                        }
                    }
                }
            }
        }
    }

    /// Shifts every position by `delta`, component-wise over the shared
    /// length.
    pub fn translate(&mut self, delta: &[f64]) {
        self.transform(&mut |p: &mut Position| {
            for i in 0..p.len().min(delta.len()) {
                p[i] += delta[i];
            }
        });
    }

    /// Drops consecutive duplicate positions and re-closes polygon rings.
    pub fn clean(&mut self) {
        match self {
            GeoJson::Feature { geometry, .. } => geometry.clean(),
            GeoJson::FeatureCollection { features } => {
                for f in features {
                    f.clean();
                }
            }
            GeoJson::GeometryCollection { geometries } => {
                for g in geometries {
                    g.clean();
                }
            }
            GeoJson::LineString { coordinates } => clean_positions(coordinates),
            GeoJson::MultiLineString { coordinates } => {
                for line in coordinates {
                    clean_positions(line);
                }
            }
            GeoJson::Polygon { coordinates } => {
                for ring in coordinates {
                    clean_ring(ring);
                }
            }
            GeoJson::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    for ring in polygon {
                        clean_ring(ring);
                    }
                }
            }
            _ => {}
        }
    }

    /// Whether any polygon contains the position, holes respected.
    /// Boundary points count as outside.
    #[must_use]
    pub fn contains(&self, coord: &[f64]) -> bool {
        for geom in self.geometries() {
            match geom {
                GeoJson::Polygon { coordinates } => {
                    if polygon_contains(coordinates, coord) {
                        return true;
                    }
                }
                GeoJson::MultiPolygon { coordinates } => {
                    if coordinates.iter().any(|rings| polygon_contains(rings, coord)) {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// All points of Point/MultiPoint geometries.
    ///
    /// # Errors
    ///
    /// Fails on positions with fewer than 2 components.
    pub fn points_2d(&self) -> Result<Vec<Vec2>> {
        let mut out = Vec::new();
        for geom in self.geometries() {
            match geom {
                GeoJson::Point { coordinates } => out.push(vec2_from_slice(coordinates)?),
                GeoJson::MultiPoint { coordinates } => {
                    for p in coordinates {
                        out.push(vec2_from_slice(p)?);
                    }
                }
                _ => {}
            }
        }
        Ok(out)
    }

    /// All line strings, planar.
    ///
    /// # Errors
    ///
    /// Fails on positions with fewer than 2 components.
    pub fn line_strings_2d(&self) -> Result<Vec<LineString2>> {
        self.collect_line_strings(vec2_from_slice)
    }

    /// All line strings, lifted to 3D (missing z is zero).
    ///
    /// # Errors
    ///
    /// Fails on positions with fewer than 2 components.
    pub fn line_strings_3d(&self) -> Result<Vec<LineString3>> {
        self.collect_line_strings(vec3_from_slice)
    }

    fn collect_line_strings<V>(
        &self,
        convert: impl Fn(&[f64]) -> Result<V>,
    ) -> Result<Vec<crate::line_string::LineString<V>>>
    where
        V: crate::vec::Coord,
    {
        let mut out = Vec::new();
        for geom in self.geometries() {
            match geom {
                GeoJson::LineString { coordinates } => {
                    out.push(convert_line(coordinates, &convert)?);
                }
                GeoJson::MultiLineString { coordinates } => {
                    for line in coordinates {
                        out.push(convert_line(line, &convert)?);
                    }
                }
                _ => {}
            }
        }
        Ok(out)
    }

    /// Outer rings of all polygons, with the closing point stripped.
    ///
    /// # Errors
    ///
    /// Fails on positions with fewer than 2 components.
    pub fn polygons_2d(&self) -> Result<Vec<Polygon2>> {
        let mut out = Vec::new();
        for geom in self.geometries() {
            match geom {
                GeoJson::Polygon { coordinates } => {
                    if let Some(outer) = coordinates.first() {
                        out.push(ring_to_polygon(outer)?);
                    }
                }
                GeoJson::MultiPolygon { coordinates } => {
                    for rings in coordinates {
                        if let Some(outer) = rings.first() {
                            out.push(ring_to_polygon(outer)?);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(out)
    }

    #[must_use]
    pub fn from_point(p: &Vec2) -> Self {
        GeoJson::Point {
            coordinates: vec![p.x, p.y],
        }
    }

    #[must_use]
    pub fn from_point_3d(p: &Vec3) -> Self {
        GeoJson::Point {
            coordinates: vec![p.x, p.y, p.z],
        }
    }

    #[must_use]
    pub fn from_line_string(ls: &LineString2) -> Self {
        GeoJson::LineString {
            coordinates: ls.points.iter().map(|p| vec![p.x, p.y]).collect(),
        }
    }

    #[must_use]
    pub fn from_line_string_3d(ls: &LineString3) -> Self {
        GeoJson::LineString {
            coordinates: ls.points.iter().map(|p| vec![p.x, p.y, p.z]).collect(),
        }
    }

    /// Single-ring polygon; the closing point is restored.
    #[must_use]
    pub fn from_polygon(polygon: &Polygon2) -> Self {
        let mut ring: Vec<Position> = polygon.points.iter().map(|p| vec![p.x, p.y]).collect();
        if let Some(first) = ring.first().cloned() {
            ring.push(first);
        }
        GeoJson::Polygon {
            coordinates: vec![ring],
        }
    }
}

fn convert_line<V: crate::vec::Coord>(
    coords: &[Position],
    convert: &impl Fn(&[f64]) -> Result<V>,
) -> Result<crate::line_string::LineString<V>> {
    let points = coords
        .iter()
        .map(|p| convert(p))
        .collect::<Result<Vec<V>>>()?;
    Ok(crate::line_string::LineString::new(points))
}

fn ring_to_polygon(ring: &[Position]) -> Result<Polygon2> {
    let mut points = ring
        .iter()
        .map(|p| vec2_from_slice(p))
        .collect::<Result<Vec<Vec2>>>()?;
    if points.len() >= 2 && points.first() == points.last() {
        points.pop();
    }
    Ok(Polygon2::new(points))
}

fn positions_equal(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

fn clean_positions(coords: &mut Vec<Position>) {
    let mut out: Vec<Position> = Vec::with_capacity(coords.len());
    for p in coords.drain(..) {
        if out.last().is_none_or(|prev| !positions_equal(prev, &p)) {
            out.push(p);
        }
    }
    *coords = out;
}

fn clean_ring(ring: &mut Vec<Position>) {
    clean_positions(ring);
    if ring.len() >= 3 {
        if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
            if !positions_equal(first, last) {
                let first = first.clone();
                ring.push(first);
            }
        }
    }
}

fn ring_cross(a: &[f64], b: &[f64], p: &[f64]) -> f64 {
    (b[0] - a[0]) * (p[1] - a[1]) - (p[0] - a[0]) * (b[1] - a[1])
}

fn ring_contains_position(ring: &[Position], p: &[f64]) -> bool {
    use crate::vec::TOLERANCE;

    if p.len() < 2 {
        return false;
    }
    let mut wn = 0;
    let n = ring.len();
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if a.len() < 2 || b.len() < 2 {
            return false;
        }
        // Boundary positions count as outside. Zero-length edges (the
        // repeated closing position) contribute nothing.
        let len_sq = (b[0] - a[0]) * (b[0] - a[0]) + (b[1] - a[1]) * (b[1] - a[1]);
        if len_sq < TOLERANCE {
            continue;
        }
        let dot = (p[0] - a[0]) * (b[0] - a[0]) + (p[1] - a[1]) * (b[1] - a[1]);
        if ring_cross(a, b, p).abs() < TOLERANCE && (-TOLERANCE..=len_sq + TOLERANCE).contains(&dot)
        {
            return false;
        }
        if a[1] <= p[1] {
            if b[1] > p[1] && ring_cross(a, b, p) > 0.0 {
                wn += 1;
            }
        } else if b[1] <= p[1] && ring_cross(a, b, p) < 0.0 {
            wn -= 1;
        }
    }
    wn != 0
}

fn polygon_contains(rings: &[Vec<Position>], p: &[f64]) -> bool {
    let Some(outer) = rings.first() else {
        return false;
    };
    if !ring_contains_position(outer, p) {
        return false;
    }
    // A hit inside any hole is outside the polygon.
    !rings[1..].iter().any(|hole| ring_contains_position(hole, p))
}

/// Winding of a raw closed ring. `None` for fewer than 3 positions.
#[must_use]
pub fn is_clockwise(ring: &[Position]) -> Option<bool> {
    if ring.len() < 3 || ring.iter().any(|p| p.len() < 2) {
        return None;
    }
    let end = ring.len() - 1;
    let mut area = ring[end][0] * ring[0][1] - ring[0][0] * ring[end][1];
    for i in 0..end {
        area += ring[i][0] * ring[i + 1][1] - ring[i + 1][0] * ring[i][1];
    }
    Some(area > 0.0)
}
