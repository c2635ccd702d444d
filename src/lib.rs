//! A 2D/3D computational geometry kernel: vectors with compass azimuths,
//! segments, rays, planes and half-planes, line strings, polygons with
//! clipping and triangulation, triangles, bounding volumes and a GeoJSON
//! adapter.

pub mod ball;
pub mod best_fit;
pub mod bounds;
pub mod convex_hull;
pub mod error;
pub mod farthest;
pub mod geojson;
pub mod limit;
pub mod line;
pub mod line_string;
pub mod plane;
pub mod polygon;
pub mod range;
pub mod ray;
pub mod stats;
pub mod triangle;
pub mod vec;

pub use error::{GeokernError, Result};
