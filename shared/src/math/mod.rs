mod affine_transform;
mod box3;
mod net_field;
mod polyhedron;

pub use affine_transform::AffineTransform;
pub use box3::Box3;
pub use net_field::{NetField, LONG_STRING_FIELD_LENGTH};
pub use polyhedron::{Edge, Plane, Polyhedron, PolyhedronParseError};
