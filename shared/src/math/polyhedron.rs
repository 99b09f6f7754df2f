use std::str::FromStr;

use glam::Vec3;
use thiserror::Error;

use crate::{
    math::{
        net_field::{read_list, write_list},
        Box3, NetField,
    },
    BitReader, BitWrite, Serde, SerdeErr,
};

/// Half-space boundary through `origin`, facing `normal`. Normals built from
/// the console format are not normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self { origin, normal }
    }

    /// Signed distance scaled by the normal's length.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.normal)
    }
}

/// Edge between two faces (plane indices) and two vertices (point indices).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edge {
    pub face: [u32; 2],
    pub vertex: [u32; 2],
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolyhedronParseError {
    #[error("Polyhedron needs 12 numbers (origin and three edge vectors), found {found}")]
    WrongCount { found: usize },
    #[error("Polyhedron component {index} is not a number: {token:?}")]
    InvalidNumber { index: usize, token: String },
}

/// Convex solid described by its points, bounding planes and edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyhedron {
    pub points: Vec<Vec3>,
    pub planes: Vec<Plane>,
    pub edges: Vec<Edge>,
}

// [face0, face1, vertex0, vertex1] for the parallelepiped built by
// `from_corner`. Point i is the origin plus the edge vectors named by its
// subset: 0 {}, 1 {a}, 2 {b}, 3 {c}, 4 {a,b}, 5 {a,c}, 6 {b,c}, 7 {a,b,c}.
const BOX_EDGES: [[u32; 4]; 12] = [
    [0, 1, 0, 1],
    [5, 1, 2, 4],
    [0, 3, 3, 5],
    [5, 3, 6, 7],
    [2, 1, 0, 2],
    [4, 1, 1, 4],
    [2, 3, 3, 6],
    [4, 3, 5, 7],
    [2, 0, 0, 3],
    [4, 0, 1, 5],
    [2, 5, 2, 6],
    [4, 5, 4, 7],
];

impl Polyhedron {
    /// Parallelepiped spanned by three edge vectors from `origin`: 8 points,
    /// 6 planes and 12 edges. Plane normals point outward when `a`, `b`, `c`
    /// form a left-handed triple, as in the default trigger shape
    /// `0 0 0  1 0 0  0 -1 0  0 0 1`.
    pub fn from_corner(origin: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Self {
        let points = vec![
            origin,
            origin + a,
            origin + b,
            origin + c,
            origin + a + b,
            origin + a + c,
            origin + b + c,
            origin + a + b + c,
        ];
        let far = points[7];

        let planes = vec![
            Plane::new(origin, c.cross(a)),
            Plane::new(origin, a.cross(b)),
            Plane::new(origin, b.cross(c)),
            Plane::new(far, b.cross(a)),
            Plane::new(far, c.cross(b)),
            Plane::new(far, a.cross(c)),
        ];

        let edges = BOX_EDGES
            .iter()
            .map(|[face0, face1, vertex0, vertex1]| Edge {
                face: [*face0, *face1],
                vertex: [*vertex0, *vertex1],
            })
            .collect();

        Self {
            points,
            planes,
            edges,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Object-space bounds of the points, or the unit box when there are none.
    pub fn bounds(&self) -> Box3 {
        Box3::from_points(&self.points).unwrap_or(Box3::UNIT)
    }

    /// Whether `point` lies on the inner side of every plane.
    pub fn contains(&self, point: Vec3) -> bool {
        !self.planes.is_empty() && self.planes.iter().all(|plane| plane.distance_to(point) <= 0.0)
    }

    /// Console form: the origin corner and the three edge vectors. Only
    /// meaningful for polyhedra built by `from_corner`.
    pub fn to_console_string(&self) -> Option<String> {
        if self.points.len() != 8 {
            return None;
        }
        let origin = self.points[0];
        let vectors = [
            self.points[1] - origin,
            self.points[2] - origin,
            self.points[3] - origin,
        ];
        let mut parts = vec![origin];
        parts.extend(vectors);
        Some(
            parts
                .iter()
                .map(|v| format!("{} {} {}", v.x, v.y, v.z))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

impl FromStr for Polyhedron {
    type Err = PolyhedronParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        if tokens.len() != 12 {
            return Err(PolyhedronParseError::WrongCount {
                found: tokens.len(),
            });
        }

        let mut numbers = [0.0_f32; 12];
        for (index, token) in tokens.iter().enumerate() {
            numbers[index] = token
                .parse()
                .map_err(|_| PolyhedronParseError::InvalidNumber {
                    index,
                    token: token.to_string(),
                })?;
        }

        let vector = |start: usize| Vec3::from_slice(&numbers[start..start + 3]);
        Ok(Self::from_corner(vector(0), vector(3), vector(6), vector(9)))
    }
}

impl NetField for Plane {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        self.origin.write_field(writer);
        self.normal.write_field(writer);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let origin = Vec3::read_field(reader)?;
        let normal = Vec3::read_field(reader)?;
        Ok(Self { origin, normal })
    }
}

impl NetField for Edge {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        self.face[0].ser(writer);
        self.face[1].ser(writer);
        self.vertex[0].ser(writer);
        self.vertex[1].ser(writer);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let face = [u32::de(reader)?, u32::de(reader)?];
        let vertex = [u32::de(reader)?, u32::de(reader)?];
        Ok(Self { face, vertex })
    }
}

impl NetField for Polyhedron {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        write_list(writer, &self.points);
        write_list(writer, &self.planes);
        write_list(writer, &self.edges);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let points = read_list(reader)?;
        let planes = read_list(reader)?;
        let edges = read_list(reader)?;
        Ok(Self {
            points,
            planes,
            edges,
        })
    }
}
