// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG (Constructive Solid Geometry) operations using BSP trees.
//!
//! Nodes live in an arena and every traversal uses an explicit stack. Convex
//! inputs such as a finely tessellated sphere produce a BSP chain as deep as
//! the polygon count, which would overflow the call stack if walked
//! recursively.

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

#[derive(Debug, Clone, Copy)]
struct Plane {
    normal: Vector3<f64>,
    w: f64,
}

impl Plane {
    fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(1e-300)?;
        Some(Self {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn classify(&self, point: &Point3<f64>, epsilon: f64) -> u8 {
        let distance = self.normal.dot(&point.coords) - self.w;
        if distance < -epsilon {
            BACK
        } else if distance > epsilon {
            FRONT
        } else {
            COPLANAR
        }
    }

    fn split(&self, polygon: Polygon, epsilon: f64) -> Split {
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| self.classify(v, epsilon))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, t| acc | t);

        match polygon_type {
            COPLANAR => {
                let facing_front = self.normal.dot(&polygon.plane.normal) > 0.0;
                Split::Coplanar {
                    polygon,
                    facing_front,
                }
            }
            FRONT => Split::Front(polygon),
            BACK => Split::Back(polygon),
            _ => {
                let n = polygon.vertices.len();
                let mut front = Vec::with_capacity(n + 1);
                let mut back = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                    if ti != BACK {
                        front.push(vi);
                    }
                    if ti != FRONT {
                        back.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        front.push(v);
                        back.push(v);
                    }
                }

                let plane = polygon.plane;
                Split::Spanning {
                    front: (front.len() >= 3).then(|| Polygon {
                        vertices: front,
                        plane,
                    }),
                    back: (back.len() >= 3).then(|| Polygon {
                        vertices: back,
                        plane,
                    }),
                }
            }
        }
    }
}

/// Convex planar polygon; keeps its source plane through splits
#[derive(Debug, Clone)]
struct Polygon {
    vertices: Vec<Point3<f64>>,
    plane: Plane,
}

impl Polygon {
    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

enum Split {
    Coplanar {
        polygon: Polygon,
        facing_front: bool,
    },
    Front(Polygon),
    Back(Polygon),
    Spanning {
        front: Option<Polygon>,
        back: Option<Polygon>,
    },
}

#[derive(Debug, Default)]
struct BspNode {
    plane: Option<Plane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

#[derive(Debug)]
struct BspTree {
    nodes: Vec<BspNode>,
    epsilon: f64,
}

impl BspTree {
    fn new(polygons: Vec<Polygon>, epsilon: f64) -> Self {
        let mut tree = Self {
            nodes: vec![BspNode::default()],
            epsilon,
        };
        tree.build(polygons);
        tree
    }

    fn push_node(&mut self) -> usize {
        self.nodes.push(BspNode::default());
        self.nodes.len() - 1
    }

    fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack = vec![(0usize, polygons)];

        while let Some((idx, polygons)) = stack.pop() {
            let Some(first) = polygons.first() else {
                continue;
            };
            let plane = *self.nodes[idx].plane.get_or_insert(first.plane);

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match plane.split(polygon, self.epsilon) {
                    Split::Coplanar { polygon, .. } => self.nodes[idx].polygons.push(polygon),
                    Split::Front(p) => front.push(p),
                    Split::Back(p) => back.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            if !front.is_empty() {
                let child = match self.nodes[idx].front {
                    Some(child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[idx].front = Some(child);
                        child
                    }
                };
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child = match self.nodes[idx].back {
                    Some(child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[idx].back = Some(child);
                        child
                    }
                };
                stack.push((child, back));
            }
        }
    }

    /// Remove the parts of `polygons` inside this tree's solid
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut stack = vec![(0usize, polygons)];

        while let Some((idx, polygons)) = stack.pop() {
            let node = &self.nodes[idx];
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match plane.split(polygon, self.epsilon) {
                    Split::Coplanar {
                        polygon,
                        facing_front,
                    } => {
                        if facing_front {
                            front.push(polygon);
                        } else {
                            back.push(polygon);
                        }
                    }
                    Split::Front(p) => front.push(p),
                    Split::Back(p) => back.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            match node.front {
                Some(child) => stack.push((child, front)),
                None => kept.extend(front),
            }
            // Back fragments with nowhere to go are inside: dropped
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }

        kept
    }

    fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    /// Swap solid and empty space
    fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = &mut node.plane {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            result.extend(node.polygons.iter().cloned());
            if let Some(back) = node.back {
                stack.push(back);
            }
            if let Some(front) = node.front {
                stack.push(front);
            }
        }
        result
    }
}

/// Convert mesh to polygons, skipping zero-area triangles
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangles
        .iter()
        .filter_map(|tri| {
            let [a, b, c] = mesh.triangle_positions(tri);
            Plane::from_points(&a, &b, &c).map(|plane| Polygon {
                vertices: vec![a, b, c],
                plane,
            })
        })
        .collect()
}

/// Convert polygons back to a mesh by fanning each convex polygon
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut mesh = Mesh::new();

    for poly in polygons {
        let normal = poly.plane.normal;
        let base = mesh.vertex_count();
        for p in &poly.vertices {
            mesh.add_vertex(Vertex::new(*p, normal));
        }
        for i in 1..poly.vertices.len() - 1 {
            mesh.add_triangle(Triangle::new([base, base + i, base + i + 1]));
        }
    }

    mesh
}

/// `a - b` for two closed meshes in the same frame
pub fn csg_difference(a: &Mesh, b: &Mesh, epsilon: f64) -> Mesh {
    let mut tree_a = BspTree::new(mesh_to_polygons(a), epsilon);
    let mut tree_b = BspTree::new(mesh_to_polygons(b), epsilon);

    tree_a.invert();
    tree_a.clip_to(&tree_b);
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_a.build(tree_b.all_polygons());
    tree_a.invert();

    polygons_to_mesh(&tree_a.all_polygons())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analytics::signed_volume;
    use crate::geometry::{Placement, Primitive};
    use crate::utils::math::regular_polygon_area;

    fn placed(primitive: Primitive, placement: Placement) -> Mesh {
        primitive.to_mesh().transformed(&placement.isometry())
    }

    #[test]
    fn test_hollow_cylinder_volume() {
        let outer = Primitive::cylinder(2.0, 10.0, 32).to_mesh();
        let bore = Primitive::cylinder(1.5, 12.0, 32).to_mesh();

        let result = csg_difference(&outer, &bore, 1e-9);
        let expected = (regular_polygon_area(2.0, 32) - regular_polygon_area(1.5, 32)) * 10.0;
        let volume = signed_volume(&result);
        assert!(
            (volume - expected).abs() < expected * 1e-9,
            "volume {volume} vs {expected}"
        );

        let bbox = result.bounding_box();
        assert!((bbox.max.z - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_cutter_removes_nothing() {
        let a = Primitive::cylinder(1.0, 1.0, 16).to_mesh();
        let b = placed(Primitive::cylinder(1.0, 1.0, 16), Placement::along_x(10.0));
        let result = csg_difference(&a, &b, 1e-9);
        assert!((signed_volume(&result) - signed_volume(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_swallowing_cutter_leaves_nothing() {
        let a = Primitive::cylinder(1.0, 1.0, 16).to_mesh();
        let b = Primitive::cylinder(3.0, 3.0, 16).to_mesh();
        let result = csg_difference(&a, &b, 1e-9);
        assert!(signed_volume(&result).abs() < 1e-9);
    }

    #[test]
    fn test_cross_bore_through_sphere() {
        // Ball with poles on Z, bored along Z; many-polygon convex input
        let ball = Primitive::sphere(1.0, 48, 24).to_mesh();
        let bore = Primitive::cylinder(0.5, 3.0, 32).to_mesh();
        let before = signed_volume(&ball);
        let after = signed_volume(&csg_difference(&ball, &bore, 1e-9));
        // Removed volume is between the bore prism clipped to the ball and
        // the full prism inside the ball's bounds
        let prism = regular_polygon_area(0.5, 32);
        assert!(
            after < before - prism * 1.5,
            "after {after}, before {before}"
        );
        assert!(
            after > before - prism * 2.0,
            "after {after}, before {before}"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = Primitive::cylinder(2.0, 4.0, 24).to_mesh();
        let b = placed(Primitive::cylinder(0.5, 6.0, 24), Placement::vertical(0.0));
        let first = csg_difference(&a, &b, 1e-9);
        let second = csg_difference(&a, &b, 1e-9);
        assert_eq!(first, second);
    }
}
