//! Spherical Delaunay triangulation via the 3D convex hull.
//!
//! For points on the unit sphere the Delaunay triangulation coincides with
//! the convex hull of the point set, so the hull's triangles are exactly the
//! Delaunay triangles and its edges are the tile adjacencies. The build is
//! an incremental insertion hull; all predicates run in f64 to keep the
//! visibility tests stable for tightly clustered sites.

use glam::Vec3;

/// A hull triangle as indices into the input point slice.
pub type Triangle = [usize; 3];

#[derive(Debug)]
pub enum HullError {
    /// Fewer than four input points; no 3D hull exists.
    TooFewPoints,
    /// The input is degenerate (coincident or coplanar points) and no
    /// valid starting tetrahedron could be formed.
    Degenerate,
}

#[derive(Clone, Copy)]
struct DVec {
    x: f64,
    y: f64,
    z: f64,
}

impl DVec {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x as f64,
            y: v.y as f64,
            z: v.z as f64,
        }
    }

    fn sub(self, o: DVec) -> DVec {
        DVec {
            x: self.x - o.x,
            y: self.y - o.y,
            z: self.z - o.z,
        }
    }

    fn cross(self, o: DVec) -> DVec {
        DVec {
            x: self.y * o.z - self.z * o.y,
            y: self.z * o.x - self.x * o.z,
            z: self.x * o.y - self.y * o.x,
        }
    }

    fn dot(self, o: DVec) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

struct Face {
    verts: Triangle,
    normal: DVec,
}

impl Face {
    /// Builds a face oriented so its normal points away from `interior`.
    fn new(a: usize, b: usize, c: usize, points: &[DVec], interior: DVec) -> Self {
        let pa = points[a];
        let normal = points[b].sub(pa).cross(points[c].sub(pa));
        if normal.dot(interior.sub(pa)) > 0.0 {
            Self {
                verts: [a, c, b],
                normal: DVec {
                    x: -normal.x,
                    y: -normal.y,
                    z: -normal.z,
                },
            }
        } else {
            Self {
                verts: [a, b, c],
                normal,
            }
        }
    }

    fn sees(&self, p: DVec, points: &[DVec], eps: f64) -> bool {
        self.normal.dot(p.sub(points[self.verts[0]])) > eps
    }
}

/// Computes the convex hull of a point set, returning its triangles.
///
/// Insertion order is the input order, so the result is deterministic.
pub fn convex_hull(input: &[Vec3]) -> Result<Vec<Triangle>, HullError> {
    if input.len() < 4 {
        return Err(HullError::TooFewPoints);
    }
    let points: Vec<DVec> = input.iter().map(|&v| DVec::from(v)).collect();

    let (t0, t1, t2, t3) = initial_tetrahedron(&points)?;
    let interior = DVec {
        x: (points[t0].x + points[t1].x + points[t2].x + points[t3].x) / 4.0,
        y: (points[t0].y + points[t1].y + points[t2].y + points[t3].y) / 4.0,
        z: (points[t0].z + points[t1].z + points[t2].z + points[t3].z) / 4.0,
    };

    let mut faces = vec![
        Face::new(t0, t1, t2, &points, interior),
        Face::new(t0, t1, t3, &points, interior),
        Face::new(t0, t2, t3, &points, interior),
        Face::new(t1, t2, t3, &points, interior),
    ];

    // Visibility epsilon: sites are unit vectors, so absolute scale is ~1.
    let eps = 1e-12;

    for p in 0..points.len() {
        if p == t0 || p == t1 || p == t2 || p == t3 {
            continue;
        }
        let point = points[p];

        let visible: Vec<usize> = (0..faces.len())
            .filter(|&f| faces[f].sees(point, &points, eps))
            .collect();
        if visible.is_empty() {
            // Point lies inside (or exactly on) the current hull; coincident
            // sites end up here and surface later as an Euler violation.
            continue;
        }

        // Horizon: directed edges of visible faces whose reverse edge is not
        // also part of a visible face.
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for &f in &visible {
            let [a, b, c] = faces[f].verts;
            edges.push((a, b));
            edges.push((b, c));
            edges.push((c, a));
        }
        let horizon: Vec<(usize, usize)> = edges
            .iter()
            .filter(|(a, b)| !edges.contains(&(*b, *a)))
            .copied()
            .collect();

        // Remove visible faces (descending index so removals do not shift).
        for &f in visible.iter().rev() {
            faces.swap_remove(f);
        }

        for (a, b) in horizon {
            faces.push(Face::new(a, b, p, &points, interior));
        }
    }

    Ok(faces.into_iter().map(|f| f.verts).collect())
}

/// Picks four points spanning a non-degenerate tetrahedron.
fn initial_tetrahedron(points: &[DVec]) -> Result<(usize, usize, usize, usize), HullError> {
    let a = 0;

    // Farthest point from a.
    let b = (1..points.len())
        .max_by(|&i, &j| {
            let di = points[i].sub(points[a]).length();
            let dj = points[j].sub(points[a]).length();
            di.partial_cmp(&dj).unwrap()
        })
        .ok_or(HullError::TooFewPoints)?;
    if points[b].sub(points[a]).length() < 1e-9 {
        return Err(HullError::Degenerate);
    }

    let ab = points[b].sub(points[a]);

    // Point maximizing triangle area with a-b.
    let c = (0..points.len())
        .filter(|&i| i != a && i != b)
        .max_by(|&i, &j| {
            let ai = ab.cross(points[i].sub(points[a])).length();
            let aj = ab.cross(points[j].sub(points[a])).length();
            ai.partial_cmp(&aj).unwrap()
        })
        .ok_or(HullError::Degenerate)?;
    if ab.cross(points[c].sub(points[a])).length() < 1e-9 {
        return Err(HullError::Degenerate);
    }

    let normal = ab.cross(points[c].sub(points[a]));

    // Point maximizing distance from the a-b-c plane.
    let d = (0..points.len())
        .filter(|&i| i != a && i != b && i != c)
        .max_by(|&i, &j| {
            let di = normal.dot(points[i].sub(points[a])).abs();
            let dj = normal.dot(points[j].sub(points[a])).abs();
            di.partial_cmp(&dj).unwrap()
        })
        .ok_or(HullError::Degenerate)?;
    if normal.dot(points[d].sub(points[a])).abs() < 1e-12 {
        return Err(HullError::Degenerate);
    }

    Ok((a, b, c, d))
}
