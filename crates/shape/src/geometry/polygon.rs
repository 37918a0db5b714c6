use geo::Simplify;
use geo_types::{Coord, LineString};

/// Douglas-Peucker approximation of a closed ring.
///
/// The ring is split at two mutually distant anchor vertices (the first
/// point's farthest vertex, then that vertex's farthest), each open chain is
/// simplified with `epsilon`, and the chains are joined. The anchors are
/// always extreme points, so no mid-edge start point survives as a spurious
/// vertex. A split point can still land mid-edge when that edge runs nearly
/// parallel to the anchor chord, so vertices lying within `epsilon` of the
/// segment joining their neighbours are dropped afterwards. The result is
/// open (first point not repeated).
pub fn approximate_closed_polygon(ring: &[[i32; 2]], epsilon: f64) -> Vec<[i32; 2]> {
    if ring.len() <= 3 {
        return ring.to_vec();
    }

    let a = farthest_from(ring, 0);
    let b = farthest_from(ring, a);
    if a == b {
        return vec![ring[a]];
    }
    let (start, end) = (a.min(b), a.max(b));

    let forward: Vec<[i32; 2]> = ring[start..=end].to_vec();
    let backward: Vec<[i32; 2]> = ring[end..]
        .iter()
        .chain(ring[..=start].iter())
        .copied()
        .collect();

    let mut vertices = simplify_chain(&forward, epsilon);
    vertices.pop();
    let mut tail = simplify_chain(&backward, epsilon);
    tail.pop();
    vertices.append(&mut tail);
    drop_flat_vertices(&mut vertices, epsilon);
    vertices
}

/// Repeatedly remove the flattest vertex while it is closer than `epsilon`
/// to the segment between its neighbours.
fn drop_flat_vertices(vertices: &mut Vec<[i32; 2]>, epsilon: f64) {
    while vertices.len() > 3 {
        let n = vertices.len();
        let flattest = (0..n)
            .map(|i| {
                let prev = vertices[(i + n - 1) % n];
                let next = vertices[(i + 1) % n];
                (i, segment_distance(vertices[i], prev, next))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match flattest {
            Some((i, distance)) if distance < epsilon => {
                vertices.remove(i);
            }
            _ => break,
        }
    }
}

fn segment_distance(p: [i32; 2], a: [i32; 2], b: [i32; 2]) -> f64 {
    let [px, py] = [p[0] as f64, p[1] as f64];
    let [ax, ay] = [a[0] as f64, a[1] as f64];
    let [bx, by] = [b[0] as f64, b[1] as f64];
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return (px - ax).hypot(py - ay);
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0);
    (px - (ax + t * dx)).hypot(py - (ay + t * dy))
}

fn farthest_from(ring: &[[i32; 2]], from: usize) -> usize {
    let [fx, fy] = ring[from];
    let mut best = from;
    let mut best_dist = -1i64;
    for (i, &[x, y]) in ring.iter().enumerate() {
        let dx = (x - fx) as i64;
        let dy = (y - fy) as i64;
        let d = dx * dx + dy * dy;
        if d > best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

fn simplify_chain(chain: &[[i32; 2]], epsilon: f64) -> Vec<[i32; 2]> {
    let line: LineString<f64> = chain
        .iter()
        .map(|&[x, y]| Coord { x: x as f64, y: y as f64 })
        .collect::<Vec<_>>()
        .into();
    line.simplify(&epsilon)
        .coords()
        .map(|c| [c.x.round() as i32, c.y.round() as i32])
        .collect()
}
