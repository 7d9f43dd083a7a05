//! Force-directed node placement (Fruchterman–Reingold).
//!
//! Positions start at random, so two layouts of the same graph differ. Edges
//! attract their endpoints, every node pair repels, and a cooling step bounds
//! how far a node may move per iteration. The result is rescaled to fill the
//! canvas minus `margin`.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    pub iterations: u32,
    /// Distance kept free between the outermost node centres and the canvas edge.
    pub margin: f64,
}

const MIN_DISTANCE: f64 = 0.01;

pub fn spring_layout<R: Rng>(
    node_count: usize,
    edges: &[(usize, usize)],
    params: &LayoutParams,
    rng: &mut R,
) -> Vec<Point> {
    let inner_w = (params.width - 2.0 * params.margin).max(1.0);
    let inner_h = (params.height - 2.0 * params.margin).max(1.0);
    let centre = Point { x: params.width / 2.0, y: params.height / 2.0 };

    match node_count {
        0 => return Vec::new(),
        1 => return vec![centre],
        _ => {}
    }

    let mut pos: Vec<Point> = (0..node_count)
        .map(|_| Point {
            x: rng.gen_range(0.0..inner_w),
            y: rng.gen_range(0.0..inner_h),
        })
        .collect();

    let k = (inner_w * inner_h / node_count as f64).sqrt();
    let iterations = params.iterations.max(1);
    let mut temperature = inner_w.max(inner_h) / 10.0;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut disp = vec![Point { x: 0.0, y: 0.0 }; node_count];

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let mut dx = pos[i].x - pos[j].x;
                let mut dy = pos[i].y - pos[j].y;
                if dx.abs() < MIN_DISTANCE && dy.abs() < MIN_DISTANCE {
                    // coincident nodes: push apart in a random direction
                    dx = rng.gen_range(-1.0..1.0);
                    dy = rng.gen_range(-1.0..1.0);
                }
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i].x += fx;
                disp[i].y += fy;
                disp[j].x -= fx;
                disp[j].y -= fy;
            }
        }

        for &(s, t) in edges {
            if s >= node_count || t >= node_count || s == t {
                continue;
            }
            let dx = pos[s].x - pos[t].x;
            let dy = pos[s].y - pos[t].y;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[s].x -= fx;
            disp[s].y -= fy;
            disp[t].x += fx;
            disp[t].y += fy;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d.x * d.x + d.y * d.y).sqrt();
            if len > 0.0 {
                let step = len.min(temperature);
                p.x = (p.x + d.x / len * step).clamp(0.0, inner_w);
                p.y = (p.y + d.y / len * step).clamp(0.0, inner_h);
            }
        }

        temperature = (temperature - cooling).max(MIN_DISTANCE);
    }

    rescale(&mut pos, params, inner_w, inner_h);
    pos
}

fn rescale(pos: &mut [Point], params: &LayoutParams, inner_w: f64, inner_h: f64) {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in pos.iter() {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let span_x = max_x - min_x;
    let span_y = max_y - min_y;

    for p in pos.iter_mut() {
        p.x = if span_x > MIN_DISTANCE {
            params.margin + (p.x - min_x) / span_x * inner_w
        } else {
            params.width / 2.0
        };
        p.y = if span_y > MIN_DISTANCE {
            params.margin + (p.y - min_y) / span_y * inner_h
        } else {
            params.height / 2.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> LayoutParams {
        LayoutParams { width: 800.0, height: 600.0, iterations: 50, margin: 40.0 }
    }

    #[test]
    fn test_empty_and_single_node() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(spring_layout(0, &[], &params(), &mut rng).is_empty());
        let one = spring_layout(1, &[], &params(), &mut rng);
        assert_eq!(one, vec![Point { x: 400.0, y: 300.0 }]);
    }

    #[test]
    fn test_positions_stay_inside_margin() {
        let mut rng = StdRng::seed_from_u64(42);
        let edges = [(0, 1), (1, 2), (2, 3), (0, 4), (4, 5)];
        let pos = spring_layout(6, &edges, &params(), &mut rng);
        assert_eq!(pos.len(), 6);
        for p in &pos {
            assert!(p.x.is_finite() && p.y.is_finite());
            assert!(p.x >= 40.0 - 1e-9 && p.x <= 760.0 + 1e-9, "x out of bounds: {}", p.x);
            assert!(p.y >= 40.0 - 1e-9 && p.y <= 560.0 + 1e-9, "y out of bounds: {}", p.y);
        }
    }

    #[test]
    fn test_nodes_do_not_collapse() {
        let mut rng = StdRng::seed_from_u64(3);
        let pos = spring_layout(4, &[(0, 1), (1, 2), (2, 3)], &params(), &mut rng);
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                let d = ((pos[i].x - pos[j].x).powi(2) + (pos[i].y - pos[j].y).powi(2)).sqrt();
                assert!(d > 1.0, "nodes {} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn test_out_of_range_edges_are_ignored() {
        let mut rng = StdRng::seed_from_u64(9);
        let pos = spring_layout(2, &[(0, 7), (1, 1)], &params(), &mut rng);
        assert_eq!(pos.len(), 2);
    }
}
