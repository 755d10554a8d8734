use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// One vertex of a polygon ring, in original image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonPoint {
    pub x: i32,
    pub y: i32,
}

/// A closed outline. The closing edge from last to first vertex is implicit.
pub type Ring = Vec<PolygonPoint>;

/// Absolute polygon area by the shoelace formula.
pub fn ring_area(ring: &[PolygonPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for (i, p) in ring.iter().enumerate() {
        let q = &ring[(i + 1) % ring.len()];
        twice_area += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    (twice_area.abs() as f64) / 2.0
}

/// Trace the external outlines of a binary mask and simplify them.
///
/// Only outer borders count, holes are ignored. Rings smaller than
/// `min_area_ratio` times the largest ring are dropped as speckle, then each
/// survivor is simplified with Douglas-Peucker at a tolerance proportional to
/// its own perimeter. Rings come back largest first.
pub fn extract_polygon(
    mask: &GrayImage,
    min_area_ratio: f64,
    simplify_tolerance: f64,
) -> Vec<Ring> {
    let contours = find_contours::<i32>(mask);

    let mut rings: Vec<(f64, Vec<Point<i32>>)> = contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| c.points)
        .filter(|points| points.len() >= 3)
        .map(|points| (contour_area(&points), points))
        .collect();
    rings.sort_by(|a, b| b.0.total_cmp(&a.0));

    let largest = rings.first().map_or(0.0, |(area, _)| *area);
    if largest <= 0.0 {
        return Vec::new();
    }
    rings.retain(|(area, _)| *area >= min_area_ratio * largest);

    rings
        .into_iter()
        .filter_map(|(_, points)| {
            let epsilon = simplify_tolerance * arc_length(&points, true);
            let simplified = approximate_polygon_dp(&points, epsilon, true);
            if simplified.len() < 3 {
                return None;
            }
            Some(
                simplified
                    .into_iter()
                    .map(|p| PolygonPoint { x: p.x, y: p.y })
                    .collect(),
            )
        })
        .collect()
}

fn contour_area(points: &[Point<i32>]) -> f64 {
    let ring: Vec<PolygonPoint> = points
        .iter()
        .map(|p| PolygonPoint { x: p.x, y: p.y })
        .collect();
    ring_area(&ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::new(width, height)
    }

    fn fill_rect(mask: &mut GrayImage, x1: u32, y1: u32, x2: u32, y2: u32) {
        for y in y1..y2 {
            for x in x1..x2 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn shoelace_area_of_unit_square() {
        let ring = vec![
            PolygonPoint { x: 0, y: 0 },
            PolygonPoint { x: 10, y: 0 },
            PolygonPoint { x: 10, y: 10 },
            PolygonPoint { x: 0, y: 10 },
        ];
        assert_eq!(ring_area(&ring), 100.0);
    }

    #[test]
    fn area_is_orientation_independent() {
        let cw = vec![
            PolygonPoint { x: 0, y: 0 },
            PolygonPoint { x: 0, y: 10 },
            PolygonPoint { x: 10, y: 10 },
            PolygonPoint { x: 10, y: 0 },
        ];
        assert_eq!(ring_area(&cw), 100.0);
    }

    #[test]
    fn degenerate_rings_have_zero_area() {
        assert_eq!(ring_area(&[]), 0.0);
        assert_eq!(
            ring_area(&[PolygonPoint { x: 1, y: 1 }, PolygonPoint { x: 5, y: 5 }]),
            0.0
        );
    }

    #[test]
    fn single_blob_traces_one_ring() {
        let mut mask = blank(64, 64);
        fill_rect(&mut mask, 10, 10, 40, 40);

        let rings = extract_polygon(&mask, 0.20, 0.001);
        assert_eq!(rings.len(), 1);
        // a rectangle simplifies to roughly its corners
        assert!(rings[0].len() >= 3 && rings[0].len() <= 8);
        let area = ring_area(&rings[0]);
        assert!(area > 0.8 * 900.0 && area < 1.2 * 900.0);
    }

    #[test]
    fn speckle_below_area_ratio_is_dropped() {
        let mut mask = blank(100, 100);
        fill_rect(&mut mask, 10, 10, 60, 60); // area ~2500
        fill_rect(&mut mask, 80, 80, 84, 84); // area ~16, under 20%

        let rings = extract_polygon(&mask, 0.20, 0.001);
        assert_eq!(rings.len(), 1);
    }

    #[test]
    fn comparable_blobs_both_survive() {
        let mut mask = blank(100, 100);
        fill_rect(&mut mask, 5, 5, 40, 40);
        fill_rect(&mut mask, 55, 55, 88, 88);

        let rings = extract_polygon(&mask, 0.20, 0.001);
        assert_eq!(rings.len(), 2);
        // largest ring first
        assert!(ring_area(&rings[0]) >= ring_area(&rings[1]));
    }

    #[test]
    fn empty_mask_yields_no_rings() {
        let mask = blank(32, 32);
        assert!(extract_polygon(&mask, 0.20, 0.001).is_empty());
    }
}
