use geo::{line_string, ConvexHull, GeodesicArea, Haversine, Length, LineString, MultiPoint, Point};

/// hulls smaller than this are treated as collinear or coincident points
const MIN_HULL_AREA_KM2: f64 = 1e-9;

/// great-circle distance between two lon/lat points
pub fn compute_haversine(src_point: Point<f64>, dst_point: Point<f64>) -> uom::si::f64::Length {
    let line: LineString<f64> = line_string![src_point.0, dst_point.0];
    uom::si::f64::Length::new::<uom::si::length::meter>(Haversine.length(&line))
}

/// geodesic area in square kilometers of the convex hull around a set of lon/lat
/// points. returns None when fewer than three points are given or the hull is
/// degenerate (collinear or coincident points).
pub fn convex_hull_area_km2(points: &[Point<f64>]) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    let hull = MultiPoint::from(points.to_vec()).convex_hull();
    let area_km2 = hull.geodesic_area_unsigned() / 1_000_000.0;
    if area_km2.is_finite() && area_km2 > MIN_HULL_AREA_KM2 {
        Some(area_km2)
    } else {
        None
    }
}
