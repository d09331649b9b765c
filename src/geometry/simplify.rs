use geo::{MultiPolygon, Polygon, Simplify};

/// Simplify every ring of a boundary before it is embedded in an Overpass
/// query. `epsilon` is in degrees; `0.0` leaves the boundary untouched.
///
/// Rings that would collapse below a triangle keep their original shape.
pub fn simplify_boundary(boundary: &MultiPolygon<f64>, epsilon: f64) -> MultiPolygon<f64> {
    if epsilon <= 0.0 {
        return boundary.clone();
    }

    boundary
        .iter()
        .map(|polygon| {
            let simplified = polygon.simplify(&epsilon);
            if simplified.exterior().0.len() < 4 {
                polygon.clone()
            } else {
                simplified
            }
        })
        .collect::<Vec<Polygon<f64>>>()
        .into()
}
