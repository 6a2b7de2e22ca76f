//! GeoJSON spatial predicates, decided from the DE-9IM matrix of the two
//! geometries. Operands that do not decode as a geometry (or a feature with
//! one) make every predicate false.

use geo::coordinate_position::CoordPos;
use geo::dimensions::{Dimensions, HasDimensions};
use geo::{Geometry, Relate};
use geojson::GeoJson;
use serde_json::Value;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoPredicate {
    Within,
    Contains,
    Disjoint,
    Crosses,
    Overlap,
}

pub fn to_geometry(value: &Value) -> Option<Geometry<f64>> {
    let decoded = GeoJson::from_json_value(value.clone()).ok()?;
    let geometry = match decoded {
        GeoJson::Geometry(g) => g,
        GeoJson::Feature(f) => f.geometry?,
        GeoJson::FeatureCollection(_) => return None,
    };
    Geometry::<f64>::try_from(geometry).ok()
}

fn rank(d: Dimensions) -> i8 {
    match d {
        Dimensions::Empty => -1,
        Dimensions::ZeroDimensional => 0,
        Dimensions::OneDimensional => 1,
        Dimensions::TwoDimensional => 2,
    }
}

pub fn evaluate(predicate: GeoPredicate, a: &Value, b: &Value) -> bool {
    let (Some(ga), Some(gb)) = (to_geometry(a), to_geometry(b)) else {
        trace!(?predicate, "operand is not a geometry");
        return false;
    };
    let im = ga.relate(&gb);
    let non_empty = |lhs: CoordPos, rhs: CoordPos| im.get(lhs, rhs) != Dimensions::Empty;
    let (da, db) = (rank(ga.dimensions()), rank(gb.dimensions()));
    match predicate {
        GeoPredicate::Within => im.is_within(),
        GeoPredicate::Contains => im.is_contains(),
        GeoPredicate::Disjoint => im.is_disjoint(),
        GeoPredicate::Crosses => {
            if da == 1 && db == 1 {
                im.get(CoordPos::Inside, CoordPos::Inside) == Dimensions::ZeroDimensional
            } else if da < db {
                non_empty(CoordPos::Inside, CoordPos::Inside)
                    && non_empty(CoordPos::Inside, CoordPos::Outside)
            } else if da > db {
                non_empty(CoordPos::Inside, CoordPos::Inside)
                    && non_empty(CoordPos::Outside, CoordPos::Inside)
            } else {
                false
            }
        }
        GeoPredicate::Overlap => {
            if da != db || da < 0 {
                return false;
            }
            let interiors = if da == 1 {
                im.get(CoordPos::Inside, CoordPos::Inside) == Dimensions::OneDimensional
            } else {
                non_empty(CoordPos::Inside, CoordPos::Inside)
            };
            interiors
                && non_empty(CoordPos::Inside, CoordPos::Outside)
                && non_empty(CoordPos::Outside, CoordPos::Inside)
        }
    }
}
