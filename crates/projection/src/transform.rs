//! Batch reprojection of detections and boundary polygons.

use geo::{Coord, MapCoords};
use rayon::prelude::*;
use tracing::{debug, warn};

use hail_common::{BoundaryPolygon, Observation, PlanarPoint};

use crate::{ProjectionError, Reprojector, Result};

/// Outcome of projecting a batch of detections.
#[derive(Debug, Clone, Default)]
pub struct PointReprojection {
    /// Projected points, in input order.
    pub points: Vec<PlanarPoint>,
    /// Detections the projection could not map (dropped).
    pub failed: usize,
}

/// Project every observation onto the plane.
///
/// Runs as a parallel map; output order matches input order. Observations
/// that fail to project are dropped and counted rather than aborting the run.
pub fn reproject_points<R>(reprojector: &R, observations: Vec<Observation>) -> PointReprojection
where
    R: Reprojector + ?Sized,
{
    let total = observations.len();
    let projected: Vec<Option<PlanarPoint>> = observations
        .into_par_iter()
        .map(|obs| match reprojector.forward(obs.lon, obs.lat) {
            Ok((x, y)) => Some(PlanarPoint::new(obs, x, y)),
            Err(e) => {
                warn!(
                    station = %obs.station_id,
                    time = %obs.timestamp,
                    error = %e,
                    "Dropping detection that cannot be projected"
                );
                None
            }
        })
        .collect();

    let points: Vec<PlanarPoint> = projected.into_iter().flatten().collect();
    let failed = total - points.len();
    debug!(projected = points.len(), failed, "Reprojected detections");

    PointReprojection { points, failed }
}

/// Project boundary polygons coordinate by coordinate.
///
/// Any coordinate that fails to project fails the whole call: a partially
/// projected outline would silently corrupt the land mask.
pub fn reproject_boundaries<R>(
    reprojector: &R,
    boundaries: &[BoundaryPolygon],
) -> Result<Vec<BoundaryPolygon>>
where
    R: Reprojector + ?Sized,
{
    let target = reprojector.target_crs();

    boundaries
        .iter()
        .map(|region| {
            if !reprojector.accepts(region.crs) {
                return Err(ProjectionError::UnsupportedSourceCrs {
                    actual: region.crs,
                    target,
                });
            }

            let geometry = region.geometry.try_map_coords(|c: Coord<f64>| {
                reprojector
                    .forward(c.x, c.y)
                    .map(|(x, y)| Coord { x, y })
            })?;

            Ok(region.with_geometry(geometry, target))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LambertAzimuthalEqualArea;
    use chrono::NaiveDate;
    use geo::{polygon, MultiPolygon};
    use hail_common::CrsCode;

    fn obs(lon: f64, lat: f64) -> Observation {
        let t = NaiveDate::from_ymd_opt(2015, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Observation::new(t, lon, lat, 1.0).unwrap()
    }

    #[test]
    fn test_points_keep_order_and_drop_failures() {
        let proj = LambertAzimuthalEqualArea::us_national_atlas();
        let input = vec![obs(-100.0, 45.0), obs(80.0, -45.0), obs(-90.0, 40.0)];

        let result = reproject_points(&proj, input);
        assert_eq!(result.failed, 1);
        assert_eq!(result.points.len(), 2);
        assert_eq!(result.points[0].observation.lon, -100.0);
        assert_eq!(result.points[1].observation.lon, -90.0);
        assert!(result.points[1].x > 0.0);
    }

    #[test]
    fn test_boundaries_projected_to_target_crs() {
        let proj = LambertAzimuthalEqualArea::us_national_atlas();
        let square = polygon![(x: -101.0, y: 44.0), (x: -99.0, y: 44.0), (x: -99.0, y: 46.0), (x: -101.0, y: 46.0)];
        let region = BoundaryPolygon::new("46", "South Dakota", MultiPolygon(vec![square]), CrsCode::Epsg4269);

        let planar = reproject_boundaries(&proj, &[region]).unwrap();
        assert_eq!(planar.len(), 1);
        assert_eq!(planar[0].crs, CrsCode::Epsg2163);
        assert_eq!(planar[0].region_name, "South Dakota");

        let bbox = planar[0].bbox().unwrap();
        assert!(bbox.contains_point(0.0, 0.0), "centre of projection should fall inside {:?}", bbox);
    }

    #[test]
    fn test_planar_boundaries_rejected() {
        let proj = LambertAzimuthalEqualArea::us_national_atlas();
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        let region = BoundaryPolygon::new("1", "Already planar", MultiPolygon(vec![square]), CrsCode::Epsg2163);

        let err = reproject_boundaries(&proj, &[region]).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::UnsupportedSourceCrs {
                actual: CrsCode::Epsg2163,
                target: CrsCode::Epsg2163,
            }
        );
        let message = err.to_string();
        assert!(message.contains("EPSG:4269") && message.contains("EPSG:4326"), "{}", message);
    }

    #[test]
    fn test_out_of_range_longitude_counted_as_failure() {
        let proj = LambertAzimuthalEqualArea::us_national_atlas();
        let input = vec![obs(-97.0, 36.0), obs(1.0e20, 40.0), obs(-98.0, 38.0)];

        let result = reproject_points(&proj, input);
        assert_eq!(result.failed, 1);
        assert_eq!(result.points.len(), 2);
        assert_eq!(result.points[1].observation.lon, -98.0);
    }
}
