//! Loading state boundary polygons from GeoJSON.
//!
//! Features are matched against the contiguous-US allow-list by name. The
//! collection's legacy `crs` member selects the source CRS; files without
//! one are taken to be NAD83 (EPSG:4269), as Census cartographic boundary
//! exports are.

use std::io::Read;
use std::path::Path;

use geo::MultiPolygon;
use hail_common::geojson::{Feature, FeatureCollection};
use hail_common::{is_contiguous_region, BoundaryPolygon, CrsCode};
use tracing::{debug, info, warn};

use crate::source::open_input;
use crate::{IngestionError, Result};

/// Property keys holding the region code, in lookup order.
const CODE_KEYS: [&str; 4] = ["region_code", "STATEFP", "GEOID", "STUSPS"];

/// Property keys holding the region name, in lookup order.
const NAME_KEYS: [&str; 3] = ["region_name", "NAME", "name"];

/// Regions kept after filtering, plus what was left out.
#[derive(Debug, Clone, Default)]
pub struct BoundaryLoad {
    /// Contiguous regions in file order
    pub regions: Vec<BoundaryPolygon>,
    /// Names of well-formed features outside the allow-list
    pub excluded: Vec<String>,
    /// Features without a usable name or polygonal geometry
    pub skipped: usize,
}

/// Resolve the source CRS declared by a collection.
fn collection_crs(fc: &FeatureCollection) -> Result<CrsCode> {
    let crs = match fc.crs_name() {
        Some(name) => CrsCode::from_identifier(name)
            .map_err(|_| IngestionError::UnsupportedCrs(name.to_string()))?,
        None => CrsCode::Epsg4269,
    };

    if !crs.is_geographic() {
        return Err(IngestionError::UnsupportedCrs(crs.to_string()));
    }
    Ok(crs)
}

fn feature_geometry(feature: &Feature) -> std::result::Result<MultiPolygon<f64>, String> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| "feature has no geometry".to_string())?
        .to_multi_polygon()?;

    if geometry.0.is_empty() {
        return Err("feature geometry is empty".to_string());
    }
    Ok(geometry)
}

/// Filter an already parsed collection down to the contiguous regions.
pub fn from_feature_collection(fc: FeatureCollection) -> Result<BoundaryLoad> {
    let crs = collection_crs(&fc)?;
    let mut load = BoundaryLoad::default();

    for (index, feature) in fc.features.iter().enumerate() {
        let Some(name) = feature.property_str(&NAME_KEYS) else {
            warn!(feature = index, "Skipping boundary feature without a name");
            load.skipped += 1;
            continue;
        };

        if !is_contiguous_region(&name) {
            debug!(region = %name, "Excluding region outside the contiguous US");
            load.excluded.push(name);
            continue;
        }

        let geometry = match feature_geometry(feature) {
            Ok(geometry) => geometry,
            Err(reason) => {
                warn!(feature = index, region = %name, %reason, "Skipping boundary feature");
                load.skipped += 1;
                continue;
            }
        };

        let code = feature.property_str(&CODE_KEYS).unwrap_or_default();
        load.regions.push(BoundaryPolygon::new(code, name, geometry, crs));
    }

    info!(
        regions = load.regions.len(),
        excluded = load.excluded.len(),
        skipped = load.skipped,
        %crs,
        "Loaded boundary polygons"
    );

    Ok(load)
}

/// Parse GeoJSON text and filter it to the contiguous regions.
pub fn read_boundaries<R: Read>(reader: R) -> Result<BoundaryLoad> {
    let fc: FeatureCollection = serde_json::from_reader(reader)?;
    from_feature_collection(fc)
}

/// Open a boundary file (optionally `.gz`) and load it.
pub fn load_boundaries(path: impl AsRef<Path>) -> Result<BoundaryLoad> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading boundaries");
    read_boundaries(open_input(path)?)
}
