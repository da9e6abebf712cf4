//! Hover text for chart marks.

use crate::data::TreeRecord;

/// Distance in screen points within which the pointer picks a mark.
pub const HOVER_RADIUS: f64 = 8.0;

/// Id of the point nearest to `pointer`, if it lies within `radius`.
///
/// `scale` is screen points per plot unit along each axis.
pub fn nearest(
    points: impl IntoIterator<Item = (usize, [f64; 2])>,
    pointer: [f64; 2],
    scale: [f64; 2],
    radius: f64,
) -> Option<usize> {
    points
        .into_iter()
        .map(|(id, p)| {
            let dx = (p[0] - pointer[0]) * scale[0];
            let dy = (p[1] - pointer[1]) * scale[1];
            (id, dx * dx + dy * dy)
        })
        .filter(|(_, d)| *d <= radius * radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn date_text(record: &TreeRecord) -> String {
    record
        .date_planted
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Common-genera facets.
pub fn species(record: &TreeRecord) -> String {
    format!(
        "Species: {}\nDate planted: {}",
        record.species_name,
        date_text(record)
    )
}

/// Dashboard size view.
pub fn size_view(record: &TreeRecord) -> String {
    format!(
        "Neighbourhood: {}\nDiameter: {} in\nHeight range: {}",
        record.neighbourhood_name, record.diameter, record.height_range_id
    )
}

/// Planting-date rug.
pub fn planting(record: &TreeRecord) -> String {
    format!(
        "Genus: {}\nHeight range: {}\nDiameter: {} in",
        record.genus_name, record.height_range_id, record.diameter
    )
}
