//! Location extraction from free text.

use crate::dataset::Dataset;

/// Find the dataset localities mentioned in `message`.
///
/// Every distinct location value whose lowercase form occurs anywhere in the
/// lowercased message is returned, once, in dataset order. Overlapping names
/// are not disambiguated: "Punewadi" in the text matches both "Pune" and
/// "Punewadi" when both are locations.
pub fn extract_locations(message: &str, dataset: &Dataset, location_column: &str) -> Vec<String> {
    let text = message.to_lowercase();

    dataset
        .distinct_values(location_column)
        .into_iter()
        .filter(|location| text.contains(&location.to_lowercase()))
        .collect()
}
