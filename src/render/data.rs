//! Record extraction from opaque statistics payloads.
//!
//! The statistics API is an external collaborator whose wire format this
//! crate does not own. Render delegates only assume that a payload is a list
//! of flat records, delivered either as a bare array, as `{ "data": [...] }`,
//! or as a GeoJSON FeatureCollection whose features carry the record in
//! `properties`. Anything else yields no records.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::model::RegionLevel;
use crate::state::MapView;

/// A flat statistics record.
pub type Record = Map<String, Value>;

/// Label used for province-level groups when records carry no province.
pub const WHOLE_PROVINCE: &str = "전체";

/// Extract the records of a payload.
pub fn records(data: Option<&Value>) -> Vec<&Record> {
    let items = match data {
        Some(Value::Array(items)) => items,
        Some(Value::Object(object)) => {
            if let Some(Value::Array(features)) = object.get("features") {
                return features
                    .iter()
                    .filter_map(|feature| feature.get("properties"))
                    .filter_map(Value::as_object)
                    .collect();
            }
            match object.get("data") {
                Some(Value::Array(items)) => items,
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    items.iter().filter_map(Value::as_object).collect()
}

/// Numeric field; numeric strings are accepted.
pub fn number(record: &Record, key: &str) -> Option<f64> {
    let value: Option<f64> = match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// String field.
pub fn text<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Grouping label of a field: strings as-is, numbers formatted.
pub fn label(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The record's `year`, numeric or string.
pub fn year(record: &Record) -> Option<i32> {
    match record.get("year")? {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a string field matches an optional selection (`None` = all).
pub fn matches(record: &Record, key: &str, selected: Option<&str>) -> bool {
    match selected {
        Some(wanted) => text(record, key) == Some(wanted),
        None => true,
    }
}

/// Whether the record's year matches an optional selection (`None` = all).
pub fn matches_year(record: &Record, selected: Option<i32>) -> bool {
    match selected {
        Some(wanted) => year(record) == Some(wanted),
        None => true,
    }
}

/// Whether a record is an urban neighbourhood (township name ending in 동).
pub fn is_dong(record: &Record) -> bool {
    text(record, RegionLevel::Township.record_key())
        .map(|name| name.ends_with('동'))
        .unwrap_or(false)
}

/// Records that pass the map's region filter and dong toggle.
pub fn in_scope<'a, S>(view: &MapView<'_, S>, records: Vec<&'a Record>) -> Vec<&'a Record> {
    let fields = view.fields;
    let unfiltered = fields.region_filter.is_unfiltered();
    records
        .into_iter()
        .filter(|record| unfiltered || fields.region_filter.accepts(record))
        .filter(|record| !(fields.exclude_dong && is_dong(record)))
        .collect()
}

fn region_label(record: &Record, level: RegionLevel) -> Option<String> {
    match label(record, level.record_key()) {
        Some(name) => Some(name),
        None if level == RegionLevel::Province => Some(WHOLE_PROVINCE.to_string()),
        None => None,
    }
}

/// Sum `value_key` per group of `group_key`, ordered by group label.
pub fn sum_by(records: &[&Record], group_key: &str, value_key: &str) -> Vec<(String, f64)> {
    sum_grouped(records, |record| label(record, group_key), value_key)
}

/// Sum `value_key` per region of `level`.
pub fn sum_by_region(
    records: &[&Record],
    level: RegionLevel,
    value_key: &str,
) -> Vec<(String, f64)> {
    sum_grouped(records, |record| region_label(record, level), value_key)
}

fn sum_grouped<F>(records: &[&Record], group_of: F, value_key: &str) -> Vec<(String, f64)>
where
    F: Fn(&Record) -> Option<String>,
{
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        if let (Some(group), Some(value)) = (group_of(*record), number(record, value_key)) {
            *groups.entry(group).or_default() += value;
        }
    }
    groups.into_iter().collect()
}

/// Mean of `value_key` per group of `group_key`.
pub fn mean_by(records: &[&Record], group_key: &str, value_key: &str) -> Vec<(String, f64)> {
    mean_grouped(records, |record| label(record, group_key), value_key)
}

/// Mean of `value_key` per region of `level`.
pub fn mean_by_region(
    records: &[&Record],
    level: RegionLevel,
    value_key: &str,
) -> Vec<(String, f64)> {
    mean_grouped(records, |record| region_label(record, level), value_key)
}

fn mean_grouped<F>(records: &[&Record], group_of: F, value_key: &str) -> Vec<(String, f64)>
where
    F: Fn(&Record) -> Option<String>,
{
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in records {
        if let (Some(group), Some(value)) = (group_of(*record), number(record, value_key)) {
            let entry = groups.entry(group).or_default();
            entry.0 += value;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(group, (sum, count))| (group, sum / count as f64))
        .collect()
}

/// `numerator / denominator` in percent per group of `group_key`.
///
/// Both sides are summed before dividing; groups whose denominator sums to
/// zero are dropped.
pub fn ratio_by(
    records: &[&Record],
    group_key: &str,
    numerator: &str,
    denominator: &str,
) -> Vec<(String, f64)> {
    ratio_grouped(records, |record| label(record, group_key), numerator, denominator)
}

/// `numerator / denominator` in percent per region of `level`.
pub fn ratio_by_region(
    records: &[&Record],
    level: RegionLevel,
    numerator: &str,
    denominator: &str,
) -> Vec<(String, f64)> {
    ratio_grouped(records, |record| region_label(record, level), numerator, denominator)
}

fn ratio_grouped<F>(
    records: &[&Record],
    group_of: F,
    numerator: &str,
    denominator: &str,
) -> Vec<(String, f64)>
where
    F: Fn(&Record) -> Option<String>,
{
    let mut groups: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for record in records {
        let Some(group) = group_of(*record) else {
            continue;
        };
        if let (Some(num), Some(den)) = (number(record, numerator), number(record, denominator)) {
            let entry = groups.entry(group).or_default();
            entry.0 += num;
            entry.1 += den;
        }
    }
    groups
        .into_iter()
        .filter(|(_, (_, den))| *den > 0.0)
        .map(|(group, (num, den))| (group, num / den * 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_from_array_and_wrappers() {
        let array = json!([{ "a": 1 }, 2, { "a": 3 }]);
        assert_eq!(records(Some(&array)).len(), 2);

        let wrapped = json!({ "data": [{ "a": 1 }] });
        assert_eq!(records(Some(&wrapped)).len(), 1);

        let geojson = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "township": "한림읍" }, "geometry": null },
                { "type": "Feature", "geometry": null }
            ]
        });
        let extracted = records(Some(&geojson));
        assert_eq!(extracted.len(), 1);
        assert_eq!(text(extracted[0], "township"), Some("한림읍"));

        assert!(records(None).is_empty());
        assert!(records(Some(&json!("oops"))).is_empty());
    }

    #[test]
    fn test_number_accepts_strings() {
        let record = json!({ "a": "1,234.5", "b": 7, "c": "n/a" });
        let record = record.as_object().unwrap();
        assert_eq!(number(record, "a"), Some(1234.5));
        assert_eq!(number(record, "b"), Some(7.0));
        assert_eq!(number(record, "c"), None);
    }

    #[test]
    fn test_year_and_matching() {
        let record = json!({ "year": "2023", "crop": "감자" });
        let record = record.as_object().unwrap();
        assert_eq!(year(record), Some(2023));
        assert!(matches_year(record, Some(2023)));
        assert!(!matches_year(record, Some(2022)));
        assert!(matches(record, "crop", None));
        assert!(!matches(record, "crop", Some("당근")));
    }

    #[test]
    fn test_sum_and_mean_by_region() {
        let data = json!([
            { "township": "구좌읍", "area": 10 },
            { "township": "구좌읍", "area": 5 },
            { "township": "성산읍", "area": 2 },
            { "area": 100 }
        ]);
        let all = records(Some(&data));

        let sums = sum_by_region(&all, RegionLevel::Township, "area");
        assert_eq!(sums, vec![("구좌읍".to_string(), 15.0), ("성산읍".to_string(), 2.0)]);

        let means = mean_by_region(&all, RegionLevel::Township, "area");
        assert_eq!(means[0], ("구좌읍".to_string(), 7.5));

        let province = sum_by_region(&all, RegionLevel::Province, "area");
        assert_eq!(province, vec![(WHOLE_PROVINCE.to_string(), 117.0)]);
    }

    #[test]
    fn test_ratio_by() {
        let data = json!([
            { "year": 2022, "over65": 30, "farmers": 100 },
            { "year": 2022, "over65": 20, "farmers": 100 },
            { "year": 2023, "over65": 0, "farmers": 0 }
        ]);
        let all = records(Some(&data));
        assert_eq!(ratio_by(&all, "year", "over65", "farmers"), vec![("2022".to_string(), 25.0)]);
    }

    #[test]
    fn test_is_dong() {
        let dong = json!({ "township": "일도1동" });
        let eup = json!({ "township": "애월읍" });
        assert!(is_dong(dong.as_object().unwrap()));
        assert!(!is_dong(eup.as_object().unwrap()));
    }
}
