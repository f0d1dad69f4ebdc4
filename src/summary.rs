//! Summary line rendering for tax-info responses
//!
//! The service response is untyped JSON. It is first classified into one of
//! three shapes, then rendered into a single line (records are put on
//! indented continuation lines). Required record fields are looked up
//! explicitly so a missing one is reported by its path.

use crate::query::TAX_YEAR;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::io;
use thiserror::Error;

/// Errors that can occur while rendering a summary
#[derive(Debug, Error)]
pub enum FormatError {
    /// An expected field is absent
    #[error("missing field '{0}' in tax info")]
    MissingField(String),

    /// A record is not a JSON object
    #[error("expected an object at '{0}'")]
    NotAnObject(String),

    /// An income field does not hold a number
    #[error("expected a number at '{0}'")]
    NotANumber(String),

    /// Re-serializing the response failed
    #[error("failed to serialize tax info: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Shape of a tax-info response
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaxInfo<'a> {
    /// An object carrying a `results` array
    Results {
        response: &'a Map<String, Value>,
        records: &'a [Value],
    },
    /// An object without a usable `results` array
    Object(&'a Map<String, Value>),
    /// Anything that is not an object
    Other(&'a Value),
}

impl<'a> TaxInfo<'a> {
    /// Classifies a response by its shape
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(response) => match response.get("results") {
                Some(Value::Array(records)) => TaxInfo::Results { response, records },
                _ => TaxInfo::Object(response),
            },
            other => TaxInfo::Other(other),
        }
    }
}

/// Fields of a single result record needed for the summary
#[derive(Debug)]
struct Record<'a> {
    name: &'a Value,
    birth_year: &'a Value,
    last_county: &'a Value,
    total_income: f64,
}

impl<'a> Record<'a> {
    fn from_value(value: &'a Value, index: usize) -> Result<Self, FormatError> {
        let path = format!("results[{}]", index);
        let record = as_object(value, &path)?;
        let name = field(record, &path, "name")?;
        let birth_year = field(record, &path, "birthYear")?;
        let last_county = field(record, &path, "lastCounty")?;

        let years_path = format!("{}.taxYears", path);
        let tax_years = as_object(field(record, &path, "taxYears")?, &years_path)?;
        let year_path = format!("{}.{}", years_path, TAX_YEAR);
        let year = as_object(field(tax_years, &years_path, TAX_YEAR)?, &year_path)?;
        let total_income = field(year, &year_path, "totalIncome")?
            .as_f64()
            .ok_or_else(|| FormatError::NotANumber(format!("{}.totalIncome", year_path)))?;

        Ok(Self {
            name,
            birth_year,
            last_county,
            total_income,
        })
    }

    fn render(&self) -> Result<String, FormatError> {
        Ok(format!(
            "{}({},{})={:.0}EUR",
            plain(self.name)?,
            plain(self.birth_year)?,
            plain(self.last_county)?,
            self.total_income
        ))
    }
}

/// Renders the summary line for a name
///
/// # Output
/// * Results array, empty: `"<name>: no data"`
/// * Results array, non-empty: `"<name> <count>: "` then one `"\n  "`-prefixed
///   line per record; `count` is echoed from the response, not recomputed
/// * Other object: `"<name>: "` followed by the object as single-line JSON
/// * Anything else: `"<name>: "` followed by the value's plain form
///
/// Any record missing a required field fails the whole summary.
pub fn format_summary(name: &str, tax_info: &Value) -> Result<String, FormatError> {
    match TaxInfo::classify(tax_info) {
        TaxInfo::Results { records, .. } if records.is_empty() => {
            Ok(format!("{}: no data", name))
        }
        TaxInfo::Results { response, records } => {
            let count = plain(field(response, "", "count")?)?;
            let mut line = format!("{} {}: ", name, count);
            for (index, value) in records.iter().enumerate() {
                let record = Record::from_value(value, index)?;
                line.push_str("\n  ");
                line.push_str(&record.render()?);
            }
            Ok(line)
        }
        TaxInfo::Object(_) => Ok(format!("{}: {}", name, to_spaced_json(tax_info)?)),
        TaxInfo::Other(value) => Ok(format!("{}: {}", name, plain(value)?)),
    }
}

/// Looks up a required field, reporting its full path when absent
fn field<'a>(
    object: &'a Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'a Value, FormatError> {
    object.get(key).ok_or_else(|| {
        let path = if parent.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", parent, key)
        };
        FormatError::MissingField(path)
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, FormatError> {
    value
        .as_object()
        .ok_or_else(|| FormatError::NotAnObject(path.to_string()))
}

/// Plain text form of a value: strings unquoted, containers as single-line JSON
fn plain(value: &Value) -> Result<String, FormatError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => to_spaced_json(value),
    }
}

/// Single-line JSON with `", "` and `": "` separators, non-ASCII kept as-is
fn to_spaced_json(value: &Value) -> Result<String, FormatError> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ann_smith() -> Value {
        json!({
            "count": 2,
            "results": [{
                "name": "Ann Smith",
                "birthYear": 1980,
                "lastCounty": "Helsinki",
                "taxYears": {"2024": {"totalIncome": 50000.4}}
            }]
        })
    }

    #[test]
    fn test_results_single_record() {
        assert_eq!(
            format_summary("Ann Smith", &ann_smith()).unwrap(),
            "Ann Smith 2: \n  Ann Smith(1980,Helsinki)=50000EUR"
        );
    }

    #[test]
    fn test_results_multiple_records_keep_order() {
        let info = json!({
            "count": 2,
            "results": [
                {"name": "A", "birthYear": 1970, "lastCounty": "Espoo",
                 "taxYears": {"2024": {"totalIncome": 10.25, "earnedIncome": 9}}},
                {"name": "B", "birthYear": 1990, "lastCounty": "Vantaa",
                 "taxYears": {"2023": {"totalIncome": 1}, "2024": {"totalIncome": 200}}}
            ]
        });

        assert_eq!(
            format_summary("AB", &info).unwrap(),
            "AB 2: \n  A(1970,Espoo)=10EUR\n  B(1990,Vantaa)=200EUR"
        );
    }

    #[test]
    fn test_count_is_echoed_not_recomputed() {
        let mut info = ann_smith();
        info["count"] = json!(57);
        let line = format_summary("Ann Smith", &info).unwrap();
        assert!(line.starts_with("Ann Smith 57: "));
    }

    #[test]
    fn test_empty_results_is_no_data() {
        let info = json!({"count": 0, "results": []});
        assert_eq!(format_summary("Jane Doe", &info).unwrap(), "Jane Doe: no data");
    }

    #[test]
    fn test_empty_results_does_not_need_count() {
        let info = json!({"results": []});
        assert_eq!(format_summary("Jane Doe", &info).unwrap(), "Jane Doe: no data");
    }

    #[test]
    fn test_object_without_results_is_dumped() {
        let info = json!({"error": "not found"});
        assert_eq!(format_summary("X", &info).unwrap(), "X: {\"error\": \"not found\"}");
    }

    #[test]
    fn test_object_dump_keeps_key_order_and_non_ascii() {
        let info = json!({"z": [1, 2], "å": {"b": null}});
        assert_eq!(
            format_summary("X", &info).unwrap(),
            "X: {\"z\": [1, 2], \"å\": {\"b\": null}}"
        );
    }

    #[test]
    fn test_non_array_results_is_dumped() {
        let info = json!({"count": 1, "results": "oops"});
        assert_eq!(
            format_summary("X", &info).unwrap(),
            "X: {\"count\": 1, \"results\": \"oops\"}"
        );
    }

    #[test]
    fn test_null_renders_as_null() {
        assert_eq!(format_summary("Y", &Value::Null).unwrap(), "Y: null");
    }

    #[test]
    fn test_scalars_render_plain() {
        assert_eq!(
            format_summary("S", &json!("down for maintenance")).unwrap(),
            "S: down for maintenance"
        );
        assert_eq!(format_summary("N", &json!(42)).unwrap(), "N: 42");
        assert_eq!(format_summary("B", &json!(false)).unwrap(), "B: false");
        assert_eq!(format_summary("L", &json!([1, "a"])).unwrap(), "L: [1, \"a\"]");
    }

    #[test]
    fn test_integer_income_and_rounding() {
        let mut info = ann_smith();
        info["results"][0]["taxYears"]["2024"]["totalIncome"] = json!(1234);
        assert!(format_summary("A", &info).unwrap().ends_with("=1234EUR"));

        info["results"][0]["taxYears"]["2024"]["totalIncome"] = json!(99.6);
        assert!(format_summary("A", &info).unwrap().ends_with("=100EUR"));
    }

    #[test]
    fn test_missing_record_field_fails_whole_summary() {
        let mut info = ann_smith();
        info["results"][0].as_object_mut().unwrap().remove("lastCounty");

        let err = format_summary("Ann Smith", &info).unwrap_err();

        assert!(matches!(err, FormatError::MissingField(ref path) if path == "results[0].lastCounty"));
    }

    #[test]
    fn test_missing_tax_year_fails() {
        let mut info = ann_smith();
        info["results"][0]["taxYears"] = json!({"2023": {"totalIncome": 1}});

        let err = format_summary("Ann Smith", &info).unwrap_err();

        assert!(matches!(err, FormatError::MissingField(ref path) if path == "results[0].taxYears.2024"));
    }

    #[test]
    fn test_missing_count_fails() {
        let mut info = ann_smith();
        info.as_object_mut().unwrap().remove("count");

        let err = format_summary("Ann Smith", &info).unwrap_err();

        assert!(matches!(err, FormatError::MissingField(ref path) if path == "count"));
    }

    #[test]
    fn test_non_numeric_income_fails() {
        let mut info = ann_smith();
        info["results"][0]["taxYears"]["2024"]["totalIncome"] = json!("lots");

        let err = format_summary("Ann Smith", &info).unwrap_err();

        assert!(matches!(err, FormatError::NotANumber(_)));
        assert!(err.to_string().contains("results[0].taxYears.2024.totalIncome"));
    }

    #[test]
    fn test_non_object_record_fails() {
        let info = json!({"count": 1, "results": ["Ann"]});
        let err = format_summary("Ann", &info).unwrap_err();
        assert!(matches!(err, FormatError::NotAnObject(ref path) if path == "results[0]"));
    }

    #[test]
    fn test_classify_shapes() {
        let results = json!({"results": []});
        let object = json!({"results": null});
        let other = json!(3);

        assert!(matches!(TaxInfo::classify(&results), TaxInfo::Results { .. }));
        assert!(matches!(TaxInfo::classify(&object), TaxInfo::Object(_)));
        assert_eq!(TaxInfo::classify(&other), TaxInfo::Other(&other));
    }

    #[test]
    fn test_format_is_deterministic() {
        let info = ann_smith();
        assert_eq!(
            format_summary("Ann Smith", &info).unwrap(),
            format_summary("Ann Smith", &info).unwrap()
        );
    }
}
