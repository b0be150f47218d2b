//! Cell rendering for columnar query results.
//!
//! Converts one value of a typed Arrow column into its canonical display
//! string. Dispatch is a closed match over the supported `DataType`s; any
//! other type fails with an error naming it, which aborts the whole table.

use std::time::Duration;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    Date32Type, Date64Type, DurationMicrosecondType, DurationMillisecondType,
    DurationNanosecondType, DurationSecondType, Float16Type, Float32Type, Float64Type, Int16Type,
    Int32Type, Int64Type, Int8Type, Time32MillisecondType, Time32SecondType,
    Time64MicrosecondType, Time64NanosecondType, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow_schema::{DataType, TimeUnit};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ClientError, Result};

/// Marker rendered for null cells regardless of column type.
pub const NULL_MARKER: &str = "NULL";

/// Display pattern shared by timestamps, dates and times-of-day.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Render the value of `column` at `row` as its display string.
pub fn render_value(column: &dyn Array, row: usize) -> Result<String> {
    if column.is_null(row) {
        return Ok(NULL_MARKER.to_string());
    }

    match column.data_type() {
        DataType::Timestamp(TimeUnit::Second, _) => datetime(
            column
                .as_primitive::<TimestampSecondType>()
                .value_as_datetime(row),
        ),
        DataType::Timestamp(TimeUnit::Millisecond, _) => datetime(
            column
                .as_primitive::<TimestampMillisecondType>()
                .value_as_datetime(row),
        ),
        DataType::Timestamp(TimeUnit::Microsecond, _) => datetime(
            column
                .as_primitive::<TimestampMicrosecondType>()
                .value_as_datetime(row),
        ),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => datetime(
            column
                .as_primitive::<TimestampNanosecondType>()
                .value_as_datetime(row),
        ),
        DataType::Date32 => datetime(column.as_primitive::<Date32Type>().value_as_datetime(row)),
        DataType::Date64 => datetime(column.as_primitive::<Date64Type>().value_as_datetime(row)),
        DataType::Time32(TimeUnit::Second) => {
            time_of_day(column.as_primitive::<Time32SecondType>().value_as_time(row))
        }
        DataType::Time32(TimeUnit::Millisecond) => time_of_day(
            column
                .as_primitive::<Time32MillisecondType>()
                .value_as_time(row),
        ),
        DataType::Time64(TimeUnit::Microsecond) => time_of_day(
            column
                .as_primitive::<Time64MicrosecondType>()
                .value_as_time(row),
        ),
        DataType::Time64(TimeUnit::Nanosecond) => time_of_day(
            column
                .as_primitive::<Time64NanosecondType>()
                .value_as_time(row),
        ),
        DataType::Duration(unit) => {
            let raw = match unit {
                TimeUnit::Second => column.as_primitive::<DurationSecondType>().value(row),
                TimeUnit::Millisecond => {
                    column.as_primitive::<DurationMillisecondType>().value(row)
                }
                TimeUnit::Microsecond => {
                    column.as_primitive::<DurationMicrosecondType>().value(row)
                }
                TimeUnit::Nanosecond => column.as_primitive::<DurationNanosecondType>().value(row),
            };
            Ok(duration(raw, unit))
        }
        DataType::Float16 => Ok(column.as_primitive::<Float16Type>().value(row).to_string()),
        DataType::Float32 => Ok(column.as_primitive::<Float32Type>().value(row).to_string()),
        DataType::Float64 => Ok(column.as_primitive::<Float64Type>().value(row).to_string()),
        DataType::Int8 => Ok(column.as_primitive::<Int8Type>().value(row).to_string()),
        DataType::Int16 => Ok(column.as_primitive::<Int16Type>().value(row).to_string()),
        DataType::Int32 => Ok(column.as_primitive::<Int32Type>().value(row).to_string()),
        DataType::Int64 => Ok(column.as_primitive::<Int64Type>().value(row).to_string()),
        DataType::UInt8 => Ok(column.as_primitive::<UInt8Type>().value(row).to_string()),
        DataType::UInt16 => Ok(column.as_primitive::<UInt16Type>().value(row).to_string()),
        DataType::UInt32 => Ok(column.as_primitive::<UInt32Type>().value(row).to_string()),
        DataType::UInt64 => Ok(column.as_primitive::<UInt64Type>().value(row).to_string()),
        DataType::Utf8 => Ok(column.as_string::<i32>().value(row).to_string()),
        DataType::Binary => Ok(format!("{:?}", column.as_binary::<i32>().value(row))),
        DataType::Boolean => {
            let value = if column.as_boolean().value(row) { "t" } else { "f" };
            Ok(value.to_string())
        }
        other => Err(ClientError::UnsupportedType(other.to_string())),
    }
}

fn datetime(value: Option<NaiveDateTime>) -> Result<String> {
    value
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .ok_or_else(|| ClientError::Render("timestamp out of representable range".into()))
}

/// Times of day render on the epoch date, under the same pattern as the
/// timestamp types.
fn time_of_day(value: Option<NaiveTime>) -> Result<String> {
    value
        .map(|t| {
            NaiveDateTime::new(NaiveDate::default(), t)
                .format(TIMESTAMP_FORMAT)
                .to_string()
        })
        .ok_or_else(|| ClientError::Render("time out of representable range".into()))
}

/// Scale a raw duration value by its unit and render it like `1.5s`.
fn duration(raw: i64, unit: &TimeUnit) -> String {
    let nanos = match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000_000),
        TimeUnit::Microsecond => raw.saturating_mul(1_000),
        TimeUnit::Nanosecond => raw,
    };

    if nanos < 0 {
        format!("-{:?}", Duration::from_nanos(nanos.unsigned_abs()))
    } else {
        format!("{:?}", Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::{
        BinaryArray, BooleanArray, Date32Array, DurationMicrosecondArray,
        DurationMillisecondArray, DurationNanosecondArray, Float32Array, Float64Array, Int32Array,
        Int64Array, Int8Array, LargeStringArray, StringArray, Time32SecondArray,
        TimestampMillisecondArray, TimestampSecondArray, UInt64Array, UInt8Array,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn rendered(column: &dyn Array, row: usize) -> String {
        render_value(column, row).unwrap()
    }

    #[test]
    fn test_render_null_marker() {
        assert_eq!(rendered(&BooleanArray::from(vec![None, Some(true)]), 0), "NULL");
        assert_eq!(rendered(&Int32Array::from(vec![None]), 0), "NULL");
        assert_eq!(rendered(&StringArray::from(vec![None::<&str>]), 0), "NULL");
    }

    #[test]
    fn test_render_boolean() {
        let column = BooleanArray::from(vec![true, false]);

        assert_eq!(rendered(&column, 0), "t");
        assert_eq!(rendered(&column, 1), "f");
    }

    #[test]
    fn test_render_integers() {
        assert_eq!(rendered(&Int8Array::from(vec![-8i8]), 0), "-8");
        assert_eq!(rendered(&Int32Array::from(vec![42]), 0), "42");
        assert_eq!(
            rendered(&Int64Array::from(vec![i64::MIN]), 0),
            i64::MIN.to_string()
        );
        assert_eq!(rendered(&UInt8Array::from(vec![255u8]), 0), "255");
        assert_eq!(
            rendered(&UInt64Array::from(vec![u64::MAX]), 0),
            u64::MAX.to_string()
        );
    }

    #[test]
    fn test_render_floats() {
        assert_eq!(rendered(&Float64Array::from(vec![3.14]), 0), "3.14");
        assert_eq!(rendered(&Float32Array::from(vec![0.5f32]), 0), "0.5");
    }

    #[test]
    fn test_render_string_verbatim() {
        assert_eq!(rendered(&StringArray::from(vec!["hello world"]), 0), "hello world");
    }

    #[test]
    fn test_render_binary_as_byte_listing() {
        let column = BinaryArray::from(vec![&[1u8, 2][..]]);

        assert_eq!(rendered(&column, 0), "[1, 2]");
    }

    #[test]
    fn test_render_duration_scales_by_unit() {
        let column = DurationMicrosecondArray::from(vec![1_500_000i64]);
        assert_eq!(rendered(&column, 0), "1.5s");

        let column = DurationNanosecondArray::from(vec![1i64]);
        assert_eq!(rendered(&column, 0), "1ns");
    }

    #[test]
    fn test_render_negative_duration() {
        let column = DurationMillisecondArray::from(vec![-250i64]);

        assert_eq!(rendered(&column, 0), "-250ms");
    }

    #[test]
    fn test_render_timestamp() {
        // 2021-01-01T00:00:00.789Z
        let column = TimestampMillisecondArray::from(vec![1_609_459_200_789i64]);
        assert_eq!(rendered(&column, 0), "2021-01-01 00:00:00.789");

        let column = TimestampSecondArray::from(vec![1_609_459_200i64]);
        assert_eq!(rendered(&column, 0), "2021-01-01 00:00:00");
    }

    #[test]
    fn test_render_date_at_midnight() {
        // 18993 days after the epoch
        let column = Date32Array::from(vec![18993]);

        assert_eq!(rendered(&column, 0), "2022-01-01 00:00:00");
    }

    #[test]
    fn test_render_time_of_day_on_epoch_date() {
        let column = Time32SecondArray::from(vec![3661]);

        assert_eq!(rendered(&column, 0), "1970-01-01 01:01:01");
    }

    #[test]
    fn test_render_unsupported_type_names_it() {
        let column = LargeStringArray::from(vec!["x"]);
        let err = render_value(&column, 0).unwrap_err();

        assert_eq!(err, ClientError::UnsupportedType("LargeUtf8".to_string()));
        assert!(err.to_string().contains("LargeUtf8"));
    }
}
