//! Forward-fill alignment of a secondary series onto the primary date axis.
//!
//! Each primary date takes the latest secondary observation dated at or
//! before it. Dates ahead of the first observation get the default. There is
//! no backward fill, so an aligned value never comes from the future.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Value used for primary dates that precede every secondary observation.
pub const DEFAULT_EXTERNAL_VALUE: f64 = 0.0;

/// One observation of the secondary series (e.g. a volatility index close).
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A secondary value mapped onto one primary date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedValue {
    pub date: NaiveDate,
    pub value: f64,
    /// Date of the observation used, `None` when the default was substituted.
    pub source_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    #[error("secondary series has no usable observations")]
    NoData,
}

/// Align `secondary` onto `primary_dates`.
///
/// Duplicate secondary dates keep the last occurrence; non-finite values are
/// ignored. Returns [`AlignError::NoData`] when nothing usable remains.
pub fn align_forward_fill(
    primary_dates: &[NaiveDate],
    secondary: &[ExternalPoint],
    default: f64,
) -> Result<Vec<AlignedValue>, AlignError> {
    let observations: BTreeMap<NaiveDate, f64> = secondary
        .iter()
        .filter(|p| p.value.is_finite())
        .map(|p| (p.date, p.value))
        .collect();

    if observations.is_empty() {
        return Err(AlignError::NoData);
    }

    Ok(primary_dates
        .iter()
        .map(|&date| match observations.range(..=date).next_back() {
            Some((&source, &value)) => AlignedValue {
                date,
                value,
                source_date: Some(source),
            },
            None => AlignedValue {
                date,
                value: default,
                source_date: None,
            },
        })
        .collect())
}

/// Like [`align_forward_fill`], but substitutes `default` on every row when
/// the secondary series is missing.
pub fn align_or_default(
    primary_dates: &[NaiveDate],
    secondary: &[ExternalPoint],
    default: f64,
) -> Vec<AlignedValue> {
    match align_forward_fill(primary_dates, secondary, default) {
        Ok(aligned) => aligned,
        Err(err) => {
            tracing::warn!(error = %err, rows = primary_dates.len(), default, "external series missing, using default");
            primary_dates
                .iter()
                .map(|&date| AlignedValue {
                    date,
                    value: default,
                    source_date: None,
                })
                .collect()
        }
    }
}
