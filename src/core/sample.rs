use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::core::spacing::{ONE_DAY_SECONDS, candle_spacing};
use crate::error::{ChartError, ChartResult};

/// One time bucket of the price series: OHLC plus optional trade markers.
///
/// `long`/`short` carry the entry price when a position was opened on this
/// bucket; `sl`/`tp` carry stop-loss/take-profit levels. An absent field
/// means "no marker for this sample".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub long: Option<f64>,
    #[serde(default)]
    pub short: Option<f64>,
    #[serde(default)]
    pub sl: Option<f64>,
    #[serde(default)]
    pub tp: Option<f64>,
}

impl Sample {
    /// Builds a validated sample from raw floating values.
    ///
    /// Invariants:
    /// - all values are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    pub fn new(time: f64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        if !time.is_finite()
            || !open.is_finite()
            || !high.is_finite()
            || !low.is_finite()
            || !close.is_finite()
        {
            return Err(ChartError::InvalidData(
                "sample values must be finite".to_owned(),
            ));
        }

        if low > high {
            return Err(ChartError::InvalidData(
                "sample low must be <= high".to_owned(),
            ));
        }

        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "sample open/close must be within low/high range".to_owned(),
            ));
        }

        Ok(Self {
            time,
            open,
            high,
            low,
            close,
            long: None,
            short: None,
            sl: None,
            tp: None,
        })
    }

    /// Converts strongly-typed temporal/decimal input into a validated sample.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        )
    }

    /// Attaches a long-entry marker at `price`.
    pub fn with_long(mut self, price: f64) -> ChartResult<Self> {
        self.long = Some(finite_marker(price, "long")?);
        Ok(self)
    }

    /// Attaches a short-entry marker at `price`.
    pub fn with_short(mut self, price: f64) -> ChartResult<Self> {
        self.short = Some(finite_marker(price, "short")?);
        Ok(self)
    }

    /// Attaches a stop-loss level.
    pub fn with_sl(mut self, price: f64) -> ChartResult<Self> {
        self.sl = Some(finite_marker(price, "sl")?);
        Ok(self)
    }

    /// Attaches a take-profit level.
    pub fn with_tp(mut self, price: f64) -> ChartResult<Self> {
        self.tp = Some(finite_marker(price, "tp")?);
        Ok(self)
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    /// Returns `true` when any position entry is attached.
    #[must_use]
    pub fn has_position(self) -> bool {
        self.long.is_some() || self.short.is_some()
    }
}

/// The full ordered-by-time dataset: the chart's source of truth.
///
/// Sorting and candle spacing are fixed at load; the viewport machine and
/// the windowing functions only ever read from this set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    samples: Vec<Sample>,
    spacing: f64,
}

impl SampleSet {
    /// Sorts the samples by time and computes the candle spacing.
    ///
    /// Datasets with fewer than 2 samples get the one-day sentinel spacing.
    #[must_use]
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        let spacing = candle_spacing(&samples).unwrap_or(ONE_DAY_SECONDS);
        Self { samples, spacing }
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Minimum adjacent-time delta, or the one-day sentinel for tiny sets.
    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// First/last sample time, `None` when the set is empty.
    #[must_use]
    pub fn extent(&self) -> Option<(f64, f64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    /// Highest `high` across the set, used for label width derivation.
    #[must_use]
    pub fn max_high(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.high)
            .fold(None, |acc, high| match acc {
                Some(current) if current >= high => Some(current),
                _ => Some(high),
            })
    }
}

/// Wire shape of one record in the host-fetched JSON array.
#[derive(Debug, Deserialize)]
struct RawRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    long: Option<f64>,
    #[serde(default)]
    short: Option<f64>,
    #[serde(default)]
    sl: Option<f64>,
    #[serde(default)]
    tp: Option<f64>,
}

/// Deserializes the host-fetched JSON array of OHLC records.
///
/// Dates are accepted as RFC 3339 timestamps or plain `YYYY-MM-DD` days.
pub fn samples_from_json(input: &str) -> ChartResult<Vec<Sample>> {
    let records: Vec<RawRecord> = serde_json::from_str(input)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse samples: {e}")))?;

    let mut samples = Vec::with_capacity(records.len());
    for record in records {
        let time = parse_date(&record.date)?;
        let mut sample = Sample::new(time, record.open, record.high, record.low, record.close)?;
        if let Some(price) = record.long {
            sample = sample.with_long(price)?;
        }
        if let Some(price) = record.short {
            sample = sample.with_short(price)?;
        }
        if let Some(price) = record.sl {
            sample = sample.with_sl(price)?;
        }
        if let Some(price) = record.tp {
            sample = sample.with_tp(price)?;
        }
        samples.push(sample);
    }
    Ok(samples)
}

/// Parses a record date into unix seconds.
pub fn parse_date(input: &str) -> ChartResult<f64> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime_to_unix_seconds(ts.with_timezone(&Utc)));
    }
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let midnight = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ChartError::InvalidData(format!("invalid date `{input}`")))?;
        return Ok(datetime_to_unix_seconds(midnight.and_utc()));
    }
    Err(ChartError::InvalidData(format!(
        "unsupported date format `{input}`"
    )))
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

fn finite_marker(price: f64, field_name: &str) -> ChartResult<f64> {
    if !price.is_finite() {
        return Err(ChartError::InvalidData(format!(
            "{field_name} marker price must be finite"
        )));
    }
    Ok(price)
}
