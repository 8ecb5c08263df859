use crate::error::CoreError;
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An ordered, immutable series of account values sampled once per period.
///
/// Construction guarantees the series is non-empty and every value is finite.
/// Zero and negative values are accepted by [`PerformanceSeries::new`] so the
/// metrics that divide by them can report a domain error; use
/// [`PerformanceSeries::strictly_positive`] when the caller wants them rejected
/// up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PerformanceSeries {
    values: Vec<f64>,
}

impl PerformanceSeries {
    pub fn new(values: Vec<f64>) -> Result<Self, CoreError> {
        if values.is_empty() {
            return Err(CoreError::EmptySeries);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(CoreError::NonFiniteValue { index });
        }
        Ok(Self { values })
    }

    /// Like [`PerformanceSeries::new`], but also rejects zero and negative values.
    pub fn strictly_positive(values: Vec<f64>) -> Result<Self, CoreError> {
        let series = Self::new(values)?;
        if let Some((index, &value)) = series.values.iter().enumerate().find(|(_, v)| **v <= 0.0) {
            return Err(CoreError::NonPositiveValue { index, value });
        }
        Ok(series)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept so the type reads like a collection.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn is_strictly_positive(&self) -> bool {
        self.values.iter().all(|v| *v > 0.0)
    }

    /// Iterates over adjacent `(previous, current)` pairs in chronological order.
    pub fn transitions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.windows(2).map(|w| (w[0], w[1]))
    }
}

impl TryFrom<Vec<f64>> for PerformanceSeries {
    type Error = CoreError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<PerformanceSeries> for Vec<f64> {
    fn from(series: PerformanceSeries) -> Self {
        series.values
    }
}

/// The `{ "data": [...] }` document exchanged with the catalog layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPayload {
    pub data: PerformanceSeries,
}

/// Accepts either the wrapped payload or a bare JSON array.
///
/// The shape is picked from the first token, so validation errors from the
/// series itself reach the caller intact.
#[derive(Debug, Clone)]
pub enum SeriesDocument {
    Wrapped(SeriesPayload),
    Bare(PerformanceSeries),
}

impl SeriesDocument {
    pub fn into_series(self) -> PerformanceSeries {
        match self {
            SeriesDocument::Wrapped(payload) => payload.data,
            SeriesDocument::Bare(series) => series,
        }
    }
}

impl<'de> Deserialize<'de> for SeriesDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SeriesDocumentVisitor)
    }
}

struct SeriesDocumentVisitor;

impl<'de> Visitor<'de> for SeriesDocumentVisitor {
    type Value = SeriesDocument;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with a `data` array or an array of numbers")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        let values = Vec::<f64>::deserialize(SeqAccessDeserializer::new(seq))?;
        PerformanceSeries::new(values)
            .map(SeriesDocument::Bare)
            .map_err(de::Error::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        SeriesPayload::deserialize(MapAccessDeserializer::new(map)).map(SeriesDocument::Wrapped)
    }
}
