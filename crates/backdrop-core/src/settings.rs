//! Named per-background settings.
//!
//! A background is configured with a loose bag of named values, the shape the
//! web configuration UI produces: numbers for sliders and CSS strings for
//! colors. Backgrounds read the keys they know with a documented default and
//! ignore everything else.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

use crate::color::Paint;

/// A single setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

impl SettingValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) if n.is_finite() => Some(*n),
            SettingValue::Number(_) => None,
            SettingValue::Text(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
        }
    }

    pub fn as_paint(&self) -> Option<Paint> {
        match self {
            SettingValue::Text(s) => Paint::parse(s),
            SettingValue::Number(_) => None,
        }
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        SettingValue::Number(n)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

/// Settings object for one background.
///
/// Entries that are neither numbers nor strings are dropped while
/// deserializing, like any other key nobody reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, SettingValue>);

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Value(SettingValue),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, Entry>::deserialize(deserializer)?;
        Ok(Settings(
            entries
                .into_iter()
                .filter_map(|(key, entry)| match entry {
                    Entry::Value(value) => Some((key, value)),
                    Entry::Other(_) => None,
                })
                .collect(),
        ))
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    /// Numeric value of `key`, or `default` when missing or not a number.
    pub fn number(&self, key: &str, default: f32) -> f32 {
        self.get(key)
            .and_then(SettingValue::as_number)
            .map(|n| n as f32)
            .unwrap_or(default)
    }

    /// Non-negative count value of `key`, or `default`.
    pub fn count(&self, key: &str, default: usize) -> usize {
        self.get(key)
            .and_then(SettingValue::as_number)
            .map(|n| n.max(0.0).round() as usize)
            .unwrap_or(default)
    }

    /// Color value of `key`, or `default` when missing or unparseable.
    pub fn paint(&self, key: &str, default: Paint) -> Paint {
        self.get(key)
            .and_then(SettingValue::as_paint)
            .unwrap_or(default)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Declarative description of one adjustable numeric setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl SettingSpec {
    /// Move `current` by `steps` increments, clamped to the declared range.
    pub fn nudge(&self, current: f64, steps: i32) -> f64 {
        let raw = current + self.step * steps as f64;
        // Snap to the step grid to avoid drifting float sums.
        let snapped = self.min + ((raw - self.min) / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }

    /// Element count in `settings`, at most the declared maximum.
    pub fn count(&self, settings: &Settings) -> usize {
        self.clamp_count(self.current(settings))
    }

    /// Round `value` to a count in `0..=max`. The declared minimum only
    /// bounds nudging, so an explicit smaller count still shrinks a store.
    pub fn clamp_count(&self, value: f64) -> usize {
        if value.is_nan() {
            return self.default.round() as usize;
        }
        value.clamp(0.0, self.max).round() as usize
    }

    /// Current value in `settings`, falling back to the declared default.
    pub fn current(&self, settings: &Settings) -> f64 {
        settings
            .get(self.key)
            .and_then(SettingValue::as_number)
            .unwrap_or(self.default)
    }
}
