//! Threshold classification and colour bookkeeping for user thresholds.

use crate::types::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colours handed out to newly added thresholds, in order of preference.
pub const PALETTE: [&str; 6] = ["green", "blue", "purple", "orange", "red", "yellow"];

/// Value given to a threshold added without an explicit value.
pub const DEFAULT_NEW_THRESHOLD: f64 = 5.0;

/// Label used when an outcome does not reach any threshold.
pub const BELOW_THRESHOLD: &str = "below-threshold";

/// A user threshold and the colour label it is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub label: String,
}

impl Threshold {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Result of matching one outcome against a [`ThresholdSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// The highest threshold not exceeding the outcome, by label
    Threshold(String),
    /// The outcome is below every threshold
    BelowThreshold,
}

impl Classification {
    /// CSS-style class name for renderers.
    pub fn css_class(&self) -> String {
        match self {
            Classification::Threshold(label) => format!("threshold-{}", label),
            Classification::BelowThreshold => BELOW_THRESHOLD.to_string(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Classification::Threshold(label) => label,
            Classification::BelowThreshold => BELOW_THRESHOLD,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour attached to a preset threshold value.
pub fn preset_color(value: f64) -> &'static str {
    const PRESETS: [(f64, &str); 6] = [
        (1.05, "peacock"),
        (1.10, "navy"),
        (1.4, "orange"),
        (2.0, "green"),
        (5.0, "purple"),
        (20.0, "red"),
    ];

    PRESETS
        .iter()
        .find(|(preset, _)| *preset == value)
        .map(|(_, color)| *color)
        .unwrap_or("green")
}

/// Ordered set of thresholds with distinct labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    thresholds: Vec<Threshold>,
}

impl ThresholdSet {
    pub fn new() -> Self {
        Self {
            thresholds: Vec::new(),
        }
    }

    /// Build a set from plain values, colouring them the way [`ThresholdSet::add`] does.
    pub fn from_values(values: &[f64]) -> Self {
        let mut set = Self::new();
        for value in values {
            set.add(*value);
        }
        set
    }

    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Add a threshold with the next free palette colour and return it.
    pub fn add(&mut self, value: f64) -> &Threshold {
        let label = self.next_available_color().to_string();
        self.thresholds.push(Threshold::new(value, label));
        &self.thresholds[self.thresholds.len() - 1]
    }

    /// Insert with an explicit label, replacing the value of an existing entry with that label.
    pub fn insert(&mut self, value: f64, label: impl Into<String>) {
        let label = label.into();
        match self.thresholds.iter_mut().find(|t| t.label == label) {
            Some(existing) => existing.value = value,
            None => self.thresholds.push(Threshold::new(value, label)),
        }
    }

    /// Remove the threshold drawn with `label`. Returns whether anything was removed.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.thresholds.len();
        self.thresholds.retain(|t| t.label != label);
        self.thresholds.len() != before
    }

    /// Set the first threshold to a preset value and its matching colour.
    pub fn apply_preset(&mut self, value: f64) {
        let color = preset_color(value);
        match self.thresholds.first_mut() {
            Some(first) => {
                first.value = value;
                first.label = color.to_string();
            }
            None => self.thresholds.push(Threshold::new(value, color)),
        }
    }

    /// First palette colour not in use; cycles through the palette once all are taken.
    pub fn next_available_color(&self) -> &'static str {
        PALETTE
            .iter()
            .copied()
            .find(|color| !self.thresholds.iter().any(|t| t.label == *color))
            .unwrap_or_else(|| PALETTE[self.thresholds.len() % PALETTE.len()])
    }

    /// Classify an outcome against this set.
    pub fn classify(&self, outcome: Outcome) -> Classification {
        classify(outcome, &self.thresholds)
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            thresholds: vec![Threshold::new(2.0, "green")],
        }
    }
}

/// Match `outcome` to the highest threshold it meets or exceeds.
///
/// NaN thresholds never match. Equal values resolve to the later entry.
pub fn classify(outcome: Outcome, thresholds: &[Threshold]) -> Classification {
    let mut candidates: Vec<&Threshold> = thresholds.iter().filter(|t| !t.value.is_nan()).collect();
    candidates.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut matched = None;
    for threshold in candidates {
        if outcome >= threshold.value {
            matched = Some(threshold);
        }
    }

    match matched {
        Some(threshold) => Classification::Threshold(threshold.label.clone()),
        None => Classification::BelowThreshold,
    }
}
