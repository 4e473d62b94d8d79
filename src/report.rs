//! Attack-surface report: benign filtering and keyed mapping output
//!
//! The report is a mapping between detected categories and formatted event
//! timestamps. Either side can be the key (the two historical report shapes
//! are both kept, selected by [`ReportKey`]). Duplicate keys overwrite the
//! previous value; key order is first insertion.

use crate::pipeline::{PredictionRow, SurfaceArea};

/// Which side of the mapping becomes the key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKey {
    /// category -> timestamp
    Category,
    /// timestamp -> category
    Timestamp,
}

/// Timestamp format used in rendered reports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
struct ReportEntry {
    key: String,
    value: String,
}

/// Mapping between detected (non-benign) categories and event timestamps
#[derive(Debug, Clone)]
pub struct Report {
    keyed_by: ReportKey,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Filter out benign rows and build the keyed mapping.
    ///
    /// Rows whose stage-2 class fell outside the label table are kept and
    /// rendered with the unmapped marker, matching the benign-only filter.
    pub fn build(rows: &[PredictionRow], keyed_by: ReportKey) -> Self {
        let mut report = Self {
            keyed_by,
            entries: Vec::new(),
        };

        for row in rows {
            if row.surface_area == Some(SurfaceArea::BenignTraffic) {
                continue;
            }
            let category = row.label_str().to_string();
            let stamp = row.time_stamp.format(TIMESTAMP_FORMAT).to_string();
            match keyed_by {
                ReportKey::Category => report.upsert(category, stamp),
                ReportKey::Timestamp => report.upsert(stamp, category),
            }
        }

        report
    }

    /// Last-write-wins insert preserving first-insertion key order
    fn upsert(&mut self, key: String, value: String) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value;
        } else {
            self.entries.push(ReportEntry { key, value });
        }
    }

    pub fn keyed_by(&self) -> ReportKey {
        self.keyed_by
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the value mapped to a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Render the report for terminal output
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Attack Surface Report ===\n");
        if self.entries.is_empty() {
            output.push_str("No non-benign traffic detected\n");
            return output;
        }

        for entry in &self.entries {
            output.push_str(&format!("{} -> {}\n", entry.key, entry.value));
        }

        output
    }

    /// Render the report as a JSON object
    pub fn to_json(&self) -> anyhow::Result<String> {
        let mut map = serde_json::Map::new();
        for entry in &self.entries {
            map.insert(
                entry.key.clone(),
                serde_json::Value::String(entry.value.clone()),
            );
        }
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
            map,
        ))?)
    }
}
