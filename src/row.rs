use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One content item waiting for a publish date, as received from the row source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow {
    /// 1-based position in the source, used for diagnostics only.
    pub row_index: usize,
    /// User-supplied anchor candidate, unparsed. Empty means "pick a date for me".
    #[serde(default)]
    pub raw_date: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl ContentRow {
    pub fn new(row_index: usize, text: impl Into<String>) -> Self {
        Self {
            row_index,
            raw_date: String::new(),
            text: text.into(),
            image_ref: None,
        }
    }

    pub fn with_date(mut self, raw_date: impl Into<String>) -> Self {
        self.raw_date = raw_date.into();
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn has_anchor_candidate(&self) -> bool {
        !self.raw_date.trim().is_empty()
    }
}

/// A row after the engine has looked at it. Input rows are never mutated;
/// every run produces fresh outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_index: usize,
    #[serde(default)]
    pub raw_date: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Set once `raw_date` normalized successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchored_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl RowOutcome {
    pub(crate) fn pending(row: &ContentRow) -> Self {
        Self {
            row_index: row.row_index,
            raw_date: row.raw_date.clone(),
            text: row.text.clone(),
            image_ref: row.image_ref.clone(),
            anchored_date: None,
            assigned_date: None,
            failure: None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.assigned_date.is_some()
    }
}
