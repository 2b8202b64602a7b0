use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::models::{LedgerRow, TextsRecord};

/// One part of a category's breakdown for a given year.
///
/// Serialized with its display [`label`](PartitionEntry::label) alongside the
/// raw texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    pub content_id: String,
    pub part_amount_cents: i64,
    pub texts: Option<TextsRecord>,
    pub url: String,
}

impl PartitionEntry {
    /// Display label, falling back to the raw id when no texts exist.
    pub fn label(&self) -> &str {
        self.texts
            .as_ref()
            .map(|t| t.label.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.content_id)
    }
}

impl Serialize for PartitionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PartitionEntry", 5)?;
        state.serialize_field("content_id", &self.content_id)?;
        state.serialize_field("part_amount_cents", &self.part_amount_cents)?;
        state.serialize_field("label", self.label())?;
        state.serialize_field("texts", &self.texts)?;
        state.serialize_field("url", &self.url)?;
        state.end()
    }
}

/// Short description of a related category (parent or domain root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub id: String,
    pub amount_cents: i64,
    pub label: String,
    pub url: String,
}

/// Ledger row prepared for tabular display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRowView {
    pub function_code: String,
    pub function_label: String,
    pub nature_code: String,
    pub label: String,
    pub amount_cents: i64,
}

impl LedgerRowView {
    pub fn new(row: &LedgerRow, function_label: Option<&str>) -> Self {
        Self {
            function_code: row.function_code.clone(),
            function_label: function_label
                .map(str::to_string)
                .unwrap_or_else(|| row.function_code.clone()),
            nature_code: row.nature_code.clone(),
            label: row.label.clone(),
            amount_cents: row.amount_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_falls_back_to_id() {
        let mut entry = PartitionEntry {
            content_id: "DF-5".into(),
            part_amount_cents: 100,
            texts: None,
            url: "#!/finance-details/DF-5".into(),
        };
        assert_eq!(entry.label(), "DF-5");

        entry.texts = Some(TextsRecord {
            label: "Action sociale".into(),
            ..Default::default()
        });
        assert_eq!(entry.label(), "Action sociale");
    }

    #[test]
    fn test_label_is_serialized() {
        let entry = PartitionEntry {
            content_id: "DF-5".into(),
            part_amount_cents: 100,
            texts: None,
            url: "#!/finance-details/DF-5".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["label"], "DF-5");
        assert!(json["texts"].is_null());
        assert_eq!(json["part_amount_cents"], 100);
        assert_eq!(json["url"], "#!/finance-details/DF-5");
    }
}
