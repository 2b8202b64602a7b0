use serde::{Deserialize, Serialize};

/// Editorial content for a category, independent of the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextsRecord {
    pub label: String,
    #[serde(default)]
    pub atemporal: Option<String>,
    #[serde(default)]
    pub temporal: Option<String>,
}

/// Row of `texts.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct TextsCsvRow {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub atemporal: Option<String>,
    #[serde(default)]
    pub temporal: Option<String>,
}

impl From<TextsCsvRow> for (String, TextsRecord) {
    fn from(row: TextsCsvRow) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        (
            row.id,
            TextsRecord {
                label: row.label,
                atemporal: non_empty(row.atemporal),
                temporal: non_empty(row.temporal),
            },
        )
    }
}
