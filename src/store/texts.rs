use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{TextsCsvRow, TextsRecord};
use crate::services::partition::TextsLookup;

/// Category texts keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TextsStore(HashMap<String, TextsRecord>);

impl TextsStore {
    pub fn new(texts: HashMap<String, TextsRecord>) -> Self {
        Self(texts)
    }

    /// Reads `id,label,atemporal,temporal` rows.
    pub fn from_csv(content: &[u8]) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let mut texts = HashMap::new();
        for result in reader.deserialize::<TextsCsvRow>() {
            let row = result.map_err(|e| AppError::CsvParse(e.to_string()))?;
            let (id, record): (String, TextsRecord) = row.into();
            texts.insert(id, record);
        }
        debug!(count = texts.len(), "Parsed category texts");
        Ok(Self(texts))
    }

    /// Loads `path`, or an empty store when the file does not exist.
    pub fn load(path: &Path) -> AppResult<Self> {
        match fs::read(path) {
            Ok(content) => Self::from_csv(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Texts file not found, using empty texts");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TextsLookup for TextsStore {
    fn texts_for(&self, id: &str) -> Option<&TextsRecord> {
        self.0.get(id)
    }
}

/// Labels of function codes, used when listing raw rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionLabels(HashMap<String, String>);

impl FunctionLabels {
    pub fn new(labels: HashMap<String, String>) -> Self {
        Self(labels)
    }

    /// Loads a JSON object of code → label, or an empty table when the file
    /// does not exist. Keys may carry the `R` rubrique marker.
    pub fn load(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "Function labels not found, using raw codes"
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, function_code: &str) -> Option<&str> {
        self.0
            .get(function_code)
            .or_else(|| self.0.get(&format!("R{}", function_code)))
            .map(String::as_str)
    }
}
