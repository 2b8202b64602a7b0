use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Holds `ledger/<year>.csv`, `texts.csv`, `function-labels.json` and
    /// `merge-rules.json`.
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("EXPLORER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("EXPLORER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            data_path: env::var("EXPLORER_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_path.join("ledger")
    }

    pub fn texts_path(&self) -> PathBuf {
        self.data_path.join("texts.csv")
    }

    pub fn function_labels_path(&self) -> PathBuf {
        self.data_path.join("function-labels.json")
    }

    pub fn merge_rules_path(&self) -> PathBuf {
        self.data_path.join("merge-rules.json")
    }
}
