//! Shared test utilities for integration tests.
//!
//! Provides a small multi-year ledger fixture and a `TestClient` that drives
//! the router against in-memory stores. Methods are intentionally broad to
//! support various test scenarios across different test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use budget_explorer::cache::FinanceCache;
use budget_explorer::config::Config;
use budget_explorer::handlers;
use budget_explorer::models::{LedgerRow, Rdfi, TextsRecord};
use budget_explorer::services::{Explorer, MergeRules};
use budget_explorer::state::AppState;
use budget_explorer::store::{FunctionLabels, LedgerStore, TextsStore};
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

pub fn row(rdfi: Rdfi, function: &str, nature: &str, amount_cents: i64) -> LedgerRow {
    LedgerRow {
        direction: rdfi.direction,
        section: rdfi.section,
        function_code: function.into(),
        nature_code: nature.into(),
        amount_cents,
        label: format!("Ligne {} {}", function, nature),
    }
}

/// 2017 and 2016 carry expenditures and revenue, 2015 revenue only, 2014 is
/// an empty snapshot.
///
/// DF partition in 2017: DF-1 300, DF-2 280, DF-5 1000, DF-6 50.
/// DF partition in 2016: DF-1 250, DF-2 260, DF-4 70, DF-5 900.
pub fn fixture_ledger() -> LedgerStore {
    let store = LedgerStore::new();
    store.replace_year(2014, Vec::new());
    store.replace_year(2015, vec![row(Rdfi::RF, "01", "7311", 1_500)]);
    store.replace_year(
        2016,
        vec![
            row(Rdfi::DF, "11", "6568", 250),
            row(Rdfi::DF, "21", "6568", 260),
            row(Rdfi::DF, "41", "6512", 70),
            row(Rdfi::DF, "52", "6568", 900),
            row(Rdfi::RF, "01", "7311", 1_800),
        ],
    );
    store.replace_year(
        2017,
        vec![
            row(Rdfi::DF, "11", "6568", 300),
            row(Rdfi::DF, "21", "6568", 280),
            row(Rdfi::DF, "52", "6568", 600),
            row(Rdfi::DF, "51", "6512", 400),
            row(Rdfi::DF, "51", "6218", 150),
            row(Rdfi::DF, "51", "6218", -150),
            row(Rdfi::DF, "61", "6231", 50),
            row(Rdfi::DI, "62", "2317", 200),
            row(Rdfi::RF, "01", "7311", 2_000),
        ],
    );
    store
}

pub fn fixture_texts() -> TextsStore {
    let mut texts = HashMap::new();
    for (id, label) in [
        ("D", "Dépenses"),
        ("R", "Recettes"),
        ("DF", "Dépenses de fonctionnement"),
        ("DF-1", "Solidarité"),
        ("DF-2", "Actions sociales"),
        ("DF-5", "Action sociale"),
    ] {
        texts.insert(
            id.to_string(),
            TextsRecord {
                label: label.into(),
                atemporal: Some(format!("À propos de {}", label)),
                temporal: None,
            },
        );
    }
    TextsStore::new(texts)
}

pub fn fixture_labels() -> FunctionLabels {
    let mut labels = HashMap::new();
    labels.insert("R51".to_string(), "Famille et enfance".to_string());
    labels.insert("52".to_string(), "Personnes handicapées".to_string());
    FunctionLabels::new(labels)
}

/// Owns every collaborator of an [`Explorer`] built from the fixtures.
pub struct Fixture {
    pub ledger: LedgerStore,
    pub texts: TextsStore,
    pub labels: FunctionLabels,
    pub cache: FinanceCache,
    pub rules: MergeRules,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            ledger: fixture_ledger(),
            texts: fixture_texts(),
            labels: fixture_labels(),
            cache: FinanceCache::new(),
            rules: MergeRules::default(),
        }
    }

    pub fn explorer(&self) -> Explorer<'_> {
        Explorer::new(
            &self.ledger,
            &self.texts,
            &self.labels,
            &self.cache,
            &self.rules,
        )
    }
}

/// A test client sending requests straight to the router.
pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Client over the in-memory fixtures; its data directory does not exist.
    pub fn new() -> Self {
        Self::with_data_path(PathBuf::from("/nonexistent-budget-explorer-data"))
    }

    pub fn with_data_path(data_path: PathBuf) -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 7070,
            data_path,
        };

        let state = AppState {
            config: Arc::new(config),
            ledger: Arc::new(fixture_ledger()),
            texts: Arc::new(fixture_texts()),
            function_labels: Arc::new(fixture_labels()),
            merge_rules: Arc::new(MergeRules::default()),
            cache: Arc::new(FinanceCache::new()),
        };

        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.request("GET", uri).await
    }

    /// Make a POST request without a body and return status and body.
    pub async fn post(&self, uri: &str) -> (StatusCode, String) {
        self.request("POST", uri).await
    }

    async fn request(&self, method: &str, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let value = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, value)
    }
}
