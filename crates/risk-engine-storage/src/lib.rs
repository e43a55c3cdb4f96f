use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use risk_engine_core::{RiskInput, RiskResult, RiskTier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRecord {
    pub id: u64,
    pub user_id: String,
    pub company_name: String,
    pub sector: String,
    pub debt_to_equity: f64,
    pub net_profit: f64,
    pub negative_news_score: f64,
    pub late_payments_rate: f64,
    pub risk_score: f64,
    pub tier: RiskTier,
    #[serde(default)]
    pub explanations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub user_id: String,
    pub company_name: String,
    pub sector: String,
    pub debt_to_equity: f64,
    pub net_profit: f64,
    pub negative_news_score: f64,
    pub late_payments_rate: f64,
    pub risk_score: f64,
    pub tier: RiskTier,
    pub explanations: Vec<String>,
}

impl NewEvaluation {
    pub fn from_result(user_id: impl Into<String>, input: &RiskInput, result: &RiskResult) -> Self {
        Self {
            user_id: user_id.into(),
            company_name: input.company_name.clone(),
            sector: input.sector.clone(),
            debt_to_equity: input.debt_to_equity,
            net_profit: input.net_profit,
            negative_news_score: input.negative_news_score,
            late_payments_rate: input.late_payments_rate,
            risk_score: result.score,
            tier: result.tier,
            explanations: result.explanations.clone(),
        }
    }
}

pub trait StorageBackend: Send {
    fn store(&mut self, new_evaluation: NewEvaluation) -> Result<EvaluationRecord, StorageError>;
    fn get(&self, id: u64) -> Option<EvaluationRecord>;
    fn find_by_company(&self, company_name: &str) -> Vec<EvaluationRecord>;
    fn health_check(&self) -> bool;
    fn stats(&self) -> serde_json::Value;

    fn fetch(&self, id: u64) -> Result<EvaluationRecord, StorageError> {
        self.get(id).ok_or(StorageError::NotFound(id))
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("evaluation {0} not found")]
    NotFound(u64),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Persisted {
    evaluations: Vec<EvaluationRecord>,
}

/// Append-only record set shared by the file and memory backends.
#[derive(Debug)]
struct EvaluationLog {
    records: Vec<EvaluationRecord>,
    next_id: u64,
}

impl Default for EvaluationLog {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

impl EvaluationLog {
    fn from_records(records: Vec<EvaluationRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    fn append(&mut self, new_evaluation: NewEvaluation) -> Result<EvaluationRecord, StorageError> {
        check_new_evaluation(&new_evaluation)?;
        let record = EvaluationRecord {
            id: self.next_id,
            user_id: new_evaluation.user_id,
            company_name: new_evaluation.company_name,
            sector: new_evaluation.sector,
            debt_to_equity: new_evaluation.debt_to_equity,
            net_profit: new_evaluation.net_profit,
            negative_news_score: new_evaluation.negative_news_score,
            late_payments_rate: new_evaluation.late_payments_rate,
            risk_score: new_evaluation.risk_score,
            tier: new_evaluation.tier,
            explanations: new_evaluation.explanations,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.records.push(record.clone());
        Ok(record)
    }

    fn get(&self, id: u64) -> Option<EvaluationRecord> {
        self.records.iter().find(|r| r.id == id).cloned()
    }

    fn find_by_company(&self, company_name: &str) -> Vec<EvaluationRecord> {
        self.records
            .iter()
            .filter(|r| r.company_name == company_name)
            .cloned()
            .collect()
    }
}

fn check_new_evaluation(new_evaluation: &NewEvaluation) -> Result<(), StorageError> {
    if new_evaluation.company_name.trim().is_empty() {
        return Err(StorageError::InvalidInput(
            "company_name cannot be empty".to_string(),
        ));
    }
    let numbers = [
        new_evaluation.debt_to_equity,
        new_evaluation.net_profit,
        new_evaluation.negative_news_score,
        new_evaluation.late_payments_rate,
        new_evaluation.risk_score,
    ];
    if numbers.iter().any(|v| !v.is_finite()) {
        return Err(StorageError::InvalidInput(
            "numeric fields must be finite".to_string(),
        ));
    }
    Ok(())
}

pub struct PersistentEvaluationStore {
    path: PathBuf,
    log: EvaluationLog,
}

impl PersistentEvaluationStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            let persisted = Persisted::default();
            let bytes = serde_json::to_vec_pretty(&persisted)?;
            fs::write(&path, bytes)?;
        }

        let bytes = fs::read(&path)?;
        let persisted: Persisted = serde_json::from_slice(&bytes)?;
        tracing::info!(
            path = %path.display(),
            count = persisted.evaluations.len(),
            "opened evaluation store"
        );

        Ok(Self {
            path,
            log: EvaluationLog::from_records(persisted.evaluations),
        })
    }

    fn persist(&self) -> Result<(), StorageError> {
        let persisted = Persisted {
            evaluations: self.log.records.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl StorageBackend for PersistentEvaluationStore {
    fn store(&mut self, new_evaluation: NewEvaluation) -> Result<EvaluationRecord, StorageError> {
        let record = self.log.append(new_evaluation)?;
        if let Err(err) = self.persist() {
            // Roll back the append so memory matches disk and the id is reused.
            self.log.records.retain(|r| r.id != record.id);
            self.log.next_id = record.id;
            return Err(err);
        }
        tracing::info!(id = record.id, company = %record.company_name, "stored evaluation");
        Ok(record)
    }

    fn get(&self, id: u64) -> Option<EvaluationRecord> {
        self.log.get(id)
    }

    fn find_by_company(&self, company_name: &str) -> Vec<EvaluationRecord> {
        self.log.find_by_company(company_name)
    }

    fn health_check(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(meta) => meta.is_file(),
            Err(err) => {
                tracing::error!(path = %self.path.display(), "evaluation store unreachable: {err}");
                false
            }
        }
    }

    fn stats(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": "json",
            "count": self.log.records.len(),
            "path": self.path,
        })
    }
}

/// Volatile store for tests and throwaway deployments.
#[derive(Debug, Default)]
pub struct MemoryEvaluationStore {
    log: EvaluationLog,
}

impl MemoryEvaluationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryEvaluationStore {
    fn store(&mut self, new_evaluation: NewEvaluation) -> Result<EvaluationRecord, StorageError> {
        self.log.append(new_evaluation)
    }

    fn get(&self, id: u64) -> Option<EvaluationRecord> {
        self.log.get(id)
    }

    fn find_by_company(&self, company_name: &str) -> Vec<EvaluationRecord> {
        self.log.find_by_company(company_name)
    }

    fn health_check(&self) -> bool {
        true
    }

    fn stats(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": "memory",
            "count": self.log.records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn now_ms() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    fn new_evaluation(company: &str, score: f64, tier: RiskTier) -> NewEvaluation {
        NewEvaluation {
            user_id: "user123".to_string(),
            company_name: company.to_string(),
            sector: "technology".to_string(),
            debt_to_equity: 2.5,
            net_profit: -1000.0,
            negative_news_score: 0.8,
            late_payments_rate: 0.2,
            risk_score: score,
            tier,
            explanations: vec!["Technology sector has moderate baseline risk".to_string()],
        }
    }

    #[test]
    fn store_get_find_roundtrip() {
        let path = std::env::temp_dir().join(format!("risk-store-{}.json", now_ms()));
        let mut store = PersistentEvaluationStore::open(&path).expect("open store");

        let first = store
            .store(new_evaluation("Acme Corp", 76.0, RiskTier::High))
            .expect("store first");
        let second = store
            .store(new_evaluation("Globex", 26.9, RiskTier::Low))
            .expect("store second");
        let third = store
            .store(new_evaluation("Acme Corp", 55.0, RiskTier::Medium))
            .expect("store third");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
        assert_eq!(store.get(2).map(|r| r.company_name), Some("Globex".to_string()));
        assert!(store.get(99).is_none());
        assert!(matches!(store.fetch(99), Err(StorageError::NotFound(99))));

        let acme = store.find_by_company("Acme Corp");
        assert_eq!(acme.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(store.find_by_company("acme corp").is_empty());
        assert!(store.health_check());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn reopen_continues_id_sequence() {
        let path = std::env::temp_dir().join(format!("risk-store-reopen-{}.json", now_ms()));
        {
            let mut store = PersistentEvaluationStore::open(&path).expect("open store");
            store
                .store(new_evaluation("Initech", 41.0, RiskTier::Medium))
                .expect("store");
        }

        let mut reopened = PersistentEvaluationStore::open(&path).expect("reopen store");
        let stored = reopened.get(1).expect("persisted record");
        assert_eq!(stored.company_name, "Initech");
        assert_eq!(stored.tier, RiskTier::Medium);

        let next = reopened
            .store(new_evaluation("Initech", 43.0, RiskTier::Medium))
            .expect("store after reopen");
        assert_eq!(next.id, 2);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn health_check_fails_when_file_disappears() {
        let path = std::env::temp_dir().join(format!("risk-store-health-{}.json", now_ms()));
        let store = PersistentEvaluationStore::open(&path).expect("open store");
        fs::remove_file(&path).expect("remove backing file");
        assert!(!store.health_check());
    }

    #[test]
    fn rejects_blank_company_and_non_finite_scores() {
        let mut store = MemoryEvaluationStore::new();
        let blank = store.store(new_evaluation("  ", 10.0, RiskTier::Low));
        assert!(matches!(blank, Err(StorageError::InvalidInput(_))));

        let nan = store.store(new_evaluation("Acme", f64::NAN, RiskTier::Low));
        assert!(matches!(nan, Err(StorageError::InvalidInput(_))));
        assert_eq!(store.stats()["count"], 0);
    }

    #[test]
    fn memory_store_counts_and_finds() {
        let mut store = MemoryEvaluationStore::new();
        for (i, company) in ["a", "b", "a"].iter().enumerate() {
            store
                .store(new_evaluation(company, i as f64, RiskTier::Low))
                .expect("store");
        }
        let found = store.find_by_company("a");
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(store.stats()["backend"], "memory");
        assert_eq!(store.stats()["count"], 3);
        assert!(store.health_check());
    }

    #[test]
    fn failed_write_does_not_consume_an_id() {
        let path = std::env::temp_dir().join(format!("risk-store-rollback-{}.json", now_ms()));
        let mut store = PersistentEvaluationStore::open(&path).expect("open store");
        let first = store
            .store(new_evaluation("Acme Corp", 76.0, RiskTier::High))
            .expect("store first");
        assert_eq!(first.id, 1);

        fs::remove_file(&path).expect("remove backing file");
        fs::create_dir(&path).expect("block path with a directory");
        let failed = store.store(new_evaluation("Globex", 30.0, RiskTier::Low));
        assert!(matches!(failed, Err(StorageError::Io(_))));
        assert!(store.get(2).is_none());
        assert_eq!(store.stats()["count"], 1);

        fs::remove_dir(&path).expect("unblock path");
        let next = store
            .store(new_evaluation("Globex", 30.0, RiskTier::Low))
            .expect("store after recovery");
        assert_eq!(next.id, 2);

        let reopened = PersistentEvaluationStore::open(&path).expect("reopen store");
        assert_eq!(reopened.get(2).map(|r| r.company_name), Some("Globex".to_string()));
        let _ = fs::remove_file(path);
    }
}
