// ABOUTME: Process-lifetime in-memory store for normalized specs and growth plans.
// ABOUTME: Nothing is persisted; a restart starts empty.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct SpecRecord {
    pub id: String,
    pub summary: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecord {
    pub id: String,
    pub body: Value,
    pub spec_id: Option<String>,
}

/// Specs and plans keyed by id. Writes replace any record with the same id.
#[derive(Debug, Default)]
pub struct Store {
    specs: RwLock<HashMap<String, SpecRecord>>,
    plans: RwLock<HashMap<String, PlanRecord>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_spec(&self, spec: SpecRecord) {
        self.specs.write().await.insert(spec.id.clone(), spec);
    }

    pub async fn get_spec(&self, id: &str) -> Option<SpecRecord> {
        self.specs.read().await.get(id).cloned()
    }

    pub async fn put_plan(&self, plan: PlanRecord) {
        self.plans.write().await.insert(plan.id.clone(), plan);
    }

    pub async fn get_plan(&self, id: &str) -> Option<PlanRecord> {
        self.plans.read().await.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn specs_round_trip_and_overwrite() {
        let store = Store::new();
        assert!(store.get_spec("sg-1").await.is_none());

        store
            .put_spec(SpecRecord {
                id: "sg-1".to_string(),
                summary: json!({"v": 1}),
            })
            .await;
        store
            .put_spec(SpecRecord {
                id: "sg-1".to_string(),
                summary: json!({"v": 2}),
            })
            .await;

        assert_eq!(store.get_spec("sg-1").await.unwrap().summary, json!({"v": 2}));
    }

    #[tokio::test]
    async fn plans_keep_their_spec_link() {
        let store = Store::new();
        store
            .put_plan(PlanRecord {
                id: "pl-1".to_string(),
                body: json!({"morphs": []}),
                spec_id: Some("sg-1".to_string()),
            })
            .await;

        let plan = store.get_plan("pl-1").await.unwrap();
        assert_eq!(plan.spec_id.as_deref(), Some("sg-1"));
        assert!(store.get_plan("pl-2").await.is_none());
    }
}
