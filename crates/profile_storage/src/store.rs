//! Profile and feedback storage: trait plus file-backed implementation.
//!
//! Three flat JSON lists with fixed caps. Saves de-duplicate by a
//! caller-visible identity key (name+niche for guided, name+info for
//! automation) and prepend the new entry, so lists stay recency-ordered.
//! A missing or corrupt file degrades to an empty list, never an error.

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use strategy_core::types::{
    AutomationBrief, AutomationProfile, FeedbackExample, ProductBrief, ProductProfile,
};

use crate::error::Result;

const PROFILES_FILE: &str = "affiliate_profiles_v1.json";
const AUTO_PROFILES_FILE: &str = "affiliate_auto_profiles_v1.json";
const FEEDBACK_FILE: &str = "affiliate_feedback_v1.json";

const MAX_PROFILES: usize = 20;
const MAX_AUTO_PROFILES: usize = 20;
const MAX_FEEDBACK: usize = 120;

/// Storage seam for briefs and feedback examples.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Save a guided brief, de-duplicated by lowercased name+niche.
    async fn save_product_profile(&self, brief: &ProductBrief) -> Result<ProductProfile>;

    /// All guided profiles, most recent first.
    async fn get_product_profiles(&self) -> Result<Vec<ProductProfile>>;

    /// Save an automation brief, de-duplicated by lowercased name+info.
    async fn save_automation_profile(&self, brief: &AutomationBrief) -> Result<AutomationProfile>;

    /// All automation profiles, most recent first.
    async fn get_automation_profiles(&self) -> Result<Vec<AutomationProfile>>;

    /// Save one rated feedback entry. No dedup; the cap trims the oldest.
    async fn save_feedback_example(&self, feedback: NewFeedback) -> Result<FeedbackExample>;

    /// All feedback examples, most recent first.
    async fn get_feedback_examples(&self) -> Result<Vec<FeedbackExample>>;
}

/// Caller-supplied fields of a feedback entry; id and timestamp are generated.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub rating: i32,
    pub what_worked: String,
    pub what_to_improve: String,
    pub product_name: String,
    pub output_snapshot: String,
}

/// File-based store keeping each list in one JSON file.
#[derive(Clone)]
pub struct FileProfileStore {
    base_path: PathBuf,
}

impl FileProfileStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    async fn read_list<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let path = self.file_path(name);
        match fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable list {}: {}", name, e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    async fn write_list<T: Serialize>(&self, name: &str, list: &[T]) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        let contents = serde_json::to_string_pretty(list)?;
        fs::write(self.file_path(name), contents).await?;
        Ok(())
    }
}

fn identity(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

fn sort_by_recency<T, F: Fn(&T) -> String>(list: &mut [T], created_at: F) {
    list.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn save_product_profile(&self, brief: &ProductBrief) -> Result<ProductProfile> {
        let profile = ProductProfile {
            id: new_id(),
            created_at: now_rfc3339(),
            brief: brief.clone(),
        };

        let key = identity(&[&brief.product_name, &brief.niche]);
        let mut list: Vec<ProductProfile> = self.read_list(PROFILES_FILE).await;
        list.retain(|item| identity(&[&item.brief.product_name, &item.brief.niche]) != key);
        list.insert(0, profile.clone());
        list.truncate(MAX_PROFILES);
        self.write_list(PROFILES_FILE, &list).await?;
        Ok(profile)
    }

    async fn get_product_profiles(&self) -> Result<Vec<ProductProfile>> {
        let mut list: Vec<ProductProfile> = self.read_list(PROFILES_FILE).await;
        sort_by_recency(&mut list, |item| item.created_at.clone());
        Ok(list)
    }

    async fn save_automation_profile(&self, brief: &AutomationBrief) -> Result<AutomationProfile> {
        let profile = AutomationProfile {
            id: new_id(),
            created_at: now_rfc3339(),
            brief: brief.clone(),
        };

        let key = identity(&[&brief.product_name, &brief.product_info]);
        let mut list: Vec<AutomationProfile> = self.read_list(AUTO_PROFILES_FILE).await;
        list.retain(|item| identity(&[&item.brief.product_name, &item.brief.product_info]) != key);
        list.insert(0, profile.clone());
        list.truncate(MAX_AUTO_PROFILES);
        self.write_list(AUTO_PROFILES_FILE, &list).await?;
        Ok(profile)
    }

    async fn get_automation_profiles(&self) -> Result<Vec<AutomationProfile>> {
        let mut list: Vec<AutomationProfile> = self.read_list(AUTO_PROFILES_FILE).await;
        sort_by_recency(&mut list, |item| item.created_at.clone());
        Ok(list)
    }

    async fn save_feedback_example(&self, feedback: NewFeedback) -> Result<FeedbackExample> {
        let example = FeedbackExample {
            id: new_id(),
            created_at: now_rfc3339(),
            rating: feedback.rating,
            what_worked: feedback.what_worked,
            what_to_improve: feedback.what_to_improve,
            product_name: feedback.product_name,
            output_snapshot: feedback.output_snapshot,
        };

        let mut list: Vec<FeedbackExample> = self.read_list(FEEDBACK_FILE).await;
        list.insert(0, example.clone());
        list.truncate(MAX_FEEDBACK);
        self.write_list(FEEDBACK_FILE, &list).await?;
        Ok(example)
    }

    async fn get_feedback_examples(&self) -> Result<Vec<FeedbackExample>> {
        let mut list: Vec<FeedbackExample> = self.read_list(FEEDBACK_FILE).await;
        sort_by_recency(&mut list, |item| item.created_at.clone());
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn brief(name: &str, niche: &str) -> ProductBrief {
        ProductBrief {
            product_name: name.to_string(),
            niche: niche.to_string(),
            ..Default::default()
        }
    }

    fn feedback(rating: i32) -> NewFeedback {
        NewFeedback {
            rating,
            what_worked: "short hooks".to_string(),
            what_to_improve: String::new(),
            product_name: "Brush".to_string(),
            output_snapshot: String::new(),
        }
    }

    #[tokio::test]
    async fn test_save_and_load_product_profile() {
        let dir = tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());

        let saved = store.save_product_profile(&brief("Brush", "Beauty")).await.unwrap();
        assert!(!saved.id.is_empty());
        assert!(!saved.created_at.is_empty());

        let loaded = store.get_product_profiles().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].brief.product_name, "Brush");
    }

    #[tokio::test]
    async fn test_identity_dedup_replaces_older_entry() {
        let dir = tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());

        store.save_product_profile(&brief("Brush", "Beauty")).await.unwrap();
        let second = store.save_product_profile(&brief("  BRUSH ", "beauty")).await.unwrap();
        store.save_product_profile(&brief("Brush", "Home")).await.unwrap();

        let loaded = store.get_product_profiles().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().any(|p| p.id == second.id));
    }

    #[tokio::test]
    async fn test_profile_cap_drops_oldest() {
        let dir = tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());

        for i in 0..25 {
            store
                .save_product_profile(&brief(&format!("Product {}", i), "Niche"))
                .await
                .unwrap();
        }

        let loaded = store.get_product_profiles().await.unwrap();
        assert_eq!(loaded.len(), 20);
        assert_eq!(loaded[0].brief.product_name, "Product 24");
        assert!(!loaded.iter().any(|p| p.brief.product_name == "Product 0"));
    }

    #[tokio::test]
    async fn test_feedback_cap_and_order() {
        let dir = tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());

        for i in 0..125 {
            store.save_feedback_example(feedback((i % 5) + 1)).await.unwrap();
        }

        let loaded = store.get_feedback_examples().await.unwrap();
        assert_eq!(loaded.len(), 120);
        // Newest first.
        assert!(loaded[0].created_at >= loaded[119].created_at);
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());

        tokio::fs::create_dir_all(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join(PROFILES_FILE), "not json")
            .await
            .unwrap();

        let loaded = store.get_product_profiles().await.unwrap();
        assert!(loaded.is_empty());

        // Saving over a corrupt file works and starts fresh.
        store.save_product_profile(&brief("Brush", "Beauty")).await.unwrap();
        assert_eq!(store.get_product_profiles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_automation_dedup_by_name_and_info() {
        let dir = tempdir().unwrap();
        let store = FileProfileStore::new(dir.path());

        let auto = AutomationBrief {
            product_name: "Blender".to_string(),
            product_info: "USB portable".to_string(),
            ..Default::default()
        };
        store.save_automation_profile(&auto).await.unwrap();
        store.save_automation_profile(&auto).await.unwrap();

        let mut different = auto.clone();
        different.product_info = "With ice crusher".to_string();
        store.save_automation_profile(&different).await.unwrap();

        assert_eq!(store.get_automation_profiles().await.unwrap().len(), 2);
    }
}
