//! Testing utilities for the Vizwalk workspace
//!
//! Shared fixtures, deterministic clocks and scripted storage backends.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use vizwalk_catalog::{HostStorage, LaunchClock, ProjectRecord, StorageError};

/// Clock starting at a fixed instant, one millisecond further on every read
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::starting_at(fixed_instant())
    }
}

impl LaunchClock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock();
        let now = *next;
        *next = now + Duration::milliseconds(1);
        now
    }
}

/// 2026-10-16T09:30:15.000Z
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 15).unwrap()
}

pub fn sample_record(category: &str, project_name: &str, build_name: &str) -> ProjectRecord {
    ProjectRecord {
        category: category.to_string(),
        project_name: project_name.to_string(),
        build_name: build_name.to_string(),
        build_version: "V1".to_string(),
        slot_id: format!("{project_name}-1792143015000"),
        project_slot: project_name.to_string(),
        ..ProjectRecord::default()
    }
}

/// Small catalog across pinned and unpinned categories, in insertion order
pub fn sample_catalog() -> Vec<ProjectRecord> {
    let mut tower = sample_record("Retail", "Emirates Tower", "Lobby Walk");
    tower.area_sqft = "12500".to_string();
    tower.industry = "Fit-out".to_string();
    tower.design_style = "Modern_Minimal".to_string();
    tower.launch_ref = "https://walks.example.com/tower?quality=high".to_string();

    let mut marina = sample_record("SME", "Marina Office", "Floor 3");
    marina.launch_ref = r"C:\BUILDS\Marina\Windows\Blank.exe".to_string();

    let mut hq = sample_record("Enterprise", "Fintech HQ", "Reception");
    hq.launch_ref = "/experience?project=fintech-hq".to_string();

    let studio = sample_record("us", "Brooklyn Studio", "Loft");
    let mut annex = sample_record("", "Annex", "Basement");
    annex.video_ref = "https://videos.example.com/annex.mp4".to_string();
    let clinic = sample_record("Healthcare", "Clinic", "Ward");

    vec![tower, marina, hq, studio, annex, clinic]
}

/// Host capability serving a scripted value and recording saves
#[derive(Debug, Default)]
pub struct ScriptedHostStorage {
    stored: Mutex<Value>,
    saves: AtomicUsize,
}

impl ScriptedHostStorage {
    pub fn holding(value: Value) -> Self {
        Self {
            stored: Mutex::new(value),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn stored(&self) -> Value {
        self.stored.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostStorage for ScriptedHostStorage {
    async fn load_projects(&self) -> Result<Value, StorageError> {
        Ok(self.stored.lock().clone())
    }

    async fn save_projects(&self, records: &[ProjectRecord]) -> Result<(), StorageError> {
        *self.stored.lock() = serde_json::to_value(records)?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Host capability whose every call fails
#[derive(Debug, Default)]
pub struct FailingHostStorage {
    attempts: AtomicUsize,
}

impl FailingHostStorage {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostStorage for FailingHostStorage {
    async fn load_projects(&self) -> Result<Value, StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Read("host storage offline".to_string()))
    }

    async fn save_projects(&self, _records: &[ProjectRecord]) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Write("host storage offline".to_string()))
    }
}
