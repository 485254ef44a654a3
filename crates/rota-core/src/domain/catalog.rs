//! Seed catalog of household chores.
//!
//! The catalog is fixed for the lifetime of a board: tasks are seeded once
//! and never added or removed afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ids::TaskId;
use super::task::Task;
use super::weekday::Weekday;

/// Definition of one chore before it receives an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    pub capacity: u8,
    pub points: u32,
    #[serde(default)]
    pub rules: String,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, capacity: u8, points: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            points,
            rules: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no tasks")]
    Empty,

    #[error("task #{0} has a blank name")]
    BlankName(usize),

    #[error("task name '{0}' appears more than once")]
    DuplicateName(String),

    #[error("task '{name}' has capacity {capacity}; expected 1..=7")]
    CapacityOutOfRange { name: String, capacity: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tasks: Vec<TaskSpec>,
}

impl Catalog {
    pub fn new(tasks: Vec<TaskSpec>) -> Self {
        Self { tasks }
    }

    /// The shared house the rota was first written for.
    pub fn household_default() -> Self {
        Self::new(vec![
            TaskSpec::new("Kitchen", 3, 3),
            TaskSpec::new("Dining room", 3, 3),
            TaskSpec::new("Patio", 5, 5),
            TaskSpec::new("Bathroom 1", 3, 3),
            TaskSpec::new("Bathroom 2", 5, 5),
            TaskSpec::new("Little theatre", 3, 3),
            TaskSpec::new("Hallway", 5, 5),
            TaskSpec::new("Market run", 6, 6),
        ])
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn specs(&self) -> &[TaskSpec] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.tasks.is_empty() {
            return Err(CatalogError::Empty);
        }
        let max_capacity = Weekday::ALL.len() as u8;
        let mut seen = HashSet::new();
        for (index, spec) in self.tasks.iter().enumerate() {
            let name = spec.name.trim();
            if name.is_empty() {
                return Err(CatalogError::BlankName(index));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(CatalogError::DuplicateName(name.to_string()));
            }
            if spec.capacity == 0 || spec.capacity > max_capacity {
                return Err(CatalogError::CapacityOutOfRange {
                    name: name.to_string(),
                    capacity: spec.capacity,
                });
            }
        }
        Ok(())
    }

    /// Turn each `TaskSpec` into an empty task, in catalog order.
    pub fn seed(&self, mut next_id: impl FnMut() -> TaskId) -> Vec<Task> {
        self.tasks
            .iter()
            .map(|spec| {
                Task::new(next_id(), spec.name.trim(), spec.capacity, spec.points)
                    .with_rules(spec.rules.clone())
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::household_default()
    }
}
