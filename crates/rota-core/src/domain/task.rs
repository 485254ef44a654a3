//! A recurring chore and its weekly slots.
//!
//! Invariant: `assignments.len() <= capacity`. Every transition below checks
//! its preconditions and returns a new `Task`; the receiver is never touched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::errors::CommandError;
use super::ids::TaskId;
use super::user::User;
use super::weekday::Weekday;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,

    /// Maximum number of claimed weekdays per week.
    pub capacity: u8,

    /// Points awarded for each approved slot.
    pub points: u32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rules: String,

    /// At most one assignment per weekday, iterated Monday first.
    #[serde(default)]
    pub assignments: BTreeMap<Weekday, Assignment>,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>, capacity: u8, points: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            points,
            rules: String::new(),
            assignments: BTreeMap::new(),
        }
    }

    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = rules.into();
        self
    }

    pub fn occupied(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_full(&self) -> bool {
        self.occupied() >= usize::from(self.capacity)
    }

    pub fn assignment(&self, day: Weekday) -> Option<&Assignment> {
        self.assignments.get(&day)
    }

    /// Days that can still be claimed right now.
    pub fn open_days(&self) -> Vec<Weekday> {
        if self.is_full() {
            return Vec::new();
        }
        Weekday::ALL
            .into_iter()
            .filter(|day| !self.assignments.contains_key(day))
            .collect()
    }

    /// Take an empty slot. Fails if the slot is taken or the task is full.
    pub fn claim(&self, day: Weekday, user: &User, now: DateTime<Utc>) -> Result<Self, CommandError> {
        if let Some(existing) = self.assignments.get(&day) {
            return Err(CommandError::SlotOccupied {
                task: self.id,
                day,
                claimant: existing.claimant_name.clone(),
            });
        }
        if self.is_full() {
            return Err(CommandError::CapacityExceeded {
                task: self.id,
                capacity: self.capacity,
            });
        }
        Ok(self.with_assignment(day, Assignment::taken(user, now)))
    }

    pub fn complete(
        &self,
        day: Weekday,
        photo: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, CommandError> {
        let current = self.slot(day)?;
        Ok(self.with_assignment(day, current.complete(photo, now)))
    }

    pub fn approve(&self, day: Weekday, now: DateTime<Utc>) -> Result<Self, CommandError> {
        let next = self.slot(day)?.approve(now)?;
        Ok(self.with_assignment(day, next))
    }

    pub fn reject(&self, day: Weekday, comment: impl Into<String>) -> Result<Self, CommandError> {
        let next = self.slot(day)?.reject(comment)?;
        Ok(self.with_assignment(day, next))
    }

    /// Remove the slot whatever its status. Returns the removed assignment.
    pub fn release(&self, day: Weekday) -> Result<(Self, Assignment), CommandError> {
        let mut next = self.clone();
        let removed = next
            .assignments
            .remove(&day)
            .ok_or(CommandError::SlotNotFound { task: self.id, day })?;
        Ok((next, removed))
    }

    fn slot(&self, day: Weekday) -> Result<&Assignment, CommandError> {
        self.assignments
            .get(&day)
            .ok_or(CommandError::SlotNotFound { task: self.id, day })
    }

    fn with_assignment(&self, day: Weekday, assignment: Assignment) -> Self {
        let mut next = self.clone();
        next.assignments.insert(day, assignment);
        next
    }
}
