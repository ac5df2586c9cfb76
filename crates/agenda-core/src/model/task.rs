//! To-do items.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Task category.
///
/// Stored locally and sent remotely by its upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    University,
    Work,
    Household,
    Sport,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::University,
        Category::Work,
        Category::Household,
        Category::Sport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::University => "UNIVERSITY",
            Category::Work => "WORK",
            Category::Household => "HOUSEHOLD",
            Category::Sport => "SPORT",
        }
    }

    /// Default location for events created from a task of this category.
    pub fn location(&self) -> &'static str {
        match self {
            Category::University => "Campus",
            Category::Work => "Office",
            Category::Household => "Home",
            Category::Sport => "Gym",
        }
    }

    /// Default travel time in minutes.
    pub fn travel_time(&self) -> i32 {
        match self {
            Category::University => 30,
            Category::Work => 20,
            Category::Household => 0,
            Category::Sport => 15,
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_uppercase();
        Self::ALL.into_iter().find(|c| c.name() == upper)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ValidationError::InvalidValue {
            field: "category".into(),
            message: format!(
                "unknown category '{s}' (expected one of {})",
                Self::ALL.map(|c| c.name()).join(", ")
            ),
        })
    }
}

/// Eisenhower-style priority. The ordinal (1..=4) is what the local table stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    UrgentImportant = 1,
    UrgentNotImportant = 2,
    NotUrgentImportant = 3,
    NotUrgentNotImportant = 4,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::UrgentImportant,
        Priority::UrgentNotImportant,
        Priority::NotUrgentImportant,
        Priority::NotUrgentNotImportant,
    ];

    pub fn value(&self) -> i32 {
        *self as i32
    }

    /// Map an ordinal to a priority. Out-of-range values fall back to the lowest priority.
    pub fn from_value(value: i32) -> Self {
        match value {
            1 => Priority::UrgentImportant,
            2 => Priority::UrgentNotImportant,
            3 => Priority::NotUrgentImportant,
            _ => Priority::NotUrgentNotImportant,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Priority::UrgentImportant => "URGENT_IMPORTANT",
            Priority::UrgentNotImportant => "URGENT_NOT_IMPORTANT",
            Priority::NotUrgentImportant => "NOT_URGENT_IMPORTANT",
            Priority::NotUrgentNotImportant => "NOT_URGENT_NOT_IMPORTANT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_uppercase();
        Self::ALL.into_iter().find(|p| p.name() == upper)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NotUrgentNotImportant
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a name (`urgent_important`) or an ordinal (`1`..=`4`).
impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(p) = Self::from_name(s) {
            return Ok(p);
        }
        match s.trim().parse::<i32>() {
            Ok(v @ 1..=4) => Ok(Self::from_value(v)),
            _ => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("unknown priority '{s}' (expected 1-4 or a quadrant name)"),
            }),
        }
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub priority: Priority,
}

impl Task {
    /// Create a task with a fresh id.
    ///
    /// # Errors
    /// Returns an error if the title is blank.
    pub fn new(
        title: impl Into<String>,
        category: Option<Category>,
        description: Option<String>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            category,
            description: description.filter(|d| !d.trim().is_empty()),
            priority,
        })
    }
}
