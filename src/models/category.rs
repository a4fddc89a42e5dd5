//! BBQ bias categories and their source files.
//!
//! The table is fixed at compile time. Name lookup goes through a map built
//! once on first use.

use super::{BiasbenchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// One of the social dimensions BBQ probes for bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Age,
    DisabilityStatus,
    GenderIdentity,
    Nationality,
    PhysicalAppearance,
    RaceEthnicity,
    RaceXGender,
    Religion,
    Ses,
    SexualOrientation,
}

/// (category, name, file name), in load order.
static CATEGORY_TABLE: [(Category, &str, &str); 10] = [
    (Category::Age, "age", "Age.jsonl"),
    (Category::DisabilityStatus, "disability_status", "Disability_status.jsonl"),
    (Category::GenderIdentity, "gender_identity", "Gender_identity.jsonl"),
    (Category::Nationality, "nationality", "Nationality.jsonl"),
    (Category::PhysicalAppearance, "physical_appearance", "Physical_appearance.jsonl"),
    (Category::RaceEthnicity, "race_ethnicity", "Race_ethnicity.jsonl"),
    (Category::RaceXGender, "race_x_gender", "Race_x_gender.jsonl"),
    (Category::Religion, "religion", "Religion.jsonl"),
    (Category::Ses, "SES", "SES.jsonl"),
    (Category::SexualOrientation, "sexual_orientation", "Sexual_orientation.jsonl"),
];

static BY_NAME: LazyLock<HashMap<&'static str, Category>> = LazyLock::new(|| {
    CATEGORY_TABLE
        .iter()
        .map(|(category, name, _)| (*name, *category))
        .collect()
});

impl Category {
    /// Every category, in load order.
    pub const ALL: [Category; 10] = [
        Category::Age,
        Category::DisabilityStatus,
        Category::GenderIdentity,
        Category::Nationality,
        Category::PhysicalAppearance,
        Category::RaceEthnicity,
        Category::RaceXGender,
        Category::Religion,
        Category::Ses,
        Category::SexualOrientation,
    ];

    fn row(self) -> &'static (Category, &'static str, &'static str) {
        // ALL and CATEGORY_TABLE share an order.
        &CATEGORY_TABLE[self as usize]
    }

    /// Parameter name, e.g. `gender_identity`.
    pub fn name(self) -> &'static str {
        self.row().1
    }

    /// Source file name under the dataset root, e.g. `Gender_identity.jsonl`.
    pub fn file_name(self) -> &'static str {
        self.row().2
    }

    /// Comma-separated list of every valid name.
    pub fn allowed_names() -> String {
        CATEGORY_TABLE
            .iter()
            .map(|(_, name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve an optional category name into the categories to load.
    ///
    /// `None` (or an empty name) selects every category.
    pub fn select(name: Option<&str>) -> Result<Vec<Category>> {
        match name {
            None | Some("") => Ok(Self::ALL.to_vec()),
            Some(name) => Ok(vec![name.parse()?]),
        }
    }
}

impl FromStr for Category {
    type Err = BiasbenchError;

    fn from_str(s: &str) -> Result<Self> {
        BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| BiasbenchError::InvalidCategory {
                value: s.to_string(),
                allowed: Self::allowed_names(),
            })
    }
}

impl TryFrom<String> for Category {
    type Error = BiasbenchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.name().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
