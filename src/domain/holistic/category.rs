//! Profile categories and the `c` selector that picks among them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode};

/// One facet of the holistic profile, each gated by its own sharing flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Demographics,
    Affects,
    Behavior,
    CognitiveAspects,
    Interest,
    PhysicalState,
    SocialRelations,
}

impl Category {
    /// Every category, in response order.
    pub const ALL: [Category; 7] = [
        Category::Demographics,
        Category::Affects,
        Category::Behavior,
        Category::CognitiveAspects,
        Category::Interest,
        Category::PhysicalState,
        Category::SocialRelations,
    ];

    /// Selector name accepted in the `c` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Demographics => "Demographics",
            Category::Affects => "Affects",
            Category::Behavior => "Behavior",
            Category::CognitiveAspects => "CognitiveAspects",
            Category::Interest => "Interest",
            Category::PhysicalState => "PhysicalState",
            Category::SocialRelations => "SocialRelations",
        }
    }

    /// Key of this category's slot in the aggregated JSON response.
    pub fn response_key(&self) -> &'static str {
        match self {
            Category::Demographics => "demographics",
            Category::Affects => "affects",
            Category::Behavior => "behavior",
            Category::CognitiveAspects => "cognitiveAspects",
            Category::Interest => "interest",
            Category::PhysicalState => "physicalState",
            Category::SocialRelations => "socialRelations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InvalidCategory, format!("Unknown category '{}'.", s))
                    .with_detail("c", s)
            })
    }
}

/// Which categories a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySelector {
    #[default]
    All,
    Only(Category),
}

impl CategorySelector {
    /// Returns true if the category is part of this selection.
    pub fn includes(&self, category: Category) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Only(selected) => *selected == category,
        }
    }

    /// Expands the selector into concrete categories.
    pub fn categories(&self) -> Vec<Category> {
        match self {
            CategorySelector::All => Category::ALL.to_vec(),
            CategorySelector::Only(category) => vec![*category],
        }
    }
}

impl FromStr for CategorySelector {
    type Err = DomainError;

    /// Parses `all` (any case) or a single category name.
    ///
    /// Unknown names are an `InvalidCategory` error rather than `All`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategorySelector::All);
        }
        s.parse().map(CategorySelector::Only)
    }
}
