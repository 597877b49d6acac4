//! Reference data: small lookup tables used to populate form dropdowns.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The reference-data tables exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Project stages (carry a win probability).
    Stage,
    /// Services.
    Service,
    /// Payment types.
    Payment,
    /// Business segments.
    BusinessSegment,
    /// Evaluation types.
    Evaluation,
    /// Cost types.
    Cost,
    /// Revenue statuses.
    RevenueStatus,
    /// Cost statuses.
    CostStatus,
}

impl ReferenceKind {
    /// Every kind, in display order.
    pub const ALL: [ReferenceKind; 8] = [
        ReferenceKind::Stage,
        ReferenceKind::Service,
        ReferenceKind::Payment,
        ReferenceKind::BusinessSegment,
        ReferenceKind::Evaluation,
        ReferenceKind::Cost,
        ReferenceKind::RevenueStatus,
        ReferenceKind::CostStatus,
    ];

    /// Path segment of the collection, used for listing.
    pub fn collection_segment(self) -> &'static str {
        match self {
            ReferenceKind::Stage => "stages",
            ReferenceKind::Service => "service",
            ReferenceKind::Payment => "payment",
            ReferenceKind::BusinessSegment => "business_segment",
            ReferenceKind::Evaluation => "evaluations",
            ReferenceKind::Cost => "cost",
            ReferenceKind::RevenueStatus => "revenue_statuses",
            ReferenceKind::CostStatus => "cost_status",
        }
    }

    /// Path segment for single entries: create, get, update and delete.
    ///
    /// Differs from [`collection_segment`](Self::collection_segment) only
    /// where the backend lists under a plural.
    pub fn item_segment(self) -> &'static str {
        match self {
            ReferenceKind::Evaluation => "evaluation",
            ReferenceKind::RevenueStatus => "revenue_status",
            other => other.collection_segment(),
        }
    }

    /// Label for screens and messages.
    pub fn label(self) -> &'static str {
        match self {
            ReferenceKind::Stage => "Stages",
            ReferenceKind::Service => "Services",
            ReferenceKind::Payment => "Payment types",
            ReferenceKind::BusinessSegment => "Business segments",
            ReferenceKind::Evaluation => "Evaluation types",
            ReferenceKind::Cost => "Cost types",
            ReferenceKind::RevenueStatus => "Revenue statuses",
            ReferenceKind::CostStatus => "Cost statuses",
        }
    }

    /// Whether entries of this kind carry a probability.
    pub fn has_probability(self) -> bool {
        matches!(self, ReferenceKind::Stage)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored reference entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Entry id.
    pub oid: Uuid,
    /// Display name.
    pub name: String,
    /// Win probability, stages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

/// Body for creating or updating a reference entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceDraft {
    /// Display name.
    pub name: String,
    /// Win probability, stages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

impl ReferenceDraft {
    /// Draft with a name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            probability: None,
        }
    }

    /// Set the probability.
    #[must_use]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }
}
