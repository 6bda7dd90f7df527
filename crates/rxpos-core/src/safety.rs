//! # Safety Panel
//!
//! Drug-interaction findings for the current cart, the pharmacist's
//! counseling notes, and the override that lets a risky sale through.
//!
//! ## Checkout Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  findings ──► any Contraindicated / Major?                              │
//! │                   │                                                     │
//! │                   ├── no ──────────────────────────► checkout allowed   │
//! │                   │                                                     │
//! │                   └── yes ─► override recorded?                         │
//! │                                 ├── yes ───────────► checkout allowed   │
//! │                                 └── no ────────────► checkout BLOCKED   │
//! │                                                                         │
//! │  Counseling a finding is documentation only. It never opens the gate.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The override is an audit record (who, when, which findings). The caller
//! sends it with the sale so the backend can persist it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{InteractionFinding, Severity};

/// Message shown when the cart has no interactions.
pub const NO_INTERACTIONS_MESSAGE: &str = "No interactions found";

/// Visual emphasis for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Moderate,
    Neutral,
}

impl Urgency {
    pub const fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Contraindicated | Severity::Major => Urgency::Critical,
            Severity::Moderate => Urgency::Moderate,
            Severity::Minor => Urgency::Neutral,
        }
    }

    /// Style class applied to the finding's row.
    pub const fn css_class(&self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::Moderate => "moderate",
            Urgency::Neutral => "neutral",
        }
    }
}

impl From<Severity> for Urgency {
    fn from(severity: Severity) -> Self {
        Urgency::for_severity(severity)
    }
}

/// Audit record of a pharmacist letting a sale through despite critical
/// interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SafetyOverride {
    pub actor: String,
    #[ts(as = "String")]
    pub overridden_at: DateTime<Utc>,
    /// Critical findings outstanding at the moment of the override.
    pub finding_ids: Vec<String>,
}

/// Findings for the live cart plus the override state.
#[derive(Debug, Clone, Default)]
pub struct SafetyPanel {
    findings: Vec<InteractionFinding>,
    override_record: Option<SafetyOverride>,
}

impl SafetyPanel {
    pub fn new() -> Self {
        SafetyPanel::default()
    }

    /// Replaces the findings after the cart changed.
    ///
    /// Counseled flags carry over for findings with the same id. A recorded
    /// override survives only while the set of critical findings is
    /// unchanged; a new critical pair needs a fresh override.
    pub fn set_findings(&mut self, findings: Vec<InteractionFinding>) {
        let before = self.critical_ids();

        let mut findings = findings;
        for finding in &mut findings {
            if let Some(previous) = self.findings.iter().find(|f| f.id == finding.id) {
                finding.counseled = finding.counseled || previous.counseled;
            }
        }
        self.findings = findings;

        if self.critical_ids() != before {
            self.override_record = None;
        }
    }

    pub fn findings(&self) -> &[InteractionFinding] {
        &self.findings
    }

    /// True when there is nothing to show.
    pub fn is_clear(&self) -> bool {
        self.findings.is_empty()
    }

    /// Positive empty-state text, `None` while findings exist.
    pub fn clear_message(&self) -> Option<&'static str> {
        self.is_clear().then_some(NO_INTERACTIONS_MESSAGE)
    }

    pub fn has_critical(&self) -> bool {
        self.findings.iter().any(|f| f.severity.is_critical())
    }

    /// Drives the tender's `disabled` input.
    pub fn checkout_blocked(&self) -> bool {
        self.has_critical() && self.override_record.is_none()
    }

    pub fn override_record(&self) -> Option<&SafetyOverride> {
        self.override_record.as_ref()
    }

    /// Lets checkout proceed despite critical findings.
    ///
    /// Findings keep their counseled flags; nothing is marked counseled.
    pub fn override_checkout(&mut self, actor: &str) -> CoreResult<SafetyOverride> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(ValidationError::Required {
                field: "override actor".to_string(),
            }
            .into());
        }

        let record = SafetyOverride {
            actor: actor.to_string(),
            overridden_at: Utc::now(),
            finding_ids: self.critical_ids(),
        };
        self.override_record = Some(record.clone());
        Ok(record)
    }

    /// Flips a finding's counseled flag and returns the new value.
    pub fn toggle_counseled(&mut self, finding_id: &str) -> CoreResult<bool> {
        let finding = self
            .findings
            .iter_mut()
            .find(|f| f.id == finding_id)
            .ok_or_else(|| CoreError::FindingNotFound(finding_id.to_string()))?;
        finding.counseled = !finding.counseled;
        Ok(finding.counseled)
    }

    /// Forgets findings and override (after a sale or when the cart empties).
    pub fn reset(&mut self) {
        self.findings.clear();
        self.override_record = None;
    }

    fn critical_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .findings
            .iter()
            .filter(|f| f.severity.is_critical())
            .map(|f| f.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
