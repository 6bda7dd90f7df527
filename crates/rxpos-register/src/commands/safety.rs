//! # Safety Commands
//!
//! Drug-interaction checks for the live cart.
//!
//! ## Checkout Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart products change                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  fetch_interactions(sorted product ids)                                 │
//! │        │                                                                │
//! │        ├── Ok  → findings replaced, counseled flags carried over        │
//! │        └── Err → toast, previous findings kept, cart not "checked"      │
//! │                                                                         │
//! │  ┌──────────────────────┐    override_safety    ┌──────────────────┐   │
//! │  │ critical finding     │ ────────────────────► │ checkout allowed │   │
//! │  │ (major or contra-    │                       │ override sent    │   │
//! │  │  indicated)          │                       │ with the sale    │   │
//! │  │ → checkout disabled  │                       └──────────────────┘   │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use rxpos_core::{InteractionFinding, SafetyOverride, SafetyPanel, Urgency};

use super::Register;
use crate::error::{ApiError, ApiResult};

/// One finding with its display emphasis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingView {
    #[serde(flatten)]
    pub finding: InteractionFinding,
    pub urgency: Urgency,
    pub css_class: &'static str,
}

/// The safety panel as the register shows it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyResponse {
    pub findings: Vec<FindingView>,
    pub has_critical: bool,
    pub checkout_blocked: bool,
    pub override_record: Option<SafetyOverride>,
    /// "No interactions found" when the list is empty.
    pub clear_message: Option<&'static str>,
}

impl From<&SafetyPanel> for SafetyResponse {
    fn from(panel: &SafetyPanel) -> Self {
        SafetyResponse {
            findings: panel
                .findings()
                .iter()
                .map(|f| {
                    let urgency = Urgency::from(f.severity);
                    FindingView {
                        finding: f.clone(),
                        urgency,
                        css_class: urgency.css_class(),
                    }
                })
                .collect(),
            has_critical: panel.has_critical(),
            checkout_blocked: panel.checkout_blocked(),
            override_record: panel.override_record().cloned(),
            clear_message: panel.clear_message(),
        }
    }
}

impl Register {
    pub fn get_safety(&self) -> SafetyResponse {
        debug!("get_safety command");
        self.state.with_session(|s| SafetyResponse::from(&s.safety))
    }

    /// Fetches findings for the cart's current products.
    ///
    /// An empty cart needs no call. When the cart changes while the request
    /// is in flight the stale answer is dropped.
    pub async fn refresh_interactions(&self) -> ApiResult<SafetyResponse> {
        debug!("refresh_interactions command");

        let products = self.state.with_session(|s| s.product_key());

        if products.is_empty() {
            self.state.with_session_mut(|s| {
                s.safety.set_findings(Vec::new());
                s.mark_checked(Vec::new());
            });
            return Ok(self.get_safety());
        }

        let findings = self
            .remote(
                "fetch_interactions",
                self.backend.fetch_interactions(&products),
            )
            .await?;

        self.state.with_session_mut(|s| {
            if s.product_key() != products {
                debug!("Cart changed during interaction check, dropping result");
                return;
            }
            debug!(
                products = products.len(),
                findings = findings.len(),
                "Interactions checked"
            );
            s.safety.set_findings(findings);
            s.mark_checked(products);
        });

        Ok(self.get_safety())
    }

    /// Flips a finding's "counseled" checkbox.
    pub fn toggle_counseled(&self, finding_id: &str) -> ApiResult<SafetyResponse> {
        debug!(finding_id = %finding_id, "toggle_counseled command");

        self.state.with_session_mut(|s| {
            s.safety.toggle_counseled(finding_id)?;
            Ok(SafetyResponse::from(&s.safety))
        })
    }

    /// Lets checkout proceed past critical findings.
    ///
    /// `actor` defaults to the configured register operator. The record is
    /// attached to the next sale submission.
    pub fn override_safety(&self, actor: Option<&str>) -> ApiResult<SafetyOverride> {
        let actor = actor
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(&self.config.register.operator);
        debug!(actor = %actor, "override_safety command");

        let record = self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            if !s.safety.has_critical() {
                return Err(ApiError::validation("No critical interactions to override"));
            }
            Ok(s.safety.override_checkout(actor)?)
        })?;

        warn!(
            actor = %record.actor,
            findings = ?record.finding_ids,
            "Safety override recorded"
        );
        Ok(record)
    }

    /// Re-checks after a cart change. Failures were already reported.
    pub(crate) async fn recheck_interactions(&self) {
        if let Err(e) = self.refresh_interactions().await {
            debug!(error = %e, "Interaction check deferred to checkout");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::harness;
    use crate::error::ErrorKind;
    use rxpos_core::Urgency;

    #[tokio::test]
    async fn test_adding_interacting_pair_blocks_checkout() {
        let h = harness().await;
        h.register.add_product("warf-5").await.unwrap();
        assert_eq!(h.register.get_safety().clear_message, Some("No interactions found"));

        h.register.add_product("asa-81").await.unwrap();
        let safety = h.register.get_safety();

        assert_eq!(safety.findings.len(), 1);
        assert_eq!(safety.findings[0].urgency, Urgency::Critical);
        assert_eq!(safety.findings[0].css_class, "critical");
        assert!(safety.checkout_blocked);
        assert!(h.register.get_tender().blocked_reason.is_some());
    }

    #[tokio::test]
    async fn test_minor_finding_does_not_block() {
        let h = harness().await;
        h.register.add_product("ibu-200").await.unwrap();
        h.register.add_product("antacid").await.unwrap();

        let safety = h.register.get_safety();
        assert_eq!(safety.findings.len(), 1);
        assert_eq!(safety.findings[0].urgency, Urgency::Neutral);
        assert!(!safety.checkout_blocked);
    }

    #[tokio::test]
    async fn test_override_unblocks_and_resets_on_new_critical() {
        let h = harness().await;
        h.register.add_product("warf-5").await.unwrap();
        h.register.add_product("asa-81").await.unwrap();

        let record = h.register.override_safety(None).unwrap();
        assert_eq!(record.actor, "register");
        assert_eq!(record.finding_ids, vec!["warf-5:asa-81"]);
        assert!(!h.register.get_safety().checkout_blocked);

        h.register.add_product("simva-20").await.unwrap();
        h.register.add_product("clari-500").await.unwrap();
        let safety = h.register.get_safety();
        assert!(safety.override_record.is_none());
        assert!(safety.checkout_blocked);
    }

    #[tokio::test]
    async fn test_override_without_critical_is_rejected() {
        let h = harness().await;
        h.register.add_product("amox-500").await.unwrap();

        let err = h.register.override_safety(Some("pharmacist")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_toggle_counseled_survives_recheck() {
        let h = harness().await;
        h.register.add_product("ibu-200").await.unwrap();
        h.register.add_product("antacid").await.unwrap();

        let safety = h.register.toggle_counseled("ibu-200:antacid").unwrap();
        assert!(safety.findings[0].finding.counseled);

        h.register.add_product("amox-500").await.unwrap();
        assert!(h.register.get_safety().findings[0].finding.counseled);

        let err = h.register.toggle_counseled("nope").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_failed_check_keeps_findings_and_notifies() {
        let h = harness().await;
        h.register.add_product("warf-5").await.unwrap();
        h.register.add_product("asa-81").await.unwrap();

        h.backend.fail_with("interaction service down").await;
        h.register.add_product("amox-500").await.unwrap();

        assert_eq!(h.register.get_safety().findings.len(), 1);
        assert_eq!(h.notifier.errors(), vec!["interaction service down"]);
        assert!(!h.register.state().with_session(|s| s.interactions_current()));
    }
}
