//! # Admin Commands
//!
//! Organizations and their members. Validation happens here; the backend
//! enforces uniqueness and permissions.

use tracing::{debug, info};

use rxpos_core::validation::{validate_email, validate_org_name, validate_uuid};
use rxpos_core::{Membership, NewOrganization, Organization, Role};

use super::Register;
use crate::error::ApiResult;

impl Register {
    pub async fn list_organizations(&self) -> ApiResult<Vec<Organization>> {
        debug!("list_organizations command");
        self.remote("list_organizations", self.backend.list_organizations())
            .await
    }

    /// Creates an organization with a trimmed, non-empty name.
    pub async fn create_organization(&self, name: &str) -> ApiResult<Organization> {
        debug!(name = %name, "create_organization command");

        let name = validate_org_name(name)?;
        let organization = self
            .remote(
                "create_organization",
                self.backend.create_organization(NewOrganization { name }),
            )
            .await?;

        info!(org_id = %organization.id, name = %organization.name, "Organization created");
        self.notifier
            .notify_success(&format!("Organization {} created", organization.name));
        Ok(organization)
    }

    /// Adds a member by email. The role is parsed from the role picker's
    /// text (`owner`, `admin`, `pharmacist`, `cashier`).
    pub async fn add_member(&self, org_id: &str, email: &str, role: &str) -> ApiResult<Membership> {
        debug!(org_id = %org_id, role = %role, "add_member command");

        validate_uuid(org_id)?;
        let email = validate_email(email)?;
        let role: Role = role.parse()?;

        let membership = self
            .remote(
                "add_member",
                self.backend.add_member(org_id.trim(), &email, role),
            )
            .await?;

        info!(org_id = %membership.organization_id, role = ?membership.role, "Member added");
        self.notifier
            .notify_success(&format!("{} added", membership.email));
        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::harness;
    use crate::error::ErrorKind;
    use rxpos_core::Role;

    #[tokio::test]
    async fn test_create_and_list_organizations() {
        let h = harness().await;

        let org = h.register.create_organization("  Corner Pharmacy ").await.unwrap();
        assert_eq!(org.name, "Corner Pharmacy");
        assert_eq!(h.notifier.successes(), vec!["Organization Corner Pharmacy created"]);

        let orgs = h.register.list_organizations().await.unwrap();
        assert_eq!(orgs.len(), 1);

        let err = h.register.create_organization("corner pharmacy").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(h.notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_org_name_never_reaches_backend() {
        let h = harness().await;

        let err = h.register.create_organization("   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(h.notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_add_member() {
        let h = harness().await;
        let org = h.register.create_organization("Corner Pharmacy").await.unwrap();

        let member = h
            .register
            .add_member(&org.id, "Pat@Example.com", "pharmacist")
            .await
            .unwrap();
        assert_eq!(member.email, "pat@example.com");
        assert_eq!(member.role, Role::Pharmacist);
        assert_eq!(h.backend.members(&org.id).await.len(), 1);

        let err = h
            .register
            .add_member(&org.id, "pat@example.com", "cashier")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = h
            .register
            .add_member(&org.id, "not-an-email", "cashier")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = h
            .register
            .add_member(&org.id, "sam@example.com", "janitor")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_add_member_to_unknown_org() {
        let h = harness().await;
        let err = h
            .register
            .add_member("550e8400-e29b-41d4-a716-446655440000", "pat@example.com", "owner")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
