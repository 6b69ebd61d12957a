use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Stakeholder role, stored as text on the tenant's stakeholders table and
/// carried in the JWT `stakeholderType` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderType {
    Admin,
    Board,
    Owner,
    Resident,
    Vendor,
}

impl StakeholderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StakeholderType::Admin => "admin",
            StakeholderType::Board => "board",
            StakeholderType::Owner => "owner",
            StakeholderType::Resident => "resident",
            StakeholderType::Vendor => "vendor",
        }
    }
}

impl std::str::FromStr for StakeholderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(StakeholderType::Admin),
            "board" => Ok(StakeholderType::Board),
            "owner" => Ok(StakeholderType::Owner),
            "resident" => Ok(StakeholderType::Resident),
            "vendor" => Ok(StakeholderType::Vendor),
            other => Err(format!("unknown stakeholder type: {}", other)),
        }
    }
}

impl std::fmt::Display for StakeholderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions gated by the permission matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    CommunityRead,
    CommunityManage,
    PropertyRead,
    PropertyManage,
    StakeholderRead,
    StakeholderManage,
    AmenityRead,
    AmenityManage,
    TicketRead,
    TicketCreate,
    TicketManage,
    AssignmentRead,
    AssignmentManage,
    OrganizationAdmin,
}

impl StakeholderType {
    /// Permission matrix keyed on stakeholder type.
    ///
    /// Admins hold every permission. Board members run the association but
    /// cannot provision organizations or manage login accounts. Owners and
    /// residents are limited to what they can see plus opening tickets;
    /// vendors only see the tickets assigned to them.
    pub fn allows(&self, permission: Permission) -> bool {
        use Permission::*;

        match self {
            StakeholderType::Admin => true,
            StakeholderType::Board => matches!(
                permission,
                CommunityRead
                    | CommunityManage
                    | PropertyRead
                    | PropertyManage
                    | StakeholderRead
                    | AmenityRead
                    | AmenityManage
                    | TicketRead
                    | TicketCreate
                    | TicketManage
                    | AssignmentRead
                    | AssignmentManage
            ),
            StakeholderType::Owner => matches!(
                permission,
                CommunityRead | PropertyRead | AmenityRead | TicketRead | TicketCreate
            ),
            StakeholderType::Resident => matches!(permission, AmenityRead | TicketRead | TicketCreate),
            StakeholderType::Vendor => matches!(permission, TicketRead | AssignmentRead),
        }
    }
}

/// Map a denied permission to the 403 the route handlers return
pub fn require(stakeholder_type: StakeholderType, permission: Permission) -> Result<(), ApiError> {
    if stakeholder_type.allows(permission) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Stakeholder type '{}' is not permitted to perform this action",
            stakeholder_type
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::Permission::*;
    use super::*;

    #[test]
    fn admin_holds_every_permission() {
        for permission in [
            CommunityManage,
            PropertyManage,
            StakeholderManage,
            AmenityManage,
            TicketManage,
            AssignmentManage,
            OrganizationAdmin,
        ] {
            assert!(StakeholderType::Admin.allows(permission));
        }
    }

    #[test]
    fn board_runs_the_association_but_not_the_platform() {
        assert!(StakeholderType::Board.allows(CommunityManage));
        assert!(StakeholderType::Board.allows(AssignmentManage));
        assert!(StakeholderType::Board.allows(StakeholderRead));
        assert!(!StakeholderType::Board.allows(StakeholderManage));
        assert!(!StakeholderType::Board.allows(OrganizationAdmin));
    }

    #[test]
    fn owners_and_residents_open_tickets_only() {
        assert!(StakeholderType::Owner.allows(TicketCreate));
        assert!(StakeholderType::Owner.allows(PropertyRead));
        assert!(!StakeholderType::Owner.allows(PropertyManage));

        assert!(StakeholderType::Resident.allows(TicketCreate));
        assert!(!StakeholderType::Resident.allows(PropertyRead));
        assert!(!StakeholderType::Resident.allows(CommunityManage));
    }

    #[test]
    fn vendors_see_their_work_and_nothing_else() {
        assert!(StakeholderType::Vendor.allows(TicketRead));
        assert!(StakeholderType::Vendor.allows(AssignmentRead));
        assert!(!StakeholderType::Vendor.allows(TicketCreate));
        assert!(!StakeholderType::Vendor.allows(AmenityRead));
    }

    #[test]
    fn parses_and_prints_role_names() {
        for role in [
            StakeholderType::Admin,
            StakeholderType::Board,
            StakeholderType::Owner,
            StakeholderType::Resident,
            StakeholderType::Vendor,
        ] {
            assert_eq!(role.as_str().parse::<StakeholderType>(), Ok(role));
        }
        assert!("janitor".parse::<StakeholderType>().is_err());
    }

    #[test]
    fn require_maps_denial_to_forbidden() {
        assert!(require(StakeholderType::Board, TicketManage).is_ok());
        let err = require(StakeholderType::Vendor, CommunityManage).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
