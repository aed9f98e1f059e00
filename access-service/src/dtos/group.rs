use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dtos::member::MemberResponse;
use crate::models::Group;
use crate::services::GroupDraft;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GroupRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "business_code must not be empty"))]
    pub business_code: String,
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "domains must not be empty"))]
    pub domains: String,
}

impl From<GroupRequest> for GroupDraft {
    fn from(req: GroupRequest) -> Self {
        Self {
            name: req.name,
            business_code: req.business_code,
            address: req.address,
            domains: req.domains,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub business_code: String,
    pub address: String,
    pub domains: String,
    pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            business_code: group.business_code,
            address: group.address,
            domains: group.domains,
            created_at: group.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateGroupResponse {
    pub group: GroupResponse,
    pub member: MemberResponse,
}
