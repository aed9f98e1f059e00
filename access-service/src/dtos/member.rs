use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Member, Right};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMemberRequest {
    #[validate(length(min = 1, message = "account must not be empty"))]
    pub account: String,
    #[validate(length(min = 1, message = "rights must not be empty"))]
    pub rights: Vec<Right>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, message = "rights must not be empty"))]
    pub rights: Vec<Right>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub id: String,
    pub group: String,
    pub account: String,
    pub rights: Vec<Right>,
    pub created_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            group: member.group,
            account: member.account,
            rights: member.rights,
            created_at: member.created_at,
        }
    }
}
