use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single right a membership can carry.
///
/// Checks are exact set membership over these three tags; there is no
/// wildcard and no implication between them (DELETE does not imply WRITE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Right {
    Read,
    Write,
    Delete,
}

impl Right {
    /// The full rights set granted to a group's creator.
    pub fn full() -> Vec<Right> {
        vec![Right::Read, Right::Write, Right::Delete]
    }
}

impl std::fmt::Display for Right {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Right::Read => "READ",
            Right::Write => "WRITE",
            Right::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Join record granting one account a set of rights within one group.
/// An account belongs to at most one group at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: String,
    pub group: String,
    pub account: String,
    pub rights: Vec<Right>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn new(group: String, account: String, rights: Vec<Right>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            group,
            account,
            rights,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_right(&self, right: Right) -> bool {
        self.rights.contains(&right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_rights_carry_all_three_tags() {
        let member = Member::new("g".to_string(), "a".to_string(), Right::full());
        assert!(member.has_right(Right::Read));
        assert!(member.has_right(Right::Write));
        assert!(member.has_right(Right::Delete));
    }

    #[test]
    fn rights_do_not_imply_each_other() {
        let member = Member::new("g".to_string(), "a".to_string(), vec![Right::Delete]);
        assert!(member.has_right(Right::Delete));
        assert!(!member.has_right(Right::Read));
        assert!(!member.has_right(Right::Write));
    }
}
