use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Registration};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub team_name: String,
    pub leader_name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub leader_dept: String,
    pub member2_name: String,
    pub member2_email: String,
    pub member2_dept: String,
    pub member3_name: Option<String>,
    pub member3_email: Option<String>,
    pub member3_dept: Option<String>,
    pub project_title: Option<String>,
    pub project_description: Option<String>,
    pub git_link: Option<String>,
    pub notes: Option<String>,
    #[sea_orm(default_value = "pending")]
    pub status: String, // pending, selected, not_selected
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Registration {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(|_| {
            DomainError::Database(format!(
                "registration {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;

        Ok(Self {
            id: model.id,
            team_name: model.team_name,
            leader_name: model.leader_name,
            email: model.email,
            mobile: model.mobile,
            college: model.college,
            leader_dept: model.leader_dept,
            member2_name: model.member2_name,
            member2_email: model.member2_email,
            member2_dept: model.member2_dept,
            member3_name: model.member3_name,
            member3_email: model.member3_email,
            member3_dept: model.member3_dept,
            project_title: model.project_title,
            project_description: model.project_description,
            git_link: model.git_link,
            notes: model.notes,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Registration> for ActiveModel {
    fn from(r: Registration) -> Self {
        use sea_orm::Set;

        Self {
            id: Set(r.id),
            team_name: Set(r.team_name),
            leader_name: Set(r.leader_name),
            email: Set(r.email),
            mobile: Set(r.mobile),
            college: Set(r.college),
            leader_dept: Set(r.leader_dept),
            member2_name: Set(r.member2_name),
            member2_email: Set(r.member2_email),
            member2_dept: Set(r.member2_dept),
            member3_name: Set(r.member3_name),
            member3_email: Set(r.member3_email),
            member3_dept: Set(r.member3_dept),
            project_title: Set(r.project_title),
            project_description: Set(r.project_description),
            git_link: Set(r.git_link),
            notes: Set(r.notes),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
        }
    }
}
