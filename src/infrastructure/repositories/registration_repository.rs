//! SeaORM implementation of RegistrationRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::{
    DomainError, NewRegistration, Registration, RegistrationChanges, RegistrationFilter,
    RegistrationRepository, RegistrationStatus,
};
use crate::models::registration::{ActiveModel, Column, Entity as RegistrationEntity, Model};
use crate::utils::time::now_iso;

/// SeaORM-based implementation of RegistrationRepository
pub struct SeaOrmRegistrationRepository {
    db: DatabaseConnection,
}

impl SeaOrmRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `LIKE` wildcards in user input match literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match, same semantics as the local store
fn ilike(column: Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    let pattern = format!("%{}%", escape_like(needle));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn to_domain(models: Vec<Model>) -> Result<Vec<Registration>, DomainError> {
    models.into_iter().map(Registration::try_from).collect()
}

#[async_trait]
impl RegistrationRepository for SeaOrmRegistrationRepository {
    async fn find_all(&self, filter: RegistrationFilter) -> Result<Vec<Registration>, DomainError> {
        let mut query = RegistrationEntity::find();

        if let Some(term) = filter.search_term() {
            let needle = term.to_lowercase();
            let cond = Condition::any()
                .add(ilike(Column::TeamName, &needle))
                .add(ilike(Column::LeaderName, &needle))
                .add(ilike(Column::Email, &needle));
            query = query.filter(cond);
        }

        if let Some(dept) = filter.department() {
            query = query.filter(Column::LeaderDept.eq(dept));
        }

        let models = query
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        to_domain(models)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DomainError> {
        RegistrationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Registration::try_from)
            .transpose()
    }

    async fn create(&self, input: NewRegistration) -> Result<Registration, DomainError> {
        let input = input.normalized();
        let status = input.status.unwrap_or_default();

        let registration = ActiveModel {
            team_name: Set(input.team_name),
            leader_name: Set(input.leader_name),
            email: Set(input.email),
            mobile: Set(input.mobile),
            college: Set(input.college),
            leader_dept: Set(input.leader_dept),
            member2_name: Set(input.member2_name),
            member2_email: Set(input.member2_email),
            member2_dept: Set(input.member2_dept),
            member3_name: Set(input.member3_name),
            member3_email: Set(input.member3_email),
            member3_dept: Set(input.member3_dept),
            project_title: Set(input.project_title),
            project_description: Set(input.project_description),
            git_link: Set(input.git_link),
            notes: Set(input.notes),
            status: Set(status.as_str().to_string()),
            created_at: Set(now_iso()),
            updated_at: Set(None),
            ..Default::default()
        };

        let model = registration.insert(&self.db).await?;
        Registration::try_from(model)
    }

    async fn update(
        &self,
        id: i64,
        changes: RegistrationChanges,
    ) -> Result<Registration, DomainError> {
        let model = RegistrationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = model.into();

        macro_rules! set_changed {
            ($($field:ident),*) => {
                $(if let Some(v) = changes.$field {
                    active.$field = Set(v);
                })*
            };
        }
        set_changed!(
            team_name,
            leader_name,
            email,
            mobile,
            college,
            leader_dept,
            member2_name,
            member2_email,
            member2_dept,
            member3_name,
            member3_email,
            member3_dept,
            project_title,
            project_description,
            git_link,
            notes
        );
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(Some(now_iso()));

        let model = active.update(&self.db).await?;
        Registration::try_from(model)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = RegistrationEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn update_status_many(
        &self,
        ids: &[i64],
        status: RegistrationStatus,
    ) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = RegistrationEntity::update_many()
            .col_expr(Column::Status, Expr::value(status.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(now_iso()))
            .filter(Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = RegistrationEntity::delete_many()
            .filter(Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn status_and_departments(&self) -> Result<Vec<(String, String)>, DomainError> {
        let rows = RegistrationEntity::find()
            .select_only()
            .column(Column::Status)
            .column(Column::LeaderDept)
            .into_tuple::<(String, String)>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(RegistrationEntity::find().count(&self.db).await?)
    }
}
