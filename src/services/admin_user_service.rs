//! Admin user accounts and credential checks

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::DomainError;
use crate::infrastructure::auth::{hash_password, verify_password};
use crate::infrastructure::config::Config;
use crate::models::admin_user::{
    self, AdminUser, AdminUserChanges, Entity as AdminUserEntity, NewAdminUser,
};
use crate::utils::time::now_iso;

pub const DEFAULT_ROLE: &str = "admin";
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

fn hash(password: &str) -> Result<String, DomainError> {
    if password.chars().count() < 8 {
        return Err(DomainError::Validation(
            "password: must be at least 8 characters".to_string(),
        ));
    }
    hash_password(password).map_err(DomainError::Internal)
}

/// Check credentials against active accounts and stamp `last_login`.
/// Unknown users, inactive users and wrong passwords all yield
/// `Unauthorized`.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<AdminUser, DomainError> {
    let Some(user) = AdminUserEntity::find()
        .filter(admin_user::Column::Username.eq(username))
        .filter(admin_user::Column::IsActive.eq(true))
        .one(db)
        .await?
    else {
        tracing::warn!("Login attempt for unknown admin '{}'", username);
        return Err(DomainError::Unauthorized);
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Password verification failed for admin '{}'", username);
            return Err(DomainError::Unauthorized);
        }
        Err(e) => {
            tracing::error!("Stored hash for admin '{}' is unreadable: {}", username, e);
            return Err(DomainError::Unauthorized);
        }
    }

    let id = user.id;
    touch_last_login(db, id).await?;
    get_admin(db, id).await
}

pub async fn get_admin(db: &DatabaseConnection, id: i64) -> Result<AdminUser, DomainError> {
    AdminUserEntity::find_by_id(id)
        .one(db)
        .await?
        .map(AdminUser::from)
        .ok_or(DomainError::NotFound)
}

/// Active accounts, newest first
pub async fn list_active_admins(db: &DatabaseConnection) -> Result<Vec<AdminUser>, DomainError> {
    let users = AdminUserEntity::find()
        .filter(admin_user::Column::IsActive.eq(true))
        .order_by_desc(admin_user::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(users.into_iter().map(AdminUser::from).collect())
}

pub async fn create_admin(
    db: &DatabaseConnection,
    input: NewAdminUser,
) -> Result<AdminUser, DomainError> {
    let username = input.username.trim().to_string();
    if username.chars().count() < 3 {
        return Err(DomainError::Validation(
            "username: must be at least 3 characters".to_string(),
        ));
    }

    let taken = AdminUserEntity::find()
        .filter(admin_user::Column::Username.eq(username.as_str()))
        .count(db)
        .await?;
    if taken > 0 {
        return Err(DomainError::Validation(format!(
            "username: '{}' is already taken",
            username
        )));
    }

    let now = now_iso();
    let model = admin_user::ActiveModel {
        username: Set(username),
        email: Set(input.email),
        password_hash: Set(hash(&input.password)?),
        role: Set(input.role.unwrap_or_else(|| DEFAULT_ROLE.to_string())),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Created admin '{}' ({})", model.username, model.role);
    Ok(AdminUser::from(model))
}

pub async fn update_admin(
    db: &DatabaseConnection,
    id: i64,
    changes: AdminUserChanges,
) -> Result<AdminUser, DomainError> {
    let user = AdminUserEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut active: admin_user::ActiveModel = user.into();

    if let Some(username) = changes.username {
        active.username = Set(username);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    if let Some(password) = changes.password {
        active.password_hash = Set(hash(&password)?);
    }
    if let Some(role) = changes.role {
        active.role = Set(role);
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(now_iso());

    Ok(AdminUser::from(active.update(db).await?))
}

/// Accounts are never deleted, only switched off
pub async fn deactivate_admin(db: &DatabaseConnection, id: i64) -> Result<(), DomainError> {
    update_admin(
        db,
        id,
        AdminUserChanges {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await?;
    tracing::info!("Deactivated admin {}", id);
    Ok(())
}

pub async fn touch_last_login(db: &DatabaseConnection, id: i64) -> Result<(), DomainError> {
    let result = AdminUserEntity::update_many()
        .col_expr(
            admin_user::Column::LastLogin,
            sea_orm::sea_query::Expr::value(now_iso()),
        )
        .filter(admin_user::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}

/// Create the configured admin when no active account exists yet.
/// Returns the created account, or `None` when nothing was needed or no
/// password is configured.
pub async fn ensure_bootstrap_admin(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<Option<AdminUser>, DomainError> {
    let active = AdminUserEntity::find()
        .filter(admin_user::Column::IsActive.eq(true))
        .count(db)
        .await?;
    if active > 0 {
        return Ok(None);
    }

    let Some(password) = config.admin_password.clone() else {
        tracing::warn!("No active admin and ADMIN_PASSWORD is not set; admin routes are unusable");
        return Ok(None);
    };

    let admin = create_admin(
        db,
        NewAdminUser {
            username: config.admin_username.clone(),
            email: config.admin_email.clone(),
            password,
            role: Some(SUPER_ADMIN_ROLE.to_string()),
        },
    )
    .await?;

    tracing::info!("Bootstrap admin '{}' created", admin.username);
    Ok(Some(admin))
}
