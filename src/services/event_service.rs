//! Event Service - schedule entries shown alongside registration

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::DomainError;
use crate::models::event::{self, Entity as Event, EventChanges, EventStatus, NewEvent};
use crate::utils::time::{now_iso, today};

fn validate(title: &str, event_date: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("title: is required".to_string()));
    }
    if chrono::NaiveDate::parse_from_str(event_date, "%Y-%m-%d").is_err() {
        return Err(DomainError::Validation(
            "event_date: expected YYYY-MM-DD".to_string(),
        ));
    }
    Ok(())
}

/// Create an event; the registered count starts at zero
pub async fn create_event(
    db: &DatabaseConnection,
    input: NewEvent,
) -> Result<event::Model, DomainError> {
    validate(&input.title, &input.event_date)?;
    let now = now_iso();

    let model = event::ActiveModel {
        title: Set(input.title),
        description: Set(input.description),
        event_date: Set(input.event_date),
        event_time: Set(input.event_time),
        location: Set(input.location),
        event_type: Set(input.event_type),
        max_capacity: Set(input.max_capacity),
        registered_count: Set(0),
        status: Set(input.status.as_str().to_string()),
        created_by: Set(input.created_by),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Created event {} '{}'", model.id, model.title);
    Ok(model)
}

/// Events with the given status (published by default), soonest first
pub async fn list_events(
    db: &DatabaseConnection,
    status: Option<EventStatus>,
) -> Result<Vec<event::Model>, DomainError> {
    let status = status.unwrap_or(EventStatus::Published);

    Ok(Event::find()
        .filter(event::Column::Status.eq(status.as_str()))
        .order_by_asc(event::Column::EventDate)
        .all(db)
        .await?)
}

pub async fn get_event(db: &DatabaseConnection, id: i64) -> Result<event::Model, DomainError> {
    Event::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn update_event(
    db: &DatabaseConnection,
    id: i64,
    changes: EventChanges,
) -> Result<event::Model, DomainError> {
    let existing = get_event(db, id).await?;
    validate(
        changes.title.as_deref().unwrap_or(&existing.title),
        changes.event_date.as_deref().unwrap_or(&existing.event_date),
    )?;

    let mut active: event::ActiveModel = existing.into();

    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(event_date) = changes.event_date {
        active.event_date = Set(event_date);
    }
    if let Some(event_time) = changes.event_time {
        active.event_time = Set(event_time);
    }
    if let Some(location) = changes.location {
        active.location = Set(location);
    }
    if let Some(event_type) = changes.event_type {
        active.event_type = Set(event_type);
    }
    if let Some(max_capacity) = changes.max_capacity {
        active.max_capacity = Set(max_capacity);
    }
    if let Some(count) = changes.registered_count {
        active.registered_count = Set(count);
    }
    if let Some(status) = changes.status {
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(now_iso());

    Ok(active.update(db).await?)
}

pub async fn delete_event(db: &DatabaseConnection, id: i64) -> Result<(), DomainError> {
    let result = Event::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}

/// Add `by` to the advisory registered count in a single statement
pub async fn increment_registered_count(
    db: &DatabaseConnection,
    id: i64,
    by: i32,
) -> Result<event::Model, DomainError> {
    let result = Event::update_many()
        .col_expr(
            event::Column::RegisteredCount,
            Expr::col(event::Column::RegisteredCount).add(by),
        )
        .col_expr(event::Column::UpdatedAt, Expr::value(now_iso()))
        .filter(event::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }

    get_event(db, id).await
}

/// Upcoming events dated today or later, soonest first
pub async fn upcoming_events(db: &DatabaseConnection) -> Result<Vec<event::Model>, DomainError> {
    Ok(Event::find()
        .filter(event::Column::EventDate.gte(today()))
        .filter(event::Column::Status.eq(EventStatus::Upcoming.as_str()))
        .order_by_asc(event::Column::EventDate)
        .all(db)
        .await?)
}
