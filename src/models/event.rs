use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::serde_ext::double_option;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: String, // YYYY-MM-DD
    pub event_time: String,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub max_capacity: Option<i32>,
    pub registered_count: i32,
    #[sea_orm(default_value = "upcoming")]
    pub status: String, // upcoming, ongoing, completed, cancelled, published
    pub created_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
    Published,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Published => "published",
        }
    }
}

// Input for creating an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: String,
    pub event_time: String,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub max_capacity: Option<i32>,
    #[serde(default)]
    pub status: EventStatus,
    pub created_by: Option<i64>,
}

// Input for updating an event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub event_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_capacity: Option<Option<i32>>,
    #[serde(default)]
    pub registered_count: Option<i32>,
    #[serde(default)]
    pub status: Option<EventStatus>,
}
