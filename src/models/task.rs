use crate::models::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// A task owned by another system, as the Postgres backend sees it. This
/// service only ever reads them.
#[derive(
    QueryableByName, Queryable, Selectable, Serialize, Debug, Clone, PartialEq,
)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = tasks)]
pub struct Task {
    pub id: i32,
    pub created_by: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn get_by_creator(conn: &mut PgConnection, user_id: i32) -> anyhow::Result<Vec<Task>> {
        Ok(tasks::table
            .filter(tasks::created_by.eq(user_id))
            .load::<Task>(conn)?)
    }
}
