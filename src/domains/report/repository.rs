use sqlx::MySqlPool;

use super::model::{AdminReport, NewReport, Report};

const REPORT_COLUMNS: &str =
  "id, user_id, name, age, gender, location, last_seen_date, description, phone, image_path, status, filed_at";

pub async fn create(db: &MySqlPool, user_id: i32, input: &NewReport, image_path: &str) -> Result<Report, sqlx::Error> {
  let result = sqlx::query(
    r#"
      INSERT INTO reports (user_id, name, age, gender, location, last_seen_date, description, phone, image_path)
      VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
    "#,
  )
  .bind(user_id)
  .bind(&input.name)
  .bind(input.age)
  .bind(&input.gender)
  .bind(&input.location)
  .bind(input.last_seen_date)
  .bind(&input.description)
  .bind(&input.phone)
  .bind(image_path)
  .execute(db)
  .await?;

  let id = result.last_insert_id() as i32;
  find_by_id(db, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn find_by_id(db: &MySqlPool, id: i32) -> Result<Option<Report>, sqlx::Error> {
  sqlx::query_as::<_, Report>(&format!("SELECT {} FROM reports WHERE id = ?", REPORT_COLUMNS))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Looks a report up by the bare filename of its photo.
pub async fn find_by_image(db: &MySqlPool, image_path: &str) -> Result<Option<Report>, sqlx::Error> {
  sqlx::query_as::<_, Report>(&format!("SELECT {} FROM reports WHERE image_path = ?", REPORT_COLUMNS))
    .bind(image_path)
    .fetch_optional(db)
    .await
}

pub async fn find_by_user(db: &MySqlPool, user_id: i32) -> Result<Vec<Report>, sqlx::Error> {
  sqlx::query_as::<_, Report>(&format!(
    "SELECT {} FROM reports WHERE user_id = ? ORDER BY filed_at DESC, id DESC",
    REPORT_COLUMNS
  ))
  .bind(user_id)
  .fetch_all(db)
  .await
}

pub async fn find_all_with_users(db: &MySqlPool) -> Result<Vec<AdminReport>, sqlx::Error> {
  sqlx::query_as::<_, AdminReport>(
    r#"
      SELECT reports.id, reports.user_id, reports.name, reports.age, reports.gender, reports.location,
             reports.last_seen_date, reports.description, reports.phone, reports.image_path, reports.status,
             reports.filed_at, users.name AS user_name, users.email AS user_email
      FROM reports
      JOIN users ON reports.user_id = users.id
      ORDER BY reports.filed_at DESC, reports.id DESC
    "#,
  )
  .fetch_all(db)
  .await
}

pub async fn update_status(db: &MySqlPool, id: i32, status: &str) -> Result<u64, sqlx::Error> {
  let result = sqlx::query("UPDATE reports SET status = ? WHERE id = ?")
    .bind(status)
    .bind(id)
    .execute(db)
    .await?;

  Ok(result.rows_affected())
}

pub async fn delete(db: &MySqlPool, id: i32) -> Result<u64, sqlx::Error> {
  let result = sqlx::query("DELETE FROM reports WHERE id = ?").bind(id).execute(db).await?;

  Ok(result.rows_affected())
}
