use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;

use crate::auth::CallerIdentity;
use crate::database::error::StoreError;
use crate::database::models::{GeneratedContent, Itinerary, NewTrip, Trip, TripStatus};
use crate::database::query_builder::{bind_param, SqlResult, TableQuery};
use crate::database::store::TripStore;

const TRIPS: &str = "trips";
const ITINERARIES: &str = "itineraries";

const TRIP_COLUMNS: &[&str] = &[
    "\"id\"::text AS id",
    "\"user_id\"::text AS user_id",
    "destination",
    "start_date::date AS start_date",
    "end_date::date AS end_date",
    "budget",
    "status",
    "created_at",
    "updated_at",
];

const ITINERARY_COLUMNS: &[&str] = &[
    "\"id\"::text AS id",
    "\"trip_id\"::text AS trip_id",
    "day_number",
    "generated_content",
    "created_at",
    "updated_at",
];

/// [`TripStore`] over a Postgres pool.
#[derive(Clone)]
pub struct PgTripStore {
    pool: PgPool,
}

impl PgTripStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, sql: &SqlResult) -> Result<Vec<PgRow>, StoreError> {
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn execute(&self, sql: &SqlResult) -> Result<u64, StoreError> {
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        let result = q
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

/// Trip lookup, narrowed to the caller's rows unless the caller is the service identity.
fn fetch_trip_sql(trip_id: &str, caller: &CallerIdentity) -> Result<SqlResult, StoreError> {
    Ok(TableQuery::new(TRIPS)?
        .eq("id", trip_id)?
        .eq_opt("user_id", caller.owner_filter())?
        .to_select_sql(TRIP_COLUMNS))
}

/// Dates and budget travel as text and are cast server-side, keeping the decimal exact.
fn insert_trip_sql(trip: &NewTrip, owner: &str) -> SqlResult {
    SqlResult {
        query: "INSERT INTO \"trips\" (user_id, destination, start_date, end_date, budget, status) \
                VALUES ($1, $2, $3::date, $4::date, $5::numeric, $6) \
                RETURNING \"id\"::text AS id"
            .to_string(),
        params: vec![
            Value::String(owner.to_string()),
            Value::String(trip.destination.clone()),
            Value::String(trip.start_date.to_string()),
            Value::String(trip.end_date.to_string()),
            trip.budget.map_or(Value::Null, |b| Value::String(b.to_string())),
            Value::String(TripStatus::Draft.as_str().to_string()),
        ],
    }
}

/// Zero rows is `NotFound`; more than one means the table no longer keys trips by id.
fn single_trip_row<T>(mut rows: Vec<T>, trip_id: &str) -> Result<T, StoreError> {
    if rows.len() > 1 {
        return Err(StoreError::Unavailable(format!(
            "expected exactly one trip for id {}, found {}",
            trip_id,
            rows.len()
        )));
    }
    rows.pop()
        .ok_or_else(|| StoreError::NotFound("Trip not found".to_string()))
}

fn list_itineraries_sql(trip_id: &str) -> Result<SqlResult, StoreError> {
    Ok(TableQuery::new(ITINERARIES)?
        .eq("trip_id", trip_id)?
        .order_by("day_number")?
        .to_select_sql(ITINERARY_COLUMNS))
}

fn trip_from_row(row: &PgRow) -> Result<Trip, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Trip {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        destination: row.try_get("destination")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        budget: row.try_get("budget")?,
        status: TripStatus::from(status),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn itinerary_from_row(row: &PgRow) -> Result<Itinerary, sqlx::Error> {
    Ok(Itinerary {
        id: row.try_get("id")?,
        trip_id: row.try_get("trip_id")?,
        day_number: row.try_get("day_number")?,
        generated_content: row.try_get("generated_content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TripStore for PgTripStore {
    async fn fetch_trip(&self, trip_id: &str, caller: &CallerIdentity) -> Result<Trip, StoreError> {
        let rows = self.fetch_rows(&fetch_trip_sql(trip_id, caller)?).await?;
        debug!(trip_id, caller = caller.as_str(), rows = rows.len(), "trip lookup");

        let row = single_trip_row(rows, trip_id)?;
        Ok(trip_from_row(&row)?)
    }

    async fn create_trip(&self, trip: NewTrip, owner: &str) -> Result<String, StoreError> {
        let sql = insert_trip_sql(&trip, owner);
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let row = row.ok_or_else(|| StoreError::WriteFailed("insert returned no rows".to_string()))?;
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        debug!(trip_id = %id, owner, "trip inserted");
        Ok(id)
    }

    async fn list_itineraries_for_trip(&self, trip_id: &str) -> Result<Vec<Itinerary>, StoreError> {
        let itineraries = self
            .fetch_rows(&list_itineraries_sql(trip_id)?)
            .await?
            .iter()
            .map(itinerary_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        if itineraries.is_empty() {
            return Err(StoreError::NotFound("No itineraries found for this trip".to_string()));
        }
        Ok(itineraries)
    }

    async fn update_itinerary_content(
        &self,
        itinerary_id: &str,
        content: &GeneratedContent,
    ) -> Result<(), StoreError> {
        let payload: Value = content
            .to_json()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let sql = TableQuery::new(ITINERARIES)?
            .eq("id", itinerary_id)?
            .to_update_sql(vec![("generated_content", payload)])?;

        match self.execute(&sql).await? {
            0 => Err(StoreError::WriteFailed(format!(
                "Failed to update itinerary {}",
                itinerary_id
            ))),
            _ => Ok(()),
        }
    }

    async fn set_trip_status(&self, trip_id: &str, status: TripStatus) -> Result<(), StoreError> {
        let sql = TableQuery::new(TRIPS)?
            .eq("id", trip_id)?
            .to_update_sql(vec![("status", json!(status.as_str()))])?;

        match self.execute(&sql).await? {
            0 => Err(StoreError::WriteFailed(format!(
                "Failed to update status of trip {}",
                trip_id
            ))),
            _ => Ok(()),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
