//! Repositorio de viajes
//!
//! Acceso a la tabla trips, incluida la consulta de solapes que alimenta
//! al detector de conflictos: intervalos de calendario cerrados por ambos
//! extremos, con fin nulo tratado como no acotado.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resource::ResourceKind;
use crate::models::trip::{Trip, TripStatus};
use crate::utils::errors::{AppError, AppResult};

pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, trip: &Trip) -> AppResult<Trip> {
        let created = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (id, company_id, truck_id, trailer_id, operator_id, origin,
                               destination, start_date, end_date, status, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(trip.id)
        .bind(trip.company_id)
        .bind(trip.truck_id)
        .bind(trip.trailer_id)
        .bind(trip.operator_id)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(trip.status)
        .bind(trip.created_by)
        .bind(trip.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    pub async fn find_by_company(&self, company_id: Uuid) -> AppResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE company_id = $1 ORDER BY start_date DESC, created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    /// Viajes activos (planned/in_progress) del recurso cuyo intervalo
    /// intersecta [start, end]. Lista completa y ordenada, no un booleano:
    /// el llamador reporta cada conflicto, no solo "hay conflicto".
    pub async fn find_active_overlapping(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        start: NaiveDate,
        end: Option<NaiveDate>,
        exclude_trip_id: Option<Uuid>,
    ) -> AppResult<Vec<Trip>> {
        let column = match kind {
            ResourceKind::Vehicle => "truck_id",
            ResourceKind::Trailer => "trailer_id",
            ResourceKind::Operator => "operator_id",
        };

        // Intervalos cerrados: s1 <= e2 AND s2 <= e1. Un end_date nulo
        // (viaje abierto) se sustituye por una fecha centinela lejana.
        let sql = format!(
            r#"
            SELECT * FROM trips
            WHERE {column} = $1
              AND status IN ('planned', 'in_progress')
              AND ($4::uuid IS NULL OR id <> $4)
              AND start_date <= COALESCE($3::date, DATE '9999-12-31')
              AND COALESCE(end_date, DATE '9999-12-31') >= $2
            ORDER BY start_date ASC, created_at ASC
            "#
        );

        let trips = sqlx::query_as::<_, Trip>(&sql)
            .bind(resource_id)
            .bind(start)
            .bind(end)
            .bind(exclude_trip_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(trips)
    }

    pub async fn update(&self, trip: &Trip) -> AppResult<Trip> {
        let updated = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET truck_id = $2, trailer_id = $3, operator_id = $4, origin = $5,
                destination = $6, start_date = $7, end_date = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(trip.id)
        .bind(trip.truck_id)
        .bind(trip.trailer_id)
        .bind(trip.operator_id)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn update_status(&self, id: Uuid, status: TripStatus) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            "UPDATE trips SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Viaje no encontrado".to_string()),
            other => AppError::Database(other),
        })?;

        Ok(trip)
    }

    /// Borrado interno sin verificación de empresa; los controllers ya
    /// comprobaron propiedad antes de llegar aquí.
    pub async fn delete_row(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
