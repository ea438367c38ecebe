use crate::models::Coordinates;
use crate::services::geocoding::Geocoder;
use crate::services::postgres::{PostgresClient, PostgresError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage side of the coordinate backfill
#[allow(async_fn_in_trait)]
pub trait CoordinateStore {
    /// `(id, location)` for every facility without coordinates
    async fn missing_coordinates(&self) -> Result<Vec<(Uuid, String)>, PostgresError>;

    async fn store_coordinates(&self, id: Uuid, coordinates: Coordinates) -> Result<(), PostgresError>;
}

impl CoordinateStore for PostgresClient {
    async fn missing_coordinates(&self) -> Result<Vec<(Uuid, String)>, PostgresError> {
        self.list_missing_coordinates().await
    }

    async fn store_coordinates(&self, id: Uuid, coordinates: Coordinates) -> Result<(), PostgresError> {
        self.set_coordinates(id, coordinates).await
    }
}

/// Outcome of one backfill run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillSummary {
    pub processed: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Geocode every facility that has no coordinates yet
///
/// A facility whose location cannot be resolved or stored is logged and
/// skipped; only failing to list the work aborts the run.
pub async fn backfill_coordinates<S: CoordinateStore>(
    store: &S,
    geocoder: &Geocoder,
) -> Result<BackfillSummary, PostgresError> {
    let pending = store.missing_coordinates().await?;
    let mut summary = BackfillSummary::default();

    if pending.is_empty() {
        tracing::info!("No facilities need coordinate updates");
        return Ok(summary);
    }

    tracing::info!("Found {} facilities to geocode", pending.len());

    for (id, location) in pending {
        summary.processed += 1;

        let coordinates = match geocoder.resolve(&location).await {
            Ok(Some(coordinates)) => coordinates,
            Ok(None) => {
                tracing::info!("No coordinates found for facility {} ({})", id, location);
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!("Geocoding failed for facility {}: {}", id, e);
                summary.skipped += 1;
                continue;
            }
        };

        match store.store_coordinates(id, coordinates).await {
            Ok(()) => {
                tracing::debug!("Updated coordinates for facility {}", id);
                summary.updated += 1;
            }
            Err(e) => {
                tracing::error!("Failed to store coordinates for facility {}: {}", id, e);
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Coordinate backfill finished: {} processed, {} updated, {} skipped",
        summary.processed,
        summary.updated,
        summary.skipped
    );

    Ok(summary)
}
