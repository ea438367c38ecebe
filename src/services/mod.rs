// Service exports
pub mod backfill;
pub mod cache;
pub mod geocoding;
pub mod postgres;
pub mod supabase;

pub use backfill::{backfill_coordinates, BackfillSummary, CoordinateStore};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use geocoding::{GeocodeError, Geocoder};
pub use postgres::{PostgresClient, PostgresError};
pub use supabase::{bearer_token, Claims, Session, SessionManager, SupabaseError};
