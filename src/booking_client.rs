use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_BOOKING_API_URL: &str = "https://bot9assignement.deno.dev";

#[derive(Error, Debug)]
pub enum BookingApiError {
    #[error("Booking service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Booking service error ({status}): {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

#[derive(Debug, Clone)]
pub struct BookingClient {
    client: Client,
    base_url: String,
}

/// A room as the catalog service describes it. Only `id` and `price` are
/// modeled; everything else (name, description, amenities) is carried through
/// untouched so the model can present it to the guest.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Room {
    pub id: i64,
    pub price: f64,
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookRoomRequest {
    room_id: i64,
    full_name: String,
    email: String,
    nights: i64,
}

impl BookingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetches the room catalog and keeps only rooms priced within `budget`,
    /// preserving the order the service returned them in. An empty result is
    /// not an error.
    pub async fn fetch_rooms(&self, budget: f64) -> Result<Vec<Room>, BookingApiError> {
        info!("🏨 Fetching room catalog with budget {}", budget);

        let response = self
            .client
            .get(format!("{}/rooms", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Room catalog error ({}): {}", status, body);
            return Err(BookingApiError::Status { status, body });
        }

        let mut rooms = response.json::<Vec<Room>>().await?;
        let total = rooms.len();
        rooms.retain(|room| room.price <= budget);

        info!("✅ {} of {} rooms within budget", rooms.len(), total);
        Ok(rooms)
    }

    /// Forwards a finalized booking to the external booking service and
    /// returns its confirmation payload as-is.
    pub async fn book_room(
        &self,
        room_id: i64,
        full_name: &str,
        email: &str,
        nights: i64,
    ) -> Result<Value, BookingApiError> {
        info!("🛎️ Booking room {} for {} ({} nights)", room_id, full_name, nights);

        let request = BookRoomRequest {
            room_id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            nights,
        };

        let response = self
            .client
            .post(format!("{}/book", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Booking service error ({}): {}", status, body);
            return Err(BookingApiError::Status { status, body });
        }

        let confirmation = response.json::<Value>().await?;
        info!("✅ Booking confirmed for room {}", room_id);
        Ok(confirmation)
    }
}
