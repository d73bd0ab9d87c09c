// Tool executor for the booking assistant
// Maps model-requested tool names to booking service and mailer calls

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::booking_client::{BookingApiError, BookingClient};
use crate::mailer_client::{MailerClient, MailerError};
use crate::openai_client::{FunctionSpec, ParameterSchema, PropertyDefinition, ToolDefinition};

pub const FETCH_ROOMS_TOOL: &str = "fetchRoomsAndFilter";
pub const SEND_DETAILS_TOOL: &str = "sendDetails";

pub const BOOKING_EMAIL_SUBJECT: &str = "Hotel Booking Details at dukaan";

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Room catalog unavailable: {0}")]
    CatalogUnavailable(#[from] BookingApiError),
    #[error("Invalid tool arguments: {0}")]
    BadArguments(#[from] serde_json::Error),
}

/// Notification failures never leave this module; they are logged and the
/// conversation carries on as if the booking went through.
#[derive(Error, Debug)]
enum NotifyError {
    #[error("Mailer is not configured")]
    MailerMissing,
    #[error(transparent)]
    Mail(#[from] MailerError),
    #[error(transparent)]
    Booking(#[from] BookingApiError),
}

#[derive(Debug, Deserialize)]
struct FetchRoomsArgs {
    budget: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendDetailsArgs {
    room_id: i64,
    full_name: String,
    email: String,
    nights: i64,
    price: f64,
}

/// The two callable tools, bound to their backing clients. Arguments arrive
/// as the JSON object the model produced and are decoded by field name.
#[derive(Debug, Clone)]
pub struct BookingToolkit {
    booking: BookingClient,
    mailer: Option<MailerClient>,
}

impl BookingToolkit {
    pub fn new(booking: BookingClient, mailer: Option<MailerClient>) -> Self {
        Self { booking, mailer }
    }

    pub async fn dispatch(&self, name: &str, args: &Value) -> Result<Value, ToolError> {
        match name {
            FETCH_ROOMS_TOOL => self.fetch_rooms_and_filter(args).await,
            SEND_DETAILS_TOOL => self.send_details(args).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    async fn fetch_rooms_and_filter(&self, args: &Value) -> Result<Value, ToolError> {
        let params: FetchRoomsArgs = serde_json::from_value(args.clone())?;
        let rooms = self.booking.fetch_rooms(params.budget).await?;
        Ok(serde_json::to_value(rooms)?)
    }

    async fn send_details(&self, args: &Value) -> Result<Value, ToolError> {
        let params: SendDetailsArgs = serde_json::from_value(args.clone())?;
        match self.notify(&params).await {
            Ok(confirmation) => Ok(confirmation),
            Err(e) => {
                tracing::error!(
                    "❌ Booking notification failed for room {} ({}): {}",
                    params.room_id,
                    params.email,
                    e
                );
                Ok(Value::Null)
            }
        }
    }

    /// Email first, then the booking POST; an email failure skips the POST.
    async fn notify(&self, params: &SendDetailsArgs) -> Result<Value, NotifyError> {
        let mailer = self.mailer.as_ref().ok_or(NotifyError::MailerMissing)?;

        let body = confirmation_email_body(
            params.room_id,
            &params.full_name,
            params.nights,
            params.price,
        );
        mailer.send(&params.email, BOOKING_EMAIL_SUBJECT, &body).await?;

        let confirmation = self
            .booking
            .book_room(params.room_id, &params.full_name, &params.email, params.nights)
            .await?;
        Ok(confirmation)
    }
}

fn confirmation_email_body(room_id: i64, full_name: &str, nights: i64, price: f64) -> String {
    let plural = if nights > 1 { "s" } else { "" };
    format!(
        "Exciting news! Your Dukaan Hotel reservation is confirmed:\n\
         \n\
         - Room Number: {room_id}\n\
         - Guest Name: {full_name}\n\
         - Duration: {nights} night{plural}\n\
         - Total Cost: ${price}\n\
         \n\
         We can't wait to welcome you! If you have any questions, just ask. Enjoy your stay!"
    )
}

pub fn booking_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionSpec {
                name: FETCH_ROOMS_TOOL.to_string(),
                description: "Get the available rooms under the budget".to_string(),
                parameters: ParameterSchema {
                    schema_type: "object".to_string(),
                    properties: HashMap::from([(
                        "budget".to_string(),
                        PropertyDefinition {
                            prop_type: "number".to_string(),
                            description: "it requires the price as budget".to_string(),
                        },
                    )]),
                    required: vec!["budget".to_string()],
                },
            },
        },
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionSpec {
                name: SEND_DETAILS_TOOL.to_string(),
                description: "Send the details to user email".to_string(),
                parameters: ParameterSchema {
                    schema_type: "object".to_string(),
                    properties: HashMap::from([
                        (
                            "roomId".to_string(),
                            PropertyDefinition {
                                prop_type: "number".to_string(),
                                description: "it requires the room id".to_string(),
                            },
                        ),
                        (
                            "fullName".to_string(),
                            PropertyDefinition {
                                prop_type: "string".to_string(),
                                description: "name of the user".to_string(),
                            },
                        ),
                        (
                            "email".to_string(),
                            PropertyDefinition {
                                prop_type: "string".to_string(),
                                description: "email of the user".to_string(),
                            },
                        ),
                        (
                            "nights".to_string(),
                            PropertyDefinition {
                                prop_type: "number".to_string(),
                                description: "number of nights user want to stay".to_string(),
                            },
                        ),
                        (
                            "price".to_string(),
                            PropertyDefinition {
                                prop_type: "number".to_string(),
                                description: "the total price of the room for the nights user want to stay"
                                    .to_string(),
                            },
                        ),
                    ]),
                    required: vec![
                        "roomId".to_string(),
                        "fullName".to_string(),
                        "email".to_string(),
                        "nights".to_string(),
                        "price".to_string(),
                    ],
                },
            },
        },
    ]
}
