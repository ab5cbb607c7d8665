use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Booking {
    pub id: u64,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    // Type of the booked entity: hotel, residence or dwelling
    #[serde(default)]
    pub bookable_type: Option<String>,
    #[serde(default)]
    pub bookable_id: Option<u64>,
    pub check_in: String,
    pub check_out: String,
    #[serde(default)]
    pub guests: Option<u32>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingRequest {
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// Answer to a reservation: the booking plus, for online payment, the
// provider page the guest is sent to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
    #[serde(default)]
    pub payment_url: Option<String>,
}
