use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Amenity {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AmenityInput {
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BusinessType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessTypeInput {
    pub name: String,
    pub description: Option<String>,
}

// Platform fee taken on bookings for one business type, in percent
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Commission {
    pub id: u64,
    pub business_type_id: u64,
    pub rate: f64,
    #[serde(default)]
    pub business_type: Option<BusinessType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommissionInput {
    pub business_type_id: Option<u64>,
    pub rate: f64,
}
