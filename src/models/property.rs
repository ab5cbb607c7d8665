use super::catalog::Amenity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Hotel {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub stars: Option<u8>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub business_type_id: Option<u64>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HotelInput {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub stars: Option<u8>,
    pub business_type_id: Option<u64>,
    pub amenities: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HotelRoom {
    pub id: u64,
    pub hotel_id: u64,
    pub name: String,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub price_per_night: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HotelRoomInput {
    pub hotel_id: u64,
    pub name: String,
    pub room_type: Option<String>,
    pub capacity: u32,
    pub price_per_night: f64,
    pub quantity: u32,
    pub amenities: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Residence {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub price_per_night: Option<f64>,
    #[serde(default)]
    pub rooms: Option<u32>,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResidenceInput {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub price_per_night: f64,
    pub rooms: u32,
    pub max_guests: u32,
    pub amenities: Vec<u64>,
}

// A single rentable unit (house, villa, apartment)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Dwelling {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dwelling_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub price_per_night: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DwellingInput {
    pub name: String,
    pub description: Option<String>,
    pub dwelling_type: String,
    pub address: String,
    pub city: String,
    pub price_per_night: f64,
    pub bedrooms: u32,
    pub max_guests: u32,
    pub amenities: Vec<u64>,
}
