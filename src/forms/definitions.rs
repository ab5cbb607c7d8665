// Schemas and server field tables for each form of the back-office

use super::schema::{FieldMessages, Rule, Schema};
use super::server_errors::FieldMapping;
use super::ResourceForm;
use crate::hooks::ResourceHooks;
use crate::models::{
    AmenityInput, BookingRequest, BusinessTypeInput, CommissionInput, DwellingInput, HotelInput,
    HotelRoomInput, ResidenceInput, UserInput,
};
use crate::services::{
    Amenities, BusinessTypes, Commissions, Dwellings, HotelRooms, Hotels, Residences, Users,
};
use chrono::NaiveDate;

pub const MIN_RECHARGE_AMOUNT: f64 = 100.0;

pub const USER_FIELDS: FieldMapping = &[
    ("name", "name"),
    ("email", "email"),
    ("phone", "phone"),
    ("role", "role"),
    ("password", "password"),
];

pub const HOTEL_FIELDS: FieldMapping = &[
    ("name", "name"),
    ("description", "description"),
    ("address", "address"),
    ("city", "city"),
    ("stars", "stars"),
    ("business_type_id", "businessType"),
    ("amenities", "amenities"),
    ("images", "images"),
];

pub const HOTEL_ROOM_FIELDS: FieldMapping = &[
    ("hotel_id", "hotel"),
    ("name", "name"),
    ("room_type", "roomType"),
    ("capacity", "capacity"),
    ("price_per_night", "pricePerNight"),
    ("quantity", "quantity"),
    ("amenities", "amenities"),
    ("images", "images"),
];

pub const RESIDENCE_FIELDS: FieldMapping = &[
    ("name", "name"),
    ("description", "description"),
    ("address", "address"),
    ("city", "city"),
    ("price_per_night", "pricePerNight"),
    ("rooms", "rooms"),
    ("max_guests", "maxGuests"),
    ("amenities", "amenities"),
    ("images", "images"),
];

pub const DWELLING_FIELDS: FieldMapping = &[
    ("name", "name"),
    ("description", "description"),
    ("dwelling_type", "dwellingType"),
    ("address", "address"),
    ("city", "city"),
    ("price_per_night", "pricePerNight"),
    ("bedrooms", "bedrooms"),
    ("max_guests", "maxGuests"),
    ("amenities", "amenities"),
    ("images", "images"),
];

pub const AMENITY_FIELDS: FieldMapping = &[("name", "name"), ("icon", "icon")];

pub const BUSINESS_TYPE_FIELDS: FieldMapping = &[("name", "name"), ("description", "description")];

pub const COMMISSION_FIELDS: FieldMapping = &[
    ("business_type_id", "businessType"),
    ("rate", "rate"),
];

pub const BOOKING_FIELDS: FieldMapping = &[
    ("check_in", "checkIn"),
    ("check_out", "checkOut"),
    ("guests", "guests"),
    ("room_id", "room"),
    ("notes", "notes"),
];

pub const RECHARGE_FIELDS: FieldMapping = &[("amount", "amount")];

fn name_rules() -> Vec<Rule> {
    vec![Rule::Required, Rule::MinLength(2), Rule::MaxLength(255)]
}

// A password is only mandatory when the account is created
pub fn user_schema(creating: bool) -> Schema {
    let password = if creating {
        vec![Rule::Required, Rule::MinLength(8)]
    } else {
        vec![Rule::MinLength(8)]
    };
    Schema::new()
        .field("name", name_rules())
        .field("email", [Rule::Required, Rule::Email])
        .field("phone", [Rule::MinLength(8), Rule::MaxLength(20)])
        .field("password", password)
}

pub fn hotel_schema() -> Schema {
    Schema::new()
        .field("name", name_rules())
        .field("address", [Rule::Required])
        .field("city", [Rule::Required])
        .field("stars", [Rule::Min(1.0), Rule::Max(5.0)])
        .field("business_type_id", [Rule::Required])
}

pub fn hotel_room_schema() -> Schema {
    Schema::new()
        .field("hotel_id", [Rule::Required, Rule::Min(1.0)])
        .field("name", name_rules())
        .field("capacity", [Rule::Required, Rule::Min(1.0)])
        .field("price_per_night", [Rule::Required, Rule::Min(0.0)])
        .field("quantity", [Rule::Required, Rule::Min(1.0)])
}

pub fn residence_schema() -> Schema {
    Schema::new()
        .field("name", name_rules())
        .field("address", [Rule::Required])
        .field("city", [Rule::Required])
        .field("price_per_night", [Rule::Required, Rule::Min(0.0)])
        .field("rooms", [Rule::Required, Rule::Min(1.0)])
        .field("max_guests", [Rule::Required, Rule::Min(1.0)])
}

pub fn dwelling_schema() -> Schema {
    Schema::new()
        .field("name", name_rules())
        .field("dwelling_type", [Rule::Required])
        .field("address", [Rule::Required])
        .field("city", [Rule::Required])
        .field("price_per_night", [Rule::Required, Rule::Min(0.0)])
        .field("bedrooms", [Rule::Min(0.0)])
        .field("max_guests", [Rule::Required, Rule::Min(1.0)])
}

pub fn amenity_schema() -> Schema {
    Schema::new()
        .field("name", name_rules())
        .field("icon", [Rule::MaxLength(100)])
}

pub fn business_type_schema() -> Schema {
    Schema::new()
        .field("name", name_rules())
        .field("description", [Rule::MaxLength(1000)])
}

pub fn commission_schema() -> Schema {
    Schema::new()
        .field("business_type_id", [Rule::Required])
        .field("rate", [Rule::Required, Rule::Min(0.0), Rule::Max(100.0)])
}

pub fn booking_schema() -> Schema {
    Schema::new()
        .field("check_in", [Rule::Required])
        .field("check_out", [Rule::Required])
        .field("guests", [Rule::Required, Rule::Min(1.0)])
        .field("notes", [Rule::MaxLength(500)])
}

pub fn recharge_schema() -> Schema {
    Schema::new().field("amount", [Rule::Required, Rule::Min(MIN_RECHARGE_AMOUNT)])
}

// Dates are ISO `YYYY-MM-DD`; the stay must last at least one night
pub fn check_stay_dates(request: &BookingRequest) -> FieldMessages {
    let mut errors = FieldMessages::new();
    let check_in = NaiveDate::parse_from_str(&request.check_in, "%Y-%m-%d");
    let check_out = NaiveDate::parse_from_str(&request.check_out, "%Y-%m-%d");

    match (check_in, check_out) {
        (Err(_), _) => {
            errors.insert("check_in".to_string(), "Date invalide".to_string());
        }
        (_, Err(_)) => {
            errors.insert("check_out".to_string(), "Date invalide".to_string());
        }
        (Ok(arrival), Ok(departure)) if departure <= arrival => {
            errors.insert(
                "check_out".to_string(),
                "La date de départ doit suivre la date d'arrivée".to_string(),
            );
        }
        _ => {}
    }
    errors
}

pub type UserForm = ResourceForm<Users, UserInput>;
pub type HotelForm = ResourceForm<Hotels, HotelInput>;
pub type HotelRoomForm = ResourceForm<HotelRooms, HotelRoomInput>;
pub type ResidenceForm = ResourceForm<Residences, ResidenceInput>;
pub type DwellingForm = ResourceForm<Dwellings, DwellingInput>;
pub type AmenityForm = ResourceForm<Amenities, AmenityInput>;
pub type BusinessTypeForm = ResourceForm<BusinessTypes, BusinessTypeInput>;
pub type CommissionForm = ResourceForm<Commissions, CommissionInput>;

// `target` is the id being edited; None creates a new record
pub fn user_form(hooks: ResourceHooks<Users>, target: Option<u64>) -> UserForm {
    ResourceForm::new(hooks, target, user_schema(target.is_none()), USER_FIELDS)
}

pub fn hotel_form(hooks: ResourceHooks<Hotels>, target: Option<u64>) -> HotelForm {
    ResourceForm::new(hooks, target, hotel_schema(), HOTEL_FIELDS)
}

pub fn hotel_room_form(hooks: ResourceHooks<HotelRooms>, target: Option<u64>) -> HotelRoomForm {
    ResourceForm::new(hooks, target, hotel_room_schema(), HOTEL_ROOM_FIELDS)
}

pub fn residence_form(hooks: ResourceHooks<Residences>, target: Option<u64>) -> ResidenceForm {
    ResourceForm::new(hooks, target, residence_schema(), RESIDENCE_FIELDS)
}

pub fn dwelling_form(hooks: ResourceHooks<Dwellings>, target: Option<u64>) -> DwellingForm {
    ResourceForm::new(hooks, target, dwelling_schema(), DWELLING_FIELDS)
}

pub fn amenity_form(hooks: ResourceHooks<Amenities>, target: Option<u64>) -> AmenityForm {
    ResourceForm::new(hooks, target, amenity_schema(), AMENITY_FIELDS)
}

pub fn business_type_form(hooks: ResourceHooks<BusinessTypes>, target: Option<u64>) -> BusinessTypeForm {
    ResourceForm::new(hooks, target, business_type_schema(), BUSINESS_TYPE_FIELDS)
}

pub fn commission_form(hooks: ResourceHooks<Commissions>, target: Option<u64>) -> CommissionForm {
    ResourceForm::new(hooks, target, commission_schema(), COMMISSION_FIELDS)
}
