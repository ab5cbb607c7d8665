// Records mirroring the backend's JSON shapes. The backend owns and
// validates every entity; these are transient copies.

mod booking;
mod catalog;
mod property;
mod user;
mod wallet;

pub use booking::{Booking, BookingRequest, BookingResponse};
pub use catalog::{
    Amenity, AmenityInput, BusinessType, BusinessTypeInput, Commission, CommissionInput,
};
pub use property::{
    Dwelling, DwellingInput, Hotel, HotelInput, HotelRoom, HotelRoomInput, Residence,
    ResidenceInput,
};
pub use user::{Profile, ProfileInput, User, UserInput};
pub use wallet::{RechargeRequest, RechargeResponse, Wallet, WalletTransaction};
