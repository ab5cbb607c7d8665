// Resource services: domain operations mapped onto REST endpoints

mod profile;
mod resource;
mod wallet;

pub use profile::ProfileService;
pub use resource::{Bookable, ListParams, Resource, ResourceService};
pub use wallet::WalletService;

use crate::http::HttpClient;
use crate::models::{
    Amenity, Booking, BusinessType, Commission, Dwelling, Hotel, HotelRoom, Residence, User,
};

pub struct Users;
pub struct Bookings;
pub struct Hotels;
pub struct HotelRooms;
pub struct Residences;
pub struct Dwellings;
pub struct Amenities;
pub struct BusinessTypes;
pub struct Commissions;

impl Resource for Users {
    type Entity = User;
    const PATH: &'static str = "users";
    const LABEL: &'static str = "User";
    const PLURAL: &'static str = "users";
    const DISPLAY_NAME: &'static str = "Utilisateur";
}

impl Resource for Bookings {
    type Entity = Booking;
    const PATH: &'static str = "bookings";
    const LABEL: &'static str = "Booking";
    const PLURAL: &'static str = "bookings";
    const DISPLAY_NAME: &'static str = "Réservation";
}

impl Resource for Hotels {
    type Entity = Hotel;
    const PATH: &'static str = "hotels";
    const LABEL: &'static str = "Hotel";
    const PLURAL: &'static str = "hotels";
    const DISPLAY_NAME: &'static str = "Hôtel";
}

impl Resource for HotelRooms {
    type Entity = HotelRoom;
    const PATH: &'static str = "hotel-rooms";
    const LABEL: &'static str = "Hotel room";
    const PLURAL: &'static str = "hotel rooms";
    const DISPLAY_NAME: &'static str = "Chambre";
}

impl Resource for Residences {
    type Entity = Residence;
    const PATH: &'static str = "residences";
    const LABEL: &'static str = "Residence";
    const PLURAL: &'static str = "residences";
    const DISPLAY_NAME: &'static str = "Résidence";
}

impl Resource for Dwellings {
    type Entity = Dwelling;
    const PATH: &'static str = "dwellings";
    const LABEL: &'static str = "Dwelling";
    const PLURAL: &'static str = "dwellings";
    const DISPLAY_NAME: &'static str = "Logement";
}

impl Resource for Amenities {
    type Entity = Amenity;
    const PATH: &'static str = "amenities";
    const LABEL: &'static str = "Amenity";
    const PLURAL: &'static str = "amenities";
    const DISPLAY_NAME: &'static str = "Équipement";
}

impl Resource for BusinessTypes {
    type Entity = BusinessType;
    const PATH: &'static str = "business-types";
    const LABEL: &'static str = "Business type";
    const PLURAL: &'static str = "business types";
    const DISPLAY_NAME: &'static str = "Type d'activité";
}

impl Resource for Commissions {
    type Entity = Commission;
    const PATH: &'static str = "commissions";
    const LABEL: &'static str = "Commission";
    const PLURAL: &'static str = "commissions";
    const DISPLAY_NAME: &'static str = "Commission";
}

impl Bookable for Hotels {}
impl Bookable for Residences {}
impl Bookable for Dwellings {}

pub type UserService = ResourceService<Users>;
pub type BookingService = ResourceService<Bookings>;
pub type HotelService = ResourceService<Hotels>;
pub type HotelRoomService = ResourceService<HotelRooms>;
pub type ResidenceService = ResourceService<Residences>;
pub type DwellingService = ResourceService<Dwellings>;
pub type AmenityService = ResourceService<Amenities>;
pub type BusinessTypeService = ResourceService<BusinessTypes>;
pub type CommissionService = ResourceService<Commissions>;

// One accessor per service, all sharing the same HTTP client
#[derive(Clone)]
pub struct Services {
    http: HttpClient,
}

impl Services {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn resource<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(self.http.clone())
    }

    pub fn users(&self) -> UserService {
        self.resource()
    }

    pub fn bookings(&self) -> BookingService {
        self.resource()
    }

    pub fn hotels(&self) -> HotelService {
        self.resource()
    }

    pub fn hotel_rooms(&self) -> HotelRoomService {
        self.resource()
    }

    pub fn residences(&self) -> ResidenceService {
        self.resource()
    }

    pub fn dwellings(&self) -> DwellingService {
        self.resource()
    }

    pub fn amenities(&self) -> AmenityService {
        self.resource()
    }

    pub fn business_types(&self) -> BusinessTypeService {
        self.resource()
    }

    pub fn commissions(&self) -> CommissionService {
        self.resource()
    }

    pub fn wallet(&self) -> WalletService {
        WalletService::new(self.http.clone())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.http.clone())
    }
}
