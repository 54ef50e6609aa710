use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbBooking, DbService, DbShift, DbUser, DbVehicle, DbWorkshop};
use pitstop_core::models::booking::BookingStatus;
use pitstop_core::models::workshop::Shift;

// Mock repositories for testing
mock! {
    pub WorkshopRepo {
        pub async fn create_workshop(
            &self,
            name: &'static str,
            location: &'static str,
            contact: &'static str,
        ) -> eyre::Result<DbWorkshop>;

        pub async fn get_workshop_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbWorkshop>>;

        pub async fn list_workshops(&self) -> eyre::Result<Vec<DbWorkshop>>;

        pub async fn get_shifts(
            &self,
            workshop_id: Uuid,
        ) -> eyre::Result<Vec<DbShift>>;

        pub async fn replace_shifts(
            &self,
            workshop_id: Uuid,
            shifts: Vec<Shift>,
        ) -> eyre::Result<Vec<DbShift>>;
    }
}

mock! {
    pub UserRepo {
        pub async fn get_user_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_mechanics(
            &self,
            workshop_id: Uuid,
        ) -> eyre::Result<Vec<DbUser>>;
    }
}

mock! {
    pub ServiceRepo {
        pub async fn create_service(
            &self,
            workshop_id: Uuid,
            name: &'static str,
            price: f64,
            duration_minutes: Option<i32>,
        ) -> eyre::Result<DbService>;

        pub async fn get_service_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbService>>;

        pub async fn list_services_by_workshop(
            &self,
            workshop_id: Uuid,
        ) -> eyre::Result<Vec<DbService>>;
    }
}

mock! {
    pub VehicleRepo {
        pub async fn create_vehicle(
            &self,
            owner_id: Uuid,
            brand: &'static str,
            model: &'static str,
            plate: &'static str,
            year: i32,
        ) -> eyre::Result<DbVehicle>;

        pub async fn get_vehicle_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbVehicle>>;

        pub async fn list_vehicles_by_owner(
            &self,
            owner_id: Uuid,
        ) -> eyre::Result<Vec<DbVehicle>>;

        pub async fn delete_vehicle(&self, id: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn get_bookings_for_day(
            &self,
            workshop_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn get_booking_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn list_bookings_by_client(
            &self,
            client_id: Uuid,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn update_status(
            &self,
            id: Uuid,
            status: BookingStatus,
        ) -> eyre::Result<DbBooking>;

        pub async fn reserve_booking(
            &self,
            client_id: Uuid,
            vehicle_id: Uuid,
            workshop_id: Uuid,
            service_id: Uuid,
            mechanics: Vec<Uuid>,
            date: NaiveDate,
            start_time: NaiveTime,
            end_time: NaiveTime,
        ) -> eyre::Result<Option<DbBooking>>;
    }
}
