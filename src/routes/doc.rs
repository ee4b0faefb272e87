use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            AccessToken, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
            RefreshRequest, RegisterRequest, TokenPair, VerifyOtpRequest,
        },
        payments::{CreatePaymentRequest, PaymentList, RefundAck, RefundRequest},
        profile::{UpdateProfileRequest, UserList},
        reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
        spots::{CreateSpotRequest, SpotBundle, SpotList, SpotStatusRequest, UpdateSpotRequest},
        zones::{CreateZoneRequest, UpdateZoneRequest, ZoneCreated, ZoneList, ZoneSpots},
    },
    entity::{
        parking_spots::{SpotStatus, SpotType},
        payments::{PaymentMethod, PaymentStatus},
        reservations::ReservationStatus,
        users::Role,
    },
    models::{ParkingSpot, ParkingZone, Payment, Reservation, UserProfile},
    response::{ApiResponse, Meta},
    routes::{auth, health, params, payments, profile, reservations, spots, zones},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::token_refresh,
        auth::forgot_password,
        auth::verify_otp,
        auth::change_password,
        profile::about,
        profile::update,
        profile::list,
        profile::remove,
        zones::list_zones,
        zones::create_zone,
        zones::get_zone,
        zones::update_zone,
        zones::delete_zone,
        zones::zone_spots,
        spots::list_spots,
        spots::available_spots,
        spots::create_spot,
        spots::update_spot,
        spots::update_status,
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        reservations::check_in,
        reservations::check_out,
        payments::list_payments,
        payments::create_payment,
        payments::get_payment,
        payments::refund_payment
    ),
    components(
        schemas(
            Role,
            SpotStatus,
            SpotType,
            ReservationStatus,
            PaymentMethod,
            PaymentStatus,
            UserProfile,
            ParkingZone,
            ParkingSpot,
            Reservation,
            Payment,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            ForgotPasswordRequest,
            VerifyOtpRequest,
            ChangePasswordRequest,
            TokenPair,
            AccessToken,
            UpdateProfileRequest,
            UserList,
            CreateZoneRequest,
            UpdateZoneRequest,
            ZoneCreated,
            ZoneList,
            ZoneSpots,
            CreateSpotRequest,
            UpdateSpotRequest,
            SpotStatusRequest,
            SpotBundle,
            SpotList,
            CreateReservationRequest,
            UpdateReservationRequest,
            ReservationList,
            CreatePaymentRequest,
            RefundRequest,
            RefundAck,
            PaymentList,
            params::Pagination,
            params::SortOrder,
            Meta,
            ApiResponse<UserProfile>,
            ApiResponse<ParkingZone>,
            ApiResponse<ParkingSpot>,
            ApiResponse<Reservation>,
            ApiResponse<Payment>,
            ApiResponse<SpotBundle>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, tokens and password reset"),
        (name = "Profile", description = "User profile endpoints"),
        (name = "Parking zones", description = "Zone management"),
        (name = "Spots", description = "Parking spot endpoints"),
        (name = "Reservations", description = "Reservation lifecycle"),
        (name = "Payments", description = "Payment records and refunds"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
