//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, health_handler, payment_handler, product_handler};
use domain::{
    AuthResponse, CourierView, ErrorBody, EstablishmentTypeView, EstablishmentView, Payer,
    PreferenceItem, PreferenceResponse, ProductView, ProfileResponse, RoleGrantResponse,
    UploadResponse, UserSnapshot,
};

/// OpenAPI documentation for the Snappy API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Snappy API",
        version = "0.1.0",
        description = "Delivery marketplace: accounts with roles, product catalogue and Mercado Pago checkout",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health_handler::health,
        // Authentication and accounts
        auth_handler::login,
        auth_handler::register,
        auth_handler::establishment_types,
        auth_handler::register_business,
        auth_handler::become_courier,
        auth_handler::me,
        // Products
        product_handler::list_products,
        product_handler::my_products,
        product_handler::upload_image,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Payments
        payment_handler::create_preference,
        payment_handler::webhook,
    ),
    components(
        schemas(
            // Wire types
            UserSnapshot,
            EstablishmentView,
            CourierView,
            AuthResponse,
            ProfileResponse,
            RoleGrantResponse,
            EstablishmentTypeView,
            ProductView,
            PreferenceItem,
            Payer,
            PreferenceResponse,
            UploadResponse,
            ErrorBody,
            // Request types
            auth_handler::LoginRequest,
            auth_handler::RegisterRequest,
            auth_handler::RegisterBusinessRequest,
            product_handler::ProductRequest,
            payment_handler::CheckoutRequest,
            health_handler::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Registration, login and role grants"),
        (name = "Products", description = "Catalogue and establishment products"),
        (name = "Payments", description = "Checkout preferences and provider notifications")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
