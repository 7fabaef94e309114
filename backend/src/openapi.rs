//! OpenAPI document for the StockLink API

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StockLink API",
        description = "Inventory management: products, warehouses, storage layouts and the stock movement ledger."
    ),
    tags(
        (name = "auth", description = "Registration and sign-in"),
        (name = "products", description = "Product records"),
        (name = "movements", description = "Stock movement ledger"),
        (name = "warehouses", description = "Warehouse records"),
        (name = "locations", description = "Warehouse storage layouts"),
        (name = "health", description = "Liveness and dependency probes")
    ),
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::movements::list_movements,
        crate::handlers::movements::create_movement,
        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::get_warehouse,
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::update_warehouse,
        crate::handlers::warehouses::delete_warehouse,
        crate::handlers::locations::get_location,
        crate::handlers::locations::create_location,
        crate::handlers::locations::replace_location,
        crate::handlers::locations::get_bin,
        crate::handlers::locations::bin_exists,
        crate::handlers::health::health_check,
        crate::handlers::health::database_health,
    ),
    components(
        schemas(
            stocklink_shared::Role,
            stocklink_shared::MovementType,
            stocklink_shared::LocationTree,
            stocklink_shared::Zone,
            stocklink_shared::Row,
            stocklink_shared::Level,
            stocklink_shared::Bin,
            crate::error::ErrorResponse,
            crate::error::StockShortage,
            crate::error::ValidationErrorResponse,
            crate::error::FieldError,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected operations
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
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

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Swagger UI at `/docs`, backed by the JSON document at [`OPENAPI_JSON_PATH`]
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}
