//! OpenAPI document for the HTTP surface.
//!
//! With the `swagger-ui` feature the document is served at
//! `/api-docs/openapi.json` and the interactive UI at `/docs`.

use utoipa::OpenApi;

use crate::api::dto::{
    ApiInfoResponse, EchoRequest, EchoResponse, HealthResponse, ItemListResponse,
    ItemMutationResponse, TimeResponse,
};
use crate::api::handlers::{items, system};
use crate::domain::{Item, ItemFields};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Node-RED Study API",
        description = "Sample API for Node-RED learning examples. The WebSocket channels `/ws` (echo) and `/ws/broadcast` (fan-out) are not described here."
    ),
    paths(
        system::root_handler,
        system::health_handler,
        system::time_handler,
        system::echo_handler,
        items::list_items,
        items::create_item,
        items::get_item,
        items::update_item,
        items::delete_item,
    ),
    components(schemas(
        Item,
        ItemFields,
        ItemListResponse,
        ItemMutationResponse,
        ApiInfoResponse,
        HealthResponse,
        TimeResponse,
        EchoRequest,
        EchoResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Service information and utilities"),
        (name = "Items", description = "In-memory item CRUD"),
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the document and the UI.
#[cfg(feature = "swagger-ui")]
#[must_use]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
