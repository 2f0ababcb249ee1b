use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct ItemDoc {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub processed: bool,
}

#[derive(ToSchema)]
pub struct ItemInputDoc {
    pub name: String,
    pub description: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::items::list,
        crate::routes::items::get,
        crate::routes::items::search,
        crate::routes::items::create,
        crate::routes::items::update,
        crate::routes::items::delete,
        crate::routes::items::count,
        crate::routes::items::exists,
        crate::routes::items::toggle_processed,
    ),
    components(schemas(HealthResponse, ItemDoc, ItemInputDoc)),
    tags(
        (name = "health"),
        (name = "items")
    )
)]
pub struct ApiDoc;
