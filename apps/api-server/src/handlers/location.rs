use actix_web::HttpResponse;
use easel_shared::dto::LocationResponse;

/// GET /api/location
///
/// Always reports Seoul; there is no geolocation behind it.
pub async fn current_location() -> HttpResponse {
    HttpResponse::Ok().json(LocationResponse {
        location: "Seoul".to_string(),
    })
}
