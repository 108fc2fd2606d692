//! # rt-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! store traits. Handlers hold no state across requests; every store
//! fault is converted to a generic 500 body at this boundary and the
//! cause goes to the log only.

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use rt_core::error::AppError;
use rt_core::models::{ItemDraft, ItemPatch, ListResponse, SettingsPatch};
use rt_core::query::{build_query, ListParams};
use rt_core::traits::{ItemRepo, SettingsRepo};

/// State shared across all Actix-web workers.
pub struct AppState {
    pub items: Box<dyn ItemRepo>,
    pub settings: Box<dyn SettingsRepo>,
}

fn error_response(err: AppError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::Internal(_) => HttpResponse::InternalServerError().json(body),
    }
}

/// `GET /api/items` — search, filter, sort and paginate the collection.
///
/// The raw pair list keeps repeated `tags` keys, which `web::Query` of a
/// struct would collapse.
pub async fn list_items(
    data: web::Data<AppState>,
    params: web::Query<Vec<(String, String)>>,
) -> impl Responder {
    let params = ListParams::from_pairs(params.into_inner());
    let query = build_query(&params);

    match data.items.list(&query).await {
        Ok((items, total)) => {
            let total_pages = if query.limit > 0 {
                total.div_ceil(query.limit as u64)
            } else {
                0
            };
            HttpResponse::Ok().json(ListResponse {
                data: items,
                total,
                page: query.page,
                limit: query.limit,
                total_pages,
            })
        }
        Err(err) => {
            log::error!("listing items failed: {err:#}");
            error_response(AppError::Internal("Failed to fetch items".into()))
        }
    }
}

/// `POST /api/items` — identity is assigned here, never taken from the body.
pub async fn create_item(
    data: web::Data<AppState>,
    body: web::Json<ItemDraft>,
) -> impl Responder {
    let now = Utc::now();
    let item = body.into_inner().into_item(now.timestamp_millis(), now);

    match data.items.insert(&item).await {
        Ok(()) => HttpResponse::Created().json(item),
        Err(err) => {
            log::error!("creating item failed: {err:#}");
            error_response(AppError::Internal("Failed to create item".into()))
        }
    }
}

/// `PUT /api/items/{id}` — shallow merge of the body over the stored record.
pub async fn update_item(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ItemPatch>,
) -> impl Responder {
    match data.items.update(path.into_inner(), &body).await {
        Ok(Some(item)) => HttpResponse::Ok().json(item),
        Ok(None) => error_response(AppError::NotFound("Item")),
        Err(err) => {
            log::error!("updating item failed: {err:#}");
            error_response(AppError::Internal("Failed to update item".into()))
        }
    }
}

/// `DELETE /api/items/{id}`
pub async fn delete_item(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match data.items.delete(path.into_inner()).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => error_response(AppError::NotFound("Item")),
        Err(err) => {
            log::error!("deleting item failed: {err:#}");
            error_response(AppError::Internal("Failed to delete item".into()))
        }
    }
}

/// `GET /api/settings` — an empty store answers with the default triple
/// without persisting it.
pub async fn get_settings(data: web::Data<AppState>) -> impl Responder {
    match data.settings.load().await {
        Ok(settings) => HttpResponse::Ok().json(settings.unwrap_or_default()),
        Err(err) => {
            log::error!("loading settings failed: {err:#}");
            error_response(AppError::Internal("Failed to fetch settings".into()))
        }
    }
}

/// `PUT /api/settings` — upsert keyed by the fixed identity: merge the
/// partial body over the stored record (or the defaults) and persist the
/// full result.
pub async fn put_settings(
    data: web::Data<AppState>,
    body: web::Json<SettingsPatch>,
) -> impl Responder {
    let current = match data.settings.load().await {
        Ok(settings) => settings.unwrap_or_default(),
        Err(err) => {
            log::error!("loading settings failed: {err:#}");
            return error_response(AppError::Internal("Failed to update settings".into()));
        }
    };

    let merged = current.merged(&body);
    match data.settings.store(&merged).await {
        Ok(()) => HttpResponse::Ok().json(merged),
        Err(err) => {
            log::error!("storing settings failed: {err:#}");
            error_response(AppError::Internal("Failed to update settings".into()))
        }
    }
}
