use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::handlers::{parse_object_id, ListResponse};
use crate::models::{ApiError, Identity, SessionContext, UpdateUserRequest, User};
use crate::services::{MongoDBService, RangeQuery};
use crate::utils::display::{fmt_bool, fmt_date, fmt_list, fmt_opt};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub identity: Option<Identity>,
    pub verified: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub identity: String,
    pub verified: String,
    pub preferred_crops: String,
    pub joined_on: String,
}

impl UserRow {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            email: fmt_opt(&user.email),
            identity: user.identity.to_string(),
            verified: fmt_bool(user.is_verified),
            preferred_crops: fmt_list(&user.preferred_crops),
            joined_on: fmt_date(&user.created_at),
        }
    }
}

pub async fn list_users(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching users grid");

    let users = mongodb
        .find_users(
            RangeQuery::new()
                .eq_opt("identity", query.identity.map(|i| i.to_string()))
                .eq_opt("is_verified", query.verified),
        )
        .await?;

    let rows: Vec<UserRow> = users.iter().map(UserRow::from_user).collect();
    info!("Found {} users", rows.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(rows)))
}

pub async fn update_user(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&path)?;

    info!("User {} updating user {}", session.user_id, id);
    let user = mongodb.update_user(&id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}
