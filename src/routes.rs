use actix_web::{delete, get, post, web, HttpResponse, Responder};
use directory::{
    consts::consts::{ActivityName, Email},
    directory::request_manager::RequestManager,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Deserialize, Debug)]
pub struct ParticipantQuery {
    pub email: String,
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

/// Sends the browser to the bundled frontend
#[get("/")]
pub async fn index() -> impl Responder {
    web::Redirect::to("/static/index.html").temporary()
}

#[get("/activities")]
pub async fn list_activities(
    request_manager: web::Data<RequestManager>,
) -> Result<HttpResponse, ApiError> {
    let request_manager = request_manager.get_ref().clone();

    // The request manager blocks until the directory worker responds
    let activities = web::block(move || request_manager.send_list()).await??;

    Ok(HttpResponse::Ok().json(activities))
}

#[post("/activities/{activity_name}/signup")]
pub async fn signup(
    request_manager: web::Data<RequestManager>,
    activity_name: web::Path<String>,
    query: web::Query<ParticipantQuery>,
) -> Result<HttpResponse, ApiError> {
    let request_manager = request_manager.get_ref().clone();
    let activity_name = ActivityName(activity_name.into_inner());
    let email = Email(query.into_inner().email);

    let message =
        web::block(move || request_manager.send_signup(activity_name, email)).await??;

    Ok(HttpResponse::Ok().json(MessageBody { message }))
}

#[delete("/activities/{activity_name}/participants")]
pub async fn unregister(
    request_manager: web::Data<RequestManager>,
    activity_name: web::Path<String>,
    query: web::Query<ParticipantQuery>,
) -> Result<HttpResponse, ApiError> {
    let request_manager = request_manager.get_ref().clone();
    let activity_name = ActivityName(activity_name.into_inner());
    let email = Email(query.into_inner().email);

    let message =
        web::block(move || request_manager.send_unregister(activity_name, email)).await??;

    Ok(HttpResponse::Ok().json(MessageBody { message }))
}
