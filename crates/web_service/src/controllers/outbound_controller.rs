use actix_web::{post, web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};
use twilio_client::TwilioApi;

use crate::error::AppError;
use crate::server::AppState;

/// Configure the administrative outbound triggers. These proactively reach a
/// participant; they never touch session state.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(send_sms).service(place_call);
}

#[derive(Deserialize)]
struct OutboundSmsRequest {
    body: String,
}

#[derive(Serialize)]
struct OutboundResponse {
    sid: String,
}

/// POST /sms/send/{phone} - Text a participant
#[post("/sms/send/{phone}")]
pub async fn send_sms(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<OutboundSmsRequest>,
) -> Result<HttpResponse, AppError> {
    let phone = path.into_inner();
    let sid = app_state.twilio.send_message(&phone, &payload.body).await?;
    info!("sent outbound message {sid} to {phone}");

    Ok(HttpResponse::Ok().json(OutboundResponse { sid }))
}

#[derive(Deserialize)]
struct PlaceCallRequest {
    /// Webhook the call fetches its TwiML from once answered.
    url: String,
}

/// POST /place-call/{phone} - Ring a participant
#[post("/place-call/{phone}")]
pub async fn place_call(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<PlaceCallRequest>,
) -> Result<HttpResponse, AppError> {
    let phone = path.into_inner();
    let sid = app_state.twilio.place_call(&phone, &payload.url).await?;
    info!("placed outbound call {sid} to {phone}");

    Ok(HttpResponse::Ok().json(OutboundResponse { sid }))
}
