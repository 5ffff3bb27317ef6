use actix_web::{web, Either, HttpResponse};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;

use twilio_client::twiml::MessagingResponse;
use twilio_client::TwilioApi;

use crate::error::AppError;
use crate::server::AppState;

/// Configure the inbound SMS webhook. The provider may deliver the event as
/// a form post or as query parameters, so both methods are accepted.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sms/reply/")
            .route(web::post().to(sms_reply))
            .route(web::get().to(sms_reply)),
    );
}

#[derive(Deserialize)]
struct SmsWebhook {
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "Body")]
    body: String,
    #[serde(rename = "SmsSid")]
    sms_sid: Option<String>,
}

/// POST|GET /sms/reply/ - Inbound SMS event, answered with TwiML
async fn sms_reply(
    app_state: web::Data<AppState>,
    params: Either<web::Form<SmsWebhook>, web::Query<SmsWebhook>>,
) -> Result<HttpResponse, AppError> {
    let params = match params {
        Either::Left(form) => form.into_inner(),
        Either::Right(query) => query.into_inner(),
    };

    let timestamp = resolve_timestamp(app_state.get_ref(), params.sms_sid.as_deref()).await;
    let reply = app_state
        .engine
        .handle_inbound_event(&params.from, &params.body, timestamp)
        .await?;

    let mut twiml = MessagingResponse::new();
    if let Some(reply) = reply {
        twiml = twiml.message(reply.text());
    }

    Ok(HttpResponse::Ok()
        .content_type("text/xml")
        .body(twiml.to_xml()))
}

/// Prefer the provider-side creation time of the message; fall back to the
/// webhook receipt time when the lookup fails or no sid was delivered.
async fn resolve_timestamp(app_state: &AppState, sms_sid: Option<&str>) -> DateTime<Utc> {
    let Some(sid) = sms_sid else {
        return Utc::now();
    };
    match app_state.twilio.get_message(sid).await {
        Ok(record) => record.date_created,
        Err(e) => {
            warn!("could not fetch message {sid}, using receipt time: {e}");
            Utc::now()
        }
    }
}
