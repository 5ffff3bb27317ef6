use actix_web::{web, Either, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use quiz_core::PromptDirective;
use twilio_client::twiml::{Gather, VoiceResponse};

use crate::error::AppError;
use crate::server::AppState;

/// Configure the voice-call webhooks. `/answer/` is the call entry point and
/// the loop target; the gather endpoints receive what the caller provided.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/answer/")
            .route(web::post().to(answer_call))
            .route(web::get().to(answer_call)),
    )
    .service(
        web::resource("/gather-speech")
            .route(web::post().to(gather_speech))
            .route(web::get().to(gather_speech)),
    )
    .service(
        web::resource("/gather-digits")
            .route(web::post().to(gather_digits))
            .route(web::get().to(gather_digits)),
    );
}

#[derive(Deserialize)]
struct VoiceWebhook {
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "SpeechResult")]
    speech_result: Option<String>,
    #[serde(rename = "Digits")]
    digits: Option<String>,
}

fn into_params(params: Either<web::Form<VoiceWebhook>, web::Query<VoiceWebhook>>) -> VoiceWebhook {
    match params {
        Either::Left(form) => form.into_inner(),
        Either::Right(query) => query.into_inner(),
    }
}

fn xml_response(twiml: VoiceResponse) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/xml")
        .body(twiml.to_xml())
}

/// POST|GET /answer/ - Prompt the caller for whatever the session expects next
async fn answer_call(
    app_state: web::Data<AppState>,
    params: Either<web::Form<VoiceWebhook>, web::Query<VoiceWebhook>>,
) -> Result<HttpResponse, AppError> {
    let params = into_params(params);
    let directive = app_state.engine.prompt_for(&params.from).await?;
    let language = app_state.config.voice_language.as_str();

    let twiml = match directive {
        PromptDirective::EnterExamCode => VoiceResponse::new()
            .say_in("Please enter the 6 digit quiz I D.", language)
            .gather(Gather::digits(6, "/gather-digits")),
        PromptDirective::SpeakName => VoiceResponse::new()
            .say_in("Please say your name.", language)
            .gather(
                Gather::speech("/gather-speech")
                    .language(language)
                    .profanity_filter(true),
            ),
        PromptDirective::AnswerDigit => {
            VoiceResponse::new().gather(Gather::digits(1, "/gather-digits"))
        }
    }
    // No input gathered: loop the caller back into the prompt.
    .redirect("/answer/");

    Ok(xml_response(twiml))
}

/// POST|GET /gather-speech - Speech transcript from the name prompt
async fn gather_speech(
    app_state: web::Data<AppState>,
    params: Either<web::Form<VoiceWebhook>, web::Query<VoiceWebhook>>,
) -> Result<HttpResponse, AppError> {
    let params = into_params(params);
    let language = app_state.config.voice_language.clone();

    let mut twiml = VoiceResponse::new();
    if let Some(speech) = params.speech_result.as_deref() {
        let reply = app_state
            .engine
            .handle_inbound_event(&params.from, speech, Utc::now())
            .await?;
        if let Some(reply) = reply {
            twiml = twiml.say_in(reply.text(), language);
        }
    }

    Ok(xml_response(twiml.redirect("/answer/")))
}

/// POST|GET /gather-digits - Keypress input: an exam code or an answer
async fn gather_digits(
    app_state: web::Data<AppState>,
    params: Either<web::Form<VoiceWebhook>, web::Query<VoiceWebhook>>,
) -> Result<HttpResponse, AppError> {
    let params = into_params(params);

    if let Some(digits) = params.digits.as_deref() {
        // The reply is not spoken here; the follow-up prompt comes from
        // /answer/ after the redirect.
        app_state
            .engine
            .handle_inbound_event(&params.from, digits, Utc::now())
            .await?;
    }

    Ok(xml_response(VoiceResponse::new().redirect("/answer/")))
}
