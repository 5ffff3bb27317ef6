use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::server::AppState;

/// Configure exam administration routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(start_exam);
}

#[derive(Deserialize)]
struct StartExamRequest {
    exam_id: String,
    num_questions: usize,
    questions: Vec<String>,
}

#[derive(Serialize)]
struct StartExamResponse {
    sms_id: String,
}

/// POST /start - Register an exam and hand back the code participants dial in
#[post("/start")]
pub async fn start_exam(
    app_state: web::Data<AppState>,
    payload: web::Json<StartExamRequest>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let code = app_state
        .registry
        .create_exam(req.exam_id, req.num_questions, req.questions)
        .await?;

    Ok(HttpResponse::Ok().json(StartExamResponse { sms_id: code }))
}
