use crate::io_struct::ChatReqInput;
use crate::preamble::with_preamble;
use crate::relay_state::{RelayConfig, RelayState};
use crate::request_log::log_request;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpServer, ResponseError, get, post, web};
use serde_json::json;
use std::io::Write;
use thiserror::Error;

pub const GREETING: &str = "Ahoy, matey! Welcome to the Blackbeard Pirate reviewer!";

/// Header carrying the delegated credential issued to the end user.
pub const GITHUB_TOKEN_HEADER: &str = "X-GitHub-Token";

/// Everything that can sink a request before streaming begins. Once bytes
/// are flowing they cannot be retracted, so mid-stream failures are not
/// represented here; the stream simply ends.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing X-GitHub-Token header")]
    MissingToken,

    #[error("conversation must contain at least one message")]
    EmptyConversation,

    #[error("identity lookup failed: {0}")]
    IdentityUpstream(String),

    #[error("completion relay failed: {0}")]
    CompletionUpstream(String),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingToken => StatusCode::UNAUTHORIZED,
            RelayError::EmptyConversation => StatusCode::BAD_REQUEST,
            RelayError::IdentityUpstream(_) | RelayError::CompletionUpstream(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[get("/")]
pub async fn greeting(_req: HttpRequest, _: web::Data<RelayState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(GREETING)
}

#[post("/")]
pub async fn chat(
    req: HttpRequest,
    body: web::Json<ChatReqInput>,
    app_state: web::Data<RelayState>,
) -> Result<HttpResponse, RelayError> {
    let token = delegated_token(&req)?;
    let mut chat_req = body.into_inner();
    if chat_req.messages.is_empty() {
        return Err(RelayError::EmptyConversation);
    }
    log_request(app_state.log_mode, &chat_req);

    let identity = app_state.resolve_identity(&token).await?;
    chat_req.messages = with_preamble(&identity.login, std::mem::take(&mut chat_req.messages));

    let completion = app_state.relay_completion(&token, &chat_req).await?;
    Ok(completion.into_response())
}

fn delegated_token(req: &HttpRequest) -> Result<String, RelayError> {
    match req
        .headers()
        .get(GITHUB_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(RelayError::MissingToken),
    }
}

pub async fn startup(config: RelayConfig, state: RelayState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    println!("Starting relay at {}:{}", config.host, config.port);

    // default level is info
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .init();

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .service(greeting)
            .service(chat)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    std::io::Result::Ok(())
}
