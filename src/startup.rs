use crate::configuration::Settings;
use crate::connectors::GenerativeModel;
use crate::db::ConversationStore;
use crate::forms::ErrorResponse;
use crate::routes;
use crate::services::{self, ChatService, PromptAssembler};
use crate::views::Renderer;
use actix_web::{dev::Server, error, web, App, HttpResponse, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    settings: Settings,
    store: Arc<dyn ConversationStore>,
    model: Arc<dyn GenerativeModel>,
) -> Result<Server, std::io::Error> {
    let dataset = services::homelab::load(&settings.homelab.data_file);
    let assembler = PromptAssembler::new(&dataset, settings.chat.history_limit);

    let chat = web::Data::new(ChatService::new(store, model, assembler));
    let dataset = web::Data::new(dataset);
    let renderer = Renderer::new()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let renderer = web::Data::new(renderer);
    let settings = web::Data::new(settings);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg = match &err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "JSON inválido (linha {}, coluna {}): {}",
                err.line(),
                err.column(),
                err
            ),
            err => format!("JSON inválido: {}", err),
        };
        tracing::info!("Rejected chat payload: {}", msg);
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse::new(msg)))
            .into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(routes::chat::page::home)
            .service(routes::chat::page::new_conversation)
            .service(
                web::scope("/chat")
                    .service(routes::chat::page::item)
                    .service(routes::chat::send::item)
                    .service(routes::chat::get::history)
                    .service(routes::chat::get::list),
            )
            .service(
                web::scope("/homelabs")
                    .service(routes::homelab::list)
                    .service(routes::homelab::item),
            )
            .app_data(json_config.clone())
            .app_data(chat.clone())
            .app_data(dataset.clone())
            .app_data(renderer.clone())
            .app_data(settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
