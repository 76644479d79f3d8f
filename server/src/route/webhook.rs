use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::EventTransformer;
use crate::response::EventPresenter;
use application::service::HandleUserEventService;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::Router;

pub trait WebhookRouter {
    fn route_webhook(self) -> Self;
}

impl WebhookRouter for Router<AppModule> {
    fn route_webhook(self) -> Self {
        self.route(
            "/api/webhooks/clerk",
            post(
                |State(handler): State<AppModule>, headers: HeaderMap, body: Bytes| async move {
                    handler
                        .verifier()
                        .verify(&headers, &body)
                        .map_err(ErrorStatus::from)?;
                    Controller::new(EventTransformer, EventPresenter)
                        .try_intake(body)
                        .map_err(ErrorStatus::from)?
                        .handle(|event| handler.handle_event(event))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
