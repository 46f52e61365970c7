use std::collections::HashMap;

use tracing::{debug, warn};

use super::http::{Method, Request, Response, Status};
use crate::error::AppError;

pub type Handler = Box<dyn Fn(&Request, &mut Response) -> anyhow::Result<()>>;

const DEFAULT_SEGMENT: &str = "index";

/// Routes `/<controller>/<action>/...` to registered handlers.
///
/// The first path segment names the controller and the second the action;
/// both default to `index` and are matched case-insensitively. Each
/// (controller, method, action) triple has at most one handler.
#[derive(Default)]
pub struct FrontController {
    routes: HashMap<(String, Method, String), Handler>,
    debug: bool,
}

impl FrontController {
    pub fn new() -> Self { Self::default() }

    /// Responses created by `run` get debug details on errors.
    pub fn enable_debug(&mut self) -> &mut Self {
        self.debug = true;
        self
    }

    pub fn route<F>(&mut self, method: Method, controller: &str, action: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) -> anyhow::Result<()> + 'static,
    {
        let key = (controller.to_ascii_lowercase(), method, action.to_ascii_lowercase());
        self.routes.insert(key, Box::new(handler));
        self
    }

    /// Dispatch one request and return the finished response.
    pub fn run(&self, request: &Request) -> Response {
        let mut response = Response::new();
        if self.debug {
            response.enable_debug();
        }
        let controller = request.segment(0).unwrap_or(DEFAULT_SEGMENT).to_ascii_lowercase();
        let action = request.segment(1).unwrap_or(DEFAULT_SEGMENT).to_ascii_lowercase();
        debug!(target: "ulpf::presentation", "front_controller: {} {}/{}", request.method(), controller, action);

        let key = (controller, request.method(), action);
        let Some(handler) = self.routes.get(&key) else {
            let (controller, _, action) = key;
            let other_method = self.routes.keys().any(|(c, _, a)| *c == controller && *a == action);
            if other_method {
                response.method_not_allowed();
            } else {
                response.not_found();
            }
            return response;
        };

        if let Err(err) = handler(request, &mut response) {
            let status = err
                .downcast_ref::<AppError>()
                .map(|app| Status::from_code(app.http_status()))
                .unwrap_or(Status::InternalServerError);
            warn!(target: "ulpf::presentation", "front_controller: handler failed with {}: {:#}", status, err);
            response.error_with_status(status, &err);
        }
        response
    }
}
