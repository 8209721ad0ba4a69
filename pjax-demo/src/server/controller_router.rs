use std::collections::HashMap;

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};

use crate::{PageController, TemplateSink, controller, pjax, templating::RenderError};

/// A request, as seen by the page controller.
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    /// The path parameters of the matched route.
    params: HashMap<String, String>,

    /// The Pjax headers.
    pjax: pjax::Request,
}

impl IncomingRequest {
    /// Create a new incoming request.
    pub fn new(params: HashMap<String, String>, pjax: pjax::Request) -> Self {
        Self { params, pjax }
    }
}

impl controller::Request for IncomingRequest {
    fn param(&self, name: &str) -> Option<&str> {
        controller::Request::param(&self.params, name)
    }

    fn is_pjax(&self) -> bool {
        self.pjax.is_pjax()
    }
}

/// A router that is associated to a page controller.
#[derive(Debug, Clone, Default)]
pub struct ControllerRouter(Router);

impl ControllerRouter {
    /// Create a new controller router from a controller.
    ///
    /// Routes:
    ///
    /// - `GET /`: the home page.
    /// - `GET /page/{id}`: the page view for `id`.
    /// - `GET /page`: the page view, without an `id`.
    pub fn new(controller: PageController) -> Self {
        let router = Router::new()
            .route("/", get(home))
            .route("/page", get(page_without_id))
            .route("/page/{id}", get(page))
            .with_state(controller);

        Self(router)
    }
}

impl From<ControllerRouter> for Router {
    fn from(controller_router: ControllerRouter) -> Self {
        controller_router.0
    }
}

fn render(
    controller: &PageController,
    request: &IncomingRequest,
    instruction: crate::RenderInstruction,
) -> Result<axum::response::Response, RenderError> {
    let sink = TemplateSink::new().with_pjax_detection(controller.pjax_detection());

    controller.render(request, instruction, sink)
}

async fn home(
    State(controller): State<PageController>,
    pjax: pjax::Request,
) -> Result<axum::response::Response, RenderError> {
    let request = IncomingRequest::new(HashMap::new(), pjax);

    render(&controller, &request, controller.home(&request))
}

async fn page(
    State(controller): State<PageController>,
    pjax: pjax::Request,
    Path(params): Path<HashMap<String, String>>,
) -> Result<axum::response::Response, RenderError> {
    let request = IncomingRequest::new(params, pjax);

    render(&controller, &request, controller.page(&request))
}

async fn page_without_id(
    State(controller): State<PageController>,
    pjax: pjax::Request,
) -> Result<axum::response::Response, RenderError> {
    let request = IncomingRequest::new(HashMap::new(), pjax);

    render(&controller, &request, controller.page(&request))
}
