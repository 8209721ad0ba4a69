//! Templating facilities.
//!
//! Templates live under `templates/` and are compiled in by askama. Each page template defines a
//! `content` block, which is what a partial render returns.

use askama::Template;
use axum::response::IntoResponse;
use tracing::error;

use crate::{
    context::RenderContext,
    controller::{INDEX_TEMPLATE, PAGE_TEMPLATE, ResponseSink},
    pjax,
};

/// An error that can occur when rendering a template.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No template is registered under that name.
    #[error("unknown template `{name}`")]
    UnknownTemplate {
        /// The requested template name.
        name: String,
    },

    /// The template engine failed.
    #[error("failed to render template `{name}`: {err}")]
    Template {
        /// The template name.
        name: &'static str,

        /// The underlying error.
        #[source]
        err: askama::Error,
    },
}

impl IntoResponse for RenderError {
    fn into_response(self) -> axum::response::Response {
        error!("{self}");

        http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

mod views {
    use askama::Template;

    /// The home page.
    #[derive(Debug, Template)]
    #[template(path = "index.html")]
    pub(super) struct Index<'a> {
        pub title: Option<&'a str>,
        pub pjax_detection: bool,
    }

    #[derive(Debug, Template)]
    #[template(path = "index.html", block = "title")]
    pub(super) struct IndexTitle<'a> {
        pub title: Option<&'a str>,
    }

    #[derive(Debug, Template)]
    #[template(path = "index.html", block = "content")]
    pub(super) struct IndexContent<'a> {
        pub title: Option<&'a str>,
    }

    /// A generic page.
    #[derive(Debug, Template)]
    #[template(path = "page.html")]
    pub(super) struct Page<'a> {
        pub page: Option<&'a str>,
        pub pjax_detection: bool,
    }

    #[derive(Debug, Template)]
    #[template(path = "page.html", block = "title")]
    pub(super) struct PageTitle<'a> {
        pub page: Option<&'a str>,
    }

    #[derive(Debug, Template)]
    #[template(path = "page.html", block = "content")]
    pub(super) struct PageContent<'a> {
        pub page: Option<&'a str>,
    }
}

/// Join a title and a content block into a Pjax fragment.
///
/// Pjax clients take the document title from the `<title>` found in the fragment, and strip it
/// before swapping the rest in.
fn fragment(
    title: askama::Result<String>,
    content: askama::Result<String>,
) -> askama::Result<String> {
    Ok(format!("<title>{}</title>{}", title?, content?))
}

/// A response sink that renders the compiled templates into Axum responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSink {
    pjax_detection: bool,
}

impl TemplateSink {
    /// Create a new template sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve pages wired for Pjax navigation.
    ///
    /// Complete pages then load the Pjax client, and every response is marked as depending on
    /// the `X-PJAX` request header.
    pub fn with_pjax_detection(mut self, pjax_detection: bool) -> Self {
        self.pjax_detection = pjax_detection;
        self
    }

    /// Render a template into a string.
    ///
    /// A partial render yields the page's `<title>` followed by its `content` block.
    pub fn render_to_string(
        &self,
        template: &str,
        context: &RenderContext,
        partial: bool,
    ) -> Result<String, RenderError> {
        let pjax_detection = self.pjax_detection;

        let (name, result) = match template {
            INDEX_TEMPLATE => {
                let title = context.get("title");

                let result = if partial {
                    fragment(
                        views::IndexTitle { title }.render(),
                        views::IndexContent { title }.render(),
                    )
                } else {
                    views::Index {
                        title,
                        pjax_detection,
                    }
                    .render()
                };

                (INDEX_TEMPLATE, result)
            }
            PAGE_TEMPLATE => {
                let page = context.get("page");

                let result = if partial {
                    fragment(
                        views::PageTitle { page }.render(),
                        views::PageContent { page }.render(),
                    )
                } else {
                    views::Page {
                        page,
                        pjax_detection,
                    }
                    .render()
                };

                (PAGE_TEMPLATE, result)
            }
            _ => {
                return Err(RenderError::UnknownTemplate {
                    name: template.to_owned(),
                });
            }
        };

        result.map_err(|err| RenderError::Template { name, err })
    }

    fn respond(self, body: String) -> axum::response::Response {
        let response = pjax::Response::new(body);

        if self.pjax_detection {
            response.with_vary_on_pjax().into_response()
        } else {
            response.into_response()
        }
    }
}

impl ResponseSink for TemplateSink {
    type Output = axum::response::Response;
    type Error = RenderError;

    fn render(self, template: &str, context: RenderContext) -> Result<Self::Output, Self::Error> {
        let body = self.render_to_string(template, &context, false)?;

        Ok(self.respond(body))
    }

    fn render_partial(
        self,
        template: &str,
        context: RenderContext,
    ) -> Result<Self::Output, Self::Error> {
        let body = self.render_to_string(template, &context, true)?;

        Ok(self.respond(body))
    }
}
