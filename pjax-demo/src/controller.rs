//! The page controller.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::context::{RenderContext, RenderInstruction, RenderMode};

/// The template rendered by the home page.
pub const INDEX_TEMPLATE: &str = "index";

/// The template rendered by the page view.
pub const PAGE_TEMPLATE: &str = "page";

/// The title given to the home page.
pub const HOME_TITLE: &str = "Pjax";

/// The request capabilities the controller relies on.
pub trait Request {
    /// Get the path parameter bound to `name`, if any.
    fn param(&self, name: &str) -> Option<&str>;

    /// Whether the request asks for a partial render.
    fn is_pjax(&self) -> bool {
        false
    }
}

/// A request with no parameters at all.
impl Request for () {
    fn param(&self, _name: &str) -> Option<&str> {
        None
    }
}

impl Request for HashMap<String, String> {
    fn param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Request for BTreeMap<String, String> {
    fn param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Request for [(&str, &str)] {
    fn param(&self, name: &str) -> Option<&str> {
        self.iter()
            .find_map(|(key, value)| (*key == name).then_some(*value))
    }
}

impl<const N: usize> Request for [(&str, &str); N] {
    fn param(&self, name: &str) -> Option<&str> {
        self.as_slice().param(name)
    }
}

/// The thing that turns a template name and a context into a response.
///
/// Render methods take the sink by value: a sink renders at most once.
pub trait ResponseSink: Sized {
    /// The rendered response.
    type Output;

    /// The error raised when rendering fails.
    type Error;

    /// Render the complete page.
    fn render(self, template: &str, context: RenderContext) -> Result<Self::Output, Self::Error>;

    /// Render only the part of the page that changes between navigations.
    ///
    /// Sinks that have no notion of partial renders fall back to a complete render.
    fn render_partial(
        self,
        template: &str,
        context: RenderContext,
    ) -> Result<Self::Output, Self::Error> {
        self.render(template, context)
    }
}

/// Maps requests to render instructions.
///
/// The controller holds no per-request state and can be cloned freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageController {
    /// Whether `X-PJAX` requests get a partial render.
    pjax_detection: bool,
}

impl PageController {
    /// Create a new controller, with Pjax detection disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Pjax detection.
    ///
    /// When disabled, every request gets a complete render, whatever its headers.
    pub fn with_pjax_detection(mut self, enabled: bool) -> Self {
        self.pjax_detection = enabled;
        self
    }

    /// Whether Pjax detection is enabled.
    pub fn pjax_detection(&self) -> bool {
        self.pjax_detection
    }

    /// The home page.
    ///
    /// The request is not inspected.
    pub fn home<R: Request + ?Sized>(&self, _request: &R) -> RenderInstruction {
        let instruction = RenderInstruction::new(
            INDEX_TEMPLATE,
            RenderContext::new().with("title", Some(HOME_TITLE)),
        );

        debug!("Home page resolves to {instruction}.");

        instruction
    }

    /// The page view, keyed by the `id` path parameter.
    ///
    /// The parameter is passed through as is, and a missing one is passed as an absent value.
    pub fn page<R: Request + ?Sized>(&self, request: &R) -> RenderInstruction {
        let instruction = RenderInstruction::new(
            PAGE_TEMPLATE,
            RenderContext::new().with("page", request.param("id")),
        );

        debug!("Page view resolves to {instruction}.");

        instruction
    }

    /// The render mode for a request.
    pub fn render_mode<R: Request + ?Sized>(&self, request: &R) -> RenderMode {
        if self.pjax_detection && request.is_pjax() {
            RenderMode::Partial
        } else {
            RenderMode::Full
        }
    }

    /// Hand a render instruction to a sink.
    ///
    /// Errors raised by the sink are returned untouched.
    pub fn render<R, S>(
        &self,
        request: &R,
        instruction: RenderInstruction,
        sink: S,
    ) -> Result<S::Output, S::Error>
    where
        R: Request + ?Sized,
        S: ResponseSink,
    {
        let RenderInstruction { template, context } = instruction;

        match self.render_mode(request) {
            RenderMode::Full => sink.render(&template, context),
            RenderMode::Partial => {
                debug!("Rendering `{template}` partially for a Pjax request.");

                sink.render_partial(&template, context)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A sink that records what it was asked to render.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(RenderMode, RenderInstruction)>,
    }

    impl ResponseSink for &mut Recorder {
        type Output = ();
        type Error = std::convert::Infallible;

        fn render(self, template: &str, context: RenderContext) -> Result<(), Self::Error> {
            self.calls.push((
                RenderMode::Full,
                RenderInstruction::new(template.to_owned(), context),
            ));

            Ok(())
        }

        fn render_partial(self, template: &str, context: RenderContext) -> Result<(), Self::Error> {
            self.calls.push((
                RenderMode::Partial,
                RenderInstruction::new(template.to_owned(), context),
            ));

            Ok(())
        }
    }

    /// A sink that always fails.
    struct Failing;

    #[derive(Debug, PartialEq)]
    struct Boom(String);

    impl ResponseSink for Failing {
        type Output = ();
        type Error = Boom;

        fn render(self, template: &str, _context: RenderContext) -> Result<(), Boom> {
            Err(Boom(template.to_owned()))
        }
    }

    struct PjaxRequest<'a>(&'a str);

    impl Request for PjaxRequest<'_> {
        fn param(&self, name: &str) -> Option<&str> {
            (name == "id").then_some(self.0)
        }

        fn is_pjax(&self) -> bool {
            true
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn index() -> RenderInstruction {
        RenderInstruction::new("index", RenderContext::new().with("title", Some("Pjax")))
    }

    fn page(id: Option<&str>) -> RenderInstruction {
        RenderInstruction::new("page", RenderContext::new().with("page", id))
    }

    #[test]
    fn test_home_ignores_request() {
        let controller = PageController::new();

        assert_eq!(controller.home(&()), index());
        assert_eq!(controller.home(&params(&[("id", "42")])), index());
        assert_eq!(controller.home(&[("title", "other")]), index());
        assert_eq!(controller.home(&PjaxRequest("x")), index());
    }

    #[test]
    fn test_home_renders_exactly_once() {
        let controller = PageController::new();
        let mut recorder = Recorder::default();

        let instruction = controller.home(&());
        controller.render(&(), instruction, &mut recorder).unwrap();

        assert_eq!(recorder.calls, vec![(RenderMode::Full, index())]);
    }

    #[test]
    fn test_page_passes_id_through() {
        let controller = PageController::new();

        assert_eq!(controller.page(&params(&[("id", "42")])), page(Some("42")));
        assert_eq!(controller.page(&[("id", "about")]), page(Some("about")));
        assert_eq!(controller.page(&[("id", "")]), page(Some("")));
        assert_eq!(
            controller.page(&[("id", "../../etc/passwd")]),
            page(Some("../../etc/passwd"))
        );
    }

    #[test]
    fn test_page_with_absent_id() {
        let controller = PageController::new();
        let mut recorder = Recorder::default();

        let instruction = controller.page(&[("other", "1")]);
        assert!(instruction.context.contains_key("page"));
        assert_eq!(instruction.context.get("page"), None);

        controller.render(&(), instruction, &mut recorder).unwrap();

        assert_eq!(recorder.calls, vec![(RenderMode::Full, page(None))]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let controller = PageController::new();
        let request = BTreeMap::from([("id".to_owned(), "7".to_owned())]);

        assert_eq!(controller.page(&request), controller.page(&request));
        assert_eq!(controller.home(&request), controller.home(&request));
    }

    #[test]
    fn test_pjax_requests_render_fully_by_default() {
        let controller = PageController::new();
        let request = PjaxRequest("about");
        let mut recorder = Recorder::default();

        assert!(!controller.pjax_detection());
        assert_eq!(controller.render_mode(&request), RenderMode::Full);

        controller
            .render(&request, controller.page(&request), &mut recorder)
            .unwrap();

        assert_eq!(recorder.calls, vec![(RenderMode::Full, page(Some("about")))]);
    }

    #[test]
    fn test_pjax_detection() {
        let controller = PageController::new().with_pjax_detection(true);
        let mut recorder = Recorder::default();

        let request = PjaxRequest("about");
        controller
            .render(&request, controller.page(&request), &mut recorder)
            .unwrap();

        let request = params(&[("id", "about")]);
        controller
            .render(&request, controller.page(&request), &mut recorder)
            .unwrap();

        assert_eq!(
            recorder.calls,
            vec![
                (RenderMode::Partial, page(Some("about"))),
                (RenderMode::Full, page(Some("about"))),
            ]
        );
    }

    #[test]
    fn test_sink_errors_are_returned_untouched() {
        let controller = PageController::new().with_pjax_detection(true);

        assert_eq!(
            controller.render(&(), controller.home(&()), Failing),
            Err(Boom("index".to_owned()))
        );

        // The partial render falls back to the complete one.
        let request = PjaxRequest("1");
        assert_eq!(
            controller.render(&request, controller.page(&request), Failing),
            Err(Boom("page".to_owned()))
        );
    }
}
