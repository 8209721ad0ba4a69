//! Render contexts and instructions.

use std::{borrow::Cow, collections::BTreeMap, fmt::Display};

/// The values handed to a template for a single render.
///
/// A key may be present with an absent value: this is how a missing request parameter reaches
/// the template, which then decides what to make of it.
///
/// Keys are kept sorted so that two contexts built from the same inputs compare and display the
/// same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext(BTreeMap<Cow<'static, str>, Option<String>>);

impl RenderContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value to the context, replacing any previous value for the same key.
    pub fn with(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: Option<impl Into<String>>,
    ) -> Self {
        self.0.insert(key.into(), value.map(Into::into));
        self
    }

    /// Get the value for a key.
    ///
    /// Returns `None` both when the key is missing and when its value is absent. Use
    /// [`RenderContext::contains_key`] to tell the two apart.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Option::as_deref)
    }

    /// Check whether a key was set, even to an absent value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over the entries, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_deref()))
    }

    /// The number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the context holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;

        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            match value {
                Some(value) => write!(f, "{key}: {value:?}")?,
                None => write!(f, "{key}: <absent>")?,
            }
        }

        write!(f, "}}")
    }
}

/// How a render instruction should be rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// The complete page, layout included.
    #[default]
    Full,

    /// Only the part of the page that changes between navigations.
    Partial,
}

/// A template name paired with the context to render it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstruction {
    /// The template name.
    pub template: Cow<'static, str>,

    /// The context.
    pub context: RenderContext,
}

impl RenderInstruction {
    /// Create a new render instruction.
    pub fn new(template: impl Into<Cow<'static, str>>, context: RenderContext) -> Self {
        Self {
            template: template.into(),
            context,
        }
    }
}

impl Display for RenderInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` with {}", self.template, self.context)
    }
}
