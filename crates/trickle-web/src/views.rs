//! View types and static fragments.
//!
//! Askama templates only get already-drained data; the raw stream writes
//! the HTML fragments below verbatim.

use trickle_core::context::DrainedContext;

/// A page section heading plus the explanation shown under it.
pub struct PageIntro {
    pub title: &'static str,
    pub description: &'static str,
}

pub const BUFFERED_INTRO: PageIntro = PageIntro {
    title: "1) Buffered response",
    description: "The whole page is rendered before a single byte is sent. \
        The browser shows nothing until the slow computation has finished.",
};

pub const NAIVE_INTRO: PageIntro = PageIntro {
    title: "3) Streaming response around a compiled template",
    description: "The body is sent through the streaming mechanism, but the \
        template engine evaluates every variable, including the slow one, \
        before it returns. Nothing arrives until the computation is over.",
};

pub const NAVIGATION_MENU: &str = r#"<ol type="1">
        <li><a href="httpresponse">Problem: rendering delay with a buffered response</a></li>
        <li><a href="streaminghttpresponse">Render the page as a raw stream</a></li>
        <li><a href="naive">Try to add templates to the raw stream</a></li>
        <li><a href="jinja">Solution: stream the page through a lazy template engine</a></li>
        <li><a href="mystreamed_content">Stream a longer content page</a></li>
        </ol>"#;

pub const UNSTRUCTURED_TITLE: &str = "<h1>2) Streaming response without a template </h1>";

pub const UNSTRUCTURED_DESCRIPTION: &str = "<p>A streaming response sends the page to the \
    browser while it is still being produced.<br/>\
    The user sees each element as soon as it is processed.<br/>\
    Without a template the output has no structure, which limits this to specific \
    use cases such as producing big csv files.<br/>\
    Passing the context to the stream writes it raw, without formatting and without \
    the variables and loops a template would apply, like this: </p>";

/// Drained context as seen by askama templates.
pub struct ContextView {
    pub mylist: Vec<i32>,
    pub mystring: String,
    pub mylongresponse: Vec<String>,
}

impl From<DrainedContext> for ContextView {
    fn from(ctx: DrainedContext) -> Self {
        Self {
            mylist: ctx.mylist,
            mystring: ctx.mystring,
            mylongresponse: ctx.mylongresponse,
        }
    }
}
