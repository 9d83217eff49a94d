//! Lazy template rendering with minijinja.
//!
//! Unlike askama, which evaluates a whole template into a `String`,
//! minijinja writes output to an `io::Write` as it walks the template
//! and can loop over a one-shot iterator without collecting it first.
//! Static text before the first lazy value reaches the client
//! immediately; each progress line follows as soon as it is produced.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::{Environment, Value, context, path_loader};
use tracing::debug;
use trickle_core::SampleContext;
use trickle_stream::{ChunkStream, spawn_producer};

/// File-based minijinja environment rooted at a template directory.
pub struct JinjaRenderer {
    dir: PathBuf,
    env: Arc<Environment<'static>>,
}

impl JinjaRenderer {
    pub fn new(dir: impl Into<PathBuf>, trim_blocks: bool) -> Self {
        let dir = dir.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(&dir));
        env.set_trim_blocks(trim_blocks);
        Self {
            dir,
            env: Arc::new(env),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and compile `name` without rendering it.
    pub fn check(&self, name: &str) -> Result<(), minijinja::Error> {
        self.env.get_template(name).map(|_| ())
    }

    /// Render `name` against `context` into a stream of chunks.
    ///
    /// The template is resolved up front so a missing or broken template
    /// fails the request before any bytes are sent. Rendering itself runs
    /// on the blocking pool.
    pub fn generate(
        &self,
        name: &'static str,
        context: SampleContext,
    ) -> Result<ChunkStream, minijinja::Error> {
        self.check(name)?;
        debug!(template = name, dir = %self.dir.display(), "streaming template");

        let env = Arc::clone(&self.env);
        Ok(spawn_producer(name, move |writer| {
            let template = env.get_template(name)?;
            template.render_to_write(context_value(context), writer)?;
            Ok::<(), minijinja::Error>(())
        }))
    }
}

/// Expose a [`SampleContext`] to templates, keeping the progress lazy.
fn context_value(ctx: SampleContext) -> Value {
    context! {
        mylist => ctx.mylist,
        mystring => ctx.mystring,
        mylongresponse => Value::make_one_shot_iterator(ctx.mylongresponse),
    }
}
