use crate::{
    foundation::error::{SlideError, SlideResult},
    render::context::RenderContext,
    show::loader::Command,
};

/// Default upper bound on registered verbs.
pub const DEFAULT_TABLE_CAPACITY: usize = 64;

/// Handler signature: mutate the show context according to one command.
pub type HandlerFn = dyn Fn(&mut RenderContext, &Command) -> SlideResult<()>;

/// One verb in the [`FunctionTable`].
pub struct Registration {
    name: String,
    run_once: bool,
    handler: Box<HandlerFn>,
}

impl Registration {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run-once verbs execute only in the run-once pass and are skipped per slide.
    pub fn run_once(&self) -> bool {
        self.run_once
    }

    pub fn call(&self, ctx: &mut RenderContext, cmd: &Command) -> SlideResult<()> {
        (self.handler)(ctx, cmd)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("run_once", &self.run_once)
            .finish_non_exhaustive()
    }
}

/// Verb name -> handler mapping, built once before interpretation.
///
/// Lookup is a linear scan; the table holds tens of entries. Duplicate names are
/// rejected at registration, so the first match is the only match.
#[derive(Debug)]
pub struct FunctionTable {
    entries: Vec<Registration>,
    capacity: usize,
    sealed: bool,
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TABLE_CAPACITY)
    }
}

impl FunctionTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            sealed: false,
        }
    }

    pub fn register<F>(&mut self, name: &str, run_once: bool, handler: F) -> SlideResult<()>
    where
        F: Fn(&mut RenderContext, &Command) -> SlideResult<()> + 'static,
    {
        if self.sealed {
            return Err(SlideError::dispatch(format!(
                "cannot register '{name}': interpretation has begun"
            )));
        }
        if self.entries.len() >= self.capacity {
            return Err(SlideError::dispatch(format!(
                "cannot register '{name}': table full ({} entries)",
                self.capacity
            )));
        }
        if self.lookup(name).is_some() {
            return Err(SlideError::dispatch(format!(
                "cannot register '{name}': already registered"
            )));
        }

        self.entries.push(Registration {
            name: name.to_owned(),
            run_once,
            handler: Box::new(handler),
        });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Registration> {
        self.entries.iter().find(|r| r.name == name)
    }

    /// Freeze the table. Called by the interpreter before the first pass.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.name.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/show/dispatch.rs"]
mod tests;
