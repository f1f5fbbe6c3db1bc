use crate::{
    foundation::error::{SlideError, SlideResult},
    render::context::{Phase, RenderContext},
    show::{dispatch::FunctionTable, handlers::NEWSLIDE, loader::Command},
};

/// A recoverable error raised by one command.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub verb: String,
    /// `None` during the run-once pass.
    pub slide: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slide {
            Some(s) => write!(
                f,
                "slide {s}, line {}: {}: {}",
                self.line, self.verb, self.message
            ),
            None => write!(f, "line {}: {}: {}", self.line, self.verb, self.message),
        }
    }
}

/// Interpreter progress through the show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpState {
    /// No slide is being executed.
    Idle,
    /// Executing the commands of this slide.
    InSlide(usize),
    /// Every slide has been rendered.
    Done,
}

/// Walks a command list in two passes: run-once registration, then one pass per slide.
///
/// Run-once handlers only register global assets, so skipping them on the per-slide
/// passes leaves the show state unchanged.
#[derive(Debug)]
pub struct Interpreter {
    table: FunctionTable,
    state: InterpState,
    slide_count: Option<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Interpreter {
    pub fn new(mut table: FunctionTable) -> Self {
        table.seal();
        Self {
            table,
            state: InterpState::Idle,
            slide_count: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> InterpState {
        self.state
    }

    pub fn table(&self) -> &FunctionTable {
        &self.table
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Number of slides: one per `newslide` verb.
    pub fn count_slides(commands: &[Command]) -> usize {
        commands.iter().filter(|c| c.verb() == NEWSLIDE).count()
    }

    /// Execute every run-once command over the whole list. Returns the slide count.
    ///
    /// Unknown verbs are reported here only when the show has no slides; otherwise
    /// the per-slide pass reports them.
    #[tracing::instrument(skip_all, fields(commands = commands.len()))]
    pub fn run_once_pass(&mut self, commands: &[Command], ctx: &mut RenderContext) -> usize {
        let n = Self::count_slides(commands);
        ctx.set_phase(Phase::RunOnce);
        for cmd in commands {
            let Some(reg) = self.table.lookup(cmd.verb()) else {
                if n == 0 {
                    let err = SlideError::command(format!("unknown verb '{}'", cmd.verb()));
                    report(&mut self.diagnostics, cmd, None, &err);
                }
                continue;
            };
            if !reg.run_once() {
                continue;
            }
            if let Err(err) = reg.call(ctx, cmd) {
                report(&mut self.diagnostics, cmd, None, &err);
            }
        }
        ctx.set_phase(Phase::Slide);

        self.slide_count = Some(n);
        self.state = if n == 0 {
            InterpState::Done
        } else {
            InterpState::Idle
        };
        tracing::debug!(slides = n, "run-once pass complete");
        n
    }

    /// Execute slide `index` and flatten it into the context's composite buffer.
    ///
    /// Commands before the first `newslide` run at the start of slide 0.
    #[tracing::instrument(skip(self, commands, ctx))]
    pub fn render_slide(
        &mut self,
        commands: &[Command],
        ctx: &mut RenderContext,
        index: usize,
    ) -> SlideResult<()> {
        let count = self.slide_count.ok_or_else(|| {
            SlideError::dispatch("render_slide called before the run-once pass")
        })?;

        let mut boundaries = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.verb() == NEWSLIDE)
            .map(|(i, _)| i);
        let start = boundaries
            .nth(index)
            .ok_or_else(|| SlideError::command(format!("slide {index} out of range ({count})")))?;
        let end = boundaries.next().unwrap_or(commands.len());

        self.state = InterpState::InSlide(index);
        ctx.set_phase(Phase::Slide);
        ctx.begin_slide(index);

        if index == 0 {
            self.exec_all(&commands[..start], ctx, index);
        }
        self.exec_all(&commands[start + 1..end], ctx, index);

        ctx.finish_slide();
        self.state = if index + 1 >= count {
            InterpState::Done
        } else {
            InterpState::Idle
        };
        Ok(())
    }

    /// Run both passes, handing each finished slide to `sink`.
    ///
    /// Only an error from `sink` stops the show; command errors are collected.
    pub fn render_show<F>(
        &mut self,
        commands: &[Command],
        ctx: &mut RenderContext,
        mut sink: F,
    ) -> SlideResult<usize>
    where
        F: FnMut(&RenderContext, usize) -> SlideResult<()>,
    {
        let n = self.run_once_pass(commands, ctx);
        for i in 0..n {
            self.render_slide(commands, ctx, i)?;
            sink(ctx, i)?;
        }
        self.state = InterpState::Done;
        Ok(n)
    }

    fn exec_all(&mut self, commands: &[Command], ctx: &mut RenderContext, slide: usize) {
        for cmd in commands {
            let Some(reg) = self.table.lookup(cmd.verb()) else {
                let err = SlideError::command(format!("unknown verb '{}'", cmd.verb()));
                report(&mut self.diagnostics, cmd, Some(slide), &err);
                continue;
            };
            if reg.run_once() {
                continue;
            }
            if let Err(err) = reg.call(ctx, cmd) {
                report(&mut self.diagnostics, cmd, Some(slide), &err);
            }
        }
    }
}

fn report(out: &mut Vec<Diagnostic>, cmd: &Command, slide: Option<usize>, err: &SlideError) {
    let d = Diagnostic {
        line: cmd.line(),
        verb: cmd.verb().to_owned(),
        slide,
        message: err.to_string(),
    };
    tracing::warn!("{d}");
    out.push(d);
}

#[cfg(test)]
#[path = "../../tests/unit/render/interp.rs"]
mod tests;
