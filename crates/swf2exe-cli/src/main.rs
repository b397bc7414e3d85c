//! swf2exe
//!
//! Appends an SWF movie to a Flash projector stub, producing a standalone
//! executable:
//!
//! ```text
//! swf2exe <windows|linux> <swf> <out_exe> <projector>
//! ```

mod cli;
mod logging;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use cli::{Invocation, Request};
use output::StyledOutput;

fn main() -> ExitCode {
    logging::init();
    let mut out = StyledOutput::new(output::resolve_color_choice());

    match cli::parse(std::env::args_os()) {
        Invocation::Usage { program } => {
            out.plain(&cli::usage(&program));
            ExitCode::SUCCESS
        }
        Invocation::Assemble(request) => match run(&request) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                out.error(&e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(request: &Request) -> anyhow::Result<()> {
    swf2exe_bundle::assemble(
        request.variant,
        &request.bundle,
        &request.output,
        &request.stub,
    )
    .with_context(|| {
        format!(
            "could not build {} projector {}",
            request.variant,
            request.output.display()
        )
    })?;
    Ok(())
}
