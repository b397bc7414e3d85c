//! Argument parsing.
//!
//! The command line is exactly four positionals. Every argument after the
//! program name is taken verbatim, so paths may start with `-` and a
//! leading `--` is just an unknown variant. Anything clap rejects, including
//! a missing argument or a variant other than `windows`/`linux`, sends the
//! caller to the usage text instead of an error.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use swf2exe_bundle::Variant;

#[derive(Parser, Debug)]
#[command(name = "swf2exe")]
#[command(about = "Build a standalone projector executable from an SWF movie", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Output layout: windows or linux
    variant: Variant,
    /// Movie to embed
    swf: PathBuf,
    /// Executable to write
    out_exe: PathBuf,
    /// Player stub the movie is appended to
    projector: PathBuf,
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    extra: Vec<OsString>,
}

/// One assembly job taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub variant: Variant,
    pub bundle: PathBuf,
    pub output: PathBuf,
    pub stub: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Assemble(Request),
    /// Print the usage text, naming the program as it was invoked
    Usage { program: String },
}

pub fn parse<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::<OsString>::into);
    let program = args.next().unwrap_or_else(|| OsString::from("swf2exe"));

    // The escape stops clap from reading any user argument as a flag.
    let argv = [program.clone(), OsString::from("--")].into_iter().chain(args);
    let program = program.to_string_lossy().into_owned();

    match Args::try_parse_from(argv) {
        Ok(parsed) => {
            if !parsed.extra.is_empty() {
                tracing::debug!(ignored = ?parsed.extra, "ignoring trailing arguments");
            }
            Invocation::Assemble(Request {
                variant: parsed.variant,
                bundle: parsed.swf,
                output: parsed.out_exe,
                stub: parsed.projector,
            })
        }
        Err(e) => {
            tracing::debug!(kind = ?e.kind(), "arguments rejected");
            Invocation::Usage { program }
        }
    }
}

pub fn usage(program: &str) -> String {
    format!("Usage:\n{program} <windows|linux> <swf> <out_exe> <projector>\n")
}
