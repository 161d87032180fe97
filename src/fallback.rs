//! Fallback rendering with the operating system's thumbnailer.

use std::ffi::OsString;
use std::path::Path;

use crate::convert::output_dir;
use crate::error::FallbackError;
use crate::process::{CommandRunner, Invocation};
use crate::safalogo_log;

/// How a thumbnailer expects its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgStyle {
    /// `qlmanage -t -s SIZE -o OUTDIR INPUT`
    QuickLook,

    /// `gdk-pixbuf-thumbnailer -s SIZE INPUT OUTPUT`
    Freedesktop,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnailer {
    pub program: OsString,
    pub style: ArgStyle,
}

impl Thumbnailer {
    /// Size requested from the thumbnailer, in pixels.
    pub const SIZE: u32 = 1800;

    /// The thumbnailer that ships with this platform, if any.
    pub fn native() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self {
                program: OsString::from("qlmanage"),
                style: ArgStyle::QuickLook,
            })
        } else if cfg!(unix) {
            Some(Self {
                program: OsString::from("gdk-pixbuf-thumbnailer"),
                style: ArgStyle::Freedesktop,
            })
        } else {
            None
        }
    }

    /// Same argument layout as the native one, different program.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        let style = Self::native()
            .map(|t| t.style)
            .unwrap_or(ArgStyle::QuickLook);

        Self {
            program: program.into(),
            style,
        }
    }

    pub fn invocation(&self, input: &Path, output: &Path) -> Invocation {
        let size = Self::SIZE.to_string();
        let inv = Invocation::new(self.program.clone());

        match self.style {
            ArgStyle::QuickLook => {
                inv.args(["-t", "-s", size.as_str(), "-o"])
                    .arg(output_dir(output))
                    .arg(input)
            }

            ArgStyle::Freedesktop => inv.args(["-s", size.as_str()]).arg(input).arg(output),
        }
    }

    /// Runs the thumbnailer once.
    pub fn run<R: CommandRunner>(
        &self,
        runner: &R,
        input: &Path,
        output: &Path,
    ) -> Result<(), FallbackError> {
        let invocation = self.invocation(input, output);
        safalogo_log!("running {}", invocation);

        let exit = runner
            .run(&invocation)
            .map_err(|source| FallbackError::Spawn {
                program: invocation.program_name(),
                source,
            })?;

        if exit.success() {
            Ok(())
        } else {
            Err(FallbackError::Exited {
                program: invocation.program_name(),
                code: exit.code,
            })
        }
    }
}
