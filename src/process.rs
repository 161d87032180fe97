//! Running external programs.
//!
//! Package managers and thumbnailers are run through [`CommandRunner`] so
//! that tests can see exactly which programs would be started.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::process::Command;

/// A program and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new<P: Into<OsString>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<A: Into<OsString>>(mut self, arg: A) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a finished program exited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exit {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl Exit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    /// Runs the program to completion, inheriting stdio.
    fn run(&self, invocation: &Invocation) -> io::Result<Exit>;
}

/// Runs programs on the host with [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Exit> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()?;

        Ok(Exit {
            code: status.code(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Records invocations and replays canned results.
    #[derive(Default)]
    pub struct FakeRunner {
        pub calls: RefCell<Vec<Invocation>>,
        results: RefCell<VecDeque<io::Result<Exit>>>,
    }

    impl FakeRunner {
        pub fn exiting(codes: &[i32]) -> Self {
            let runner = Self::default();
            for &code in codes {
                runner.push(Ok(Exit { code: Some(code) }));
            }
            runner
        }

        pub fn push(&self, result: io::Result<Exit>) {
            self.results.borrow_mut().push_back(result);
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, invocation: &Invocation) -> io::Result<Exit> {
            self.calls.borrow_mut().push(invocation.clone());
            self.results
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::NotFound, "no such program")))
        }
    }
}
