//! Making sure the rasterizer can be used before converting anything.
//!
//! [`ensure`] probes a [`Capability`].  If the probe fails it gives an
//! [`Installer`] one chance to fix the host, then probes again.  Nothing
//! here touches the input or output files.

use crate::error::PreflightError;
use crate::process::{CommandRunner, Invocation};
use crate::safalogo_log;

/// Something whose availability can be checked.
pub trait Capability {
    fn name(&self) -> &'static str;

    fn probe(&self) -> Result<(), PreflightError>;
}

/// Installs packages on the host.
///
/// Returns whether an install was attempted at all.  Failures are only
/// logged; the second probe decides the outcome.
pub trait Installer {
    fn install(&self, packages: &[String]) -> bool;
}

/// Does nothing.  Used when no package manager was configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInstaller;

impl Installer for NoInstaller {
    fn install(&self, _packages: &[String]) -> bool {
        false
    }
}

/// Runs `<program> install <package>...`.
pub struct PackageManager<'a, R: CommandRunner> {
    program: String,
    runner: &'a R,
}

impl<'a, R: CommandRunner> PackageManager<'a, R> {
    pub fn new(program: impl Into<String>, runner: &'a R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    pub fn invocation(&self, packages: &[String]) -> Invocation {
        Invocation::new(&self.program)
            .arg("install")
            .args(packages)
    }
}

impl<R: CommandRunner> Installer for PackageManager<'_, R> {
    fn install(&self, packages: &[String]) -> bool {
        if packages.is_empty() {
            safalogo_log!("no packages given for {}; not running it", self.program);
            return false;
        }

        let invocation = self.invocation(packages);
        safalogo_log!("running {}", invocation);

        match self.runner.run(&invocation) {
            Ok(exit) if exit.success() => safalogo_log!("{} finished", self.program),
            Ok(exit) => safalogo_log!("{} exited with {:?}; ignoring", self.program, exit.code),
            Err(e) => safalogo_log!("could not run {}: {}; ignoring", self.program, e),
        }

        true
    }
}

/// Result of the preflight phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Preflight {
    /// The capability worked on the first probe.
    Ready,

    /// The capability worked after an install attempt.
    Installed,

    /// The capability is still unusable.  `install_attempted` is false when
    /// no installer ran, e.g. without a package manager.
    Unavailable {
        reason: PreflightError,
        install_attempted: bool,
    },
}

pub fn ensure<C, I>(capability: &C, installer: &I, packages: &[String]) -> Preflight
where
    C: Capability + ?Sized,
    I: Installer + ?Sized,
{
    match capability.probe() {
        Ok(()) => return Preflight::Ready,
        Err(e) => safalogo_log!("{}", e),
    }

    let install_attempted = installer.install(packages);

    match capability.probe() {
        Ok(()) => Preflight::Installed,
        Err(reason) => Preflight::Unavailable {
            reason,
            install_attempted,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;

    use super::*;
    use crate::process::testing::FakeRunner;

    /// Fails until `installed` is set.
    struct Flaky<'a> {
        installed: &'a Cell<bool>,
    }

    impl Capability for Flaky<'_> {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn probe(&self) -> Result<(), PreflightError> {
            if self.installed.get() {
                Ok(())
            } else {
                Err(PreflightError::Probe {
                    capability: "flaky",
                    reason: String::from("not installed"),
                })
            }
        }
    }

    struct Fixes<'a> {
        installed: &'a Cell<bool>,
    }

    impl Installer for Fixes<'_> {
        fn install(&self, _packages: &[String]) -> bool {
            self.installed.set(true);
            true
        }
    }

    fn packages() -> Vec<String> {
        vec![String::from("resvg"), String::from("libpng")]
    }

    #[test]
    fn ready_capability_skips_installer() {
        let installed = Cell::new(true);
        let runner = FakeRunner::default();
        let pm = PackageManager::new("apt-get", &runner);

        assert_eq!(
            ensure(&Flaky { installed: &installed }, &pm, &packages()),
            Preflight::Ready
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn successful_install_is_reported() {
        let installed = Cell::new(false);
        let outcome = ensure(
            &Flaky {
                installed: &installed,
            },
            &Fixes {
                installed: &installed,
            },
            &packages(),
        );
        assert_eq!(outcome, Preflight::Installed);
    }

    #[test]
    fn package_manager_is_run_once_with_install_subcommand() {
        let installed = Cell::new(false);
        let runner = FakeRunner::exiting(&[0]);
        let pm = PackageManager::new("apt-get", &runner);

        let outcome = ensure(&Flaky { installed: &installed }, &pm, &packages());

        assert!(matches!(
            outcome,
            Preflight::Unavailable {
                install_attempted: true,
                ..
            }
        ));
        assert_eq!(
            runner.calls(),
            vec![Invocation::new("apt-get").args(["install", "resvg", "libpng"])]
        );
    }

    #[test]
    fn broken_package_manager_is_tolerated() {
        let installed = Cell::new(false);
        let runner = FakeRunner::default();
        runner.push(Err(io::Error::new(io::ErrorKind::NotFound, "gone")));
        let pm = PackageManager::new("brew", &runner);

        match ensure(&Flaky { installed: &installed }, &pm, &packages()) {
            Preflight::Unavailable { reason, .. } => {
                assert!(reason.to_string().contains("not installed"))
            }
            other => panic!("unexpected preflight outcome {other:?}"),
        }
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn no_installer_leaves_capability_unavailable() {
        let installed = Cell::new(false);
        let outcome = ensure(&Flaky { installed: &installed }, &NoInstaller, &[]);
        assert!(matches!(
            outcome,
            Preflight::Unavailable {
                install_attempted: false,
                ..
            }
        ));
    }

    #[test]
    fn package_manager_without_packages_is_not_run() {
        let installed = Cell::new(false);
        let runner = FakeRunner::exiting(&[0]);
        let pm = PackageManager::new("pip", &runner);

        let outcome = ensure(&Flaky { installed: &installed }, &pm, &[]);

        assert!(runner.calls().is_empty());
        assert!(matches!(
            outcome,
            Preflight::Unavailable {
                install_attempted: false,
                ..
            }
        ));
    }

    #[test]
    fn install_names_every_package() {
        let runner = FakeRunner::default();
        let pm = PackageManager::new("brew", &runner);
        assert_eq!(
            pm.invocation(&packages()),
            Invocation::new("brew").args(["install", "resvg", "libpng"])
        );
    }
}
