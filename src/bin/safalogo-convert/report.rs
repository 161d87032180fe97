// console report and exit codes for safalogo-convert

use std::io::{self, Write};

use safalogo::convert::{Outcome, INPUT_PATH, OUTPUT_PATH};
use safalogo::preflight::Preflight;
use safalogo::Run;

pub const EXIT_PRIMARY: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
// clap exits with 2 on usage errors
pub const EXIT_FALLBACK: i32 = 4;
pub const EXIT_ABORTED: i32 = 3;

pub fn exit_code(run: &Run) -> i32 {
    match run {
        Run::Aborted { .. } => EXIT_ABORTED,
        Run::Converted { outcome, .. } => match outcome {
            Outcome::PrimaryOk(_) => EXIT_PRIMARY,
            Outcome::FallbackOk { .. } => EXIT_FALLBACK,
            Outcome::Failed { .. } => EXIT_FAILED,
        },
    }
}

pub fn write_report<W: Write>(w: &mut W, run: &Run) -> io::Result<()> {
    match run {
        Run::Aborted {
            reason,
            install_attempted: true,
        } => {
            writeln!(w, "❌ Could not install the SVG rasterizer: {reason}")?;
        }

        Run::Aborted {
            reason,
            install_attempted: false,
        } => {
            writeln!(w, "❌ SVG rasterizer is not usable: {reason}")?;
            writeln!(w, "   Use --package-manager and --package to install it.")?;
        }

        Run::Converted { preflight, outcome } => {
            match preflight {
                Preflight::Installed => writeln!(w, "📦 Installed the SVG rasterizer")?,
                _ => writeln!(w, "🔍 SVG rasterizer is available")?,
            }

            match outcome {
                Outcome::PrimaryOk(report) => {
                    writeln!(
                        w,
                        "✅ Converted {} to {}",
                        INPUT_PATH,
                        report.path.display()
                    )?;
                    writeln!(w, "   Dimensions: {} x {} px", report.width, report.height)?;
                    writeln!(w, "   File size: {:.1} KB", report.kilobytes())?;
                }

                Outcome::FallbackOk { primary_error } => {
                    writeln!(w, "⚠️  Conversion failed: {primary_error}")?;
                    writeln!(w, "🔄 Converted with the system thumbnailer instead")?;
                }

                Outcome::Failed {
                    primary_error,
                    fallback_error,
                } => {
                    writeln!(w, "⚠️  Conversion failed: {primary_error}")?;
                    writeln!(w, "❌ Fallback failed: {fallback_error}")?;
                    writeln!(
                        w,
                        "   Please convert {INPUT_PATH} to {OUTPUT_PATH} manually."
                    )?;
                }
            }
        }
    }

    writeln!(w, "outcome: {}", run.tag())
}
