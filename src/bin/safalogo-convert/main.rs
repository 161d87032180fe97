use std::io::{self, Write};

use clap::crate_version;
use clap_complete::generate;

use safalogo::convert::Converter;
use safalogo::fallback::Thumbnailer;
use safalogo::preflight::{Installer, NoInstaller, PackageManager};
use safalogo::process::SystemRunner;
use safalogo::raster::ResvgRasterizer;

mod cli;
mod report;

fn main() {
    let args = cli::Args::parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit());

    if let Some(shell) = args.completion {
        let mut cmd = cli::build_cli();
        generate(shell, &mut cmd, "safalogo-convert", &mut io::stdout());
        return;
    }

    if args.version {
        println!("safalogo-convert version {}", crate_version!());
        return;
    }

    let runner = SystemRunner;
    let rasterizer = ResvgRasterizer::new();

    let installer: Box<dyn Installer + '_> = match args.package_manager {
        Some(ref program) => Box::new(PackageManager::new(program.as_str(), &runner)),
        None => Box::new(NoInstaller),
    };

    let mut converter = Converter::new(&rasterizer, &runner);
    if let Some(program) = args.thumbnailer {
        converter = converter.with_thumbnailer(Some(Thumbnailer::with_program(program)));
    }
    if args.no_fallback {
        converter = converter.without_fallback();
    }

    let run = safalogo::run(&rasterizer, installer.as_ref(), &args.packages, &converter);

    let mut stdout = io::stdout().lock();
    if let Err(e) = report::write_report(&mut stdout, &run).and_then(|_| stdout.flush()) {
        eprintln!("could not write report: {e}");
    }
    drop(stdout);

    std::process::exit(report::exit_code(&run));
}
