use std::env::args;
use std::error::Error;

use lighthouse_swt::{detect_strokes, render_widths, Polarity, PreprocessParams, SwtParams};

const USAGE: &str = "usage: lighthouse-swt <source> <dest> [--light-on-dark]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = args().skip(1); // Ignore executable name.
    let source = args.next().ok_or(USAGE)?;
    let dest = args.next().ok_or(USAGE)?;
    let mut params = SwtParams::default();
    for arg in args {
        match arg.as_str() {
            "--light-on-dark" => params.polarity = Polarity::LightOnDark,
            "--dark-on-light" => params.polarity = Polarity::DarkOnLight,
            _ => return Err(format!("unexpected argument {arg}\n{USAGE}").into()),
        }
    }

    log::info!("Reading {}", source);
    let image = image::open(&source)?;

    log::info!("Computing stroke widths ({:?})", params.polarity);
    let output = detect_strokes(&image, &PreprocessParams::default(), &params)?;
    log::info!(
        "{} rays, {} pixels with a stroke width",
        output.rays.len(),
        output.widths.set_count()
    );

    log::info!("Writing {}", dest);
    render_widths(&output.widths).save(&dest)?;
    Ok(())
}
