//! gapvis - renders scripted gap buffer sessions to image files
//!
//! Usage:
//!   gapvis                                  # all demos → ./<name>.ppm
//!   gapvis intro --font mono.ttf -f png     # ./intro/intro-00000.png ...
//!   gapvis --script session.yaml -f text    # ./<name>.txt transcript
//!
//! PPM streams can be turned into video with
//!   ffmpeg -framerate 10 -f image2pipe -i intro.ppm intro.mp4

use anyhow::Result;
use clap::Parser;

use gapvis::cli::CliArgs;
use gapvis::config::AnimConfig;
use gapvis::demos;
use gapvis::output::render_script;
use gapvis::theme::{load_palette, Palette};
use gapvis::view::Renderer;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    if args.list {
        for script in demos::all() {
            println!("{:<14} {:>4} frames", script.name, script.frame_count());
        }
        return Ok(());
    }

    gapvis::tracing::init();

    let plan = args.into_plan().map_err(anyhow::Error::msg)?;
    let mut config = AnimConfig::load();
    plan.apply_to(&mut config);

    let palette = load_palette(&config.palette).unwrap_or_else(|e| {
        tracing::warn!("Failed to load palette '{}': {}, using default", config.palette, e);
        Palette::default()
    });
    let mut renderer = Renderer::from_config(&config, palette)?;
    let scripts = plan.load_scripts()?;

    eprintln!(
        "Rendering {} script(s) → {}",
        scripts.len(),
        plan.out_dir.display()
    );

    for script in &scripts {
        eprint!("  {} ...", script.name);
        let (path, stats) = render_script(script, plan.format, &mut renderer, &plan.out_dir)?;
        eprintln!(
            " {} frames, capacity {} → {}",
            stats.frames,
            stats.capacity,
            path.display()
        );
    }

    eprintln!("Done!");
    Ok(())
}
