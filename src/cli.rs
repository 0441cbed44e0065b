//! Command-line argument parsing
//!
//! Supports:
//! - Rendering built-in demos by name (all of them by default)
//! - Rendering YAML scripts
//! - Choosing output format and directory
//! - Overriding font, palette and initial capacity from the config file

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::AnimConfig;
use crate::demos;
use crate::output::OutputFormat;
use crate::script::Script;

/// Render gap buffer animations
#[derive(Parser, Debug)]
#[command(name = "gapvis", version, about = "Render gap buffer animations")]
pub struct CliArgs {
    /// Built-in demos to render (all when neither demos nor scripts are given)
    #[arg(value_name = "DEMO")]
    pub demos: Vec<String>,

    /// YAML script to render (repeatable)
    #[arg(short = 's', long = "script", value_name = "FILE")]
    pub scripts: Vec<PathBuf>,

    /// List built-in demos and exit
    #[arg(long)]
    pub list: bool,

    /// Directory for output files
    #[arg(short = 'o', long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Ppm)]
    pub format: OutputFormat,

    /// TrueType/OpenType font or PPM glyph sheet
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Palette id or YAML file
    #[arg(long)]
    pub palette: Option<String>,

    /// Override every script's initial buffer capacity
    #[arg(long, value_name = "N")]
    pub capacity: Option<usize>,
}

/// Where a script comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Demo(String),
    File(PathBuf),
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub sources: Vec<ScriptSource>,
    pub out_dir: PathBuf,
    pub format: OutputFormat,
    pub font: Option<PathBuf>,
    pub palette: Option<String>,
    pub capacity: Option<usize>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run plan, rejecting unknown demo names
    pub fn into_plan(self) -> Result<RunPlan, String> {
        if let Some(unknown) = self
            .demos
            .iter()
            .find(|name| !demos::DEMO_NAMES.contains(&name.as_str()))
        {
            return Err(format!(
                "Unknown demo '{}' (available: {})",
                unknown,
                demos::DEMO_NAMES.join(", ")
            ));
        }

        let mut sources: Vec<ScriptSource> =
            self.demos.into_iter().map(ScriptSource::Demo).collect();
        sources.extend(self.scripts.into_iter().map(ScriptSource::File));
        if sources.is_empty() {
            sources = demos::DEMO_NAMES
                .iter()
                .map(|name| ScriptSource::Demo(name.to_string()))
                .collect();
        }

        Ok(RunPlan {
            sources,
            out_dir: self.out_dir,
            format: self.format,
            font: self.font,
            palette: self.palette,
            capacity: self.capacity,
        })
    }
}

impl RunPlan {
    /// Apply CLI overrides on top of the file config
    pub fn apply_to(&self, config: &mut AnimConfig) {
        if let Some(font) = &self.font {
            config.font = Some(font.clone());
        }
        if let Some(palette) = &self.palette {
            config.palette = palette.clone();
        }
    }

    /// Resolve every source into a script, applying the capacity override
    pub fn load_scripts(&self) -> Result<Vec<Script>> {
        let mut scripts = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let mut script = match source {
                ScriptSource::Demo(name) => demos::by_name(name)
                    .ok_or_else(|| anyhow::anyhow!("unknown demo '{}'", name))?,
                ScriptSource::File(path) => Script::load(path)?,
            };
            if let Some(capacity) = self.capacity {
                script.capacity = capacity;
            }
            scripts.push(script);
        }
        Ok(scripts)
    }
}
