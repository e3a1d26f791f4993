use clap::{Parser, Subcommand};
use spotkit_cli::commands::{
    cmd_add, cmd_clear, cmd_init, cmd_list, cmd_mask, cmd_preset_apply, cmd_preset_list,
    cmd_preset_save, cmd_remove,
};
use spotkit_cli::{parse_pipe_size, parse_point, parse_size, parse_unit, AddSpotArgs, MaskTarget};
use spotkit_core::config::{config_handle_with, log_config_usage, set_verbose};
use spotkit_core::{PipeSize, SpotPoint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spotkit")]
#[command(version, about = "Inspect and edit persisted spot lists", long_about = None)]
struct Cli {
    /// Print diagnostic output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (overrides the default search path)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the spots stored in a settings file
    List {
        /// Settings file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pipe size to show values at (level 0-4 or ratio like 1:4)
        #[arg(long, value_name = "N", value_parser = parse_pipe_size)]
        pipe_size: Option<PipeSize>,

        /// Spot list prefix ("Local" reads the "LocalSpot" list)
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },

    /// Append a spot to a settings file
    Add {
        /// Settings file (created if missing)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Center x
        #[arg(long)]
        x: u32,

        /// Center y
        #[arg(long)]
        y: u32,

        /// Horizontal core radius
        #[arg(long, value_name = "PX")]
        radius_w: Option<u32>,

        /// Vertical core radius (defaults to the horizontal one)
        #[arg(long, value_name = "PX")]
        radius_h: Option<u32>,

        /// Rotation in degrees, clockwise
        #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
        angle: Option<f32>,

        /// Width of the feathered band
        #[arg(long, value_name = "PX")]
        edge_radius: Option<u32>,

        /// Feather shape, 0.0 = linear, 1.0 = smooth
        #[arg(long, value_name = "FLOAT", value_parser = parse_unit)]
        edge_blur: Option<f32>,

        /// Opacity (0.0-1.0)
        #[arg(long, value_name = "FLOAT", value_parser = parse_unit)]
        opacity: Option<f32>,

        /// Pipe size the position and lengths are given at
        #[arg(long, value_name = "N", value_parser = parse_pipe_size)]
        pipe_size: Option<PipeSize>,

        /// Add a tuning spot with the configured tuning defaults
        #[arg(long, conflicts_with = "repair_from")]
        tuning: bool,

        /// Add a repair spot copying from this source point
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        repair_from: Option<SpotPoint>,

        /// Store the spot disabled
        #[arg(long)]
        disabled: bool,

        /// Spot list prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },

    /// Remove the spot at an index
    Remove {
        /// Settings file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Spot index (as shown by `list`)
        #[arg(value_name = "INDEX")]
        index: usize,

        /// Spot list prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },

    /// Remove all spots of a list
    Clear {
        /// Settings file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Spot list prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },

    /// Export a weight mask as 16-bit grayscale PNG
    Mask {
        /// Settings file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Spot index; omit together with --size for a composite of all spots
        #[arg(value_name = "INDEX", required_unless_present = "size")]
        index: Option<usize>,

        /// Output PNG
        #[arg(short, long, value_name = "PNG")]
        out: PathBuf,

        /// Image size for a composite mask (WxH)
        #[arg(long, value_name = "WxH", value_parser = parse_size, conflicts_with = "index")]
        size: Option<(usize, usize)>,

        /// Pipe size to render at
        #[arg(long, value_name = "N", value_parser = parse_pipe_size)]
        pipe_size: Option<PipeSize>,

        /// Spot list prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },

    /// Write a default config to ~/spotkit/
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Manage tuning presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List available presets
    List {
        /// Directory to list presets from
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Save the tuning values of a spot as a preset
    Save {
        /// Settings file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Index of a tuning spot
        #[arg(value_name = "INDEX")]
        index: usize,

        /// Preset name
        #[arg(short, long)]
        name: String,

        /// Presets directory
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Spot list prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },

    /// Apply a preset to a tuning spot
    Apply {
        /// Settings file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Index of a tuning spot
        #[arg(value_name = "INDEX")]
        index: usize,

        /// Preset name or file path
        #[arg(value_name = "PRESET")]
        preset: String,

        /// Presets directory
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Spot list prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    set_verbose(cli.verbose);
    let config = &config_handle_with(cli.config.as_deref()).config;
    log_config_usage();

    let result = match cli.command {
        Commands::List {
            file,
            pipe_size,
            prefix,
        } => cmd_list(&file, pipe_size, prefix.as_deref(), config),

        Commands::Add {
            file,
            x,
            y,
            radius_w,
            radius_h,
            angle,
            edge_radius,
            edge_blur,
            opacity,
            pipe_size,
            tuning,
            repair_from,
            disabled,
            prefix,
        } => {
            let args = AddSpotArgs {
                x,
                y,
                radius_w,
                radius_h,
                angle,
                edge_radius,
                edge_blur,
                opacity,
                pipe_size,
                tuning,
                repair_from,
                disabled,
            };
            cmd_add(&file, &args, prefix.as_deref(), config)
        }

        Commands::Remove {
            file,
            index,
            prefix,
        } => cmd_remove(&file, index, prefix.as_deref(), config),

        Commands::Clear { file, prefix } => cmd_clear(&file, prefix.as_deref(), config),

        Commands::Mask {
            file,
            index,
            out,
            size,
            pipe_size,
            prefix,
        } => {
            let target = match (index, size) {
                (Some(index), _) => Ok(MaskTarget::Spot(index)),
                (None, Some((width, height))) => Ok(MaskTarget::Composite { width, height }),
                (None, None) => Err("Either INDEX or --size is required".to_string()),
            };
            target.and_then(|target| {
                cmd_mask(&file, target, &out, pipe_size, prefix.as_deref(), config)
            })
        }

        Commands::Init { force } => cmd_init(force),

        Commands::Preset { action } => match action {
            PresetAction::List { dir } => cmd_preset_list(dir),
            PresetAction::Save {
                file,
                index,
                name,
                dir,
                prefix,
            } => cmd_preset_save(&file, index, &name, dir, prefix.as_deref(), config),
            PresetAction::Apply {
                file,
                index,
                preset,
                dir,
                prefix,
            } => cmd_preset_apply(&file, index, &preset, dir, prefix.as_deref(), config),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
