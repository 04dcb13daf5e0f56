use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use archrender_client::ApiClient;
use clap::{Args, Parser, Subcommand};

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "archrender", version, about = "Sketch-to-render pipeline client")]
struct Cli {
    /// Backend base URL, including any /api prefix the deployment uses.
    #[arg(
        long,
        global = true,
        env = "ARCHRENDER_API_URL",
        default_value = "http://localhost:5000/api"
    )]
    base_url: String,

    /// Total request timeout in seconds (renders can take minutes).
    #[arg(long, global = true, env = "ARCHRENDER_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a sketch and print the detected attributes.
    Analyze {
        sketch: PathBuf,
        /// Print the raw analysis JSON instead of the card.
        #[arg(long)]
        json: bool,
    },

    /// Full pipeline: analyze, apply form overrides, translate, render.
    Run {
        sketch: PathBuf,
        /// Where to write the rendered image.
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        form: FormArgs,
        #[command(flatten)]
        reference: ReferenceArgs,
    },

    /// Render without analysis: the form comes entirely from the flags.
    Render {
        sketch: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        form: FormArgs,
        #[command(flatten)]
        reference: ReferenceArgs,
    },

    /// Browse or fetch the style-reference library.
    References {
        #[command(subcommand)]
        command: ReferencesCommand,
    },

    /// Urban-planning render from a site plan and lot map.
    Plan {
        site_plan: PathBuf,
        lot_map: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Lot description as `<number>:<description>`; repeatable.
        #[arg(long = "lot", required = true)]
        lots: Vec<String>,
        #[arg(long, default_value = "drone_45deg")]
        camera_angle: String,
        #[arg(long, default_value = "golden_hour")]
        time_of_day: String,
        #[arg(long, default_value = "16:9")]
        aspect_ratio: String,
        #[arg(long, default_value = "")]
        style_keywords: String,
    },

    /// Upscale a rendered image (2x or 4x).
    Upscale {
        image: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 2)]
        scale: u8,
        /// Only print the cost estimate, without upscaling.
        #[arg(long)]
        estimate_only: bool,
    },

    /// Backend health and feature flags.
    Health,
}

#[derive(Subcommand)]
enum ReferencesCommand {
    /// List categories, or the images within one category.
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Download a library image by id.
    Download {
        id: String,
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Manual form fields; each one overrides what analysis pre-filled.
#[derive(Args, Default)]
struct FormArgs {
    /// Free-text description of the desired result.
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    style_keywords: Option<String>,

    #[arg(long)]
    negative_prompt: Option<String>,

    /// Sketch adherence weight, 0.5 (flexible) to 1.0 (pixel-perfect).
    #[arg(long)]
    adherence: Option<f32>,

    #[arg(long)]
    aspect_ratio: Option<String>,

    #[arg(long)]
    viewpoint: Option<String>,

    #[arg(long)]
    floors: Option<String>,
}

impl FormArgs {
    /// Apply the overrides to the live form. Returns whether anything
    /// changed, so callers know a re-translate is due.
    fn apply(&self, form: &mut archrender_core::FormPayload) -> bool {
        let mut changed = false;
        if let Some(description) = &self.description {
            form.description.clone_from(description);
            changed = true;
        }
        if let Some(style_keywords) = &self.style_keywords {
            form.style_keywords.clone_from(style_keywords);
            changed = true;
        }
        if let Some(negative_prompt) = &self.negative_prompt {
            form.negative_prompt.clone_from(negative_prompt);
            changed = true;
        }
        if let Some(adherence) = self.adherence {
            form.set_sketch_adherence(adherence);
            changed = true;
        }
        if let Some(aspect_ratio) = &self.aspect_ratio {
            form.aspect_ratio.clone_from(aspect_ratio);
            changed = true;
        }
        if let Some(viewpoint) = &self.viewpoint {
            form.viewpoint.clone_from(viewpoint);
            changed = true;
        }
        if let Some(floors) = &self.floors {
            form.floor_count = Some(floors.clone());
            changed = true;
        }
        changed
    }
}

#[derive(Args, Default)]
struct ReferenceArgs {
    /// Local image to use as style reference.
    #[arg(long, conflicts_with = "reference_id")]
    reference: Option<PathBuf>,

    /// Library image id to use as style reference.
    #[arg(long)]
    reference_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("archrender v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    let client = ApiClient::with_timeout(
        cli.base_url.clone(),
        Duration::from_secs(cli.timeout_secs),
    )
    .context("building API client")?;

    match cli.command {
        Command::Analyze { sketch, json } => commands::analyze(client, &sketch, json).await,
        Command::Run {
            sketch,
            output,
            form,
            reference,
        } => commands::render(client, &sketch, &output, form, reference, true).await,
        Command::Render {
            sketch,
            output,
            form,
            reference,
        } => commands::render(client, &sketch, &output, form, reference, false).await,
        Command::References { command } => match command {
            ReferencesCommand::List { category } => {
                commands::list_references(client, category.as_deref()).await
            }
            ReferencesCommand::Download { id, output } => {
                commands::download_reference(client, &id, &output).await
            }
        },
        Command::Plan {
            site_plan,
            lot_map,
            output,
            lots,
            camera_angle,
            time_of_day,
            aspect_ratio,
            style_keywords,
        } => {
            commands::plan(
                client,
                &site_plan,
                &lot_map,
                &output,
                &lots,
                camera_angle,
                time_of_day,
                aspect_ratio,
                style_keywords,
            )
            .await
        }
        Command::Upscale {
            image,
            output,
            scale,
            estimate_only,
        } => commands::upscale(client, &image, &output, scale, estimate_only).await,
        Command::Health => commands::health(client).await,
    }
}
