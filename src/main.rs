// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use artworkrs::application::context::AppContext;
use artworkrs::config::settings::Settings;
use artworkrs::domain::models::extraction_level::{ExtractionLevel, DEFAULT_PROMPT};
use artworkrs::infrastructure::extraction_api::link_discoverer::ScrollMode;
use artworkrs::infrastructure::metrics::init_metrics;
use artworkrs::utils::telemetry;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "artworkrs",
    about = "Tiered artwork metadata extraction",
    version
)]
struct Cli {
    /// Emit structured JSON logs on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract URLs through the local, heuristic and AI tiers.
    Tiered {
        /// Artwork page URLs.
        #[arg(required = true)]
        urls: Vec<String>,

        /// Extraction level used by the AI tier (quick, full, images_only, custom).
        #[arg(long, default_value = "full")]
        level: ExtractionLevel,

        /// Prompt for the AI tier; the level template is used when omitted.
        #[arg(long, default_value = "")]
        prompt: String,
    },

    /// Extract known URLs with one AI job per URL.
    Batch {
        /// Artwork page URLs.
        #[arg(required = true)]
        urls: Vec<String>,

        /// Extraction level (quick, full, images_only, custom).
        #[arg(long, default_value = "custom")]
        level: ExtractionLevel,

        /// Extraction prompt.
        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,
    },

    /// Discover artwork links on a scrolling portfolio page.
    Discover {
        /// Seed page URL.
        seed: String,

        /// Scroll mode (auto, horizontal, vertical).
        #[arg(long, default_value = "auto")]
        mode: ScrollMode,

        /// Ignore cached link lists.
        #[arg(long)]
        no_cache: bool,
    },

    /// Run an open-search agent job.
    Agent {
        /// What to search for.
        prompt: String,

        /// Credit ceiling for the job.
        #[arg(long, default_value_t = 50)]
        max_credits: u32,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}

/// 主函数
///
/// 解析命令行，加载配置并运行对应流程，结果以 JSON 打印到 stdout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry(cli.json_logs);

    // 2. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    info!("Configuration loaded");

    if settings.metrics.enabled {
        init_metrics(&settings.metrics.listen_addr)?;
    }

    // 3. Wire components
    let context = AppContext::from_settings(settings)?;

    // 4. Run the requested flow
    match cli.command {
        Commands::Tiered { urls, level, prompt } => {
            let outcome = context.tiered_batch(level, &prompt).run_tiered(urls).await;
            print_json(&outcome)?;
        }
        Commands::Batch { urls, level, prompt } => {
            let outcome = context.batch_extract().run_batch(urls, &prompt, level).await?;
            print_json(&outcome)?;
        }
        Commands::Discover {
            seed,
            mode,
            no_cache,
        } => {
            let links = context
                .discover_links()
                .execute(&seed, mode, !no_cache)
                .await?;
            print_json(&links)?;
        }
        Commands::Agent {
            prompt,
            max_credits,
        } => {
            let payload = context.agent_search().agent_search(&prompt, max_credits).await?;
            print_json(&payload)?;
        }
    }

    Ok(())
}
