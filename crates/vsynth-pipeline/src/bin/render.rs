//! Render a narrated video from a transcript file or stdin.
//!
//! Usage: `vsynth-render [--upload] [FILE]`

use anyhow::{bail, Context};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use vsynth_models::VideoOutput;
use vsynth_pipeline::logging::init_tracing;
use vsynth_pipeline::{Pipeline, PipelineConfig, PipelineServices};

struct Args {
    upload: bool,
    input: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        upload: false,
        input: None,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--upload" => args.upload = true,
            flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
            path if args.input.is_none() => args.input = Some(path.to_string()),
            extra => bail!("unexpected argument: {extra}"),
        }
    }
    Ok(args)
}

async fn read_transcript(input: Option<&str>) -> anyhow::Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {path}")),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let args = parse_args()?;
    let text = read_transcript(args.input.as_deref()).await?;

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let services = PipelineServices::from_env(&config)
        .await
        .context("failed to configure services")?;
    let pipeline = Pipeline::new(config, services);

    let outcome = pipeline.run(&text, args.upload).await?;
    info!(
        run_id = %outcome.run_id,
        units = outcome.unit_count,
        duration_secs = outcome.total_duration_secs,
        "Video ready"
    );

    match outcome.output {
        VideoOutput::Uploaded { url } => println!("{url}"),
        VideoOutput::LocalOnly { path } => println!("{}", path.display()),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("rustls crypto provider already installed");
    }

    dotenvy::dotenv().ok();
    init_tracing("vsynth=info");

    if let Err(e) = run().await {
        error!("Render failed: {:#}", e);
        std::process::exit(1);
    }
}
