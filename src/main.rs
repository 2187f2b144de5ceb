mod cli;

use babelfish::{config, Credentials, JobRequest, RunOutcome, SegmentWindow};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, TranslateArgs};
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "babelfish=trace,babelfish_av=debug".to_string()
        } else {
            "babelfish=info,babelfish_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Translate(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            let outcome = rt.block_on(translate(args, cli.config.as_deref()))?;
            let code = outcome.exit_code();
            match outcome {
                RunOutcome::Fault(err) => Err(err.into()),
                done => {
                    println!("{}", done.display_text());
                    if code != 0 {
                        std::process::exit(code);
                    }
                    Ok(())
                }
            }
        }
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("babelfish {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn translate(
    args: TranslateArgs,
    config_path: Option<&std::path::Path>,
) -> Result<RunOutcome> {
    let config = config::load_config_or_default(config_path)?;

    let credentials = Credentials::new(
        args.sync_api_key.unwrap_or_default(),
        args.openai_api_key.unwrap_or_default(),
        args.eleven_api_key.unwrap_or_default(),
    );

    let mut request = JobRequest::new(args.video_url, args.target_language, credentials)
        .with_source_language(args.source_language)
        .with_voice_id(args.voice_id)
        .with_lipsync_model(args.lipsync_model)
        .with_sync_mode(args.sync_mode)
        .with_segment(SegmentWindow::new(args.segment_start, args.segment_end))
        .with_poll_interval_secs(args.poll_interval.unwrap_or(config.sync.poll_interval_secs))
        .with_max_wait(
            args.max_wait
                .or(config.sync.max_wait_secs)
                .map(Duration::from_secs),
        );
    if let Some(path) = args.output_json {
        request = request.with_metadata_path(path);
    }

    tracing::info!(
        "Translating {} into {}",
        request.video_url,
        request.target_language
    );

    Ok(babelfish::translate(&config, request).await)
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = babelfish_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Audio extraction needs both ffmpeg and ffprobe.");
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Work dir: {}", config.work_dir.display());
    println!(
        "  OpenAI: {} ({}, {})",
        config.openai.base_url, config.openai.transcription_model, config.openai.chat_model
    );
    println!(
        "  ElevenLabs: {} ({}, voice {})",
        config.elevenlabs.base_url, config.elevenlabs.model_id, config.elevenlabs.default_voice_id
    );
    println!("  Upload: {}", config.upload.url);
    println!("  Sync: {}", config.sync.base_url);
    println!("    Poll interval: {}s", config.sync.poll_interval_secs);
    match config.sync.max_wait_secs {
        Some(secs) => println!("    Max wait: {}s", secs),
        None => println!("    Max wait: unbounded"),
    }

    Ok(())
}
