//! Rehearse CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rehearse::cli::{
    app::{
        default_data_dir, load_merged_config, resolve_questions, run_devices, run_interview,
        run_summary, RunOptions, EXIT_ERROR, EXIT_USAGE_ERROR,
    },
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use rehearse::domain::config::AppConfig;
use rehearse::domain::device::DeviceSelection;
use rehearse::infrastructure::config::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Build CLI config from args
    let cli_config = AppConfig {
        video_device: cli.video_device.clone(),
        audio_device: cli.audio_device.clone(),
        data_dir: cli.data_dir.clone(),
        cue: if cli.cue { Some(true) } else { None },
        questions_file: cli.questions.clone(),
    };
    let config = load_merged_config(cli_config).await;

    let data_dir = config
        .data_dir
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_data_dir);

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Devices) => return run_devices().await,
        Some(Commands::Summary { json }) => return run_summary(data_dir, json).await,
        None => {}
    }

    // Interview wizard
    let questions = match resolve_questions(&config).await {
        Ok(questions) => questions,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let cue = config.cue_or_default();
    let options = RunOptions {
        selection: DeviceSelection::new(
            config.video_device.unwrap_or_default(),
            config.audio_device.unwrap_or_default(),
        ),
        questions,
        data_dir,
        cue,
    };

    run_interview(options).await
}
