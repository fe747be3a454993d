//! Interview wizard and auxiliary command runners

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{interval, Duration as TokioDuration};

use crate::application::ports::{
    AudioCueType, ConfigStore, DeviceEnumerator, ResponseStore,
};
use crate::application::{AdvanceOutcome, InterviewSequencer, SequencerError};
use crate::domain::config::AppConfig;
use crate::domain::device::{DeviceDescriptor, DeviceKind, DeviceSelection};
use crate::domain::interview::{default_questions, parse_questions, ResponseRecord};
use crate::domain::media::human_readable_bytes;
use crate::infrastructure::audio_cue::create_audio_cue;
use crate::infrastructure::config::XdgConfigStore;
use crate::infrastructure::media::SystemMediaGateway;
use crate::infrastructure::preview::TerminalPreview;
use crate::infrastructure::store::SqliteResponseStore;

use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

type StdinLines = Lines<BufReader<Stdin>>;

/// Resolved options for one interview run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub selection: DeviceSelection,
    pub questions: Vec<String>,
    pub data_dir: PathBuf,
    pub cue: bool,
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Default data directory for the response store
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rehearse")
}

/// Resolve the question list: custom file when configured, otherwise
/// the built-in set.
pub async fn resolve_questions(config: &AppConfig) -> Result<Vec<String>, String> {
    match config.questions_file.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("Failed to read questions file '{}': {}", path, e))?;
            parse_questions(&content).map_err(|e| e.to_string())
        }
        None => Ok(default_questions()),
    }
}

/// Run the guided interview wizard
pub async fn run_interview(options: RunOptions) -> ExitCode {
    let mut presenter = Presenter::new();
    let gateway = SystemMediaGateway::new();
    let preview = Arc::new(TerminalPreview::new());
    let cue = create_audio_cue(options.cue);

    let store = match SqliteResponseStore::open(&options.data_dir).await {
        Ok(store) => store,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    presenter.output("Welcome to rehearse - mock interview practice");
    let selection =
        pick_devices(&presenter, gateway.as_ref(), &options.selection, &mut lines).await;

    let mut sequencer = match InterviewSequencer::new(
        options.questions,
        selection,
        Arc::clone(&gateway),
        preview,
        store,
    ) {
        Ok(sequencer) => sequencer,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let total = sequencer.len();
    presenter.info(&format!(
        "{} questions. Each records camera and microphone; press Enter to start, Enter again to finish, Ctrl-C to quit.",
        total
    ));

    loop {
        let question = match sequencer.current_question() {
            Some(q) => q.to_string(),
            None => break,
        };
        presenter.question(sequencer.current_index(), total, &question);

        presenter.output_inline("Press Enter to start recording... ");
        if !wait_enter(&mut lines).await {
            sequencer.abort().await;
            presenter.info("Interview cancelled");
            return ExitCode::from(EXIT_SUCCESS);
        }

        // Acquire both device grants for this question
        if !ensure_session(&mut presenter, &mut sequencer, &mut lines).await {
            sequencer.abort().await;
            return ExitCode::from(EXIT_ERROR);
        }

        match sequencer.session_mut() {
            Some(session) => {
                if let Err(e) = session.start().await {
                    presenter.error(&format!("Could not start recording: {}", e));
                    sequencer.abort().await;
                    return ExitCode::from(EXIT_ERROR);
                }
            }
            None => {
                presenter.error("No capture session available");
                return ExitCode::from(EXIT_ERROR);
            }
        }
        let _ = cue.play(AudioCueType::RecordingStart).await;

        presenter.show_recording_timer(&question);
        let cancelled = record_until_enter(&presenter, &mut lines, &question).await;
        presenter.stop_spinner();
        let _ = cue.play(AudioCueType::RecordingStop).await;

        if cancelled {
            sequencer.abort().await;
            presenter.info("Interview cancelled");
            return ExitCode::from(EXIT_SUCCESS);
        }

        let result = match sequencer.session_mut() {
            Some(session) => match session.stop().await {
                Ok(result) => result,
                Err(e) => {
                    presenter.error(&format!("Recording failed: {}", e));
                    sequencer.abort().await;
                    return ExitCode::from(EXIT_ERROR);
                }
            },
            None => {
                presenter.error("No capture session available");
                return ExitCode::from(EXIT_ERROR);
            }
        };

        if result.is_degraded() {
            presenter.warn("One track came back empty; keeping the response anyway");
        } else {
            presenter.success(&format!(
                "Captured video ({}) and audio ({})",
                result.video.human_readable_size(),
                result.audio.human_readable_size()
            ));
        }

        match sequencer.advance(result).await {
            Ok(advanced) => {
                if let Some(warning) = advanced.store_warning {
                    presenter.warn(&format!("{}; response kept in memory", warning));
                }
                if let AdvanceOutcome::Complete { responses } = advanced.outcome {
                    print_completion(&presenter, &responses);
                }
            }
            // The position still advanced; retry the open on the next turn
            Err(SequencerError::Capture(e)) => {
                presenter.warn(&format!("Could not open the next capture session: {}", e));
            }
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// List available capture devices
pub async fn run_devices() -> ExitCode {
    let presenter = Presenter::new();
    let gateway = SystemMediaGateway::new();

    let devices = match gateway.list_devices().await {
        Ok(devices) => devices,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if devices.is_empty() {
        presenter.warn("No capture devices found");
        return ExitCode::from(EXIT_SUCCESS);
    }

    presenter.output("Cameras:");
    print_kind(&presenter, &devices, DeviceKind::Camera);
    presenter.output("Microphones:");
    print_kind(&presenter, &devices, DeviceKind::Microphone);

    ExitCode::from(EXIT_SUCCESS)
}

/// Show previously recorded responses
pub async fn run_summary(data_dir: PathBuf, json: bool) -> ExitCode {
    let presenter = Presenter::new();

    let store = match SqliteResponseStore::open(&data_dir).await {
        Ok(store) => store,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let records = match store.list_all().await {
        Ok(records) => records,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&records) {
            Ok(text) => presenter.output(&text),
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    if records.is_empty() {
        presenter.info("No responses recorded yet");
        return ExitCode::from(EXIT_SUCCESS);
    }

    for record in &records {
        let id = record
            .id
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".to_string());
        presenter.output(&format!(
            "{:>4}  {}  {}",
            id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.question
        ));
        presenter.output(&format!(
            "      video: {}",
            artifact_entry(&data_dir, &record.video_file)
        ));
        presenter.output(&format!(
            "      audio: {}",
            artifact_entry(&data_dir, &record.audio_file)
        ));
    }
    presenter.info(&format!("{} responses recorded", records.len()));

    ExitCode::from(EXIT_SUCCESS)
}

/// Artifact path with its on-disk size, relative to the data dir
fn artifact_entry(data_dir: &std::path::Path, relative: &str) -> String {
    match std::fs::metadata(data_dir.join(relative)) {
        Ok(meta) => format!("{} ({})", relative, human_readable_bytes(meta.len())),
        Err(_) => format!("{} (missing)", relative),
    }
}

fn print_kind(presenter: &Presenter, devices: &[DeviceDescriptor], kind: DeviceKind) {
    let mut any = false;
    for device in devices.iter().filter(|d| d.kind() == kind) {
        presenter.output(&format!("  {}  ({})", device.display_label(), device.id()));
        any = true;
    }
    if !any {
        presenter.output("  (none found)");
    }
}

/// Fill in any unset devices by prompting from the enumerated list.
/// Enumeration failure is recoverable: fall back to platform defaults.
async fn pick_devices(
    presenter: &Presenter,
    enumerator: &SystemMediaGateway,
    preset: &DeviceSelection,
    lines: &mut StdinLines,
) -> DeviceSelection {
    let devices = match enumerator.list_devices().await {
        Ok(devices) => devices,
        Err(e) => {
            presenter.warn(&format!("Device enumeration failed: {}", e));
            Vec::new()
        }
    };

    let video = if preset.video_device.is_empty() {
        prompt_one(presenter, enumerator, &devices, DeviceKind::Camera, lines).await
    } else {
        preset.video_device.clone()
    };
    let audio = if preset.audio_device.is_empty() {
        prompt_one(presenter, enumerator, &devices, DeviceKind::Microphone, lines).await
    } else {
        preset.audio_device.clone()
    };

    DeviceSelection::new(video, audio)
}

async fn prompt_one(
    presenter: &Presenter,
    enumerator: &SystemMediaGateway,
    devices: &[DeviceDescriptor],
    kind: DeviceKind,
    lines: &mut StdinLines,
) -> String {
    let options: Vec<&DeviceDescriptor> = devices.iter().filter(|d| d.kind() == kind).collect();

    // With zero or one candidate there is nothing to choose; pre-seed
    // from enumeration order.
    if options.len() < 2 {
        return match enumerator.default_for(kind).await {
            Ok(Some(device)) => {
                presenter.info(&format!("Using {}: {}", kind, device.display_label()));
                device.id().to_string()
            }
            _ => {
                presenter.warn(&format!("No {} found; using platform default", kind));
                String::new()
            }
        };
    }

    presenter.output(&format!("Available {}s:", kind));
    for (i, device) in options.iter().enumerate() {
        presenter.output(&format!("  {}. {}", i + 1, device.display_label()));
    }
    presenter.output_inline(&format!("Select {} [1]: ", kind));

    let choice = match lines.next_line().await {
        Ok(Some(line)) => line,
        _ => String::new(),
    };
    let index = choice
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|&n| n < options.len())
        .unwrap_or(0);
    options[index].id().to_string()
}

/// Open a session for the current question, prompting to retry when the
/// devices cannot be acquired.
async fn ensure_session(
    presenter: &mut Presenter,
    sequencer: &mut InterviewSequencer<SystemMediaGateway, TerminalPreview, SqliteResponseStore>,
    lines: &mut StdinLines,
) -> bool {
    loop {
        if sequencer.session_mut().is_some() {
            return true;
        }
        match sequencer.open_session().await {
            Ok(_) => return true,
            Err(SequencerError::Capture(e)) => {
                presenter.error(&format!("Could not open devices: {}", e));
                presenter.output_inline("Press Enter to retry, or type q to quit: ");
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim() != "q" => continue,
                    _ => return false,
                }
            }
            Err(e) => {
                presenter.error(&e.to_string());
                return false;
            }
        }
    }
}

/// Wait for Enter. Returns false on Ctrl-C or end of input.
async fn wait_enter(lines: &mut StdinLines) -> bool {
    tokio::select! {
        line = lines.next_line() => matches!(line, Ok(Some(_))),
        _ = tokio::signal::ctrl_c() => false,
    }
}

/// Tick the recording timer until Enter. Returns true when cancelled.
async fn record_until_enter(
    presenter: &Presenter,
    lines: &mut StdinLines,
    question: &str,
) -> bool {
    let mut ticker = interval(TokioDuration::from_secs(1));
    let mut elapsed = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                presenter.update_recording_timer(elapsed, question);
                elapsed += 1;
            }
            line = lines.next_line() => return !matches!(line, Ok(Some(_))),
            _ = tokio::signal::ctrl_c() => return true,
        }
    }
}

fn print_completion(presenter: &Presenter, responses: &[ResponseRecord]) {
    presenter.output("");
    presenter.success(&format!(
        "Interview complete: {} responses recorded",
        responses.len()
    ));
    for (i, record) in responses.iter().enumerate() {
        let status = if record.id.is_some() {
            "saved"
        } else {
            "not saved"
        };
        presenter.output(&format!("  {}. {} ({})", i + 1, record.question, status));
    }
}
