//! Interactive virtual-patient interview over stdin.
//!
//! Usage: `virtual-patient [CASE_FILE]`. Everything else comes from
//! `VIRTUAL_PATIENT__*` environment variables (or `.env`). Type the doctor's
//! lines; end input (Ctrl-D) or interrupt (Ctrl-C) to finish and export the
//! transcript.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use virtual_patient::adapters::{
    load_case, load_lexicon, FileTranscriptSink, MockAIProvider, OpenAIConfig, OpenAIProvider,
};
use virtual_patient::application::{
    ConductTurnCommand, ConductTurnHandler, ExportTranscriptHandler, StartSessionCommand,
    StartSessionHandler,
};
use virtual_patient::config::{AiConfig, AiProvider, AppConfig, ValidationError};
use virtual_patient::domain::lexicon::KeywordSignalAnalyzer;
use virtual_patient::domain::session::PresentationSignal;
use virtual_patient::ports::AIProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load()?;
    if let Some(case_file) = std::env::args().nth(1) {
        config.paths.case_file = Some(PathBuf::from(case_file));
    }
    config.validate()?;

    init_tracing(&config)?;

    let case_file = config
        .paths
        .case_file
        .clone()
        .ok_or(ValidationError::MissingRequired("PATHS__CASE_FILE"))?;
    let profile = load_case(&case_file).await?;
    let lexicon = load_lexicon(config.paths.lexicon_file.as_ref()).await?;
    if lexicon.is_none() {
        tracing::info!("No lexicon configured; lexical analysis is neutral");
    }

    let engine = config
        .engine
        .dynamics_engine(KeywordSignalAnalyzer::new(lexicon.map(Arc::new)))?;
    tracing::info!(policy = %engine.policy(), "Dynamics engine ready");

    let provider = build_provider(&config.ai)?;
    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "Dialogue service ready");

    let turns = ConductTurnHandler::new(Arc::new(engine), provider)
        .with_timeout(config.engine.turn_timeout())
        .with_max_tokens(config.ai.max_tokens)
        .with_temperature(config.ai.temperature)
        .with_json_mode(config.ai.json_mode);

    let started = StartSessionHandler::new().handle(StartSessionCommand::new(profile))?;
    let session = started.handle;
    println!(
        "Interview with {} started. {}",
        session.snapshot().await.profile().case_name(),
        describe(&started.presentation)
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match turns.handle(&session, ConductTurnCommand::new(line)).await {
            Ok(result) => {
                println!("Patient: {}", result.patient_text());
                println!("{}", describe(&result.outcome.presentation));
                if let Some(warning) = result.outcome.length_warning {
                    println!("(note: {})", warning);
                }
            }
            Err(err) if err.is_retryable() => {
                eprintln!("Turn not recorded ({}). Please try again.", err);
            }
            Err(err) => {
                eprintln!("Turn not recorded: {}", err);
            }
        }
    }

    let sink = Arc::new(FileTranscriptSink::new(&config.paths.transcript_dir));
    let exported = ExportTranscriptHandler::new(sink).handle(&session).await?;
    println!(
        "Transcript with {} turns written to {}",
        exported.export.turns.len(),
        exported.location
    );

    Ok(())
}

fn init_tracing(config: &AppConfig) -> Result<(), ValidationError> {
    let filter: EnvFilter = config.logging.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn build_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, Box<dyn std::error::Error>> {
    match config.provider {
        AiProvider::Mock => Ok(Arc::new(MockAIProvider::new())),
        AiProvider::OpenAI => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))?;
            let openai = OpenAIConfig::new(api_key.expose_secret().clone())
                .with_model(config.model.clone())
                .with_base_url(config.base_url.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            Ok(Arc::new(OpenAIProvider::new(openai)?))
        }
    }
}

fn describe(signal: &PresentationSignal) -> String {
    format!(
        "[anxiety {:.2} ({}), turn {}, animation {:.1}]",
        signal.anxiety, signal.level, signal.turn_count, signal.animation_intensity
    )
}
