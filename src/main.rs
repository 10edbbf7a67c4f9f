use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};
use paywizard::application::engine::WizardEngine;
use paywizard::application::flows::FlowCatalog;
use paywizard::application::navigation::on_back_pressed;
use paywizard::application::summary;
use paywizard::config::AppConfig;
use paywizard::domain::flow::FlowKind;
use paywizard::domain::ports::{ClockBox, GatewayBox, IdGeneratorBox, Permission};
use paywizard::domain::session::{Phase, Transition, WizardSession};
use paywizard::infrastructure::clock::{SkipClock, TokioClock};
use paywizard::infrastructure::ids::RandomIdGenerator;
use paywizard::infrastructure::in_memory::{
    RecordingNavigator, ScriptedDocumentPicker, StaticContactsPicker,
};
use paywizard::infrastructure::mock_gateway::MockGateway;
use paywizard::interfaces::csv::action_reader::{Action, ActionKind, ActionReader};
use paywizard::interfaces::csv::summary_writer::SummaryWriter;
use paywizard::logging;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Service flow to run
    #[arg(long)]
    flow: FlowKind,

    /// Scripted user actions CSV file (`action,field,value`)
    script: PathBuf,

    /// TOML settings file (optional)
    #[arg(long, env = "PAYWIZARD_CONFIG")]
    config: Option<PathBuf>,

    /// Skip simulated gateway latency
    #[arg(long)]
    instant: bool,

    /// Summary output format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Log step transitions and gateway calls to stderr
    #[arg(long, short)]
    verbose: bool,
}

/// Everything one scripted run needs besides the session.
struct Driver {
    engine: WizardEngine,
    documents: ScriptedDocumentPicker,
    contacts: StaticContactsPicker,
    navigator: RecordingNavigator,
}

impl Driver {
    async fn apply(
        &mut self,
        session: &mut WizardSession,
        action: Action,
    ) -> paywizard::error::Result<()> {
        match action.action {
            ActionKind::Set => {
                session.set_field(action.field()?, action.value())?;
            }
            ActionKind::Flag => {
                session.set_flag(action.field()?, action.flag()?)?;
            }
            ActionKind::Attach => {
                // a rejected attach must not leave its file for the next pick
                self.documents.clear().await;
                self.documents.push_file(action.document()?).await;
                self.engine.pick_document(session, action.field()?).await?;
            }
            ActionKind::Remove => session.remove_document(action.field()?)?,
            ActionKind::Contact => {
                self.contacts.set_numbers(vec![action.value().to_string()]).await;
                self.engine.fill_from_contacts(session, action.field()?).await?;
            }
            ActionKind::Continue => {
                if let Transition::Failed(failure) = self.engine.continue_step(session).await? {
                    eprintln!("{}: {}", failure.title, failure.message);
                }
            }
            ActionKind::Back => {
                on_back_pressed(session, &mut self.navigator);
            }
            ActionKind::Edit => session.edit_details()?,
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load(path).into_diagnostic()?,
        None => AppConfig::default(),
    };

    let clock: ClockBox = if cli.instant {
        Arc::new(SkipClock)
    } else {
        Arc::new(TokioClock)
    };
    let ids: IdGeneratorBox = Arc::new(RandomIdGenerator);
    let gateway: GatewayBox = Arc::new(MockGateway::new(config.latency.clone(), clock, ids));

    let documents = ScriptedDocumentPicker::new();
    let contacts = StaticContactsPicker::new(Permission::Granted, Vec::new());
    let engine = WizardEngine::new(gateway)
        .with_document_picker(Arc::new(documents.clone()))
        .with_contacts_picker(Arc::new(contacts.clone()));
    let mut driver = Driver {
        engine,
        documents,
        contacts,
        navigator: RecordingNavigator::new(),
    };

    let catalog = FlowCatalog::new(&config.flows);
    let mut session = WizardSession::new(catalog.get(cli.flow)).into_diagnostic()?;

    let file = File::open(&cli.script).into_diagnostic()?;
    let reader = ActionReader::new(file);
    for (row, action_result) in reader.actions().enumerate() {
        match action_result {
            Ok(action) => {
                let kind = action.action;
                if let Err(e) = driver.apply(&mut session, action).await {
                    eprintln!("Error applying action {:?} (row {}): {}", kind, row + 1, e);
                }
            }
            Err(e) => {
                eprintln!("Error reading action (row {}): {}", row + 1, e);
            }
        }
    }

    match session.phase() {
        Phase::Completed => {}
        Phase::Exited => return Err(miette!("{} was closed before completion", cli.flow)),
        _ => {
            return Err(miette!(
                "{} did not complete, stopped on step `{}`",
                cli.flow,
                session.current_step().id
            ));
        }
    }

    let summary = summary::render(&session).into_diagnostic()?;
    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => {
            let mut writer = SummaryWriter::new(stdout.lock());
            writer.write_summary(&summary).into_diagnostic()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &summary).into_diagnostic()?;
            println!();
        }
    }

    Ok(())
}
