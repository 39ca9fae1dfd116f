//! host-runner: headless host for the Random Connector extension.
//!
//! Usage:
//!   host-runner --profiles alpha,beta,gamma --include alpha,beta --turns 100
//!   host-runner --profiles alpha,beta --db settings.db --config rc.json --ipc-mode

use anyhow::Result;
use random_connector::{
    config::ConnectorConfig,
    event::{EventSource, HostEvent},
    extension::RandomConnector,
    host::StaticConnectionManager,
    notify::{Notification, NotificationLog},
    panel::SettingsPanel,
    selector::TurnOutcome,
    settings::Settings,
    store::SqliteSettingsStore,
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    ToggleProfile { name: String, included: bool },
    SetEnabled { enabled: bool },
    Save,
    SetProfiles { profiles: Vec<String> },
    Event { event: HostEvent },
    Quit,
}

#[derive(serde::Serialize)]
struct HostState<'a> {
    settings:      &'a Settings,
    panel:         &'a SettingsPanel,
    active:        Option<String>,
    last_outcome:  Option<TurnOutcome>,
    notifications: Vec<Notification>,
}

struct Host {
    connections: Rc<StaticConnectionManager>,
    notes:       Rc<NotificationLog>,
    source:      EventSource,
    connector:   RandomConnector,
}

impl Host {
    /// Wire the extension into a fresh host and fire the startup event.
    async fn boot(profiles: Vec<String>, db: &str, config: ConnectorConfig) -> Result<Self> {
        let store = if db == ":memory:" {
            SqliteSettingsStore::in_memory()?
        } else {
            SqliteSettingsStore::open(db)?
        };
        store.migrate()?;

        let connections = Rc::new(StaticConnectionManager::new(profiles));
        let notes = Rc::new(NotificationLog::new());
        let connector = RandomConnector::new(
            config,
            Box::new(store),
            connections.clone(),
            connections.clone(),
            notes.clone(),
        );

        let mut source = EventSource::new();
        connector.register(&mut source);

        let mut host = Self { connections, notes, source, connector };
        host.fire(HostEvent::ExtensionLoaded).await;
        Ok(host)
    }

    async fn fire(&mut self, event: HostEvent) -> Option<TurnOutcome> {
        if !self.source.is_subscribed(event.event_type()) {
            return None;
        }
        match event {
            // Turn outcomes are reported back, so call the handler directly.
            HostEvent::GenerationEnded { .. } => Some(self.connector.on_turn_ended().await),
            other => {
                self.source.emit(&mut self.connector, &other).await;
                None
            }
        }
    }

    fn state(&self, last_outcome: Option<TurnOutcome>) -> HostState<'_> {
        HostState {
            settings: self.connector.settings(),
            panel: self.connector.panel(),
            active: self.connections.active(),
            last_outcome,
            notifications: self.notes.drain(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let turns = parse_arg(&args, "--turns", 10u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let profiles = parse_list(&args, "--profiles");
    let include = parse_list(&args, "--include");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");

    let mut config = match string_arg(&args, "--config") {
        Some(path) => ConnectorConfig::load(path)?,
        None => ConnectorConfig::default(),
    };
    if let Some(seed) = string_arg(&args, "--seed").and_then(|s| s.parse().ok()) {
        config.seed = Some(seed);
    }

    if !ipc_mode {
        println!("Random Connector: host-runner");
        println!("  profiles:  {profiles:?}");
        println!("  include:   {include:?}");
        println!("  turns:     {turns}");
        println!("  db:        {db}");
        println!("  seed:      {:?}", config.seed);
        println!();
    }

    let mut host = Host::boot(profiles, db, config).await?;

    if ipc_mode {
        run_ipc_loop(&mut host).await?;
    } else {
        if !include.is_empty() {
            host.connector.set_enabled(true);
            for name in &include {
                host.connector.toggle_profile(name, true);
            }
        }
        let outcomes = run_turns(&mut host, turns).await;
        print_summary(&host, &outcomes, turns);
    }

    Ok(())
}

async fn run_turns(host: &mut Host, turns: u64) -> Vec<TurnOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..turns {
        if let Some(outcome) = host.fire(HostEvent::generation_ended()).await {
            outcomes.push(outcome);
        }
    }
    outcomes
}

async fn run_ipc_loop(host: &mut Host) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("host-runner: rejected IPC command: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let mut outcome = None;
        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::ToggleProfile { name, included } => {
                host.connector.toggle_profile(&name, included);
            }
            IpcCommand::SetEnabled { enabled } => host.connector.set_enabled(enabled),
            IpcCommand::Save => {
                host.connector.save_settings().await;
            }
            IpcCommand::SetProfiles { profiles } => {
                host.connections.set_profiles(profiles);
                host.connector.refresh_panel().await;
            }
            IpcCommand::Event { event } => outcome = host.fire(event).await,
        }

        writeln!(stdout, "{}", serde_json::to_string(&host.state(outcome))?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(host: &Host, outcomes: &[TurnOutcome], turns: u64) {
    let mut tally: BTreeMap<String, u64> = BTreeMap::new();
    for profile in host.connections.activations() {
        *tally.entry(profile).or_default() += 1;
    }
    let skipped = outcomes.iter().filter(|o| o.applied_profile().is_none()).count();

    println!("=== RUN SUMMARY ===");
    println!("  turns fired:    {turns}");
    println!("  switches:       {}", outcomes.len() - skipped);
    println!("  skipped turns:  {skipped}");
    println!("  active profile: {}", host.connections.active().unwrap_or_else(|| "(none)".into()));
    println!();
    println!("=== ACTIVATIONS ===");
    if tally.is_empty() {
        println!("  (no profile was switched)");
    } else {
        for (profile, count) in &tally {
            let share = *count as f64 / turns.max(1) as f64 * 100.0;
            println!("  {profile:<24} {count:>6}  ({share:.1}%)");
        }
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    string_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_list(args: &[String], flag: &str) -> Vec<String> {
    string_arg(args, flag)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
