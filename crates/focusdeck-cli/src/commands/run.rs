//! Interactive session: one controller, one ticker, commands from stdin.

use focusdeck_core::{
    ChecklistStore, Command, CommandError, Config, ControllerSettings, Database, Event, Ticker,
    TimerController,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::checklist::{self, ChecklistAction};
use crate::terminal::{TerminalCues, TerminalDisplay};

const HELP: &str = "\
timer:     start | pause | reset | status
           set <h> <m> <s>            (countdown, stopwatch)
           set <work> <break> <long>  (pomodoro, minutes)
           mode countdown|stopwatch|pomodoro
checklist: add <text> | list | toggle <n> | remove <n>
session:   help | quit";

#[derive(Debug, PartialEq, Eq)]
enum SessionInput {
    Timer(Command),
    Checklist(ChecklistInput),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum ChecklistInput {
    Add(String),
    List,
    Toggle(String),
    Remove(String),
}

impl SessionInput {
    fn parse(line: &str) -> Result<Self, CommandError> {
        let trimmed = line.trim();
        let (verb, rest) = trimmed
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((trimmed, ""));

        let input = match verb.to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => SessionInput::Quit,
            "help" | "?" => SessionInput::Help,
            "add" => SessionInput::Checklist(ChecklistInput::Add(rest.to_string())),
            "list" => SessionInput::Checklist(ChecklistInput::List),
            "toggle" | "done" => SessionInput::Checklist(ChecklistInput::Toggle(rest.to_string())),
            "remove" | "rm" => SessionInput::Checklist(ChecklistInput::Remove(rest.to_string())),
            _ => SessionInput::Timer(Command::parse(trimmed)?),
        };
        Ok(input)
    }
}

impl ChecklistInput {
    /// Item numbers are read as loosely as timer fields; junk becomes 0,
    /// which never names an item.
    fn into_action(self) -> ChecklistAction {
        let number = |raw: &str| focusdeck_core::timer::coerce_field(raw) as usize;
        match self {
            ChecklistInput::Add(text) => ChecklistAction::Add { text: vec![text] },
            ChecklistInput::List => ChecklistAction::List,
            ChecklistInput::Toggle(raw) => ChecklistAction::Toggle { number: number(&raw) },
            ChecklistInput::Remove(raw) => ChecklistAction::Remove { number: number(&raw) },
        }
    }
}

pub fn run(mode: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session(&config, mode));
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

async fn session(config: &Config, mode: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = TimerController::new(
        config.startup_mode,
        ControllerSettings::from(config),
        Box::new(TerminalDisplay::default()),
        Box::new(TerminalCues),
    );
    if let Some(name) = mode {
        controller.select_mode(&name);
    }
    let mut checklist = checklist::open(config);
    let mut ticker = Ticker::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    loop {
        ticker.sync(controller.is_running());
        tokio::select! {
            _ = ticker.next() => {
                if let Some(event) = controller.tick() {
                    report(&event)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match SessionInput::parse(&line) {
                    Ok(SessionInput::Quit) => break,
                    Ok(SessionInput::Help) => println!("{HELP}"),
                    Ok(SessionInput::Checklist(input)) => {
                        apply_checklist(&mut checklist, input);
                    }
                    Ok(SessionInput::Timer(command)) => {
                        if let Some(event) = controller.dispatch(command) {
                            report(&event)?;
                        }
                    }
                    Err(e) => eprintln!("{e} (type 'help')"),
                }
            }
        }
    }

    controller.pause();
    println!();
    Ok(())
}

fn apply_checklist(checklist: &mut ChecklistStore<Database>, input: ChecklistInput) {
    println!();
    for line in checklist::apply(checklist, input.into_action()) {
        println!("{line}");
    }
}

fn report(event: &Event) -> Result<(), serde_json::Error> {
    match event {
        Event::StateSnapshot { .. } => println!("\n{}", serde_json::to_string_pretty(event)?),
        Event::ModeSwitched { to, .. } => println!("\nswitched to {to}"),
        Event::PhaseChanged {
            to,
            cycles_completed,
            running,
            ..
        } => {
            let hint = if *running { "" } else { " (type 'start' to continue)" };
            println!("{}, {cycles_completed} completed{hint}", to.label());
        }
        _ => {}
    }
    Ok(())
}
