use clap::Subcommand;
use focusdeck_core::{ChecklistStore, Config, Database, KvStore};

#[derive(Subcommand)]
pub enum ChecklistAction {
    /// Add an item
    Add {
        /// Item text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List items
    List,
    /// Check or uncheck an item
    Toggle {
        /// Item number as shown by `list`
        number: usize,
    },
    /// Remove an item
    Remove {
        /// Item number as shown by `list`
        number: usize,
    },
}

/// Open the configured checklist, falling back to memory when the
/// database cannot be opened.
pub fn open(config: &Config) -> ChecklistStore<Database> {
    let db = match Database::open() {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!("checklist database unavailable: {e}");
            None
        }
    };
    ChecklistStore::open(db, config.checklist.storage_key.as_str())
}

/// Apply `action` and return the lines to print.
pub fn apply<S: KvStore>(checklist: &mut ChecklistStore<S>, action: ChecklistAction) -> Vec<String> {
    match action {
        ChecklistAction::Add { text } => match checklist.add(&text.join(" ")) {
            Some(_) => vec![format!("added #{}", checklist.len())],
            None => vec!["nothing to add".to_string()],
        },
        ChecklistAction::List => {
            if checklist.is_empty() {
                return vec!["checklist is empty".to_string()];
            }
            checklist
                .items()
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let mark = if item.completed { 'x' } else { ' ' };
                    format!("{:>3}. [{mark}] {}", i + 1, item.text)
                })
                .collect()
        }
        ChecklistAction::Toggle { number } => {
            let toggled = number
                .checked_sub(1)
                .and_then(|index| checklist.id_at(index))
                .and_then(|id| checklist.toggle(id));
            match toggled {
                Some(true) => vec![format!("#{number} done")],
                Some(false) => vec![format!("#{number} not done")],
                None => vec![format!("no item #{number}")],
            }
        }
        ChecklistAction::Remove { number } => {
            let removed = number
                .checked_sub(1)
                .and_then(|index| checklist.id_at(index))
                .and_then(|id| checklist.remove(id));
            match removed {
                Some(item) => vec![format!("removed \"{}\"", item.text)],
                None => vec![format!("no item #{number}")],
            }
        }
    }
}

pub fn run(action: ChecklistAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut checklist = open(&config);
    for line in apply(&mut checklist, action) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_checklist() -> ChecklistStore<Database> {
        ChecklistStore::open(Some(Database::open_memory().unwrap()), "checklistTasks")
    }

    fn add(checklist: &mut ChecklistStore<Database>, text: &str) -> Vec<String> {
        apply(
            checklist,
            ChecklistAction::Add {
                text: text.split(' ').map(String::from).collect(),
            },
        )
    }

    #[test]
    fn add_and_list() {
        let mut checklist = memory_checklist();
        assert_eq!(add(&mut checklist, "buy milk"), ["added #1"]);
        assert_eq!(add(&mut checklist, "call mom"), ["added #2"]);
        apply(&mut checklist, ChecklistAction::Toggle { number: 2 });

        assert_eq!(
            apply(&mut checklist, ChecklistAction::List),
            ["  1. [ ] buy milk", "  2. [x] call mom"]
        );
    }

    #[test]
    fn blank_items_are_not_added() {
        let mut checklist = memory_checklist();
        assert_eq!(add(&mut checklist, "  "), ["nothing to add"]);
        assert_eq!(apply(&mut checklist, ChecklistAction::List), ["checklist is empty"]);
    }

    #[test]
    fn out_of_range_numbers_are_reported() {
        let mut checklist = memory_checklist();
        add(&mut checklist, "only");
        assert_eq!(
            apply(&mut checklist, ChecklistAction::Toggle { number: 0 }),
            ["no item #0"]
        );
        assert_eq!(
            apply(&mut checklist, ChecklistAction::Remove { number: 2 }),
            ["no item #2"]
        );
        assert_eq!(
            apply(&mut checklist, ChecklistAction::Remove { number: 1 }),
            ["removed \"only\""]
        );
    }
}
