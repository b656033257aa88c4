//! split-ledger CLI
//!
//! Query balances and settlement plans from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Outstanding debts in a group
//! split-ledger balances --input scenario.json --group trip --user alice
//!
//! # One user's balances across everything they share
//! split-ledger user-balances --input scenario.json --user alice
//!
//! # Suggested transfers to settle a group, as JSON
//! split-ledger simplify --input scenario.json --group trip --user alice --format json
//!
//! # Generate a random scenario for testing
//! split-ledger generate --members 10 --expenses 30
//! ```

use split_ledger::core::currency::CurrencyCode;
use split_ledger::core::user::{GroupId, UserId};
use split_ledger::scenario::{generate_scenario, InMemoryLedger, ScenarioConfig, ScenarioFile};
use split_ledger::settle::engine::SettlementEngine;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-ledger — shared-expense balances and debt simplification

USAGE:
    split-ledger <COMMAND> [OPTIONS]

COMMANDS:
    balances        Outstanding pairwise debts in a group
    user-balances   One user's balances across their whole footprint
    simplify        Suggest settlement transfers for a group
    generate        Generate a random scenario file (for testing)
    help            Show this message

OPTIONS (balances, simplify):
    --input <FILE>      Path to a JSON scenario file
    --group <ID>        Group to query
    --user <ID>         Requesting user (must be a group member)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (user-balances):
    --input <FILE>      Path to a JSON scenario file
    --user <ID>         User to query
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --members <N>       Number of group members (default: 10)
    --expenses <N>      Number of expenses (default: 30)
    --payments <N>      Number of confirmed payments (default: 5)
    --currencies <LIST> Comma-separated currency codes (default: USD)
    --group <ID>        Group id for the scenario (default: generated)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    split-ledger balances --input scenario.json --group trip --user alice
    split-ledger simplify --input scenario.json --group trip --user alice --format json
    split-ledger generate --members 5 --currencies USD,EUR --output scenario.json"#
    );
}

fn load_ledger(path: &str) -> InMemoryLedger {
    let file = ScenarioFile::load(path).unwrap_or_else(|e| {
        eprintln!("Error loading scenario '{}': {}", path, e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "groups": [ {{ "id": "trip", "members": ["alice", "bob"] }} ],
  "expenses": [
    {{ "group": "trip", "payer": "alice", "currency": "USD", "amount": "90.00",
      "splits": [ {{ "user": "alice", "owed": "45.00" }}, {{ "user": "bob", "owed": "45.00" }} ] }}
  ],
  "payments": [
    {{ "group": "trip", "from": "bob", "to": "alice", "amount": "45.00" }}
  ]
}}"#
        );
        process::exit(1);
    });
    file.into_ledger().unwrap_or_else(|e| {
        eprintln!("Error in scenario '{}': {}", path, e);
        process::exit(1);
    })
}

/// Shared flags of the query commands.
struct QueryArgs {
    input: Option<String>,
    group: Option<GroupId>,
    user: Option<UserId>,
    format: String,
}

fn parse_query_args(args: &[String]) -> QueryArgs {
    let mut parsed = QueryArgs {
        input: None,
        group: None,
        user: None,
        format: "text".to_string(),
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                parsed.input = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--group" => {
                i += 1;
                parsed.group = Some(GroupId::new(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--group requires a group id");
                    process::exit(1);
                })));
            }
            "--user" => {
                i += 1;
                parsed.user = Some(UserId::new(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--user requires a user id");
                    process::exit(1);
                })));
            }
            "--format" => {
                i += 1;
                parsed.format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn require_input(args: &QueryArgs) -> &str {
    args.input.as_deref().unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    })
}

fn require_group(args: &QueryArgs) -> &GroupId {
    args.group.as_ref().unwrap_or_else(|| {
        eprintln!("Error: --group <ID> is required");
        process::exit(1);
    })
}

fn require_user(args: &QueryArgs) -> &UserId {
    args.user.as_ref().unwrap_or_else(|| {
        eprintln!("Error: --user <ID> is required");
        process::exit(1);
    })
}

fn cmd_balances(args: &[String]) {
    let args = parse_query_args(args);
    let ledger = load_ledger(require_input(&args));
    let engine = SettlementEngine::new(ledger);

    let report = engine
        .group_balances(require_group(&args), require_user(&args))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        print!("{}", report);
    }
}

fn cmd_user_balances(args: &[String]) {
    let args = parse_query_args(args);
    let ledger = load_ledger(require_input(&args));
    let engine = SettlementEngine::new(ledger);

    let report = engine
        .user_balances(require_user(&args))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        print!("{}", report);
    }
}

fn cmd_simplify(args: &[String]) {
    let args = parse_query_args(args);
    let ledger = load_ledger(require_input(&args));
    let engine = SettlementEngine::new(ledger);

    let plan = engine
        .simplify_debts(require_group(&args), require_user(&args))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&plan).unwrap());
    } else {
        print!("{}", plan);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = ScenarioConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                config.member_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--members requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                config.expense_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--payments" => {
                i += 1;
                config.payment_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--payments requires a number");
                        process::exit(1);
                    });
            }
            "--currencies" => {
                i += 1;
                let list = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--currencies requires a comma-separated list");
                    process::exit(1);
                });
                config.currencies = list.split(',').map(|s| CurrencyCode::new(s.trim())).collect();
            }
            "--group" => {
                i += 1;
                config.group = GroupId::new(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--group requires a group id");
                    process::exit(1);
                }));
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger = generate_scenario(&config);
    let file = ScenarioFile::from_ledger(&ledger);
    let json = serde_json::to_string_pretty(&file).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses and {} payments for {} members → {}",
            ledger.expenses().len(),
            ledger.payments().len(),
            config.member_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "user-balances" => cmd_user_balances(rest),
        "simplify" => cmd_simplify(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
