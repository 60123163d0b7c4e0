use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use retention_desk::config::{self, Config};
use retention_desk::dashboard::{self, ClientFilter};
use retention_desk::dataset::{self, Dataset};
use retention_desk::outreach::{self, OutreachState};
use retention_desk::output;
use retention_desk::scoring::RenewalStatus;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List clients ranked by renewal priority (default if no subcommand)
    List {
        /// Only show clients with this status (overdue, due_soon, active, unknown)
        #[arg(long)]
        status: Option<String>,
        /// Maximum number of rows (defaults to dashboard.list_limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Rows to skip before the first one shown
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
        /// Show only snoozed clients
        #[arg(long)]
        snoozed: bool,
    },
    /// Show one client with score breakdown and upsell recommendations
    Show {
        customer_id: String,
    },
    /// Find customers by id, name, email or phone
    Search {
        /// Text to look for (empty lists every customer, newest first)
        #[arg(default_value = "")]
        query: String,
        /// Exact email lookup instead of a text search
        #[arg(long, conflicts_with_all = ["query", "phone"])]
        email: Option<String>,
        /// Exact phone lookup, digits only are compared
        #[arg(long, conflicts_with = "query")]
        phone: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Orders and subscription events of one client, most recent first
    Timeline {
        customer_id: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Dashboard KPIs with month-over-month comparisons
    Kpis,
    /// Upcoming renewals
    Calendar {
        /// First day (defaults to today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day (defaults to today + dashboard.calendar_window_days)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Renewals of one calendar month, grouped by day
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Monthly renewal and order trends
    Trends {
        /// Number of months (defaults to dashboard.trend_months)
        #[arg(long)]
        months: Option<u32>,
    },
    /// Retention per product
    Products,
    /// Record outreach and hide a client from the list
    Snooze {
        customer_id: String,
        /// How long to hide the client, e.g. "2w" or "3days" (indefinite if omitted)
        #[arg(long = "for")]
        duration: Option<String>,
        /// Free-text note about the contact
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove a client's outreach entry
    Unsnooze {
        customer_id: String,
    },
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "retention-desk")]
#[command(about = "Customer renewal prioritization CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/retention-desk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the JSON record export (overrides the config)
    #[arg(short, long, global = true)]
    dataset: Option<String>,

    /// Evaluation date, YYYY-MM-DD (defaults to today)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn exit_with(code: i32, context: &str, err: anyhow::Error) -> ! {
    eprintln!("{}: {:#}", context, err);
    std::process::exit(code);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(EXIT_DATA, "Failed to serialize output", e.into()),
    }
}

fn load_dataset(cli_path: Option<&str>, config: &Config) -> Dataset {
    let path = match cli_path.or(config.dataset.as_deref()) {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("No dataset configured.");
            eprintln!("Pass --dataset <path> or add to ~/.config/retention-desk/config.yaml:");
            eprintln!("  dataset: /path/to/export.json");
            std::process::exit(EXIT_CONFIG);
        }
    };
    match dataset::load_dataset(&path) {
        Ok(d) => d,
        Err(e) => exit_with(EXIT_DATA, "Data error", e),
    }
}

fn outreach_path() -> PathBuf {
    match outreach::get_outreach_path() {
        Ok(p) => p,
        Err(e) => exit_with(EXIT_CONFIG, "Config error", e),
    }
}

fn load_outreach(path: &Path) -> OutreachState {
    match outreach::load_outreach_state(path) {
        Ok(s) => s,
        Err(e) => exit_with(EXIT_DATA, "Outreach state error", e),
    }
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List {
        status: None,
        limit: None,
        offset: 0,
        tsv: false,
        snoozed: false,
    });
    let start_time = Instant::now();

    // Init writes the file the loader would otherwise read, so it runs first
    if let Commands::Init { force } = command {
        let path = match cli.config.as_deref().map(PathBuf::from) {
            Some(p) => p,
            None => match config::get_config_path() {
                Ok(p) => p,
                Err(e) => exit_with(EXIT_CONFIG, "Config error", e),
            },
        };
        if let Err(e) = config::write_default_config(&path, force) {
            exit_with(EXIT_CONFIG, "Config error", e);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    let config_path = cli.config.as_deref().map(PathBuf::from);
    let config = match config::load_config(config_path.clone()) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, "Config error", e),
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    retention_desk::logging::init_logging(
        &config.logging.clone().unwrap_or_default(),
        cli.verbose,
    );

    match config_path.or_else(|| config::get_config_path().ok()) {
        Some(path) if path.exists() => tracing::debug!(path = %path.display(), "loaded config"),
        _ => tracing::debug!("no config file, using defaults"),
    }

    let windows = config.scoring.clone().unwrap_or_default().windows();
    let dashboard_config = config.dashboard.clone().unwrap_or_default();
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let use_colors = output::should_use_colors();

    tracing::debug!(%today, ?windows, "starting");

    match command {
        Commands::List {
            status,
            limit,
            offset,
            tsv,
            snoozed,
        } => {
            let status = match status.as_deref().map(|s| (s, RenewalStatus::parse(s))) {
                None => None,
                Some((_, Some(parsed))) => Some(parsed),
                Some((raw, None)) => {
                    eprintln!(
                        "Unknown status '{}'. Use overdue, due_soon, active or unknown.",
                        raw
                    );
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let data = load_dataset(cli.dataset.as_deref(), &config);
            let state = load_outreach(&outreach_path());

            let snapshots = if snoozed {
                outreach::filter_snoozed(data.snapshots(), &state)
            } else {
                outreach::filter_active(data.snapshots(), &state)
            };

            let filter = ClientFilter {
                status,
                limit: Some(limit.unwrap_or_else(|| dashboard_config.list_limit())),
                offset,
            };
            let page = dashboard::list_clients(&data, snapshots, &windows, today, &filter);

            if cli.json {
                print_json(&page);
            } else if tsv {
                let out = output::format_client_tsv(&page.rows);
                if !out.is_empty() {
                    println!("{}", out);
                }
            } else {
                let annotate = if snoozed { Some(&state) } else { None };
                println!(
                    "{}",
                    output::format_client_table(&page.rows, offset, use_colors, cli.verbose, annotate)
                );
            }

            tracing::info!(
                shown = page.rows.len(),
                total = page.total,
                elapsed = ?start_time.elapsed(),
                "listed clients"
            );
        }
        Commands::Show { customer_id } => {
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let detail = match dashboard::client_detail(
                &data,
                &windows,
                &dashboard_config.product_catalog(),
                &customer_id,
                today,
            ) {
                Ok(d) => d,
                Err(e) => exit_with(EXIT_DATA, "Data error", e),
            };

            if cli.json {
                print_json(&detail);
            } else {
                let state = load_outreach(&outreach_path());
                println!("{}", output::format_client_detail(&detail, Some(&state), use_colors));
            }
        }
        Commands::Search {
            query,
            email,
            phone,
            limit,
            offset,
        } => {
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let exact = match (email.as_deref(), phone.as_deref()) {
                (Some(email), _) => Some(dashboard::find_by_email(&data, email)),
                (None, Some(phone)) => Some(dashboard::find_by_phone(&data, phone)),
                (None, None) => None,
            };
            let page = match exact {
                Some(found) => {
                    let hits: Vec<dashboard::SearchHit> =
                        found.map(dashboard::SearchHit::from_customer).into_iter().collect();
                    dashboard::SearchPage {
                        total: hits.len(),
                        hits,
                    }
                }
                None => dashboard::search_customers(&data, &query, limit, offset),
            };

            if cli.json {
                print_json(&page);
            } else {
                println!("{}", output::format_search(&page.hits, offset));
            }
            tracing::info!(shown = page.hits.len(), total = page.total, "searched customers");
        }
        Commands::Timeline {
            customer_id,
            limit,
            offset,
        } => {
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let page = match dashboard::customer_timeline(&data, &customer_id, today, limit, offset) {
                Ok(p) => p,
                Err(e) => exit_with(EXIT_DATA, "Data error", e),
            };
            if cli.json {
                print_json(&page);
            } else {
                println!("{}", output::format_timeline(&page.events, use_colors));
            }
        }
        Commands::Kpis => {
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let kpis = dashboard::dashboard_kpis(&data, &dashboard_config, today);
            if cli.json {
                print_json(&kpis);
            } else {
                println!("{}", output::format_kpis(&kpis, use_colors));
            }
        }
        Commands::Calendar { from, to } => {
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let from = from.unwrap_or(today);
            let to = to.unwrap_or_else(|| {
                dashboard::period::days_after(from, dashboard_config.calendar_window_days().max(0) as u64)
            });
            let entries = dashboard::renewal_calendar(&data, from, to);
            if cli.json {
                print_json(&entries);
            } else {
                println!("{}", output::format_calendar(&entries, use_colors));
            }
        }
        Commands::Month { year, month } => {
            use chrono::Datelike;
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let view = match dashboard::calendar_month(
                &data,
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
            ) {
                Ok(v) => v,
                Err(e) => exit_with(EXIT_CONFIG, "Invalid month", e),
            };
            if cli.json {
                print_json(&view);
            } else {
                println!("{}", output::format_calendar_month(&view, use_colors));
            }
        }
        Commands::Trends { months } => {
            let months = months.unwrap_or_else(|| dashboard_config.trend_months());
            if let Err(e) = config::check_trend_months("--months", months) {
                eprintln!("{}", e);
                std::process::exit(EXIT_CONFIG);
            }
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let trends = dashboard::trend_data(&data, today, months);
            if cli.json {
                print_json(&trends);
            } else {
                println!("{}", output::format_trends(&trends));
            }
        }
        Commands::Products => {
            let data = load_dataset(cli.dataset.as_deref(), &config);
            let products = dashboard::product_retention(&data);
            if cli.json {
                print_json(&products);
            } else {
                println!("{}", output::format_products(&products));
            }
        }
        Commands::Snooze {
            customer_id,
            duration,
            note,
        } => {
            let data = load_dataset(cli.dataset.as_deref(), &config);
            if data.find_customer(&customer_id).is_none() {
                eprintln!("Customer {} not found", customer_id);
                std::process::exit(EXIT_DATA);
            }

            let until = match duration.as_deref() {
                None => None,
                Some(raw) => {
                    let parsed = humantime::parse_duration(raw)
                        .map_err(anyhow::Error::from)
                        .and_then(|d| chrono::Duration::from_std(d).map_err(anyhow::Error::from));
                    let until = parsed.and_then(|d| {
                        Utc::now()
                            .checked_add_signed(d)
                            .ok_or_else(|| anyhow::anyhow!("{} is too far in the future", raw))
                    });
                    match until {
                        Ok(until) => Some(until),
                        Err(e) => exit_with(EXIT_CONFIG, "Invalid duration", e),
                    }
                }
            };

            let path = outreach_path();
            let mut state = load_outreach(&path);
            state.snooze(customer_id.clone(), until, note);
            if let Err(e) = outreach::save_outreach_state(&path, &state) {
                exit_with(EXIT_DATA, "Outreach state error", e);
            }

            match until {
                Some(until) => println!(
                    "Snoozed {} until {}",
                    customer_id,
                    until.format("%Y-%m-%d %H:%M UTC")
                ),
                None => println!("Snoozed {} indefinitely", customer_id),
            }
        }
        Commands::Unsnooze { customer_id } => {
            let path = outreach_path();
            let mut state = load_outreach(&path);
            if !state.unsnooze(&customer_id) {
                println!("{} was not snoozed", customer_id);
                std::process::exit(EXIT_SUCCESS);
            }
            if let Err(e) = outreach::save_outreach_state(&path, &state) {
                exit_with(EXIT_DATA, "Outreach state error", e);
            }
            println!("Unsnoozed {}", customer_id);
        }
        // Handled before the config is loaded
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
