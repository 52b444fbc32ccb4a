use anyhow::Result;
use tracing::{error, info};

use duedate::cli::{self, DueDateReport};
use duedate::config::Config;

fn main() -> Result<()> {
    let args = cli::parse_args()?;

    if args.help {
        cli::print_help();
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("duedate=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!(
        "  Working hours: {:02}:00-{:02}:00",
        config.work_start_hour, config.work_end_hour
    );
    info!("  Working days: {:?}", config.working_days);
    match &config.holidays {
        Some(holidays) => info!("  Holidays: {} configured", holidays.len()),
        None => info!("  Holidays: built-in 2025 US federal table"),
    }

    // Handle --validate mode
    if args.validate {
        info!("Validating configuration...");
        match config.validate() {
            Ok(()) => {
                info!("Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    config.validate()?;
    let calculator = config.calculator()?;

    let submitted = args.submit_time()?;
    let turnaround = args.resolved_turnaround();

    let due = if args.strict || config.strict {
        calculator.calculate_checked(submitted, &turnaround)?
    } else {
        calculator.calculate(submitted, &turnaround)?
    };

    let report = DueDateReport {
        submitted,
        turnaround,
        due,
    };
    println!("{}", report.render(args.json)?);

    Ok(())
}
