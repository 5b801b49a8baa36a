//! motorph-payroll: payroll HTTP service
//!
//! Serves employee, attendance and account management plus payslip
//! computation over the CSV files in a data directory.

use std::path::PathBuf;

use clap::Parser;
use motorph_payroll::api::{create_router, AppState};
use motorph_payroll::config::{ConfigLoader, PayrollConfig};
use motorph_payroll::service::PayrollService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "motorph-payroll", version, about = "MotorPH payroll service")]
struct Args {
    /// Directory holding employees.csv, attendance.csv and users.csv
    #[arg(long, env = "MOTORPH_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Directory holding policy.yaml and contributions.yaml; built-in tables if omitted
    #[arg(long, env = "MOTORPH_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "MOTORPH_BIND", default_value = "127.0.0.1:3000")]
    bind: String,

    /// Create pending accounts for employees without one before serving
    #[arg(long)]
    sync_users: bool,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motorph_payroll=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config_dir {
        Some(dir) => ConfigLoader::load(dir)?.into_config(),
        None => {
            tracing::info!("No config directory given, using built-in tables");
            PayrollConfig::default()
        }
    };

    let service = PayrollService::open(&args.data_dir, config);
    tracing::info!(
        data_dir = %args.data_dir.display(),
        employees = service.list_employees()?.len(),
        "Opened data directory"
    );

    if args.sync_users {
        let created = service.sync_users()?;
        tracing::info!(created, "Synchronized user accounts");
    }

    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    tracing::info!("motorph-payroll listening on {}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
