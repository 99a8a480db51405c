use travel_feedback::infra::{config, logging, store};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads env vars (or .env):\n\
           FEEDBACK_STORE (postgres|memory, default postgres)\n\
           DATABASE_URL (required for postgres)\n\
           FEEDBACK_TABLE, DATABASE_MAX_CONNECTIONS, BIND_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if missing)
    let backend = config::store_backend()?;
    let table = config::feedback_table()?;
    let addr = config::bind_addr()?;

    println!("> Preflight:");
    println!("  FEEDBACK_STORE={:?}", backend);
    println!("  FEEDBACK_TABLE={}", table);
    println!("  BIND_ADDR={}", addr);

    let feedback_store = store::connect_store(&table).await?;
    feedback_store
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Feedback store is not reachable: {}", e))?;
    println!("  Store reachable.");

    let rows = feedback_store
        .list(&table)
        .await
        .map_err(|e| anyhow::anyhow!("Feedback table {} is not readable: {}", table, e))?;
    println!("  Table {} readable ({} rows).", table, rows.len());

    println!("> Preflight OK.");
    Ok(())
}
