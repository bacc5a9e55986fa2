use anyhow::{bail, Context, Result};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

use servquick_qb_importer::{run_import, AuthConfig, ImportConfig, QbAuthProvider};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("auth") => run_auth()?,
        Some("import") => {
            let path = args
                .get(2)
                .context("Usage: servquick-qb-importer import <file.csv>")?;
            run_import_mode(Path::new(path))?;
        }
        _ => {
            eprintln!("ServQuick → QuickBooks Online Importer");
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  servquick-qb-importer auth                Authorize with QuickBooks Online");
            eprintln!("  servquick-qb-importer import <file.csv>   Import a ServQuick payment export");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_auth() -> Result<()> {
    println!("🔑 QuickBooks Online Authorization");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = AuthConfig::from_env()?;
    let provider = QbAuthProvider::new(config);

    if provider.is_authenticated() {
        println!("✓ Already authenticated with QuickBooks.");
        return Ok(());
    }

    println!("\n1. Open this URL in a browser and approve the app:");
    println!("\n   {}\n", provider.authorization_url());

    print!("2. Paste the authorization code here: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().lock().read_line(&mut code)?;
    let code = code.trim();

    if code.is_empty() {
        bail!("No authorization code entered.");
    }

    provider
        .exchange_code(code)
        .context("Authentication failed. Check the code and try again.")?;

    println!("\n✓ Authenticated with QuickBooks!");
    Ok(())
}

fn run_import_mode(path: &Path) -> Result<()> {
    println!("📥 ServQuick → QuickBooks Sales Receipt Import");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let auth_config = AuthConfig::from_env()?;
    let provider = QbAuthProvider::new(auth_config);

    if !provider.is_authenticated() {
        bail!("Not authenticated with QuickBooks. Run: servquick-qb-importer auth");
    }

    let client = provider.client()?;
    let config = ImportConfig::with_defaults();

    println!("\n📂 Importing {} ...\n", path.display());
    let report = run_import(path, &client, &config)?;

    for line in report.log_lines() {
        println!("{}", line);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "✅ Import completed: {} imported, {} skipped, {} failed",
        report.imported(),
        report.skipped(),
        report.failed()
    );

    Ok(())
}
