use std::{env, env::VarError};

/// There's no real CLI for the server. Any argument prints the help and the current configuration.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Only ever list variables that cannot hold secrets
    const DISPLAY_ENVS: [&str; 13] = [
        "RUST_LOG",
        "LPS_HOST",
        "LPS_PORT",
        "LPS_ALLOWED_ORIGIN",
        "LPS_POINTS_UNIT",
        "LPS_SYNC_MAX_ATTEMPTS",
        "LPS_SYNC_RETRY_DELAY_MS",
        "LPS_CANCELLATION_WINDOW_HOURS",
        "LPS_SHOPIFY_SHOP",
        "LPS_SHOPIFY_API_VERSION",
        "LPS_SHOPIFY_METAFIELD_NAMESPACE",
        "LPS_DATABASE_URL",
        "LPS_RUN_MIGRATIONS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    for name in DISPLAY_ENVS {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    }
}
