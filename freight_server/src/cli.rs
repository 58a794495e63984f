use std::{env, env::VarError};

/// The server takes no arguments. Any argument prints the help text and the current configuration.
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
    // Listed explicitly so that FMS_MAPBOX_ACCESS_TOKEN is never printed
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "FMS_HOST",
        "FMS_PORT",
        "FMS_DATABASE_URL",
        "FMS_DB_MAX_CONNECTIONS",
        "FMS_RUN_MIGRATIONS",
        "FMS_MAPBOX_API_URL",
        "FMS_MAPBOX_ROUTE_TIMEOUT",
        "FMS_MAPBOX_GEOCODE_TIMEOUT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
