use std::env;

mod app;
mod audio;
mod catalog;
mod config;
mod error;
mod logging;
mod mpris;
mod runtime;
mod session;
mod timeline;
mod transition;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match env::args().nth(1).as_deref() {
        Some("--print-config") => {
            let (settings, problem) = runtime::load_settings();
            if let Some(e) = problem {
                eprintln!("gramophone: using default settings: {e}");
            }
            print!("{}", toml::to_string_pretty(&settings)?);
            Ok(())
        }
        Some("--help" | "-h") => {
            println!("usage: gramophone [--print-config]");
            Ok(())
        }
        _ => runtime::run(),
    }
}
