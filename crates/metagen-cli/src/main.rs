mod cli;
mod commands;

use cli::{DumpParams, LocateParams, VtableParams, build_cli};
use tracing_subscriber::EnvFilter;

fn main() {
    // METAGEN_LOG follows the usual env-filter syntax, e.g. `metagen_compiler=debug`.
    if let Ok(filter) = EnvFilter::try_from_env("METAGEN_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("locate", m)) => {
            let params = LocateParams::from_matches(m);
            commands::locate::run(params.into());
        }
        Some(("vtable", m)) => {
            let params = VtableParams::from_matches(m);
            commands::vtable::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
