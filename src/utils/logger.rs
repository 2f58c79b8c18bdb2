use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

const DEFAULT_FILTER: &str = "warn,cardmix=info,tower_http=warn";

pub fn init_logger() {
    // RUST_LOG wins over the default filter
    let env = Env::default().filter_or("RUST_LOG", DEFAULT_FILTER);

    let mut builder = Builder::from_env(env);

    // Явно подавляем шумные модули
    builder
        .filter_module("hyper", LevelFilter::Error)
        .filter_module("mio", LevelFilter::Error)
        .filter_module("reqwest", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
