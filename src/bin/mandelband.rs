extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelband;

use mandelband::{render, FileSink, RenderConfig, RenderError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = RenderConfig::app().get_matches();
    let config = match RenderConfig::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        "selected width, height = {}, {} across {} participants",
        config.bound.width, config.bound.height, config.workers
    );

    let sink = FileSink::new(&config.output);
    match render(&config, &sink) {
        Ok(_) => {}
        Err(e @ RenderError::Bootstrap(_)) => {
            println!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    }
}
