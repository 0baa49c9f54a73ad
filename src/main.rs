use catfishq::cli::Args;
use catfishq::commands;
use catfishq::config::Config;
use catfishq::logging::{self, LogLevel};
use clap::Parser;

fn main() {
    let args = Args::parse();
    logging::init_logger(args.log);

    let config = Config::load();
    let show_progress = matches!(args.log, LogLevel::Debug | LogLevel::Info);

    let result = if args.print_start_time {
        commands::start_time::run(&args.inputs(&config), &config, show_progress)
    } else {
        args.concat_options(&config)
            .map_err(anyhow::Error::from)
            .and_then(|options| commands::concat::run(&options, &config, show_progress).map(|_| ()))
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
