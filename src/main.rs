use human_panic::setup_panic;
use hybrid_plant::cli::run_cli;
use hybrid_plant::log::is_logger_initialised;
use log::error;

fn main() {
    setup_panic!();

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
