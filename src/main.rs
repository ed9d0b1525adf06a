// src/main.rs

use rundag::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }

    if let Err(err) = run(args).await {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}
