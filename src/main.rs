use std::path::PathBuf;

use actions_slack_notify::delivery::WebhookClient;
use actions_slack_notify::logging::setup_logging;
use actions_slack_notify::run;

const ENV_LOG_DIR: &str = "SLACK_NOTIFY_LOG_DIR";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    let log_guard = setup_logging(std::env::var_os(ENV_LOG_DIR).map(PathBuf::from));

    match run(|key| std::env::var(key).ok(), &WebhookClient::new()).await {
        Ok(outcome) => println!("{}", outcome.output()),
        Err(e) => {
            eprintln!("{}", e);
            // process::exit skips destructors, flush the file log first.
            drop(log_guard);
            std::process::exit(e.exit_code());
        }
    }
}
