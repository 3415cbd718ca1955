// src/main.rs

use treerun::errors::TreerunError;
use treerun::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        // Task failures were already reported by the teardown controller.
        let reported = err
            .downcast_ref::<TreerunError>()
            .is_some_and(TreerunError::is_task_failure);
        if !reported {
            eprintln!("treerun error: {err:?}");
        }
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
