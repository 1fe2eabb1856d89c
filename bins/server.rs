use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use common::utils::logging::{init_logging, init_logging_default};
use configs::AppConfig;

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG / CONFIG_PATH / SERVER_PORT take effect
    dotenv().ok();

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => {
            init_logging(cfg.logging.format.as_str());
            info!(service = "blog_api", event = "logger_init", "tracing subscriber initialized");
            cfg
        }
        Err(e) => {
            init_logging_default();
            error!(
                service = "blog_api",
                event = "config_invalid",
                error = %e,
                "failed to load configuration"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "blog_api",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "blog_api",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "blog_api",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        addr = %cfg.bind_addr(),
        "blog api starting"
    );

    // server::run returns once a shutdown signal arrived and in-flight requests drained
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(
                service = "blog_api",
                event = "stop",
                %service_id,
                pid,
                "blog api stopped normally"
            );
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                service = "blog_api",
                event = "run_failed",
                error = %e,
                "server::run returned error"
            );
            std::process::ExitCode::FAILURE
        }
    }
}
