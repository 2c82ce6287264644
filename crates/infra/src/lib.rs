mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{DeleteResult, IOccurrenceRepo, IReminderRepo, IUserRepo, Repos};
pub use services::*;
use std::sync::Arc;
use std::time::Duration;
pub use system::ISys;
use system::RealSys;
use tracing::{error, warn};

#[derive(Clone)]
pub struct MealmindContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub push_gateway: Arc<dyn IPushGateway>,
    pub text_extractor: Arc<dyn ITextExtractor>,
}

impl MealmindContext {
    fn create(config: Config) -> Self {
        let push_gateway = create_push_gateway(&config);
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            push_gateway,
            text_extractor: Arc::new(StubTextExtractor::new()),
        }
    }
}

fn create_push_gateway(config: &Config) -> Arc<dyn IPushGateway> {
    match &config.push_gateway_url {
        Some(url) => {
            let timeout = Duration::from_secs(config.dispatch_timeout_secs);
            match HttpPushGateway::new(url, timeout) {
                Ok(gateway) => Arc::new(gateway),
                Err(e) => {
                    error!(
                        "Unable to create push gateway client for {}: {:?}. Falling back to stub.",
                        url, e
                    );
                    Arc::new(StubPushGateway::new())
                }
            }
        }
        None => {
            warn!("No PUSH_GATEWAY_URL set. Sends will be recorded in-memory only.");
            Arc::new(StubPushGateway::new())
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> MealmindContext {
    MealmindContext::create(Config::new())
}
