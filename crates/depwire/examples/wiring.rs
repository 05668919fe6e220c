//! Example: wiring a small application graph
//!
//! Run with `RUST_LOG=depwire=debug` to watch registration and resolution, and
//! `DEPWIRE_MAX_DEPTH` to override the resolution depth limit.

use std::sync::Arc;

use depwire::{
    injectable, ConfigTrait, ContainerBuilder, ContainerConfig, ContainerError,
    VisualizationFormat,
};
use tracing_subscriber::EnvFilter;

trait Transport: Send + Sync {
    fn deliver(&self, to: &str, body: &str) -> String;
}

struct SmtpTransport {
    host: String,
}

impl Transport for SmtpTransport {
    fn deliver(&self, to: &str, body: &str) -> String {
        format!("smtp://{} -> {}: {}", self.host, to, body)
    }
}

trait Templates: Send + Sync {
    fn render(&self, name: &str) -> String;
}

struct StaticTemplates;

impl Templates for StaticTemplates {
    fn render(&self, name: &str) -> String {
        format!("Welcome aboard, {}!", name)
    }
}

struct Mailer {
    transport: Arc<dyn Transport>,
    templates: Arc<dyn Templates>,
}

#[injectable]
impl Mailer {
    #[inject]
    fn new(transport: Arc<dyn Transport>, templates: Arc<dyn Templates>) -> Self {
        Self {
            transport,
            templates,
        }
    }

    fn welcome(&self, user: &str) -> String {
        self.transport
            .deliver(user, &self.templates.render(user))
    }
}

struct SignupService {
    mailer: Arc<Mailer>,
}

#[injectable]
impl SignupService {
    #[inject]
    fn new(mailer: Arc<Mailer>) -> Self {
        Self { mailer }
    }

    fn signup(&self, user: &str) -> String {
        self.mailer.welcome(user)
    }
}

fn main() -> Result<(), ContainerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ContainerConfig::from_env()?;
    tracing::info!("Resolution depth limit: {}", config.max_depth);

    let container = ContainerBuilder::new()
        .with_config(config)?
        .add_singleton::<dyn Transport, _>(|| {
            Arc::new(SmtpTransport {
                host: "mail.example.com".to_string(),
            })
        })
        .add_instance::<dyn Templates>(Arc::new(StaticTemplates))
        .add_type::<Mailer>()?
        .add_type::<SignupService>()?
        .build()?;

    let signups = container.get::<SignupService>()?;
    println!("{}", signups.signup("ada@example.com"));

    println!("{}", container.visualize(VisualizationFormat::Ascii)?);
    Ok(())
}
