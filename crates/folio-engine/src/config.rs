//! Configuration types for folio.
//!
//! This module defines the configuration file schema (endpoints, request
//! timeout, profile) and the explicit [`ChatConfig`] the conversation
//! controller is constructed with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration for folio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Which endpoint to talk to when no explicit URL is set.
    #[serde(default)]
    pub environment: Environment,

    /// Endpoint per environment.
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Explicit endpoint URL; overrides `environment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_url: Option<String>,

    /// Request timeout in seconds. 0 waits forever.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Whose portfolio this is.
    #[serde(default)]
    pub profile: Profile,

    /// Replaces the default system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_timeout() -> u64 {
    60
}

/// Deployment environment, used to pick an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local chat backend.
    Development,
    /// Deployed chat backend.
    #[default]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Chat endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_development_url")]
    pub development: String,
    #[serde(default = "default_production_url")]
    pub production: String,
}

fn default_development_url() -> String {
    "http://127.0.0.1:3000/api/chat".into()
}

fn default_production_url() -> String {
    "https://bhargavi-chat.vercel.app/api/chat".into()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            development: default_development_url(),
            production: default_production_url(),
        }
    }
}

/// Portfolio owner details shown on the home screen and used in chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Full display name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Name the assistant uses in conversation.
    #[serde(default = "default_short_name")]
    pub short_name: String,

    #[serde(default = "default_tagline")]
    pub tagline: String,

    #[serde(default = "default_location")]
    pub location: String,

    /// Address offered when the chat service is unreachable.
    #[serde(default = "default_email")]
    pub email: String,
}

fn default_name() -> String {
    "Bhargavi Arya Siva".into()
}

fn default_short_name() -> String {
    "Bhargavi".into()
}

fn default_tagline() -> String {
    "AI/ML Engineer • Data Scientist • Analytics Storyteller".into()
}

fn default_location() -> String {
    "Tallahassee, FL, USA".into()
}

fn default_email() -> String {
    "bhargaviarya11@gmail.com".into()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: default_name(),
            short_name: default_short_name(),
            tagline: default_tagline(),
            location: default_location(),
            email: default_email(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Select an environment.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Pin the endpoint to an explicit URL.
    #[must_use]
    pub fn with_transport_url(mut self, url: impl Into<String>) -> Self {
        self.transport_url = Some(url.into());
        self
    }

    /// The endpoint requests will be sent to.
    pub fn resolve_url(&self) -> &str {
        if let Some(url) = &self.transport_url {
            return url;
        }
        match self.environment {
            Environment::Development => &self.endpoints.development,
            Environment::Production => &self.endpoints.production,
        }
    }

    /// Request timeout, or `None` to wait indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    /// Build the controller configuration.
    pub fn chat_config(&self) -> ChatConfig {
        let mut chat = ChatConfig::for_profile(self.resolve_url(), &self.profile);
        if let Some(prompt) = &self.system_prompt {
            chat.system_prompt.clone_from(prompt);
        }
        chat
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            endpoints: Endpoints::default(),
            transport_url: None,
            timeout_seconds: default_timeout(),
            profile: Profile::default(),
            system_prompt: None,
        }
    }
}

/// Everything the conversation controller needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Endpoint the transport posts to.
    pub transport_url: String,
    /// Fixed instruction sent ahead of every transcript.
    pub system_prompt: String,
    /// Seeded first message of every session.
    pub greeting: String,
    /// Reply shown when the endpoint cannot be reached.
    pub unreachable_message: String,
}

impl ChatConfig {
    /// Standard texts for a portfolio owner.
    pub fn for_profile(transport_url: impl Into<String>, profile: &Profile) -> Self {
        let name = &profile.short_name;
        Self {
            transport_url: transport_url.into(),
            system_prompt: format!("You are {name}'s helpful assistant."),
            greeting: format!("Hi! I'm {name}'s assistant. How can I help?"),
            unreachable_message: format!(
                "I couldn't reach the chat service right now. Please email {name} at {}.",
                profile.email
            ),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Environment name that is neither development nor production.
    #[error("Unknown environment: {0} (expected development or production)")]
    UnknownEnvironment(String),
}
