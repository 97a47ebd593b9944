//! Secret code generation.
//!
//! The [`SecretGenerator`] trait is the seam the game and room services
//! depend on, and the one tests substitute with a fixed-secret
//! implementation. Two production implementations:
//!
//! - [`LocalGenerator`] — uniform sampling from the process RNG
//! - [`RemoteGenerator`] — fetches raw digits from an external entropy
//!   service within a timeout, falling back to local generation on ANY
//!   failure. Generator failures never propagate to callers.
//!
//! [`ConfiguredGenerator`] picks between the two at wiring time.

#![allow(async_fn_in_trait)]

use codebreak_domain::{Code, EntropyConfig, GameConfig};
use rand::Rng;

/// Produces secrets under the configured digit policy.
///
/// `Send + Sync + 'static` so a generator can be shared by the services
/// across Tokio tasks for the process lifetime. Infallible by contract:
/// implementations recover internally (see [`RemoteGenerator`]).
pub trait SecretGenerator: Send + Sync + 'static {
    /// Produces one fresh secret.
    fn generate(&self) -> impl std::future::Future<Output = Code> + Send;
}

// ---------------------------------------------------------------------------
// LocalGenerator
// ---------------------------------------------------------------------------

/// Samples digits uniformly, one at a time, re-drawing on a duplicate
/// collision when the policy disallows duplicates.
#[derive(Debug, Clone)]
pub struct LocalGenerator {
    config: GameConfig,
}

impl LocalGenerator {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    fn sample(&self) -> Code {
        let mut rng = rand::rng();
        let mut digits = Vec::with_capacity(self.config.code_length);
        while digits.len() < self.config.code_length {
            let d: u8 = rng.random_range(self.config.min_digit..=self.config.max_digit);
            if self.config.allow_duplicates || !digits.contains(&d) {
                digits.push(d);
            }
        }
        // The loop samples within the policy, so this cannot fail.
        Code::new(digits, &self.config).expect("sampled digits satisfy the policy")
    }
}

impl SecretGenerator for LocalGenerator {
    async fn generate(&self) -> Code {
        self.sample()
    }
}

// ---------------------------------------------------------------------------
// RemoteGenerator
// ---------------------------------------------------------------------------

/// Why a remote fetch was abandoned. Internal only; the caller never
/// sees it because the fallback swallows it after logging.
#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("http client unavailable")]
    ClientUnavailable,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("entropy source returned status {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("malformed entropy payload: {0}")]
    Malformed(String),

    #[error("entropy payload violates digit policy: {0}")]
    Policy(#[from] codebreak_domain::DigitsError),
}

/// Fetches raw digits from a plain-text integer service.
///
/// The request is bounded by the configured timeout. Digits that already
/// satisfy the duplicate policy are accepted verbatim; anything else,
/// including transport failures, timeouts, bad statuses and unparseable
/// bodies, degrades silently to [`LocalGenerator`].
#[derive(Debug, Clone)]
pub struct RemoteGenerator {
    config: GameConfig,
    entropy: EntropyConfig,
    /// `None` when the HTTP client could not be constructed; every
    /// generate call then takes the fallback path.
    client: Option<reqwest::Client>,
    fallback: LocalGenerator,
}

impl RemoteGenerator {
    pub fn new(config: GameConfig, entropy: EntropyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(entropy.timeout)
            .build()
            .ok();
        if client.is_none() {
            tracing::warn!("failed to build entropy http client, remote generation disabled");
        }
        Self {
            fallback: LocalGenerator::new(config.clone()),
            config,
            entropy,
            client,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}?num={}&min={}&max={}&col=1&base=10&format=plain&rnd=new",
            self.entropy.base_url,
            self.config.code_length,
            self.config.min_digit,
            self.config.max_digit,
        )
    }

    async fn fetch(&self) -> Result<Code, FetchError> {
        let client = self.client.as_ref().ok_or(FetchError::ClientUnavailable)?;
        let response = client.get(self.url()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::BadStatus(response.status()));
        }

        let body = response.text().await?;
        let mut digits = Vec::with_capacity(self.config.code_length);
        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let digit: u8 = line
                .parse()
                .map_err(|_| FetchError::Malformed(format!("not a digit: {line:?}")))?;
            digits.push(digit);
        }

        // Code::new enforces length, range and the duplicate policy; a
        // payload that fails any of them is discarded.
        Ok(Code::new(digits, &self.config)?)
    }
}

impl SecretGenerator for RemoteGenerator {
    async fn generate(&self) -> Code {
        match self.fetch().await {
            Ok(code) => code,
            Err(error) => {
                tracing::warn!(%error, "entropy fetch failed, using local generation");
                self.fallback.generate().await
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ConfiguredGenerator
// ---------------------------------------------------------------------------

/// Runtime selection between remote and local generation.
///
/// Built once at wiring time from the [`GameConfig`]: an entropy endpoint
/// in the config selects the remote path, otherwise generation stays
/// local.
#[derive(Debug, Clone)]
pub enum ConfiguredGenerator {
    Local(LocalGenerator),
    Remote(RemoteGenerator),
}

impl ConfiguredGenerator {
    pub fn from_config(config: &GameConfig) -> Self {
        match &config.entropy {
            Some(entropy) => {
                Self::Remote(RemoteGenerator::new(config.clone(), entropy.clone()))
            }
            None => Self::Local(LocalGenerator::new(config.clone())),
        }
    }
}

impl SecretGenerator for ConfiguredGenerator {
    async fn generate(&self) -> Code {
        match self {
            Self::Local(local) => local.generate().await,
            Self::Remote(remote) => remote.generate().await,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
