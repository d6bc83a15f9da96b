//! Engine configuration with TOML file support.

use pledge_types::{Address, Deployment, Distribution, EconomicParams, StakeMode};
use serde::{Deserialize, Serialize};

use crate::SettlementError;

/// Read-only view of payout configuration consulted at every settlement.
pub trait SettlementConfig: Send + Sync {
    fn distribution(&self) -> Distribution;
    fn treasury(&self) -> Address;
    fn charity(&self) -> Address;
}

/// Configuration for one engine deployment.
///
/// Can be loaded from a TOML file via [`PledgeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeConfig {
    /// Single-stake or multi-stake addressing.
    #[serde(default)]
    pub mode: StakeMode,

    /// Host chain identifier bound into attestations.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Contract address bound into attestations.
    #[serde(default = "default_contract")]
    pub contract: Address,

    #[serde(default = "default_treasury")]
    pub treasury: Address,

    #[serde(default = "default_charity")]
    pub charity: Address,

    /// Split of slashed collateral.
    #[serde(default)]
    pub distribution: Distribution,

    #[serde(default)]
    pub economics: EconomicParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_id() -> u64 {
    1
}

fn default_contract() -> Address {
    Address::new("pledge-pool")
}

fn default_treasury() -> Address {
    Address::new("treasury")
}

fn default_charity() -> Address {
    Address::new("charity")
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PledgeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, SettlementError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SettlementError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SettlementError> {
        toml::from_str(s).map_err(|e| SettlementError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SettlementError> {
        toml::to_string_pretty(self).map_err(|e| SettlementError::Config(e.to_string()))
    }

    /// Reject configurations the engine cannot settle under.
    pub fn validate(&self) -> Result<(), SettlementError> {
        self.distribution.validate()?;
        self.economics.validate()?;
        for (name, address) in [
            ("contract", &self.contract),
            ("treasury", &self.treasury),
            ("charity", &self.charity),
        ] {
            if Address::parse(address.as_str()).is_none() {
                return Err(SettlementError::Config(format!(
                    "{name} address {:?} is malformed",
                    address.as_str()
                )));
            }
        }
        Ok(())
    }

    pub fn deployment(&self) -> Deployment {
        Deployment::new(self.chain_id, self.contract.clone())
    }
}

impl Default for PledgeConfig {
    fn default() -> Self {
        Self {
            mode: StakeMode::default(),
            chain_id: default_chain_id(),
            contract: default_contract(),
            treasury: default_treasury(),
            charity: default_charity(),
            distribution: Distribution::default(),
            economics: EconomicParams::default(),
        }
    }
}

impl SettlementConfig for PledgeConfig {
    fn distribution(&self) -> Distribution {
        self.distribution
    }

    fn treasury(&self) -> Address {
        self.treasury.clone()
    }

    fn charity(&self) -> Address {
        self.charity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_types::UNIT;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = PledgeConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = PledgeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = PledgeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.mode, StakeMode::Single);
        assert_eq!(config.distribution, Distribution::default());
        assert_eq!(config.economics.min_token_stake, UNIT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            mode = "multi"
            treasury = "dao-treasury"

            [distribution]
            winner_percent = 50
            treasury_percent = 30
            charity_percent = 20

            [economics]
            proof_grace_secs = 3600
            min_token_stake = "5000000000000000000"
        "#;
        let config = PledgeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.mode, StakeMode::Multi);
        assert_eq!(config.treasury, Address::new("dao-treasury"));
        assert_eq!(config.distribution.winner_percent, 50);
        assert_eq!(config.economics.proof_grace_secs, 3600);
        assert_eq!(config.economics.min_token_stake, 5 * UNIT);
        assert_eq!(config.economics.day_length_secs, 86_400); // default
    }

    #[test]
    fn integer_minimum_accepted() {
        let config =
            PledgeConfig::from_toml_str("[economics]\nmin_native_stake = 1000\n").unwrap();
        assert_eq!(config.economics.min_native_stake, 1000);
    }

    #[test]
    fn bad_distribution_rejected() {
        let mut config = PledgeConfig::default();
        config.distribution.charity_percent = 30;
        assert!(matches!(
            config.validate(),
            Err(SettlementError::Params(_))
        ));
    }

    #[test]
    fn blank_charity_rejected() {
        let config = PledgeConfig::from_toml_str("charity = \"\"").unwrap();
        assert!(matches!(config.validate(), Err(SettlementError::Config(_))));
    }
}
