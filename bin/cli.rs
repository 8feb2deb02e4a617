//! Deploy and operate the oracle and ledger on a live network.
//!
//! Connection settings come from the usual `ODRA_CASPER_LIVENET_*`
//! variables. Deployment parameters can be overridden with:
//! - `YIELD_REBASE_INITIAL_RATE`: initial oracle rate as a percentage (default `10`)
//! - `YIELD_REBASE_INITIAL_SUPPLY`: units issued to the deployer (default `1000000`)
//!
//! A set but malformed override aborts the deployment.

use odra::host::HostEnv;
use odra::prelude::Addressable;
use odra::schema::casper_contract_schema::NamedCLType;
use odra::OdraError;
use serde::Serialize;

use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt, OdraCli,
};

use yield_rebase::feed::{rate_from_percent, supply_from_units};
use yield_rebase::ledger::{RebaseLedger, RebaseLedgerInitArgs};
use yield_rebase::math::ScalingFactor;
use yield_rebase::oracle::{RateOracle, RateOracleInitArgs};

const DEFAULT_INITIAL_RATE: &str = "10";
const DEFAULT_INITIAL_SUPPLY: &str = "1000000";
const DEPLOY_GAS: u64 = 400_000_000_000;
const CALL_GAS: u64 = 5_000_000_000;

/// Deploys the oracle first, then a ledger wired to it
pub struct LedgerDeployScript;

impl DeployScript for LedgerDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        let owner = env.caller();

        let initial_rate = env_or("YIELD_REBASE_INITIAL_RATE", DEFAULT_INITIAL_RATE);
        let initial_rate = rate_from_percent(&initial_rate).map_err(|err| {
            log::error!("invalid YIELD_REBASE_INITIAL_RATE={initial_rate:?}: {err}");
            OdraError::from(err)
        })?;
        let initial_supply = env_or("YIELD_REBASE_INITIAL_SUPPLY", DEFAULT_INITIAL_SUPPLY);
        let initial_supply = supply_from_units(&initial_supply).map_err(|err| {
            log::error!("invalid YIELD_REBASE_INITIAL_SUPPLY={initial_supply:?}: {err}");
            OdraError::from(err)
        })?;

        log::info!("deploying RateOracle with rate {initial_rate} bps");
        let oracle = RateOracle::load_or_deploy(
            env,
            RateOracleInitArgs {
                owner,
                initial_rate,
            },
            container,
            DEPLOY_GAS,
        )?;
        println!("RateOracle deployed at: {:?}", oracle.address());

        log::info!("deploying RebaseLedger with supply {initial_supply}");
        let ledger = RebaseLedger::load_or_deploy(
            env,
            RebaseLedgerInitArgs {
                name: String::from("Yield Rebase Token"),
                symbol: String::from("YRT"),
                decimals: 0,
                initial_supply,
                owner,
                oracle: oracle.address(),
            },
            container,
            DEPLOY_GAS,
        )?;
        println!("RebaseLedger deployed at: {:?}", ledger.address());

        Ok(())
    }
}

/// Value of `key`, or `default` when it is not set
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Pushes a feed value, given as a percentage, into the oracle
pub struct WriteRateScenario;

impl Scenario for WriteRateScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![CommandArg::new(
            "percent",
            "Benchmark rate as a percentage, e.g. 5.33",
            NamedCLType::String,
        )
        .required()]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args,
    ) -> Result<(), Error> {
        let percent = args.get_single::<String>("percent")?;
        let rate = rate_from_percent(&percent).map_err(|err| {
            log::error!("rejected feed value {percent:?}: {err}");
            OdraError::from(err)
        })?;

        let mut oracle = container.contract_ref::<RateOracle>(env)?;
        let previous = oracle.read();
        env.set_gas(CALL_GAS);
        oracle.try_write(rate)?;
        println!("Rate updated: {previous} -> {rate} bps");
        Ok(())
    }
}

impl ScenarioMetadata for WriteRateScenario {
    const NAME: &'static str = "write-rate";
    const DESCRIPTION: &'static str = "Writes a new rate to the oracle";
}

/// Runs a rebase if the interval has elapsed
pub struct RebaseScenario;

impl Scenario for RebaseScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let mut ledger = container.contract_ref::<RebaseLedger>(env)?;
        let stats = ledger.get_stats();
        if !stats.is_rebase_ready {
            println!("Rebase not ready until {}", stats.next_rebase_time);
            return Ok(());
        }
        if !stats.oracle_healthy {
            log::warn!("oracle is paused or stale, rate {} bps", stats.current_rate);
            println!("Rebase skipped, oracle unhealthy");
            return Ok(());
        }

        env.set_gas(CALL_GAS);
        let factor = ledger.try_rebase()?;
        println!(
            "Rebase #{} applied {} bps, scaling factor now {}",
            stats.rebase_count + 1,
            stats.rebase_rate,
            ScalingFactor(factor)
        );
        Ok(())
    }
}

impl ScenarioMetadata for RebaseScenario {
    const NAME: &'static str = "rebase";
    const DESCRIPTION: &'static str = "Rebases the ledger when the interval has elapsed";
}

#[derive(Serialize)]
struct StatsReport {
    last_rebase_time: u64,
    next_rebase_time: u64,
    rebase_count: u64,
    current_rate: u64,
    rebase_rate: u64,
    is_rebase_ready: bool,
    oracle_healthy: bool,
    scaling_factor: String,
    total_supply: String,
}

/// Prints the ledger's rebase statistics as JSON
pub struct StatsScenario;

impl Scenario for StatsScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let ledger = container.contract_ref::<RebaseLedger>(env)?;
        let stats = ledger.get_stats();
        let report = StatsReport {
            last_rebase_time: stats.last_rebase_time,
            next_rebase_time: stats.next_rebase_time,
            rebase_count: stats.rebase_count,
            current_rate: stats.current_rate,
            rebase_rate: stats.rebase_rate,
            is_rebase_ready: stats.is_rebase_ready,
            oracle_healthy: stats.oracle_healthy,
            scaling_factor: ScalingFactor(stats.scaling_factor).to_string(),
            total_supply: ledger.total_supply().to_string(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("failed to render stats: {err}"),
        }
        Ok(())
    }
}

impl ScenarioMetadata for StatsScenario {
    const NAME: &'static str = "stats";
    const DESCRIPTION: &'static str = "Prints rebase statistics of the ledger";
}

/// Main function
pub fn main() {
    OdraCli::new()
        .about("CLI tool for the yield rebase ledger")
        .deploy(LedgerDeployScript)
        .contract::<RateOracle>()
        .contract::<RebaseLedger>()
        .scenario(WriteRateScenario)
        .scenario(RebaseScenario)
        .scenario(StatsScenario)
        .build()
        .run();
}
