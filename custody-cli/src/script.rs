//! Operation scripts replayed against a freshly deployed wallet.
//!
//! A script is a JSON array of operations, for example:
//!
//! ```json
//! [
//!   { "create":  { "caller": "alice", "amount": 100, "recipient": "erin" } },
//!   { "approve": { "caller": "alice", "id": 0 } },
//!   { "deposit": { "amount": 500 } }
//! ]
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use custody_common::{config::WalletConfig, Amount, Identity, TransferId};
use custody_ledger::{ApprovalEngine, FundCustody, TransferOutcome, TransferRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Deposit {
        amount: Amount,
    },
    Create {
        caller: Identity,
        amount: Amount,
        recipient: Identity,
    },
    Approve {
        caller: Identity,
        id: TransferId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResult {
    Deposited { pool: Amount },
    Created { id: TransferId },
    Approved(TransferOutcome),
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub operation: Operation,
    pub result: StepResult,
}

/// Final state of the wallet after a script run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub transfers: Vec<TransferRequest>,
    pub pool_balance: Amount,
    pub recipient_balances: BTreeMap<Identity, Amount>,
}

pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<Operation>, CliError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Applies `operations` in order. Each operation is atomic on its own, so a
/// failed step is recorded and the run moves on unless `fail_fast` is set.
pub fn run_script<C: FundCustody>(
    engine: &mut ApprovalEngine<C>,
    operations: &[Operation],
    fail_fast: bool,
) -> Result<Vec<StepReport>, CliError> {
    let mut steps = Vec::with_capacity(operations.len());

    for (step, operation) in operations.iter().enumerate() {
        let outcome = match operation {
            Operation::Deposit { amount } => engine
                .deposit(*amount)
                .map(|_| StepResult::Deposited { pool: engine.balance() }),
            Operation::Create { caller, amount, recipient } => engine
                .create_transfer(caller, *amount, recipient.clone())
                .map(|id| StepResult::Created { id }),
            Operation::Approve { caller, id } => {
                engine.approve_transfer(caller, *id).map(StepResult::Approved)
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(e) if fail_fast => return Err(CliError::Step { step, source: e }),
            Err(e) => {
                warn!("⚠️ Step {} failed: {}", step, e);
                StepResult::Failed { reason: e.to_string() }
            }
        };

        steps.push(StepReport {
            step,
            operation: operation.clone(),
            result,
        });
    }

    info!("📜 Script finished: {} steps", steps.len());
    Ok(steps)
}

/// Deploys a wallet from `config`, replays `script` against it and returns
/// the final report. Backs `custody run`.
pub fn run_wallet<P: AsRef<Path>, Q: AsRef<Path>>(
    config: P,
    script: Q,
    fail_fast: bool,
) -> Result<RunReport, CliError> {
    let config = WalletConfig::load_from_file(config)?;
    let mut engine = ApprovalEngine::from_config(&config)?;
    let operations = load_script(&script)?;
    info!(
        "📜 Replaying {} operations from {}",
        operations.len(),
        script.as_ref().display()
    );

    let steps = run_script(&mut engine, &operations, fail_fast)?;
    Ok(build_report(&engine, steps))
}

pub fn build_report(engine: &ApprovalEngine, steps: Vec<StepReport>) -> RunReport {
    let recipient_balances = engine
        .custody()
        .accounts()
        .iter()
        .map(|(id, amount)| (id.clone(), *amount))
        .collect();

    RunReport {
        steps,
        transfers: engine.get_transfers(),
        pool_balance: engine.balance(),
        recipient_balances,
    }
}
