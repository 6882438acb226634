use super::{Operation, Transaction};
use crate::types::SimulationSuccess;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("only contract invocations can be assembled")]
    NotContractInvocation,
    #[error("total fee overflows: inclusion fee {inclusion_fee} + resource fee {resource_fee}")]
    FeeOverflow { inclusion_fee: u64, resource_fee: u64 },
}

/// Attaches the simulated resource declaration to a transaction.
///
/// The total fee becomes the declared inclusion fee plus the minimum resource
/// fee reported by simulation. Assembling an already assembled transaction
/// replaces the previous declaration instead of stacking fees. Authorization
/// entries recorded by simulation are attached unless the invocation already
/// carries its own.
pub fn assemble(
    mut tx: Transaction,
    simulation: &SimulationSuccess,
) -> Result<Transaction, AssembleError> {
    let inclusion_fee = tx.inclusion_fee() as u64;
    let resource_fee = simulation.min_resource_fee;
    let overflow = AssembleError::FeeOverflow { inclusion_fee, resource_fee };

    let Operation::InvokeContract(call) = &mut tx.operation else {
        return Err(AssembleError::NotContractInvocation)
    };
    if call.auth.is_empty() {
        call.auth = simulation.auth.clone();
    }

    tx.fee = inclusion_fee
        .checked_add(resource_fee)
        .and_then(|total| u32::try_from(total).ok())
        .ok_or_else(|| overflow.clone())?;

    let mut data = simulation.transaction_data.clone();
    data.resource_fee = i64::try_from(resource_fee).map_err(|_| overflow)?;
    tx.soroban_data = Some(data);
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::{
            transaction::{TransactionBuilder, CONTRACT_FEE},
            Account, Address, InvokeContract, Network, Operation, Payment, SimulationCost,
            SorobanData,
        },
        value::ContractValue,
    };
    use stellar_xdr::curr::{
        ContractDataDurability, ExtensionPoint, Hash, InvokeContractArgs, LedgerFootprint,
        LedgerKey, LedgerKeyContractData, ScAddress, ScSymbol, ScVal, SorobanAddressCredentials,
        SorobanAuthorizationEntry, SorobanAuthorizedFunction, SorobanAuthorizedInvocation,
        SorobanCredentials, SorobanResources,
    };

    fn balance_key() -> LedgerKey {
        LedgerKey::ContractData(LedgerKeyContractData {
            contract: ScAddress::Contract(Hash([2u8; 32])),
            key: ScVal::Symbol(ScSymbol(b"Balance".to_vec().try_into().unwrap())),
            durability: ContractDataDurability::Persistent,
        })
    }

    fn source_auth() -> SorobanAuthorizationEntry {
        SorobanAuthorizationEntry {
            credentials: SorobanCredentials::SourceAccount,
            root_invocation: SorobanAuthorizedInvocation {
                function: SorobanAuthorizedFunction::ContractFn(InvokeContractArgs {
                    contract_address: ScAddress::Contract(Hash([2u8; 32])),
                    function_name: ScSymbol(b"claim_faucet".to_vec().try_into().unwrap()),
                    args: Default::default(),
                }),
                sub_invocations: Default::default(),
            },
        }
    }

    fn simulation(min_resource_fee: u64) -> SimulationSuccess {
        SimulationSuccess {
            latest_ledger: 10,
            min_resource_fee,
            cost: SimulationCost { cpu_insns: 1_000, mem_bytes: 2_000 },
            transaction_data: SorobanData {
                ext: ExtensionPoint::V0,
                resources: SorobanResources {
                    footprint: LedgerFootprint {
                        read_only: Default::default(),
                        read_write: vec![balance_key()].try_into().unwrap(),
                    },
                    instructions: 1_000,
                    read_bytes: 100,
                    write_bytes: 50,
                },
                resource_fee: 0,
            },
            return_value: ContractValue::Void,
            auth: vec![source_auth()],
        }
    }

    fn build(operation: Operation) -> Transaction {
        TransactionBuilder::new(Account::new(Address::account([1u8; 32]), 0), Network::Testnet.passphrase())
            .fee(CONTRACT_FEE)
            .operation(operation)
            .build_at(0)
            .unwrap()
    }

    fn invoke() -> Operation {
        Operation::InvokeContract(InvokeContract::new(Address::contract([2u8; 32]), "claim_faucet", vec![]))
    }

    #[test]
    fn adds_resource_fee() {
        let tx = assemble(build(invoke()), &simulation(52_341)).unwrap();
        assert_eq!(tx.fee, CONTRACT_FEE + 52_341);
        assert_eq!(tx.inclusion_fee(), CONTRACT_FEE);
        let data = tx.soroban_data.clone().unwrap();
        assert_eq!(data.resource_fee, 52_341);
        assert_eq!(data.resources.footprint.read_write.to_vec(), vec![balance_key()]);
        assert_eq!(tx.operation.as_invocation().unwrap().auth, vec![source_auth()]);
    }

    #[test]
    fn keeps_explicit_auth() {
        let mut op = invoke();
        if let Operation::InvokeContract(call) = &mut op {
            call.auth = vec![SorobanAuthorizationEntry {
                credentials: SorobanCredentials::Address(SorobanAddressCredentials {
                    address: ScAddress::Contract(Hash([8u8; 32])),
                    nonce: 1,
                    signature_expiration_ledger: 100,
                    signature: ScVal::Void,
                }),
                ..source_auth()
            }];
        }
        let tx = assemble(build(op.clone()), &simulation(10)).unwrap();
        assert_eq!(tx.operation, op);
    }

    #[test]
    fn reassembly_does_not_stack_fees() {
        let once = assemble(build(invoke()), &simulation(1_000)).unwrap();
        let twice = assemble(once, &simulation(3_000)).unwrap();
        assert_eq!(twice.fee, CONTRACT_FEE + 3_000);
    }

    #[test]
    fn rejects_payments_and_overflow() {
        let pay = Operation::Payment(Payment { destination: Address::account([3u8; 32]), amount: 5 });
        assert_eq!(
            assemble(build(pay), &simulation(1)).unwrap_err(),
            AssembleError::NotContractInvocation
        );
        assert!(matches!(
            assemble(build(invoke()), &simulation(u32::MAX as u64)),
            Err(AssembleError::FeeOverflow { .. })
        ));
    }
}
