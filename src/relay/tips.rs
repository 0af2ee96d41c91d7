//! Tip account selection.

use rand::seq::SliceRandom;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;

use crate::error::{BundleError, BundleResult};
use crate::relay::transport::BundleRelay;

/// Pick one account uniformly at random.
pub fn choose_tip_account(accounts: &[Pubkey]) -> Option<Pubkey> {
    accounts.choose(&mut rand::thread_rng()).copied()
}

/// Fetch the relay's tip accounts and pick one.
pub async fn pick_tip_account(
    relay: &dyn BundleRelay,
    authorization: Option<&str>,
) -> BundleResult<Pubkey> {
    let accounts = relay.get_tip_accounts(authorization).await?;
    let account = choose_tip_account(&accounts).ok_or(BundleError::NoTipAccounts)?;
    tracing::debug!(tip_account = %account, candidates = accounts.len(), "Tip account selected");
    Ok(account)
}

/// System transfer of `lamports` from `from` to `tip_account`.
pub fn tip_instruction(from: &Pubkey, tip_account: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(from, tip_account, lamports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::system_program;

    #[test]
    fn test_choose_from_empty() {
        assert!(choose_tip_account(&[]).is_none());
    }

    #[test]
    fn test_choose_returns_member() {
        let accounts: Vec<Pubkey> = (0..8).map(|_| Pubkey::new_unique()).collect();
        for _ in 0..32 {
            let picked = choose_tip_account(&accounts).unwrap();
            assert!(accounts.contains(&picked));
        }
    }

    #[test]
    fn test_tip_instruction_is_transfer() {
        let from = Pubkey::new_unique();
        let tip = Pubkey::new_unique();
        let ix = tip_instruction(&from, &tip, 10_000);
        assert_eq!(ix.program_id, system_program::id());
        assert_eq!(ix.accounts[0].pubkey, from);
        assert_eq!(ix.accounts[1].pubkey, tip);
    }
}
