use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self as token_interface, Mint, TokenAccount, TokenInterface, TransferChecked};
use crate::errors::ErrorCode;
use crate::helpers::ledger::{Asset, Ledger};

/// Where one asset of a session moves: vault <-> counterparty token account
pub struct VaultRoute<'a, 'info> {
    pub asset: Asset,
    pub mint: &'a InterfaceAccount<'info, Mint>,
    pub vault: &'a InterfaceAccount<'info, TokenAccount>,
    pub counterparty: &'a InterfaceAccount<'info, TokenAccount>,
}

/// `Ledger` backed by SPL token / Token-2022 `transfer_checked` CPIs.
///
/// Transfer-ins are signed by `payer`; transfer-outs are signed by the
/// session PDA that owns every vault.
pub struct TokenLedger<'a, 'info> {
    token_program: &'a Interface<'info, TokenInterface>,
    payer: AccountInfo<'info>,
    vault_authority: AccountInfo<'info>,
    vault_authority_seeds: &'a [&'a [u8]],
    routes: Vec<VaultRoute<'a, 'info>>,
}

impl<'a, 'info> TokenLedger<'a, 'info> {
    pub fn new(
        token_program: &'a Interface<'info, TokenInterface>,
        payer: AccountInfo<'info>,
        vault_authority: AccountInfo<'info>,
        vault_authority_seeds: &'a [&'a [u8]],
    ) -> Self {
        Self {
            token_program,
            payer,
            vault_authority,
            vault_authority_seeds,
            routes: Vec::with_capacity(3),
        }
    }

    pub fn route(
        mut self,
        asset: Asset,
        mint: &'a InterfaceAccount<'info, Mint>,
        vault: &'a InterfaceAccount<'info, TokenAccount>,
        counterparty: &'a InterfaceAccount<'info, TokenAccount>,
    ) -> Self {
        self.routes.push(VaultRoute {
            asset,
            mint,
            vault,
            counterparty,
        });
        self
    }

    fn find(&self, asset: Asset) -> Result<&VaultRoute<'a, 'info>> {
        self.routes
            .iter()
            .find(|r| r.asset == asset)
            .ok_or_else(|| error!(ErrorCode::AssetNotRouted))
    }
}

impl<'a, 'info> Ledger for TokenLedger<'a, 'info> {
    fn transfer_in(&mut self, asset: Asset, from: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*from, self.payer.key(), ErrorCode::UnauthorizedAccess);
        let route = self.find(asset)?;
        require_keys_eq!(route.counterparty.owner, *from, ErrorCode::UnauthorizedAccess);

        token_interface::transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: route.counterparty.to_account_info(),
                    mint: route.mint.to_account_info(),
                    to: route.vault.to_account_info(),
                    authority: self.payer.clone(),
                },
            ),
            amount,
            route.mint.decimals,
        )?;

        #[cfg(feature = "verbose")]
        msg!("transfer_in: {:?} {} from {}", asset, amount, from);

        Ok(())
    }

    fn transfer_out(&mut self, asset: Asset, to: &Pubkey, amount: u64) -> Result<()> {
        let route = self.find(asset)?;
        require_keys_eq!(route.counterparty.owner, *to, ErrorCode::UnauthorizedAccess);

        token_interface::transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: route.vault.to_account_info(),
                    mint: route.mint.to_account_info(),
                    to: route.counterparty.to_account_info(),
                    authority: self.vault_authority.clone(),
                },
                &[self.vault_authority_seeds],
            ),
            amount,
            route.mint.decimals,
        )?;

        #[cfg(feature = "verbose")]
        msg!("transfer_out: {:?} {} to {}", asset, amount, to);

        Ok(())
    }
}
