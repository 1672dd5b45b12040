//! Associated token accounts.
//!
//! An associated token account is the program-derived address of
//! `[owner, token_program_id, mint]` under the associated token program.
//! Anyone can compute it from the owner and mint alone, so wallets can
//! locate a user's account for any token without a registry.

use tracing::debug;

use crate::crypto::{find_program_address, PdaError, Pubkey};

/// `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0; 32]);

/// `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133,
    237, 95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// `TokenzQdBNbLqP5VEhdkAS6EHFLe5nmdTGp8Xdxq8JH`
pub const TOKEN_2022_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    6, 221, 246, 225, 238, 117, 143, 222, 24, 66, 93, 188, 228, 108, 205, 218, 182, 26, 235,
    251, 138, 6, 42, 128, 238, 187, 52, 43, 139, 8, 130, 86,
]);

/// `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153,
    218, 255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// Wrapped SOL: `So11111111111111111111111111111111111111112`
pub const NATIVE_MINT: Pubkey = Pubkey::new_from_array([
    6, 155, 136, 87, 254, 171, 129, 132, 251, 104, 127, 99, 70, 24, 192, 53, 218, 196, 57, 220,
    26, 235, 59, 85, 152, 160, 240, 0, 0, 0, 0, 1,
]);

/// Errors that can occur while deriving an associated token address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token owner {0} is off curve")]
    OwnerOffCurve(Pubkey),

    #[error(transparent)]
    Derivation(#[from] PdaError),
}

/// Derives the associated token account address and bump seed for the
/// given owner, mint, associated token program and token program.
pub fn get_associated_token_address_and_bump_seed(
    owner: &Pubkey,
    mint: &Pubkey,
    program_id: &Pubkey,
    token_program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    let (address, bump) = find_program_address(
        &[owner.as_ref(), token_program_id.as_ref(), mint.as_ref()],
        program_id,
    )?;
    debug!(%owner, %mint, %address, bump, "derived associated token address");
    Ok((address, bump))
}

/// Derives the associated token account address for the given owner and
/// mint under the original token program.
pub fn get_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey, PdaError> {
    get_associated_token_address_with_program_id(owner, mint, &TOKEN_PROGRAM_ID)
}

/// Derives the associated token account address for the given owner, mint
/// and token program id.
pub fn get_associated_token_address_with_program_id(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program_id: &Pubkey,
) -> Result<Pubkey, PdaError> {
    get_associated_token_address_and_bump_seed(
        owner,
        mint,
        &ASSOCIATED_TOKEN_PROGRAM_ID,
        token_program_id,
    )
    .map(|(address, _)| address)
}

/// Like [`get_associated_token_address_and_bump_seed`], but rejects owners
/// that are not on the curve unless `allow_owner_off_curve` is set.
///
/// An off-curve owner is itself a program-derived address; wallets usually
/// treat that as a mistake.
pub fn get_associated_token_address_checked(
    owner: &Pubkey,
    mint: &Pubkey,
    allow_owner_off_curve: bool,
    program_id: &Pubkey,
    token_program_id: &Pubkey,
) -> Result<(Pubkey, u8), TokenError> {
    if !allow_owner_off_curve && !owner.is_on_curve() {
        return Err(TokenError::OwnerOffCurve(*owner));
    }
    Ok(get_associated_token_address_and_bump_seed(
        owner,
        mint,
        program_id,
        token_program_id,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{create_program_address, Keypair};
    use proptest::prelude::*;

    fn key(s: &str) -> Pubkey {
        s.parse().unwrap()
    }

    #[test]
    fn test_well_known_ids() {
        assert_eq!(SYSTEM_PROGRAM_ID, key("11111111111111111111111111111111"));
        assert_eq!(TOKEN_PROGRAM_ID, key("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"));
        assert_eq!(TOKEN_2022_PROGRAM_ID, key("TokenzQdBNbLqP5VEhdkAS6EHFLe5nmdTGp8Xdxq8JH"));
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID,
            key("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL")
        );
        assert_eq!(NATIVE_MINT, key("So11111111111111111111111111111111111111112"));
    }

    #[test]
    fn test_native_mint_address() {
        let owner = key("nisxRxKkjLXt1qyJ1VfwYX9AjyyRehEhQTdmFEiUo26");
        let (address, bump) = get_associated_token_address_and_bump_seed(
            &owner,
            &NATIVE_MINT,
            &ASSOCIATED_TOKEN_PROGRAM_ID,
            &TOKEN_PROGRAM_ID,
        )
        .unwrap();
        assert_eq!(address, key("ApMFHdM1fohWjMpYEWWRsbxGJDFL3FqA6oe9GEGa8dbQ"));
        assert_eq!(bump, 249);

        let owner = key("CsfCXcswe5pjoW6M7rgAhXz1GRPAGAYsESozFFPg6AeY");
        assert_eq!(
            get_associated_token_address(&owner, &NATIVE_MINT).unwrap(),
            key("A8QkUQWihGvC1cgFsJudjQwcv2Ubb3i4MTUmwPybpurm")
        );

        let owner = key("2V42XoRgBR5aimAB9RDRzPS18yZcjAiN28pWqMcU8Fmq");
        assert_eq!(
            get_associated_token_address(&owner, &NATIVE_MINT).unwrap(),
            key("DEAGK4KynGGwihPzZDgngtcnSjJAfNE2gW9n5gei7p9n")
        );
    }

    #[test]
    fn test_seeded_owner() {
        let owner = Keypair::from_seed(&[0u8; 32]).pubkey();
        assert_eq!(
            get_associated_token_address(&owner, &NATIVE_MINT).unwrap(),
            key("CPHrwQRhEL2w1TPk4EZVV9NjEZH44Q4Dr5hfWA9HC4fM")
        );
    }

    #[test]
    fn test_bump_recreates_address() {
        let owner = key("nisxRxKkjLXt1qyJ1VfwYX9AjyyRehEhQTdmFEiUo26");
        let (address, bump) = get_associated_token_address_and_bump_seed(
            &owner,
            &NATIVE_MINT,
            &ASSOCIATED_TOKEN_PROGRAM_ID,
            &TOKEN_PROGRAM_ID,
        )
        .unwrap();
        let recreated = create_program_address(
            &[
                owner.as_ref(),
                TOKEN_PROGRAM_ID.as_ref(),
                NATIVE_MINT.as_ref(),
                &[bump],
            ],
            &ASSOCIATED_TOKEN_PROGRAM_ID,
        )
        .unwrap();
        assert_eq!(recreated, address);
    }

    #[test]
    fn test_token_program_changes_address() {
        let owner = key("nisxRxKkjLXt1qyJ1VfwYX9AjyyRehEhQTdmFEiUo26");
        let classic = get_associated_token_address(&owner, &NATIVE_MINT).unwrap();
        let token_2022 =
            get_associated_token_address_with_program_id(&owner, &NATIVE_MINT, &TOKEN_2022_PROGRAM_ID)
                .unwrap();
        assert_ne!(classic, token_2022);
    }

    fn checked(owner: &Pubkey, allow_owner_off_curve: bool) -> Result<(Pubkey, u8), TokenError> {
        get_associated_token_address_checked(
            owner,
            &NATIVE_MINT,
            allow_owner_off_curve,
            &ASSOCIATED_TOKEN_PROGRAM_ID,
            &TOKEN_PROGRAM_ID,
        )
    }

    #[test]
    fn test_checked_on_curve_owner() {
        let owner = key("nisxRxKkjLXt1qyJ1VfwYX9AjyyRehEhQTdmFEiUo26");
        let expected = (key("ApMFHdM1fohWjMpYEWWRsbxGJDFL3FqA6oe9GEGa8dbQ"), 249);
        assert_eq!(checked(&owner, false), Ok(expected));
        assert_eq!(checked(&owner, true), Ok(expected));
    }

    #[test]
    fn test_checked_off_curve_owner_rejected() {
        // An associated token account is itself off the curve.
        let owner = key("ApMFHdM1fohWjMpYEWWRsbxGJDFL3FqA6oe9GEGa8dbQ");
        assert!(!owner.is_on_curve());
        assert_eq!(checked(&owner, false), Err(TokenError::OwnerOffCurve(owner)));
    }

    #[test]
    fn test_checked_off_curve_owner_allowed() {
        let owner = key("ApMFHdM1fohWjMpYEWWRsbxGJDFL3FqA6oe9GEGa8dbQ");
        let (address, bump) = checked(&owner, true).unwrap();
        assert_eq!(
            (address, bump),
            get_associated_token_address_and_bump_seed(
                &owner,
                &NATIVE_MINT,
                &ASSOCIATED_TOKEN_PROGRAM_ID,
                &TOKEN_PROGRAM_ID,
            )
            .unwrap()
        );
        assert_ne!(address, owner);
    }

    #[test]
    fn test_checked_uses_program_id() {
        let owner = key("nisxRxKkjLXt1qyJ1VfwYX9AjyyRehEhQTdmFEiUo26");
        let (address, _) = get_associated_token_address_checked(
            &owner,
            &NATIVE_MINT,
            false,
            &SYSTEM_PROGRAM_ID,
            &TOKEN_PROGRAM_ID,
        )
        .unwrap();
        assert_ne!(address, key("ApMFHdM1fohWjMpYEWWRsbxGJDFL3FqA6oe9GEGa8dbQ"));
    }

    proptest! {
        #[test]
        fn test_derivation_is_deterministic(owner in any::<[u8; 32]>(), mint in any::<[u8; 32]>()) {
            let owner = Pubkey::new_from_array(owner);
            let mint = Pubkey::new_from_array(mint);
            let first = get_associated_token_address(&owner, &mint).unwrap();
            let second = get_associated_token_address(&owner, &mint).unwrap();
            prop_assert_eq!(first, second);
            prop_assert!(!first.is_on_curve());
        }

        #[test]
        fn test_distinct_inputs_distinct_addresses(
            owner in any::<[u8; 32]>(),
            mint_a in any::<[u8; 32]>(),
            mint_b in any::<[u8; 32]>(),
        ) {
            prop_assume!(mint_a != mint_b);
            let owner = Pubkey::new_from_array(owner);
            let a = get_associated_token_address(&owner, &Pubkey::new_from_array(mint_a)).unwrap();
            let b = get_associated_token_address(&owner, &Pubkey::new_from_array(mint_b)).unwrap();
            prop_assert_ne!(a, b);
        }
    }
}
