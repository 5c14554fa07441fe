use anyhow::Result;

use crate::commands::{parse_optional_cdp, SeedArgs};
use crate::docs::seed;
use crate::docs::types::Cdp;
use crate::state::AppState;

/// Run the seed command
pub fn run(state: &AppState, args: SeedArgs) -> Result<()> {
    let cdps = match parse_optional_cdp(args.cdp.as_deref())? {
        Some(cdp) => vec![cdp],
        None => Cdp::ALL.to_vec(),
    };

    for (cdp, count) in seed::seed(&state.store, &cdps)? {
        println!("Seeded {} document(s) for {}", count, cdp);
    }
    Ok(())
}
