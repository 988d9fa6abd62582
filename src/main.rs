use std::{env, fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use treasury_ledger::asset::{AccountId, Amount, AssetLedger, InMemoryAsset};
use treasury_ledger::treasury::Treasury;

//==================== State file ====================//

#[derive(Serialize, Deserialize)]
struct StateFile {
    version: u8,
    treasury: Treasury,
    asset: InMemoryAsset,
}

fn load_state(path: &Path) -> StateFile {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", path.display());
            std::process::exit(2);
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("error: invalid state file {}: {err}", path.display());
            std::process::exit(2);
        }
    }
}

fn save_state(path: &Path, state: &StateFile) {
    let json = serde_json::to_vec_pretty(state).expect("state json");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    fs::write(path, json).expect("write state file");
}

//==================== Arg helpers ====================//

fn usage() -> ! {
    eprintln!(
        "Usage:
  treasury init  <state_file> --owner=<id> --treasury=<id> [--symbol=<sym>] [--supply=<n>] [--fund=<n>]
  treasury mint  <state_file> --to=<id> --amount=<n>
  treasury approve <state_file> --owner=<id> --spender=<id> --amount=<n>
  treasury pull  <state_file> --owner=<id> --spender=<id> --to=<id> --amount=<n>

  treasury withdraw <state_file> --caller=<id> --to=<id> --amount=<n>
  treasury increase-allowance <state_file> --caller=<id> --spender=<id> --amount=<n>
  treasury decrease-allowance <state_file> --caller=<id> --spender=<id> --amount=<n>
  treasury reset-allowance    <state_file> --caller=<id> --spender=<id>
  treasury repay <state_file> --caller=<id> --amount=<n>
  treasury transfer-ownership <state_file> --caller=<id> --new-owner=<id>
  treasury show  <state_file> [--account=<id>]

Notes:
  - <state_file> is a JSON snapshot of the asset ledger plus the treasury identities
  - mint/approve/pull act directly on the asset ledger (demo plumbing); a delegate
    must `approve` the treasury on its own balance before it can `repay`
  - identities are free-form strings; the empty string is reserved"
    );
    std::process::exit(1)
}

fn arg_flag(args: &[String], name: &str) -> Option<String> {
    for a in args {
        if let Some(rest) = a.strip_prefix(&format!("--{}=", name)) {
            return Some(rest.to_string());
        }
    }
    None
}

fn require_flag(args: &[String], name: &str) -> String {
    if let Some(v) = arg_flag(args, name) {
        return v;
    }
    eprintln!("error: missing --{name}\n");
    usage();
}

fn parse_amount(name: &str, raw: &str) -> Amount {
    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("error: invalid --{name} (number)");
            std::process::exit(2);
        }
    }
}

fn amount_flag(args: &[String], name: &str) -> Amount {
    let raw = require_flag(args, name);
    parse_amount(name, &raw)
}

fn state_path(args: &[String]) -> (PathBuf, &[String]) {
    if args.is_empty() {
        usage();
    }
    (PathBuf::from(&args[0]), &args[1..])
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1)
}

//==================== Commands ====================//

fn init_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let owner: AccountId = require_flag(rest, "owner");
    let account: AccountId = require_flag(rest, "treasury");
    let symbol = arg_flag(rest, "symbol").unwrap_or_else(|| "USDT".to_string());
    let supply = arg_flag(rest, "supply")
        .map(|raw| parse_amount("supply", &raw))
        .unwrap_or(0);
    let fund = arg_flag(rest, "fund")
        .map(|raw| parse_amount("fund", &raw))
        .unwrap_or(0);

    let treasury = match Treasury::new(owner.clone(), account.clone(), symbol.clone()) {
        Ok(treasury) => treasury,
        Err(err) => fail(err),
    };
    let mut asset = InMemoryAsset::new(symbol);
    if supply > 0 {
        asset.mint(&owner, supply);
    }
    if fund > 0 {
        if let Err(err) = asset.transfer(&owner, &account, fund) {
            fail(err);
        }
    }

    let state = StateFile {
        version: 1,
        treasury,
        asset,
    };
    save_state(&path, &state);
    println!("Initialized treasury state → {}", path.display());
}

fn mint_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let to: AccountId = require_flag(rest, "to");
    let amount = amount_flag(rest, "amount");
    let mut state = load_state(&path);
    state.asset.mint(&to, amount);
    save_state(&path, &state);
    println!("Minted {amount} to {to}");
}

fn approve_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let owner: AccountId = require_flag(rest, "owner");
    let spender: AccountId = require_flag(rest, "spender");
    let amount = amount_flag(rest, "amount");
    let mut state = load_state(&path);
    if let Err(err) = state.asset.approve(&owner, &spender, amount) {
        fail(err);
    }
    save_state(&path, &state);
    println!("Approved {spender} for {amount} on {owner}'s balance");
}

fn pull_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let owner: AccountId = require_flag(rest, "owner");
    let spender: AccountId = require_flag(rest, "spender");
    let to: AccountId = require_flag(rest, "to");
    let amount = amount_flag(rest, "amount");
    let mut state = load_state(&path);
    if let Err(err) = state.asset.transfer_from(&owner, &spender, &to, amount) {
        fail(err);
    }
    save_state(&path, &state);
    println!("Pulled {amount} from {owner} to {to} (spender {spender})");
}

fn withdraw_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let caller: AccountId = require_flag(rest, "caller");
    let to: AccountId = require_flag(rest, "to");
    let amount = amount_flag(rest, "amount");
    let mut state = load_state(&path);
    if let Err(err) = state
        .treasury
        .withdraw(&mut state.asset, &caller, &to, amount)
    {
        fail(err);
    }
    save_state(&path, &state);
    println!(
        "Withdrew {amount} to {to}; treasury balance {}",
        state.treasury.balance(&state.asset)
    );
}

fn increase_allowance_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let caller: AccountId = require_flag(rest, "caller");
    let spender: AccountId = require_flag(rest, "spender");
    let amount = amount_flag(rest, "amount");
    let mut state = load_state(&path);
    let updated = match state
        .treasury
        .increase_allowance(&mut state.asset, &caller, &spender, amount)
    {
        Ok(updated) => updated,
        Err(err) => fail(err),
    };
    save_state(&path, &state);
    println!("Allowance for {spender} is now {updated}");
}

fn decrease_allowance_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let caller: AccountId = require_flag(rest, "caller");
    let spender: AccountId = require_flag(rest, "spender");
    let amount = amount_flag(rest, "amount");
    let mut state = load_state(&path);
    let updated = match state
        .treasury
        .decrease_allowance(&mut state.asset, &caller, &spender, amount)
    {
        Ok(updated) => updated,
        Err(err) => fail(err),
    };
    save_state(&path, &state);
    println!("Allowance for {spender} is now {updated}");
}

fn reset_allowance_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let caller: AccountId = require_flag(rest, "caller");
    let spender: AccountId = require_flag(rest, "spender");
    let mut state = load_state(&path);
    if let Err(err) = state
        .treasury
        .reset_allowance(&mut state.asset, &caller, &spender)
    {
        fail(err);
    }
    save_state(&path, &state);
    println!("Allowance for {spender} reset to 0");
}

fn repay_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let caller: AccountId = require_flag(rest, "caller");
    let amount = amount_flag(rest, "amount");
    let mut state = load_state(&path);
    let restored = match state.treasury.repay(&mut state.asset, &caller, amount) {
        Ok(restored) => restored,
        Err(err) => fail(err),
    };
    save_state(&path, &state);
    println!(
        "Repaid {amount}; allowance for {caller} restored to {restored}, treasury balance {}",
        state.treasury.balance(&state.asset)
    );
}

fn transfer_ownership_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let caller: AccountId = require_flag(rest, "caller");
    let new_owner: AccountId = require_flag(rest, "new-owner");
    let mut state = load_state(&path);
    if let Err(err) = state.treasury.transfer_ownership(&caller, new_owner.clone()) {
        fail(err);
    }
    save_state(&path, &state);
    println!("Ownership transferred to {new_owner}");
}

fn show_cmd(args: &[String]) {
    let (path, rest) = state_path(args);
    let state = load_state(&path);
    let treasury = &state.treasury;
    let asset = &state.asset;

    println!("asset:            {}", asset.symbol);
    println!("total supply:     {}", asset.total_supply);
    println!("owner:            {}", treasury.owner());
    println!("treasury account: {}", treasury.account());
    println!("treasury balance: {}", treasury.balance(asset));
    if let Some(account) = arg_flag(rest, "account") {
        println!("balance[{account}]:   {}", asset.balance_of(&account));
        println!(
            "allowance[{account}]: {}",
            treasury.allowance_of(asset, &account)
        );
    }
    println!("events:           {}", asset.events().len());
    println!("state digest:     {}", hex::encode(asset.state_digest()));
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }
    let rest = &args[1..];
    match args[0].as_str() {
        "init" => init_cmd(rest),
        "mint" => mint_cmd(rest),
        "approve" => approve_cmd(rest),
        "pull" => pull_cmd(rest),
        "withdraw" => withdraw_cmd(rest),
        "increase-allowance" => increase_allowance_cmd(rest),
        "decrease-allowance" => decrease_allowance_cmd(rest),
        "reset-allowance" => reset_allowance_cmd(rest),
        "repay" => repay_cmd(rest),
        "transfer-ownership" => transfer_ownership_cmd(rest),
        "show" => show_cmd(rest),
        _ => usage(),
    }
}
