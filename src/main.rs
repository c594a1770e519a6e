use std::process::ExitCode;

mod apps;
mod cli;
mod config;
mod context;
mod env;
mod secrets;
mod stack;

use crate::context::LookupContext;
use crate::env::EnvSource;
use crate::stack::StackDeclaration;

#[derive(Debug, thiserror::Error)]
enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn emit(declarations: &[StackDeclaration]) -> Result<(), EmitError> {
    let rendered = serde_json::to_string_pretty(declarations)?;
    match &cli::get_cli_args().out {
        Some(path) => std::fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();

    let env = EnvSource::from_process();
    let ctx = match LookupContext::try_init() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Failed to load lookup context: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Applications compose independently; one failing must not take the
    // other down with it.
    let mut declarations = Vec::new();
    let mut failed = false;

    match apps::vaultwarden::stack(&env, &ctx) {
        Ok(declaration) => declarations.push(declaration),
        Err(e) => {
            log::error!("Failed to compose {}: {e}", apps::vaultwarden::APP);
            failed = true;
        }
    }

    if apps::code_exec::enabled(&env) {
        match apps::code_exec::stack(&env, &ctx) {
            Ok(declaration) => declarations.push(declaration),
            Err(e) => {
                log::error!("Failed to compose {}: {e}", apps::code_exec::APP);
                failed = true;
            }
        }
    } else {
        log::info!("CODE_EXEC_REPO not set, skipping {}", apps::code_exec::APP);
    }

    for declaration in &declarations {
        for output in &declaration.outputs {
            log::info!(
                "{}: {} = {}.{}",
                declaration.name,
                output.name,
                output.value.resource,
                output.value.attribute
            );
        }
    }

    if let Err(e) = emit(&declarations) {
        log::error!("Failed to write declaration set: {e}");
        return ExitCode::FAILURE;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
