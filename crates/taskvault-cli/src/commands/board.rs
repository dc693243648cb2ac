//! Board file commands.
//!
//! A board is one team's task list stored as a JSON document. Both commands
//! fan the per-task work out over the runtime; the keyring's single-flight
//! fill means a cold start still prompts for the passphrase exactly once.

use std::path::Path;
use std::sync::Arc;

use taskvault_core::{Board, TeamCipher, VaultError};

use crate::cli::BoardFileArgs;
use crate::errors::CliError;

pub async fn handle_encrypt(
    cipher: Arc<TeamCipher>,
    encryption_enabled: bool,
    quiet: bool,
    args: BoardFileArgs,
) -> anyhow::Result<()> {
    let board = read_board(&args.file)?;

    if !encryption_enabled {
        if !quiet {
            eprintln!("Encryption is disabled in the config; board left unchanged.");
        }
        return write_board(&board, args.output.as_deref());
    }

    let task_count = board.tasks.len();
    let team_id = board.team_id.clone();

    let mut joins = tokio::task::JoinSet::new();
    for (index, task) in board.tasks.iter().cloned().enumerate() {
        let cipher = cipher.clone();
        let team_id = team_id.clone();
        joins.spawn(async move { (index, cipher.encrypt_task(&team_id, &task).await) });
    }

    let mut tasks = board.tasks;
    while let Some(joined) = joins.join_next().await {
        let (index, result) = joined.map_err(|e| anyhow::anyhow!("Worker task failed: {}", e))?;
        match result {
            Ok(task) => tasks[index] = task,
            Err(VaultError::KeyUnavailable(reason)) => {
                CliError::auth_failed(format!("No passphrase available: {}", reason)).exit()
            }
            Err(err) => return Err(err.into()),
        }
    }

    let board = Board {
        team_id,
        tasks,
    };
    write_board(&board, args.output.as_deref())?;

    if !quiet {
        eprintln!("Encrypted {} tasks for team {}", task_count, board.team_id);
    }
    Ok(())
}

pub async fn handle_decrypt(
    cipher: Arc<TeamCipher>,
    encryption_enabled: bool,
    quiet: bool,
    args: BoardFileArgs,
) -> anyhow::Result<()> {
    let board = read_board(&args.file)?;

    if !encryption_enabled {
        if !quiet {
            eprintln!("Encryption is disabled in the config; board left unchanged.");
        }
        return write_board(&board, args.output.as_deref());
    }

    let team_id = board.team_id.clone();

    let mut joins = tokio::task::JoinSet::new();
    for (index, task) in board.tasks.iter().cloned().enumerate() {
        let cipher = cipher.clone();
        let team_id = team_id.clone();
        joins.spawn(async move { (index, cipher.decrypt_task(&team_id, &task).await) });
    }

    // A task that fails authentication keeps its stored (still encrypted)
    // value and is reported, rather than aborting the rest of the board.
    let mut tasks = board.tasks;
    let mut failed: Vec<String> = Vec::new();
    while let Some(joined) = joins.join_next().await {
        let (index, result) = joined.map_err(|e| anyhow::anyhow!("Worker task failed: {}", e))?;
        match result {
            Ok(task) => tasks[index] = task,
            Err(VaultError::DecryptionFailed) | Err(VaultError::MalformedCiphertext(_)) => {
                failed.push(tasks[index].id.to_string());
            }
            Err(VaultError::KeyUnavailable(reason)) => {
                CliError::auth_failed(format!("No passphrase available: {}", reason)).exit()
            }
            Err(err) => return Err(err.into()),
        }
    }

    let decrypted = tasks.len() - failed.len();
    let board = Board {
        team_id,
        tasks,
    };
    write_board(&board, args.output.as_deref())?;

    if !failed.is_empty() {
        failed.sort();
        for id in &failed {
            eprintln!("Warning: task {} could not be decrypted; kept as stored", id);
        }
    }
    if !quiet {
        eprintln!(
            "Decrypted {} tasks for team {} ({} failed)",
            decrypted,
            board.team_id,
            failed.len()
        );
    }
    Ok(())
}

fn read_board(path: &str) -> anyhow::Result<Board> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("Failed to read board file {}: {}", path, e)
    })?;
    let board: Board = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse board file {}: {}", path, e))?;
    if board.team_id.is_empty() {
        CliError::invalid_input(format!("Board file {} has an empty team_id", path)).exit()
    }
    Ok(board)
}

fn write_board(board: &Board, output: Option<&str>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(board)?;
    match output {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        anyhow::anyhow!("Failed to create {}: {}", parent.display(), e)
                    })?;
                }
            }
            std::fs::write(path, json)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}
