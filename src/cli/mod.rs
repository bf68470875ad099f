//! CLI module: Clap argument parser, prompts, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PwdmError, Result};
use crate::passphrase::{self, PassphraseSource};
use crate::vault::{storage_path, VaultSession, VaultStore};

/// Environment variable holding the passphrase for scripted use.
pub const PASSPHRASE_ENV: &str = "PWDM_PASSPHRASE";

/// Environment variable holding the replacement passphrase for `passwd`.
pub const NEW_PASSPHRASE_ENV: &str = "PWDM_NEW_PASSPHRASE";

/// pwdm: keep your passwords in encrypted storage files.
#[derive(Parser)]
#[command(
    name = "pwdm",
    about = "Encrypted password storage manager",
    version,
    after_help = "\
Each storage is a single `.pwdm` file protected by its own passphrase.
The extension is added automatically when omitted.

EXAMPLES:
    pwdm new work                 Create work.pwdm
    pwdm add work \"office mail\"   Add a password (prompted, hidden)
    pwdm get work my              Show every entry whose description contains \"my\"
    pwdm shell                    Interactive session; changes kept until `save`"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding storage files (default: from .pwdm.toml, else current dir)
    #[arg(long, global = true, env = "PWDM_STORAGE_DIR")]
    pub storage_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty password storage
    New {
        /// Storage name (".pwdm" is appended if missing)
        name: String,
    },

    /// List storage files in the storage directory
    Ls,

    /// Show the descriptions stored in a storage
    Show {
        /// Storage name
        storage: String,
    },

    /// Show passwords whose description contains a pattern
    Get {
        /// Storage name
        storage: String,
        /// Substring to look for (omit to show everything)
        pattern: Option<String>,
    },

    /// Add a new password and save the storage
    Add {
        /// Storage name
        storage: String,
        /// Description (up to 100 characters, must be unique)
        description: String,
        /// Password value (omit for interactive prompt)
        secret: Option<String>,
    },

    /// Delete passwords whose description contains a pattern
    Del {
        /// Storage name
        storage: String,
        /// Substring to look for
        pattern: String,
        /// Skip the per-entry confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the passphrase of a storage
    Passwd {
        /// Storage name
        storage: String,
    },

    /// Start an interactive session
    Shell,
}

// ---------------------------------------------------------------------------
// Shared context used by multiple commands
// ---------------------------------------------------------------------------

/// Resolved settings and storage location for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub storage_dir: PathBuf,
}

impl Context {
    /// Load `.pwdm.toml` from the current directory and apply CLI overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let settings = Settings::load(&cwd)?;
        let storage_dir = match &cli.storage_dir {
            Some(dir) => cwd.join(dir),
            None => settings.storage_dir(&cwd),
        };
        Ok(Self {
            settings,
            storage_dir,
        })
    }

    /// A store sealing with the configured Argon2 parameters.
    pub fn store(&self) -> VaultStore {
        VaultStore::new(self.settings.argon2_params())
    }

    /// Full path of a storage file given the name the user typed.
    pub fn resolve(&self, name: &str) -> PathBuf {
        storage_path(self.storage_dir.join(name))
    }

    /// Ask for the passphrase and decrypt the named storage.
    pub fn open_session(&self, name: &str) -> Result<VaultSession> {
        let path = self.resolve(name);
        if !path.exists() {
            return Err(PwdmError::StorageNotFound(path));
        }
        let passphrase = prompt_passphrase("Enter passphrase")?;
        VaultSession::open(self.store(), &path, passphrase)
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Reads passphrases from the terminal without echo.
pub struct TerminalPassphrase;

impl PassphraseSource for TerminalPassphrase {
    fn read_passphrase(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        let pw = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PwdmError::CommandFailed(format!("passphrase prompt: {e}")))?;
        Ok(Zeroizing::new(pw))
    }

    fn mismatch(&mut self) {
        output::warning("Passphrase mismatch. Try again.");
    }
}

/// Get an existing passphrase, trying in order:
/// 1. `PWDM_PASSPHRASE` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase(prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env(PASSPHRASE_ENV) {
        return Ok(pw);
    }
    TerminalPassphrase.read_passphrase(prompt)
}

/// Get a new passphrase, entered twice, unless `env_var` supplies one.
pub fn prompt_new_passphrase(settings: &Settings, env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env(env_var) {
        return Ok(pw);
    }
    passphrase::acquire_new(&mut TerminalPassphrase, settings.passphrase_attempts())
}

fn passphrase_from_env(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Determine a secret value from one of three sources:
/// the command line, piped stdin, or a confirmed hidden prompt.
pub fn read_secret(value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Password provided on command line; it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        return Ok(Zeroizing::new(trimmed.to_string()));
    }

    let secret = dialoguer::Password::new()
        .with_prompt("Enter new password")
        .with_confirmation("Retype new password", "Password mismatch. Try again")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| PwdmError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Ask whether one entry should be deleted.  A failed prompt counts as "no".
pub fn confirm_delete(description: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(format!("Delete '{description}'?"))
        .default(false)
        .interact()
        .unwrap_or(false)
}
