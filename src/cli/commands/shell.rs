//! `pwdm shell`: interactive session over one storage at a time.
//!
//! Unlike the one-shot commands, `add` and `del` only change the vault in
//! memory.  Nothing reaches the disk until `save`, so quitting without
//! saving undoes them.

use std::io::{self, BufRead, IsTerminal};

use zeroize::Zeroizing;

use crate::cli::commands::new;
use crate::cli::output;
use crate::cli::{
    confirm_delete, prompt_new_passphrase, prompt_passphrase, Context, NEW_PASSPHRASE_ENV,
    PASSPHRASE_ENV,
};
use crate::errors::{PwdmError, Result};
use crate::vault::{list_storages, VaultSession};

const HELP: &str = "\
Commands:
    help              print this help
    ls                list storage files in the storage directory
    new [name]        create a new password storage
    load <name>       load passwords from storage <name>
    save              save the loaded storage
    show              list the descriptions in the loaded storage
    get [pattern]     show passwords whose description contains <pattern>
    add [description] add a new password
    del [pattern]     delete passwords whose description contains <pattern>
    passwd            change the passphrase (also saves pending changes)
    exit, quit        leave (unsaved changes are discarded)";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Help,
    Ls,
    New(Option<String>),
    Load(Option<String>),
    Save,
    Show,
    Get(String),
    Add(Option<String>),
    Del(Option<String>),
    Passwd,
    Quit,
    Unknown(String),
}

/// Split a line into a command word and the rest of the line.
///
/// Only the single separator after the command word is dropped, so
/// descriptions and patterns keep their spaces exactly as typed (the same
/// as with `pwdm add`). Storage names are trimmed.
pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());
    let name = (!rest.trim().is_empty()).then(|| rest.trim().to_string());

    match word {
        "" => ShellCommand::Empty,
        "help" => ShellCommand::Help,
        "ls" => ShellCommand::Ls,
        "new" => ShellCommand::New(name),
        "load" => ShellCommand::Load(name),
        "save" => ShellCommand::Save,
        "show" => ShellCommand::Show,
        "get" => ShellCommand::Get(rest.to_string()),
        "add" => ShellCommand::Add(arg),
        "del" => ShellCommand::Del(arg),
        "passwd" => ShellCommand::Passwd,
        "exit" | "quit" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other.to_string()),
    }
}

/// Everything the shell needs to ask the user.
pub trait ShellInput {
    /// Read one line of plain text; `None` ends the session.
    fn line(&mut self, prompt: &str) -> Option<String>;

    /// Read the passphrase of an existing storage.
    fn passphrase(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Read a new passphrase, entered twice.
    fn new_passphrase(&mut self, ctx: &Context, env_var: &str) -> Result<Zeroizing<String>>;

    /// Read a new secret value, entered twice.
    fn secret(&mut self) -> Result<Zeroizing<String>>;

    /// Ask whether one entry should be deleted.
    fn confirm_delete(&mut self, description: &str) -> bool;
}

/// Reads from the terminal, or line by line from piped stdin.
pub struct TerminalInput {
    interactive: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn next_stdin_line() -> Option<String> {
        let mut buf = String::new();
        match io::stdin().lock().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellInput for TerminalInput {
    fn line(&mut self, prompt: &str) -> Option<String> {
        if !self.interactive {
            return Self::next_stdin_line();
        }
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .ok()
    }

    fn passphrase(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        prompt_passphrase(prompt)
    }

    fn new_passphrase(&mut self, ctx: &Context, env_var: &str) -> Result<Zeroizing<String>> {
        prompt_new_passphrase(&ctx.settings, env_var)
    }

    fn secret(&mut self) -> Result<Zeroizing<String>> {
        if !self.interactive {
            return Self::next_stdin_line()
                .map(Zeroizing::new)
                .ok_or(PwdmError::UserCancelled);
        }
        crate::cli::read_secret(None)
    }

    fn confirm_delete(&mut self, description: &str) -> bool {
        if !self.interactive {
            return Self::next_stdin_line()
                .is_some_and(|answer| matches!(answer.trim(), "y" | "yes"));
        }
        confirm_delete(description)
    }
}

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Shell state: the context and, once something is loaded, the session.
pub struct Shell<'a, I: ShellInput> {
    ctx: &'a Context,
    input: I,
    session: Option<VaultSession>,
}

impl<'a, I: ShellInput> Shell<'a, I> {
    pub fn new(ctx: &'a Context, input: I) -> Self {
        Self {
            ctx,
            input,
            session: None,
        }
    }

    /// The loaded session, if any.
    pub fn session(&self) -> Option<&VaultSession> {
        self.session.as_ref()
    }

    /// Read and run commands until `quit` or end of input.
    pub fn run(&mut self) {
        while let Some(line) = self.input.line("pwdm") {
            match self.handle(parse_line(&line)) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => output::error(&e.to_string()),
            }
        }

        if self.session.as_ref().is_some_and(VaultSession::has_unsaved_changes) {
            output::warning("Unsaved changes were discarded.");
        }
    }

    /// Run one command.  Errors leave the shell state as it was.
    pub fn handle(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Ls => self.ls()?,
            ShellCommand::New(name) => self.new_storage(name)?,
            ShellCommand::Load(name) => self.load(name)?,
            ShellCommand::Save => {
                self.loaded_mut()?.save()?;
                output::success("Password storage saved successfully.");
            }
            ShellCommand::Show => {
                output::print_descriptions(&self.loaded()?.vault().list());
            }
            ShellCommand::Get(pattern) => {
                let matches = self.loaded()?.vault().find(&pattern)?;
                output::print_entries_table(&matches);
            }
            ShellCommand::Add(description) => self.add(description)?,
            ShellCommand::Del(pattern) => self.delete(pattern)?,
            ShellCommand::Passwd => self.passwd()?,
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Unknown(word) => {
                output::warning(&format!("Unknown command '{word}'. Type `help`."));
            }
        }
        Ok(Flow::Continue)
    }

    fn loaded(&self) -> Result<&VaultSession> {
        self.session.as_ref().ok_or(PwdmError::NoStorageLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut VaultSession> {
        self.session.as_mut().ok_or(PwdmError::NoStorageLoaded)
    }

    fn ls(&self) -> Result<()> {
        if !self.ctx.storage_dir.exists() {
            return Ok(());
        }
        for name in list_storages(&self.ctx.storage_dir)? {
            println!("{name}");
        }
        Ok(())
    }

    fn new_storage(&mut self, name: Option<String>) -> Result<()> {
        let name = match name {
            Some(name) => name,
            None => self
                .input
                .line("Enter filename for new storage")
                .ok_or(PwdmError::UserCancelled)?,
        };

        let ctx = self.ctx;
        let input = &mut self.input;
        let session = new::create(ctx, &name, || input.new_passphrase(ctx, PASSPHRASE_ENV))?;

        self.replace_session(session);
        output::success("New password storage created successfully. Now you can add passwords.");
        Ok(())
    }

    fn load(&mut self, name: Option<String>) -> Result<()> {
        let name = name.ok_or_else(|| {
            PwdmError::CommandFailed("You must specify storage filename".into())
        })?;

        let path = self.ctx.resolve(&name);
        if !path.exists() {
            return Err(PwdmError::StorageNotFound(path));
        }
        let passphrase = self.input.passphrase("Enter passphrase")?;
        let session = VaultSession::open(self.ctx.store(), &path, passphrase)?;

        self.replace_session(session);
        output::success("Password storage loaded successfully.");
        Ok(())
    }

    fn add(&mut self, description: Option<String>) -> Result<()> {
        self.loaded()?;

        let description = match description {
            Some(d) => d,
            None => self
                .input
                .line("Enter description (up to 100 symbols)")
                .ok_or(PwdmError::UserCancelled)?,
        };
        self.loaded()?.vault().check_new_description(&description)?;

        let secret = self.input.secret()?;
        self.loaded_mut()?.add(&description, &secret)?;

        output::success("New password successfully added! To save it use command 'save'.");
        Ok(())
    }

    fn delete(&mut self, pattern: Option<String>) -> Result<()> {
        if self.loaded()?.vault().is_empty() {
            output::info("Your password storage is empty.");
            return Ok(());
        }

        let pattern = match pattern {
            Some(p) => p,
            None => self
                .input
                .line("Enter description (up to 100 symbols)")
                .ok_or(PwdmError::UserCancelled)?,
        };

        let input = &mut self.input;
        let session = self.session.as_mut().ok_or(PwdmError::NoStorageLoaded)?;
        let removed = session.delete(&pattern, |description| input.confirm_delete(description))?;

        output::success(&format!("Deleted {removed} password(s)."));
        if removed > 0 {
            output::tip("You can quit without saving to restore deleted passwords.");
        }
        Ok(())
    }

    fn passwd(&mut self) -> Result<()> {
        self.loaded()?;

        let old = self.input.passphrase("Enter old passphrase")?;
        let new = self.input.new_passphrase(self.ctx, NEW_PASSPHRASE_ENV)?;

        let session = self.loaded_mut()?;
        let had_pending = session.has_unsaved_changes();
        session.change_passphrase(&old, new)?;

        if had_pending {
            output::success("Passphrase changed. Pending changes were saved with it.");
        } else {
            output::success("Passphrase changed successfully.");
        }
        Ok(())
    }

    fn replace_session(&mut self, session: VaultSession) {
        if self.session.as_ref().is_some_and(VaultSession::has_unsaved_changes) {
            output::warning("Unsaved changes in the previous storage were discarded.");
        }
        self.session = Some(session);
    }
}

/// Execute the `shell` command.
pub fn execute(ctx: &Context) -> Result<()> {
    println!("{HELP}");
    let mut shell = Shell::new(ctx, TerminalInput::new());
    shell.run();
    Ok(())
}
