//! Interactive line-driven session. Each panel owns its own controller, so panels never
//! share input, results or cache.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::{bail, Result};
use client_core::{ControllerSnapshot, ConversionController, ConversionService, DiagnosticsSink};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PANEL_NAMES: [&str; 2] = ["manual", "spectrum"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Replaces the field contents, exactly like typing into it.
    Input(String),
    Convert,
    Panel(String),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };

    let command = match word {
        "input" | "i" => SessionCommand::Input(rest.to_string()),
        "convert" | "c" => SessionCommand::Convert,
        "panel" | "p" => SessionCommand::Panel(rest.trim().to_string()),
        "show" | "s" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "q" | "exit" => SessionCommand::Quit,
        "" => bail!("empty command"),
        other => bail!("unknown command '{other}'"),
    };
    Ok(command)
}

pub fn render(panel: &str, snapshot: &ControllerSnapshot) -> Vec<String> {
    let mut lines = vec![format!("[{panel}] input: {:?}", snapshot.input)];
    if snapshot.pending {
        lines.push(format!("[{panel}] converting..."));
    }
    if let Some(result) = &snapshot.result_text {
        lines.push(format!("[{panel}] {result}"));
    }
    if let Some(error) = &snapshot.error_text {
        lines.push(format!("[{panel}] error: {error}"));
    }
    lines
}

const HELP: &str = "commands: input <text> | convert | panel <manual|spectrum> | show | help | quit";

pub struct Session {
    panels: BTreeMap<String, ConversionController>,
    active: String,
}

impl Session {
    pub fn new(service: Arc<dyn ConversionService>, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        let panels = PANEL_NAMES
            .iter()
            .map(|name| {
                (
                    (*name).to_string(),
                    ConversionController::new(service.clone(), diagnostics.clone()),
                )
            })
            .collect();
        Self {
            panels,
            active: PANEL_NAMES[0].to_string(),
        }
    }

    pub fn active_panel(&self) -> &str {
        &self.active
    }

    pub fn snapshot(&self, panel: &str) -> Option<ControllerSnapshot> {
        self.panels.get(panel).map(ConversionController::snapshot)
    }

    fn controller(&self) -> Result<&ConversionController> {
        match self.panels.get(&self.active) {
            Some(controller) => Ok(controller),
            None => bail!("no panel named '{}'", self.active),
        }
    }

    /// Applies one command and returns the lines to print, or `None` when the session ends.
    pub async fn apply(&mut self, command: SessionCommand) -> Result<Option<Vec<String>>> {
        let lines = match command {
            SessionCommand::Input(raw) => {
                let controller = self.controller()?;
                if let client_core::Validation::Rejected(reason) =
                    controller.on_input_changed(&raw)
                {
                    vec![format!("[{}] ignored {raw:?}: {reason}", self.active)]
                } else {
                    render(&self.active, &controller.snapshot())
                }
            }
            SessionCommand::Convert => {
                let controller = self.controller()?;
                controller.submit().await;
                render(&self.active, &controller.snapshot())
            }
            SessionCommand::Panel(name) => {
                if !self.panels.contains_key(&name) {
                    bail!("unknown panel '{name}'");
                }
                self.active = name;
                render(&self.active, &self.controller()?.snapshot())
            }
            SessionCommand::Show => render(&self.active, &self.controller()?.snapshot()),
            SessionCommand::Help => vec![HELP.to_string()],
            SessionCommand::Quit => return Ok(None),
        };
        Ok(Some(lines))
    }

    /// Reads commands line by line until end of input or `quit`.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let lines_out = match parse_command(&line) {
                Ok(command) => match self.apply(command).await {
                    Ok(Some(lines_out)) => lines_out,
                    Ok(None) => break,
                    Err(err) => vec![format!("error: {err}")],
                },
                Err(err) => vec![format!("error: {err}"), HELP.to_string()],
            };
            for line in lines_out {
                output.write_all(line.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            output.flush().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
