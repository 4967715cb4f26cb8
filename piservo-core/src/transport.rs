//! Canal de execução remota
//!
//! O controlador só precisa de "executar esta string e saber se deu certo".
//! Conexão, autenticação e chaves ficam com o transporte concreto.

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::Duration;
use tracing::{debug, info};
use crate::error::DispatchError;

/// Status com que o cliente `ssh` sinaliza falha própria (conexão, auth)
pub const SSH_FAILURE_STATUS: i32 = 255;

/// Resultado de um comando executado
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` se o processo foi terminado por sinal
    pub status: Option<i32>,
}

impl CommandOutput {
    /// Saída de sucesso vazia
    pub fn success() -> Self {
        Self {
            status: Some(0),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// Converte status diferente de zero em [`DispatchError::RemoteExit`]
    pub fn into_result(self) -> Result<Self, DispatchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(DispatchError::RemoteExit {
                status: self.status,
                stderr: self.stderr,
            })
        }
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        }
    }
}

/// Capacidade de executar uma linha de comando (síncrono, bloqueante)
///
/// Implementações devolvem `Ok` com o status bruto; a interpretação de status
/// diferente de zero fica com quem chama.
pub trait CommandExecutor {
    fn execute(&mut self, command: &str) -> Result<CommandOutput, DispatchError>;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for Box<E> {
    fn execute(&mut self, command: &str) -> Result<CommandOutput, DispatchError> {
        (**self).execute(command)
    }
}

fn run(mut cmd: Command, program: &str) -> Result<CommandOutput, DispatchError> {
    cmd.output()
        .map(CommandOutput::from)
        .map_err(|e| DispatchError::Spawn {
            program: program.to_string(),
            reason: e.to_string(),
        })
}

/// Parâmetros de conexão SSH
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: String,
    pub user: String,
    pub port: u16,
    /// Arquivo de identidade (`ssh -i`)
    pub key: Option<PathBuf>,
    pub connect_timeout: Duration,
}

/// Executa comandos no host remoto via cliente `ssh` do sistema
#[derive(Debug, Clone)]
pub struct SshExecutor {
    target: SshTarget,
    program: String,
}

impl SshExecutor {
    pub fn new(target: SshTarget) -> Self {
        Self {
            target,
            program: "ssh".to_string(),
        }
    }

    /// Usa outro binário compatível com `ssh`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn target(&self) -> &SshTarget {
        &self.target
    }

    /// Argumentos passados ao cliente, sem o nome do programa
    pub fn args(&self, command: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.target.connect_timeout.as_secs().max(1)),
            "-p".to_string(),
            self.target.port.to_string(),
        ];
        if let Some(key) = &self.target.key {
            args.push("-i".to_string());
            args.push(key.display().to_string());
        }
        args.push(format!("{}@{}", self.target.user, self.target.host));
        args.push("--".to_string());
        args.push(command.to_string());
        args
    }
}

impl CommandExecutor for SshExecutor {
    fn execute(&mut self, command: &str) -> Result<CommandOutput, DispatchError> {
        debug!(host = %self.target.host, command, "ssh exec");
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(command));
        let output = run(cmd, &self.program)?;

        if output.status == Some(SSH_FAILURE_STATUS) {
            return Err(DispatchError::Transport(format!(
                "ssh {}@{}:{}: {}",
                self.target.user,
                self.target.host,
                self.target.port,
                output.stderr.trim()
            )));
        }
        Ok(output)
    }
}

/// Executa via `sh -c` na própria máquina (controlador rodando no host do atuador)
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    shell: String,
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for LocalExecutor {
    fn execute(&mut self, command: &str) -> Result<CommandOutput, DispatchError> {
        debug!(shell = %self.shell, command, "local exec");
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);
        run(cmd, &self.shell)
    }
}

/// Não executa nada: registra o comando e devolve sucesso
#[derive(Debug, Clone, Default)]
pub struct DryRunExecutor {
    history: Vec<String>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comandos "executados" até agora
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl CommandExecutor for DryRunExecutor {
    fn execute(&mut self, command: &str) -> Result<CommandOutput, DispatchError> {
        info!(command, "dry run, not executed");
        self.history.push(command.to_string());
        Ok(CommandOutput::success())
    }
}
