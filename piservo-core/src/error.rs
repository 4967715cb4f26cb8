//! Erros do controlador de posição

use thiserror::Error;

pub type ServoResult<T> = Result<T, ServoError>;

/// Erros do controlador
#[derive(Debug, Error)]
pub enum ServoError {
    /// Configuração inválida (fatal, antes de qualquer movimento)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Falha ao despachar o comando remoto
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// Falha no armazenamento de posição
    #[error("Position store error: {0}")]
    Store(#[from] StoreError),
}

/// Falhas do canal de execução remota
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Processo de transporte não pôde ser iniciado
    #[error("could not spawn `{program}`: {reason}")]
    Spawn { program: String, reason: String },

    /// Transporte falhou (auth, rede, host inalcançável)
    #[error("transport failure: {0}")]
    Transport(String),

    /// Comando remoto terminou com status diferente de zero
    #[error("remote command exited with {}: {}", display_status(.status), .stderr.trim())]
    RemoteExit { status: Option<i32>, stderr: String },
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (killed by signal)".to_string(),
    }
}

/// Falhas do armazenamento de posição
#[derive(Debug, Error)]
pub enum StoreError {
    /// Registro existe mas não pôde ser lido
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Registro não contém um inteiro decimal
    #[error("corrupt position record {path}: {content:?}")]
    Parse { path: String, content: String },

    /// Registro não pôde ser gravado
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
