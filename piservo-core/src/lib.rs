//! # 🦾 piservo-core — Posicionamento remoto de atuadores
//!
//! Converte uma requisição de movimento lógica (percentual absoluto ou delta
//! relativo) em um comando físico enviado por um canal de execução remota,
//! rastreando a posição entre invocações que não compartilham memória.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            PositionController               │
//! │   move_absolute(), move_relative(), sweep() │
//! │      ↓               ↓               ↓      │
//! │ ┌──────────────┐ ┌──────────┐ ┌───────────┐ │
//! │ │PositionStore │ │  Range   │ │  Remote   │ │
//! │ │ load / save  │ │  Mapper  │ │  Command  │ │
//! │ │              │ │(ping-pong│ │  Sender   │ │
//! │ │              │ │  0-100)  │ │           │ │
//! │ └──────────────┘ └──────────┘ └───────────┘ │
//! └───────↓───────────────────────────↓─────────┘
//!   arquivo por canal          CommandExecutor
//!                             (ssh, sh -c, dry-run)
//! ```
//!
//! ## Fluxo
//!
//! 1. Relativo: lê a última posição lógica e soma o delta (sem clamp)
//! 2. Mapeia a posição lógica para `[min, max]` (ping-pong a cada 100)
//! 3. Formata e despacha o comando
//! 4. Persiste a nova posição lógica, só se o despacho deu certo
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use piservo_core::{ActuatorChannel, MemoryPositionStore, PositionController, RangeConfig};
//! use piservo_core::transport::DryRunExecutor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut servo = PositionController::servoblaster(
//!     ActuatorChannel::new("0")?,
//!     RangeConfig::new(10, 90)?,
//!     MemoryPositionStore::new(),
//!     DryRunExecutor::new(),
//! );
//!
//! let moved = servo.move_absolute(150)?;
//! assert_eq!(moved.physical.value(), 50.0);
//! assert_eq!(moved.command, "echo 0=50% > /dev/servoblaster");
//!
//! // 150 + 30 = 180 → faixa ímpar, volta em direção ao mínimo
//! let moved = servo.move_relative(30)?;
//! assert_eq!(moved.physical.value(), 26.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Erros
//!
//! - Configuração inválida: fatal, antes de qualquer movimento
//! - Leitura do store: recupera com a posição padrão (50)
//! - Gravação do store: o movimento aconteceu; reportado em
//!   [`MoveOutcome::persist_error`]
//! - Despacho: fatal para o movimento, sem retry, store intocado

pub mod error;
pub mod types;
pub mod mapper;
pub mod store;
pub mod transport;
pub mod sender;
pub mod config;
pub mod controller;

pub use error::{DispatchError, ServoError, ServoResult, StoreError};
pub use types::{ActuatorChannel, LogicalPosition, MoveRequest, PhysicalCommandValue, RangeConfig, DEFAULT_POSITION};
pub use mapper::{map, RangeMapper};
pub use store::{FilePositionStore, MemoryPositionStore, PositionStore};
pub use sender::{CommandTemplate, Dispatched, RemoteCommandSender};
pub use config::ServoConfig;
pub use controller::{MoveOutcome, PositionController, PositionReport};
