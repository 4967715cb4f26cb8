//! Controlador de posição
//!
//! Sem estado próprio entre chamadas: cada movimento lê (se relativo), mapeia,
//! despacha e só então persiste.

use std::thread;
use std::time::Duration;
use serde::Serialize;
use tracing::{info, warn};
use crate::config::ServoConfig;
use crate::error::{ServoError, ServoResult, StoreError};
use crate::mapper::RangeMapper;
use crate::sender::{CommandTemplate, RemoteCommandSender};
use crate::store::PositionStore;
use crate::transport::CommandExecutor;
use crate::types::{ActuatorChannel, LogicalPosition, MoveRequest, PhysicalCommandValue, RangeConfig};

/// Resultado de um movimento despachado
#[derive(Debug, Serialize)]
pub struct MoveOutcome {
    /// Posição lógica alvo (a que foi, ou deveria ter sido, persistida)
    pub logical: LogicalPosition,
    /// Valor enviado ao atuador, já arredondado como aparece em `command`
    pub physical: PhysicalCommandValue,
    /// Linha de comando executada
    pub command: String,
    /// Falha ao persistir depois do despacho; o atuador já se moveu
    #[serde(skip)]
    pub persist_error: Option<StoreError>,
}

impl MoveOutcome {
    /// A posição lógica foi gravada?
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Posição persistida e seu valor físico, sem despachar nada
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    pub channel: ActuatorChannel,
    pub logical: LogicalPosition,
    pub physical: PhysicalCommandValue,
    pub range: RangeConfig,
}

/// Controlador de um canal
#[derive(Debug)]
pub struct PositionController<S, E> {
    channel: ActuatorChannel,
    mapper: RangeMapper,
    store: S,
    sender: RemoteCommandSender<E>,
}

impl<S: PositionStore, E: CommandExecutor> PositionController<S, E> {
    pub fn new(
        channel: ActuatorChannel,
        range: RangeConfig,
        store: S,
        sender: RemoteCommandSender<E>,
    ) -> Self {
        Self {
            channel,
            mapper: RangeMapper::new(range),
            store,
            sender,
        }
    }

    /// Cria a partir de configuração validada
    pub fn from_config(config: &ServoConfig, store: S, executor: E) -> ServoResult<Self> {
        let range = config.servo.range()?;
        let sender = RemoteCommandSender::new(executor, config.servo.command.clone());
        Ok(Self::new(config.servo.channel.clone(), range, store, sender))
    }

    /// Atalho com o modelo ServoBlaster
    pub fn servoblaster(channel: ActuatorChannel, range: RangeConfig, store: S, executor: E) -> Self {
        Self::new(
            channel,
            range,
            store,
            RemoteCommandSender::new(executor, CommandTemplate::servoblaster()),
        )
    }

    /// Move para posição lógica absoluta
    pub fn move_absolute(&mut self, percent: LogicalPosition) -> ServoResult<MoveOutcome> {
        self.dispatch_and_persist(percent)
    }

    /// Move relativo à última posição persistida
    ///
    /// Sem clamp: o acumulador cresce livremente e o mapeador faz a oscilação.
    pub fn move_relative(&mut self, delta: i64) -> ServoResult<MoveOutcome> {
        let last = self.store.load(&self.channel);
        let target = last.saturating_add(delta);
        self.dispatch_and_persist(target)
    }

    /// Executa uma requisição de movimento
    pub fn apply(&mut self, request: MoveRequest) -> ServoResult<MoveOutcome> {
        match request {
            MoveRequest::Absolute(percent) => self.move_absolute(percent),
            MoveRequest::Relative(delta) => self.move_relative(delta),
        }
    }

    /// Sequência de movimentos absolutos com pausa fixa entre eles
    ///
    /// Para no primeiro erro de despacho.
    pub fn sweep<I>(&mut self, positions: I, delay: Duration) -> ServoResult<Vec<MoveOutcome>>
    where
        I: IntoIterator<Item = LogicalPosition>,
    {
        let mut outcomes = Vec::new();
        for (i, percent) in positions.into_iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }
            outcomes.push(self.move_absolute(percent)?);
        }
        Ok(outcomes)
    }

    /// Posição persistida atual e seu mapeamento
    pub fn current(&self) -> PositionReport {
        let logical = self.store.load(&self.channel);
        PositionReport {
            channel: self.channel.clone(),
            logical,
            physical: self.mapper.map(logical),
            range: self.mapper.range(),
        }
    }

    // Mapeia, despacha e persiste. Falha de despacho não toca o store.
    fn dispatch_and_persist(&mut self, logical: LogicalPosition) -> ServoResult<MoveOutcome> {
        let physical = self.mapper.map(logical);
        let dispatched = self
            .sender
            .send(&self.channel, physical)
            .map_err(ServoError::Dispatch)?;

        let persist_error = match self.store.save(&self.channel, logical) {
            Ok(()) => None,
            Err(e) => {
                warn!(channel = %self.channel, logical, error = %e, "move succeeded, state not saved");
                Some(e)
            }
        };

        info!(channel = %self.channel, logical, physical = %physical, "moved");
        Ok(MoveOutcome {
            logical,
            physical,
            command: dispatched.command,
            persist_error,
        })
    }

    pub fn channel(&self) -> &ActuatorChannel {
        &self.channel
    }

    pub fn range(&self) -> RangeConfig {
        self.mapper.range()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sender(&self) -> &RemoteCommandSender<E> {
        &self.sender
    }

    /// Devolve store e executor
    pub fn into_parts(self) -> (S, E) {
        (self.store, self.sender.into_executor())
    }
}
