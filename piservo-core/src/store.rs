//! Persistência da última posição lógica por canal
//!
//! Invocações do controlador não compartilham memória; a posição lógica
//! persistida é o único elo entre elas e é o que torna movimentos relativos
//! possíveis.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::error::StoreError;
use crate::types::{ActuatorChannel, LogicalPosition, DEFAULT_POSITION};

/// Extensão dos arquivos de posição
pub const POSITION_FILE_EXT: &str = "position";

/// Armazenamento chave-valor de posições lógicas
pub trait PositionStore {
    /// Lê o registro do canal (`Ok(None)` se nunca foi gravado)
    fn read(&self, channel: &ActuatorChannel) -> Result<Option<LogicalPosition>, StoreError>;

    /// Grava a posição, sobrescrevendo o registro anterior
    fn save(&mut self, channel: &ActuatorChannel, position: LogicalPosition) -> Result<(), StoreError>;

    /// Última posição persistida, ou [`DEFAULT_POSITION`] se não houver
    /// registro legível. Nunca falha.
    fn load(&self, channel: &ActuatorChannel) -> LogicalPosition {
        match self.read(channel) {
            Ok(Some(position)) => position,
            Ok(None) => {
                debug!(%channel, default = DEFAULT_POSITION, "no stored position, using default");
                DEFAULT_POSITION
            }
            Err(e) => {
                warn!(%channel, error = %e, default = DEFAULT_POSITION, "stored position unreadable, using default");
                DEFAULT_POSITION
            }
        }
    }
}

impl<S: PositionStore + ?Sized> PositionStore for Box<S> {
    fn read(&self, channel: &ActuatorChannel) -> Result<Option<LogicalPosition>, StoreError> {
        (**self).read(channel)
    }

    fn save(&mut self, channel: &ActuatorChannel, position: LogicalPosition) -> Result<(), StoreError> {
        (**self).save(channel, position)
    }
}

/// Um arquivo por canal contendo só um inteiro decimal
#[derive(Debug, Clone)]
pub struct FilePositionStore {
    dir: PathBuf,
}

impl FilePositionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Caminho do registro de um canal
    pub fn path_for(&self, channel: &ActuatorChannel) -> PathBuf {
        self.dir.join(format!("{}.{}", channel, POSITION_FILE_EXT))
    }
}

impl PositionStore for FilePositionStore {
    fn read(&self, channel: &ActuatorChannel) -> Result<Option<LogicalPosition>, StoreError> {
        let path = self.path_for(channel);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        content
            .trim()
            .parse::<LogicalPosition>()
            .map(Some)
            .map_err(|_| StoreError::Parse {
                path: path.display().to_string(),
                content,
            })
    }

    fn save(&mut self, channel: &ActuatorChannel, position: LogicalPosition) -> Result<(), StoreError> {
        let path = self.path_for(channel);
        let write_err = |source| StoreError::Write {
            path: path.display().to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Grava em arquivo temporário e renomeia: nunca deixa registro truncado
        let tmp = path.with_extension(format!("{}.tmp", POSITION_FILE_EXT));
        let mut file = fs::File::create(&tmp).map_err(write_err)?;
        writeln!(file, "{}", position).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);
        fs::rename(&tmp, &path).map_err(write_err)?;

        debug!(%channel, position, path = %path.display(), "position saved");
        Ok(())
    }
}

/// Armazenamento em memória (testes e dry-run)
#[derive(Debug, Clone, Default)]
pub struct MemoryPositionStore {
    positions: HashMap<ActuatorChannel, LogicalPosition>,
    saves: u64,
}

impl MemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria já com uma posição registrada
    pub fn with_position(channel: &ActuatorChannel, position: LogicalPosition) -> Self {
        let mut store = Self::new();
        store.positions.insert(channel.clone(), position);
        store
    }

    /// Número de gravações realizadas
    pub fn save_count(&self) -> u64 {
        self.saves
    }
}

impl PositionStore for MemoryPositionStore {
    fn read(&self, channel: &ActuatorChannel) -> Result<Option<LogicalPosition>, StoreError> {
        Ok(self.positions.get(channel).copied())
    }

    fn save(&mut self, channel: &ActuatorChannel, position: LogicalPosition) -> Result<(), StoreError> {
        self.positions.insert(channel.clone(), position);
        self.saves += 1;
        Ok(())
    }
}
