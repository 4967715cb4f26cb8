//! Tipos de dados do controlador

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::{ServoError, ServoResult};

/// Posição lógica: acumulador percentual com sinal, sem limites
pub type LogicalPosition = i64;

/// Posição assumida quando não há registro persistido (centro de 0-100)
pub const DEFAULT_POSITION: LogicalPosition = 50;

/// Tamanho máximo do identificador de canal
pub const MAX_CHANNEL_LEN: usize = 32;

/// Identificador de um atuador físico
///
/// É substituído em comandos shell e em nomes de arquivo, por isso só aceita
/// alfanuméricos ASCII, `-` e `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActuatorChannel(String);

impl ActuatorChannel {
    /// Cria canal validado
    pub fn new(id: impl Into<String>) -> ServoResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ServoError::InvalidConfig("channel id must not be empty".into()));
        }
        if id.len() > MAX_CHANNEL_LEN {
            return Err(ServoError::InvalidConfig(format!(
                "channel id '{}' longer than {} characters",
                id, MAX_CHANNEL_LEN
            )));
        }
        if let Some(c) = id.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
            return Err(ServoError::InvalidConfig(format!(
                "channel id '{}' contains invalid character {:?}",
                id, c
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActuatorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ActuatorChannel {
    type Error = ServoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActuatorChannel> for String {
    fn from(channel: ActuatorChannel) -> Self {
        channel.0
    }
}

/// Limites físicos do comando para um canal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct RangeConfig {
    min: i64,
    max: i64,
}

impl RangeConfig {
    /// Cria range validado (`max >= min`)
    pub fn new(min: i64, max: i64) -> ServoResult<Self> {
        if max < min {
            return Err(ServoError::InvalidConfig(format!(
                "range max ({}) must be >= min ({})",
                max, min
            )));
        }
        Ok(Self { min, max })
    }

    /// Range percentual completo 0-100
    pub fn full() -> Self {
        Self { min: 0, max: 100 }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Largura do range (`max - min`), sem overflow mesmo em `i64::MIN..=i64::MAX`
    pub fn span(&self) -> u64 {
        self.max.abs_diff(self.min)
    }

    /// Verifica se um valor físico está dentro dos limites
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min as f64 && value <= self.max as f64
    }
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Deserialize)]
struct RangeBounds {
    min: i64,
    max: i64,
}

impl TryFrom<RangeBounds> for RangeConfig {
    type Error = ServoError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.min, bounds.max)
    }
}

/// Valor de comando físico, sempre dentro de `[min, max]`
///
/// Guardado com duas casas decimais: o valor é exatamente o que vai no comando.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalCommandValue(f64);

impl PhysicalCommandValue {
    pub(crate) fn new(value: f64) -> Self {
        Self((value * 100.0).round() / 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Formata com no máximo duas casas decimais e sem zeros à direita
/// (`50`, `15.6`, `33.33`)
impl fmt::Display for PhysicalCommandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = format!("{:.2}", self.0);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        match trimmed {
            "-0" => f.write_str("0"),
            s => f.write_str(s),
        }
    }
}

/// Requisição de movimento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRequest {
    /// Posição lógica absoluta
    Absolute(LogicalPosition),
    /// Deslocamento relativo à última posição persistida
    Relative(i64),
}
