//! Mapeamento posição lógica → valor físico (onda triangular)
//!
//! Cada faixa de 100 unidades lógicas inverte o sentido da varredura:
//!
//! ```text
//! lógico   0 ──────── 100 ──────── 200 ──────── 300
//! físico  min ──────→ max ──────→ min ──────→ max
//!              faixa 0     faixa 1     faixa 2
//!              (par)       (ímpar)     (par)
//! ```
//!
//! Um acumulador relativo sempre crescente faz o atuador oscilar entre os
//! limites, sem saturar e sem saltos.
//!
//! O sinal da posição lógica é descartado: `-30` e `30` mapeiam para o mesmo
//! valor físico. Acumuladores negativos perdem a distinção de direção; o
//! comportamento é mantido por compatibilidade com estados já gravados.

use crate::types::{LogicalPosition, PhysicalCommandValue, RangeConfig};

/// Unidades lógicas por faixa
pub const BAND_WIDTH: u64 = 100;

/// Converte posição lógica em valor físico dentro de `[min, max]`
///
/// Função total: aceita qualquer `i64`, inclusive `i64::MIN`.
pub fn map(logical: LogicalPosition, range: RangeConfig) -> PhysicalCommandValue {
    let magnitude = logical.unsigned_abs();
    let block = magnitude / BAND_WIDTH;
    let remainder = (magnitude % BAND_WIDTH) as f64;
    let span = range.span() as f64;

    // Multiplica antes de dividir: valores inteiros saem exatos
    let offset = span * remainder / BAND_WIDTH as f64;

    let physical = if block % 2 == 0 {
        range.min() as f64 + offset
    } else {
        range.max() as f64 - offset
    };

    PhysicalCommandValue::new(physical)
}

/// Mapeador ligado a um range fixo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMapper {
    range: RangeConfig,
}

impl RangeMapper {
    pub fn new(range: RangeConfig) -> Self {
        Self { range }
    }

    pub fn range(&self) -> RangeConfig {
        self.range
    }

    pub fn map(&self, logical: LogicalPosition) -> PhysicalCommandValue {
        map(logical, self.range)
    }
}
