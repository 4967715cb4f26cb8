//! Arquivo de configuração do servo (TOML)
//!
//! ```toml
//! [servo]
//! channel = "0"
//! min = 10
//! max = 90
//!
//! [remote]
//! host = "raspberrypi.local"
//! user = "pi"
//! key = "~/.ssh/id_rsa"
//!
//! [state]
//! dir = ".piservo"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{ServoError, ServoResult};
use crate::sender::CommandTemplate;
use crate::store::FilePositionStore;
use crate::transport::{CommandExecutor, LocalExecutor, SshExecutor, SshTarget};
use crate::types::{ActuatorChannel, RangeConfig};

/// Configuração completa
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServoConfig {
    /// Canal e limites físicos
    pub servo: ChannelSection,

    /// Canal de execução
    #[serde(default)]
    pub remote: RemoteSection,

    /// Onde a posição lógica é persistida
    #[serde(default)]
    pub state: StateSection,
}

/// Seção `[servo]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSection {
    /// Identificador do canal
    pub channel: ActuatorChannel,

    /// Valor físico mínimo
    #[serde(default = "default_min")]
    pub min: i64,

    /// Valor físico máximo
    #[serde(default = "default_max")]
    pub max: i64,

    /// Modelo do comando remoto
    #[serde(default)]
    pub command: CommandTemplate,
}

impl ChannelSection {
    /// Range validado
    pub fn range(&self) -> ServoResult<RangeConfig> {
        RangeConfig::new(self.min, self.max)
    }
}

/// Tipo de transporte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Cliente `ssh` do sistema
    #[default]
    Ssh,
    /// `sh -c` local
    Local,
}

/// Seção `[remote]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSection {
    #[serde(default)]
    pub transport: TransportKind,

    /// Host remoto (obrigatório para ssh)
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_user")]
    pub user: String,

    /// Arquivo de chave privada
    #[serde(default)]
    pub key: Option<PathBuf>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            host: None,
            user: default_user(),
            key: None,
            port: default_port(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl RemoteSection {
    /// Constrói o executor configurado
    pub fn executor(&self) -> ServoResult<Box<dyn CommandExecutor>> {
        match self.transport {
            TransportKind::Ssh => Ok(Box::new(SshExecutor::new(self.ssh_target()?))),
            TransportKind::Local => Ok(Box::new(LocalExecutor::new())),
        }
    }

    /// Parâmetros SSH validados
    pub fn ssh_target(&self) -> ServoResult<SshTarget> {
        let host = match self.host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                return Err(ServoError::InvalidConfig(
                    "remote.host is required for the ssh transport".into(),
                ));
            }
        };
        if self.user.trim().is_empty() {
            return Err(ServoError::InvalidConfig("remote.user must not be empty".into()));
        }
        Ok(SshTarget {
            host,
            user: self.user.clone(),
            port: self.port,
            key: self.key.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        })
    }
}

/// Seção `[state]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSection {
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
}

impl Default for StateSection {
    fn default() -> Self {
        Self { dir: default_state_dir() }
    }
}

impl StateSection {
    pub fn store(&self) -> FilePositionStore {
        FilePositionStore::new(&self.dir)
    }
}

fn default_min() -> i64 {
    0
}

fn default_max() -> i64 {
    100
}

fn default_user() -> String {
    "pi".to_string()
}

fn default_port() -> u16 {
    22
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".piservo")
}

impl ServoConfig {
    /// Lê e valida a partir de TOML
    pub fn from_str(content: &str) -> ServoResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServoError::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Lê e valida a partir de arquivo
    pub fn from_file(path: &Path) -> ServoResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServoError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_str(&content)
    }

    /// Verifica invariantes que o serde não cobre
    pub fn validate(&self) -> ServoResult<()> {
        self.servo.range()?;
        if self.remote.transport == TransportKind::Ssh {
            self.remote.ssh_target()?;
        }
        if self.state.dir.as_os_str().is_empty() {
            return Err(ServoError::InvalidConfig("state.dir must not be empty".into()));
        }
        Ok(())
    }

    /// Serializa de volta para TOML
    pub fn to_string(&self) -> ServoResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ServoError::InvalidConfig(format!("Failed to serialize config: {}", e)))
    }

    pub fn channel(&self) -> &ActuatorChannel {
        &self.servo.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[servo]
channel = "0"
min = 10
max = 90
command = "echo {channel}={value}% > /dev/servoblaster"

[remote]
transport = "ssh"
host = "192.168.1.20"
user = "pi"
key = "/home/me/.ssh/pi_rsa"
port = 2222
connect_timeout_secs = 3

[state]
dir = "/var/lib/piservo"
"#;

    #[test]
    fn test_parse_full() {
        let config = ServoConfig::from_str(FULL).unwrap();
        assert_eq!(config.channel().as_str(), "0");
        assert_eq!(config.servo.range().unwrap(), RangeConfig::new(10, 90).unwrap());
        assert_eq!(config.remote.port, 2222);
        assert_eq!(config.state.dir, PathBuf::from("/var/lib/piservo"));

        let target = config.remote.ssh_target().unwrap();
        assert_eq!(target.host, "192.168.1.20");
        assert_eq!(target.connect_timeout, Duration::from_secs(3));
        assert_eq!(target.key, Some(PathBuf::from("/home/me/.ssh/pi_rsa")));
    }

    #[test]
    fn test_defaults() {
        let config = ServoConfig::from_str(
            r#"
[servo]
channel = "3"

[remote]
host = "raspberrypi.local"
"#,
        )
        .unwrap();
        assert_eq!(config.servo.range().unwrap(), RangeConfig::full());
        assert_eq!(config.servo.command, CommandTemplate::servoblaster());
        assert_eq!(config.remote.transport, TransportKind::Ssh);
        assert_eq!(config.remote.user, "pi");
        assert_eq!(config.remote.port, 22);
        assert_eq!(config.remote.connect_timeout_secs, 10);
        assert_eq!(config.state.dir, PathBuf::from(".piservo"));
    }

    #[test]
    fn test_local_transport_needs_no_host() {
        let config = ServoConfig::from_str(
            r#"
[servo]
channel = "1"

[remote]
transport = "local"
"#,
        )
        .unwrap();
        assert_eq!(config.remote.transport, TransportKind::Local);
        assert!(config.remote.executor().is_ok());
    }

    #[test]
    fn test_ssh_requires_host() {
        let err = ServoConfig::from_str("[servo]\nchannel = \"0\"\n").unwrap_err();
        assert!(err.to_string().contains("remote.host"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = ServoConfig::from_str(
            "[servo]\nchannel = \"0\"\nmin = 90\nmax = 10\n[remote]\nhost = \"pi\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ServoError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_channel_rejected() {
        let err = ServoConfig::from_str("[servo]\nchannel = \"0; reboot\"\n[remote]\nhost = \"pi\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("invalid character"));
    }

    #[test]
    fn test_bad_template_rejected() {
        let err = ServoConfig::from_str(
            "[servo]\nchannel = \"0\"\ncommand = \"echo hi\"\n[remote]\nhost = \"pi\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("{channel}"));
    }

    #[test]
    fn test_missing_servo_section() {
        assert!(ServoConfig::from_str("[remote]\nhost = \"pi\"\n").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = ServoConfig::from_file(Path::new("/nonexistent/servo.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_reserialize() {
        let config = ServoConfig::from_str(FULL).unwrap();
        let again = ServoConfig::from_str(&config.to_string().unwrap()).unwrap();
        assert_eq!(again.servo.range().unwrap(), config.servo.range().unwrap());
        assert_eq!(again.servo.command, config.servo.command);
    }
}
