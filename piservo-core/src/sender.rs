//! Formatação e envio do comando físico

use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::{DispatchError, ServoError, ServoResult};
use crate::transport::{CommandExecutor, CommandOutput};
use crate::types::{ActuatorChannel, PhysicalCommandValue};

/// Placeholder do identificador do canal
pub const CHANNEL_PLACEHOLDER: &str = "{channel}";

/// Placeholder do valor físico
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// Interface ServoBlaster: `echo <canal>=<valor>% > /dev/servoblaster`
pub const SERVOBLASTER_TEMPLATE: &str = "echo {channel}={value}% > /dev/servoblaster";

/// Modelo de linha de comando com `{channel}` e `{value}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandTemplate(String);

impl CommandTemplate {
    /// Cria modelo; ambos os placeholders são obrigatórios
    pub fn new(template: impl Into<String>) -> ServoResult<Self> {
        let template = template.into();
        for placeholder in [CHANNEL_PLACEHOLDER, VALUE_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(ServoError::InvalidConfig(format!(
                    "command template '{}' is missing {}",
                    template, placeholder
                )));
            }
        }
        Ok(Self(template))
    }

    /// Modelo ServoBlaster
    pub fn servoblaster() -> Self {
        Self(SERVOBLASTER_TEMPLATE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitui canal e valor
    pub fn render(&self, channel: &ActuatorChannel, value: PhysicalCommandValue) -> String {
        self.0
            .replace(CHANNEL_PLACEHOLDER, channel.as_str())
            .replace(VALUE_PLACEHOLDER, &value.to_string())
    }
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self::servoblaster()
    }
}

impl TryFrom<String> for CommandTemplate {
    type Error = ServoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandTemplate> for String {
    fn from(template: CommandTemplate) -> Self {
        template.0
    }
}

/// Comando despachado com sucesso
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub command: String,
    pub output: CommandOutput,
}

/// Envia valores físicos pelo canal de execução
///
/// Sem retry: qualquer falha do transporte sobe inalterada.
#[derive(Debug, Clone)]
pub struct RemoteCommandSender<E> {
    executor: E,
    template: CommandTemplate,
}

impl<E: CommandExecutor> RemoteCommandSender<E> {
    pub fn new(executor: E, template: CommandTemplate) -> Self {
        Self { executor, template }
    }

    /// Formata e despacha; status diferente de zero é falha
    pub fn send(
        &mut self,
        channel: &ActuatorChannel,
        value: PhysicalCommandValue,
    ) -> Result<Dispatched, DispatchError> {
        let command = self.template.render(channel, value);
        debug!(command = %command, "dispatching");
        let output = self.executor.execute(&command)?.into_result()?;
        Ok(Dispatched { command, output })
    }

    pub fn template(&self) -> &CommandTemplate {
        &self.template
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::DryRunExecutor;

    struct ExitWith(i32);

    impl CommandExecutor for ExitWith {
        fn execute(&mut self, _command: &str) -> Result<CommandOutput, DispatchError> {
            Ok(CommandOutput {
                stderr: "servoblaster: no such device".into(),
                status: Some(self.0),
                ..Default::default()
            })
        }
    }

    fn channel() -> ActuatorChannel {
        ActuatorChannel::new("2").unwrap()
    }

    #[test]
    fn test_render_servoblaster() {
        let t = CommandTemplate::default();
        assert_eq!(
            t.render(&channel(), PhysicalCommandValue::new(50.0)),
            "echo 2=50% > /dev/servoblaster"
        );
        assert_eq!(
            t.render(&channel(), PhysicalCommandValue::new(15.600000000000001)),
            "echo 2=15.6% > /dev/servoblaster"
        );
    }

    #[test]
    fn test_custom_template() {
        let t = CommandTemplate::new("pwm-set --ch {channel} --duty {value}").unwrap();
        assert_eq!(
            t.render(&channel(), PhysicalCommandValue::new(1500.0)),
            "pwm-set --ch 2 --duty 1500"
        );
    }

    #[test]
    fn test_template_requires_placeholders() {
        assert!(CommandTemplate::new("echo {value}% > /dev/servoblaster").is_err());
        assert!(CommandTemplate::new("echo {channel}= > /dev/servoblaster").is_err());
    }

    #[test]
    fn test_send_records_command() {
        let mut sender = RemoteCommandSender::new(DryRunExecutor::new(), CommandTemplate::default());
        let sent = sender.send(&channel(), PhysicalCommandValue::new(80.0)).unwrap();
        assert_eq!(sent.command, "echo 2=80% > /dev/servoblaster");
        assert!(sent.output.is_success());
        assert_eq!(sender.executor().history(), &["echo 2=80% > /dev/servoblaster".to_string()]);
    }

    #[test]
    fn test_send_nonzero_exit_is_error() {
        let mut sender = RemoteCommandSender::new(ExitWith(1), CommandTemplate::default());
        let err = sender.send(&channel(), PhysicalCommandValue::new(80.0)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::RemoteExit {
                status: Some(1),
                stderr: "servoblaster: no such device".into(),
            }
        );
    }
}
