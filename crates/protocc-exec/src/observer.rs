use tracing::info;

/// Notified before every blocking engine call and when run output is captured.
pub trait CommandObserver {
    fn on_command(&self, command_line: &str);

    fn on_output(&self, _output: &str) {}
}

/// Echoes each command to stdout as `$ <command>`, followed by captured output.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoObserver;

impl CommandObserver for EchoObserver {
    fn on_command(&self, command_line: &str) {
        println!("$ {command_line}");
    }

    fn on_output(&self, output: &str) {
        if !output.is_empty() {
            println!("{output}");
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CommandObserver for TracingObserver {
    fn on_command(&self, command_line: &str) {
        info!(command = command_line, "running engine command");
    }

    fn on_output(&self, output: &str) {
        info!(lines = output.lines().count(), "captured container output");
    }
}
