use protocc_exec::ExecError;

/// Render an error and its causes for the terminal, with a hint for common setup problems.
pub fn format_error(err: &anyhow::Error) -> String {
    let mut msg = format!("error: {err}");
    for cause in err.chain().skip(1) {
        msg.push_str(&format!("\n  caused by: {cause}"));
    }
    if let Some(hint) = hint(err) {
        msg.push_str(&format!("\n  hint: {hint}"));
    }
    msg
}

fn hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<ExecError>()? {
        ExecError::Spawn { .. } => {
            Some("is the container engine installed? choose another with --engine")
        }
        ExecError::BuildFailed { .. } => Some("the build output above shows the failing instruction"),
        _ => None,
    }
}
