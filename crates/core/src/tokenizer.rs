//! Splitting of the flat argument list into stage command lines.

/// Token that separates one stage from the next.
pub const DELIMITER: &str = "::";

/// Split `args` into stage command lines on every `delimiter` token.
///
/// Tokens of a stage are joined with a single space. A delimiter with nothing
/// before it, or an empty argument list, produces an empty command string.
/// The result always holds exactly one more entry than there are delimiters.
pub fn split_stages<I, S>(args: I, delimiter: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut commands = Vec::new();
    let mut current = String::new();

    for arg in args {
        let arg = arg.as_ref();
        if arg == delimiter {
            commands.push(std::mem::take(&mut current));
        } else if current.is_empty() {
            current = arg.to_string();
        } else {
            current.push(' ');
            current.push_str(arg);
        }
    }
    commands.push(current);

    commands
}

/// Split a stage command line into its executable and arguments.
///
/// Splits on every single space. There is no quoting or escaping, so
/// consecutive spaces yield empty arguments and an empty command yields an
/// empty executable name.
pub fn split_command_line(command: &str) -> (&str, Vec<&str>) {
    let mut parts = command.split(' ');
    let program = parts.next().unwrap_or_default();
    (program, parts.collect())
}
