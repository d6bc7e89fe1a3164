//! A demonstration host: named variables plus a `print` builtin.

use foldeval::{Host, Request};
use std::collections::HashMap;
use std::io::Write;

/// Stores variables of any name and implements `print(...)`, which writes
/// its arguments space-separated plus a newline. Unknown names read as 0, so
/// scripts can use variables without declaring them.
pub struct ScriptHost<W> {
    vars: HashMap<String, i32>,
    out: W,
}

impl<W: Write> ScriptHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            vars: HashMap::new(),
            out,
        }
    }
}

impl<W: Write> Host for ScriptHost<W> {
    fn call(&mut self, name: &str, request: Request<'_>) -> i32 {
        match request {
            Request::Assign(value) => {
                self.vars.insert(name.to_string(), value);
                value
            }
            Request::Value => self.vars.get(name).copied().unwrap_or(0),
            Request::Call(args) => match name {
                "print" => {
                    for arg in args {
                        let _ = write!(self.out, "{arg} ");
                    }
                    let _ = writeln!(self.out);
                    0
                }
                _ => {
                    tracing::warn!(name, "unknown function call");
                    0
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldeval::evaluate;

    #[test]
    fn test_variables_and_print() {
        let mut host = ScriptHost::new(Vec::new());
        let result = evaluate("a = 10; b = 17; print(a,b); a + b", Some(&mut host));
        assert_eq!(result, Ok(27));
        assert_eq!(String::from_utf8(host.out).unwrap(), "10 17 \n");
    }

    #[test]
    fn test_unknown_variables_read_as_zero() {
        let mut host = ScriptHost::new(Vec::new());
        assert_eq!(evaluate("missing + 1", Some(&mut host)), Ok(1));
    }

    #[test]
    fn test_unknown_function_returns_zero() {
        let mut host = ScriptHost::new(Vec::new());
        assert_eq!(evaluate("mystery(1, 2) + 5", Some(&mut host)), Ok(5));
    }
}
