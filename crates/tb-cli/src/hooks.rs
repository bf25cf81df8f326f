//! Command interceptors.
//!
//! A hook sees a command's arguments before it runs and its output after it
//! commits, and may replace either.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::{self, ErrorKind, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use crate::commands::CommandKind;
use crate::config::HookCommand;

/// Intercepts one command. Both stages pass their input through unchanged
/// by default.
pub trait Hook: fmt::Debug {
    /// Rewrites the arguments before the command runs.
    fn pre(&self, command: CommandKind, args: Vec<String>) -> Result<Vec<String>> {
        let _ = command;
        Ok(args)
    }

    /// Rewrites the output after the command has committed.
    fn post(&self, command: CommandKind, output: String) -> Result<String> {
        let _ = command;
        Ok(output)
    }
}

/// At most one hook per command.
#[derive(Debug, Default)]
pub struct Hooks {
    registry: HashMap<CommandKind, Box<dyn Hook>>,
}

impl Hooks {
    /// Builds the registry from the `[hooks]` configuration table.
    ///
    /// Keys must be canonical command names.
    pub fn from_config(config: &BTreeMap<String, HookCommand>) -> Result<Self> {
        let mut hooks = Self::default();
        for (name, command) in config {
            let Some(kind) = CommandKind::from_name(name) else {
                bail!("invalid hook \"{name}\": not a command name");
            };
            hooks.register(kind, ExecHook::new(command.argv())?);
        }
        Ok(hooks)
    }

    /// Installs `hook` for `command`, replacing any previous one.
    pub fn register(&mut self, command: CommandKind, hook: impl Hook + 'static) {
        self.registry.insert(command, Box::new(hook));
    }

    pub fn pre(&self, command: CommandKind, args: Vec<String>) -> Result<Vec<String>> {
        match self.registry.get(&command) {
            Some(hook) => hook.pre(command, args),
            None => Ok(args),
        }
    }

    pub fn post(&self, command: CommandKind, output: String) -> Result<String> {
        match self.registry.get(&command) {
            Some(hook) => hook.post(command, output),
            None => Ok(output),
        }
    }
}

/// Hook backed by an external program.
///
/// `pre` runs `<program> pre <command> <args...>`; `post` runs
/// `<program> post <command>` with the output on stdin. Empty stdout leaves
/// the input unchanged.
#[derive(Debug, Clone)]
pub struct ExecHook {
    program: String,
    leading_args: Vec<String>,
}

impl ExecHook {
    /// `argv` is the program followed by any arguments to pass first.
    pub fn new(argv: Vec<String>) -> Result<Self> {
        let mut argv = argv.into_iter();
        let Some(program) = argv.next().filter(|p| !p.trim().is_empty()) else {
            bail!("hook program cannot be empty");
        };
        Ok(Self {
            program,
            leading_args: argv.collect(),
        })
    }

    fn command(&self, stage: &str, command: CommandKind) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .arg(stage)
            .arg(command.name())
            .stderr(Stdio::inherit());
        cmd
    }

    fn stdout_of(&self, stage: &str, output: std::process::Output) -> Result<String> {
        if !output.status.success() {
            bail!("{stage} hook {} exited with {}", self.program, output.status);
        }
        String::from_utf8(output.stdout)
            .with_context(|| format!("{stage} hook {} printed invalid UTF-8", self.program))
    }
}

impl Hook for ExecHook {
    fn pre(&self, command: CommandKind, args: Vec<String>) -> Result<Vec<String>> {
        let output = self
            .command("pre", command)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run hook {}", self.program))?;
        let stdout = self.stdout_of("pre", output)?;

        if stdout.trim().is_empty() {
            return Ok(args);
        }
        tracing::debug!(command = command.name(), "arguments replaced by hook");
        Ok(stdout.lines().map(str::to_string).collect())
    }

    fn post(&self, command: CommandKind, output: String) -> Result<String> {
        let mut child = self
            .command("post", command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to run hook {}", self.program))?;

        let stdin = child.stdin.take();
        // Feed stdin while stdout drains, or a filter hook fills both pipes.
        let (result, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(|| match stdin {
                Some(mut stdin) => match stdin.write_all(output.as_bytes()) {
                    Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
                    result => result,
                },
                None => Ok(()),
            });
            let result = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (result, written)
        });
        let result = result.with_context(|| format!("failed to wait for hook {}", self.program))?;
        written.with_context(|| format!("failed to write to hook {}", self.program))?;
        let stdout = self.stdout_of("post", result)?;

        if stdout.is_empty() {
            return Ok(output);
        }
        tracing::debug!(command = command.name(), "output replaced by hook");
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Recorder {
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl Hook for Recorder {
        fn pre(&self, command: CommandKind, mut args: Vec<String>) -> Result<Vec<String>> {
            self.seen.borrow_mut().push(format!("pre {}", command.name()));
            args.push("--extra".to_string());
            args.push("from-hook".to_string());
            Ok(args)
        }
    }

    #[test]
    fn unregistered_commands_pass_through() {
        let hooks = Hooks::default();
        let args = vec!["Working".to_string()];
        assert_eq!(hooks.pre(CommandKind::In, args.clone()).unwrap(), args);
        assert_eq!(hooks.post(CommandKind::Out, "x\n".into()).unwrap(), "x\n");
    }

    #[test]
    fn registered_hook_only_sees_its_command() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = Hooks::default();
        hooks.register(
            CommandKind::In,
            Recorder {
                seen: Rc::clone(&seen),
            },
        );

        let args = hooks.pre(CommandKind::In, vec!["a".into()]).unwrap();
        assert_eq!(args, vec!["a", "--extra", "from-hook"]);
        let args = hooks.pre(CommandKind::Out, vec!["-v".into()]).unwrap();
        assert_eq!(args, vec!["-v"]);

        // Post falls back to the trait default.
        assert_eq!(hooks.post(CommandKind::In, "out".into()).unwrap(), "out");
        assert_eq!(*seen.borrow(), vec!["pre in"]);
    }

    #[test]
    fn config_keys_must_be_canonical_names() {
        let mut config = BTreeMap::new();
        config.insert("stop".to_string(), HookCommand::Program("/bin/true".into()));
        let err = Hooks::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("invalid hook \"stop\""), "{err}");
    }

    #[test]
    fn empty_program_is_rejected() {
        assert!(ExecHook::new(Vec::new()).is_err());
        assert!(ExecHook::new(vec![String::new()]).is_err());
    }

    #[cfg(unix)]
    fn sh(script: &str) -> ExecHook {
        ExecHook::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "hook".to_string(),
        ])
        .unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn exec_pre_replaces_arguments_line_by_line() {
        // $1 is the stage, $2 the command name.
        let hook = sh(r#"shift 2; printf '%s\n' "$@" --extra tagged"#);
        let args = hook
            .pre(CommandKind::In, vec!["Writing docs".to_string()])
            .unwrap();
        assert_eq!(args, vec!["Writing docs", "--extra", "tagged"]);
    }

    #[cfg(unix)]
    #[test]
    fn exec_pre_without_output_keeps_arguments() {
        let hook = sh("exit 0");
        let args = hook.pre(CommandKind::In, vec!["keep".to_string()]).unwrap();
        assert_eq!(args, vec!["keep"]);
    }

    #[cfg(unix)]
    #[test]
    fn exec_post_transforms_output() {
        let hook = sh("tr a-z A-Z");
        let output = hook.post(CommandKind::Now, "default: not active\n".into()).unwrap();
        assert_eq!(output, "DEFAULT: NOT ACTIVE\n");
    }

    #[cfg(unix)]
    #[test]
    fn exec_post_streams_output_larger_than_a_pipe() {
        let big = "x".repeat(1_100_000);
        let output = sh("cat").post(CommandKind::Display, big.clone()).unwrap();
        assert_eq!(output.len(), big.len());
    }

    #[cfg(unix)]
    #[test]
    fn exec_post_may_ignore_its_input() {
        let big = "x".repeat(1_100_000);
        let output = sh("echo replaced").post(CommandKind::Display, big).unwrap();
        assert_eq!(output, "replaced\n");
    }

    #[cfg(unix)]
    #[test]
    fn exec_hook_receives_stage_and_command() {
        let hook = sh(r#"echo "$1 $2""#);
        let output = hook.post(CommandKind::Display, String::new()).unwrap();
        assert_eq!(output, "post display\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_hook_fails_the_command() {
        let hook = sh("exit 3");
        assert!(hook.pre(CommandKind::In, Vec::new()).is_err());
        assert!(hook.post(CommandKind::In, "x".into()).is_err());
    }
}
