// ABOUTME: Scripted CommandChannel that replays canned outputs in order.
// ABOUTME: Records every command so tests can assert exactly what ran remotely.

use async_trait::async_trait;
use parking_lot::Mutex;
use redeploy::ssh::{self, CommandChannel, CommandOutput};
use std::collections::VecDeque;

pub struct FakeChannel {
    user: Option<String>,
    responses: Mutex<VecDeque<CommandOutput>>,
    commands: Mutex<Vec<String>>,
}

impl FakeChannel {
    pub fn new(user: Option<&str>) -> Self {
        Self {
            user: user.map(str::to_string),
            responses: Mutex::new(VecDeque::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Queue the output of the next command.
    pub fn respond(self, output: CommandOutput) -> Self {
        self.responses.lock().push_back(output);
        self
    }

    pub fn respond_ok(self, stdout: &str) -> Self {
        self.respond(ok(stdout))
    }

    pub fn respond_err(self, exit_code: u32, stderr: &str) -> Self {
        self.respond(failed(exit_code, stderr))
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        exit_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed(exit_code: u32, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl CommandChannel for FakeChannel {
    async fn exec(&self, command: &str) -> ssh::Result<CommandOutput> {
        self.commands.lock().push(command.to_string());
        self.responses
            .lock()
            .pop_front()
            .ok_or(ssh::Error::ChannelClosed)
    }

    fn remote_user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
